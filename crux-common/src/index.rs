//! Attempt grouping
//!
//! Turns the flat records table into ordered point sequences, one per
//! (problem, athlete, attempt, limb). Holds are resolved through the problem
//! coordinate table; unresolvable holds are logged and dropped from their
//! group rather than failing the whole build.

use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::model::{Attempt, Point, PointSequence, ProblemHoldRow, RecordRow};

/// One attempt of one athlete on one problem with one limb
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptGroup {
    pub problem_id: String,
    pub athlete: String,
    pub attempt: Attempt,
    pub limb: String,
    pub points: PointSequence,
}

/// Both input tables, indexed for grouping and selection
#[derive(Debug, Clone, Default)]
pub struct AttemptIndex {
    records: Vec<RecordRow>,
    problem_ids: Vec<String>,
    holds: HashMap<String, HashMap<String, Point>>,
}

impl AttemptIndex {
    /// Build from the two tables; a repeated (problem, hold) keeps the last row
    pub fn new(records: Vec<RecordRow>, problems: Vec<ProblemHoldRow>) -> Self {
        let mut problem_ids = Vec::new();
        let mut holds: HashMap<String, HashMap<String, Point>> = HashMap::new();

        for row in problems {
            let layout = holds.entry(row.problem_id.clone()).or_insert_with(|| {
                problem_ids.push(row.problem_id.clone());
                HashMap::new()
            });
            layout.insert(row.hold_id.clone(), row.point());
        }

        Self {
            records,
            problem_ids,
            holds,
        }
    }

    pub fn records(&self) -> &[RecordRow] {
        &self.records
    }

    /// Problem ids in coordinate-table order
    pub fn problem_ids(&self) -> &[String] {
        &self.problem_ids
    }

    /// Wall position of a hold, if the problem defines it with finite coordinates
    pub fn hold_position(&self, problem_id: &str, hold_id: &str) -> Option<Point> {
        self.holds
            .get(problem_id)
            .and_then(|layout| layout.get(hold_id))
            .copied()
            .filter(Point::is_finite)
    }

    /// Every athlete in order of first appearance
    pub fn athletes(&self) -> Vec<String> {
        first_appearances(self.records.iter())
    }

    /// Athletes with at least one record on `problem_id`, in order of first appearance
    pub fn athletes_for_problem(&self, problem_id: &str) -> Vec<String> {
        first_appearances(self.records.iter().filter(|r| r.problem_id == problem_id))
    }

    pub fn has_athlete(&self, athlete: &str) -> bool {
        self.records.iter().any(|r| r.athlete == athlete)
    }

    pub fn has_problem(&self, problem_id: &str) -> bool {
        self.holds.contains_key(problem_id)
    }

    /// Attempt groups of one athlete on one problem
    ///
    /// Groups are keyed by (attempt text, limb) and ordered by first
    /// appearance; each sequence follows record order. Groups whose holds all
    /// failed to resolve are returned with an empty sequence.
    pub fn groups(&self, problem_id: &str, athlete: &str) -> Vec<AttemptGroup> {
        let mut groups: Vec<AttemptGroup> = Vec::new();
        let mut pending: Vec<Vec<Point>> = Vec::new();

        for record in self
            .records
            .iter()
            .filter(|r| r.problem_id == problem_id && r.athlete == athlete)
        {
            let limb = record.resolved_limb();
            let slot = match groups
                .iter()
                .position(|g| g.attempt.text() == record.attempt.text() && g.limb == limb)
            {
                Some(slot) => slot,
                None => {
                    groups.push(AttemptGroup {
                        problem_id: problem_id.to_string(),
                        athlete: athlete.to_string(),
                        attempt: record.attempt.clone(),
                        limb: limb.to_string(),
                        points: PointSequence::default(),
                    });
                    pending.push(Vec::new());
                    groups.len() - 1
                }
            };

            match self.hold_position(problem_id, &record.hold) {
                Some(point) => pending[slot].push(point),
                None => warn!(problem_id, hold = %record.hold, "Hold lookup failed, skipping point"),
            }
        }

        for (group, points) in groups.iter_mut().zip(pending) {
            group.points = PointSequence::from(points);
        }
        groups
    }
}

fn first_appearances<'a>(records: impl Iterator<Item = &'a RecordRow>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut athletes = Vec::new();
    for record in records {
        if seen.insert(record.athlete.as_str()) {
            athletes.push(record.athlete.clone());
        }
    }
    athletes
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_index() -> AttemptIndex {
        let records: Vec<RecordRow> = serde_json::from_value(json!([
            { "problem_id": "P1", "athlete": "Ann", "attempt": 1, "hold": "H1", "limb": "left" },
            { "problem_id": "P1", "athlete": "Ann", "attempt": 1, "hold": "H2", "limb": "left" },
            { "problem_id": "P1", "athlete": "Bo",  "attempt": 1, "hold": "H1", "hand": "right" },
            { "problem_id": "P1", "athlete": "Ann", "attempt": 2, "hold": "H3", "limb": "right" },
            { "problem_id": "P1", "athlete": "Ann", "attempt": 1, "hold": "H3", "limb": "left" },
            { "problem_id": "P1", "athlete": "Ann", "attempt": 2, "hold": "H9", "limb": "right" },
            { "problem_id": "P2", "athlete": "Bo",  "attempt": "1", "hold": "A", "limb": "left" },
            { "problem_id": "P2", "athlete": "Bo",  "attempt": "1", "hold": "B", "limb": "left" },
            { "problem_id": "P2", "athlete": "Cy",  "attempt": 1, "hold": "Z" }
        ]))
        .unwrap();
        let problems: Vec<ProblemHoldRow> = serde_json::from_value(json!([
            { "problem_id": "P1", "hold_id": "H1", "x": 0, "y": 0 },
            { "problem_id": "P1", "hold_id": "H2", "x": 10, "y": 0 },
            { "problem_id": "P1", "hold_id": "H3", "x": "20", "y": "5" },
            { "problem_id": "P2", "hold_id": "A", "x": 1, "y": 1 },
            { "problem_id": "P2", "hold_id": "B", "x": 2, "y": 3 }
        ]))
        .unwrap();
        AttemptIndex::new(records, problems)
    }

    #[test]
    fn test_problem_and_athlete_order() {
        let index = sample_index();
        assert_eq!(index.problem_ids(), &["P1".to_string(), "P2".to_string()]);
        assert_eq!(index.athletes(), vec!["Ann", "Bo", "Cy"]);
        assert_eq!(index.athletes_for_problem("P2"), vec!["Bo", "Cy"]);
        assert!(index.athletes_for_problem("P9").is_empty());
    }

    #[test]
    fn test_groups_follow_first_appearance_and_record_order() {
        let index = sample_index();
        let groups = index.groups("P1", "Ann");
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].attempt.text(), "1");
        assert_eq!(groups[0].limb, "left");
        assert_eq!(
            groups[0].points.as_slice(),
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 5.0)]
        );

        // H9 is not on the wall and is dropped
        assert_eq!(groups[1].attempt.text(), "2");
        assert_eq!(groups[1].limb, "right");
        assert_eq!(groups[1].points.as_slice(), &[Point::new(20.0, 5.0)]);
    }

    #[test]
    fn test_limb_fallback_and_unresolved_group() {
        let index = sample_index();
        let bo = index.groups("P1", "Bo");
        assert_eq!(bo[0].limb, "right");

        let cy = index.groups("P2", "Cy");
        assert_eq!(cy.len(), 1);
        assert_eq!(cy[0].limb, "unknown");
        assert!(cy[0].points.is_empty());
    }

    #[test]
    fn test_later_hold_row_wins_and_non_finite_skipped() {
        let problems: Vec<ProblemHoldRow> = serde_json::from_value(json!([
            { "problem_id": "P1", "hold_id": "H1", "x": 0, "y": 0 },
            { "problem_id": "P1", "hold_id": "H1", "x": 7, "y": 8 },
            { "problem_id": "P1", "hold_id": "H2", "x": "n/a", "y": 1 }
        ]))
        .unwrap();
        let index = AttemptIndex::new(Vec::new(), problems);
        assert_eq!(index.hold_position("P1", "H1"), Some(Point::new(7.0, 8.0)));
        assert_eq!(index.hold_position("P1", "H2"), None);
        assert_eq!(index.problem_ids().len(), 1);
    }
}
