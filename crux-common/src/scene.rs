//! Scene assembly for a selection of athletes and problems
//!
//! A scene is everything the surface draws for one selection: a marker per
//! resolved hold and, for groups with at least two holds, a smoothed curve.
//! Every drawable carries the same four attributes so the surface can
//! cross-highlight the markers and curve of one attempt on hover.

use serde::{Deserialize, Serialize};

use crate::index::{AttemptGroup, AttemptIndex};
use crate::model::PointSequence;
use crate::spline::{build_path, PathDescription};
use crate::tension::tension;
use crate::{Error, Result};

/// What to draw
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every problem with every athlete who attempted it
    #[default]
    All,
    /// One athlete across all problems
    Athlete(String),
    /// Every athlete on one problem
    Problem(String),
    /// One athlete on one problem
    AthleteOnProblem { athlete: String, problem: String },
}

impl Selection {
    /// Selection from optional filters; empty strings count as absent
    pub fn from_filters(athlete: Option<&str>, problem: Option<&str>) -> Self {
        let athlete = athlete.filter(|a| !a.is_empty());
        let problem = problem.filter(|p| !p.is_empty());
        match (athlete, problem) {
            (None, None) => Selection::All,
            (Some(a), None) => Selection::Athlete(a.to_string()),
            (None, Some(p)) => Selection::Problem(p.to_string()),
            (Some(a), Some(p)) => Selection::AthleteOnProblem {
                athlete: a.to_string(),
                problem: p.to_string(),
            },
        }
    }

    /// Fails with `NotFound` when a named athlete or problem is not in `index`
    pub fn validate(&self, index: &AttemptIndex) -> Result<()> {
        let (athlete, problem) = match self {
            Selection::All => (None, None),
            Selection::Athlete(a) => (Some(a), None),
            Selection::Problem(p) => (None, Some(p)),
            Selection::AthleteOnProblem { athlete, problem } => (Some(athlete), Some(problem)),
        };

        if let Some(athlete) = athlete.filter(|a| !index.has_athlete(a)) {
            return Err(Error::NotFound(format!("athlete '{}'", athlete)));
        }
        if let Some(problem) = problem.filter(|p| !index.has_problem(p)) {
            return Err(Error::NotFound(format!("problem '{}'", problem)));
        }
        Ok(())
    }
}

/// Attributes shared by every element of one attempt group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAttrs {
    pub athlete: String,
    pub problem: String,
    pub attempt: String,
    pub limb: String,
}

impl GroupAttrs {
    /// Same athlete, problem and attempt; limbs of one attempt belong together
    pub fn same_group(&self, other: &GroupAttrs) -> bool {
        self.athlete == other.athlete && self.problem == other.problem && self.attempt == other.attempt
    }

    pub fn is_complete(&self) -> bool {
        !(self.athlete.is_empty() || self.problem.is_empty() || self.attempt.is_empty() || self.limb.is_empty())
    }

    /// Tooltip content: athlete as title, then labelled lines
    pub fn tooltip_lines(&self) -> Vec<TooltipLine> {
        vec![
            TooltipLine {
                label: None,
                value: self.athlete.clone(),
            },
            TooltipLine {
                label: Some("problem"),
                value: self.problem.clone(),
            },
            TooltipLine {
                label: Some("attempt"),
                value: self.attempt.clone(),
            },
            TooltipLine {
                label: Some("limb"),
                value: self.limb.clone(),
            },
        ]
    }
}

impl From<&AttemptGroup> for GroupAttrs {
    fn from(group: &AttemptGroup) -> Self {
        Self {
            athlete: group.athlete.clone(),
            problem: group.problem_id.clone(),
            attempt: group.attempt.text().to_string(),
            limb: group.limb.clone(),
        }
    }
}

/// One tooltip row; the title row has no label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipLine {
    pub label: Option<&'static str>,
    pub value: String,
}

/// Drawables of one attempt group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneGroup {
    #[serde(flatten)]
    pub attrs: GroupAttrs,
    /// False when an attribute is empty; such elements do not react to hover
    pub hoverable: bool,
    pub tooltip: Vec<TooltipLine>,
    pub tension: f64,
    /// Hold markers
    pub points: PointSequence,
    /// Smoothed curve; absent for single-hold groups
    pub path: Option<PathDescription>,
}

/// Everything drawn for one selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub groups: Vec<SceneGroup>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn curve_count(&self) -> usize {
        self.groups.iter().filter(|g| g.path.is_some()).count()
    }

    pub fn marker_count(&self) -> usize {
        self.groups.iter().map(|g| g.points.len()).sum()
    }

    fn push_groups(&mut self, index: &AttemptIndex, problem_id: &str, athlete: &str) {
        for group in index.groups(problem_id, athlete) {
            if group.points.is_empty() {
                continue;
            }
            let tension = tension(&group.athlete, group.attempt.value());
            let path = (group.points.len() >= 2).then(|| build_path(group.points.as_slice(), tension));
            let attrs = GroupAttrs::from(&group);
            self.groups.push(SceneGroup {
                hoverable: attrs.is_complete(),
                tooltip: attrs.tooltip_lines(),
                attrs,
                tension,
                points: group.points,
                path,
            });
        }
    }
}

/// Build the scene for `selection`; unknown athletes or problems give an empty scene
pub fn build_scene(index: &AttemptIndex, selection: &Selection) -> Scene {
    let mut scene = Scene::default();
    match selection {
        Selection::All => {
            for problem_id in index.problem_ids() {
                for athlete in index.athletes_for_problem(problem_id) {
                    scene.push_groups(index, problem_id, &athlete);
                }
            }
        }
        Selection::Athlete(athlete) => {
            for problem_id in index.problem_ids() {
                scene.push_groups(index, problem_id, athlete);
            }
        }
        Selection::Problem(problem_id) => {
            for athlete in index.athletes_for_problem(problem_id) {
                scene.push_groups(index, problem_id, &athlete);
            }
        }
        Selection::AthleteOnProblem { athlete, problem } => {
            scene.push_groups(index, problem, athlete);
        }
    }
    scene
}
