//! Smooth path construction through hold positions
//!
//! Catmull-Rom style smoothing expressed as one cubic Bezier segment per pair
//! of consecutive points. Control points for the segment p1 → p2 are
//!
//! ```text
//! cp1 = p1 + (p2 - p0) * factor
//! cp2 = p2 - (p3 - p1) * factor        factor = tension * 0.7
//! ```
//!
//! where p0 and p3 are the neighbours of the segment. At the ends of the
//! sequence the missing neighbour is replaced by the nearest existing point,
//! so the curve never extrapolates past the first or last hold. The result
//! passes through every input point with a continuous tangent.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::model::{format_number, Point};

/// Scale from tension to control-point distance
const FACTOR_PER_TENSION: f64 = 0.7;

/// Tension used when the caller passes zero or a non-finite value
pub const DEFAULT_TENSION: f64 = 0.5;

/// One drawing command of a path description
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start the path at a point
    MoveTo(Point),
    /// Cubic Bezier from the current point to `to`
    CurveTo { c1: Point, c2: Point, to: Point },
}

/// Ordered drawing commands: at most one leading `MoveTo`, then `CurveTo`s
///
/// Displays as SVG path data (`M x y C x1 y1, x2 y2, x y ...`) and
/// serializes as that same string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathDescription {
    commands: Vec<PathCommand>,
}

impl PathDescription {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of cubic segments
    pub fn segment_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::CurveTo { .. }))
            .count()
    }

    /// Final point of the path, if any
    pub fn end_point(&self) -> Option<Point> {
        self.commands.last().map(|c| match *c {
            PathCommand::MoveTo(p) => p,
            PathCommand::CurveTo { to, .. } => to,
        })
    }
}

impl fmt::Display for PathDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match command {
                PathCommand::MoveTo(p) => write!(f, "M {} {}", num(p.x()), num(p.y()))?,
                PathCommand::CurveTo { c1, c2, to } => write!(
                    f,
                    "C {} {}, {} {}, {} {}",
                    num(c1.x()),
                    num(c1.y()),
                    num(c2.x()),
                    num(c2.y()),
                    num(to.x()),
                    num(to.y())
                )?,
            }
        }
        Ok(())
    }
}

impl Serialize for PathDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn num(value: f64) -> String {
    format_number(value)
}

/// Build a smooth path through `points` in order
///
/// Empty input gives an empty path; a single point gives a lone `MoveTo`.
pub fn build_path(points: &[Point], tension: f64) -> PathDescription {
    let Some(&first) = points.first() else {
        return PathDescription::default();
    };

    let tension = if tension.is_finite() && tension != 0.0 {
        tension
    } else {
        DEFAULT_TENSION
    };
    let factor = tension * FACTOR_PER_TENSION;

    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo(first));

    for (i, window) in points.windows(2).enumerate() {
        let (p1, p2) = (window[0], window[1]);
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p3 = points.get(i + 2).copied().unwrap_or(p2);

        commands.push(PathCommand::CurveTo {
            c1: p1 + (p2 - p0) * factor,
            c2: p2 - (p3 - p1) * factor,
            to: p2,
        });
    }

    PathDescription { commands }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x() - b.x()).abs() < 1e-9 && (a.y() - b.y()).abs() < 1e-9
    }

    #[test]
    fn test_empty_input() {
        let path = build_path(&[], 0.5);
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
        assert_eq!(path.end_point(), None);
    }

    #[test]
    fn test_single_point_is_move_only() {
        let path = build_path(&[Point::new(3.0, 4.0)], 0.5);
        assert_eq!(path.commands(), &[PathCommand::MoveTo(Point::new(3.0, 4.0))]);
        assert_eq!(path.segment_count(), 0);
        assert_eq!(path.to_string(), "M 3 4");
    }

    #[test]
    fn test_two_points_one_segment() {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(10.0, 0.0);
        let path = build_path(&[p0, p1], 0.5);

        assert_eq!(path.commands().len(), 2);
        assert_eq!(path.segment_count(), 1);
        assert_eq!(path.end_point(), Some(p1));

        // factor = 0.35; p0 doubles as its own left neighbour, p1 as its right
        match path.commands()[1] {
            PathCommand::CurveTo { c1, c2, to } => {
                assert!(approx(c1, Point::new(3.5, 0.0)));
                assert!(approx(c2, Point::new(6.5, 0.0)));
                assert_eq!(to, p1);
            }
            other => panic!("expected curve, got {:?}", other),
        }
        assert_eq!(path.to_string(), "M 0 0 C 3.5 0, 6.5 0, 10 0");
    }

    #[test]
    fn test_one_segment_per_pair_through_every_point() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(20.0, -5.0),
            Point::new(30.0, 0.0),
        ];
        let path = build_path(&pts, 0.4);
        assert_eq!(path.segment_count(), 3);

        let ends: Vec<Point> = path
            .commands()
            .iter()
            .map(|c| match *c {
                PathCommand::MoveTo(p) => p,
                PathCommand::CurveTo { to, .. } => to,
            })
            .collect();
        assert_eq!(ends, pts.to_vec());
    }

    #[test]
    fn test_interior_control_points_use_neighbours() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 10.0),
        ];
        let factor = 0.5 * 0.7;
        let path = build_path(&pts, 0.5);

        // Segment 1 connects pts[1] → pts[2]; p0 = pts[0], p3 falls back to pts[2]
        match path.commands()[2] {
            PathCommand::CurveTo { c1, c2, .. } => {
                assert!(approx(c1, Point::new(10.0 + 20.0 * factor, 10.0 * factor)));
                assert!(approx(c2, Point::new(20.0 - 10.0 * factor, 10.0 - 10.0 * factor)));
            }
            other => panic!("expected curve, got {:?}", other),
        }
    }

    #[test]
    fn test_tangent_continuity_at_interior_points() {
        // Incoming cp2 and outgoing cp1 are mirror images about the shared point
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 8.0),
            Point::new(12.0, 3.0),
            Point::new(20.0, 9.0),
        ];
        let path = build_path(&pts, 0.6);
        let cmds = path.commands();
        for k in 1..cmds.len() - 1 {
            if let (PathCommand::CurveTo { c2, to, .. }, PathCommand::CurveTo { c1, .. }) = (cmds[k], cmds[k + 1]) {
                let incoming = to - c2;
                let outgoing = c1 - to;
                assert!(approx(incoming, outgoing), "kink at {:?}", to);
            }
        }
    }

    #[test]
    fn test_invalid_tension_falls_back_to_default() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let expected = build_path(&pts, DEFAULT_TENSION);
        assert_eq!(build_path(&pts, 0.0), expected);
        assert_eq!(build_path(&pts, f64::NAN), expected);
    }

    #[test]
    fn test_serializes_as_path_data() {
        let path = build_path(&[Point::new(1.5, -2.0)], 0.5);
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!("M 1.5 -2"));
    }
}
