//! Wall-space geometry and input dataset rows
//!
//! The two input tables arrive as loosely typed JSON: ids may be written as
//! strings or numbers, attempts as numbers or numeric strings, and hold
//! coordinates as numbers or numeric strings. The row types here accept all
//! of those shapes and normalize them once at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A coordinate in wall space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// True when both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Ordered hold-visit positions of one attempt group
///
/// Built once from the record order and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PointSequence(Vec<Point>);

impl PointSequence {
    pub fn as_slice(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }
}

impl FromIterator<Point> for PointSequence {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Point>> for PointSequence {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl<'a> IntoIterator for &'a PointSequence {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// JSON scalar that may be written either as text or as a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Numeric coercion: numbers as-is; text trimmed, empty → 0, unparsable → NaN
    pub fn to_f64(&self) -> f64 {
        match self {
            Scalar::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Scalar::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => {
                if let Some(i) = n.as_i64() {
                    write!(f, "{}", i)
                } else if let Some(u) = n.as_u64() {
                    write!(f, "{}", u)
                } else {
                    write!(f, "{}", format_number(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

/// Shortest decimal form of a coordinate, with negative zero printed as `0`
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Attempt number as written in the records table plus its numeric coercion
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    text: String,
    value: f64,
}

impl Attempt {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl From<Scalar> for Attempt {
    fn from(scalar: Scalar) -> Self {
        Self {
            value: scalar.to_f64(),
            text: scalar.to_string(),
        }
    }
}

impl Default for Attempt {
    /// Missing attempt: empty text, NaN value (tension treats it as attempt 1)
    fn default() -> Self {
        Self {
            text: String::new(),
            value: f64::NAN,
        }
    }
}

impl<'de> Deserialize<'de> for Attempt {
    /// JSON null reads like a missing attempt
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Scalar>::deserialize(deserializer).map(|s| s.map(Attempt::from).unwrap_or_default())
    }
}

/// Id or name as text; JSON null reads as the empty string
fn scalar_to_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<Scalar>::deserialize(deserializer).map(|s| s.map(|s| s.to_string()).unwrap_or_default())
}

fn optional_scalar_to_string<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<Scalar>::deserialize(deserializer).map(|s| s.map(|s| s.to_string()))
}

fn optional_scalar_to_f64<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    // JSON null coerces to 0, a missing field to NaN (see `default_nan`)
    Option::<Scalar>::deserialize(deserializer).map(|s| s.map(|s| s.to_f64()).unwrap_or(0.0))
}

fn default_nan() -> f64 {
    f64::NAN
}

/// One hold visit from the records table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordRow {
    #[serde(deserialize_with = "scalar_to_string")]
    pub problem_id: String,
    #[serde(deserialize_with = "scalar_to_string")]
    pub athlete: String,
    #[serde(default)]
    pub attempt: Attempt,
    #[serde(deserialize_with = "scalar_to_string")]
    pub hold: String,
    #[serde(default, deserialize_with = "optional_scalar_to_string")]
    pub limb: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_to_string")]
    pub hand: Option<String>,
}

impl RecordRow {
    /// Limb label: `limb`, else `hand`, else `"unknown"`; empty strings count as absent
    pub fn resolved_limb(&self) -> &str {
        self.limb
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.hand.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("unknown")
    }
}

/// One hold position from the problem coordinate table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProblemHoldRow {
    #[serde(deserialize_with = "scalar_to_string")]
    pub problem_id: String,
    #[serde(deserialize_with = "scalar_to_string")]
    pub hold_id: String,
    #[serde(default = "default_nan", deserialize_with = "optional_scalar_to_f64")]
    pub x: f64,
    #[serde(default = "default_nan", deserialize_with = "optional_scalar_to_f64")]
    pub y: f64,
}

impl ProblemHoldRow {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
