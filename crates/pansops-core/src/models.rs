//! Core data models for protection-area calculations.

use crate::area::Ring;
use crate::error::{AreaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A point in a locally projected plane, in meters (x east, y north).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Translate by `distance_m` along an azimuth (degrees clockwise from north).
    pub fn offset(&self, azimuth_deg: f64, distance_m: f64) -> Point {
        let rad = azimuth_deg.to_radians();
        Point {
            x: self.x + distance_m * rad.sin(),
            y: self.y + distance_m * rad.cos(),
        }
    }

    pub(crate) fn approx_eq(&self, other: &Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// A pilot-drawn route polyline with one selected reference leg.
///
/// The reference leg runs from `points[start]` to `points[end]`. Whether it
/// has non-zero length is checked by the track functions, which report
/// [`AreaError::DegenerateSegment`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteGeometry {
    points: Vec<Point>,
    start: usize,
    end: usize,
}

impl RouteGeometry {
    /// Build a route with an explicit selected sub-segment.
    pub fn new(points: Vec<Point>, start: usize, end: usize) -> Result<Self> {
        if points.len() < 2 {
            return Err(AreaError::InvalidGeometry(format!(
                "route needs at least two points, got {}",
                points.len()
            )));
        }
        if points
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(AreaError::InvalidGeometry(
                "route contains non-finite coordinates".into(),
            ));
        }
        if start >= end || end >= points.len() {
            return Err(AreaError::MissingSelection(format!(
                "segment {start}..{end} is not a valid selection of {} points",
                points.len()
            )));
        }
        Ok(Self { points, start, end })
    }

    /// Build a route whose reference leg runs from the first to the last point.
    pub fn whole(points: Vec<Point>) -> Result<Self> {
        let end = points.len().saturating_sub(1);
        Self::new(points, 0, end)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Points of the selected sub-segment, inclusive.
    pub fn selected_points(&self) -> &[Point] {
        &self.points[self.start..=self.end]
    }

    pub fn selected_start(&self) -> Point {
        self.points[self.start]
    }

    pub fn selected_end(&self) -> Point {
        self.points[self.end]
    }
}

/// Direction of a turn as seen from above, north up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// +1 for clockwise (right) turns, -1 for counter-clockwise.
    pub fn sign(self) -> f64 {
        match self {
            TurnDirection::Left => -1.0,
            TurnDirection::Right => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TurnDirection::Left => "L",
            TurnDirection::Right => "R",
        }
    }
}

impl FromStr for TurnDirection {
    type Err = AreaError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            other => Err(AreaError::InvalidGeometry(format!(
                "turn direction must be left or right, got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute value attached to an area or a whole calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(value) => Some(*value),
            AttributeValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) => Some(value),
            AttributeValue::Number(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(value) => write!(f, "{}", value),
            AttributeValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

pub type Attributes = BTreeMap<String, AttributeValue>;

/// Which part of the protection area a ring describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    /// Full obstacle clearance applies.
    Primary,
    /// Outer ring including the tapering secondary margin.
    Secondary,
    /// Waypoint fix tolerance rectangle.
    Tolerance,
}

impl AreaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AreaKind::Primary => "primary",
            AreaKind::Secondary => "secondary",
            AreaKind::Tolerance => "tolerance",
        }
    }
}

/// One closed ring of a protection area with its own attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaPolygon {
    pub kind: AreaKind,
    pub ring: Ring,
    pub attributes: Attributes,
}

/// A nominal track drawn alongside the areas (e.g. the holding racetrack).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackLine {
    pub name: String,
    pub points: Vec<Point>,
}

/// The procedure type a protection area was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureKind {
    Holding,
    NdbApproach,
    ConvInitialApproach,
    GnssWaypoint,
}

impl ProcedureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcedureKind::Holding => "holding",
            ProcedureKind::NdbApproach => "ndb_approach",
            ProcedureKind::ConvInitialApproach => "conv_initial_approach",
            ProcedureKind::GnssWaypoint => "gnss_waypoint",
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single calculation. Built once, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtectionArea {
    pub procedure: ProcedureKind,
    pub areas: Vec<AreaPolygon>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<TrackLine>,
    pub attributes: Attributes,
}

impl ProtectionArea {
    /// First area of the given kind.
    pub fn area(&self, kind: AreaKind) -> Option<&AreaPolygon> {
        self.areas.iter().find(|area| area.kind == kind)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn route_requires_two_points() {
        let err = RouteGeometry::whole(pts(&[(0.0, 0.0)])).unwrap_err();
        assert!(matches!(err, AreaError::InvalidGeometry(_)));
    }

    #[test]
    fn route_rejects_bad_selection() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        assert!(matches!(
            RouteGeometry::new(points.clone(), 2, 1),
            Err(AreaError::MissingSelection(_))
        ));
        assert!(matches!(
            RouteGeometry::new(points.clone(), 0, 3),
            Err(AreaError::MissingSelection(_))
        ));
        let route = RouteGeometry::new(points, 1, 2).unwrap();
        assert_eq!(route.selected_start(), Point::new(10.0, 0.0));
        assert_eq!(route.selected_points().len(), 2);
    }

    #[test]
    fn point_offset_follows_azimuth() {
        let east = Point::new(0.0, 0.0).offset(90.0, 100.0);
        assert!(east.approx_eq(&Point::new(100.0, 0.0), 1e-9));
        let south = Point::new(0.0, 0.0).offset(180.0, 50.0);
        assert!(south.approx_eq(&Point::new(0.0, -50.0), 1e-9));
    }

    #[test]
    fn turn_direction_parses_short_and_long_forms() {
        assert_eq!("L".parse::<TurnDirection>().unwrap(), TurnDirection::Left);
        assert_eq!("right".parse::<TurnDirection>().unwrap(), TurnDirection::Right);
        assert!("up".parse::<TurnDirection>().is_err());
    }

    #[test]
    fn attribute_values_serialize_untagged() {
        let mut attrs = Attributes::new();
        attrs.insert("moc_value".into(), 300.0.into());
        attrs.insert("moc_unit".into(), "ft".into());
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"moc_unit":"ft","moc_value":300.0}"#);
    }
}
