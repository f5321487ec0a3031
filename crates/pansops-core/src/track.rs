//! Track geometry: azimuth and length of the reference leg, and turn radius.

use crate::error::{ensure_positive, AreaError, Result};
use crate::models::{Point, RouteGeometry, TurnDirection};
use crate::units::{isa_corrected_tas, knots_to_mps};
use serde::{Deserialize, Serialize};

/// Standard gravity used by the turn-radius formula, m/s².
pub const GRAVITY_MPS2: f64 = 9.81;

/// Below this length (meters) a leg counts as a single point.
const DEGENERATE_LENGTH_M: f64 = 1e-9;

/// Normalize an azimuth into [0, 360).
pub fn normalize_azimuth(azimuth_deg: f64) -> f64 {
    let wrapped = azimuth_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Unit vector (east, north) for an azimuth in degrees.
pub fn unit_vector(azimuth_deg: f64) -> (f64, f64) {
    let rad = azimuth_deg.to_radians();
    (rad.sin(), rad.cos())
}

/// Azimuth in degrees, clockwise from north, of a (dx, dy) vector.
pub fn azimuth_of(dx: f64, dy: f64) -> f64 {
    normalize_azimuth(dx.atan2(dy).to_degrees())
}

/// Azimuth from `from` to `to`. Fails when both points coincide.
pub fn bearing(from: &Point, to: &Point) -> Result<f64> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.hypot(dy) <= DEGENERATE_LENGTH_M {
        return Err(AreaError::DegenerateSegment);
    }
    Ok(azimuth_of(dx, dy))
}

/// Start and end of the selected reference leg.
pub fn segment_endpoints(route: &RouteGeometry) -> (Point, Point) {
    (route.selected_start(), route.selected_end())
}

/// The fix or facility the procedure is anchored on: the end of the reference leg.
pub fn reference_point(route: &RouteGeometry) -> Point {
    route.selected_end()
}

/// Bearing of the selected sub-segment, in [0, 360) clockwise from north.
pub fn segment_azimuth(route: &RouteGeometry) -> Result<f64> {
    let (start, end) = segment_endpoints(route);
    bearing(&start, &end)
}

/// Planar length of the selected sub-segment (start to end), in meters.
pub fn segment_length(route: &RouteGeometry) -> Result<f64> {
    let (start, end) = segment_endpoints(route);
    let length = start.distance_to(&end);
    if length <= DEGENERATE_LENGTH_M {
        return Err(AreaError::DegenerateSegment);
    }
    Ok(length)
}

/// Turn radius in meters: `v² / (g · tan(bank))`.
pub fn turn_radius(true_airspeed_mps: f64, bank_angle_deg: f64) -> Result<f64> {
    let speed = ensure_positive("true airspeed", true_airspeed_mps)?;
    if !(bank_angle_deg > 0.0 && bank_angle_deg < 90.0) {
        return Err(AreaError::magnitude("bank angle", bank_angle_deg));
    }
    Ok(speed * speed / (GRAVITY_MPS2 * bank_angle_deg.to_radians().tan()))
}

/// Turn performance derived once per calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnParameters {
    pub tas_kt: f64,
    pub tas_mps: f64,
    pub radius_m: f64,
    pub direction: TurnDirection,
}

impl TurnParameters {
    pub fn compute(
        ias_kt: f64,
        altitude_m: f64,
        isa_deviation_c: f64,
        bank_angle_deg: f64,
        direction: TurnDirection,
    ) -> Result<Self> {
        let tas_kt = isa_corrected_tas(ias_kt, altitude_m, isa_deviation_c)?;
        let tas_mps = knots_to_mps(tas_kt);
        let radius_m = turn_radius(tas_mps, bank_angle_deg)?;
        Ok(Self {
            tas_kt,
            tas_mps,
            radius_m,
            direction,
        })
    }

    /// Ground distance covered in `minutes` at this true airspeed, no wind.
    pub fn distance_in(&self, minutes: f64) -> f64 {
        self.tas_mps * minutes * 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(a: (f64, f64), b: (f64, f64)) -> RouteGeometry {
        RouteGeometry::whole(vec![a.into(), b.into()]).unwrap()
    }

    #[test]
    fn azimuth_is_clockwise_from_north() {
        assert!((segment_azimuth(&route((0.0, 0.0), (0.0, 10.0))).unwrap() - 0.0).abs() < 1e-9);
        assert!((segment_azimuth(&route((0.0, 0.0), (10.0, 0.0))).unwrap() - 90.0).abs() < 1e-9);
        assert!((segment_azimuth(&route((0.0, 0.0), (0.0, -10.0))).unwrap() - 180.0).abs() < 1e-9);
        assert!((segment_azimuth(&route((0.0, 0.0), (-10.0, 0.0))).unwrap() - 270.0).abs() < 1e-9);
        assert!((segment_azimuth(&route((0.0, 0.0), (-5.0, 5.0))).unwrap() - 315.0).abs() < 1e-9);
    }

    #[test]
    fn length_uses_selected_endpoints() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 10.0),
        ];
        let route = RouteGeometry::new(points, 0, 1).unwrap();
        assert!((segment_length(&route).unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(reference_point(&route), Point::new(3.0, 4.0));
    }

    #[test]
    fn coincident_endpoints_are_degenerate() {
        let route = route((7.0, 7.0), (7.0, 7.0));
        assert_eq!(segment_azimuth(&route), Err(AreaError::DegenerateSegment));
        assert_eq!(segment_length(&route), Err(AreaError::DegenerateSegment));
    }

    #[test]
    fn normalize_wraps_negative_and_large_angles() {
        assert!((normalize_azimuth(-90.0) - 270.0).abs() < 1e-12);
        assert!((normalize_azimuth(720.5) - 0.5).abs() < 1e-9);
        assert!(normalize_azimuth(-1e-18) < 360.0);
    }

    #[test]
    fn turn_radius_matches_closed_form() {
        let r = turn_radius(100.0, 45.0).unwrap();
        assert!((r - 10_000.0 / 9.81).abs() < 1e-6);
    }

    #[test]
    fn turn_radius_is_monotonic() {
        let speeds = [10.0, 50.0, 100.0, 150.0, 250.0];
        let banks = [5.0, 15.0, 25.0, 45.0, 70.0, 89.0];
        for bank in banks {
            for pair in speeds.windows(2) {
                assert!(turn_radius(pair[0], bank).unwrap() < turn_radius(pair[1], bank).unwrap());
            }
        }
        for speed in speeds {
            for pair in banks.windows(2) {
                assert!(turn_radius(speed, pair[0]).unwrap() > turn_radius(speed, pair[1]).unwrap());
            }
        }
    }

    #[test]
    fn turn_radius_rejects_out_of_range_inputs() {
        assert!(turn_radius(0.0, 25.0).is_err());
        assert!(turn_radius(100.0, 0.0).is_err());
        assert!(turn_radius(100.0, 90.0).is_err());
        assert!(turn_radius(100.0, f64::NAN).is_err());
    }

    #[test]
    fn turn_parameters_chain_tas_and_radius() {
        let turn = TurnParameters::compute(180.0, 1000.0, 0.0, 25.0, TurnDirection::Left).unwrap();
        assert!(turn.tas_kt > 180.0);
        assert!((turn.tas_mps - knots_to_mps(turn.tas_kt)).abs() < 1e-12);
        assert!((turn.radius_m - turn_radius(turn.tas_mps, 25.0).unwrap()).abs() < 1e-9);
        assert!((turn.distance_in(1.0) - turn.tas_mps * 60.0).abs() < 1e-9);
    }
}
