//! Holding pattern protection areas.
//!
//! The racetrack is built step by step: turn performance first, then the
//! outbound leg, the turn back onto the inbound track, the inbound leg, and
//! the turn over the fix. The primary area is that racetrack expanded by the
//! template's primary margin; the secondary area adds the secondary margin.
//! Expanding a racetrack by a margin keeps the turn centers and grows the
//! turn radius, so both areas are built with the same steps.

use crate::area::{arc_segment, Ring};
use crate::criteria::{EngineConfig, HoldingTemplate};
use crate::error::{ensure_non_negative, ensure_positive, AreaError, Result};
use crate::models::{
    AreaKind, AreaPolygon, Attributes, Point, ProcedureKind, ProtectionArea, RouteGeometry,
    TrackLine, TurnDirection,
};
use crate::procedures::ProcedureCalculator;
use crate::track::{reference_point, segment_azimuth, TurnParameters};
use crate::units::{altitude_to_meters, DistanceUnit};
use serde::{Deserialize, Serialize};

/// Inputs of a holding calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingParameters {
    /// Indicated airspeed, knots
    pub ias_kt: f64,
    pub altitude: f64,
    pub altitude_unit: DistanceUnit,
    /// Temperature deviation from ISA, °C
    pub isa_deviation_c: f64,
    pub bank_angle_deg: f64,
    /// Outbound leg time, minutes
    pub leg_time_min: f64,
    pub turn: TurnDirection,
}

/// Which end of the racetrack a turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSide {
    /// End of the outbound leg, turning back onto the inbound track.
    Inbound,
    /// Over the fix, turning onto the outbound leg.
    Outbound,
}

/// Construction steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingStep {
    ComputeTurnRadius,
    BuildOutboundLeg,
    BuildTurnArc(TurnSide),
    BuildInboundLeg,
    ClosePrimaryArea,
    BuildSecondaryArea,
    Done,
}

impl HoldingStep {
    fn next(self) -> Self {
        match self {
            HoldingStep::ComputeTurnRadius => HoldingStep::BuildOutboundLeg,
            HoldingStep::BuildOutboundLeg => HoldingStep::BuildTurnArc(TurnSide::Inbound),
            HoldingStep::BuildTurnArc(TurnSide::Inbound) => HoldingStep::BuildInboundLeg,
            HoldingStep::BuildInboundLeg => HoldingStep::BuildTurnArc(TurnSide::Outbound),
            HoldingStep::BuildTurnArc(TurnSide::Outbound) => HoldingStep::ClosePrimaryArea,
            HoldingStep::ClosePrimaryArea => HoldingStep::BuildSecondaryArea,
            HoldingStep::BuildSecondaryArea | HoldingStep::Done => HoldingStep::Done,
        }
    }
}

/// Fixed racetrack frame: the fix, inbound track and leg length.
#[derive(Debug, Clone, Copy)]
struct Racetrack {
    inbound_azimuth_deg: f64,
    /// Azimuth from the inbound track toward the holding side.
    side_azimuth_deg: f64,
    /// Turn center abeam the fix.
    fix_center: Point,
    /// Turn center at the end of the outbound leg.
    far_center: Point,
    direction: TurnDirection,
}

impl Racetrack {
    fn new(fix: Point, inbound_azimuth_deg: f64, leg_length_m: f64, turn: &TurnParameters) -> Self {
        let side_azimuth_deg = inbound_azimuth_deg + 90.0 * turn.direction.sign();
        let fix_center = fix.offset(side_azimuth_deg, turn.radius_m);
        let far_center = fix_center.offset(inbound_azimuth_deg + 180.0, leg_length_m);
        Self {
            inbound_azimuth_deg,
            side_azimuth_deg,
            fix_center,
            far_center,
            direction: turn.direction,
        }
    }

    fn outbound_leg(&self, radius_m: f64) -> [Point; 2] {
        [
            self.fix_center.offset(self.side_azimuth_deg, radius_m),
            self.far_center.offset(self.side_azimuth_deg, radius_m),
        ]
    }

    fn inbound_leg(&self, radius_m: f64) -> [Point; 2] {
        let inner = self.side_azimuth_deg + 180.0;
        [
            self.far_center.offset(inner, radius_m),
            self.fix_center.offset(inner, radius_m),
        ]
    }

    fn turn_arc(&self, side: TurnSide, radius_m: f64, tolerance_m: f64) -> Result<Vec<Point>> {
        let (center, start) = match side {
            TurnSide::Inbound => (self.far_center, self.side_azimuth_deg),
            TurnSide::Outbound => (self.fix_center, self.side_azimuth_deg + 180.0),
        };
        arc_segment(
            center,
            radius_m,
            start,
            start + 180.0,
            self.direction,
            tolerance_m,
        )
    }

    /// Full boundary at `radius_m`, walked in flying order starting abeam the fix.
    fn boundary(&self, radius_m: f64, tolerance_m: f64) -> Result<Vec<Point>> {
        let mut points = Vec::new();
        points.extend(self.outbound_leg(radius_m));
        points.extend(self.turn_arc(TurnSide::Inbound, radius_m, tolerance_m)?);
        points.extend(self.inbound_leg(radius_m));
        points.extend(self.turn_arc(TurnSide::Outbound, radius_m, tolerance_m)?);
        Ok(points)
    }
}

/// Mutable state of one holding construction run.
struct HoldingConstruction<'a> {
    params: &'a HoldingParameters,
    template: &'a HoldingTemplate,
    tolerance_m: f64,
    fix: Point,
    inbound_azimuth_deg: f64,
    step: HoldingStep,
    turn: Option<TurnParameters>,
    racetrack: Option<Racetrack>,
    leg_length_m: f64,
    boundary: Vec<Point>,
    primary: Option<Ring>,
    secondary: Option<Ring>,
}

impl<'a> HoldingConstruction<'a> {
    fn racetrack(&self) -> Result<&Racetrack> {
        self.racetrack
            .as_ref()
            .ok_or_else(|| AreaError::InvalidGeometry("racetrack used before turn radius".into()))
    }

    fn primary_radius(&self) -> Result<f64> {
        let turn = self
            .turn
            .ok_or_else(|| AreaError::InvalidGeometry("turn radius not computed".into()))?;
        Ok(turn.radius_m + self.template.primary_margin_m)
    }

    fn advance(&mut self) -> Result<()> {
        tracing::debug!(step = ?self.step, "holding construction step");
        match self.step {
            HoldingStep::ComputeTurnRadius => {
                let altitude_m = altitude_to_meters(self.params.altitude, self.params.altitude_unit)?;
                let turn = TurnParameters::compute(
                    self.params.ias_kt,
                    altitude_m,
                    self.params.isa_deviation_c,
                    self.params.bank_angle_deg,
                    self.params.turn,
                )?;
                let leg_time = ensure_positive("leg time", self.params.leg_time_min)?;
                self.leg_length_m = turn.distance_in(leg_time);
                if self.leg_length_m < 2.0 * turn.radius_m {
                    tracing::debug!(
                        leg_m = self.leg_length_m,
                        radius_m = turn.radius_m,
                        "outbound leg shorter than one turn diameter"
                    );
                }
                self.racetrack = Some(Racetrack::new(
                    self.fix,
                    self.inbound_azimuth_deg,
                    self.leg_length_m,
                    &turn,
                ));
                self.turn = Some(turn);
            }
            HoldingStep::BuildOutboundLeg => {
                let leg = self.racetrack()?.outbound_leg(self.primary_radius()?);
                self.boundary.extend(leg);
            }
            HoldingStep::BuildTurnArc(side) => {
                let arc = self
                    .racetrack()?
                    .turn_arc(side, self.primary_radius()?, self.tolerance_m)?;
                self.boundary.extend(arc);
            }
            HoldingStep::BuildInboundLeg => {
                let leg = self.racetrack()?.inbound_leg(self.primary_radius()?);
                self.boundary.extend(leg);
            }
            HoldingStep::ClosePrimaryArea => {
                let boundary = std::mem::take(&mut self.boundary);
                self.primary = Some(Ring::new(boundary)?);
            }
            HoldingStep::BuildSecondaryArea => {
                let radius = self.primary_radius()? + self.template.secondary_margin_m;
                let boundary = self.racetrack()?.boundary(radius, self.tolerance_m)?;
                self.secondary = Some(Ring::new(boundary)?);
            }
            HoldingStep::Done => {}
        }
        self.step = self.step.next();
        Ok(())
    }
}

/// Builds primary and secondary holding areas around a racetrack.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingPatternCalculator {
    template: HoldingTemplate,
    arc_tolerance_m: f64,
}

impl HoldingPatternCalculator {
    pub fn new(template: HoldingTemplate, arc_tolerance_m: f64) -> Self {
        Self {
            template,
            arc_tolerance_m,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.holding.clone(), config.arc_tolerance_m)
    }
}

impl ProcedureCalculator for HoldingPatternCalculator {
    type Parameters = HoldingParameters;

    fn kind(&self) -> ProcedureKind {
        ProcedureKind::Holding
    }

    fn calculate(&self, route: &RouteGeometry, params: &HoldingParameters) -> Result<ProtectionArea> {
        ensure_non_negative("primary margin", self.template.primary_margin_m)?;
        ensure_non_negative("secondary margin", self.template.secondary_margin_m)?;

        let inbound_azimuth_deg = segment_azimuth(route)?;
        let mut run = HoldingConstruction {
            params,
            template: &self.template,
            tolerance_m: self.arc_tolerance_m,
            fix: reference_point(route),
            inbound_azimuth_deg,
            step: HoldingStep::ComputeTurnRadius,
            turn: None,
            racetrack: None,
            leg_length_m: 0.0,
            boundary: Vec::new(),
            primary: None,
            secondary: None,
        };
        while run.step != HoldingStep::Done {
            run.advance()?;
        }

        let (Some(turn), Some(racetrack), Some(primary), Some(secondary)) =
            (run.turn, run.racetrack, run.primary, run.secondary)
        else {
            return Err(AreaError::InvalidGeometry(
                "holding construction ended early".into(),
            ));
        };

        let mut nominal = racetrack.boundary(turn.radius_m, self.arc_tolerance_m)?;
        if let Some(first) = nominal.first().copied() {
            nominal.push(first);
        }

        let mut tags = Attributes::new();
        tags.insert("leg_time_min".into(), params.leg_time_min.into());
        tags.insert("turn_radius_m".into(), turn.radius_m.into());
        tags.insert("tas_kt".into(), turn.tas_kt.into());

        let area = |kind: AreaKind, ring: Ring, margin_m: f64| {
            let mut attributes = tags.clone();
            attributes.insert("margin_m".into(), margin_m.into());
            AreaPolygon {
                kind,
                ring,
                attributes,
            }
        };
        let primary_margin = self.template.primary_margin_m;
        let secondary_margin = primary_margin + self.template.secondary_margin_m;

        let mut attributes = tags.clone();
        attributes.insert("ias_kt".into(), params.ias_kt.into());
        attributes.insert("altitude".into(), params.altitude.into());
        attributes.insert("altitude_unit".into(), params.altitude_unit.as_str().into());
        attributes.insert("isa_deviation_c".into(), params.isa_deviation_c.into());
        attributes.insert("bank_angle_deg".into(), params.bank_angle_deg.into());
        attributes.insert("turn".into(), turn.direction.as_str().into());
        attributes.insert("outbound_leg_m".into(), run.leg_length_m.into());
        attributes.insert("inbound_track_deg".into(), racetrack.inbound_azimuth_deg.into());

        tracing::info!(
            tas_kt = turn.tas_kt,
            radius_m = turn.radius_m,
            leg_m = run.leg_length_m,
            "holding areas built"
        );

        Ok(ProtectionArea {
            procedure: ProcedureKind::Holding,
            areas: vec![
                area(AreaKind::Primary, primary, primary_margin),
                area(AreaKind::Secondary, secondary, secondary_margin),
            ],
            lines: vec![TrackLine {
                name: "nominal_track".into(),
                points: nominal,
            }],
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::turn_radius;
    use crate::units::knots_to_mps;

    fn params(turn: TurnDirection) -> HoldingParameters {
        HoldingParameters {
            ias_kt: 220.0,
            altitude: 6000.0,
            altitude_unit: DistanceUnit::Feet,
            isa_deviation_c: 15.0,
            bank_angle_deg: 25.0,
            leg_time_min: 1.0,
            turn,
        }
    }

    fn inbound_north() -> RouteGeometry {
        RouteGeometry::whole(vec![Point::new(0.0, -20_000.0), Point::new(0.0, 0.0)]).unwrap()
    }

    fn calculator() -> HoldingPatternCalculator {
        HoldingPatternCalculator::from_config(&EngineConfig::default())
    }

    #[test]
    fn steps_run_in_order() {
        let mut step = HoldingStep::ComputeTurnRadius;
        let mut seen = vec![step];
        while step != HoldingStep::Done {
            step = step.next();
            seen.push(step);
        }
        assert_eq!(
            seen,
            vec![
                HoldingStep::ComputeTurnRadius,
                HoldingStep::BuildOutboundLeg,
                HoldingStep::BuildTurnArc(TurnSide::Inbound),
                HoldingStep::BuildInboundLeg,
                HoldingStep::BuildTurnArc(TurnSide::Outbound),
                HoldingStep::ClosePrimaryArea,
                HoldingStep::BuildSecondaryArea,
                HoldingStep::Done,
            ]
        );
    }

    #[test]
    fn radius_matches_closed_form() {
        let area = calculator()
            .calculate(&inbound_north(), &params(TurnDirection::Right))
            .unwrap();
        let tas = area.attribute("tas_kt").and_then(|v| v.as_f64()).unwrap();
        let radius = area.attribute("turn_radius_m").and_then(|v| v.as_f64()).unwrap();
        let v = knots_to_mps(tas);
        let expected = v * v / (9.81 * 25f64.to_radians().tan());
        assert!(((radius - expected) / expected).abs() < 1e-3);
        assert!((radius - turn_radius(v, 25.0).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn right_hold_lies_east_of_a_northbound_inbound_track() {
        let area = calculator()
            .calculate(&inbound_north(), &params(TurnDirection::Right))
            .unwrap();
        let nominal = &area.lines[0].points;
        assert!(nominal.iter().all(|p| p.x >= -1e-6));
        let primary = area.area(AreaKind::Primary).unwrap();
        let radius = area.attribute("turn_radius_m").and_then(|v| v.as_f64()).unwrap();
        // Center of the racetrack is inside, a point far west is not.
        assert!(primary.ring.contains(&Point::new(radius, -1000.0)));
        assert!(!primary.ring.contains(&Point::new(-radius - 2000.0, -1000.0)));
    }

    #[test]
    fn left_hold_mirrors_right_hold() {
        let right = calculator()
            .calculate(&inbound_north(), &params(TurnDirection::Right))
            .unwrap();
        let left = calculator()
            .calculate(&inbound_north(), &params(TurnDirection::Left))
            .unwrap();
        let r = right.area(AreaKind::Primary).unwrap().ring.area();
        let l = left.area(AreaKind::Primary).unwrap().ring.area();
        assert!((r - l).abs() / r < 1e-9);
        assert!(left.lines[0].points.iter().all(|p| p.x <= 1e-6));
    }

    #[test]
    fn secondary_contains_primary() {
        let area = calculator()
            .calculate(&inbound_north(), &params(TurnDirection::Right))
            .unwrap();
        let primary = &area.area(AreaKind::Primary).unwrap().ring;
        let secondary = &area.area(AreaKind::Secondary).unwrap().ring;
        assert!(secondary.area() > primary.area());
        assert!(primary.points().iter().all(|p| secondary.contains(p)));
        for ring in [primary, secondary] {
            assert!(ring.is_closed());
            assert!(ring.is_simple());
            assert!(ring.signed_area() > 0.0);
        }
    }

    #[test]
    fn primary_area_matches_stadium_formula() {
        let config = EngineConfig {
            arc_tolerance_m: 0.1,
            ..EngineConfig::default()
        };
        let area = HoldingPatternCalculator::from_config(&config)
            .calculate(&inbound_north(), &params(TurnDirection::Right))
            .unwrap();
        let radius = area.attribute("turn_radius_m").and_then(|v| v.as_f64()).unwrap();
        let leg = area.attribute("outbound_leg_m").and_then(|v| v.as_f64()).unwrap();
        let r = radius + config.holding.primary_margin_m;
        let expected = std::f64::consts::PI * r * r + 2.0 * r * leg;
        let actual = area.area(AreaKind::Primary).unwrap().ring.area();
        assert!((actual - expected).abs() / expected < 1e-4);
    }

    #[test]
    fn short_leg_is_still_built() {
        let mut short = params(TurnDirection::Left);
        short.leg_time_min = 0.1;
        let area = calculator().calculate(&inbound_north(), &short).unwrap();
        assert_eq!(area.areas.len(), 2);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let mut bad = params(TurnDirection::Right);
        bad.bank_angle_deg = 90.0;
        assert!(matches!(
            calculator().calculate(&inbound_north(), &bad),
            Err(AreaError::InvalidMagnitude { .. })
        ));
        let mut bad = params(TurnDirection::Right);
        bad.leg_time_min = 0.0;
        assert!(calculator().calculate(&inbound_north(), &bad).is_err());
        let degenerate =
            RouteGeometry::whole(vec![Point::new(5.0, 5.0), Point::new(5.0, 5.0)]).unwrap();
        assert_eq!(
            calculator().calculate(&degenerate, &params(TurnDirection::Right)),
            Err(AreaError::DegenerateSegment)
        );
    }
}
