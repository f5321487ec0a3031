//! GNSS waypoint fix tolerance areas.

use crate::area::oriented_rectangle;
use crate::error::{AreaError, Result};
use crate::models::{
    AreaKind, AreaPolygon, Attributes, Point, ProcedureKind, ProtectionArea, RouteGeometry,
};
use crate::procedures::ProcedureCalculator;
use crate::track::segment_azimuth;
use crate::units::{to_meters, DistanceUnit};
use serde::{Deserialize, Serialize};

/// ATT as a share of XTT.
pub const ATT_PER_XTT: f64 = 0.8;

/// Along-track tolerance for a cross-track tolerance, same unit.
pub fn along_track_tolerance(xtt: f64) -> f64 {
    ATT_PER_XTT * xtt
}

/// Inputs of a GNSS waypoint tolerance calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GnssWaypointParameters {
    pub waypoint: Point,
    /// Cross-track tolerance, nautical miles
    pub xtt_nm: f64,
}

/// Tolerance rectangle on a waypoint, aligned with the selected routing leg.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GnssWaypointCalculator;

impl ProcedureCalculator for GnssWaypointCalculator {
    type Parameters = GnssWaypointParameters;

    fn kind(&self) -> ProcedureKind {
        ProcedureKind::GnssWaypoint
    }

    fn calculate(
        &self,
        route: &RouteGeometry,
        params: &GnssWaypointParameters,
    ) -> Result<ProtectionArea> {
        let waypoint = params.waypoint;
        if !waypoint.x.is_finite() || !waypoint.y.is_finite() {
            return Err(AreaError::MissingSelection(
                "waypoint coordinates are not finite".into(),
            ));
        }
        let azimuth_deg = segment_azimuth(route)?;
        let xtt_m = to_meters(params.xtt_nm, DistanceUnit::NauticalMiles)?;
        let att_nm = along_track_tolerance(params.xtt_nm);
        let att_m = along_track_tolerance(xtt_m);

        let ring = oriented_rectangle(waypoint, azimuth_deg, att_m, xtt_m)?;
        tracing::info!(xtt_nm = params.xtt_nm, att_nm, "waypoint tolerance built");

        let mut attributes = Attributes::new();
        attributes.insert("xtt_nm".into(), params.xtt_nm.into());
        attributes.insert("att_nm".into(), att_nm.into());
        attributes.insert("xtt_m".into(), xtt_m.into());
        attributes.insert("att_m".into(), att_m.into());
        attributes.insert("track_deg".into(), azimuth_deg.into());
        attributes.insert("waypoint_x_m".into(), waypoint.x.into());
        attributes.insert("waypoint_y_m".into(), waypoint.y.into());

        Ok(ProtectionArea {
            procedure: ProcedureKind::GnssWaypoint,
            areas: vec![AreaPolygon {
                kind: AreaKind::Tolerance,
                ring,
                attributes: attributes.clone(),
            }],
            lines: Vec::new(),
            attributes,
        })
    }
}
