//! Splayed approach areas shared by the NDB and conventional initial approach
//! calculators.

use crate::area::splay_polygon;
use crate::criteria::{MocTreatment, SplayOrigin, SplayTemplate};
use crate::error::{ensure_non_negative, ensure_positive, AreaError, Result};
use crate::models::{
    AreaKind, AreaPolygon, Attributes, ProcedureKind, ProtectionArea, RouteGeometry, TrackLine,
};
use crate::track::{normalize_azimuth, segment_azimuth, segment_endpoints, segment_length};
use crate::units::{to_feet, to_meters, DistanceUnit};
use serde::{Deserialize, Serialize};

/// Inputs of an approach-segment calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachParameters {
    pub procedure_altitude_ft: f64,
    /// Minimum obstacle clearance, in `moc_unit`
    pub moc_value: f64,
    pub moc_unit: DistanceUnit,
}

impl Default for ApproachParameters {
    fn default() -> Self {
        Self {
            procedure_altitude_ft: 1000.0,
            moc_value: 300.0,
            moc_unit: DistanceUnit::Feet,
        }
    }
}

pub(crate) fn build_splay_area(
    procedure: ProcedureKind,
    template: &SplayTemplate,
    route: &RouteGeometry,
    params: &ApproachParameters,
) -> Result<ProtectionArea> {
    let track_deg = segment_azimuth(route)?;
    let length_m = segment_length(route)?;
    let altitude_ft = ensure_positive("procedure altitude", params.procedure_altitude_ft)?;
    let moc_m = to_meters(params.moc_value, params.moc_unit)?;

    let fraction = template.primary_fraction;
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(AreaError::magnitude("primary fraction", fraction));
    }
    let half_width_m = match template.moc_treatment {
        MocTreatment::Annotate => template.near_half_width_m,
        MocTreatment::InflateLateral { factor } => {
            template.near_half_width_m + ensure_non_negative("MOC inflation factor", factor)? * moc_m
        }
    };

    let (start, end) = segment_endpoints(route);
    let (origin, azimuth_deg) = match template.origin {
        SplayOrigin::SegmentStart => (start, track_deg),
        SplayOrigin::SegmentEnd => (end, normalize_azimuth(track_deg + 180.0)),
    };
    tracing::debug!(
        %procedure,
        azimuth_deg,
        length_m,
        half_width_m,
        "building splay area"
    );

    let full = splay_polygon(
        origin,
        azimuth_deg,
        template.splay_angle_deg,
        length_m,
        2.0 * half_width_m,
    )?;
    let primary_splay_deg = (fraction * template.splay_angle_deg.to_radians().tan())
        .atan()
        .to_degrees();
    let primary = splay_polygon(
        origin,
        azimuth_deg,
        primary_splay_deg,
        length_m,
        2.0 * half_width_m * fraction,
    )?;

    let mut primary_attributes = Attributes::new();
    primary_attributes.insert("moc_m".into(), moc_m.into());
    let mut secondary_attributes = Attributes::new();
    secondary_attributes.insert("moc_inner_edge_m".into(), moc_m.into());
    secondary_attributes.insert("moc_outer_edge_m".into(), 0.0.into());

    let mut attributes = Attributes::new();
    attributes.insert("procedure_altitude_ft".into(), altitude_ft.into());
    attributes.insert("moc_value".into(), params.moc_value.into());
    attributes.insert("moc_unit".into(), params.moc_unit.as_str().into());
    attributes.insert("moc_m".into(), moc_m.into());
    attributes.insert(
        "max_obstacle_elevation_ft".into(),
        (altitude_ft - to_feet(moc_m)).into(),
    );
    attributes.insert("track_deg".into(), track_deg.into());
    attributes.insert("length_m".into(), length_m.into());
    attributes.insert("near_half_width_m".into(), half_width_m.into());
    attributes.insert("splay_angle_deg".into(), template.splay_angle_deg.into());

    tracing::info!(%procedure, moc_m, "approach areas built");

    Ok(ProtectionArea {
        procedure,
        areas: vec![
            AreaPolygon {
                kind: AreaKind::Primary,
                ring: primary,
                attributes: primary_attributes,
            },
            AreaPolygon {
                kind: AreaKind::Secondary,
                ring: full,
                attributes: secondary_attributes,
            },
        ],
        lines: vec![TrackLine {
            name: "nominal_track".into(),
            points: vec![origin, origin.offset(azimuth_deg, length_m)],
        }],
        attributes,
    })
}
