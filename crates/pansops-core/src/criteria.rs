//! Procedure design templates and engine configuration.

use crate::units::METERS_PER_NAUTICAL_MILE;
use serde::{Deserialize, Serialize};

/// Default maximum chord deviation for tessellated arcs, meters.
pub const DEFAULT_ARC_TOLERANCE_M: f64 = 1.0;

/// Configuration shared by all calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum chord deviation of tessellated arcs in meters
    pub arc_tolerance_m: f64,
    pub holding: HoldingTemplate,
    pub ndb: SplayTemplate,
    pub conv_initial: SplayTemplate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            arc_tolerance_m: DEFAULT_ARC_TOLERANCE_M,
            holding: HoldingTemplate::default(),
            ndb: SplayTemplate::ndb_approach(),
            conv_initial: SplayTemplate::conv_initial_approach(),
        }
    }
}

/// Margins applied around the nominal holding racetrack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingTemplate {
    /// Expansion of the racetrack to the primary area boundary, meters
    pub primary_margin_m: f64,
    /// Further expansion from the primary to the secondary (buffer) boundary, meters
    pub secondary_margin_m: f64,
}

impl Default for HoldingTemplate {
    fn default() -> Self {
        Self {
            primary_margin_m: METERS_PER_NAUTICAL_MILE,
            secondary_margin_m: 5.0 * METERS_PER_NAUTICAL_MILE,
        }
    }
}

/// Which end of the reference leg a splay grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplayOrigin {
    /// Grow from the leg start along the track.
    SegmentStart,
    /// Grow from the leg end back along the reciprocal track.
    SegmentEnd,
}

/// How the minimum obstacle clearance feeds into the area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MocTreatment {
    /// Reported as an attribute only; polygon shape is unaffected.
    Annotate,
    /// Widen the near half-width by `factor` times the MOC in meters.
    InflateLateral { factor: f64 },
}

/// Shape of a splayed approach area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplayTemplate {
    pub origin: SplayOrigin,
    /// Half of the area width at the facility or fix, meters
    pub near_half_width_m: f64,
    /// Divergence of each side from the track, degrees
    pub splay_angle_deg: f64,
    /// Share of the total width that is primary area (0, 1]
    pub primary_fraction: f64,
    pub moc_treatment: MocTreatment,
}

impl SplayTemplate {
    /// NDB final approach: ±2.5 km at the facility, 10.3° splay.
    pub fn ndb_approach() -> Self {
        Self {
            origin: SplayOrigin::SegmentEnd,
            near_half_width_m: 2500.0,
            splay_angle_deg: 10.3,
            primary_fraction: 0.5,
            moc_treatment: MocTreatment::Annotate,
        }
    }

    /// Conventional initial approach: ±5 NM corridor along the initial track.
    pub fn conv_initial_approach() -> Self {
        Self {
            origin: SplayOrigin::SegmentStart,
            near_half_width_m: 5.0 * METERS_PER_NAUTICAL_MILE,
            splay_angle_deg: 0.0,
            primary_fraction: 0.5,
            moc_treatment: MocTreatment::Annotate,
        }
    }
}
