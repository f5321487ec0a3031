//! Procedure calculators and the request type that dispatches between them.

pub mod approach;
pub mod conv_initial;
pub mod gnss;
pub mod holding;
pub mod ndb;

use crate::criteria::EngineConfig;
use crate::error::Result;
use crate::models::{ProcedureKind, ProtectionArea, RouteGeometry};
use serde::{Deserialize, Serialize};

pub use approach::ApproachParameters;
pub use conv_initial::ConvInitialApproachCalculator;
pub use gnss::{along_track_tolerance, GnssWaypointCalculator, GnssWaypointParameters};
pub use holding::{HoldingParameters, HoldingPatternCalculator, HoldingStep, TurnSide};
pub use ndb::NdbApproachCalculator;

/// One protection-area construction algorithm.
///
/// Calculators hold only their configuration; each call builds a fresh
/// [`ProtectionArea`] from the route and parameters it is given.
pub trait ProcedureCalculator {
    type Parameters;

    fn kind(&self) -> ProcedureKind;

    fn calculate(&self, route: &RouteGeometry, params: &Self::Parameters)
        -> Result<ProtectionArea>;
}

/// A calculation request for any of the supported procedures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "procedure", rename_all = "snake_case")]
pub enum ProcedureRequest {
    Holding(HoldingParameters),
    NdbApproach(ApproachParameters),
    #[serde(rename = "conv_initial_approach")]
    ConventionalInitialApproach(ApproachParameters),
    GnssWaypoint(GnssWaypointParameters),
}

impl ProcedureRequest {
    pub fn kind(&self) -> ProcedureKind {
        match self {
            ProcedureRequest::Holding(_) => ProcedureKind::Holding,
            ProcedureRequest::NdbApproach(_) => ProcedureKind::NdbApproach,
            ProcedureRequest::ConventionalInitialApproach(_) => ProcedureKind::ConvInitialApproach,
            ProcedureRequest::GnssWaypoint(_) => ProcedureKind::GnssWaypoint,
        }
    }

    /// Run the matching calculator configured from `config`.
    pub fn calculate(&self, route: &RouteGeometry, config: &EngineConfig) -> Result<ProtectionArea> {
        let span = tracing::debug_span!("calculate", procedure = %self.kind());
        let _enter = span.enter();

        let result = match self {
            ProcedureRequest::Holding(params) => {
                HoldingPatternCalculator::from_config(config).calculate(route, params)
            }
            ProcedureRequest::NdbApproach(params) => {
                NdbApproachCalculator::from_config(config).calculate(route, params)
            }
            ProcedureRequest::ConventionalInitialApproach(params) => {
                ConvInitialApproachCalculator::from_config(config).calculate(route, params)
            }
            ProcedureRequest::GnssWaypoint(params) => {
                GnssWaypointCalculator.calculate(route, params)
            }
        };
        match &result {
            Ok(area) => tracing::info!(
                procedure = %self.kind(),
                rings = area.areas.len(),
                lines = area.lines.len(),
                "calculation finished"
            ),
            Err(err) => tracing::warn!(procedure = %self.kind(), "calculation failed: {}", err),
        }
        result
    }
}

/// Run `request` against `route` with the default engine configuration.
pub fn calculate(route: &RouteGeometry, request: &ProcedureRequest) -> Result<ProtectionArea> {
    request.calculate(route, &EngineConfig::default())
}
