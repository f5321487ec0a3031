//! NDB final approach areas.

use crate::criteria::{EngineConfig, SplayTemplate};
use crate::error::Result;
use crate::models::{ProcedureKind, ProtectionArea, RouteGeometry};
use crate::procedures::approach::{build_splay_area, ApproachParameters};
use crate::procedures::ProcedureCalculator;

/// Splays the final approach area back from the facility at the end of the
/// selected leg.
#[derive(Debug, Clone, PartialEq)]
pub struct NdbApproachCalculator {
    template: SplayTemplate,
}

impl NdbApproachCalculator {
    pub fn new(template: SplayTemplate) -> Self {
        Self { template }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.ndb.clone())
    }
}

impl Default for NdbApproachCalculator {
    fn default() -> Self {
        Self::new(SplayTemplate::ndb_approach())
    }
}

impl ProcedureCalculator for NdbApproachCalculator {
    type Parameters = ApproachParameters;

    fn kind(&self) -> ProcedureKind {
        ProcedureKind::NdbApproach
    }

    fn calculate(&self, route: &RouteGeometry, params: &ApproachParameters) -> Result<ProtectionArea> {
        build_splay_area(self.kind(), &self.template, route, params)
    }
}
