//! Conventional initial approach segment areas.

use crate::criteria::{EngineConfig, SplayTemplate};
use crate::error::Result;
use crate::models::{ProcedureKind, ProtectionArea, RouteGeometry};
use crate::procedures::approach::{build_splay_area, ApproachParameters};
use crate::procedures::ProcedureCalculator;

/// Builds the initial approach area along the selected leg, starting at the IAF.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvInitialApproachCalculator {
    template: SplayTemplate,
}

impl ConvInitialApproachCalculator {
    pub fn new(template: SplayTemplate) -> Self {
        Self { template }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.conv_initial.clone())
    }
}

impl Default for ConvInitialApproachCalculator {
    fn default() -> Self {
        Self::new(SplayTemplate::conv_initial_approach())
    }
}

impl ProcedureCalculator for ConvInitialApproachCalculator {
    type Parameters = ApproachParameters;

    fn kind(&self) -> ProcedureKind {
        ProcedureKind::ConvInitialApproach
    }

    fn calculate(&self, route: &RouteGeometry, params: &ApproachParameters) -> Result<ProtectionArea> {
        build_splay_area(self.kind(), &self.template, route, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaKind, Point};
    use crate::units::{DistanceUnit, METERS_PER_NAUTICAL_MILE};

    #[test]
    fn corridor_is_five_miles_each_side() {
        // Initial track flown east from the IAF for 20 km.
        let route =
            RouteGeometry::whole(vec![Point::new(0.0, 0.0), Point::new(20_000.0, 0.0)]).unwrap();
        let area = ConvInitialApproachCalculator::default()
            .calculate(&route, &ApproachParameters::default())
            .unwrap();

        let full = &area.area(AreaKind::Secondary).unwrap().ring;
        let half = 5.0 * METERS_PER_NAUTICAL_MILE;
        assert!((full.area() - 20_000.0 * 2.0 * half).abs() < 1e-3);
        assert!(full.contains(&Point::new(10_000.0, half - 10.0)));
        assert!(!full.contains(&Point::new(10_000.0, half + 10.0)));
        assert!(!full.contains(&Point::new(-10.0, 0.0)));

        let primary = &area.area(AreaKind::Primary).unwrap().ring;
        assert!(primary.contains(&Point::new(19_990.0, half / 2.0 - 10.0)));
        assert!(!primary.contains(&Point::new(19_990.0, half / 2.0 + 10.0)));
    }

    #[test]
    fn reports_altitude_and_moc_in_meters_unit() {
        let route =
            RouteGeometry::whole(vec![Point::new(0.0, 0.0), Point::new(0.0, 9_000.0)]).unwrap();
        let params = ApproachParameters {
            procedure_altitude_ft: 4000.0,
            moc_value: 300.0,
            moc_unit: DistanceUnit::Meters,
        };
        let area = ConvInitialApproachCalculator::default()
            .calculate(&route, &params)
            .unwrap();
        assert_eq!(area.procedure, ProcedureKind::ConvInitialApproach);
        assert_eq!(area.attribute("moc_unit").and_then(|v| v.as_str()), Some("m"));
        assert_eq!(area.attribute("moc_value").and_then(|v| v.as_f64()), Some(300.0));
        let max_obstacle = area
            .attribute("max_obstacle_elevation_ft")
            .and_then(|v| v.as_f64())
            .unwrap();
        assert!((max_obstacle - (4000.0 - 300.0 / 0.3048)).abs() < 1e-9);
    }

    #[test]
    fn uses_only_the_selected_leg() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10_000.0),
            Point::new(10_000.0, 10_000.0),
        ];
        let route = RouteGeometry::new(points, 1, 2).unwrap();
        let area = ConvInitialApproachCalculator::default()
            .calculate(&route, &ApproachParameters::default())
            .unwrap();
        let track = area.attribute("track_deg").and_then(|v| v.as_f64()).unwrap();
        assert!((track - 90.0).abs() < 1e-9);
        assert_eq!(area.lines[0].points[0], Point::new(0.0, 10_000.0));
    }
}
