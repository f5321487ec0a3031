//! Running several requests against one route.

use anyhow::{Context, Result};
use pansops_core::{
    EngineConfig, GnssWaypointParameters, Point, ProcedureRequest, ProtectionArea, RouteGeometry,
};

/// One GNSS tolerance request per waypoint, all on the same routing leg.
pub fn gnss_requests(waypoints: &[Point], xtt_nm: f64) -> Vec<ProcedureRequest> {
    waypoints
        .iter()
        .map(|&waypoint| ProcedureRequest::GnssWaypoint(GnssWaypointParameters { waypoint, xtt_nm }))
        .collect()
}

/// Calculate every request in order. The first failure aborts the batch.
pub fn calculate_all(
    route: &RouteGeometry,
    requests: &[ProcedureRequest],
    engine: &EngineConfig,
) -> Result<Vec<ProtectionArea>> {
    requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            request
                .calculate(route, engine)
                .with_context(|| format!("{} calculation {} failed", request.kind(), index + 1))
        })
        .collect()
}
