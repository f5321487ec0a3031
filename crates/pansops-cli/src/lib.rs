//! Command line front end for the protection-area engine.
//!
//! - batch: several requests against one route
//! - config: environment and engine configuration loading
//! - input: route files and inline points
//! - package: GeoJSON export of calculated areas

pub mod batch;
pub mod config;
pub mod input;
pub mod package;

pub use batch::{calculate_all, gnss_requests};
pub use config::Config;
pub use input::{build_route, parse_point, RouteFile};
pub use package::{export_file_name, feature_collection, write_geojson};
