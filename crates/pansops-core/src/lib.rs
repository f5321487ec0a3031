pub mod area;
pub mod criteria;
pub mod error;
pub mod models;
pub mod procedures;
pub mod track;
pub mod units;

pub use area::{arc_segment, arc_sweep, offset_polygon, oriented_rectangle, splay_polygon, Ring};
pub use criteria::{EngineConfig, HoldingTemplate, MocTreatment, SplayOrigin, SplayTemplate};
pub use error::{AreaError, Result};
pub use models::{
    AreaKind, AreaPolygon, AttributeValue, Attributes, Point, ProcedureKind, ProtectionArea,
    RouteGeometry, TrackLine, TurnDirection,
};
pub use procedures::{
    calculate, ApproachParameters, ConvInitialApproachCalculator, GnssWaypointCalculator,
    GnssWaypointParameters, HoldingParameters, HoldingPatternCalculator, NdbApproachCalculator,
    ProcedureCalculator, ProcedureRequest,
};
pub use track::{segment_azimuth, turn_radius, TurnParameters};
pub use units::{isa_corrected_tas, to_meters, DistanceUnit};
