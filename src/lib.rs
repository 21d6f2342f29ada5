//! polyroute - Random non-overlapping polygon arenas with single-deflection routing

pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod field;
pub mod geometry;
pub mod planner;
pub mod selection;

pub use domain::{Deflection, Route};
pub use error::{FieldError, GenerationError, PlanError};
pub use field::{CandidateRejection, GeneratorConfig, PolygonField};
pub use geometry::Domain;
pub use planner::plan;
pub use selection::{Phase, RejectReason, Role, Selection, SelectionState};

/// Default generation parameters.
///
/// The arena is the square [0, 10] x [0, 10]. Candidates get 3 to 7 edges.
/// Each polygon may use `MAX_ATTEMPTS` candidates in full-domain sampling,
/// then `SHRINK_ROUNDS` more batches with the sampling window halved each time
/// (10 -> 5 -> 2.5 -> 1.25 -> 0.625).
pub mod defaults {
    pub const DOMAIN_SIZE: f64 = 10.0;

    pub const MIN_EDGES: usize = 3;
    pub const MAX_EDGES: usize = 7;

    pub const MAX_ATTEMPTS: u32 = 20_000;
    pub const SHRINK_ROUNDS: u32 = 4;
    pub const SHRINK_FACTOR: f64 = 0.5;

    pub const POLYGON_COUNT: usize = 5;

    /// Samples drawn when looking for a free start or goal point
    pub const FREE_POINT_ATTEMPTS: u32 = 10_000;
}
