//! Error types for field generation, field construction and path planning.
//!
//! Expected outcomes (a rejected candidate polygon, a rejected click) are not
//! errors and live next to the code that produces them.

use thiserror::Error;

use crate::field::CandidateRejection;
use crate::selection::Role;

/// Errors raised while generating a polygon field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The bounding square has a non-finite or non-positive side.
    #[error("invalid domain: side length {size} must be finite and positive")]
    InvalidDomain { size: f64 },

    /// The lower-left corner of the bounding square is not finite.
    #[error("invalid domain corner ({min_x}, {min_y}): coordinates must be finite")]
    InvalidCorner { min_x: f64, min_y: f64 },

    /// Edge count bounds do not describe a usable range.
    #[error("invalid edge range {min}..={max}: need 3 <= min <= max")]
    InvalidEdgeRange { min: usize, max: usize },

    /// Window shrink factor outside (0, 1].
    #[error("shrink factor {0} must lie in (0, 1]")]
    InvalidShrinkFactor(f64),

    /// The retry budget ran out before every polygon was placed.
    #[error(
        "placed {placed} of {requested} polygons before exhausting {attempts} candidate attempts"
    )]
    Exhausted {
        placed: usize,
        requested: usize,
        attempts: u64,
    },
}

/// Errors raised when building a field from caller-supplied rings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("polygon {index} rejected: {reason}")]
    Invalid {
        index: usize,
        reason: CandidateRejection,
    },

    #[error("polygon {index} has a vertex outside the domain")]
    OutOfDomain { index: usize },
}

/// Errors raised by the path planner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// An endpoint is non-finite or lies inside or on the boundary of an obstacle.
    #[error("{role} point ({x}, {y}) must be finite and outside every polygon")]
    InvalidEndpoint { role: Role, x: f64, y: f64 },
}
