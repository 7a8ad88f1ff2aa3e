//! Core error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `PlanError`) and
//! either convert `EvacError` via `From` impls or wrap it as one variant.

use thiserror::Error;

/// The top-level error type for `evac-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EvacError {
    /// A hazard ring with fewer than 3 points cannot enclose anything.
    /// Ingestion skips these (with a warning), it never aborts a plan.
    #[error("malformed hazard polygon: {points} point(s), need at least 3")]
    MalformedPolygon { points: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `evac-*` crates.
pub type EvacResult<T> = Result<T, EvacError>;
