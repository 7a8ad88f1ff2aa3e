//! Spatial-subsystem error type.

use thiserror::Error;

use evac_core::NodeId;

/// Errors produced by `evac-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// No connected walking graph could be fetched, even after expanding the
    /// search radius up to the attempt budget.
    #[error("no connected walking graph after {attempts} attempt(s), last radius {last_radius_m} m")]
    GraphUnavailable { attempts: u32, last_radius_m: f64 },

    /// A connected graph exists but every search strategy (and the plain
    /// fallback) failed to produce a path.
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    /// The graph has no active nodes to snap a coordinate to.
    #[error("walking graph has no usable nodes")]
    EmptyGraph,

    /// The external graph-data collaborator failed (network error, timeout).
    #[error("graph source error: {0}")]
    Source(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
