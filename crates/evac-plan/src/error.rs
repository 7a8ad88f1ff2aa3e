//! Planner error type.
//!
//! `DestinationTooFar` is deliberately **not** here: a shelter beyond
//! walking range is a policy outcome the planner reports as a normal
//! result variant, not a failure.

use thiserror::Error;

use evac_core::EvacError;
use evac_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum PlanError {
    /// No connected walking graph could be built, even after expanding the
    /// search radius up to the attempt budget.
    #[error(
        "no walking network could be loaded around the starting point \
         ({attempts} attempt(s), up to {last_radius_m:.0} m)"
    )]
    GraphUnavailable { attempts: u32, last_radius_m: f64 },

    /// A walking network exists, but no path to the shelter survives the
    /// impassable areas.
    #[error("no evacuation route reaches the destination; impassable areas block every path")]
    NoRouteFound,

    #[error(transparent)]
    Core(#[from] EvacError),

    /// Any other spatial-subsystem failure.
    #[error("spatial error: {0}")]
    Spatial(SpatialError),
}

impl From<SpatialError> for PlanError {
    fn from(err: SpatialError) -> Self {
        match err {
            SpatialError::GraphUnavailable { attempts, last_radius_m } => {
                PlanError::GraphUnavailable { attempts, last_radius_m }
            }
            SpatialError::NoRoute { .. } | SpatialError::EmptyGraph => {
                PlanError::NoRouteFound
            }
            other => PlanError::Spatial(other),
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
