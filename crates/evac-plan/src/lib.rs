//! `evac-plan` — the hazard-aware evacuation route planner.
//!
//! Consumes a street-graph source and a hazard-polygon store (both traits,
//! implemented by the surrounding application), and produces an evacuation
//! route with a human-interpretable safety assessment — or a typed outcome
//! when no realistic route exists.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`planner`] | `RoutePlanner`, `PlanConfig`, `PlanRequest`, `RoutePlan` |
//! | [`safety`]  | `SafetyTier`, `SafetyAssessment`, length correction      |
//! | [`error`]   | `PlanError`, `PlanResult<T>`                             |
//!
//! # Example
//!
//! ```rust,ignore
//! let planner = RoutePlanner::new(street_source, hazard_db, PlanConfig::emergency());
//! let request = PlanRequest::new(user_position, shelter_position)
//!     .with_categories(vec![HazardCategory::Water, HazardCategory::Forbidden]);
//! match planner.plan(&request)? {
//!     RoutePlan::Route(route) => show(route),
//!     RoutePlan::DestinationTooFar { .. } => show_too_far_notice(),
//! }
//! ```

pub mod error;
pub mod planner;
pub mod safety;


pub use error::{PlanError, PlanResult};
pub use planner::{PlanConfig, PlanRequest, RoutePlan, RoutePlanner, RouteResult};
pub use safety::{
    assess, corrected_length, warning_text, CorrectedLength, SafetyAssessment,
    SafetyTier,
};
