//! `evac-core` — foundational types for the evacuation route planner.
//!
//! This crate is a dependency of every other `evac-*` crate.  It intentionally
//! has no `evac-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `ZoneId`                            |
//! | [`geo`]     | `GeoPoint`, haversine distance, walk-time estimate      |
//! | [`hazard`]  | `HazardCategory`, `HazardPolygon`, `GeoBounds`          |
//! | [`error`]   | `EvacError`, `EvacResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod hazard;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EvacError, EvacResult};
pub use geo::{walk_minutes, GeoPoint, WALK_SPEED_M_PER_MIN};
pub use hazard::{GeoBounds, HazardCategory, HazardPolygon};
pub use ids::{EdgeId, NodeId, ZoneId};
