//! `evac-spatial` — walking graph, hazard zone indexing, and route search.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`network`]  | `WalkGraph` (CSR + R-tree), `WalkGraphBuilder`              |
//! | [`zones`]    | `HazardZoneIndex`, `HazardStore` trait                      |
//! | [`provider`] | `GraphSource` trait, `RetryPolicy`, `WalkingGraphProvider`  |
//! | [`search`]   | `SearchStrategy` table, `RouteSearchEngine`, risk scoring   |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod network;
pub mod provider;
pub mod search;
pub mod zones;


pub use error::{SpatialError, SpatialResult};
pub use network::{WalkGraph, WalkGraphBuilder};
pub use provider::{
    ConnectedGraph, GraphSource, RetryPolicy, WalkingGraphProvider, DEFAULT_RADIUS_M,
    EMERGENCY_RADIUS_M,
};
pub use search::{
    composite_score, risk_stats, RiskStats, RouteCandidate, RouteSearchEngine,
    SearchStrategy, DEFAULT_STRATEGIES,
};
pub use zones::{HazardStore, HazardZoneIndex};
