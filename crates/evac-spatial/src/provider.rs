//! Walking-graph provider: fetches a street graph around a coordinate and
//! retries with a doubled radius until origin and destination are connected.
//!
//! # Pluggability
//!
//! The planner consumes graph data through the [`GraphSource`] trait, so
//! applications can plug in any street-network collaborator (tile service,
//! on-disk extract, test fixture) without touching the planning core.  How
//! the graph itself is sourced is out of scope here.
//!
//! # Retry policy
//!
//! Graph construction is the dominant latency cost of a plan and the only
//! operation that is ever retried: fetch at the initial radius, and if the
//! two endpoints do not land on one connected component, double the radius
//! and try again — up to [`RetryPolicy::max_attempts`], never an unbounded
//! loop.  Sources that enforce a caller-supplied timeout should return
//! [`SpatialError::Source`] on expiry; after the attempt budget this
//! surfaces as `GraphUnavailable`.

use evac_core::{GeoPoint, NodeId};

use crate::network::WalkGraph;
use crate::{SpatialError, SpatialResult};

// ── GraphSource ───────────────────────────────────────────────────────────────

/// External street-network collaborator, keyed by (center, radius).
pub trait GraphSource {
    /// Produce a pedestrian graph covering a disc of `radius_m` metres
    /// around `center`.
    ///
    /// The returned graph may still be too small to connect a given pair of
    /// endpoints; [`WalkingGraphProvider`] handles that by expanding.
    fn fetch(&self, center: GeoPoint, radius_m: f64) -> SpatialResult<WalkGraph>;
}

impl<S: GraphSource + ?Sized> GraphSource for &S {
    fn fetch(&self, center: GeoPoint, radius_m: f64) -> SpatialResult<WalkGraph> {
        (**self).fetch(center, radius_m)
    }
}

// ── RetryPolicy ───────────────────────────────────────────────────────────────

/// Default fetch radius for general (non-emergency) queries, metres.
pub const DEFAULT_RADIUS_M: f64 = 1_500.0;

/// Fetch radius used when routing an evacuation around the user, metres.
pub const EMERGENCY_RADIUS_M: f64 = 5_000.0;

/// Expanding-radius retry budget for graph construction.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    /// Radius of the first fetch attempt, metres.  Doubled on each retry.
    pub initial_radius_m: f64,
    /// Total attempts, including the first.  Never retried beyond this.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { initial_radius_m: DEFAULT_RADIUS_M, max_attempts: 3 }
    }
}

impl RetryPolicy {
    /// Policy for emergency evacuation routing: a wider initial window
    /// around the pedestrian.
    pub fn emergency() -> Self {
        Self { initial_radius_m: EMERGENCY_RADIUS_M, max_attempts: 3 }
    }
}

// ── WalkingGraphProvider ──────────────────────────────────────────────────────

/// A graph plus the endpoints resolved onto it, as handed to the planner.
#[derive(Debug)]
pub struct ConnectedGraph {
    pub graph: WalkGraph,
    /// Nearest graph node to the requested origin.
    pub origin: NodeId,
    /// Nearest graph node to the requested destination.
    pub destination: NodeId,
    /// Radius of the successful fetch, metres.
    pub radius_m: f64,
    /// Attempts consumed, including the successful one.
    pub attempts: u32,
}

/// Fetches graphs through a [`GraphSource`] under a [`RetryPolicy`].
pub struct WalkingGraphProvider<S: GraphSource> {
    source: S,
    policy: RetryPolicy,
}

impl<S: GraphSource> WalkingGraphProvider<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch a graph centered on `origin` that connects `origin` and
    /// `destination`, expanding the radius per the policy.
    ///
    /// Connectivity is probed with a plain BFS between the two snapped
    /// endpoints.  Nodes removed later (forbidden zones) can still
    /// disconnect the pair; that case is `NoRoute`, not `GraphUnavailable`,
    /// and is not retried here.
    pub fn connected_graph(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> SpatialResult<ConnectedGraph> {
        let mut radius_m = self.policy.initial_radius_m;
        let mut last_radius_m = radius_m;

        for attempt in 1..=self.policy.max_attempts {
            last_radius_m = radius_m;
            match self.source.fetch(origin, radius_m) {
                Ok(graph) => {
                    let snapped = graph
                        .snap_to_node(origin)
                        .zip(graph.snap_to_node(destination));
                    if let Some((o, d)) = snapped {
                        if graph.connects(o, d) {
                            tracing::debug!(
                                attempt,
                                radius_m,
                                nodes = graph.node_count(),
                                edges = graph.edge_count(),
                                "connected walking graph fetched"
                            );
                            return Ok(ConnectedGraph {
                                graph,
                                origin: o,
                                destination: d,
                                radius_m,
                                attempts: attempt,
                            });
                        }
                    }
                    tracing::debug!(
                        attempt,
                        radius_m,
                        "graph does not connect endpoints; expanding radius"
                    );
                }
                Err(err) => {
                    tracing::warn!(attempt, radius_m, %err, "graph fetch failed");
                }
            }
            radius_m *= 2.0;
        }

        Err(SpatialError::GraphUnavailable {
            attempts: self.policy.max_attempts,
            last_radius_m,
        })
    }
}
