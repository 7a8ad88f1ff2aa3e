//! The route planner: ties graph fetch, hazard classification, search, and
//! safety assessment into one per-request pipeline.
//!
//! # Pipeline
//!
//! 1. Straight-line cutoff — a shelter beyond 10 km is not a walking target.
//! 2. Fetch a connected graph through the provider (the only retried step).
//! 3. Load the hazard snapshot around the origin (±0.1° window).
//! 4. Delete nodes inside forbidden zones; re-snap both endpoints.
//! 5. Mark risk nodes for the remaining active categories.
//! 6. Run the strategy table, pick the best candidate.
//! 7. Sanity-correct the length, apply the cutoff again, classify safety.
//!
//! Every step owns its data: one request gets its own graph, zone snapshot,
//! and risk set.  Nothing is shared across concurrent plans.

use rustc_hash::FxHashSet;

use evac_core::{walk_minutes, GeoPoint, HazardCategory};
use evac_spatial::{
    GraphSource, HazardStore, HazardZoneIndex, RetryPolicy, RouteSearchEngine,
    WalkingGraphProvider, DEFAULT_RADIUS_M, EMERGENCY_RADIUS_M,
};

use crate::safety::{assess, corrected_length, warning_text, SafetyAssessment};
use crate::{PlanError, PlanResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Planner-wide defaults; individual requests may override the graph-fetch
/// budget via [`PlanRequest`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanConfig {
    /// Radius of the first graph fetch, metres.  Doubled per retry.
    pub initial_radius_m: f64,

    /// Graph-fetch attempts, including the first.
    pub max_graph_attempts: u32,

    /// Half-width of the hazard prefetch window around the origin, degrees.
    /// 0.1° ≈ 11 km.
    pub prefilter_margin_deg: f64,

    /// Routes longer than this (corrected length or straight line) are
    /// reported as not a realistic walking target.
    pub max_walk_m: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            initial_radius_m: DEFAULT_RADIUS_M,
            max_graph_attempts: 3,
            prefilter_margin_deg: 0.1,
            max_walk_m: 10_000.0,
        }
    }
}

impl PlanConfig {
    /// Configuration for emergency evacuation: a wider initial graph window
    /// centred on the pedestrian.
    pub fn emergency() -> Self {
        Self { initial_radius_m: EMERGENCY_RADIUS_M, ..Self::default() }
    }
}

/// One planning request: where the pedestrian is, where the shelter is, and
/// which hazard categories are active for the current disaster.
///
/// Immutable for the duration of the plan; the planner never mutates it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Active hazard categories.  `Forbidden` deletes nodes; the rest mark
    /// risk.  An empty list plans by distance alone.
    pub categories: Vec<HazardCategory>,
    /// Per-request override of [`PlanConfig::initial_radius_m`].
    pub initial_radius_m: Option<f64>,
    /// Per-request override of [`PlanConfig::max_graph_attempts`].
    pub max_attempts: Option<u32>,
}

impl PlanRequest {
    pub fn new(origin: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            origin,
            destination,
            categories: Vec::new(),
            initial_radius_m: None,
            max_attempts: None,
        }
    }

    pub fn with_categories(mut self, categories: Vec<HazardCategory>) -> Self {
        self.categories = categories;
        self
    }
}

// ── Outcome types ─────────────────────────────────────────────────────────────

/// A successful plan: either a walkable route, or the policy outcome that no
/// evacuation route is needed because the destination is beyond walking
/// range.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RoutePlan {
    Route(RouteResult),
    /// The destination is not a realistic walking target.
    DestinationTooFar { straight_line_m: f64 },
}

impl RoutePlan {
    pub fn route(&self) -> Option<&RouteResult> {
        match self {
            RoutePlan::Route(r) => Some(r),
            RoutePlan::DestinationTooFar { .. } => None,
        }
    }
}

/// The chosen evacuation route, ready for the display layer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteResult {
    /// Route geometry, origin-side first.
    pub path: Vec<GeoPoint>,
    /// Corrected walking length in metres.
    pub length_m: f64,
    /// `true` when the length is the straight-line estimate rather than the
    /// graph-derived sum (see `safety::corrected_length`).
    pub length_estimated: bool,
    /// Estimated walking time at 80 m/min.
    pub walk_minutes: u64,
    pub assessment: SafetyAssessment,
    /// Present when the route crosses hazard zones.
    pub warning: Option<String>,
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Hazard-aware evacuation route planner.
///
/// Generic over its two collaborators: a street-graph source and a hazard
/// polygon store, both implemented by the surrounding application.
pub struct RoutePlanner<S: GraphSource, H: HazardStore> {
    source: S,
    store: H,
    config: PlanConfig,
    engine: RouteSearchEngine,
}

impl<S: GraphSource, H: HazardStore> RoutePlanner<S, H> {
    pub fn new(source: S, store: H, config: PlanConfig) -> Self {
        Self { source, store, config, engine: RouteSearchEngine::default() }
    }

    /// Replace the default strategy table.
    pub fn with_engine(mut self, engine: RouteSearchEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Plan an evacuation route for one request.
    ///
    /// Returns a [`RoutePlan`] on success (route or too-far), or a
    /// [`PlanError`] when no graph or no surviving path exists.
    pub fn plan(&self, req: &PlanRequest) -> PlanResult<RoutePlan> {
        let straight_line_m = req.origin.distance_m(req.destination);
        if straight_line_m > self.config.max_walk_m {
            tracing::debug!(straight_line_m, "destination beyond walking range");
            return Ok(RoutePlan::DestinationTooFar { straight_line_m });
        }

        // 1. Connected graph, with expanding-radius retries.
        let policy = RetryPolicy {
            initial_radius_m: req
                .initial_radius_m
                .unwrap_or(self.config.initial_radius_m),
            max_attempts: req.max_attempts.unwrap_or(self.config.max_graph_attempts),
        };
        let provider = WalkingGraphProvider::new(&self.source, policy);
        let connected = provider.connected_graph(req.origin, req.destination)?;
        let mut graph = connected.graph;

        // 2. Hazard snapshot around the pedestrian.
        let zones = HazardZoneIndex::from_store(
            &self.store,
            &req.categories,
            req.origin,
            self.config.prefilter_margin_deg,
        );

        // 3. Forbidden zones delete nodes outright, before anything else.
        for category in req.categories.iter().filter(|c| c.is_blocking()) {
            let blocked = zones.nodes_inside(&graph, *category);
            if !blocked.is_empty() {
                tracing::debug!(
                    %category,
                    removed = blocked.len(),
                    "removing impassable nodes"
                );
                graph.remove_nodes(&blocked);
            }
        }

        // Removal may have taken out the snapped endpoints; re-snap onto
        // the surviving graph.
        let origin_node = graph
            .snap_to_node(req.origin)
            .ok_or(PlanError::NoRouteFound)?;
        let dest_node = graph
            .snap_to_node(req.destination)
            .ok_or(PlanError::NoRouteFound)?;

        // 4. Risk marking for the non-blocking active categories.
        let mut risk_nodes = FxHashSet::default();
        for category in req.categories.iter().filter(|c| !c.is_blocking()) {
            risk_nodes.extend(zones.nodes_inside(&graph, *category));
        }
        tracing::debug!(
            risk_nodes = risk_nodes.len(),
            active = graph.active_node_count(),
            "graph prepared for search"
        );

        // 5. Multi-strategy search; engine handles the plain fallback.
        let best = self
            .engine
            .best_route(&graph, origin_node, dest_node, &risk_nodes)?;

        // 6. Length plausibility and the walking-range cutoff.
        let corrected = corrected_length(best.length_m, straight_line_m);
        if corrected.length_m > self.config.max_walk_m {
            tracing::debug!(
                length_m = corrected.length_m,
                "route exceeds walking range"
            );
            return Ok(RoutePlan::DestinationTooFar { straight_line_m });
        }

        // 7. Safety report from the exact statistics that drove selection.
        let assessment = assess(best.stats, best.nodes.len());
        let warning = warning_text(best.stats);

        let path = best
            .nodes
            .iter()
            .map(|&n| graph.node_pos[n.index()])
            .collect();

        Ok(RoutePlan::Route(RouteResult {
            path,
            length_m: corrected.length_m,
            length_estimated: corrected.estimated,
            walk_minutes: walk_minutes(corrected.length_m),
            assessment,
            warning,
        }))
    }
}
