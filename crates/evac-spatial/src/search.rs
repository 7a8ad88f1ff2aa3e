//! Multi-strategy route search with risk-aware candidate selection.
//!
//! # Strategy table
//!
//! Strategies run in a **fixed, declared priority order** so identical
//! inputs always select the same route:
//!
//! | # | Strategy                  | Search weight            |
//! |---|---------------------------|--------------------------|
//! | 1 | Plain shortest path       | edge length              |
//! | 2 | Length-weighted shortest  | edge length × 1.5        |
//! | 3 | Length-weighted shortest  | edge length × 2.0        |
//! | 4 | A* (straight-line h)      | edge length              |
//!
//! Every candidate reports its **true** length — the sum of unscaled edge
//! lengths along the path — never the weight used during search.
//!
//! # Composite score
//!
//! `risk_count * 1000 + max_consecutive_risk * 5000 + length_m`, lower is
//! better.  The relative weights are policy: a long unbroken hazardous
//! stretch outranks scattered risky nodes, which outrank raw distance.
//! Ties break by true length, then by strategy priority.
//!
//! # Cost units
//!
//! Search costs are integer **millimetres** (u64) so heap ordering is exact
//! and deterministic; lengths are converted back to metres (f64) only for
//! reporting.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use evac_core::{EdgeId, GeoPoint, NodeId};

use crate::network::WalkGraph;
use crate::{SpatialError, SpatialResult};

// ── Strategy table ────────────────────────────────────────────────────────────

/// One entry of the search-strategy table.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    /// Dijkstra over edge length scaled by `length_factor`.
    Shortest { length_factor: f64 },
    /// A* over edge length with a straight-line (great-circle) heuristic.
    AStar,
}

/// The default strategy table, in priority order.
pub const DEFAULT_STRATEGIES: [SearchStrategy; 4] = [
    SearchStrategy::Shortest { length_factor: 1.0 },
    SearchStrategy::Shortest { length_factor: 1.5 },
    SearchStrategy::Shortest { length_factor: 2.0 },
    SearchStrategy::AStar,
];

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::Shortest { length_factor } => {
                write!(f, "shortest(x{length_factor})")
            }
            SearchStrategy::AStar => f.write_str("a-star"),
        }
    }
}

// ── Risk statistics ───────────────────────────────────────────────────────────

/// Risk profile of one candidate path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskStats {
    /// Path nodes that fall inside an active-category hazard polygon.
    pub risk_count: usize,
    /// Longest unbroken run of risky nodes along the path; resets to zero
    /// on any safe node.
    pub max_consecutive: usize,
}

/// Count risky nodes and the worst consecutive run along `path`.
///
/// This is the single scoring routine shared by the search loop and the
/// final safety report, so the assessment shown to the caller is always the
/// value that drove selection.
pub fn risk_stats(path: &[NodeId], risk_nodes: &FxHashSet<NodeId>) -> RiskStats {
    let mut stats = RiskStats::default();
    let mut run = 0usize;
    for node in path {
        if risk_nodes.contains(node) {
            stats.risk_count += 1;
            run += 1;
            stats.max_consecutive = stats.max_consecutive.max(run);
        } else {
            run = 0;
        }
    }
    stats
}

/// Composite candidate score; lower is better.
#[inline]
pub fn composite_score(stats: RiskStats, length_m: f64) -> f64 {
    stats.risk_count as f64 * 1_000.0
        + stats.max_consecutive as f64 * 5_000.0
        + length_m
}

// ── RouteCandidate ────────────────────────────────────────────────────────────

/// One successful search attempt: the path, its true length, and its risk
/// profile.  Discarded once the best candidate is chosen.
#[derive(Clone, Debug)]
pub struct RouteCandidate {
    /// Node sequence from origin to destination (single node when they
    /// snap to the same graph node).
    pub nodes: Vec<NodeId>,
    /// True walking length in metres — unscaled edge lengths summed.
    pub length_m: f64,
    pub stats: RiskStats,
    pub score: f64,
    /// The strategy that produced this candidate.
    pub strategy: SearchStrategy,
}

// ── RouteSearchEngine ─────────────────────────────────────────────────────────

/// Runs the strategy table over one graph and picks the lowest-scoring
/// candidate.
pub struct RouteSearchEngine {
    strategies: Vec<SearchStrategy>,
}

impl Default for RouteSearchEngine {
    fn default() -> Self {
        Self { strategies: DEFAULT_STRATEGIES.to_vec() }
    }
}

impl RouteSearchEngine {
    /// An engine with a custom strategy table.  Order is priority order.
    pub fn new(strategies: Vec<SearchStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[SearchStrategy] {
        &self.strategies
    }

    /// Run every strategy and select the best candidate.
    ///
    /// Selection: lowest composite score; ties by shortest true length,
    /// then by strategy priority (earlier wins).  If every strategy fails,
    /// one plain shortest-path fallback runs before surfacing
    /// [`SpatialError::NoRoute`].
    pub fn best_route(
        &self,
        graph: &WalkGraph,
        from: NodeId,
        to: NodeId,
        risk_nodes: &FxHashSet<NodeId>,
    ) -> SpatialResult<RouteCandidate> {
        let mut best: Option<RouteCandidate> = None;

        for &strategy in &self.strategies {
            let Some((nodes, length_m)) = run_strategy(graph, from, to, strategy) else {
                tracing::debug!(%strategy, "search strategy found no path");
                continue;
            };
            let stats = risk_stats(&nodes, risk_nodes);
            let score = composite_score(stats, length_m);
            tracing::debug!(
                %strategy,
                nodes = nodes.len(),
                length_m,
                risk = stats.risk_count,
                run = stats.max_consecutive,
                score,
                "search strategy produced a candidate"
            );

            let better = match &best {
                None => true,
                Some(b) => {
                    score < b.score || (score == b.score && length_m < b.length_m)
                }
            };
            if better {
                best = Some(RouteCandidate { nodes, length_m, stats, score, strategy });
            }
        }

        // Last resort: one more plain shortest-path run with no weighting.
        if best.is_none() {
            let fallback = SearchStrategy::Shortest { length_factor: 1.0 };
            if let Some((nodes, length_m)) = run_strategy(graph, from, to, fallback) {
                let stats = risk_stats(&nodes, risk_nodes);
                let score = composite_score(stats, length_m);
                best = Some(RouteCandidate {
                    nodes,
                    length_m,
                    stats,
                    score,
                    strategy: fallback,
                });
            }
        }

        best.ok_or(SpatialError::NoRoute { from, to })
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Metres → integer search cost in millimetres.
#[inline]
fn cost_mm(length_m: f64, factor: f64) -> u64 {
    (length_m * factor * 1_000.0).round() as u64
}

/// Straight-line heuristic in millimetres, floored so it never overestimates.
#[inline]
fn heuristic_mm(a: GeoPoint, b: GeoPoint) -> u64 {
    (a.distance_m(b) * 1_000.0).floor() as u64
}

fn run_strategy(
    graph: &WalkGraph,
    from: NodeId,
    to: NodeId,
    strategy: SearchStrategy,
) -> Option<(Vec<NodeId>, f64)> {
    if !graph.is_active(from) || !graph.is_active(to) {
        return None;
    }
    match strategy {
        SearchStrategy::Shortest { length_factor } => {
            dijkstra(graph, from, to, length_factor)
        }
        SearchStrategy::AStar => astar(graph, from, to),
    }
}

fn dijkstra(
    graph: &WalkGraph,
    from: NodeId,
    to: NodeId,
    length_factor: f64,
) -> Option<(Vec<NodeId>, f64)> {
    if from == to {
        return Some((vec![from], 0.0));
    }

    let n = graph.node_count();
    // dist[v] = best known scaled cost (mm) to reach v.
    let mut dist      = vec![u64::MAX; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(graph, &prev_edge, from, to));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if !graph.is_active(neighbor) {
                continue;
            }
            let new_cost = cost
                .saturating_add(cost_mm(graph.edge_length_m[edge.index()], length_factor));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    None
}

fn astar(graph: &WalkGraph, from: NodeId, to: NodeId) -> Option<(Vec<NodeId>, f64)> {
    if from == to {
        return Some((vec![from], 0.0));
    }

    let n = graph.node_count();
    let goal = graph.node_pos[to.index()];

    // g[v] = best known true cost (mm) from `from` to v.
    let mut g         = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    g[from.index()] = 0;

    // Min-heap keyed on f = g + h; NodeId breaks ties deterministically.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((heuristic_mm(graph.node_pos[from.index()], goal), from)));

    while let Some(Reverse((_, node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(graph, &prev_edge, from, to));
        }

        let node_g = g[node.index()];
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if !graph.is_active(neighbor) {
                continue;
            }
            let tentative = node_g
                .saturating_add(cost_mm(graph.edge_length_m[edge.index()], 1.0));

            if tentative < g[neighbor.index()] {
                g[neighbor.index()] = tentative;
                prev_edge[neighbor.index()] = edge;
                let f = tentative
                    .saturating_add(heuristic_mm(graph.node_pos[neighbor.index()], goal));
                heap.push(Reverse((f, neighbor)));
            }
        }
    }

    None
}

/// Trace `prev_edge` back from `to`, emitting the node sequence and the true
/// (unscaled) length in metres.
fn reconstruct(
    graph: &WalkGraph,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
) -> (Vec<NodeId>, f64) {
    let mut nodes = vec![to];
    let mut length_m = 0.0;
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        length_m += graph.edge_length_m[e.index()];
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    debug_assert_eq!(*nodes.last().unwrap(), from);
    nodes.reverse();
    (nodes, length_m)
}
