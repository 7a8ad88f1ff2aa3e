//! Walking-network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`) are sorted by
//! source node and indexed by `EdgeId`.  Iteration over a node's outgoing
//! edges is therefore a contiguous memory scan — ideal for the search loop.
//!
//! # Forbidden-node removal
//!
//! One planning request owns one `WalkGraph`; the only mutation it ever sees
//! is [`WalkGraph::remove_nodes`], which flips an `active` mask instead of
//! rebuilding the CSR arrays.  That keeps `NodeId`s stable between snapping,
//! risk marking, and search — snapping and traversal skip inactive nodes.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! to snap the pedestrian's position and the shelter to graph nodes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashSet;

use evac_core::{EdgeId, GeoPoint, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city (error < 0.1 % at ≤ 60° lat).
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── WalkGraph ─────────────────────────────────────────────────────────────────

/// Directed pedestrian graph in CSR format plus a spatial index for node
/// snapping.
///
/// CSR and edge arrays are `pub` for direct indexed access on hot paths.
/// Do not construct directly; use [`WalkGraphBuilder`].
#[derive(Debug)]
pub struct WalkGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// `false` once a node has been removed (forbidden zone).  Snapping and
    /// traversal treat inactive nodes — and their incident edges — as gone.
    active: Vec<bool>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Redundant with CSR but required for
    /// efficient route reconstruction (trace `prev_edge` back to source).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres — the true walking length, never a
    /// search weight.
    pub edge_length_m: Vec<f64>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl WalkGraph {
    /// Construct an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        WalkGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Nodes still present after any removals.
    pub fn active_node_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    #[inline]
    pub fn is_active(&self, node: NodeId) -> bool {
        self.active[node.index()]
    }

    // ── Mutation (forbidden-node removal only) ────────────────────────────

    /// Remove `nodes` and their incident edges from the graph.
    ///
    /// This is the only mutation a `WalkGraph` supports, applied once per
    /// planning request before search begins.
    pub fn remove_nodes(&mut self, nodes: &FxHashSet<NodeId>) {
        for &n in nodes {
            if n.index() < self.active.len() {
                self.active[n.index()] = false;
            }
        }
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`,
    /// including edges into removed nodes — callers on the search path use
    /// [`WalkGraph::is_active`] on the destination.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` counting only edges to active nodes.
    pub fn active_out_degree(&self, node: NodeId) -> usize {
        self.out_edges(node)
            .filter(|e| self.is_active(self.edge_to[e.index()]))
            .count()
    }

    /// `true` if a path of active nodes joins `from` and `to`.
    ///
    /// Plain BFS; used by the graph provider as a cheap connectivity probe
    /// before committing to the full multi-strategy search.
    pub fn connects(&self, from: NodeId, to: NodeId) -> bool {
        if !self.is_active(from) || !self.is_active(to) {
            return false;
        }
        if from == to {
            return true;
        }

        let mut seen = vec![false; self.node_count()];
        seen[from.index()] = true;
        let mut frontier = std::collections::VecDeque::from([from]);

        while let Some(node) = frontier.pop_front() {
            for e in self.out_edges(node) {
                let next = self.edge_to[e.index()];
                if next == to {
                    return true;
                }
                if self.is_active(next) && !seen[next.index()] {
                    seen[next.index()] = true;
                    frontier.push_back(next);
                }
            }
        }
        false
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest *active* node to `pos`.
    ///
    /// Nearest is by Euclidean distance in coordinate space — an acceptable
    /// approximation at city scale.  Returns `None` only if the graph has
    /// no active nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .map(|e| e.id)
            .find(|&id| self.is_active(id))
    }
}

// ── WalkGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`WalkGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node, constructs the CSR arrays, and bulk-loads the
/// R-tree.
///
/// # Example
///
/// ```
/// use evac_core::GeoPoint;
/// use evac_spatial::WalkGraphBuilder;
///
/// let mut b = WalkGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(36.0652, 136.2216));
/// let c = b.add_node(GeoPoint::new(36.0700, 136.2300));
/// b.add_walkway(a, c, 950.0); // 950 m footpath
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // bidirectional
/// ```
pub struct WalkGraphBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl WalkGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading from a street-network source.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to` of `length_m` metres.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        self.raw_edges.push(RawEdge { from, to, length_m });
    }

    /// Convenience: add edges in **both directions** for an undirected
    /// walkway segment (the common case for footpaths).
    pub fn add_walkway(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// Look up the position of a node added earlier (used by loaders to
    /// compute edge lengths between adjacent way nodes).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`WalkGraph`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> WalkGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Sort edges by source node for CSR construction.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| e.from.0);

        // Build edge arrays from sorted raw edges.
        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        WalkGraph {
            active: vec![true; node_count],
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            spatial_idx,
        }
    }
}

impl Default for WalkGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
