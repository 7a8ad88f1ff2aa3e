//! Hazard zone index: per-category polygon storage with a bounding-box
//! prefilter in front of exact point-in-polygon tests.
//!
//! # Query contract
//!
//! The prefilter (R-tree over polygon bounds, plus the optional region
//! window) may return **false positives** — polygons whose bounds overlap
//! the query but which do not contain the point — but never false
//! negatives.  The exact ray-cast test in `evac-core` settles each
//! candidate.
//!
//! # Lifetime
//!
//! An index is a snapshot for one planning request, built from whatever the
//! hazard store returned for the request's region.  It is never shared
//! across requests and never mutated after `build`.

use rstar::{RTree, RTreeObject, AABB};
use rustc_hash::{FxHashMap, FxHashSet};

use evac_core::{EvacResult, GeoBounds, GeoPoint, HazardCategory, HazardPolygon, NodeId, ZoneId};

use crate::network::WalkGraph;

// ── HazardStore ───────────────────────────────────────────────────────────────

/// External hazard-polygon collaborator, keyed by category and region.
///
/// Implemented by the surrounding application (database, file, service).
/// A store failure for one category degrades to an empty set for that
/// category — it never blocks planning.
pub trait HazardStore {
    /// All polygons of `category` that may intersect `window`.
    ///
    /// Returning a superset is fine; the index prefilters and the exact
    /// containment test decides.
    fn load(&self, category: HazardCategory, window: GeoBounds)
        -> EvacResult<Vec<HazardPolygon>>;
}

impl<S: HazardStore + ?Sized> HazardStore for &S {
    fn load(&self, category: HazardCategory, window: GeoBounds)
        -> EvacResult<Vec<HazardPolygon>> {
        (**self).load(category, window)
    }
}

// ── R-tree zone entry ─────────────────────────────────────────────────────────

/// Entry in a per-category R-tree: the polygon's precomputed bounds plus its
/// index into the shared polygon vec.
struct ZoneEntry {
    envelope: AABB<[f64; 2]>,
    zone: ZoneId,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn bounds_to_aabb(b: GeoBounds) -> AABB<[f64; 2]> {
    AABB::from_corners([b.min_lat, b.min_lon], [b.max_lat, b.max_lon])
}

// ── HazardZoneIndex ───────────────────────────────────────────────────────────

/// Read-only snapshot of hazard polygons for one planning request.
pub struct HazardZoneIndex {
    polygons: Vec<HazardPolygon>,
    trees: FxHashMap<HazardCategory, RTree<ZoneEntry>>,
}

impl HazardZoneIndex {
    /// Build an index over already-validated polygons.
    pub fn build(polygons: Vec<HazardPolygon>) -> Self {
        let mut by_category: FxHashMap<HazardCategory, Vec<ZoneEntry>> =
            FxHashMap::default();
        for (i, poly) in polygons.iter().enumerate() {
            by_category
                .entry(poly.category)
                .or_default()
                .push(ZoneEntry {
                    envelope: bounds_to_aabb(poly.bounds()),
                    zone: ZoneId(i as u32),
                });
        }

        let trees = by_category
            .into_iter()
            .map(|(cat, entries)| (cat, RTree::bulk_load(entries)))
            .collect();

        Self { polygons, trees }
    }

    /// Build an index from raw ring data, skipping malformed rings.
    ///
    /// Each entry is `(category, (lat, lon) ring, optional label)`.  Rings
    /// with fewer than 3 valid points are logged and dropped — bad source
    /// rows must never abort a plan.
    pub fn from_rings(
        rings: impl IntoIterator<Item = (HazardCategory, Vec<GeoPoint>, Option<String>)>,
    ) -> Self {
        let mut polygons = Vec::new();
        for (category, ring, label) in rings {
            match HazardPolygon::new(category, ring, label) {
                Ok(poly) => polygons.push(poly),
                Err(err) => {
                    tracing::warn!(%category, %err, "skipping malformed hazard polygon");
                }
            }
        }
        Self::build(polygons)
    }

    /// Load a per-request snapshot from `store` for the given categories,
    /// keeping only polygons whose bounds overlap a ±`margin_deg` window
    /// around `center`.
    ///
    /// A store failure for one category is logged and treated as an empty
    /// hazard set for that category.
    pub fn from_store<S: HazardStore>(
        store: &S,
        categories: &[HazardCategory],
        center: GeoPoint,
        margin_deg: f64,
    ) -> Self {
        let window = GeoBounds::window(center, margin_deg);
        let mut polygons = Vec::new();
        for &category in categories {
            match store.load(category, window) {
                Ok(batch) => {
                    polygons.extend(
                        batch.into_iter().filter(|p| p.bounds().intersects(&window)),
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        %category, %err,
                        "hazard store unavailable; planning without this category"
                    );
                }
            }
        }
        let index = Self::build(polygons);
        for &category in categories {
            tracing::debug!(
                %category,
                zones = index.category_count(category),
                "hazard snapshot loaded"
            );
        }
        index
    }

    /// Total polygons in the snapshot.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Polygons of one category.
    pub fn category_count(&self, category: HazardCategory) -> usize {
        self.trees.get(&category).map_or(0, |t| t.size())
    }

    /// Keep only polygons whose bounds overlap a ±`margin_deg` window
    /// around `center`.
    ///
    /// Coarse by design: a polygon that truly contains a later-queried point
    /// inside the window always survives (its bounds contain the point and
    /// therefore overlap the window).  False positives are acceptable.
    pub fn filter_by_region(&self, center: GeoPoint, margin_deg: f64) -> Self {
        let window = GeoBounds::window(center, margin_deg);
        let kept = self
            .polygons
            .iter()
            .filter(|p| p.bounds().intersects(&window))
            .cloned()
            .collect();
        Self::build(kept)
    }

    /// `true` if any polygon of `category` contains `p`.
    ///
    /// R-tree envelope lookup first, exact ray cast on the survivors.
    pub fn contains(&self, p: GeoPoint, category: HazardCategory) -> bool {
        let Some(tree) = self.trees.get(&category) else {
            return false;
        };
        tree.locate_in_envelope_intersecting(&AABB::from_point([p.lat, p.lon]))
            .any(|entry| self.polygons[entry.zone.index()].contains(p))
    }

    /// All active graph nodes that fall inside a polygon of `category`.
    ///
    /// Derived once per graph; the result is read-only during search.
    pub fn nodes_inside(
        &self,
        graph: &WalkGraph,
        category: HazardCategory,
    ) -> FxHashSet<NodeId> {
        let mut inside = FxHashSet::default();
        if self.category_count(category) == 0 {
            return inside;
        }
        for (i, &pos) in graph.node_pos.iter().enumerate() {
            let node = NodeId(i as u32);
            if graph.is_active(node) && self.contains(pos, category) {
                inside.insert(node);
            }
        }
        inside
    }
}
