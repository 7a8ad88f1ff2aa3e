//! Hazard zone categories and polygon geometry.
//!
//! A hazard polygon is a simple closed ring of (lat, lon) coordinates with a
//! category.  The ring is stored *open* (no duplicated closing point); all
//! geometry treats it as implicitly closed.
//!
//! # Ingestion contract
//!
//! The internal coordinate order is always **(lat, lon)**.  Sources that
//! store GeoJSON-style (lon, lat) pairs must go through
//! [`HazardPolygon::from_lon_lat_ring`], which swaps each pair explicitly.
//! There is deliberately no per-point magnitude guessing: a ring that mixes
//! both orders is corrupt data and should be fixed upstream, not patched
//! point by point.

use crate::{EvacError, EvacResult, GeoPoint};

// ── HazardCategory ────────────────────────────────────────────────────────────

/// The kind of ground hazard a polygon describes.
///
/// `Landslide` and `Water` mark graph nodes as risky but leave them
/// traversable; `Forbidden` zones delete nodes outright before any search.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HazardCategory {
    /// Landslide-prone ground (also used for earthquake-triggered slides).
    Landslide,
    /// Flood, inland inundation, or storm-surge inundation areas.
    Water,
    /// Impassable areas — closed roads, collapsed structures.
    Forbidden,
}

impl HazardCategory {
    /// `true` for categories whose nodes are removed from the graph rather
    /// than risk-marked.
    #[inline]
    pub fn is_blocking(self) -> bool {
        matches!(self, HazardCategory::Forbidden)
    }

    /// Human-readable label, useful for log lines and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            HazardCategory::Landslide => "landslide",
            HazardCategory::Water     => "water",
            HazardCategory::Forbidden => "forbidden",
        }
    }
}

impl std::fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── GeoBounds ─────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in (lat, lon) degrees.
///
/// Used as the coarse prefilter in front of exact point-in-polygon tests.
/// The contract is "no false negatives": a point inside the polygon is
/// always inside its bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Tight bounds of a non-empty ring.
    ///
    /// # Panics
    /// Panics in debug mode if `ring` is empty; polygon validation upstream
    /// guarantees at least 3 points.
    pub fn of_ring(ring: &[GeoPoint]) -> Self {
        debug_assert!(!ring.is_empty());
        let mut b = GeoBounds {
            min_lat: f64::INFINITY,
            min_lon: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for p in ring {
            b.min_lat = b.min_lat.min(p.lat);
            b.min_lon = b.min_lon.min(p.lon);
            b.max_lat = b.max_lat.max(p.lat);
            b.max_lon = b.max_lon.max(p.lon);
        }
        b
    }

    /// A square window of ±`half_deg` degrees around `center`.
    pub fn window(center: GeoPoint, half_deg: f64) -> Self {
        GeoBounds {
            min_lat: center.lat - half_deg,
            min_lon: center.lon - half_deg,
            max_lat: center.lat + half_deg,
            max_lon: center.lon + half_deg,
        }
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min_lat
            && p.lat <= self.max_lat
            && p.lon >= self.min_lon
            && p.lon <= self.max_lon
    }

    #[inline]
    pub fn intersects(&self, other: &GeoBounds) -> bool {
        self.max_lat >= other.min_lat
            && self.min_lat <= other.max_lat
            && self.max_lon >= other.min_lon
            && self.min_lon <= other.max_lon
    }
}

// ── HazardPolygon ─────────────────────────────────────────────────────────────

/// A labeled ground hazard region: a simple ring of ≥ 3 coordinates.
///
/// Construction validates the ring; a malformed ring is an [`EvacError`]
/// the ingesting side logs and skips.  Once built, a polygon is immutable.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HazardPolygon {
    pub category: HazardCategory,
    ring: Vec<GeoPoint>,
    bounds: GeoBounds,
    pub label: Option<String>,
}

impl HazardPolygon {
    /// Build a polygon from a (lat, lon)-ordered ring.
    ///
    /// Accepts closed rings (first point repeated at the end) and stores
    /// them open.  Points with non-finite coordinates are dropped before
    /// the ≥ 3 check.
    pub fn new(
        category: HazardCategory,
        ring: Vec<GeoPoint>,
        label: Option<String>,
    ) -> EvacResult<Self> {
        let mut ring: Vec<GeoPoint> = ring
            .into_iter()
            .filter(|p| p.lat.is_finite() && p.lon.is_finite())
            .collect();

        // Drop the explicit closing point, if present.
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        if ring.len() < 3 {
            return Err(EvacError::MalformedPolygon { points: ring.len() });
        }

        let bounds = GeoBounds::of_ring(&ring);
        Ok(Self { category, ring, bounds, label })
    }

    /// Build a polygon from a GeoJSON-style (lon, lat)-ordered ring.
    ///
    /// This is the one sanctioned place where coordinate order is swapped.
    pub fn from_lon_lat_ring(
        category: HazardCategory,
        ring: Vec<[f64; 2]>,
        label: Option<String>,
    ) -> EvacResult<Self> {
        let ring = ring
            .into_iter()
            .map(|[lon, lat]| GeoPoint::new(lat, lon))
            .collect();
        Self::new(category, ring, label)
    }

    /// The validated, open (lat, lon) ring.
    #[inline]
    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    /// Precomputed axis-aligned bounds of the ring.
    #[inline]
    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Exact point-in-polygon test by ray casting.
    ///
    /// Casts a horizontal ray from `p` toward +lon and counts edge
    /// crossings; odd means inside.  Only edges whose latitude span
    /// *strictly* straddles `p.lat` are counted (`>` on one end, `<=` via
    /// negation on the other), so horizontal edges contribute nothing and a
    /// shared vertex on the ray is counted exactly once per crossing pair.
    pub fn contains(&self, p: GeoPoint) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }

        let ring = &self.ring;
        let mut inside = false;
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[j];
            if (a.lat > p.lat) != (b.lat > p.lat) {
                let cross_lon =
                    (b.lon - a.lon) * (p.lat - a.lat) / (b.lat - a.lat) + a.lon;
                if p.lon < cross_lon {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}
