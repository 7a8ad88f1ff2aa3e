//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` (double-precision) latitude/longitude.  Point-in-
//! polygon tests against hazard rings compare coordinates that can differ in
//! the sixth decimal place, so the headroom of `f64` is kept even though
//! `f32` would be enough for distance estimates alone.

/// Assumed pedestrian speed for evacuation time estimates, metres per minute.
pub const WALK_SPEED_M_PER_MIN: f64 = 80.0;

/// Estimated walking time in whole minutes for a route of `length_m` metres.
///
/// Truncates rather than rounds: a 159 m route reports 1 minute.
#[inline]
pub fn walk_minutes(length_m: f64) -> u64 {
    (length_m / WALK_SPEED_M_PER_MIN) as u64
}

/// A WGS-84 geographic coordinate, degrees, stored as (lat, lon).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Pure and total: defined for every pair of coordinates, symmetric,
    /// and zero for identical points.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Approximate bounding-box check — much cheaper than `distance_m` for
    /// quick rejection before an exact containment test.
    #[inline]
    pub fn within_bbox(self, center: GeoPoint, half_deg: f64) -> bool {
        (self.lat - center.lat).abs() <= half_deg
            && (self.lon - center.lon).abs() <= half_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
