//! Unit tests for evac-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, ZoneId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(ZoneId(100) > ZoneId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(ZoneId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{walk_minutes, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(36.0652, 136.2216);
        assert!(p.distance_m(p) < 1e-6);
    }

    #[test]
    fn symmetric() {
        let a = GeoPoint::new(36.0652, 136.2216);
        let b = GeoPoint::new(36.1000, 136.3000);
        assert!((a.distance_m(b) - b.distance_m(a)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_latitude_approx() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(36.0, 136.0);
        let b = GeoPoint::new(37.0, 136.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn bbox_check() {
        let center = GeoPoint::new(36.0652, 136.2216);
        let nearby = GeoPoint::new(36.0700, 136.2250);
        let far = GeoPoint::new(36.9, 136.2216);
        assert!(nearby.within_bbox(center, 0.1));
        assert!(!far.within_bbox(center, 0.1));
    }

    #[test]
    fn walk_time_truncates() {
        assert_eq!(walk_minutes(0.0), 0);
        assert_eq!(walk_minutes(159.9), 1); // 80 m/min
        assert_eq!(walk_minutes(1_600.0), 20);
    }
}

#[cfg(test)]
mod hazard {
    use crate::{EvacError, GeoBounds, GeoPoint, HazardCategory, HazardPolygon};

    fn square(cat: HazardCategory) -> HazardPolygon {
        // Unit square: (0,0)-(0,1)-(1,1)-(1,0)
        HazardPolygon::new(
            cat,
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 1.0),
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(1.0, 0.0),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn category_labels() {
        assert_eq!(HazardCategory::Landslide.to_string(), "landslide");
        assert_eq!(HazardCategory::Water.to_string(), "water");
        assert_eq!(HazardCategory::Forbidden.to_string(), "forbidden");
        assert!(HazardCategory::Forbidden.is_blocking());
        assert!(!HazardCategory::Water.is_blocking());
    }

    #[test]
    fn rejects_degenerate_rings() {
        let two = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)];
        let err = HazardPolygon::new(HazardCategory::Water, two, None).unwrap_err();
        assert!(matches!(err, EvacError::MalformedPolygon { points: 2 }));

        // Non-finite points are dropped before the count check.
        let with_nan = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(f64::NAN, 1.0),
            GeoPoint::new(1.0, 1.0),
        ];
        assert!(HazardPolygon::new(HazardCategory::Water, with_nan, None).is_err());
    }

    #[test]
    fn closed_ring_stored_open() {
        let closed = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ];
        let poly = HazardPolygon::new(HazardCategory::Landslide, closed, None).unwrap();
        assert_eq!(poly.ring().len(), 3);
    }

    #[test]
    fn containment_square() {
        let poly = square(HazardCategory::Water);
        assert!(poly.contains(GeoPoint::new(0.5, 0.5)));
        assert!(!poly.contains(GeoPoint::new(1.5, 0.5)));
        assert!(!poly.contains(GeoPoint::new(-0.1, 0.5)));
    }

    #[test]
    fn containment_concave() {
        // L-shape: notch cut from the top-right quadrant.
        let poly = HazardPolygon::new(
            HazardCategory::Landslide,
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 2.0),
                GeoPoint::new(1.0, 2.0),
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(2.0, 1.0),
                GeoPoint::new(2.0, 0.0),
            ],
            None,
        )
        .unwrap();
        assert!(poly.contains(GeoPoint::new(0.5, 0.5)));
        assert!(poly.contains(GeoPoint::new(1.5, 0.5)));
        assert!(poly.contains(GeoPoint::new(0.5, 1.5)));
        // Inside the notch, outside the polygon.
        assert!(!poly.contains(GeoPoint::new(1.5, 1.5)));
    }

    #[test]
    fn ray_through_vertex_counted_once() {
        // Diamond whose left/right vertices sit exactly on the query latitude.
        let poly = HazardPolygon::new(
            HazardCategory::Water,
            vec![
                GeoPoint::new(1.0, 0.0),
                GeoPoint::new(2.0, 1.0),
                GeoPoint::new(1.0, 2.0),
                GeoPoint::new(0.0, 1.0),
            ],
            None,
        )
        .unwrap();
        assert!(poly.contains(GeoPoint::new(1.0, 1.0)));
        assert!(!poly.contains(GeoPoint::new(1.0, 2.5)));
        assert!(!poly.contains(GeoPoint::new(1.0, -0.5)));
    }

    #[test]
    fn lon_lat_normalization() {
        // Same unit square, GeoJSON point order.
        let poly = HazardPolygon::from_lon_lat_ring(
            HazardCategory::Forbidden,
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            Some("closed street".into()),
        )
        .unwrap();
        assert!(poly.contains(GeoPoint::new(0.5, 0.5)));
        assert_eq!(poly.label.as_deref(), Some("closed street"));
    }

    #[test]
    fn bounds_cover_ring() {
        let poly = square(HazardCategory::Water);
        let b = poly.bounds();
        assert_eq!(
            b,
            GeoBounds { min_lat: 0.0, min_lon: 0.0, max_lat: 1.0, max_lon: 1.0 }
        );
        for p in poly.ring() {
            assert!(b.contains(*p));
        }
    }

    #[test]
    fn bounds_window_and_intersects() {
        let w = GeoBounds::window(GeoPoint::new(36.0, 136.0), 0.1);
        assert!(w.contains(GeoPoint::new(36.05, 136.05)));
        assert!(!w.contains(GeoPoint::new(36.2, 136.0)));

        let far = GeoBounds::window(GeoPoint::new(37.0, 136.0), 0.1);
        assert!(!w.intersects(&far));
        let overlapping = GeoBounds::window(GeoPoint::new(36.15, 136.0), 0.1);
        assert!(w.intersects(&overlapping));
    }
}
