//! Property tests for rotated-rectangle geometry.
//!
//! 1. Overlap is symmetric.
//! 2. A footprint's AABB contains its corners.
//! 3. A rectangle overlapping another shares an interior point with it.
//! 4. Far-apart rectangles never overlap, whatever their rotation.

use proptest::prelude::*;
use wcloud_core::geometry::{Footprint, Point};

fn footprint() -> impl Strategy<Value = Footprint> {
    (
        -50.0f64..=50.0,
        -50.0f64..=50.0,
        1.0f64..=40.0,
        1.0f64..=20.0,
        -90.0f64..=90.0,
        0.0f64..=2.0,
    )
        .prop_map(|(x, y, w, h, rot, pad)| Footprint::new(Point::new(x, y), w, h, rot, pad))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn intersects_is_symmetric(a in footprint(), b in footprint()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn aabb_contains_corners(a in footprint()) {
        let bb = a.aabb();
        for c in a.corners() {
            prop_assert!(c.x >= bb.min_x - 1e-9 && c.x <= bb.max_x + 1e-9);
            prop_assert!(c.y >= bb.min_y - 1e-9 && c.y <= bb.max_y + 1e-9);
        }
    }

    #[test]
    fn center_inside_other_means_overlap(a in footprint(), b in footprint()) {
        if b.contains_point(a.center) {
            prop_assert!(a.intersects(&b));
        }
    }

    #[test]
    fn distant_footprints_never_overlap(a in footprint(), b in footprint()) {
        let far = b.at(Point::new(b.center.x + 200.0, b.center.y));
        prop_assert!(!a.intersects(&far));
    }
}

#[test]
fn footprint_serializes_with_camel_case_fields() {
    let fp = Footprint::new(Point::new(1.0, 2.0), 4.0, 2.0, 0.0, 0.0);
    let json = serde_json::to_value(fp).unwrap();
    assert_eq!(json["halfWidth"], 2.0);
    assert_eq!(json["halfHeight"], 1.0);
    assert_eq!(json["center"]["x"], 1.0);
}
