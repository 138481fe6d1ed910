#![cfg(feature = "serde-serialize")]

use depth_core::nalgebra::{Point2, Vector2};
use depth_core::{DepthIntrinsics, PointXYZ, PointXYZRGB, RepresentationKind};

#[test]
fn representation_kind_is_snake_case() {
    assert_eq!(serde_json::to_string(&RepresentationKind::Dense).unwrap(), r#""dense""#);
    assert_eq!(
        serde_json::to_string(&RepresentationKind::PointCloud).unwrap(),
        r#""point_cloud""#
    );
    let kind: RepresentationKind = serde_json::from_str(r#""point_cloud""#).unwrap();
    assert_eq!(kind, RepresentationKind::PointCloud);
}

#[test]
fn intrinsics_roundtrip() {
    let intrinsics = DepthIntrinsics::identity()
        .focals(Vector2::new(525.0, 522.5))
        .principal_point(Point2::new(319.5, 239.5));
    let json = serde_json::to_string(&intrinsics).unwrap();
    let back: DepthIntrinsics<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, intrinsics);
}

#[test]
fn point_records_roundtrip() {
    let point = PointXYZ::new(0.25, -1.5, 2.0);
    let json = serde_json::to_string(&point).unwrap();
    assert_eq!(json, r#"{"x":0.25,"y":-1.5,"z":2.0}"#);
    assert_eq!(serde_json::from_str::<PointXYZ>(&json).unwrap(), point);

    let point = PointXYZRGB::new(0.5, 0.0, 1.25, [255, 16, 0]);
    let json = serde_json::to_string(&point).unwrap();
    assert_eq!(serde_json::from_str::<PointXYZRGB>(&json).unwrap(), point);
}
