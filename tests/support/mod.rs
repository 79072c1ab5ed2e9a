//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use mirrorfit::{
    Mirror, MirrorReference, SurfaceHit, SurfaceQuery,
    float_types::Real,
    transform::Transform,
};
use nalgebra::{Matrix4, Point3, Vector3};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Largest absolute entry-wise difference between two transforms.
pub fn transform_distance(a: &Transform, b: &Transform) -> Real {
    (a - b).abs().max()
}

/// A mirror through `center` with the given normal, placed at the world origin.
pub fn plane_mirror(center: Point3<Real>, normal: Vector3<Real>) -> Mirror {
    Mirror::new(&MirrorReference::Polygon { center, normal }, &Matrix4::identity())
        .expect("valid mirror")
}

/// The YZ plane, reflecting x to -x.
pub fn yz_mirror() -> Mirror {
    plane_mirror(Point3::origin(), Vector3::x())
}

pub fn translated(x: Real, y: Real, z: Real) -> Transform {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// A surface whose every match lies a fixed distance along +Z from the query.
pub struct ConstantOffset(pub Real);

impl SurfaceQuery for ConstantOffset {
    fn nearest_point(&self, point: &Point3<Real>, max_distance: Real) -> Option<SurfaceHit> {
        if max_distance > 0.0 && self.0 > max_distance {
            return None;
        }
        Some(SurfaceHit {
            point: point + Vector3::new(0.0, 0.0, self.0),
            normal: Vector3::z(),
            face_index: 0,
        })
    }
}

/// A surface that only answers queries landing exactly on one of `anchors`,
/// reporting a match `offset` away from it.
pub struct Anchored {
    pub anchors: Vec<Point3<Real>>,
    pub offset: Real,
}

impl SurfaceQuery for Anchored {
    fn nearest_point(&self, point: &Point3<Real>, _max_distance: Real) -> Option<SurfaceHit> {
        self.anchors
            .iter()
            .position(|a| (a - point).norm() < 1e-9)
            .map(|face_index| SurfaceHit {
                point: point + Vector3::new(self.offset, 0.0, 0.0),
                normal: Vector3::x(),
                face_index,
            })
    }
}
