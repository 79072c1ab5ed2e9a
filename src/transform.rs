//! Homogeneous transform helpers.
//!
//! A [`Transform`] is a plain 4×4 matrix holding a rigid (or rigid plus scale)
//! placement. Everything here is a free function over `nalgebra` types so hosts
//! can hand in whatever matrix they already store.

use crate::errors::FitError;
use crate::float_types::{EPSILON, Real};
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Translation3, Unit, Vector3};

/// A homogeneous object placement (rotation, translation, scale).
pub type Transform = Matrix4<Real>;

/// Translation by `offset`.
pub fn translation(offset: &Vector3<Real>) -> Transform {
    Translation3::from(*offset).to_homogeneous()
}

/// Rotation by `angle` radians about `axis` through the origin.
/// A zero-length axis yields the identity.
pub fn rotation_about(axis: &Vector3<Real>, angle: Real) -> Transform {
    match Unit::try_new(*axis, EPSILON) {
        Some(axis) => Rotation3::from_axis_angle(&axis, angle).to_homogeneous(),
        None => Transform::identity(),
    }
}

/// Scale by `factor` along the direction `axis`, leaving the orthogonal plane untouched.
///
/// `axis` need not be unit length. `factor = -1` is a reflection through the
/// plane orthogonal to `axis` at the origin.
pub fn scale_along(axis: &Vector3<Real>, factor: Real) -> Transform {
    let len = axis.norm();
    if len < EPSILON {
        return Transform::identity();
    }
    let n = axis / len;
    // S = I + (k - 1) n n^T
    let linear = Matrix3::identity() + (factor - 1.0) * n * n.transpose();
    linear.to_homogeneous()
}

/// Reflection through the plane with normal `normal` passing through `point`:
/// `Translate(point) · Scale(-1, normal) · Translate(-point)`.
pub fn reflection_about(point: &Point3<Real>, normal: &Vector3<Real>) -> Transform {
    let to_point = translation(&point.coords);
    let from_point = translation(&-point.coords);
    to_point * scale_along(normal, -1.0) * from_point
}

/// Inverse of `matrix`, or [`FitError::SingularTransform`].
pub fn invert(matrix: &Transform) -> Result<Transform, FitError> {
    matrix.try_inverse().ok_or(FitError::SingularTransform)
}

/// The pure rotation contained in `matrix`.
///
/// Translation is dropped and any scale or shear in the upper 3×3 block is
/// removed by polar decomposition, so the result pivots about the origin.
pub fn rotation_part(matrix: &Transform) -> Transform {
    let linear: Matrix3<Real> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    Rotation3::from_matrix(&linear).to_homogeneous()
}

/// Applies `matrix` to a point (w = 1).
pub fn transform_point(matrix: &Transform, point: &Point3<Real>) -> Point3<Real> {
    matrix.transform_point(point)
}

/// Applies `matrix` to a direction (w = 0), ignoring translation.
pub fn transform_vector(matrix: &Transform, vector: &Vector3<Real>) -> Vector3<Real> {
    matrix.transform_vector(vector)
}

/// Maps a surface normal through `matrix` using the inverse transpose of its
/// linear part. The result is not normalized.
pub fn transform_normal(matrix: &Transform, normal: &Vector3<Real>) -> Result<Vector3<Real>, FitError> {
    let linear: Matrix3<Real> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let inverse = linear.try_inverse().ok_or(FitError::SingularTransform)?;
    Ok(inverse.transpose() * normal)
}

/// Length of each basis column of `matrix`, i.e. the scale applied along the local x, y and z axes.
pub fn axis_scales(matrix: &Transform) -> Vector3<Real> {
    Vector3::new(
        matrix.fixed_view::<3, 1>(0, 0).norm(),
        matrix.fixed_view::<3, 1>(0, 1).norm(),
        matrix.fixed_view::<3, 1>(0, 2).norm(),
    )
}
