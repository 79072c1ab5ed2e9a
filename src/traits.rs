use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// The closest point found on a surface for one query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// Closest surface point, in the surface's local space.
    pub point: Point3<Real>,
    /// Normal of the face containing `point`.
    pub normal: Vector3<Real>,
    /// Index of the face containing `point`.
    pub face_index: usize,
}

/// Nearest-point-on-surface queries against a static object, in object-local space.
///
/// Implementations must be deterministic for a fixed surface and must not
/// mutate it; the fit calls them repeatedly, possibly from several threads.
pub trait SurfaceQuery: Send + Sync {
    /// Closest surface point to `point`, or `None` when nothing lies within
    /// `max_distance`. A `max_distance` of zero (or less) means unbounded.
    fn nearest_point(&self, point: &Point3<Real>, max_distance: Real) -> Option<SurfaceHit>;

    /// Batch form of [`nearest_point`](Self::nearest_point), one result per input
    /// point in the same order.
    fn nearest_points(&self, points: &[Point3<Real>], max_distance: Real) -> Vec<Option<SurfaceHit>> {
        points
            .iter()
            .map(|p| self.nearest_point(p, max_distance))
            .collect()
    }
}

/// Read-only, indexable object-local vertex positions.
pub trait VertexSource {
    fn vertex_count(&self) -> usize;

    /// Position of vertex `index`; callers keep `index < vertex_count()`.
    fn vertex(&self, index: usize) -> Point3<Real>;
}

impl VertexSource for [Point3<Real>] {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn vertex(&self, index: usize) -> Point3<Real> {
        self[index]
    }
}

impl VertexSource for Vec<Point3<Real>> {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn vertex(&self, index: usize) -> Point3<Real> {
        self[index]
    }
}
