//! `MeshSurface`: a triangle mesh answering nearest-point queries through Parry.

use crate::errors::FitError;
use crate::float_types::{
    Real,
    parry3d::{bounding_volume::Aabb, query::PointQueryWithLocation, shape::TriMesh},
};
use crate::traits::{SurfaceHit, SurfaceQuery, VertexSource};
use crate::transform::{self, Transform};
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod shapes;

/// An object's triangle surface and vertices, in object-local space.
#[derive(Clone, Debug)]
pub struct MeshSurface {
    trimesh: TriMesh,

    /// Lazily calculated AABB that spans every vertex.
    bounding_box: OnceLock<Aabb>,
}

impl MeshSurface {
    /// Build a surface from vertex positions and triangle indices.
    ///
    /// ## Errors
    /// [`FitError::InvalidParameter`] if there are no triangles or an index is out
    /// of range, [`FitError::TriMesh`] if Parry rejects the triangles.
    pub fn new(vertices: Vec<Point3<Real>>, triangles: Vec<[u32; 3]>) -> Result<Self, FitError> {
        if triangles.is_empty() {
            return Err(FitError::InvalidParameter("a surface needs at least one triangle".to_string()));
        }
        if let Some(&index) = triangles.iter().flatten().find(|&&i| i as usize >= vertices.len()) {
            return Err(FitError::InvalidParameter(format!(
                "triangle index {} is out of range ({} vertices)",
                index,
                vertices.len()
            )));
        }
        let trimesh = TriMesh::new(vertices, triangles)?;
        Ok(MeshSurface {
            trimesh,
            bounding_box: OnceLock::new(),
        })
    }

    /// Build a surface from polygons given as vertex index loops.
    /// Each polygon is fan-triangulated around its first vertex.
    pub fn from_polygons(vertices: Vec<Point3<Real>>, polygons: &[Vec<usize>]) -> Result<Self, FitError> {
        let mut triangles = Vec::new();
        for poly in polygons {
            if poly.len() < 3 {
                return Err(FitError::InvalidParameter(format!(
                    "polygon with {} vertices cannot be triangulated",
                    poly.len()
                )));
            }
            let index = |i: usize| {
                u32::try_from(i).map_err(|_| {
                    FitError::InvalidParameter(format!("vertex index {} does not fit in u32", i))
                })
            };
            for k in 1..poly.len() - 1 {
                triangles.push([index(poly[0])?, index(poly[k])?, index(poly[k + 1])?]);
            }
        }
        Self::new(vertices, triangles)
    }

    /// The underlying Parry mesh.
    pub const fn trimesh(&self) -> &TriMesh {
        &self.trimesh
    }

    pub fn vertices(&self) -> &[Point3<Real>] {
        self.trimesh.vertices()
    }

    /// Local axis-aligned bounding box of all vertices.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in self.vertices() {
                mins.x = mins.x.min(v.x);
                mins.y = mins.y.min(v.y);
                mins.z = mins.z.min(v.z);
                maxs.x = maxs.x.max(v.x);
                maxs.y = maxs.y.max(v.y);
                maxs.z = maxs.z.max(v.z);
            }
            if self.vertices().is_empty() {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Size of the bounding box once the object is placed at `world`
    /// (local extents scaled by the world transform's axis scales).
    pub fn dimensions(&self, world: &Transform) -> Vector3<Real> {
        let aabb = self.bounding_box();
        (aabb.maxs - aabb.mins).component_mul(&transform::axis_scales(world))
    }

    /// Largest of [`dimensions`](Self::dimensions); relates rotation angles to
    /// surface displacement during a fit.
    pub fn bounding_radius(&self, world: &Transform) -> Real {
        self.dimensions(world).max()
    }
}

impl SurfaceQuery for MeshSurface {
    fn nearest_point(&self, point: &Point3<Real>, max_distance: Real) -> Option<SurfaceHit> {
        // Not solid: points inside the mesh still project onto its surface.
        let (projection, (face, _)) = self.trimesh.project_local_point_and_get_location(point, false);
        if max_distance > 0.0 && (projection.point - point).norm() > max_distance {
            return None;
        }
        let normal = self
            .trimesh
            .triangle(face)
            .normal()
            .map(|n| n.into_inner())
            .unwrap_or_else(Vector3::zeros);
        Some(SurfaceHit {
            point: projection.point,
            normal,
            face_index: face as usize,
        })
    }

    #[cfg(feature = "parallel")]
    fn nearest_points(&self, points: &[Point3<Real>], max_distance: Real) -> Vec<Option<SurfaceHit>> {
        points
            .par_iter()
            .map(|p| self.nearest_point(p, max_distance))
            .collect()
    }
}

impl VertexSource for MeshSurface {
    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    fn vertex(&self, index: usize) -> Point3<Real> {
        self.vertices()[index]
    }
}
