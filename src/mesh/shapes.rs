//! Primitive `MeshSurface`s, mostly for demos and tests.

use super::MeshSurface;
use crate::errors::FitError;
use crate::float_types::{PI, Real, TAU};
use nalgebra::Point3;

impl MeshSurface {
    /// Axis-aligned box centered on the origin.
    ///
    /// Faces are wound counter-clockwise seen from outside.
    pub fn cuboid(width: Real, length: Real, height: Real) -> Result<MeshSurface, FitError> {
        let (x, y, z) = (width * 0.5, length * 0.5, height * 0.5);
        let vertices = vec![
            Point3::new(-x, -y, -z), // 0
            Point3::new(x, -y, -z),  // 1
            Point3::new(x, y, -z),   // 2
            Point3::new(-x, y, -z),  // 3
            Point3::new(-x, -y, z),  // 4
            Point3::new(x, -y, z),   // 5
            Point3::new(x, y, z),    // 6
            Point3::new(-x, y, z),   // 7
        ];
        let faces = [
            vec![0, 3, 2, 1], // bottom (-Z)
            vec![4, 5, 6, 7], // top (+Z)
            vec![0, 1, 5, 4], // front (-Y)
            vec![3, 7, 6, 2], // back (+Y)
            vec![0, 4, 7, 3], // left (-X)
            vec![1, 2, 6, 5], // right (+X)
        ];
        MeshSurface::from_polygons(vertices, &faces)
    }

    /// UV sphere centered on the origin with poles on the Y axis.
    ///
    /// With an even number of `segments` and `stacks` the tessellation is
    /// symmetric about the XY, YZ and XZ planes.
    pub fn sphere(radius: Real, segments: usize, stacks: usize) -> Result<MeshSurface, FitError> {
        if segments < 3 || stacks < 2 {
            return Err(FitError::InvalidParameter(format!(
                "a sphere needs at least 3 segments and 2 stacks, got {} and {}",
                segments, stacks
            )));
        }

        let mut vertices = Vec::with_capacity(2 + (stacks - 1) * segments);
        vertices.push(Point3::new(0.0, radius, 0.0));
        for j in 1..stacks {
            let phi = j as Real / stacks as Real * PI;
            let y = radius * phi.cos();
            let ring_radius = radius * phi.sin();
            for i in 0..segments {
                let theta = i as Real / segments as Real * TAU;
                vertices.push(Point3::new(
                    ring_radius * theta.cos(),
                    y,
                    ring_radius * theta.sin(),
                ));
            }
        }
        vertices.push(Point3::new(0.0, -radius, 0.0));

        let north_pole = 0;
        let south_pole = vertices.len() - 1;
        let ring = |j: usize, i: usize| 1 + (j - 1) * segments + i % segments;

        let mut polygons = Vec::new();
        for i in 0..segments {
            polygons.push(vec![north_pole, ring(1, i + 1), ring(1, i)]);
        }
        for j in 1..stacks - 1 {
            for i in 0..segments {
                polygons.push(vec![ring(j, i), ring(j + 1, i), ring(j + 1, i + 1), ring(j, i + 1)]);
            }
        }
        for i in 0..segments {
            polygons.push(vec![south_pole, ring(stacks - 1, i), ring(stacks - 1, i + 1)]);
        }

        MeshSurface::from_polygons(vertices, &polygons)
    }
}
