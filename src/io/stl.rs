use crate::errors::FitError;
use crate::float_types::Real;
use crate::mesh::MeshSurface;
use nalgebra::Point3;
use std::io::{Read, Seek};

impl MeshSurface {
    /// Read an ASCII or binary STL into a `MeshSurface`.
    ///
    /// Coincident STL corners are merged by `stl_io`, so the vertex list holds
    /// each position once.
    ///
    /// ```rust,no_run
    /// # use mirrorfit::mesh::MeshSurface;
    /// # fn main() -> Result<(), mirrorfit::errors::FitError> {
    /// let mut file = std::fs::File::open("stl/object.stl")?;
    /// let surface = MeshSurface::from_stl(&mut file)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_stl<R: Read + Seek>(reader: &mut R) -> Result<MeshSurface, FitError> {
        let indexed = stl_io::read_stl(reader)?;

        #[allow(clippy::unnecessary_cast)]
        let vertices = indexed
            .vertices
            .iter()
            .map(|v| Point3::new(v[0] as Real, v[1] as Real, v[2] as Real))
            .collect();

        let mut triangles = Vec::with_capacity(indexed.faces.len());
        for face in &indexed.faces {
            let mut tri = [0u32; 3];
            for (slot, &index) in tri.iter_mut().zip(face.vertices.iter()) {
                *slot = u32::try_from(index).map_err(|_| {
                    FitError::InvalidParameter(format!("vertex index {} does not fit in u32", index))
                })?;
            }
            triangles.push(tri);
        }

        MeshSurface::new(vertices, triangles)
    }
}
