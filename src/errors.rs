//! Fit errors

use crate::float_types::Real;
use std::fmt::Display;

/// All the ways a mirror fit can fail before or while it runs.
///
/// Every variant is raised before the object's transform is touched, so a failed
/// run always leaves the caller's transform exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    /// (DegenerateMirror) The mirror reference has no usable normal or orientation
    DegenerateMirror(String),
    /// (NoSurfaceMatch) No sample point found a surface match within the search radius
    NoSurfaceMatch { max_distance: Real },
    /// (EmptyObject) The object has no vertices to sample
    EmptyObject,
    /// (SingularTransform) A transform that must be inverted is singular
    SingularTransform,
    /// (InvalidParameter) A run parameter is out of range
    InvalidParameter(String),
    /// Indicates an inconsistency while building a triangle mesh
    TriMesh(#[from] crate::float_types::parry3d::shape::TriMeshBuilderError),
    /// Reading mesh data failed
    #[cfg(feature = "stl-io")]
    Io(#[from] std::io::Error),
}

impl Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::DegenerateMirror(reason) => write!(f, "(DegenerateMirror) The mirror has no usable orientation: {}", reason),
            FitError::NoSurfaceMatch { max_distance } => {
                if *max_distance > 0.0 {
                    write!(f, "(NoSurfaceMatch) No mirrored sample point lies within {} of the surface", max_distance)
                } else {
                    write!(f, "(NoSurfaceMatch) No mirrored sample point found a surface match")
                }
            },
            FitError::EmptyObject => write!(f, "(EmptyObject) The object has no vertices"),
            FitError::SingularTransform => write!(f, "(SingularTransform) The transform is not invertible"),
            FitError::InvalidParameter(reason) => write!(f, "(InvalidParameter) {}", reason),
            FitError::TriMesh(tri_mesh_builder_error) => tri_mesh_builder_error.fmt(f),
            #[cfg(feature = "stl-io")]
            FitError::Io(io_error) => io_error.fmt(f),
        }
    }
}
