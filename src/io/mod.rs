//! Mesh import.

#[cfg(feature = "stl-io")]
mod stl;
