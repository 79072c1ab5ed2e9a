//! Fit a rigid object to be **symmetric about a mirror plane**.
//!
//! Given an object's surface, its world transform and a mirror, the fit nudges
//! the transform until the object's mirror image lies on the object itself.
//! Error is measured on a seeded sample of the object's vertices: each is
//! reflected through the mirror and matched to the nearest point of the object's
//! surface. A derivative-free step search then tries translating along the
//! mirror normal and tilting about the two in-plane axes, keeping whatever
//! lowers the error and halving the step otherwise.
//!
//! The surface query is a trait ([`SurfaceQuery`]), so a host can plug in its
//! own spatial index. [`mesh::MeshSurface`] provides one on top of Parry.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to evaluate candidates and surface queries on several threads
//! - **serde**: `Serialize`/`Deserialize` for parameters and trace entries

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod estimate;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod mirror;
pub mod optimizer;
pub mod sample;
pub mod traits;
pub mod transform;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::FitError;
pub use estimate::{ErrorMetric, ErrorValue, estimate_error};
pub use mirror::{Mirror, MirrorReference, ProxyStyle};
pub use optimizer::{
    Candidate, FitParams, FitReport, MirrorFit, Termination, TraceEntry, fit_to_mirror,
};
pub use sample::{SampleSet, SamplingPolicy};
pub use traits::{SurfaceHit, SurfaceQuery, VertexSource};
pub use transform::Transform;
