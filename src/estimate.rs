//! Sampled mirror error.
//!
//! Each sample point is mirrored into the object's own local space and matched
//! against the object's surface. The error is the mean over matched points of
//! the distance (or squared distance) between the mirrored point and its match.

use crate::errors::FitError;
use crate::float_types::Real;
use crate::mirror::Mirror;
use crate::sample::SampleSet;
use crate::traits::SurfaceQuery;
use crate::transform::{self, Transform};
use std::fmt;

/// How a single mirrored point's mismatch is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorMetric {
    /// `|q - c|²`: smooth near the optimum, no square root per point.
    #[default]
    SquaredDistance,
    /// `|q - c|`
    Distance,
}

impl ErrorMetric {
    fn measure(self, squared_distance: Real) -> Real {
        match self {
            ErrorMetric::SquaredDistance => squared_distance,
            ErrorMetric::Distance => squared_distance.sqrt(),
        }
    }

    /// Typical mismatch length represented by an error of this metric.
    pub fn length(self, error: Real) -> Real {
        match self {
            ErrorMetric::SquaredDistance => error.max(0.0).sqrt(),
            ErrorMetric::Distance => error.max(0.0),
        }
    }
}

/// A mean mirror error, or `Undefined` when no sample point matched.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorValue {
    Value(Real),
    Undefined,
}

impl ErrorValue {
    pub const fn is_defined(self) -> bool {
        matches!(self, ErrorValue::Value(_))
    }

    pub const fn value(self) -> Option<Real> {
        match self {
            ErrorValue::Value(v) => Some(v),
            ErrorValue::Undefined => None,
        }
    }

    /// The error as a number; `Undefined` is infinite.
    pub const fn as_real(self) -> Real {
        match self {
            ErrorValue::Value(v) => v,
            ErrorValue::Undefined => Real::INFINITY,
        }
    }

    /// Strictly lower than `other`. `Undefined` never improves on anything.
    pub fn improves_on(self, other: ErrorValue) -> bool {
        match (self, other) {
            (ErrorValue::Value(a), ErrorValue::Value(b)) => a < b,
            (ErrorValue::Value(_), ErrorValue::Undefined) => true,
            (ErrorValue::Undefined, _) => false,
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorValue::Value(v) => write!(f, "{:.6e}", v),
            ErrorValue::Undefined => write!(f, "undefined"),
        }
    }
}

/// Mean error of `sample` under an object-local mirroring transform.
///
/// `local_mirror` maps an object-local point to the object-local position of its
/// mirror image (see [`Mirror::local_reflection_for`]).
pub fn mean_error<Q: SurfaceQuery + ?Sized>(
    surface: &Q,
    local_mirror: &Transform,
    sample: &SampleSet,
    max_distance: Real,
    metric: ErrorMetric,
) -> ErrorValue {
    let mirrored: Vec<_> = sample
        .points()
        .iter()
        .map(|p| transform::transform_point(local_mirror, p))
        .collect();
    let hits = surface.nearest_points(&mirrored, max_distance);

    let mut total = 0.0;
    let mut count = 0usize;
    for (q, hit) in mirrored.iter().zip(hits) {
        if let Some(hit) = hit {
            total += metric.measure((q - hit.point).norm_squared());
            count += 1;
        }
    }

    if count == 0 {
        ErrorValue::Undefined
    } else {
        ErrorValue::Value(total / count as Real)
    }
}

/// Mirror error of an object placed at `object_world`.
///
/// ## Errors
/// [`FitError::SingularTransform`] when `object_world` cannot be inverted.
pub fn estimate_error<Q: SurfaceQuery + ?Sized>(
    surface: &Q,
    mirror: &Mirror,
    object_world: &Transform,
    sample: &SampleSet,
    max_distance: Real,
    metric: ErrorMetric,
) -> Result<ErrorValue, FitError> {
    let local_mirror = mirror.local_reflection_for(object_world)?;
    Ok(mean_error(surface, &local_mirror, sample, max_distance, metric))
}

/// Mirror error after composing an object-local `delta` onto `object_world`
/// (the object would be placed at `object_world · delta`).
pub fn estimate_error_with_delta<Q: SurfaceQuery + ?Sized>(
    surface: &Q,
    mirror: &Mirror,
    object_world: &Transform,
    delta: &Transform,
    sample: &SampleSet,
    max_distance: Real,
    metric: ErrorMetric,
) -> Result<ErrorValue, FitError> {
    estimate_error(surface, mirror, &(object_world * delta), sample, max_distance, metric)
}
