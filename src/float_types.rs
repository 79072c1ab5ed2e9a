//! Scalar precision, selected by the `f64` (default) or `f32` feature.

#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;
#[cfg(feature = "f32")]
pub use parry3d;

#[cfg(feature = "f64")]
pub type Real = f64;
#[cfg(feature = "f32")]
pub type Real = f32;

#[cfg(feature = "f64")]
pub use core::f64::consts::{PI, TAU};
#[cfg(feature = "f32")]
pub use core::f32::consts::{PI, TAU};

use std::sync::OnceLock;

/// Lengths below this are treated as zero when normalizing axes and normals.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-10;
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-5;

#[cfg(feature = "f64")]
const DEFAULT_MIN_SPEED: Real = 1e-6;
#[cfg(feature = "f32")]
const DEFAULT_MIN_SPEED: Real = 1e-4;

static MIN_SPEED: OnceLock<Real> = OnceLock::new();

/// Step scale below which a fit gives up; the default of [`FitParams::min_speed`].
///
/// Read once, from `MIRRORFIT_TOLERANCE` at build time if it parses, or from an
/// earlier [`set_tolerance`] call.
///
/// [`FitParams::min_speed`]: crate::FitParams::min_speed
pub fn tolerance() -> Real {
    *MIN_SPEED.get_or_init(|| {
        option_env!("MIRRORFIT_TOLERANCE")
            .and_then(|raw| raw.parse::<Real>().ok())
            .filter(|value| value.is_finite())
            .map_or(DEFAULT_MIN_SPEED, |value| value.max(Real::EPSILON))
    })
}

/// Fixes [`tolerance`] for the process. Has no effect once it has been read.
pub fn set_tolerance(value: Real) {
    let _ = MIN_SPEED.set(value.max(Real::EPSILON));
}
