//! Step-search refinement of an object's placement against a mirror.
//!
//! Each iteration tries six small perturbations of the current placement: a
//! translation either way along the mirror normal and a tilt either way about
//! each of the two in-plane axes. The best one is kept if it lowers the sampled
//! mirror error; otherwise the step scale is halved. Perturbations are expressed
//! in the object's own frame, so the search does not depend on where the object
//! sits in the world.

use crate::errors::FitError;
use crate::estimate::{self, ErrorMetric, ErrorValue};
use crate::float_types::{EPSILON, Real, tolerance};
use crate::mesh::MeshSurface;
use crate::mirror::Mirror;
use crate::sample::{SampleSet, SamplingPolicy};
use crate::traits::SurfaceQuery;
use crate::transform::{self, Transform};
use log::{debug, info, warn};
use nalgebra::Vector3;
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A mismatch shorter than this many machine epsilons of the object radius
/// cannot be resolved at the object's scale and counts as zero.
const RESOLUTION_ULPS: Real = 64.0;

/// Parameters of a mirror fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitParams {
    /// Ignore surface matches farther than this; `0` means unbounded (default: `0`).
    pub max_distance: Real,
    /// Number of refinement iterations (default: 20).
    pub iterations: u32,
    /// Number of vertices to sample for the error; `0` uses all (default: 20).
    pub sample_count: usize,
    /// Seed of the vertex sampler (default: 0).
    pub sample_seed: u64,
    /// Whether a vertex may be sampled twice (default: without replacement).
    pub sampling: SamplingPolicy,
    /// Initial step scale (default: 1).
    pub speed: Real,
    /// Per-point error measure (default: squared distance).
    pub metric: ErrorMetric,
    /// Tilt angle per unit of step length, relative to the object radius (default: 1).
    pub rotation_gain: Real,
    /// The run stops once the step scale drops below this (default: [`tolerance`]).
    pub min_speed: Real,
    /// The run stops once the error is at or below this; `0` leaves only the
    /// resolution stop (default: `0`).
    pub target_error: Real,
    /// Keep a per-iteration trace in the report (default: true).
    pub record_trace: bool,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            max_distance: 0.0,
            iterations: 20,
            sample_count: 20,
            sample_seed: 0,
            sampling: SamplingPolicy::WithoutReplacement,
            speed: 1.0,
            metric: ErrorMetric::SquaredDistance,
            rotation_gain: 1.0,
            min_speed: tolerance(),
            target_error: 0.0,
            record_trace: true,
        }
    }
}

impl FitParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: Real) -> Self {
        self.max_distance = max_distance;
        self
    }

    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the sample count; `0` samples every vertex.
    #[must_use]
    pub const fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    #[must_use]
    pub const fn with_sample_seed(mut self, sample_seed: u64) -> Self {
        self.sample_seed = sample_seed;
        self
    }

    #[must_use]
    pub const fn with_sampling(mut self, sampling: SamplingPolicy) -> Self {
        self.sampling = sampling;
        self
    }

    #[must_use]
    pub const fn with_speed(mut self, speed: Real) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub const fn with_metric(mut self, metric: ErrorMetric) -> Self {
        self.metric = metric;
        self
    }

    #[must_use]
    pub const fn with_rotation_gain(mut self, rotation_gain: Real) -> Self {
        self.rotation_gain = rotation_gain;
        self
    }

    #[must_use]
    pub const fn with_min_speed(mut self, min_speed: Real) -> Self {
        self.min_speed = min_speed;
        self
    }

    #[must_use]
    pub const fn with_target_error(mut self, target_error: Real) -> Self {
        self.target_error = target_error;
        self
    }

    #[must_use]
    pub const fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    /// Checks every parameter is in range.
    ///
    /// ## Errors
    /// [`FitError::InvalidParameter`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), FitError> {
        if self.max_distance.is_nan() || self.max_distance < 0.0 {
            return Err(invalid("max_distance", self.max_distance, ">= 0"));
        }
        if self.iterations < 1 {
            return Err(FitError::InvalidParameter("iterations must be >= 1".to_string()));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(invalid("speed", self.speed, "> 0"));
        }
        if !self.rotation_gain.is_finite() || self.rotation_gain <= 0.0 {
            return Err(invalid("rotation_gain", self.rotation_gain, "> 0"));
        }
        if !self.min_speed.is_finite() || self.min_speed < 0.0 {
            return Err(invalid("min_speed", self.min_speed, ">= 0"));
        }
        if !self.target_error.is_finite() || self.target_error < 0.0 {
            return Err(invalid("target_error", self.target_error, ">= 0"));
        }
        Ok(())
    }
}

fn invalid(name: &str, value: Real, expected: &str) -> FitError {
    FitError::InvalidParameter(format!("{} must be {}, got {}", name, expected, value))
}

/// One of the six perturbations tried per iteration, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Candidate {
    /// Translate along the mirror normal.
    PlusT,
    /// Translate against the mirror normal.
    MinusT,
    /// Tilt positively about the first in-plane axis.
    PlusA,
    MinusA,
    /// Tilt positively about the second in-plane axis.
    PlusB,
    MinusB,
}

impl Candidate {
    /// All candidates, in tie-breaking order.
    pub const ALL: [Candidate; 6] = [
        Candidate::PlusT,
        Candidate::MinusT,
        Candidate::PlusA,
        Candidate::MinusA,
        Candidate::PlusB,
        Candidate::MinusB,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Candidate::PlusT => "+T",
            Candidate::MinusT => "-T",
            Candidate::PlusA => "+A",
            Candidate::MinusA => "-A",
            Candidate::PlusB => "+B",
            Candidate::MinusB => "-B",
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The outcome of one iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEntry {
    /// 1-based iteration number.
    pub iteration: u32,
    /// The best candidate of the iteration.
    pub candidate: Candidate,
    /// Whether that candidate was committed.
    pub accepted: bool,
    /// The best candidate's error.
    pub error: ErrorValue,
    /// Step scale after the iteration.
    pub speed: Real,
}

/// Why a fit stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// All iterations were used.
    IterationBudget,
    /// The step scale fell below `min_speed`.
    StepUnderflow,
    /// The error reached `target_error`, or the mismatch fell below what the
    /// object's scale can resolve.
    Converged,
}

/// Result of a completed fit.
#[derive(Clone, Debug, PartialEq)]
pub struct FitReport {
    /// Final world transform of the object.
    pub transform: Transform,
    /// Error at `transform`.
    pub error: ErrorValue,
    /// Error at the starting transform.
    pub initial_error: ErrorValue,
    /// Iterations performed, accepted or not.
    pub iterations: u32,
    /// Iterations whose candidate was committed.
    pub accepted: u32,
    pub final_speed: Real,
    pub termination: Termination,
    /// Per-iteration outcomes; empty unless `record_trace` was set.
    pub trace: Vec<TraceEntry>,
}

/// A single fit run.
///
/// [`MirrorFit::new`] evaluates the starting placement; [`step`](Self::step)
/// performs one iteration; [`run`](Self::run) iterates to termination. A host
/// that wants to cancel or report progress drives `step` itself.
///
/// The object's transform is only ever replaced whole, by an accepted candidate,
/// so every intermediate state is at least as good as the start.
pub struct MirrorFit<'a, Q: SurfaceQuery + ?Sized> {
    surface: &'a Q,
    mirror: &'a Mirror,
    sample: &'a SampleSet,
    params: FitParams,
    radius: Real,

    transform: Transform,
    inverse: Transform,
    error: Real,
    initial_error: Real,
    speed: Real,
    iteration: u32,
    accepted: u32,
    termination: Option<Termination>,
    trace: Vec<TraceEntry>,
}

impl<'a, Q: SurfaceQuery + ?Sized> MirrorFit<'a, Q> {
    /// Starts a fit of the object at `object_world` against `mirror`.
    ///
    /// `radius` is the object's largest bounding-box dimension in world units.
    ///
    /// ## Errors
    /// - [`FitError::InvalidParameter`] for out-of-range `params` or `radius`
    /// - [`FitError::EmptyObject`] for an empty sample
    /// - [`FitError::SingularTransform`] if `object_world` cannot be inverted
    /// - [`FitError::NoSurfaceMatch`] if no mirrored sample point finds the surface
    pub fn new(
        surface: &'a Q,
        mirror: &'a Mirror,
        sample: &'a SampleSet,
        object_world: Transform,
        radius: Real,
        params: FitParams,
    ) -> Result<Self, FitError> {
        params.validate()?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(invalid("radius", radius, "> 0"));
        }
        if sample.is_empty() {
            return Err(FitError::EmptyObject);
        }

        let inverse = transform::invert(&object_world)?;
        let local_mirror = inverse * mirror.reflection() * object_world;
        let initial = estimate::mean_error(surface, &local_mirror, sample, params.max_distance, params.metric);
        let error = initial.value().ok_or(FitError::NoSurfaceMatch {
            max_distance: params.max_distance,
        })?;

        info!(
            "mirror fit: {} samples, {} iterations, initial error {}",
            sample.len(),
            params.iterations,
            initial
        );

        Ok(MirrorFit {
            surface,
            mirror,
            sample,
            radius,
            speed: params.speed,
            params,
            transform: object_world,
            inverse,
            error,
            initial_error: error,
            iteration: 0,
            accepted: 0,
            termination: None,
            trace: Vec::new(),
        })
    }

    /// Current world transform of the object.
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Error at the current transform.
    pub const fn error(&self) -> ErrorValue {
        ErrorValue::Value(self.error)
    }

    pub const fn speed(&self) -> Real {
        self.speed
    }

    pub const fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Why the fit stopped, once it has.
    pub const fn termination(&self) -> Option<Termination> {
        self.termination
    }

    fn stop_reason(&self) -> Option<Termination> {
        let resolution = self.radius * Real::EPSILON * RESOLUTION_ULPS;
        if self.error <= self.params.target_error || self.params.metric.length(self.error) <= resolution {
            Some(Termination::Converged)
        } else if self.speed < self.params.min_speed {
            Some(Termination::StepUnderflow)
        } else if self.iteration >= self.params.iterations {
            Some(Termination::IterationBudget)
        } else {
            None
        }
    }

    /// Object-local deltas for every candidate at the current step size.
    fn candidate_deltas(&self) -> [(Candidate, Transform); 6] {
        let dist = self.params.metric.length(self.error) * self.speed;
        let angle = dist / self.radius * self.params.rotation_gain;

        // The object frame may be scaled; keep the step `dist` long in local units.
        let local_t = transform::transform_vector(&self.inverse, self.mirror.t_axis())
            .try_normalize(EPSILON)
            .unwrap_or_else(Vector3::zeros)
            * dist;

        // A world rotation seen from the object, reduced to a pivot about its own origin.
        let tilt = |axis: &Vector3<Real>, angle: Real| {
            transform::rotation_part(&(self.inverse * transform::rotation_about(axis, angle) * self.transform))
        };

        [
            (Candidate::PlusT, transform::translation(&local_t)),
            (Candidate::MinusT, transform::translation(&-local_t)),
            (Candidate::PlusA, tilt(self.mirror.r1_axis(), angle)),
            (Candidate::MinusA, tilt(self.mirror.r1_axis(), -angle)),
            (Candidate::PlusB, tilt(self.mirror.r2_axis(), angle)),
            (Candidate::MinusB, tilt(self.mirror.r2_axis(), -angle)),
        ]
    }

    fn evaluate(&self, delta: &Transform) -> ErrorValue {
        estimate::estimate_error_with_delta(
            self.surface,
            self.mirror,
            &self.transform,
            delta,
            self.sample,
            self.params.max_distance,
            self.params.metric,
        )
        .unwrap_or(ErrorValue::Undefined)
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(&self, deltas: &[(Candidate, Transform)]) -> Vec<ErrorValue> {
        deltas.iter().map(|(_, delta)| self.evaluate(delta)).collect()
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(&self, deltas: &[(Candidate, Transform)]) -> Vec<ErrorValue> {
        deltas.par_iter().map(|(_, delta)| self.evaluate(delta)).collect()
    }

    /// Performs one iteration and returns its outcome, or `None` once the fit
    /// has terminated.
    pub fn step(&mut self) -> Option<TraceEntry> {
        if self.termination.is_some() {
            return None;
        }
        if let Some(reason) = self.stop_reason() {
            self.termination = Some(reason);
            info!(
                "mirror fit stopped ({:?}) after {} iterations, {} accepted: error {:.6e}",
                reason, self.iteration, self.accepted, self.error
            );
            return None;
        }

        let deltas = self.candidate_deltas();
        let errors = self.evaluate_all(&deltas);

        for ((candidate, _), error) in deltas.iter().zip(&errors) {
            if !error.is_defined() {
                debug!("candidate {} found no surface match", candidate);
            }
        }

        // First strictly-best candidate wins ties, in canonical order.
        let mut best = 0;
        for (i, error) in errors.iter().enumerate().skip(1) {
            if error.improves_on(errors[best]) {
                best = i;
            }
        }
        let (candidate, delta) = deltas[best];
        let best_error = errors[best];

        self.iteration += 1;
        let mut accepted = false;
        if best_error.improves_on(ErrorValue::Value(self.error)) {
            let next = self.transform * delta;
            if let (Some(value), Ok(inverse)) = (best_error.value(), transform::invert(&next)) {
                self.transform = next;
                self.inverse = inverse;
                self.error = value;
                self.accepted += 1;
                accepted = true;
                debug!("error accepted: {} ({})", best_error, candidate);
            }
        }
        if !accepted {
            if errors.iter().all(|e| !e.is_defined()) {
                warn!("no candidate found a surface match at iteration {}", self.iteration);
            }
            self.speed *= 0.5;
            debug!("error rejected: {} ({}), speed reduced to {}", best_error, candidate, self.speed);
        }

        let entry = TraceEntry {
            iteration: self.iteration,
            candidate,
            accepted,
            error: best_error,
            speed: self.speed,
        };
        if self.params.record_trace {
            self.trace.push(entry);
        }
        Some(entry)
    }

    /// Iterates until the fit terminates and reports the result.
    pub fn run(mut self) -> FitReport {
        while self.step().is_some() {}
        self.into_report()
    }

    /// Report of the fit in its current state.
    pub fn into_report(self) -> FitReport {
        FitReport {
            transform: self.transform,
            error: ErrorValue::Value(self.error),
            initial_error: ErrorValue::Value(self.initial_error),
            iterations: self.iteration,
            accepted: self.accepted,
            final_speed: self.speed,
            termination: self.termination.unwrap_or(Termination::IterationBudget),
            trace: self.trace,
        }
    }
}

/// Fits a mesh object at `object_world` to `mirror`.
///
/// Samples the object's vertices once with the seed and count in `params`,
/// derives the object radius from its world-scaled bounding box and runs the fit
/// to termination. On error the caller's transform is untouched.
///
/// ## Example
/// ```
/// use mirrorfit::{fit_to_mirror, FitParams, Mirror, MirrorReference};
/// use mirrorfit::mesh::MeshSurface;
/// use nalgebra::{Matrix4, Point3, Vector3};
///
/// let sphere = MeshSurface::sphere(1.0, 16, 8).unwrap();
/// let mirror = Mirror::new(
///     &MirrorReference::Polygon { center: Point3::origin(), normal: Vector3::x() },
///     &Matrix4::identity(),
/// ).unwrap();
/// let placed = Matrix4::new_translation(&Vector3::new(0.2, 0.0, 0.0));
///
/// let report = fit_to_mirror(&sphere, &placed, &mirror, &FitParams::new().with_sample_count(0)).unwrap();
/// assert!(report.error.as_real() <= report.initial_error.as_real());
/// ```
pub fn fit_to_mirror(
    object: &MeshSurface,
    object_world: &Transform,
    mirror: &Mirror,
    params: &FitParams,
) -> Result<FitReport, FitError> {
    let sample = SampleSet::draw(object, params.sample_count, params.sample_seed, params.sampling);
    let radius = object.bounding_radius(object_world);
    let fit = MirrorFit::new(object, mirror, &sample, *object_world, radius, params.clone())?;
    Ok(fit.run())
}
