//! Seeded vertex subsampling.
//!
//! A fit measures error on a fixed subset of the object's vertices, drawn once at
//! the start of a run. The same source, count, seed and policy always select the
//! same points.

use crate::float_types::Real;
use crate::traits::VertexSource;
use nalgebra::Point3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Whether a vertex may be drawn more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplingPolicy {
    /// Every selected vertex is distinct.
    #[default]
    WithoutReplacement,
    /// Independent uniform draws. Repeated vertices weigh more in the error,
    /// biasing it towards whatever was drawn twice.
    WithReplacement,
}

/// Object-local points used to evaluate the mirror error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSet {
    points: Vec<Point3<Real>>,
}

impl SampleSet {
    /// Uses the given points as they are.
    pub const fn from_points(points: Vec<Point3<Real>>) -> Self {
        Self { points }
    }

    /// Every vertex of `source`, in order.
    pub fn all<V: VertexSource + ?Sized>(source: &V) -> Self {
        let points = (0..source.vertex_count()).map(|i| source.vertex(i)).collect();
        Self { points }
    }

    /// Draws `count` vertices from `source` with a generator seeded by `seed`.
    ///
    /// A `count` of zero, or one at least as large as the vertex count, returns
    /// every vertex. Selected vertices keep their source order.
    pub fn draw<V: VertexSource + ?Sized>(
        source: &V,
        count: usize,
        seed: u64,
        policy: SamplingPolicy,
    ) -> Self {
        let total = source.vertex_count();
        if count == 0 || count >= total {
            return Self::all(source);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut indices: Vec<usize> = match policy {
            SamplingPolicy::WithoutReplacement => {
                rand::seq::index::sample(&mut rng, total, count).into_vec()
            },
            SamplingPolicy::WithReplacement => {
                (0..count).map(|_| rng.random_range(0..total)).collect()
            },
        };
        indices.sort_unstable();

        let points = indices.into_iter().map(|i| source.vertex(i)).collect();
        Self { points }
    }

    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<Point3<Real>> {
        (0..n).map(|i| Point3::new(i as Real, 0.0, 0.0)).collect()
    }

    #[test]
    fn same_seed_same_subset() {
        let verts = grid(500);
        let a = SampleSet::draw(&verts, 40, 7, SamplingPolicy::WithoutReplacement);
        let b = SampleSet::draw(&verts, 40, 7, SamplingPolicy::WithoutReplacement);
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let verts = grid(500);
        let a = SampleSet::draw(&verts, 40, 1, SamplingPolicy::WithoutReplacement);
        let b = SampleSet::draw(&verts, 40, 2, SamplingPolicy::WithoutReplacement);
        assert_ne!(a, b);
    }

    #[test]
    fn without_replacement_has_no_duplicates() {
        let verts = grid(64);
        let sample = SampleSet::draw(&verts, 63, 11, SamplingPolicy::WithoutReplacement);
        let xs: Vec<Real> = sample.points().iter().map(|p| p.x).collect();
        for pair in xs.windows(2) {
            assert!(pair[0] < pair[1], "sample is sorted and distinct: {:?}", pair);
        }
    }

    #[test]
    fn with_replacement_draws_requested_count() {
        let verts = grid(10);
        let sample = SampleSet::draw(&verts, 9, 3, SamplingPolicy::WithReplacement);
        assert_eq!(sample.len(), 9);
        assert!(sample.points().iter().all(|p| p.x >= 0.0 && p.x < 10.0));
    }
}
