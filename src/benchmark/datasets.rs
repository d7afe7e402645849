//! Seeded synthetic dataset generation.
//!
//! Uniform random data is a pessimistic baseline for hyperplane search
//! (no cluster structure for the balls to exploit), which makes it a good
//! stress test for the pruning bounds. All generators are deterministic
//! given a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `n` points of dimension `dim` as a flat row-major array,
/// uniform in [-0.5, 0.5]^d.
pub fn generate_uniform_points(n: usize, dim: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n * dim).map(|_| rng.random::<f32>() - 0.5).collect()
}

/// Generate `n_queries` hyperplane normals of dimension `dim`, each
/// normalized to unit length.
///
/// The search treats the query as the normal of a hyperplane through the
/// origin; its magnitude cancels out of the ranking, so unit normals are
/// the canonical form.
pub fn generate_hyperplane_queries(n_queries: usize, dim: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_queries)
        .map(|_| {
            let v: Vec<f32> = (0..dim).map(|_| rng.random::<f32>() - 0.5).collect();
            normalize(&v)
        })
        .collect()
}

/// Return a unit-length copy of `v`; a near-zero vector is returned
/// unchanged.
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let norm = crate::simd::norm(v);
    if norm < 1e-10 {
        v.to_vec()
    } else {
        v.iter().map(|x| x / norm).collect()
    }
}
