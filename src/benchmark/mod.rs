//! Benchmark utilities for point-to-hyperplane evaluation.
//!
//! The crate itself is only the index; loading real datasets, choosing
//! `top_k` / `cand` / `ratio` per experiment, and aggregating numbers
//! across runs belong to an external harness. This module supplies the
//! pieces such a harness (and this crate's own tests and benches) needs:
//!
//! - **Datasets**: seeded synthetic point sets and hyperplane queries
//! - **Ground truth**: brute-force top-k by hyperplane distance (and the
//!   maximum-inner-product mirror case)
//! - **Metrics**: recall@k and per-run result aggregation

pub mod datasets;
pub mod evaluation;

pub use datasets::{generate_hyperplane_queries, generate_uniform_points, normalize};
pub use evaluation::{
    compute_ground_truth, hyperplane_distance, mips_ground_truth, recall_at_k, EvalResults,
};
