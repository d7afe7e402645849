//! verge: point-to-hyperplane nearest neighbor search (P2HNNS).
//!
//! Given n points in d dimensions, find the k points closest to a query
//! **hyperplane** `{x : w·x = 0}` rather than to a query point. The
//! distance is `|w·x| / ‖w‖`. This flavor of search shows up wherever a
//! separating direction is the query: active learning (points nearest
//! the decision boundary are the most informative to label), margin-based
//! outlier probes, and maximum-inner-product shapes after the usual
//! transformations.
//!
//! # Why a tree, not LSH
//!
//! The hashing line of work (BH, MH, NH, FH) answers hyperplane queries
//! via asymmetric LSH families, paying for speed with index size and
//! recall variance. A ball tree with the right bound algebra is the
//! lightweight alternative: the distance from a bounding ball `(o, r)` to
//! the hyperplane is at least `(|w·o| − r·‖w‖) / ‖w‖`, which prunes whole
//! subtrees against the current k-th best. Leaves additionally carry a
//! **cone** decomposition of their members around the center direction,
//! tightening the bound per point before any exact evaluation is spent.
//!
//! Two knobs trade recall for speed at query time, with the tree built
//! once and never touched again:
//!
//! - **Approximation ratio `c ≥ 1`**: prune as if every candidate were
//!   `c×` further than its bound says. `c = 1` is exact search.
//! - **Candidate budget `cand`**: hard cap on exact point evaluations per
//!   query, bounding worst-case latency even when pruning fails.
//!
//! # Quick Start
//!
//! ```
//! use verge::{BcTree, BcTreeParams};
//!
//! // 100 points in 4 dimensions, row-major.
//! let data: Vec<f32> = (0..400).map(|i| (i as f32 * 0.37).sin()).collect();
//! let params = BcTreeParams { leaf_size: 10, seed: 42 };
//! let tree = BcTree::build(&data, 4, params).unwrap();
//!
//! // 5 points nearest the hyperplane with normal w, exact search.
//! let w = [0.5_f32, -1.0, 0.25, 0.0];
//! let results = tree.search_topk(&w, 5, 100, 1.0).unwrap();
//! assert_eq!(results.len(), 5);
//! ```
//!
//! # Structure
//!
//! - [`bctree`]: the ball-and-cone tree (build, search, introspection)
//! - [`topk`]: bounded top-k lists ([`MinKList`] for distances,
//!   [`MaxKList`] for the inner-product mirror case)
//! - [`simd`]: dense vector kernels shared by build and search
//! - [`benchmark`]: seeded datasets, brute-force ground truth, recall
//!
//! # References
//!
//! - Huang & Tung: "Lightweight-Yet-Efficient: Revitalizing Ball-Tree for
//!   Point-to-Hyperplane Nearest Neighbor Search" (ICDE 2023)
//! - Huang, Lei & Tung: "Point-to-Hyperplane Nearest Neighbor Search
//!   Beyond the Unit Hypersphere" (SIGMOD 2021)
//! - Omohundro: "Five Balltree Construction Algorithms" (1989)

pub mod bctree;
pub mod benchmark;
pub mod error;
pub mod simd;
pub mod topk;

pub use bctree::{BcTree, BcTreeParams, TreeStats};
pub use error::{IndexError, Result};
pub use topk::{MaxKList, MinKList, INVALID_ID};
