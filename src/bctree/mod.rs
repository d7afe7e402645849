//! Ball-and-cone tree for point-to-hyperplane search.
//!
//! The index is built once, eagerly, and is immutable afterwards: a
//! binary tree over a permutation of point ids, with a bounding ball on
//! every node and an additional cone bound on every leaf. Point data is
//! borrowed, never copied; the tree only reads through it by id.
//!
//! # Quick Start
//!
//! ```
//! use verge::{BcTree, BcTreeParams, MinKList};
//!
//! // 4 points in 2 dimensions, row-major.
//! let data = [1.0_f32, 0.0, 0.0, 1.0, -1.0, 0.5, 0.3, -0.8];
//! let tree = BcTree::build(&data, 2, BcTreeParams::default()).unwrap();
//!
//! let mut list = MinKList::new(2);
//! let checked = tree.search(&[0.0, 1.0], 2, 4, 1.0, &mut list).unwrap();
//! assert!(checked <= 4);
//! assert_eq!(list.len(), 2);
//! ```
//!
//! Searches are read-only: a built tree can serve queries from multiple
//! threads as long as each query uses its own result list.

mod build;
mod node;

use crate::error::{IndexError, Result};
use crate::simd;
use crate::topk::MinKList;
use build::TreeBuilder;
use node::{BcNode, SearchContext};

/// Query normals with a smaller norm are rejected as degenerate.
const QUERY_NORM_EPSILON: f32 = 1e-9;

/// Construction parameters.
#[derive(Clone, Debug)]
pub struct BcTreeParams {
    /// Maximum number of points per leaf.
    pub leaf_size: usize,
    /// Seed for pivot selection. Builds are reproducible given the same
    /// seed and data.
    pub seed: u64,
}

impl Default for BcTreeParams {
    fn default() -> Self {
        Self {
            leaf_size: 100,
            seed: 42,
        }
    }
}

/// Summary statistics for a built tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub num_points: usize,
    pub dimension: usize,
    pub leaf_size: usize,
    pub num_leaves: usize,
    pub size_bytes: usize,
}

/// Ball-and-cone tree over a borrowed flat point array.
///
/// `data` is `n × dim` row-major and must outlive the tree. After
/// [`BcTree::build`] returns, neither the node graph nor the index
/// permutation is ever mutated.
pub struct BcTree<'a> {
    data: &'a [f32],
    num_points: usize,
    dim: usize,
    params: BcTreeParams,
    index: Vec<u32>,
    root: BcNode,
}

impl<'a> BcTree<'a> {
    /// Build a tree over `data`, interpreted as rows of `dim` floats.
    ///
    /// # Errors
    ///
    /// [`IndexError::EmptyIndex`] for empty data,
    /// [`IndexError::InvalidParameter`] for a zero dimension or leaf
    /// size, or data that is not a whole number of rows.
    pub fn build(data: &'a [f32], dim: usize, params: BcTreeParams) -> Result<BcTree<'a>> {
        if dim == 0 {
            return Err(IndexError::InvalidParameter(
                "dimension must be at least 1".into(),
            ));
        }
        if params.leaf_size == 0 {
            return Err(IndexError::InvalidParameter(
                "leaf_size must be at least 1".into(),
            ));
        }
        if data.is_empty() {
            return Err(IndexError::EmptyIndex);
        }
        if data.len() % dim != 0 {
            return Err(IndexError::InvalidParameter(format!(
                "data length {} is not a multiple of dimension {dim}",
                data.len()
            )));
        }
        let num_points = data.len() / dim;
        if num_points > u32::MAX as usize {
            return Err(IndexError::InvalidParameter(format!(
                "too many points: {num_points} exceeds u32 id space"
            )));
        }

        let mut index: Vec<u32> = (0..num_points as u32).collect();
        let mut builder = TreeBuilder::new(data, dim, params.leaf_size, params.seed);
        let root = builder.build(&mut index, 0);
        debug_assert_eq!(root.count(), num_points);

        Ok(BcTree {
            data,
            num_points,
            dim,
            params,
            index,
            root,
        })
    }

    /// Point-to-hyperplane search.
    ///
    /// Finds up to `top_k` points minimizing `|query·x| / ‖query‖`,
    /// allowing results within `ratio` (>= 1.0) of the true k-th distance
    /// and performing at most `min(cand + top_k - 1, n)` exact point
    /// evaluations. `list` is reset, clamped to `top_k` capacity, and
    /// filled with un-normalized `|query·x|` keys in ascending order.
    ///
    /// Returns the number of exact evaluations performed. Exhausting the
    /// budget is not an error; the list simply holds what was found.
    pub fn search(
        &self,
        query: &[f32],
        top_k: usize,
        cand: usize,
        ratio: f32,
        list: &mut MinKList,
    ) -> Result<usize> {
        if query.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                query_dim: query.len(),
                index_dim: self.dim,
            });
        }
        if top_k == 0 {
            return Err(IndexError::InvalidParameter(
                "top_k must be at least 1".into(),
            ));
        }
        if ratio < 1.0 {
            return Err(IndexError::InvalidParameter(format!(
                "approximation ratio must be >= 1.0, got {ratio}"
            )));
        }
        let norm_q = simd::norm(query);
        if norm_q <= QUERY_NORM_EPSILON {
            return Err(IndexError::DegenerateQuery);
        }

        list.reset();
        list.set_capacity(top_k.min(self.num_points));

        let budget = cand.saturating_add(top_k - 1).min(self.num_points);
        let mut remaining = budget;

        let ip = simd::dot(self.root.center(), query);
        let ctx = SearchContext {
            data: self.data,
            dim: self.dim,
            index: &self.index,
        };
        self.root
            .search(&ctx, ratio, ip, norm_q, query, &mut remaining, list);

        Ok(budget - remaining)
    }

    /// Convenience wrapper over [`BcTree::search`]: allocates the result
    /// list internally and reports `(id, distance)` pairs with the true
    /// normalized hyperplane distance, ascending.
    pub fn search_topk(
        &self,
        query: &[f32],
        top_k: usize,
        cand: usize,
        ratio: f32,
    ) -> Result<Vec<(u32, f32)>> {
        let mut list = MinKList::new(top_k.min(self.num_points));
        self.search(query, top_k, cand, ratio, &mut list)?;
        let inv_norm = 1.0 / simd::norm(query);
        Ok((0..list.len())
            .map(|i| (list.ith_id(i), list.ith_key(i) * inv_norm))
            .collect())
    }

    /// Leaf sizes in left-to-right order plus a copy of the frozen index
    /// permutation. Introspection for benchmarking and analysis tooling.
    pub fn traversal(&self) -> (Vec<usize>, Vec<u32>) {
        let mut sizes = Vec::new();
        self.root.collect_leaf_sizes(&mut sizes);
        (sizes, self.index.clone())
    }

    /// Approximate memory footprint in bytes: node graph, index
    /// permutation, and fixed overhead. Borrowed point data is excluded.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.index.len() * std::mem::size_of::<u32>()
            + self.root.size_bytes()
    }

    /// Number of indexed points.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Point dimensionality.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Configured leaf capacity.
    pub fn leaf_size(&self) -> usize {
        self.params.leaf_size
    }

    /// Summary statistics.
    pub fn stats(&self) -> TreeStats {
        let (leaf_sizes, _) = self.traversal();
        TreeStats {
            num_points: self.num_points,
            dimension: self.dim,
            leaf_size: self.params.leaf_size,
            num_leaves: leaf_sizes.len(),
            size_bytes: self.memory_usage(),
        }
    }
}
