//! Brute-force ground truth and evaluation metrics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::simd;
use crate::topk::{MaxKList, MinKList};

/// Distance from point `x` to the hyperplane `{v : w·v = 0}`.
pub fn hyperplane_distance(w: &[f32], x: &[f32]) -> f32 {
    simd::dot(w, x).abs() / simd::norm(w)
}

/// Exhaustive top-k by hyperplane distance, for each query.
///
/// `data` is flat row-major `n × dim`. Returns the ids of the k closest
/// points per query, ascending by distance.
pub fn compute_ground_truth(
    data: &[f32],
    dim: usize,
    queries: &[Vec<f32>],
    k: usize,
) -> Vec<Vec<u32>> {
    let mut list = MinKList::new(k);
    queries
        .iter()
        .map(|query| {
            list.reset();
            for (id, point) in data.chunks(dim).enumerate() {
                list.insert(simd::dot(point, query).abs(), id as u32);
            }
            (0..list.len()).map(|i| list.ith_id(i)).collect()
        })
        .collect()
}

/// Exhaustive top-k by inner product (maximum-inner-product mirror case),
/// for each query point.
pub fn mips_ground_truth(data: &[f32], dim: usize, queries: &[Vec<f32>], k: usize) -> Vec<Vec<u32>> {
    let mut list = MaxKList::new(k);
    queries
        .iter()
        .map(|query| {
            list.reset();
            for (id, point) in data.chunks(dim).enumerate() {
                list.insert(simd::dot(point, query), id as u32);
            }
            (0..list.len()).map(|i| list.ith_id(i)).collect()
        })
        .collect()
}

/// Fraction of the true top-k found in the retrieved top-k.
pub fn recall_at_k(ground_truth: &[u32], retrieved: &[u32], k: usize) -> f32 {
    if k == 0 || ground_truth.is_empty() {
        return 0.0;
    }
    let gt_set: HashSet<u32> = ground_truth.iter().take(k).copied().collect();
    let ret_set: HashSet<u32> = retrieved.iter().take(k).copied().collect();
    gt_set.intersection(&ret_set).count() as f32 / k as f32
}

/// Per-run evaluation results, one entry per query.
///
/// Serializable so an external harness can dump measurements for
/// aggregation across algorithms and parameter sweeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalResults {
    /// Algorithm label, e.g. "bc-tree".
    pub algorithm: String,
    /// Configuration string, e.g. "leaf=100,cand=1000,c=1.5".
    pub config: String,
    /// Recall@k per query.
    pub recalls: Vec<f32>,
    /// Exact point evaluations per query.
    pub evaluations: Vec<usize>,
}

impl EvalResults {
    pub fn new(algorithm: impl Into<String>, config: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            config: config.into(),
            recalls: Vec::new(),
            evaluations: Vec::new(),
        }
    }

    /// Record one query's outcome.
    pub fn record(&mut self, recall: f32, evaluations: usize) {
        self.recalls.push(recall);
        self.evaluations.push(evaluations);
    }

    /// Mean recall across recorded queries, 0.0 when none.
    pub fn mean_recall(&self) -> f32 {
        if self.recalls.is_empty() {
            return 0.0;
        }
        self.recalls.iter().sum::<f32>() / self.recalls.len() as f32
    }

    /// Mean exact-evaluation count across recorded queries.
    pub fn mean_evaluations(&self) -> f32 {
        if self.evaluations.is_empty() {
            return 0.0;
        }
        self.evaluations.iter().sum::<usize>() as f32 / self.evaluations.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperplane_distance_basic() {
        // Distance from (3, 4) to the plane x = 0 is 3.
        let d = hyperplane_distance(&[1.0, 0.0], &[3.0, 4.0]);
        assert!((d - 3.0).abs() < 1e-6);
    }

    #[test]
    fn ground_truth_is_ascending_by_distance() {
        let data = vec![0.1f32, 5.0, -0.5, 1.0, 2.0, 0.0, 0.01, -1.0];
        let queries = vec![vec![1.0f32, 0.0]];
        let gt = compute_ground_truth(&data, 2, &queries, 4);
        assert_eq!(gt[0], vec![3, 0, 1, 2]);
    }

    #[test]
    fn mips_ground_truth_is_descending_by_ip() {
        let data = vec![1.0f32, 0.0, 0.0, 1.0, 2.0, 2.0];
        let queries = vec![vec![1.0f32, 1.0]];
        let gt = mips_ground_truth(&data, 2, &queries, 3);
        assert_eq!(gt[0][0], 2);
    }

    #[test]
    fn recall_bounds() {
        assert_eq!(recall_at_k(&[1, 2, 3], &[1, 2, 3], 3), 1.0);
        assert_eq!(recall_at_k(&[1, 2, 3], &[4, 5, 6], 3), 0.0);
        assert!((recall_at_k(&[1, 2], &[1, 9], 2) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn eval_results_aggregate() {
        let mut r = EvalResults::new("bc-tree", "leaf=10");
        r.record(1.0, 40);
        r.record(0.5, 60);
        assert!((r.mean_recall() - 0.75).abs() < 1e-6);
        assert!((r.mean_evaluations() - 50.0).abs() < 1e-6);
    }
}
