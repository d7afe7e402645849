//! Recursive tree construction.
//!
//! The partitioner picks two pivots by a furthest-point heuristic, splits
//! the index range in place across their perpendicular bisector, and
//! recurses. A split that leaves one side empty is retried with fresh
//! random pivots up to three times, then forced to the midpoint, so
//! construction terminates with a balanced depth bound even when every
//! point is identical.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::node::{BcNode, LeafCone};
use crate::simd;

/// Split attempts before falling back to a forced midpoint split.
const MAX_SPLIT_ATTEMPTS: usize = 3;

const CENTER_NORM_EPSILON: f32 = 1e-9;

pub(crate) struct TreeBuilder<'a> {
    data: &'a [f32],
    dim: usize,
    leaf_size: usize,
    rng: StdRng,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(data: &'a [f32], dim: usize, leaf_size: usize, seed: u64) -> Self {
        Self {
            data,
            dim,
            leaf_size,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    fn point(&self, id: u32) -> &[f32] {
        let start = id as usize * self.dim;
        &self.data[start..start + self.dim]
    }

    /// Build the node covering `index`, which sits at `offset` within the
    /// tree's full permutation. Reorders `index` in place.
    pub(crate) fn build(&mut self, index: &mut [u32], offset: usize) -> BcNode {
        let n = index.len();
        debug_assert!(n > 0);
        let (center, radius) = self.bounding_ball(index);

        if n <= self.leaf_size {
            let cone = self.build_cone(index, &center);
            return BcNode::Leaf {
                center,
                radius,
                cone,
                start: offset,
                len: n,
            };
        }

        let split = self.split(index);
        let (lo, hi) = index.split_at_mut(split);
        let left = self.build(lo, offset);
        let right = self.build(hi, offset + split);
        BcNode::Internal {
            count: n,
            center,
            radius,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Partition `index` in place, returning the left-side count with
    /// `0 < count < n` guaranteed.
    fn split(&mut self, index: &mut [u32]) -> usize {
        let n = index.len();
        let mut w = vec![0.0f32; self.dim];

        for _ in 0..MAX_SPLIT_ATTEMPTS {
            let seed_pos = self.rng.random_range(0..n);
            let l_pos = self.furthest_from(seed_pos, index);
            let r_pos = self.furthest_from(l_pos, index);
            debug_assert_ne!(l_pos, r_pos);

            // Perpendicular bisector of the two pivots:
            // w·x + b < 0 exactly when x is closer to the left pivot.
            let l_pivot = self.point(index[l_pos]);
            let r_pivot = self.point(index[r_pos]);
            let mut l_sqr = 0.0f32;
            let mut r_sqr = 0.0f32;
            for ((wi, &lv), &rv) in w.iter_mut().zip(l_pivot).zip(r_pivot) {
                *wi = rv - lv;
                l_sqr += lv * lv;
                r_sqr += rv * rv;
            }
            let b = 0.5 * (l_sqr - r_sqr);

            let mut left = 0;
            let mut right = n;
            while left < right {
                let val = simd::dot(&w, self.point(index[left])) + b;
                if val < 0.0 {
                    left += 1;
                } else {
                    right -= 1;
                    index.swap(left, right);
                }
            }
            if left > 0 && left < n {
                return left;
            }
        }
        // Duplicate-heavy or otherwise unsplittable range: force an even
        // split so depth stays logarithmic and recursion terminates.
        n / 2
    }

    /// Position of the member furthest (squared L2) from `index[from]`.
    fn furthest_from(&self, from: usize, index: &[u32]) -> usize {
        let origin = self.point(index[from]);
        let mut far_pos = usize::MAX;
        let mut far_dist = -1.0f32;
        for (pos, &id) in index.iter().enumerate() {
            if pos == from {
                continue;
            }
            let dist = simd::l2_distance_squared(self.point(id), origin);
            if dist > far_dist {
                far_dist = dist;
                far_pos = pos;
            }
        }
        far_pos
    }

    /// Centroid and max member distance to it. The radius is a valid
    /// enclosing bound by construction; it need not be minimal.
    fn bounding_ball(&self, index: &[u32]) -> (Vec<f32>, f32) {
        let mut center = vec![0.0f32; self.dim];
        for &id in index {
            for (c, &v) in center.iter_mut().zip(self.point(id)) {
                *c += v;
            }
        }
        let inv_n = 1.0 / index.len() as f32;
        for c in center.iter_mut() {
            *c *= inv_n;
        }

        let mut radius = 0.0f32;
        for &id in index {
            radius = radius.max(simd::l2_distance(self.point(id), &center));
        }
        (center, radius)
    }

    /// Decompose leaf members against the center direction (see
    /// [`LeafCone`]). A leaf centered at the origin has no usable
    /// direction and gets no cone.
    fn build_cone(&self, index: &[u32], center: &[f32]) -> Option<LeafCone> {
        let norm_c = simd::norm(center);
        if norm_c <= CENTER_NORM_EPSILON {
            return None;
        }
        let mut x_cos = Vec::with_capacity(index.len());
        let mut x_sin = Vec::with_capacity(index.len());
        for &id in index {
            let p = self.point(id);
            let cos = simd::dot(p, center) / norm_c;
            let sin = (simd::dot(p, p) - cos * cos).max(0.0).sqrt();
            x_cos.push(cos);
            x_sin.push(sin);
        }
        Some(LeafCone::new(norm_c, x_cos, x_sin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(points: &[Vec<f32>]) -> Vec<f32> {
        points.iter().flatten().copied().collect()
    }

    fn ball_is_valid(node: &BcNode, builder: &TreeBuilder<'_>, index: &[u32]) {
        let (center, radius) = (node.center(), node.radius());
        match node {
            BcNode::Internal {
                left, right, count, ..
            } => {
                assert_eq!(left.count() + right.count(), *count);
                let (lo, hi) = index.split_at(left.count());
                for &id in index {
                    let d = simd::l2_distance(builder.point(id), center);
                    assert!(d <= radius + 1e-4, "point {id} outside ball: {d} > {radius}");
                }
                ball_is_valid(left, builder, lo);
                ball_is_valid(right, builder, hi);
            }
            BcNode::Leaf { len, .. } => {
                assert_eq!(*len, index.len());
                for &id in index {
                    let d = simd::l2_distance(builder.point(id), center);
                    assert!(d <= radius + 1e-4);
                }
            }
        }
    }

    #[test]
    fn build_produces_valid_balls_and_counts() {
        let mut points = Vec::new();
        for i in 0..80 {
            points.push(vec![
                (i as f32 * 0.37).sin(),
                (i as f32 * 0.71).cos(),
                i as f32 * 0.01,
            ]);
        }
        let data = flat(&points);
        let mut index: Vec<u32> = (0..80).collect();
        let mut builder = TreeBuilder::new(&data, 3, 8, 7);
        let root = builder.build(&mut index, 0);

        assert_eq!(root.count(), 80);
        ball_is_valid(&root, &builder, &index);

        let mut sorted = index.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..80).collect::<Vec<u32>>());
    }

    #[test]
    fn duplicate_points_take_forced_split() {
        // Identical points cannot be separated geometrically; the forced
        // midpoint split must still terminate with full coverage.
        let data: Vec<f32> = std::iter::repeat([1.0f32, 2.0])
            .take(5)
            .flatten()
            .collect();
        let mut index: Vec<u32> = (0..5).collect();
        let mut builder = TreeBuilder::new(&data, 2, 2, 99);
        let root = builder.build(&mut index, 0);

        assert_eq!(root.count(), 5);
        let mut sizes = Vec::new();
        root.collect_leaf_sizes(&mut sizes);
        assert_eq!(sizes.iter().sum::<usize>(), 5);
        for s in sizes {
            assert!(s <= 2);
        }
    }

    #[test]
    fn furthest_from_skips_origin_position() {
        let data = vec![0.0f32, 0.0, 1.0, 1.0, 5.0, 5.0];
        let index = vec![0u32, 1, 2];
        let builder = TreeBuilder::new(&data, 2, 1, 0);
        assert_eq!(builder.furthest_from(0, &index), 2);
        assert_eq!(builder.furthest_from(2, &index), 0);
    }
}
