//! Tree nodes and the pruning search.
//!
//! Internal nodes carry a bounding ball; leaves carry a ball plus a cone
//! decomposition of their members, which tightens the hyperplane-distance
//! lower bound at the point level. Nodes never copy point data: a leaf
//! owns a `(start, len)` window into the tree's shared index permutation.
//!
//! # Bound algebra
//!
//! For a query hyperplane normal `w` and a ball `(o, r)`, every point `x`
//! inside the ball satisfies `|w·x| >= |w·o| - r·‖w‖` (triangle
//! inequality on the projection onto `w`). All keys are kept as
//! un-normalized `|w·x|`; division by `‖w‖` is deferred to reporting, so
//! one subtraction and one multiply decide a subtree's fate.

use crate::simd;
use crate::topk::MinKList;

/// Borrowed views a search needs: the flat point array and the frozen
/// index permutation.
pub(crate) struct SearchContext<'a> {
    pub data: &'a [f32],
    pub dim: usize,
    pub index: &'a [u32],
}

impl SearchContext<'_> {
    #[inline]
    fn point(&self, id: u32) -> &[f32] {
        let start = id as usize * self.dim;
        &self.data[start..start + self.dim]
    }
}

/// Per-leaf cone decomposition of member points.
///
/// Each member `x` is split against the unit center direction
/// `ĉ = center/‖center‖` into `x_cos = x·ĉ` and the orthogonal magnitude
/// `x_sin = sqrt(‖x‖² − x_cos²)`. With the query decomposed the same way
/// once per leaf (`q_cos = (w·center)/‖center‖`,
/// `q_sin = sqrt(‖w‖² − q_cos²)`), Cauchy-Schwarz on the orthogonal
/// components gives the per-point lower bound
///
/// ```text
/// |w·x| >= |x_cos·q_cos| − x_sin·q_sin
/// ```
///
/// A true lower bound, so cone skipping can only drop points whose exact
/// score the result list would have rejected anyway. Leaves whose center
/// sits at the origin have no usable direction and carry no cone.
pub(crate) struct LeafCone {
    norm_center: f32,
    x_cos: Vec<f32>,
    x_sin: Vec<f32>,
}

impl LeafCone {
    pub(crate) fn new(norm_center: f32, x_cos: Vec<f32>, x_sin: Vec<f32>) -> Self {
        debug_assert_eq!(x_cos.len(), x_sin.len());
        Self {
            norm_center,
            x_cos,
            x_sin,
        }
    }

    /// Lower bound on `|w·x|` for member `i`, given the query
    /// decomposition for this leaf.
    #[inline]
    fn lower_bound(&self, i: usize, q_cos: f32, q_sin: f32) -> f32 {
        (self.x_cos[i] * q_cos).abs() - self.x_sin[i] * q_sin
    }
}

/// A node of the bc-tree.
pub(crate) enum BcNode {
    Internal {
        count: usize,
        center: Vec<f32>,
        radius: f32,
        left: Box<BcNode>,
        right: Box<BcNode>,
    },
    Leaf {
        center: Vec<f32>,
        radius: f32,
        cone: Option<LeafCone>,
        start: usize,
        len: usize,
    },
}

impl BcNode {
    pub(crate) fn center(&self) -> &[f32] {
        match self {
            BcNode::Internal { center, .. } | BcNode::Leaf { center, .. } => center,
        }
    }

    pub(crate) fn radius(&self) -> f32 {
        match self {
            BcNode::Internal { radius, .. } | BcNode::Leaf { radius, .. } => *radius,
        }
    }

    pub(crate) fn count(&self) -> usize {
        match self {
            BcNode::Internal { count, .. } => *count,
            BcNode::Leaf { len, .. } => *len,
        }
    }

    /// Recursive branch-and-bound hyperplane search.
    ///
    /// `ip` is `w·center` for this node, computed by the parent (the root
    /// value comes from the tree) so each center is scored exactly once.
    /// `cand` is the remaining exact-evaluation budget; each scored point
    /// consumes one unit and the walk stops when it reaches zero.
    pub(crate) fn search(
        &self,
        ctx: &SearchContext<'_>,
        ratio: f32,
        ip: f32,
        norm_q: f32,
        query: &[f32],
        cand: &mut usize,
        list: &mut MinKList,
    ) {
        if *cand == 0 {
            return;
        }
        // Ball bound: nothing inside can beat the threshold even after
        // scaling by the approximation ratio.
        let bound = ip.abs() - self.radius() * norm_q;
        if ratio * bound > list.max_key() {
            return;
        }

        match self {
            BcNode::Internal { left, right, .. } => {
                let ip_left = simd::dot(left.center(), query);
                let ip_right = simd::dot(right.center(), query);
                let est_left = ip_left.abs() - left.radius() * norm_q;
                let est_right = ip_right.abs() - right.radius() * norm_q;

                // Best-first: the child whose ball sits closer to the
                // hyperplane fills the list early, so the sibling is more
                // often pruned outright.
                if est_left <= est_right {
                    left.search(ctx, ratio, ip_left, norm_q, query, cand, list);
                    right.search(ctx, ratio, ip_right, norm_q, query, cand, list);
                } else {
                    right.search(ctx, ratio, ip_right, norm_q, query, cand, list);
                    left.search(ctx, ratio, ip_left, norm_q, query, cand, list);
                }
            }
            BcNode::Leaf {
                cone, start, len, ..
            } => {
                let (start, len) = (*start, *len);
                match cone {
                    Some(cone) => {
                        let q_cos = ip / cone.norm_center;
                        let q_sin = (norm_q * norm_q - q_cos * q_cos).max(0.0).sqrt();
                        for i in 0..len {
                            if *cand == 0 {
                                return;
                            }
                            if ratio * cone.lower_bound(i, q_cos, q_sin) > list.max_key() {
                                continue;
                            }
                            let id = ctx.index[start + i];
                            let key = simd::dot(ctx.point(id), query).abs();
                            list.insert(key, id);
                            *cand -= 1;
                        }
                    }
                    None => {
                        for i in 0..len {
                            if *cand == 0 {
                                return;
                            }
                            let id = ctx.index[start + i];
                            let key = simd::dot(ctx.point(id), query).abs();
                            list.insert(key, id);
                            *cand -= 1;
                        }
                    }
                }
            }
        }
    }

    /// Append leaf point counts in left-to-right order.
    pub(crate) fn collect_leaf_sizes(&self, out: &mut Vec<usize>) {
        match self {
            BcNode::Internal { left, right, .. } => {
                left.collect_leaf_sizes(out);
                right.collect_leaf_sizes(out);
            }
            BcNode::Leaf { len, .. } => out.push(*len),
        }
    }

    /// Approximate heap footprint of this subtree in bytes.
    pub(crate) fn size_bytes(&self) -> usize {
        let own = std::mem::size_of::<BcNode>();
        match self {
            BcNode::Internal {
                center,
                left,
                right,
                ..
            } => {
                own + center.len() * std::mem::size_of::<f32>()
                    + left.size_bytes()
                    + right.size_bytes()
            }
            BcNode::Leaf { center, cone, .. } => {
                let cone_bytes = cone.as_ref().map_or(0, |c| {
                    (c.x_cos.len() + c.x_sin.len()) * std::mem::size_of::<f32>()
                });
                own + center.len() * std::mem::size_of::<f32>() + cone_bytes
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cone_lower_bound_never_exceeds_exact_score() {
        // Hand-built leaf geometry: members decomposed against the
        // center direction must always lower-bound |w·x|.
        let points = [
            vec![1.0_f32, 0.2, -0.3],
            vec![0.8, 0.5, 0.1],
            vec![1.2, -0.1, 0.4],
        ];
        let mut center = vec![0.0_f32; 3];
        for p in &points {
            for (c, v) in center.iter_mut().zip(p) {
                *c += v / points.len() as f32;
            }
        }
        let norm_c = simd::norm(&center);
        assert!(norm_c > 0.0);

        let (mut x_cos, mut x_sin) = (Vec::new(), Vec::new());
        for p in &points {
            let c = simd::dot(p, &center) / norm_c;
            let s = (simd::dot(p, p) - c * c).max(0.0).sqrt();
            x_cos.push(c);
            x_sin.push(s);
        }
        let cone = LeafCone::new(norm_c, x_cos, x_sin);

        let queries = [
            vec![0.3_f32, -1.0, 0.5],
            vec![1.0, 1.0, 1.0],
            vec![-0.2, 0.0, 2.0],
        ];
        for w in &queries {
            let norm_q = simd::norm(w);
            let q_cos = simd::dot(w, &center) / norm_c;
            let q_sin = (norm_q * norm_q - q_cos * q_cos).max(0.0).sqrt();
            for (i, p) in points.iter().enumerate() {
                let exact = simd::dot(p, w).abs();
                let bound = cone.lower_bound(i, q_cos, q_sin);
                assert!(
                    bound <= exact + 1e-4,
                    "cone bound {bound} exceeds exact score {exact}"
                );
            }
        }
    }
}
