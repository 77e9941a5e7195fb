//! Broad phase: sort-and-sweep along the x axis
//!
//! Produces every pair whose horizontal extents overlap. That is a necessary
//! condition for circle overlap, so the result is a superset of real contacts.

use serde::{Deserialize, Serialize};

use super::state::Body;

/// Two bodies by index into the store, plus penetration once the narrow phase fills it in.
///
/// Only valid for the frame that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallPair {
    pub a: usize,
    pub b: usize,
    pub penetration: f32,
}

impl BallPair {
    /// Candidate pair, normalized so that `a < b`
    #[inline]
    pub fn new(i: usize, j: usize) -> Self {
        debug_assert_ne!(i, j, "a body cannot pair with itself");
        let (a, b) = if i < j { (i, j) } else { (j, i) };
        Self {
            a,
            b,
            penetration: 0.0,
        }
    }

    #[inline]
    pub fn with_penetration(self, penetration: f32) -> Self {
        Self {
            penetration,
            ..self
        }
    }

    #[inline]
    pub fn key(&self) -> (usize, usize) {
        (self.a, self.b)
    }
}

/// Sweep-and-prune over x intervals.
///
/// `order` and `out` are caller-owned buffers reused across frames; both are
/// cleared first.
pub fn sweep_and_prune(bodies: &[Body], order: &mut Vec<usize>, out: &mut Vec<BallPair>) {
    out.clear();
    order.clear();
    order.extend(0..bodies.len());
    order.sort_unstable_by(|&i, &j| bodies[i].x_interval().0.total_cmp(&bodies[j].x_interval().0));

    for (k, &i) in order.iter().enumerate() {
        let (_, max_x) = bodies[i].x_interval();
        for &j in &order[k + 1..] {
            let (min_x, _) = bodies[j].x_interval();
            if min_x > max_x {
                break;
            }
            out.push(BallPair::new(i, j));
        }
    }
}

/// Allocating convenience wrapper around [`sweep_and_prune`]
pub fn candidate_pairs(bodies: &[Body]) -> Vec<BallPair> {
    let mut order = Vec::with_capacity(bodies.len());
    let mut out = Vec::new();
    sweep_and_prune(bodies, &mut order, &mut out);
    out
}

/// O(n²) reference: every pair of truly overlapping circles
pub fn brute_force_pairs(bodies: &[Body]) -> Vec<BallPair> {
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in i + 1..bodies.len() {
            if super::narrowphase::circles_overlap(&bodies[i], &bodies[j]) {
                pairs.push(BallPair::new(i, j));
            }
        }
    }
    pairs
}
