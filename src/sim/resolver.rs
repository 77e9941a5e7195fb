//! Contact resolution
//!
//! The default strategy is position-based: each pass pushes overlapping
//! pairs apart along the live line of centers, deepest pairs first. The two
//! impulse strategies also touch the explicit `velocity` field, which only
//! matters under `IntegrationModel::ExplicitVelocity`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::broadphase::BallPair;
use super::state::Body;
use crate::separation_normal;

/// Starting Baumgarte coefficient; decays linearly to zero over the passes
pub const BAUMGARTE_BASE: f32 = 0.2;
/// Penetration the Baumgarte strategy leaves alone
pub const PENETRATION_SLOP: f32 = 0.05;

/// Selectable resolution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverStrategy {
    /// Pure positional correction, 50/50 split
    #[default]
    Positional,
    /// Positional split plus a normal velocity impulse
    Impulse,
    /// Softened positional correction with slop and decaying coefficient, plus impulse
    BaumgarteImpulse,
}

/// Stable sort, deepest penetration first
pub fn sort_by_penetration(pairs: &mut [BallPair]) {
    pairs.sort_by(|x, y| y.penetration.total_cmp(&x.penetration));
}

/// Run `iterations` passes of `strategy` over `pairs` (already in priority order)
pub fn resolve(bodies: &mut [Body], pairs: &[BallPair], strategy: ResolverStrategy, iterations: u32) {
    match strategy {
        ResolverStrategy::Positional => resolve_positional(bodies, pairs, iterations),
        ResolverStrategy::Impulse => resolve_impulse(bodies, pairs, iterations),
        ResolverStrategy::BaumgarteImpulse => resolve_baumgarte(bodies, pairs, iterations),
    }
}

/// Borrow both bodies of a pair mutably
#[inline]
fn pair_mut<'a>(bodies: &'a mut [Body], pair: &BallPair) -> (&'a mut Body, &'a mut Body) {
    debug_assert!(pair.a < pair.b);
    let (head, tail) = bodies.split_at_mut(pair.b);
    (&mut head[pair.a], &mut tail[0])
}

/// Cancel approaching normal velocity: a gets `-n*j`, b gets `+n*j`
#[inline]
fn apply_normal_impulse(a: &mut Body, b: &mut Body, normal: Vec2) {
    let rel = (b.velocity - a.velocity).dot(normal);
    if rel < 0.0 {
        let impulse = normal * -rel;
        a.velocity -= impulse;
        b.velocity += impulse;
    }
}

/// Position-based correction.
///
/// Coincident centers are pushed apart along +X; no velocities change.
pub fn resolve_positional(bodies: &mut [Body], pairs: &[BallPair], iterations: u32) {
    for _ in 0..iterations {
        for pair in pairs {
            let (a, b) = pair_mut(bodies, pair);
            let delta = b.position - a.position;
            let dist2 = delta.length_squared();
            let r = a.radius() + b.radius();

            if dist2 < r * r {
                let dist = dist2.sqrt();
                let correction = separation_normal(delta, dist) * (0.5 * (r - dist));
                a.position -= correction;
                b.position += correction;
                a.colliding = true;
                b.colliding = true;
            }
        }
    }
}

/// Naive iterative positional split followed by a velocity impulse
pub fn resolve_impulse(bodies: &mut [Body], pairs: &[BallPair], iterations: u32) {
    for _ in 0..iterations {
        for pair in pairs {
            let (a, b) = pair_mut(bodies, pair);
            let delta = b.position - a.position;
            let dist = delta.length();
            let overlap = a.radius() + b.radius() - dist;

            if overlap > 0.0 {
                let normal = separation_normal(delta, dist);
                let correction = normal * (overlap * 0.5);
                a.position -= correction;
                b.position += correction;
                apply_normal_impulse(a, b, normal);
                a.colliding = true;
                b.colliding = true;
            }
        }
    }
}

/// Baumgarte-stabilized impulse resolution
pub fn resolve_baumgarte(bodies: &mut [Body], pairs: &[BallPair], iterations: u32) {
    for i in 0..iterations {
        let coefficient = BAUMGARTE_BASE * (1.0 - i as f32 / iterations as f32);

        for pair in pairs {
            let (a, b) = pair_mut(bodies, pair);
            let delta = b.position - a.position;
            let dist = delta.length();
            let penetration = a.radius() + b.radius() - dist;

            if penetration > PENETRATION_SLOP {
                let normal = separation_normal(delta, dist);
                let correction = normal * (coefficient * penetration * 0.5);
                a.position -= correction;
                b.position += correction;
                apply_normal_impulse(a, b, normal);
                a.colliding = true;
                b.colliding = true;
            }
        }
    }
}

/// Deepest live overlap among `pairs`
pub fn max_penetration(bodies: &[Body], pairs: &[BallPair]) -> f32 {
    pairs
        .iter()
        .filter_map(|p| super::narrowphase::penetration_depth(&bodies[p.a], &bodies[p.b]))
        .fold(0.0, f32::max)
}
