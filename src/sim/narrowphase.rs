//! Narrow phase: exact circle-circle tests over broad-phase candidates

use super::broadphase::BallPair;
use super::state::Body;

/// Strict overlap test on squared distances (touching circles do not overlap)
#[inline]
pub fn circles_overlap(a: &Body, b: &Body) -> bool {
    let r = a.radius() + b.radius();
    a.position.distance_squared(b.position) < r * r
}

/// Penetration depth along the line of centers, if the circles overlap
#[inline]
pub fn penetration_depth(a: &Body, b: &Body) -> Option<f32> {
    if circles_overlap(a, b) {
        Some(a.radius() + b.radius() - a.position.distance(b.position))
    } else {
        None
    }
}

/// Filter `candidates` down to real contacts.
///
/// Every `colliding` flag is reset first, then set on both bodies of each
/// contact. `out` is cleared and refilled.
pub fn detect_collisions(bodies: &mut [Body], candidates: &[BallPair], out: &mut Vec<BallPair>) {
    out.clear();
    for body in bodies.iter_mut() {
        body.colliding = false;
    }

    for pair in candidates {
        if let Some(penetration) = penetration_depth(&bodies[pair.a], &bodies[pair.b]) {
            out.push(pair.with_penetration(penetration));
            bodies[pair.a].colliding = true;
            bodies[pair.b].colliding = true;
        }
    }
}
