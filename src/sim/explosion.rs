//! Radial explosion impulse
//!
//! Under Verlet integration there is no velocity to kick, so the explosion
//! pulls `previous_position` back toward the center instead; the next step
//! then sees an outward implied velocity. The explicit-velocity world gets
//! the same kick added to `velocity`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Body;
use crate::consts::DEGENERATE_DISTANCE_SQ;
use crate::settings::SimConfig;

/// A single explosion trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub radius: f32,
    pub strength: f32,
}

impl Explosion {
    pub fn new(center: Vec2, radius: f32, strength: f32) -> Self {
        Self {
            center,
            radius,
            strength,
        }
    }

    /// Explosion at `center` with the configured radius and strength
    pub fn at(center: Vec2, config: &SimConfig) -> Self {
        Self::new(center, config.explosion_radius, config.explosion_strength)
    }

    /// Outward kick for `body`, or `None` if it is out of range or on the exact center.
    ///
    /// A non-positive radius reaches nothing.
    #[inline]
    pub fn kick_for(&self, body: &Body) -> Option<Vec2> {
        if !(self.radius > 0.0) {
            return None;
        }
        let dir = body.position - self.center;
        let dist2 = dir.length_squared();
        if dist2 < self.radius * self.radius && dist2 > DEGENERATE_DISTANCE_SQ {
            let dist = dist2.sqrt();
            Some(dir / dist * falloff(dist, self.radius, self.strength))
        } else {
            None
        }
    }
}

/// Linear falloff: full `strength` at the center, zero at and beyond `radius`
#[inline]
pub fn falloff(distance: f32, radius: f32, strength: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        0.0
    } else {
        strength * (1.0 - distance.max(0.0) / radius)
    }
}

/// Verlet variant: retreat `previous_position` away from the blast direction.
///
/// Returns the number of bodies affected.
pub fn apply_to_previous_position(bodies: &mut [Body], explosion: &Explosion) -> usize {
    let mut hits = 0;
    for body in bodies.iter_mut() {
        if let Some(kick) = explosion.kick_for(body) {
            body.previous_position -= kick;
            hits += 1;
        }
    }
    log::trace!("Explosion at {:?} hit {} bodies", explosion.center, hits);
    hits
}

/// Explicit-velocity variant: add the kick to `velocity`
pub fn apply_to_velocity(bodies: &mut [Body], explosion: &Explosion) -> usize {
    let mut hits = 0;
    for body in bodies.iter_mut() {
        if let Some(kick) = explosion.kick_for(body) {
            body.velocity += kick;
            hits += 1;
        }
    }
    log::trace!("Explosion at {:?} kicked {} bodies", explosion.center, hits);
    hits
}
