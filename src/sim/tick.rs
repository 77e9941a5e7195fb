//! Per-frame pipeline
//!
//! explosions → integrate + walls → broad phase → narrow phase → sort →
//! resolve. Frames run to completion one after another; body state is only
//! observable between them.

use serde::{Deserialize, Serialize};

use super::broadphase::sweep_and_prune;
use super::explosion::{self, Explosion};
use super::integrator::{IntegrationModel, clamp_frame_dt, integrate_all};
use super::narrowphase::detect_collisions;
use super::resolver::{max_penetration, resolve, sort_by_penetration};
use super::state::{Body, World};

/// Inputs gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Explosion triggers, applied in order before integration
    pub explosions: Vec<Explosion>,
}

impl FrameInput {
    pub fn explosion(explosion: Explosion) -> Self {
        Self {
            explosions: vec![explosion],
        }
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub frame: u64,
    /// Integrated time step after clamping
    pub dt: f32,
    /// Broad-phase pairs
    pub candidates: usize,
    /// Narrow-phase contacts
    pub contacts: usize,
    /// Bodies that hit a wall, floor or ceiling
    pub bounces: usize,
    /// Bodies affected by explosions this frame
    pub explosion_hits: usize,
    /// Deepest overlap left among this frame's contacts after resolution
    pub residual_penetration: f32,
}

/// Apply one explosion using the variant matching the integration model
fn apply_explosion(model: IntegrationModel, bodies: &mut [Body], explosion: &Explosion) -> usize {
    match model {
        IntegrationModel::Verlet => explosion::apply_to_previous_position(bodies, explosion),
        IntegrationModel::ExplicitVelocity => explosion::apply_to_velocity(bodies, explosion),
    }
}

/// Advance the world by one frame of wall-clock time `dt` (seconds)
pub fn tick(world: &mut World, input: &FrameInput, dt: f32) -> FrameStats {
    let frame = world.frame + 1;
    let (config, bodies, scratch) = world.parts_mut();
    let dt = clamp_frame_dt(dt, config.max_frame_dt);

    let explosion_hits: usize = input
        .explosions
        .iter()
        .map(|e| apply_explosion(config.integration, bodies, e))
        .sum();

    let bounces = integrate_all(bodies, config, dt);

    sweep_and_prune(bodies, &mut scratch.order, &mut scratch.candidates);
    detect_collisions(bodies, &scratch.candidates, &mut scratch.contacts);
    sort_by_penetration(&mut scratch.contacts);
    resolve(bodies, &scratch.contacts, config.resolver, config.resolver_iterations);

    let stats = FrameStats {
        frame,
        dt,
        candidates: scratch.candidates.len(),
        contacts: scratch.contacts.len(),
        bounces,
        explosion_hits,
        residual_penetration: max_penetration(bodies, &scratch.contacts),
    };

    world.frame = frame;
    world.elapsed += dt as f64;
    world.last_stats = stats;
    log::debug!(
        "frame {}: dt={:.4} candidates={} contacts={} bounces={} residual={:.3}",
        stats.frame,
        stats.dt,
        stats.candidates,
        stats.contacts,
        stats.bounces,
        stats.residual_penetration
    );
    stats
}

impl World {
    /// Run one full frame with no new input
    pub fn advance(&mut self, dt: f32) -> FrameStats {
        tick(self, &FrameInput::default(), dt)
    }

    /// Apply an explosion immediately; it shows up as motion on the next frame.
    ///
    /// Returns the number of bodies affected.
    pub fn trigger_explosion(&mut self, explosion: Explosion) -> usize {
        let model = self.config().integration;
        apply_explosion(model, self.bodies_mut(), &explosion)
    }
}
