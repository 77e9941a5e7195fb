//! Body store and simulation context
//!
//! `World` owns every body plus the per-frame scratch buffers. Bodies are
//! created once and never added, removed or resized afterwards.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::broadphase::BallPair;
use super::tick::FrameStats;
use crate::consts::INITIAL_SPEED;
use crate::settings::{ConfigError, SimConfig};

/// 8-bit RGBA color, display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Random blue-green tone (almost no red, soft green, dominant blue)
    pub fn random_ocean(rng: &mut impl Rng) -> Self {
        Self {
            r: rng.random_range(0..30),
            g: rng.random_range(100..180),
            b: rng.random_range(160..=255),
            a: 255,
        }
    }

    /// Normalized float color for shaders
    pub fn to_array_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Pack as 0xRRGGBBAA
    pub fn pack(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

/// A circular body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Position one step ago; `position - previous_position` is the Verlet velocity
    pub previous_position: Vec2,
    /// Explicit velocity (authoritative only under `IntegrationModel::ExplicitVelocity`)
    pub velocity: Vec2,
    radius: f32,
    pub color: Rgba,
    /// Touched by a contact this frame (diagnostic)
    #[serde(default)]
    pub colliding: bool,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, color: Rgba) -> Self {
        debug_assert!(radius > 0.0, "body radius must be positive, got {radius}");
        Self {
            position,
            previous_position: position,
            velocity,
            radius,
            color,
            colliding: false,
        }
    }

    /// Body at rest at `position`
    pub fn at_rest(position: Vec2, radius: f32) -> Self {
        Self::new(position, Vec2::ZERO, radius, Rgba::new(200, 200, 200, 255))
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Displacement over the last step, as seen by the Verlet integrator
    #[inline]
    pub fn implied_velocity(&self) -> Vec2 {
        self.position - self.previous_position
    }

    /// Horizontal extent used by the sweep
    #[inline]
    pub fn x_interval(&self) -> (f32, f32) {
        (self.position.x - self.radius, self.position.x + self.radius)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.previous_position.is_finite() && self.velocity.is_finite()
    }
}

/// Per-frame buffers reused between frames to avoid reallocating
#[derive(Debug, Clone, Default)]
pub(crate) struct Scratch {
    pub order: Vec<usize>,
    pub candidates: Vec<BallPair>,
    pub contacts: Vec<BallPair>,
}

/// The simulation context: configuration plus the body store
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    bodies: Vec<Body>,
    /// Frames advanced so far
    pub frame: u64,
    /// Simulated seconds so far (sum of clamped frame dt)
    pub elapsed: f64,
    /// Statistics from the most recent frame
    pub last_stats: FrameStats,
    pub(crate) scratch: Scratch,
}

impl World {
    /// Validate `config` and seed `config.body_count` bodies on a grid
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bodies = seed_bodies(&config);
        log::info!(
            "World {}x{} seeded with {} bodies (seed {:#x}, {:?}, {:?} x{})",
            config.world_width,
            config.world_height,
            bodies.len(),
            config.seed,
            config.integration,
            config.resolver,
            config.resolver_iterations
        );
        Ok(Self::from_parts(config, bodies))
    }

    /// Build a world around an explicit body list (`config.body_count` is ignored)
    pub fn with_bodies(config: SimConfig, bodies: Vec<Body>) -> Result<Self, ConfigError> {
        config.validate()?;
        if bodies.iter().any(|b| !(b.radius() > 0.0)) {
            return Err(ConfigError::Invalid {
                field: "bodies",
                reason: "every radius must be positive",
            });
        }
        Ok(Self::from_parts(config, bodies))
    }

    fn from_parts(config: SimConfig, bodies: Vec<Body>) -> Self {
        let n = bodies.len();
        Self {
            config,
            bodies,
            frame: 0,
            elapsed: 0.0,
            last_stats: FrameStats::default(),
            scratch: Scratch {
                order: Vec::with_capacity(n),
                candidates: Vec::with_capacity(n * 4),
                contacts: Vec::with_capacity(n * 2),
            },
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only view of every body, valid between frames
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Mutable access for the pipeline stages
    pub(crate) fn parts_mut(&mut self) -> (&SimConfig, &mut [Body], &mut Scratch) {
        (&self.config, self.bodies.as_mut_slice(), &mut self.scratch)
    }

    /// Mutable body slice; the store itself cannot grow or shrink
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }
}

/// Grid layout, bottom-up from the floor, with randomized velocity/size/color
pub fn seed_bodies(config: &SimConfig) -> Vec<Body> {
    let mut rng = Pcg32::seed_from_u64(config.seed);
    let step = config.grid_step();
    let cols = ((config.world_width / step).floor() as usize).max(1);

    (0..config.body_count)
        .map(|i| {
            let col = i % cols;
            let row = i / cols;
            let position = Vec2::new(
                col as f32 * step,
                config.world_height - step * (row as f32 + 1.0),
            );
            let velocity = Vec2::new(
                rng.random_range(-INITIAL_SPEED..INITIAL_SPEED),
                rng.random_range(-INITIAL_SPEED..INITIAL_SPEED),
            );
            let radius = if config.max_radius > config.min_radius {
                rng.random_range(config.min_radius..=config.max_radius)
            } else {
                config.min_radius
            };
            let color = Rgba::random_ocean(&mut rng);
            Body::new(position, velocity, radius, color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(count: usize) -> SimConfig {
        SimConfig {
            body_count: count,
            ..Default::default()
        }
    }

    #[test]
    fn test_seeding_is_bottom_up_grid() {
        let config = small_config(40);
        let bodies = seed_bodies(&config);
        assert_eq!(bodies.len(), 40);

        let step = config.grid_step();
        let cols = (config.world_width / step).floor() as usize;
        assert_eq!(bodies[0].position, Vec2::new(0.0, config.world_height - step));
        assert_eq!(bodies[1].position.x, step);
        assert_eq!(bodies[cols].position, Vec2::new(0.0, config.world_height - 2.0 * step));
    }

    #[test]
    fn test_seeded_bodies_respect_ranges() {
        let config = small_config(500);
        for body in seed_bodies(&config) {
            assert!(body.radius() >= config.min_radius && body.radius() <= config.max_radius);
            assert!(body.velocity.x >= -INITIAL_SPEED && body.velocity.x < INITIAL_SPEED);
            assert!(body.velocity.y >= -INITIAL_SPEED && body.velocity.y < INITIAL_SPEED);
            assert_eq!(body.previous_position, body.position);
            assert!(body.color.r < 30);
            assert!((100..180).contains(&body.color.g));
            assert!(body.color.b >= 160);
            assert_eq!(body.color.a, 255);
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = seed_bodies(&small_config(100));
        let b = seed_bodies(&small_config(100));
        assert_eq!(a, b);

        let other = SimConfig {
            seed: 7,
            ..small_config(100)
        };
        assert_ne!(a, seed_bodies(&other));
    }

    #[test]
    fn test_world_rejects_invalid_config() {
        let config = SimConfig {
            min_radius: 0.0,
            ..Default::default()
        };
        assert!(World::new(config).is_err());
    }

    #[test]
    fn test_with_bodies_rejects_zero_radius() {
        let mut body = Body::at_rest(Vec2::new(50.0, 50.0), 1.0);
        body.radius = 0.0;
        assert!(World::with_bodies(SimConfig::default(), vec![body]).is_err());
    }

    #[test]
    fn test_color_packing() {
        let c = Rgba::new(0x12, 0x34, 0x56, 0xff);
        assert_eq!(c.pack(), 0x123456ff);
        assert_eq!(c.to_array_f32()[3], 1.0);
    }
}
