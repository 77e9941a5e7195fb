//! Ball Pit - thousands of circles falling, colliding and exploding
//!
//! Core modules:
//! - `sim`: Deterministic physics pipeline (integration, broad/narrow phase, resolution)
//! - `settings`: Startup configuration loaded from JSON
//! - `render`: GPU-ready snapshot of body state for drawing

pub mod render;
pub mod settings;
pub mod sim;

pub use render::{CircleInstance, snapshot};
pub use settings::{ConfigError, SimConfig};
pub use sim::{Explosion, FrameInput, FrameStats, World, tick};

use glam::Vec2;

/// Default tunables, mirrored by `SimConfig::default()`
pub mod consts {
    /// World dimensions (screen space, y grows downward)
    pub const WORLD_WIDTH: f32 = 1080.0;
    pub const WORLD_HEIGHT: f32 = 1340.0;
    /// The ceiling sits this far above the top edge so bodies can fly off-screen
    pub const CEILING_OFFSET: f32 = 1080.0;

    /// Body population
    pub const BODY_COUNT: usize = 2000;
    pub const MIN_RADIUS: f32 = 5.0;
    pub const MAX_RADIUS: f32 = 10.0;
    /// Extra gap between grid cells when seeding
    pub const GRID_PADDING: f32 = 20.0;
    /// Initial velocity components are drawn from [-INITIAL_SPEED, INITIAL_SPEED)
    pub const INITIAL_SPEED: f32 = 2.0;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 500.0;
    /// Fraction of velocity kept after a wall/floor bounce
    pub const RESTITUTION: f32 = 0.7;
    /// Maximum implied displacement per frame (units)
    pub const MAX_DISPLACEMENT: f32 = 5.0;
    /// Longest frame the pipeline will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Relaxation passes per frame
    pub const RESOLVER_ITERATIONS: u32 = 64;

    /// Explosion defaults
    pub const EXPLOSION_RADIUS: f32 = 900.0;
    pub const EXPLOSION_STRENGTH: f32 = 5.0;

    /// Squared distance below which two centers count as coincident
    pub const DEGENERATE_DISTANCE_SQ: f32 = 1e-4;

    /// Default RNG seed
    pub const SEED: u64 = 0x5eed_ba11;
}

/// Unit vector from `delta`, falling back to +X when `dist` is degenerate
#[inline]
pub fn separation_normal(delta: Vec2, dist: f32) -> Vec2 {
    if dist * dist <= consts::DEGENERATE_DISTANCE_SQ || !dist.is_finite() {
        Vec2::X
    } else {
        delta / dist
    }
}
