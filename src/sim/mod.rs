//! Deterministic physics pipeline
//!
//! Everything here is plain data plus free functions over a flat body store:
//! - Single-threaded, one frame at a time
//! - Seeded RNG only (world creation)
//! - Bodies referenced by stable index, never by pointer
//! - No rendering or platform dependencies

pub mod broadphase;
pub mod explosion;
pub mod integrator;
pub mod narrowphase;
pub mod resolver;
pub mod state;
pub mod tick;

pub use broadphase::{BallPair, brute_force_pairs, candidate_pairs, sweep_and_prune};
pub use explosion::{Explosion, falloff};
pub use integrator::{Bounds, IntegrationModel, apply_bounds, clamp_frame_dt, integrate_verlet};
pub use narrowphase::{circles_overlap, detect_collisions, penetration_depth};
pub use resolver::{ResolverStrategy, resolve, sort_by_penetration};
pub use state::{Body, Rgba, World, seed_bodies};
pub use tick::{FrameInput, FrameStats, tick};
