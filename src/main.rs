//! Ball Pit headless runner
//!
//! Drives the simulation at a fixed display rate without a window, fires an
//! explosion every few seconds, and logs frame statistics.
//!
//! Usage: `ball-pit [config.json] [seconds]`

use std::time::Instant;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use ball_pit::sim::{Explosion, FrameInput, tick};
use ball_pit::{SimConfig, World, snapshot};

/// Display refresh the runner pretends to have
const DISPLAY_DT: f32 = 1.0 / 60.0;
/// Seconds between scripted explosions
const EXPLOSION_INTERVAL: f32 = 2.0;
/// Default run length (seconds)
const DEFAULT_SECONDS: f32 = 10.0;

fn main() {
    env_logger::init();
    log::info!("Ball Pit (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load_or_default(path),
        None => SimConfig::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_SECONDS);

    let mut world = match World::new(config) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Stand-in for pointer taps
    let mut taps = Pcg32::seed_from_u64(world.config().seed ^ 0x0ba1_1b00);
    let frames = (seconds / DISPLAY_DT).round() as u64;
    let frames_per_explosion = (EXPLOSION_INTERVAL / DISPLAY_DT).round() as u64;

    let started = Instant::now();
    let mut busiest_frame = 0.0f64;
    for frame in 1..=frames {
        let mut input = FrameInput::default();
        if frame % frames_per_explosion == 0 {
            let config = world.config();
            let center = Vec2::new(
                taps.random_range(0.0..config.world_width),
                taps.random_range(0.0..config.world_height),
            );
            input.explosions.push(Explosion::at(center, config));
        }

        let frame_start = Instant::now();
        let stats = tick(&mut world, &input, DISPLAY_DT);
        busiest_frame = busiest_frame.max(frame_start.elapsed().as_secs_f64());

        if stats.explosion_hits > 0 {
            log::info!("Frame {}: explosion moved {} bodies", stats.frame, stats.explosion_hits);
        }
        if frame % 60 == 0 {
            log::info!(
                "t={:.1}s contacts={} candidates={} residual={:.3}",
                world.elapsed,
                stats.contacts,
                stats.candidates,
                stats.residual_penetration
            );
        }
    }

    let total = started.elapsed().as_secs_f64();
    let instances = snapshot(&world);
    let colliding = instances.iter().filter(|i| i.colliding != 0).count();
    log::info!(
        "Simulated {} frames of {} bodies in {:.2}s (avg {:.2} ms, worst {:.2} ms); {} bodies in contact",
        frames,
        world.body_count(),
        total,
        total * 1000.0 / frames.max(1) as f64,
        busiest_frame * 1000.0,
        colliding
    );
}
