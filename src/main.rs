//! Shape Storm headless runner
//!
//! Runs the simulation without a window and logs what happens. Usage:
//!
//! ```text
//! shape-storm [settings.json] [seconds]
//! ```
//!
//! Set `RUST_LOG=debug` for per-event output.

use std::time::{SystemTime, UNIX_EPOCH};

use shape_storm::consts::*;
use shape_storm::sim::World;
use shape_storm::{SimParams, SimResult};

fn main() {
    env_logger::init();
    log::info!("Shape Storm (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> SimResult<()> {
    let mut args = std::env::args().skip(1);

    let params = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| shape_storm::SimError::Config(format!("{path}: {e}")))?;
            let params = SimParams::from_json(&json)?;
            log::info!("Loaded settings from {path}");
            params
        }
        None => SimParams {
            trails: true,
            energy_transfer: true,
            ..Default::default()
        },
    };
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(10.0);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Seed: {seed}");

    let mut world = World::with_params(seed, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT, params)?;
    world.reset();
    world.spawn_shapes(AUTO_SPAWN_BATCH);
    world.spawn_at(DEFAULT_CANVAS_WIDTH / 2.0, DEFAULT_CANVAS_HEIGHT / 2.0, 60.0)?;

    let frames = (seconds / FRAME_SECS).round() as u64;
    let mut collisions = 0usize;
    for frame in 0..frames {
        // One blast a few seconds in
        if frame == 60 {
            world.arm_random_blast();
        }

        let report = world.tick();
        collisions += report.collisions;

        if frame % 60 == 59 {
            log::info!(
                "t={:.1}s shapes={} collisions={} energy={:.1}{}",
                world.clock(),
                world.len(),
                collisions,
                world.kinetic_energy(),
                if world.aftershock_active() { " [aftershock]" } else { "" }
            );
            collisions = 0;
        }
    }

    log::info!("Done after {} frames, {} shapes", world.frame_count(), world.len());
    Ok(())
}
