//! Headless sandbox: spawns a crowd of rectangles into a hecs world,
//! runs the simulation at a fixed tick rate and logs how it's doing.
//!
//! Usage: `cargo run --example sandbox -- [config.ron]`
//! (defaults to `demos/sandbox.ron`, or built-in defaults if that doesn't exist).
//! Set `RUST_LOG=debug` for more output.

use std::{error::Error, path::Path};

use sweepframe::{
    hecs, Colliding, HecsSyncManager, HecsSyncOptions, SpawnParams, Spawner, TickClock, World,
    WorldParams,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct SandboxConfig {
    world: WorldParams,
    spawn: SpawnParams,
    /// Fixed seed for reproducible runs, random if not given.
    seed: Option<u64>,
    initial_count: usize,
    /// Bodies added every `batch_every_ticks` ticks.
    batch_count: usize,
    batch_every_ticks: u64,
    ticks_per_second: u32,
    run_seconds: f64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            world: WorldParams::default(),
            spawn: SpawnParams::default(),
            seed: None,
            initial_count: 1000,
            batch_count: 100,
            batch_every_ticks: 120,
            ticks_per_second: 60,
            run_seconds: 10.0,
        }
    }
}

fn load_config(path: &Path) -> Result<SandboxConfig, Box<dyn Error>> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(SandboxConfig::default());
    }
    let file = std::fs::File::open(path)?;
    Ok(ron::de::from_reader(file)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/sandbox.ron".to_string());
    let config = load_config(Path::new(&path))?;
    log::info!("{config:?}");

    let mut world = World::new(WorldParams {
        initial_capacity: config.spawn.max_bodies,
        ..config.world
    });
    let mut hecs_world = hecs::World::new();
    let mut sync = HecsSyncManager::new();
    let opts = HecsSyncOptions::both_ways();
    let mut spawner = match config.seed {
        Some(seed) => Spawner::seeded(config.spawn, seed),
        None => Spawner::from_entropy(config.spawn),
    };
    spawner.spawn_entities(
        &mut world,
        &mut hecs_world,
        &mut sync,
        config.initial_count,
        opts,
    )?;

    let mut clock = TickClock::new(config.ticks_per_second);
    let total_ticks = (config.run_seconds * config.ticks_per_second as f64) as u64;
    let mut tick_count: u64 = 0;
    let mut report_start = instant::Instant::now();
    let mut ticks_since_report = 0;
    clock.poll();

    while tick_count < total_ticks {
        for _ in 0..clock.poll() {
            sync.sync_hecs_to_world(&mut world, &mut hecs_world);
            let stats = world.tick()?;
            sync.sync_world_to_hecs(&world, &mut hecs_world);
            tick_count += 1;
            ticks_since_report += 1;

            if config.batch_every_ticks > 0 && tick_count % config.batch_every_ticks == 0 {
                spawner.spawn_entities(
                    &mut world,
                    &mut hecs_world,
                    &mut sync,
                    config.batch_count,
                    opts,
                )?;
            }

            let since_report = report_start.elapsed();
            if since_report.as_secs_f64() >= 1.0 {
                let colliding = hecs_world
                    .query_mut::<&Colliding>()
                    .into_iter()
                    .filter(|(_, c)| c.0)
                    .count();
                log::info!(
                    "TPS: {:.2}, bodies: {}, colliding: {}, pairs tested: {}, contacts: {}",
                    ticks_since_report as f64 / since_report.as_secs_f64(),
                    stats.bodies,
                    colliding,
                    stats.pairs_tested,
                    stats.contacts,
                );
                report_start = instant::Instant::now();
                ticks_since_report = 0;
            }
        }
        std::thread::sleep(clock.until_next_tick());
    }

    log::info!(
        "Finished {tick_count} ticks with {} bodies",
        world.body_count()
    );
    Ok(())
}
