//! Random creation of bodies in batches.

use crate::{
    body::{InvalidBody, Rect},
    body_set::BodyKey,
    collision::bounds::Bounds,
    hecs_sync::{HecsSyncManager, HecsSyncOptions},
    math::Vec2,
    world::World,
};

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Parameters for the random bodies a [`Spawner`][self::Spawner] creates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SpawnParams {
    /// Smallest possible width and height.
    pub min_size: f64,
    /// Width and height are drawn from `min_size..max_size`.
    pub max_size: f64,
    /// Velocity components are drawn from `-max_speed..max_speed`.
    pub max_speed: f64,
    /// The spawner stops creating bodies once the world has this many.
    pub max_bodies: usize,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            min_size: 2.0,
            max_size: 20.0,
            max_speed: 1.0,
            max_bodies: 10_000,
        }
    }
}

/// Creates bodies of random size, position and velocity that fit inside given bounds.
pub struct Spawner<R = StdRng> {
    pub params: SpawnParams,
    rng: R,
}

impl Spawner<StdRng> {
    /// Create a spawner that produces the same bodies every time for the same seed.
    pub fn seeded(params: SpawnParams, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(params: SpawnParams) -> Self {
        Self::with_rng(params, StdRng::from_entropy())
    }
}

impl<R: Rng> Spawner<R> {
    pub fn with_rng(params: SpawnParams, rng: R) -> Self {
        Self { params, rng }
    }

    /// Generate the rectangle and velocity of a random body.
    ///
    /// The rectangle is inside the bounds as long as `max_size` is smaller than them.
    pub fn random_body(&mut self, bounds: Bounds) -> (Rect, Vec2) {
        let p = &self.params;
        let size_range = p.max_size - p.min_size;
        let size = Vec2::new(
            p.min_size + self.rng.gen::<f64>() * size_range,
            p.min_size + self.rng.gen::<f64>() * size_range,
        );
        let pos = Vec2::new(
            self.rng.gen::<f64>() * (bounds.width - size.x),
            self.rng.gen::<f64>() * (bounds.height - size.y),
        );
        let velocity = Vec2::new(
            -p.max_speed + self.rng.gen::<f64>() * 2.0 * p.max_speed,
            -p.max_speed + self.rng.gen::<f64>() * 2.0 * p.max_speed,
        );
        (Rect::new(pos, size), velocity)
    }

    // how many of the requested bodies fit under the cap
    fn batch_size(&self, requested: usize, existing: usize) -> usize {
        let room = self.params.max_bodies.saturating_sub(existing);
        if requested > room {
            log::warn!(
                "Spawning only {room} of {requested} requested bodies, limit is {}",
                self.params.max_bodies
            );
        }
        requested.min(room)
    }

    /// Insert a batch of random bodies into a world.
    ///
    /// Fewer than `count` bodies are created if the world would end up with more than
    /// `max_bodies`. Fails only if the params allow bodies without area.
    pub fn spawn_into(
        &mut self,
        world: &mut World,
        count: usize,
    ) -> Result<Vec<BodyKey>, InvalidBody> {
        let count = self.batch_size(count, world.body_count());
        let bounds = world.bounds();
        let keys = (0..count)
            .map(|_| {
                let (rect, velocity) = self.random_body(bounds);
                world.spawn(rect, velocity)
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Spawned {} bodies, {} in total", keys.len(), world.body_count());
        Ok(keys)
    }

    /// Insert a batch of random bodies into a world,
    /// each with an entity in a hecs world registered for syncing.
    pub fn spawn_entities(
        &mut self,
        world: &mut World,
        hecs_world: &mut hecs::World,
        sync: &mut HecsSyncManager,
        count: usize,
        opts: HecsSyncOptions,
    ) -> Result<Vec<hecs::Entity>, InvalidBody> {
        let count = self.batch_size(count, world.body_count());
        let bounds = world.bounds();
        let entities = (0..count)
            .map(|_| {
                let (rect, velocity) = self.random_body(bounds);
                sync.spawn(world, hecs_world, rect, velocity, opts)
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "Spawned {} entities, {} bodies in total",
            entities.len(),
            world.body_count()
        );
        Ok(entities)
    }
}
