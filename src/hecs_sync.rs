use crate::{
    body::{check_finite, InvalidBody, Rect},
    body_set::BodyKey,
    math::Vec2,
    world::World,
};

use thunderdome as td;

/// Velocity component for [`hecs`][hecs] entities, in units per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity(pub Vec2);

/// Collision flag component for [`hecs`][hecs] entities,
/// set if the entity's body overlapped another during the last tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Colliding(pub bool);

#[derive(Clone, Copy, Debug)]
pub struct HecsSyncOptions {
    pub hecs_to_world: bool,
    pub world_to_hecs: bool,
    pub autodelete: bool,
}

impl HecsSyncOptions {
    #[inline]
    pub fn both_ways() -> Self {
        Self {
            hecs_to_world: true,
            world_to_hecs: true,
            autodelete: true,
        }
    }

    #[inline]
    pub fn hecs_to_world_only() -> Self {
        Self {
            hecs_to_world: true,
            world_to_hecs: false,
            autodelete: true,
        }
    }

    #[inline]
    pub fn world_to_hecs_only() -> Self {
        Self {
            hecs_to_world: false,
            world_to_hecs: true,
            autodelete: false,
        }
    }

    #[inline]
    pub fn do_not_sync() -> Self {
        Self {
            hecs_to_world: false,
            world_to_hecs: false,
            autodelete: false,
        }
    }
}

/// Automatically syncs information between a [`hecs`][hecs] world
/// and a [`World`][crate::World].
///
/// Entities are connected to bodies by a [`BodyKey`][crate::BodyKey] component.
/// Going into the world, [`Rect`][crate::Rect] and [`Velocity`][self::Velocity]
/// components are copied to the body. Coming back out, the body's rectangle, velocity
/// and collision flag are written to the `Rect`, `Velocity` and
/// [`Colliding`][self::Colliding] components, whichever the entity has.
#[derive(Default, Debug)]
pub struct HecsSyncManager {
    /// If set, automatically uses these options to register all hecs entities
    /// with [`BodyKey`][crate::BodyKey] components that haven't been registered manually.
    /// None by default.
    pub default_opts: Option<HecsSyncOptions>,
    body_entity_map: td::Arena<(hecs::Entity, HecsSyncOptions)>,
}

impl HecsSyncManager {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_autosync(opts: HecsSyncOptions) -> Self {
        Self {
            default_opts: Some(opts),
            ..Self::default()
        }
    }

    #[inline]
    pub fn register_body(&mut self, body: BodyKey, entity: hecs::Entity, opts: HecsSyncOptions) {
        self.body_entity_map.insert_at(body.0, (entity, opts));
    }

    /// Get the entity registered for a body.
    #[inline]
    pub fn entity_of(&self, body: BodyKey) -> Option<hecs::Entity> {
        self.body_entity_map.get(body.0).map(|(entity, _)| *entity)
    }

    /// Number of registered bodies.
    #[inline]
    pub fn len(&self) -> usize {
        self.body_entity_map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body_entity_map.is_empty()
    }

    /// Create a body in the world and an entity for it in the hecs world,
    /// registered with the given options.
    pub fn spawn(
        &mut self,
        world: &mut World,
        hecs_world: &mut hecs::World,
        rect: Rect,
        velocity: Vec2,
        opts: HecsSyncOptions,
    ) -> Result<hecs::Entity, InvalidBody> {
        let key = world.spawn(rect, velocity)?;
        let entity = hecs_world.spawn((key, rect, Velocity(velocity), Colliding(false)));
        self.register_body(key, entity, opts);
        Ok(entity)
    }

    /// Sync data from a hecs world to the physics world.
    /// Call before [`World::tick`][crate::World::tick].
    pub fn sync_hecs_to_world(&mut self, world: &mut World, hecs_world: &mut hecs::World) {
        // auto-register new entities
        if let Some(opts) = self.default_opts {
            for (entity, body_key) in hecs_world.query_mut::<&BodyKey>() {
                if !self.body_entity_map.contains(body_key.0) {
                    self.body_entity_map.insert_at(body_key.0, (entity, opts));
                }
            }
        }
        self.body_entity_map.retain(|body_key, (entity, opts)| {
            let body_key = BodyKey(body_key);
            // auto-delete bodies for entities that don't exist anymore,
            // using the surrounding `retain` to also delete them from this map
            if opts.autodelete && !hecs_world.contains(*entity) {
                world.remove_body(body_key);
                return false;
            }
            // bodies removed from the world directly are forgotten too
            let Some(body) = world.get_body_mut(body_key) else { return false };
            if opts.hecs_to_world {
                let Ok((rect, vel)) = hecs_world
                    .query_one_mut::<(&Rect, Option<&Velocity>)>(*entity) else { return true };
                match check_finite(rect.pos) {
                    Ok(()) => body.pos = rect.pos,
                    Err(err) => log::warn!("Not syncing position of {entity:?}: {err}"),
                }
                if let Err(err) = body.set_size(rect.size) {
                    log::warn!("Not syncing size of {entity:?}: {err}");
                }
                if let Some(vel) = vel {
                    match check_finite(vel.0) {
                        Ok(()) => body.velocity = vel.0,
                        Err(err) => log::warn!("Not syncing velocity of {entity:?}: {err}"),
                    }
                }
            }
            true
        });
    }

    /// Sync data from the physics world to a hecs world.
    /// Call after [`World::tick`][crate::World::tick].
    pub fn sync_world_to_hecs(&mut self, world: &World, hecs_world: &mut hecs::World) {
        for (body_key, (entity, opts)) in self.body_entity_map.iter() {
            if !opts.world_to_hecs {
                continue;
            }
            let Some(body) = world.get_body(BodyKey(body_key)) else { continue };
            let Ok((rect, vel, coll)) = hecs_world
                .query_one_mut::<(Option<&mut Rect>, Option<&mut Velocity>, Option<&mut Colliding>)>(*entity)
                else { continue };
            if let Some(rect) = rect {
                *rect = body.rect();
            }
            if let Some(vel) = vel {
                vel.0 = body.velocity;
            }
            if let Some(coll) = coll {
                coll.0 = body.is_colliding();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, WorldParams};

    fn setup() -> (World, hecs::World, HecsSyncManager) {
        let world = World::new(WorldParams {
            bounds: Bounds::new(1000.0, 1000.0),
            ..Default::default()
        });
        (world, hecs::World::new(), HecsSyncManager::new())
    }

    fn rect(x: f64, y: f64) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(10.0, 10.0))
    }

    #[test]
    fn round_trip_through_a_tick() {
        let (mut world, mut hecs_world, mut sync) = setup();
        let opts = HecsSyncOptions::both_ways();
        let a = sync
            .spawn(&mut world, &mut hecs_world, rect(100.0, 100.0), Vec2::new(1.0, 0.0), opts)
            .unwrap();
        let b = sync
            .spawn(&mut world, &mut hecs_world, rect(105.0, 100.0), Vec2::new(-1.0, 0.0), opts)
            .unwrap();
        let lonely = sync
            .spawn(&mut world, &mut hecs_world, rect(500.0, 500.0), Vec2::zero(), opts)
            .unwrap();

        sync.sync_hecs_to_world(&mut world, &mut hecs_world);
        world.tick().unwrap();
        sync.sync_world_to_hecs(&world, &mut hecs_world);

        let get = |hecs_world: &mut hecs::World, e| {
            let (r, v, c) = hecs_world
                .query_one_mut::<(&Rect, &Velocity, &Colliding)>(e)
                .unwrap();
            (*r, *v, *c)
        };
        let (ra, va, ca) = get(&mut hecs_world, a);
        assert_eq!(ra.pos, Vec2::new(97.5, 100.0));
        assert_eq!(va, Velocity(Vec2::new(-1.0, 0.0)));
        assert_eq!(ca, Colliding(true));
        let (rb, _, cb) = get(&mut hecs_world, b);
        assert_eq!(rb.pos, Vec2::new(107.5, 100.0));
        assert_eq!(cb, Colliding(true));
        let (_, _, cl) = get(&mut hecs_world, lonely);
        assert_eq!(cl, Colliding(false));
    }

    #[test]
    fn hecs_changes_reach_the_world() {
        let (mut world, mut hecs_world, mut sync) = setup();
        let e = sync
            .spawn(
                &mut world,
                &mut hecs_world,
                rect(100.0, 100.0),
                Vec2::zero(),
                HecsSyncOptions::hecs_to_world_only(),
            )
            .unwrap();
        let key = *hecs_world.query_one_mut::<&BodyKey>(e).unwrap();

        {
            let (r, v) = hecs_world
                .query_one_mut::<(&mut Rect, &mut Velocity)>(e)
                .unwrap();
            r.pos = Vec2::new(300.0, 200.0);
            r.size = Vec2::new(4.0, 6.0);
            v.0 = Vec2::new(2.0, 2.0);
        }
        sync.sync_hecs_to_world(&mut world, &mut hecs_world);
        let body = world.get_body(key).unwrap();
        assert_eq!(body.pos, Vec2::new(300.0, 200.0));
        assert_eq!(body.size(), Vec2::new(4.0, 6.0));
        assert_eq!(body.velocity, Vec2::new(2.0, 2.0));

        // invalid sizes are skipped, the rest still syncs
        {
            let r = hecs_world.query_one_mut::<&mut Rect>(e).unwrap();
            r.pos = Vec2::new(10.0, 10.0);
            r.size = Vec2::new(0.0, 6.0);
        }
        sync.sync_hecs_to_world(&mut world, &mut hecs_world);
        let body = world.get_body(key).unwrap();
        assert_eq!(body.pos, Vec2::new(10.0, 10.0));
        assert_eq!(body.size(), Vec2::new(4.0, 6.0));

        // non-finite positions and velocities are skipped too
        {
            let (r, v) = hecs_world
                .query_one_mut::<(&mut Rect, &mut Velocity)>(e)
                .unwrap();
            r.pos = Vec2::new(f64::NAN, 20.0);
            r.size = Vec2::new(8.0, 8.0);
            v.0 = Vec2::new(1.0, f64::INFINITY);
        }
        sync.sync_hecs_to_world(&mut world, &mut hecs_world);
        let body = world.get_body(key).unwrap();
        assert_eq!(body.pos, Vec2::new(10.0, 10.0));
        assert_eq!(body.size(), Vec2::new(8.0, 8.0));
        assert_eq!(body.velocity, Vec2::new(2.0, 2.0));
        {
            let r = hecs_world.query_one_mut::<&mut Rect>(e).unwrap();
            r.pos = Vec2::new(10.0, 10.0);
        }

        // world_to_hecs is off, so the tick result stays out of hecs
        world.tick().unwrap();
        sync.sync_world_to_hecs(&world, &mut hecs_world);
        let r = hecs_world.query_one_mut::<&Rect>(e).unwrap();
        assert_eq!(r.pos, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn despawned_entities_remove_bodies() {
        let (mut world, mut hecs_world, mut sync) = setup();
        let e = sync
            .spawn(
                &mut world,
                &mut hecs_world,
                rect(100.0, 100.0),
                Vec2::zero(),
                HecsSyncOptions::both_ways(),
            )
            .unwrap();
        let key = *hecs_world.query_one_mut::<&BodyKey>(e).unwrap();
        assert_eq!(sync.entity_of(key), Some(e));

        hecs_world.despawn(e).unwrap();
        sync.sync_hecs_to_world(&mut world, &mut hecs_world);
        assert!(world.get_body(key).is_none());
        assert!(sync.is_empty());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn autosync_registers_entities_with_keys() {
        let (mut world, mut hecs_world, _) = setup();
        let mut sync = HecsSyncManager::new_autosync(HecsSyncOptions::both_ways());
        let key = world.spawn(rect(100.0, 100.0), Vec2::zero()).unwrap();
        let e = hecs_world.spawn((key, rect(100.0, 100.0), Colliding(true)));

        sync.sync_hecs_to_world(&mut world, &mut hecs_world);
        assert_eq!(sync.entity_of(key), Some(e));
        world.tick().unwrap();
        sync.sync_world_to_hecs(&world, &mut hecs_world);
        // entity without a Velocity component still gets its flag synced
        assert_eq!(
            *hecs_world.query_one_mut::<&Colliding>(e).unwrap(),
            Colliding(false)
        );
    }
}
