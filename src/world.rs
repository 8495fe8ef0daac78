use crate::{
    body::{Body, InvalidBody, Rect},
    body_set::{BodyKey, BodySet},
    collision::{
        bounds::Bounds,
        response::{self, Separation},
        sweep::SweepError,
        SweepAndPrune,
    },
    math::Vec2,
};

/// Parameters for the creation of a [`World`][self::World].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WorldParams {
    /// The region bodies are kept inside of. Stays constant for the lifetime of the world.
    pub bounds: Bounds,
    /// How many bodies to initially allocate space for.
    /// More space will be allocated as needed.
    pub initial_capacity: usize,
}

/// Produced for every pair of bodies found overlapping during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactEvent {
    /// The bodies involved, ordered by slot.
    pub bodies: [BodyKey; 2],
    pub separation: Separation,
}

/// Summary of what happened during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub bodies: usize,
    /// Pairs whose x intervals overlapped and were tested on the y axis.
    pub pairs_tested: usize,
    /// Pairs that overlapped on both axes and were pushed apart.
    pub contacts: usize,
}

/// Error when advancing a [`World`][self::World].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickError {
    #[error("Collision sweep failed, tick was left incomplete")]
    Sweep(#[from] SweepError),
    #[error("A previous tick failed and left the world in an inconsistent state")]
    Poisoned,
}

/// A set of moving rectangles inside of fixed bounds.
///
/// Bodies are only added or removed between calls to [`tick`][Self::tick],
/// which moves every body by its velocity, keeps it inside the bounds,
/// and pushes apart every pair of bodies that ended up overlapping.
#[derive(Debug)]
pub struct World {
    bounds: Bounds,
    bodies: BodySet,
    sap: SweepAndPrune,
    contacts: Vec<ContactEvent>,
    poisoned: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldParams::default())
    }
}

impl World {
    pub fn new(params: WorldParams) -> Self {
        Self {
            bounds: params.bounds,
            bodies: BodySet::with_capacity(params.initial_capacity),
            sap: SweepAndPrune::with_capacity(params.initial_capacity),
            contacts: Vec::new(),
            poisoned: false,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Insert a body into the world.
    #[inline]
    pub fn insert_body(&mut self, body: Body) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Create a body from a rectangle and a velocity and insert it into the world.
    /// Fails if the rectangle has no area or any value isn't finite.
    pub fn spawn(&mut self, rect: Rect, velocity: Vec2) -> Result<BodyKey, InvalidBody> {
        self.bodies.insert_rect(rect, velocity)
    }

    /// Remove a body from the world, returning it if it still existed.
    #[inline]
    pub fn remove_body(&mut self, key: BodyKey) -> Option<Body> {
        self.bodies.remove(key)
    }

    /// Access a body, if it still exists.
    #[inline]
    pub fn get_body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    /// Mutably access a body, if it still exists.
    #[inline]
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    #[inline]
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Contacts produced by the last tick.
    #[inline]
    pub fn contacts(&self) -> &[ContactEvent] {
        &self.contacts
    }

    /// Whether a tick has failed. A poisoned world refuses to tick until cleared.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Remove all bodies and contacts.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.contacts.clear();
        self.poisoned = false;
    }

    /// Advance the world by one tick.
    ///
    /// Every body is moved by its velocity and clamped to the bounds,
    /// then every overlapping pair is detected and pushed apart.
    /// Pairs are resolved one at a time in sweep order and later pairs see
    /// the positions left by earlier ones, so a body in several contacts may be moved
    /// several times per tick.
    ///
    /// An error means the collision sweep hit an inconsistency (e.g. a body with a
    /// non-finite position) and bodies were left partially resolved.
    /// The world is poisoned afterwards and further ticks fail.
    pub fn tick(&mut self) -> Result<TickStats, TickError> {
        if self.poisoned {
            return Err(TickError::Poisoned);
        }

        {
            let _span = tracy_span!("integrate", "tick");
            let bounds = self.bounds;
            for (_, body) in self.bodies.iter_mut() {
                body.pos += body.velocity;
                bounds.clamp(body);
                body.set_colliding(false);
            }
        }

        self.sap.prepare(&self.bodies);

        self.contacts.clear();
        let bodies = &mut self.bodies;
        let contacts = &mut self.contacts;
        let swept = self.sap.sweep(bodies.slot_count(), |entering, active| {
            // lower slot first so that exact coordinate ties
            // are resolved the same way regardless of sweep order
            let pair = if entering.slot() < active.slot() {
                [entering, active]
            } else {
                [active, entering]
            };
            // endpoints were built from this same set just now so both exist
            let (Some(a), Some(b)) = bodies.get2_mut(pair[0], pair[1]) else {
                return;
            };
            if let Some(separation) = response::resolve(a, b) {
                contacts.push(ContactEvent {
                    bodies: pair,
                    separation,
                });
            }
        });

        let pairs_tested = match swept {
            Ok(count) => count,
            Err(err) => {
                log::error!("{err}, poisoning world");
                self.poisoned = true;
                return Err(err.into());
            }
        };

        let stats = TickStats {
            bodies: self.bodies.len(),
            pairs_tested,
            contacts: self.contacts.len(),
        };
        log::trace!("{stats:?}");
        Ok(stats)
    }
}
