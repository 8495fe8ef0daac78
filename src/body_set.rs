use crate::body::{check_finite, Body, InvalidBody};

use thunderdome as td;

/// Key type to look up a body stored in a [`BodySet`][self::BodySet].
///
/// When using a [`hecs`][crate::hecs] World, this type should be stored
/// in the world instead of [`Body`][crate::Body].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyKey(pub(crate) td::Index);

impl BodyKey {
    /// Get the underlying [`thunderdome::Index`][thunderdome::Index] of this key.
    /// Useful for creating your own mappings from bodies to other things
    /// such as [`hecs`][hecs] entities.
    #[inline]
    pub fn index(&self) -> td::Index {
        self.0
    }

    /// The slot of this key in the arena.
    /// Slots are dense and get reused after a body is removed.
    #[inline]
    pub fn slot(&self) -> usize {
        self.0.slot() as usize
    }
}

/// Storage for bodies addressed by generation-checked keys.
///
/// A key stays valid until its body is removed,
/// after which its slot may be reused with a new generation.
#[derive(Default, Debug)]
pub struct BodySet {
    bodies: td::Arena<Body>,
    // keeping track of the highest slot index
    // because slots are used for addressing during the sweep
    slot_count: usize,
}

impl BodySet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bodies: td::Arena::with_capacity(capacity),
            slot_count: 0,
        }
    }

    /// Insert a body, returning the key used to access it.
    pub fn insert(&mut self, body: Body) -> BodyKey {
        let key = self.bodies.insert(body);
        let slot = key.slot() as usize;
        if slot >= self.slot_count {
            self.slot_count = slot + 1;
        }
        BodyKey(key)
    }

    /// Validate and insert a body given as a rectangle and velocity.
    pub fn insert_rect(
        &mut self,
        rect: crate::Rect,
        velocity: crate::Vec2,
    ) -> Result<BodyKey, InvalidBody> {
        check_finite(velocity)?;
        let body = Body::from_rect(rect)?.with_velocity(velocity);
        Ok(self.insert(body))
    }

    /// Remove a body, returning it if it still existed.
    #[inline]
    pub fn remove(&mut self, key: BodyKey) -> Option<Body> {
        self.bodies.remove(key.0)
    }

    /// Access a body if it still exists.
    #[inline]
    pub fn get(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key.0)
    }

    /// Mutably access a body if it still exists.
    #[inline]
    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key.0)
    }

    /// Mutably access two different bodies at once.
    ///
    /// # Panics
    ///
    /// Panics if both keys are the same.
    #[inline]
    pub fn get2_mut(&mut self, a: BodyKey, b: BodyKey) -> (Option<&mut Body>, Option<&mut Body>) {
        self.bodies.get2_mut(a.0, b.0)
    }

    #[inline]
    pub fn contains(&self, key: BodyKey) -> bool {
        self.bodies.contains(key.0)
    }

    /// Number of live bodies.
    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// One more than the highest slot ever used.
    /// Every live key has [`BodyKey::slot`][BodyKey::slot] below this.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn iter(&self) -> impl '_ + Iterator<Item = (BodyKey, &Body)> {
        self.bodies.iter().map(|(idx, body)| (BodyKey(idx), body))
    }

    pub fn iter_mut(&mut self) -> impl '_ + Iterator<Item = (BodyKey, &mut Body)> {
        self.bodies.iter_mut().map(|(idx, body)| (BodyKey(idx), body))
    }

    /// Keep only the bodies the predicate returns true for.
    pub fn retain(&mut self, mut f: impl FnMut(BodyKey, &mut Body) -> bool) {
        self.bodies.retain(|idx, body| f(BodyKey(idx), body));
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.slot_count = 0;
    }
}
