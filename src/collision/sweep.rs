//! The sweep over sorted endpoints that finds every pair of bodies
//! whose intervals on the sweep axis overlap.

use super::endpoint::{EdgeKind, Endpoint};
use crate::body_set::BodyKey;

/// The endpoint stream handed to the sweep was inconsistent.
/// This is a bug in whatever built the stream and can't be recovered from.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepError {
    #[error("Right endpoint of {0:?} was swept without its left endpoint being active")]
    NotActive(BodyKey),
    #[error("Left endpoint of {0:?} was swept while the body was already active")]
    AlreadyActive(BodyKey),
    #[error("Endpoint of {0:?} has a slot past the slot count the active set was reset with")]
    SlotOutOfRange(BodyKey),
}

// marks a slot whose body isn't in the active set
const INACTIVE: u32 = u32::MAX;

/// The set of bodies whose intervals contain the current sweep position.
///
/// Members are stored densely and removed by swapping with the last member,
/// so order inside the set is meaningless. A side table indexed by body slot
/// tracks where each member is, making membership checks and removal O(1).
#[derive(Default, Debug)]
pub struct ActiveSet {
    members: Vec<BodyKey>,
    positions: Vec<u32>,
}

impl ActiveSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the set and make room for bodies with slots below `slot_count`.
    ///
    /// Positions from earlier sweeps are all forgotten here,
    /// since slots may have been given to different bodies in between.
    pub fn reset(&mut self, slot_count: usize) {
        self.members.clear();
        self.positions.clear();
        self.positions.resize(slot_count, INACTIVE);
    }

    #[inline]
    pub fn members(&self) -> &[BodyKey] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, key: BodyKey) -> bool {
        match self.positions.get(key.slot()) {
            Some(&pos) if pos != INACTIVE => self.members[pos as usize] == key,
            _ => false,
        }
    }

    pub fn insert(&mut self, key: BodyKey) -> Result<(), SweepError> {
        let slot = key.slot();
        if slot >= self.positions.len() {
            return Err(SweepError::SlotOutOfRange(key));
        }
        if self.positions[slot] != INACTIVE {
            return Err(SweepError::AlreadyActive(key));
        }
        self.positions[slot] = self.members.len() as u32;
        self.members.push(key);
        Ok(())
    }

    pub fn remove(&mut self, key: BodyKey) -> Result<(), SweepError> {
        let pos = match self.positions.get(key.slot()) {
            Some(&pos) if pos != INACTIVE && self.members[pos as usize] == key => pos as usize,
            _ => return Err(SweepError::NotActive(key)),
        };
        self.members.swap_remove(pos);
        self.positions[key.slot()] = INACTIVE;
        // the last member was moved into the hole
        if let Some(moved) = self.members.get(pos) {
            self.positions[moved.slot()] = pos as u32;
        }
        Ok(())
    }
}

/// Sweep over endpoints sorted by coordinate, calling `on_pair` once for every pair
/// of bodies whose intervals overlap.
///
/// The first body passed to `on_pair` is the one whose left endpoint was just reached,
/// the second is one that was already active. Returns the number of pairs found.
///
/// `active` is reset before sweeping; `slot_count` must be above the slot of every
/// body in `endpoints`.
pub fn sweep(
    endpoints: &[Endpoint],
    active: &mut ActiveSet,
    slot_count: usize,
    mut on_pair: impl FnMut(BodyKey, BodyKey),
) -> Result<usize, SweepError> {
    active.reset(slot_count);
    let mut pair_count = 0;
    for endpoint in endpoints {
        match endpoint.kind {
            EdgeKind::Left => {
                active.insert(endpoint.body)?;
                // the entering body was pushed last
                let others = &active.members()[..active.len() - 1];
                for &other in others {
                    on_pair(endpoint.body, other);
                }
                pair_count += others.len();
            }
            EdgeKind::Right => {
                active.remove(endpoint.body)?;
            }
        }
    }
    Ok(pair_count)
}
