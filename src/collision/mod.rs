//! Broad phase collision detection by sweep and prune along the x axis,
//! plus the narrow phase test and response for the pairs it finds.

pub mod bounds;
pub mod endpoint;
pub mod response;
pub mod sweep;

use crate::body_set::{BodyKey, BodySet};
use endpoint::EndpointBuffer;
use sweep::{ActiveSet, SweepError};

/// Sweep and prune broad phase.
///
/// Holds the endpoint buffer and active set between ticks so their allocations
/// get reused. Nothing else is carried over, every call starts from scratch.
#[derive(Default, Debug)]
pub struct SweepAndPrune {
    endpoints: EndpointBuffer,
    active: ActiveSet,
}

impl SweepAndPrune {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(body_count: usize) -> Self {
        Self {
            endpoints: EndpointBuffer::with_capacity(body_count),
            active: ActiveSet::new(),
        }
    }

    /// Build and sort the endpoints of every body in the set.
    ///
    /// Endpoints are snapshots of the current positions,
    /// moving bodies afterwards doesn't affect which pairs get found.
    pub fn prepare(&mut self, bodies: &BodySet) {
        {
            let _span = tracy_span!("build endpoints", "prepare");
            self.endpoints.build(bodies);
        }
        let _span = tracy_span!("sort endpoints", "prepare");
        self.endpoints.sort();
    }

    /// Sweep over the endpoints built in [`prepare`][Self::prepare],
    /// calling `on_pair` for every pair whose x intervals overlapped at the time.
    ///
    /// `slot_count` must be at least the [`BodySet::slot_count`][BodySet::slot_count]
    /// of the set the endpoints were built from.
    pub fn sweep(
        &mut self,
        slot_count: usize,
        on_pair: impl FnMut(BodyKey, BodyKey),
    ) -> Result<usize, SweepError> {
        let _span = tracy_span!("sweep", "sweep");
        sweep::sweep(
            self.endpoints.as_slice(),
            &mut self.active,
            slot_count,
            on_pair,
        )
    }

    /// Collect every pair of bodies whose x intervals overlap, without touching the bodies.
    pub fn pairs(&mut self, bodies: &BodySet) -> Result<Vec<[BodyKey; 2]>, SweepError> {
        self.prepare(bodies);
        let mut pairs = Vec::new();
        self.sweep(bodies.slot_count(), |a, b| pairs.push([a, b]))?;
        Ok(pairs)
    }

    /// Number of endpoints built in the last [`prepare`][Self::prepare].
    #[inline]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}
