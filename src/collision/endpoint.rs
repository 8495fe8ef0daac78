//! Interval endpoints along the sweep axis and the buffer they're built and sorted in.

use crate::body_set::{BodyKey, BodySet};

/// Which edge of a body's interval an endpoint marks.
///
/// The derived ordering puts `Right` before `Left`, which is the order
/// endpoints at exactly the same coordinate are swept in. This way bodies that
/// only touch are never paired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EdgeKind {
    Right,
    Left,
}

/// One end of a body's extent along the sweep axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endpoint {
    pub coord: f64,
    pub kind: EdgeKind,
    pub body: BodyKey,
}

/// Reusable storage for the endpoints of every body.
///
/// Cleared and refilled each tick, keeping its allocation.
#[derive(Default, Debug)]
pub struct EndpointBuffer {
    endpoints: Vec<Endpoint>,
}

impl EndpointBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(body_count: usize) -> Self {
        Self {
            endpoints: Vec::with_capacity(body_count * 2),
        }
    }

    /// Replace the contents with a left and a right endpoint along the x axis for every body.
    pub fn build(&mut self, bodies: &BodySet) {
        self.endpoints.clear();
        let needed = bodies.len() * 2;
        if needed > self.endpoints.capacity() {
            log::debug!("growing endpoint buffer to {needed}");
            self.endpoints.reserve(needed);
        }
        for (key, body) in bodies.iter() {
            let rect = body.rect();
            self.endpoints.push(Endpoint {
                coord: rect.pos.x,
                kind: EdgeKind::Left,
                body: key,
            });
            self.endpoints.push(Endpoint {
                coord: right_edge(rect.pos.x, rect.size.x),
                kind: EdgeKind::Right,
                body: key,
            });
        }
    }

    /// Sort endpoints by coordinate, right edges first on ties.
    ///
    /// The sort is stable, so endpoints that compare equal
    /// stay in the order bodies were iterated in.
    pub fn sort(&mut self) {
        self.endpoints.sort_by(|a, b| {
            a.coord
                .total_cmp(&b.coord)
                .then_with(|| a.kind.cmp(&b.kind))
        });
    }

    #[inline]
    pub fn as_slice(&self) -> &[Endpoint] {
        &self.endpoints
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.endpoints.clear();
    }
}

// A width too small to change `x` when added would put both endpoints of a body
// on the same coordinate, where the right one sorts first.
// Bump it to the next representable value so the left endpoint always comes first.
fn right_edge(x: f64, w: f64) -> f64 {
    let right = x + w;
    if right > x || !right.is_finite() {
        return right;
    }
    if x == 0.0 {
        f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() + 1)
    } else {
        f64::from_bits(x.to_bits() - 1)
    }
}
