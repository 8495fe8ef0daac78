use crate::{
    body::Body,
    math::{Axis, Vec2},
};

/// The rectangular region bodies are kept inside of, spanning from the origin
/// to `(width, height)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 800.0,
        }
    }
}

impl Bounds {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent of the bounds along an axis.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Pin a body back inside the bounds if it touches or crosses an edge,
    /// reflecting its velocity away from that edge.
    ///
    /// Each axis is handled independently. If a body is somehow larger than the bounds,
    /// the low edge wins.
    pub fn clamp(&self, body: &mut Body) {
        for axis in [Axis::X, Axis::Y] {
            let size = axis.of(body.size());
            let bound = self.extent(axis);
            let pos = axis.of_mut(&mut body.pos);
            let vel = axis.of_mut(&mut body.velocity);
            if *pos <= 0.0 {
                *pos = 0.0;
                *vel = vel.abs();
            } else if *pos + size >= bound {
                *pos = bound - size;
                *vel = -vel.abs();
            }
        }
    }

    /// Check whether a body lies fully inside the bounds.
    pub fn contains(&self, body: &Body) -> bool {
        let rect = body.rect();
        [Axis::X, Axis::Y]
            .into_iter()
            .all(|axis| rect.low(axis) >= 0.0 && rect.high(axis) <= self.extent(axis))
    }
}
