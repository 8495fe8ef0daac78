use crate::math::{Axis, Vec2};

/// An axis-aligned rectangle given by its low corner and its size.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// The corner with the smallest coordinates.
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Coordinate of the low edge along an axis.
    #[inline]
    pub fn low(&self, axis: Axis) -> f64 {
        axis.of(self.pos)
    }

    /// Coordinate of the high edge along an axis.
    #[inline]
    pub fn high(&self, axis: Axis) -> f64 {
        axis.of(self.pos) + axis.of(self.size)
    }

    /// Check whether the projections of two rectangles onto an axis overlap.
    /// Touching edges do not count as overlapping.
    #[inline]
    pub fn overlaps_on(&self, axis: Axis, other: &Rect) -> bool {
        self.low(axis) < other.high(axis) && self.high(axis) > other.low(axis)
    }

    /// Check whether two rectangles overlap on both axes.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_on(Axis::X, other) && self.overlaps_on(Axis::Y, other)
    }

    /// Length of the shared part of the projections of two rectangles onto an axis.
    /// Negative if the projections are apart.
    #[inline]
    pub fn overlap_on(&self, axis: Axis, other: &Rect) -> f64 {
        self.high(axis).min(other.high(axis)) - self.low(axis).max(other.low(axis))
    }
}

/// Error when creating a body with a size that can't collide with anything.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidBody {
    #[error("Body size must be positive on both axes, got {w} x {h}")]
    NonPositiveSize { w: f64, h: f64 },
    #[error("Body position, size and velocity must be finite")]
    NonFinite,
}

/// A moving rectangle.
///
/// The size is fixed after creation unless changed through [`set_size`][Self::set_size],
/// and the collision flag is recomputed by the [`World`][crate::World] every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Position of the low corner.
    pub pos: Vec2,
    size: Vec2,
    /// Velocity in units per tick.
    pub velocity: Vec2,
    colliding: bool,
}

impl Body {
    /// Create a body at rest. Fails if either side of the size isn't positive.
    pub fn new(pos: Vec2, size: Vec2) -> Result<Self, InvalidBody> {
        check_size(size)?;
        check_finite(pos)?;
        Ok(Self {
            pos,
            size,
            velocity: Vec2::zero(),
            colliding: false,
        })
    }

    /// Create a body from a rectangle.
    #[inline]
    pub fn from_rect(rect: Rect) -> Result<Self, InvalidBody> {
        Self::new(rect.pos, rect.size)
    }

    /// Set the velocity of the body in a builder-like chain.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Change the size of the body, keeping the low corner in place.
    pub fn set_size(&mut self, size: Vec2) -> Result<(), InvalidBody> {
        check_size(size)?;
        self.size = size;
        Ok(())
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Whether this body overlapped another body during the last tick.
    #[inline]
    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    #[inline]
    pub(crate) fn set_colliding(&mut self, colliding: bool) {
        self.colliding = colliding;
    }
}

pub(crate) fn check_finite(v: Vec2) -> Result<(), InvalidBody> {
    if v.x.is_finite() && v.y.is_finite() {
        Ok(())
    } else {
        Err(InvalidBody::NonFinite)
    }
}

fn check_size(size: Vec2) -> Result<(), InvalidBody> {
    check_finite(size)?;
    // written this way so NaN is rejected too
    if !(size.x > 0.0 && size.y > 0.0) {
        return Err(InvalidBody::NonPositiveSize {
            w: size.x,
            h: size.y,
        });
    }
    Ok(())
}
