//! Types, aliases and helper operations for doing math with `ultraviolet`.
pub use ultraviolet as uv;

pub type Vec2 = uv::DVec2;

/// One of the two coordinate axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The axis perpendicular to this one.
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Get the component of a vector along this axis.
    #[inline]
    pub fn of(self, v: Vec2) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Mutably access the component of a vector along this axis.
    #[inline]
    pub fn of_mut(self, v: &mut Vec2) -> &mut f64 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }
}
