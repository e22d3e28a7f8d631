//! Discrete grid coordinates.
//!
//! Movement happens one `Cell` at a time.  `CellDelta` is the signed offset
//! between two cells and is what the animation sink receives, so renderers
//! can convert it to screen space without knowing the grid layout.

use std::fmt;
use std::ops::{Add, Sub};

/// A single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset that moves `self` onto `to`.
    #[inline]
    pub fn delta_to(self, to: Cell) -> CellDelta {
        to - self
    }

    /// `true` if `other` is one of the eight surrounding cells.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        let d = other - self;
        self != other && d.dx.unsigned_abs() <= 1 && d.dy.unsigned_abs() <= 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Signed offset between two cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellDelta {
    pub dx: i32,
    pub dy: i32,
}

impl CellDelta {
    pub const ZERO: CellDelta = CellDelta { dx: 0, dy: 0 };

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

// Saturating at the edges of the coordinate range, like `Timestamp`.

impl Sub for Cell {
    type Output = CellDelta;
    #[inline]
    fn sub(self, rhs: Cell) -> CellDelta {
        CellDelta { dx: self.x.saturating_sub(rhs.x), dy: self.y.saturating_sub(rhs.y) }
    }
}

impl Add<CellDelta> for Cell {
    type Output = Cell;
    #[inline]
    fn add(self, rhs: CellDelta) -> Cell {
        Cell { x: self.x.saturating_add(rhs.dx), y: self.y.saturating_add(rhs.dy) }
    }
}
