//! Coordinate type definitions

use std::fmt;

/// World-space capture position.
///
/// Identifies the in-editor `(x, z)` point at which a screenshot was taken.
/// Two tiles are the same tile exactly when their world coordinates are
/// equal; everything else about a tile (file paths, loaded images) is an
/// attribute, not identity. Ordering is ascending x, then ascending z,
/// which gives registries a deterministic iteration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldCoord {
    /// East-west world coordinate
    pub x: i32,
    /// North-south world coordinate (increases northward)
    pub z: i32,
}

impl WorldCoord {
    /// Creates a coordinate from its raw components.
    #[inline]
    pub fn new(x: i32, z: i32) -> Self {
        WorldCoord { x, z }
    }

    /// Returns the coordinate shifted by `(dx, dz)` world units.
    #[inline]
    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        WorldCoord {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

impl fmt::Display for WorldCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.z)
    }
}

/// A tile's position in normalized grid units.
///
/// Derived from a [`WorldCoord`] by subtracting the grid origin and dividing
/// by the step size. This is a view used for canvas placement; it is never
/// an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    /// Grid column (0 at the western edge of the selection)
    pub ux: i32,
    /// Grid row in world orientation (0 at the southern edge)
    pub uz: i32,
}

/// Errors that can occur during grid normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    /// Step size must be strictly positive
    InvalidStepSize(i32),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidStepSize(step) => {
                write!(f, "Invalid step size: {} (must be positive)", step)
            }
        }
    }
}

impl std::error::Error for CoordError {}
