//! Error types for map compositing.
//!
//! Structural problems (bad configuration, empty input) abort before any
//! image I/O; a tile whose payload cannot be read fails the whole composite
//! with no partial output.

use crate::coord::{CoordError, WorldCoord};
use crate::registry::RegistryError;
use crate::tile::TileError;
use thiserror::Error;

/// Errors that can occur while assembling a composite map.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// Configuration rejected before any I/O
    #[error("invalid composite configuration: {0}")]
    InvalidConfig(String),

    /// No tiles were selected for compositing
    #[error("no tiles selected for compositing")]
    EmptyInput,

    /// The computed canvas exceeds what the image buffer can hold
    #[error("composite canvas {width}x{height} is too large")]
    CanvasTooLarge { width: i64, height: i64 },

    /// A selected coordinate has no tile in the registry
    #[error("selected tile {0} is not in the registry")]
    UnknownTile(WorldCoord),

    /// A tile's image payload could not be produced
    #[error("tile {coord} failed: {source}")]
    Tile {
        coord: WorldCoord,
        source: TileError,
    },

    /// Registry-level failure (empty registry, step inference)
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Grid normalization failure
    #[error("coordinate error: {0}")]
    Coord(#[from] CoordError),
}
