//! Error types for tile entities.
//!
//! Covers the two ways a tile operation can fail: a required image payload
//! is missing or unreadable, or the requested crop does not fit inside the
//! source screenshot.

use crate::coord::WorldCoord;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors raised by tile payload access and tile creation.
#[derive(Debug, Clone)]
pub enum TileError {
    /// The tile has no raw screenshot to work from
    MissingScreenshot(WorldCoord),
    /// The tile has no cropped image and no screenshot to derive one from
    MissingTileImage(WorldCoord),
    /// An image file could not be read or written
    ImageAccess {
        /// Path that failed
        path: PathBuf,
        /// Underlying decoder/encoder/IO message
        message: String,
    },
    /// Crop size is zero or larger than the source image
    InvalidCropSize {
        /// Requested square side length
        size: u32,
        /// Source image width
        width: u32,
        /// Source image height
        height: u32,
    },
}

impl TileError {
    /// Wraps an image or IO error with the path it occurred on.
    pub fn image_access(path: &Path, err: impl fmt::Display) -> Self {
        TileError::ImageAccess {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::MissingScreenshot(coord) => {
                write!(f, "Tile {} has no raw screenshot", coord)
            }
            TileError::MissingTileImage(coord) => {
                write!(f, "Tile {} has no cropped image or screenshot", coord)
            }
            TileError::ImageAccess { path, message } => {
                write!(f, "Image access failed for '{}': {}", path.display(), message)
            }
            TileError::InvalidCropSize {
                size,
                width,
                height,
            } => {
                write!(
                    f,
                    "Crop size {} does not fit inside a {}x{} screenshot",
                    size, width, height
                )
            }
        }
    }
}

impl std::error::Error for TileError {}
