//! Default configuration values.
//!
//! The crop size and overlap defaults match the capture tool's stock
//! settings; a new capture spacing needs recalibration with the `align`
//! command.

use super::settings::{LoggingSettings, PyramidSettings, TileSettings};

/// Default tile crop size in pixels.
pub const DEFAULT_CROP_SIZE: u32 = 550;

/// Default inter-tile overlap in pixels (positive pulls tiles together).
pub const DEFAULT_OVERLAP: i32 = 7;

/// Default cropped-tile filename suffix.
pub const DEFAULT_TILE_SUFFIX: &str = "tile";

/// Default level of detail for published tiles.
pub const DEFAULT_PYRAMID_LOD: u32 = 5;

/// Default published tile filename.
pub const DEFAULT_PYRAMID_TILE_NAME: &str = "tile";

/// Default published tile format.
pub const DEFAULT_PYRAMID_FORMAT: &str = "jpg";

/// Default log directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log filename.
pub const DEFAULT_LOG_FILE: &str = "tilestitch.log";

impl Default for TileSettings {
    fn default() -> Self {
        TileSettings {
            crop_size: DEFAULT_CROP_SIZE,
            overlap: DEFAULT_OVERLAP,
            suffix: DEFAULT_TILE_SUFFIX.to_string(),
            skip_existing: true,
            delete_originals: false,
        }
    }
}

impl Default for PyramidSettings {
    fn default() -> Self {
        PyramidSettings {
            lod: DEFAULT_PYRAMID_LOD,
            tile_name: DEFAULT_PYRAMID_TILE_NAME.to_string(),
            format: DEFAULT_PYRAMID_FORMAT.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            directory: DEFAULT_LOG_DIR.to_string(),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
