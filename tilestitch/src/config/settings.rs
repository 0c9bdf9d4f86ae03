//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file. These are
//! pure data types; parsing lives in [`super::parser`] and serialization in
//! [`super::writer`]. Settings are passed explicitly into library calls -
//! there is no global configuration state.

/// Complete configuration loaded from tilestitch.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Tile cropping settings
    pub tiles: TileSettings,
    /// Composite settings
    pub composite: CompositeSettings,
    /// Pyramid publication settings
    pub pyramid: PyramidSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Tile cropping configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSettings {
    /// Side length of the square cropped from each screenshot's center.
    /// Must match the capture tool's spacing; calibrate with `align`.
    pub crop_size: u32,
    /// Signed inter-tile overlap in pixels. Positive pulls adjacent tiles
    /// together, hiding duplicated edge content.
    pub overlap: i32,
    /// Filename suffix marking pre-cropped tiles
    pub suffix: String,
    /// Leave existing cropped tile files alone
    pub skip_existing: bool,
    /// Delete raw screenshots after cropping to reclaim disk space
    pub delete_originals: bool,
}

/// Composite configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeSettings {
    /// Infer the grid step from the minimum pairwise coordinate delta
    /// instead of the first two tiles
    pub robust_step: bool,
}

/// Pyramid publication configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidSettings {
    /// Level-of-detail directory published tiles land in
    pub lod: u32,
    /// Published tile filename (without extension)
    pub tile_name: String,
    /// Published tile format: "jpg" or "png"
    pub format: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: String,
    /// Log filename
    pub file: String,
}
