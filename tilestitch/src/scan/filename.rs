//! Capture filename parsing.
//!
//! The editor's screenshot tool writes files named
//! `<prefix>_<x>_<z>.png` for raw captures and
//! `<prefix>_<x>_<z>_<suffix>.png` for pre-cropped tiles, where `<x>` and
//! `<z>` are the world-space capture coordinates. The prefix is free-form
//! and may itself contain underscores; parsing anchors on the trailing
//! coordinate pair.

use crate::coord::WorldCoord;
use regex::Regex;
use std::sync::OnceLock;

/// What kind of capture a filename refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Raw full-resolution screenshot
    Screenshot,
    /// Pre-cropped tile image
    CroppedTile,
}

/// Parsed capture filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// World-space capture coordinate
    pub coord: WorldCoord,
    /// Raw screenshot or cropped tile
    pub kind: CaptureKind,
}

/// Error parsing a capture filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Filename doesn't match the capture pattern
    InvalidPattern,
    /// X coordinate doesn't fit an i32
    InvalidX(String),
    /// Z coordinate doesn't fit an i32
    InvalidZ(String),
    /// Trailing token is neither absent nor the configured tile suffix
    UnknownSuffix(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidPattern => write!(f, "Filename doesn't match capture pattern"),
            ParseError::InvalidX(s) => write!(f, "Invalid x coordinate: {}", s),
            ParseError::InvalidZ(s) => write!(f, "Invalid z coordinate: {}", s),
            ParseError::UnknownSuffix(s) => write!(f, "Unknown filename suffix: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Get the capture filename regex.
///
/// Pattern: `_<x>_<z>[_<suffix>].png` anchored at the end of the name.
///
/// We capture:
/// - Group 1: x coordinate (optionally signed)
/// - Group 2: z coordinate (optionally signed)
/// - Group 3: optional non-numeric suffix token
fn capture_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // The suffix token must start with a letter so that a trailing
        // number is consumed as the z coordinate, not as a suffix
        Regex::new(r"_(-?\d+)_(-?\d+)(?:_([A-Za-z][A-Za-z0-9]*))?(?i:\.png)$")
            .expect("capture filename regex is valid")
    })
}

/// Parse a capture filename into a coordinate and capture kind.
///
/// # Arguments
///
/// * `filename` - Bare filename, e.g. `Screenshot_5700_3800.png`
/// * `tile_suffix` - Configured cropped-tile suffix, e.g. `tile`
///
/// # Examples
///
/// ```
/// use tilestitch::scan::{parse_capture_filename, CaptureKind};
///
/// let parsed = parse_capture_filename("Screenshot_5700_3800.png", "tile").unwrap();
/// assert_eq!(parsed.coord.x, 5700);
/// assert_eq!(parsed.coord.z, 3800);
/// assert_eq!(parsed.kind, CaptureKind::Screenshot);
/// ```
pub fn parse_capture_filename(
    filename: &str,
    tile_suffix: &str,
) -> Result<ParsedFilename, ParseError> {
    let captures = capture_pattern()
        .captures(filename)
        .ok_or(ParseError::InvalidPattern)?;

    let x_str = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let x = x_str
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidX(x_str.to_string()))?;

    let z_str = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    let z = z_str
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidZ(z_str.to_string()))?;

    let kind = match captures.get(3) {
        None => CaptureKind::Screenshot,
        Some(m) if m.as_str() == tile_suffix => CaptureKind::CroppedTile,
        Some(m) => return Err(ParseError::UnknownSuffix(m.as_str().to_string())),
    };

    Ok(ParsedFilename {
        coord: WorldCoord::new(x, z),
        kind,
    })
}
