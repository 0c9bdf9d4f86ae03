//! Capture discovery - builds a registry from a screenshot directory.
//!
//! The capture tool writes one subdirectory per session under the input
//! directory, each holding PNG captures. Scanning walks those session
//! directories, parses every PNG filename, and folds raw screenshots and
//! pre-cropped tiles for the same coordinate into single registry entries.

mod filename;

pub use filename::{parse_capture_filename, CaptureKind, ParseError, ParsedFilename};

use crate::registry::TileRegistry;
use crate::tile::Tile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while scanning a capture directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory could not be read
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No capture files were found anywhere under the input directory
    #[error("no captures found under '{0}' (expected <session>/<prefix>_<x>_<z>.png)")]
    NoCaptures(PathBuf),
}

/// Scans a capture directory into a [`TileRegistry`].
///
/// Walks one level of session subdirectories. Files that are not PNGs or
/// whose names don't parse are skipped with a warning; they are expected
/// (editor sidecar files, partial captures being written).
pub fn scan_directory(dir: &Path, tile_suffix: &str) -> Result<TileRegistry, ScanError> {
    let mut registry = TileRegistry::new();

    let sessions = fs::read_dir(dir).map_err(|source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for session in sessions {
        let session = session.map_err(|source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let session_path = session.path();
        if !session_path.is_dir() {
            continue;
        }
        scan_session(&session_path, tile_suffix, &mut registry)?;
    }

    if registry.is_empty() {
        return Err(ScanError::NoCaptures(dir.to_path_buf()));
    }

    info!(
        tiles = registry.len(),
        dir = %dir.display(),
        "Scanned capture directory"
    );
    Ok(registry)
}

fn scan_session(
    session: &Path,
    tile_suffix: &str,
    registry: &mut TileRegistry,
) -> Result<(), ScanError> {
    let entries = fs::read_dir(session).map_err(|source| ScanError::Io {
        path: session.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ScanError::Io {
            path: session.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !path.is_file() || !is_png {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match parse_capture_filename(name, tile_suffix) {
            Ok(parsed) => {
                let tile = match parsed.kind {
                    CaptureKind::Screenshot => Tile::from_screenshot(parsed.coord, &path),
                    CaptureKind::CroppedTile => Tile::from_tile_image(parsed.coord, &path),
                };
                registry.add(tile);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unparseable capture file");
            }
        }
    }

    Ok(())
}
