//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilestitch::align::AlignError;
use tilestitch::composite::CompositeError;
use tilestitch::config::ConfigError;
use tilestitch::coord::WorldCoord;
use tilestitch::pyramid::PyramidError;
use tilestitch::registry::RegistryError;
use tilestitch::scan::ScanError;
use tilestitch::tile::TileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigError),
    /// Capture directory scan failed
    Scan(ScanError),
    /// Registry query failed
    Registry(RegistryError),
    /// Compositing failed
    Composite(CompositeError),
    /// Alignment estimation failed
    Align(AlignError),
    /// Pyramid publication failed
    Pyramid(PyramidError),
    /// A tile operation failed
    Tile {
        coord: WorldCoord,
        source: TileError,
    },
    /// Failed to write an output file
    FileWrite { path: String, error: std::io::Error },
    /// Failed to remove a file
    FileRemove { path: String, error: std::io::Error },
    /// A command argument could not be used
    InvalidArgument(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Scan(ScanError::NoCaptures(_)) => {
                eprintln!();
                eprintln!("Expected layout:");
                eprintln!("  <input_dir>/<session>/<prefix>_<x>_<z>.png        raw screenshots");
                eprintln!("  <input_dir>/<session>/<prefix>_<x>_<z>_tile.png   cropped tiles");
            }
            CliError::Registry(RegistryError::InsufficientTiles(_)) => {
                eprintln!();
                eprintln!("Step-size inference needs at least two captures.");
                eprintln!("Capture more of the grid, or check the input directory.");
            }
            CliError::Align(AlignError::NoNeighbour(coord)) => {
                eprintln!();
                eprintln!(
                    "Tile {} has no capture directly north or south of it.",
                    coord
                );
                eprintln!("Pick a different tile with --at <x>,<z>.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Scan(e) => write!(f, "Failed to scan captures: {}", e),
            CliError::Registry(e) => write!(f, "Registry error: {}", e),
            CliError::Composite(e) => write!(f, "Failed to composite map: {}", e),
            CliError::Align(e) => write!(f, "Alignment failed: {}", e),
            CliError::Pyramid(e) => write!(f, "Pyramid publication failed: {}", e),
            CliError::Tile { coord, source } => {
                write!(f, "Tile {} failed: {}", coord, source)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::FileRemove { path, error } => {
                write!(f, "Failed to remove file '{}': {}", path, error)
            }
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Scan(e) => Some(e),
            CliError::Registry(e) => Some(e),
            CliError::Composite(e) => Some(e),
            CliError::Align(e) => Some(e),
            CliError::Pyramid(e) => Some(e),
            CliError::Tile { source, .. } => Some(source),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::FileRemove { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<ScanError> for CliError {
    fn from(e: ScanError) -> Self {
        CliError::Scan(e)
    }
}

impl From<RegistryError> for CliError {
    fn from(e: RegistryError) -> Self {
        CliError::Registry(e)
    }
}

impl From<CompositeError> for CliError {
    fn from(e: CompositeError) -> Self {
        CliError::Composite(e)
    }
}

impl From<AlignError> for CliError {
    fn from(e: AlignError) -> Self {
        CliError::Align(e)
    }
}

impl From<PyramidError> for CliError {
    fn from(e: PyramidError) -> Self {
        CliError::Pyramid(e)
    }
}
