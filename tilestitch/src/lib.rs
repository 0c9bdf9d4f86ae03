//! Tilestitch - map assembly from editor screenshot captures
//!
//! This library assembles a large tiled map image from overlapping square
//! screenshots captured at known world-space coordinates by a game-level
//! editor's screenshot tool. It crops raw captures to fixed-size tiles,
//! composites tiles onto a single canvas using a grid derived from their
//! coordinates, and discovers the correct inter-tile overlap by
//! cross-correlating rows of adjacent captures.
//!
//! # High-Level Flow
//!
//! ```no_run
//! use std::path::Path;
//! use tilestitch::composite::composite_all;
//! use tilestitch::scan::scan_directory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = scan_directory(Path::new("captures"), "tile")?;
//! let map = composite_all(&mut registry, 550, 7)?;
//! map.save("map.png")?;
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod composite;
pub mod config;
pub mod coord;
pub mod logging;
pub mod pyramid;
pub mod registry;
pub mod scan;
pub mod tile;

/// Version of the tilestitch library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
