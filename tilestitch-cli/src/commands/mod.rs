//! CLI command implementations.
//!
//! Each subcommand has its own module with an argument struct and a `run`
//! function returning `Result<(), CliError>`.
//!
//! # Command Modules
//!
//! - [`tiles`] - Batch-crop raw screenshots into tile files
//! - [`map`] - Composite (a region of) the grid into one image
//! - [`pyramid`] - Publish tiles into the map viewer's directory tree
//! - [`align`] - Estimate the inter-tile overlap from raw captures
//! - [`preview`] - Render one overlap preview pair

pub mod align;
pub mod common;
pub mod map;
pub mod preview;
pub mod pyramid;
pub mod tiles;
