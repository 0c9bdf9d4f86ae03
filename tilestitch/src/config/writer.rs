//! Serialization of a `ConfigFile` back to INI text.
//!
//! Produces a commented file so a hand-edited config and a committed one
//! look the same. This is what the `align --commit` flow writes after the
//! user confirms a calibrated overlap.

use super::settings::ConfigFile;

/// Renders the configuration as INI text.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        "\
# tilestitch configuration
#
# crop_size and overlap must match the capture tool's spacing.
# Calibrate overlap with: tilestitch align <input_dir> --commit

[tiles]
crop_size = {crop_size}
overlap = {overlap}
suffix = {suffix}
skip_existing = {skip_existing}
delete_originals = {delete_originals}

[composite]
robust_step = {robust_step}

[pyramid]
lod = {lod}
tile_name = {tile_name}
format = {format}

[logging]
directory = {log_dir}
file = {log_file}
",
        crop_size = config.tiles.crop_size,
        overlap = config.tiles.overlap,
        suffix = config.tiles.suffix,
        skip_existing = config.tiles.skip_existing,
        delete_originals = config.tiles.delete_originals,
        robust_step = config.composite.robust_step,
        lod = config.pyramid.lod,
        tile_name = config.pyramid.tile_name,
        format = config.pyramid.format,
        log_dir = config.logging.directory,
        log_file = config.logging.file,
    )
}
