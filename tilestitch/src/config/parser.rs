//! INI parsing logic for converting `Ini` into a `ConfigFile`.
//!
//! The single place where INI key names map to struct fields. Starts from
//! defaults and overlays any values found in the file.

use super::settings::ConfigFile;
use super::ConfigError;
use ini::Ini;

pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigError> {
    let mut config = ConfigFile::default();

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = section.get("crop_size") {
            config.tiles.crop_size = parse_value(v, "tiles", "crop_size", "a positive integer")?;
        }
        if let Some(v) = section.get("overlap") {
            config.tiles.overlap = parse_value(v, "tiles", "overlap", "an integer")?;
        }
        if let Some(v) = section.get("suffix") {
            let v = v.trim();
            if !v.is_empty() {
                config.tiles.suffix = v.to_string();
            }
        }
        if let Some(v) = section.get("skip_existing") {
            config.tiles.skip_existing =
                parse_value(v, "tiles", "skip_existing", "'true' or 'false'")?;
        }
        if let Some(v) = section.get("delete_originals") {
            config.tiles.delete_originals =
                parse_value(v, "tiles", "delete_originals", "'true' or 'false'")?;
        }
    }

    // [composite] section
    if let Some(section) = ini.section(Some("composite")) {
        if let Some(v) = section.get("robust_step") {
            config.composite.robust_step =
                parse_value(v, "composite", "robust_step", "'true' or 'false'")?;
        }
    }

    // [pyramid] section
    if let Some(section) = ini.section(Some("pyramid")) {
        if let Some(v) = section.get("lod") {
            config.pyramid.lod = parse_value(v, "pyramid", "lod", "a non-negative integer")?;
        }
        if let Some(v) = section.get("tile_name") {
            let v = v.trim();
            if !v.is_empty() {
                config.pyramid.tile_name = v.to_string();
            }
        }
        if let Some(v) = section.get("format") {
            let v = v.to_lowercase();
            if !["jpg", "jpeg", "png"].contains(&v.as_str()) {
                return Err(ConfigError::InvalidValue {
                    section: "pyramid".to_string(),
                    key: "format".to_string(),
                    value: v,
                    reason: "must be 'jpg', 'jpeg', or 'png'".to_string(),
                });
            }
            config.pyramid.format = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = v.to_string();
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    config.validate()?;
    Ok(config)
}

fn parse_value<T: std::str::FromStr>(
    value: &str,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("must be {}", expected),
        })
}
