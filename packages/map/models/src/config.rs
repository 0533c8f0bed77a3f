//! Map defaults embedded at compile time.
//!
//! The initial viewport, base tile layer, and selector defaults live in
//! `config/map_defaults.toml` next to this crate's manifest.

use serde::Deserialize;
use thiserror::Error;

use crate::{LatLng, Viewport};

const MAP_DEFAULTS_TOML: &str = include_str!("../config/map_defaults.toml");

/// Errors from parsing map defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML did not match [`MapDefaults`].
    #[error("Invalid map defaults: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parsed but semantically unusable.
    #[error("Invalid map defaults: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

/// Base raster layer drawn under the polygons.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TileLayerConfig {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url: String,
    /// HTML attribution shown in the map corner.
    pub attribution: String,
}

/// Initial state of the map and the selectors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapDefaults {
    /// Viewport restored by the whole-region option.
    pub viewport: Viewport,
    /// Base tile layer.
    pub tiles: TileLayerConfig,
    /// Label of the whole-region sentinel in the municipality selector.
    pub whole_region_label: String,
    /// Crime type loaded when the crime selector has no options.
    pub default_crime_type: String,
}

impl MapDefaults {
    /// Parses defaults from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed, the center is out of
    /// range, or a required label is empty.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let defaults: Self = toml::de::from_str(source)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// The defaults shipped with the crate (Ceará, zoom 7).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded file is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(MAP_DEFAULTS_TOML)
    }

    /// Default map center.
    #[must_use]
    pub const fn center(&self) -> LatLng {
        self.viewport.center
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let LatLng { lat, lng } = self.viewport.center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ConfigError::Invalid {
                message: format!("center {} is not a valid coordinate", self.viewport.center),
            });
        }
        if self.whole_region_label.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "whole_region_label is empty".to_string(),
            });
        }
        if self.default_crime_type.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "default_crime_type is empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let defaults = MapDefaults::embedded().unwrap();
        assert_eq!(defaults.viewport.zoom, 7);
        assert_eq!(defaults.center(), LatLng::new(-5.0, -39.5));
        assert_eq!(defaults.default_crime_type, "HOMICIDIO DOLOSO");
        assert!(defaults.tiles.url.contains("{z}"));
    }

    #[test]
    fn rejects_out_of_range_center() {
        let toml = r#"
            default_crime_type = "ROUBO"
            whole_region_label = "Todos"

            [viewport]
            zoom = 3
            center = { lat = 120.0, lng = 0.0 }

            [tiles]
            url = "https://tiles/{z}/{x}/{y}.png"
            attribution = ""
        "#;
        assert!(matches!(
            MapDefaults::from_toml(toml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(matches!(
            MapDefaults::from_toml("default_crime_type = \"ROUBO\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
