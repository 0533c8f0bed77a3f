#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality feature, style, color scale, and viewport types for the
//! crime choropleth.
//!
//! These are the plain values that flow between the backend client, the
//! map view controller, and whatever widget ends up drawing the polygons.
//! Nothing in here performs I/O apart from parsing the embedded map
//! defaults.

pub mod color;
pub mod config;
pub mod style;

use serde::{Deserialize, Serialize};

pub use color::{ColorBucket, color_for_rate};
pub use config::{ConfigError, MapDefaults, TileLayerConfig};
pub use style::{PathStyle, StyleState};

/// Index of a feature within the collection it was decoded from.
///
/// Only meaningful together with the layer that rendered that collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub usize);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A geographic coordinate in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lat, self.lng)
    }
}

/// Axis-aligned bounding box of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Creates bounds from `west,south,east,north` edges.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            south_west: LatLng::new(south, west),
            north_east: LatLng::new(north, east),
        }
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            f64::midpoint(self.south_west.lat, self.north_east.lat),
            f64::midpoint(self.south_west.lng, self.north_east.lng),
        )
    }

    /// Longitude span in degrees.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.north_east.lng - self.south_west.lng
    }

    /// Latitude span in degrees.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }
}

/// The visible area of the map: a center point and a zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Map center.
    pub center: LatLng,
    /// Zoom level (tile pyramid level, 0 = whole world).
    pub zoom: u8,
}

/// A municipality polygon with the crime figures attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityFeature {
    /// Municipality name as published by the backend (e.g. `"Fortaleza"`).
    pub name: String,
    /// Number of occurrences of the queried crime type (`QUANTIDADE`).
    pub quantity: u64,
    /// Occurrences per 100,000 residents (`TAXA_POR_100K`).
    pub rate_per_100k: f64,
    /// Polygon geometry to draw, if the feature carried one.
    pub geometry: Option<geojson::Geometry>,
    /// Bounding box of the geometry, used to fit the viewport.
    pub bounds: Option<LatLngBounds>,
}

impl MunicipalityFeature {
    /// Color bucket this feature falls into.
    #[must_use]
    pub fn bucket(&self) -> ColorBucket {
        ColorBucket::for_rate(self.rate_per_100k)
    }

    /// Hover tooltip text. The rate is always shown with two decimals.
    #[must_use]
    pub fn tooltip(&self) -> String {
        format!(
            "{}\nQuantidade: {}\nTaxa por 100 mil: {:.2}",
            self.name, self.quantity, self.rate_per_100k
        )
    }
}

/// All municipalities returned for a single crime-type query.
///
/// Replaced wholesale on every query; never patched in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MunicipalityCollection {
    /// The crime type this collection was fetched for.
    pub crime_type: String,
    /// Features in backend order. [`FeatureId`]s index into this list.
    pub features: Vec<MunicipalityFeature>,
}

impl MunicipalityCollection {
    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Looks up a feature by id.
    #[must_use]
    pub fn get(&self, id: FeatureId) -> Option<&MunicipalityFeature> {
        self.features.get(id.0)
    }

    /// Iterates `(id, feature)` pairs in backend order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &MunicipalityFeature)> {
        self.features
            .iter()
            .enumerate()
            .map(|(i, feature)| (FeatureId(i), feature))
    }

    /// Finds a municipality by name.
    ///
    /// Tries an exact match first, then falls back to a comparison that
    /// ignores case and Portuguese diacritics (`"CAUCAIA"` finds `"Caucaia"`,
    /// `"Itapage"` finds `"Itapajé"`).
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<FeatureId> {
        if let Some((id, _)) = self.iter().find(|(_, f)| f.name == name) {
            return Some(id);
        }

        let wanted = normalize_name(name);
        self.iter()
            .find(|(_, f)| normalize_name(&f.name) == wanted)
            .map(|(id, _)| id)
    }
}

/// Upper-cases a municipality name and strips the diacritics that occur in
/// Brazilian place names.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' | 'Ç' => 'C',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// The municipality selector's value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum MunicipalityFilter {
    /// The "whole region" sentinel: no municipality selected.
    #[default]
    WholeRegion,
    /// A specific municipality by name.
    Named(String),
}

impl MunicipalityFilter {
    /// The selected name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::WholeRegion => None,
            Self::Named(name) => Some(name),
        }
    }
}

/// Current values of the two UI selectors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFilters {
    /// Crime type key (e.g. `"HOMICIDIO DOLOSO"`).
    pub crime_type: String,
    /// Selected municipality or the whole-region sentinel.
    pub municipality: MunicipalityFilter,
}

/// What a double-click does to the viewport.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoomAction {
    /// Zoom in one level around the current center.
    ZoomIn,
    /// Zoom out one level around the current center.
    ZoomOut,
}

impl ZoomAction {
    /// The action the next double-click performs.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::ZoomIn => Self::ZoomOut,
            Self::ZoomOut => Self::ZoomIn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(name: &str) -> MunicipalityFeature {
        MunicipalityFeature {
            name: name.to_string(),
            quantity: 0,
            rate_per_100k: 0.0,
            geometry: None,
            bounds: None,
        }
    }

    #[test]
    fn finds_exact_name_before_normalized() {
        let collection = MunicipalityCollection {
            crime_type: "ROUBO".to_string(),
            features: vec![feature("Itapajé"), feature("ITAPAJE")],
        };
        assert_eq!(collection.find_by_name("ITAPAJE"), Some(FeatureId(1)));
        assert_eq!(collection.find_by_name("Itapajé"), Some(FeatureId(0)));
    }

    #[test]
    fn finds_name_ignoring_case_and_accents() {
        let collection = MunicipalityCollection {
            crime_type: "ROUBO".to_string(),
            features: vec![feature("Fortaleza"), feature("São Gonçalo do Amarante")],
        };
        assert_eq!(
            collection.find_by_name("sao goncalo do amarante"),
            Some(FeatureId(1))
        );
        assert_eq!(collection.find_by_name("Crato"), None);
    }

    #[test]
    fn tooltip_formats_rate_with_two_decimals() {
        let f = MunicipalityFeature {
            quantity: 12,
            rate_per_100k: 4.5678,
            ..feature("Sobral")
        };
        assert_eq!(f.tooltip(), "Sobral\nQuantidade: 12\nTaxa por 100 mil: 4.57");
    }

    #[test]
    fn zoom_action_toggles_with_period_two() {
        let start = ZoomAction::ZoomIn;
        assert_eq!(start.toggled(), ZoomAction::ZoomOut);
        assert_eq!(start.toggled().toggled(), start);
    }

    #[test]
    fn bounds_center_is_midpoint() {
        let bounds = LatLngBounds::new(-39.0, -4.0, -38.0, -3.0);
        assert_eq!(bounds.center(), LatLng::new(-3.5, -38.5));
        assert!((bounds.width() - 1.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 1.0).abs() < f64::EPSILON);
    }
}
