//! Fakes for the map view's collaborators.

use std::collections::{BTreeMap, BTreeSet};

use crime_choropleth_backend::{Backend, BackendError};
use crime_choropleth_map_models::{
    FeatureId, LatLng, LatLngBounds, MapDefaults, MunicipalityCollection, MunicipalityFeature,
    PathStyle, TileLayerConfig, Viewport,
};

use crate::{FeatureLayer, FilterControls, LayerId, MapWidget};

pub fn defaults() -> MapDefaults {
    MapDefaults::embedded().unwrap()
}

/// A collection of half-degree squares laid out west to east, one per
/// `(name, rate)`. Quantities are `rate * 10`.
pub fn collection(crime_type: &str, rows: &[(&str, f64)]) -> MunicipalityCollection {
    let features = rows
        .iter()
        .enumerate()
        .map(|(i, (name, rate))| {
            #[allow(clippy::cast_precision_loss)]
            let west = -40.0 + i as f64;
            let (south, size) = (-5.0, 0.5);
            let ring = vec![
                vec![west, south],
                vec![west + size, south],
                vec![west + size, south + size],
                vec![west, south + size],
                vec![west, south],
            ];

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let quantity = (rate * 10.0).round() as u64;

            MunicipalityFeature {
                name: (*name).to_string(),
                quantity,
                rate_per_100k: *rate,
                geometry: Some(geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))),
                bounds: Some(LatLngBounds::new(west, south, west + size, south + size)),
            }
        })
        .collect();

    MunicipalityCollection {
        crime_type: crime_type.to_string(),
        features,
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    municipalities: Option<Vec<String>>,
    collections: BTreeMap<String, MunicipalityCollection>,
    failing: BTreeSet<String>,
}

impl ScriptedBackend {
    pub fn with_municipalities(mut self, names: &[&str]) -> Self {
        self.municipalities = Some(names.iter().map(ToString::to_string).collect());
        self
    }

    pub fn failing_municipalities(mut self) -> Self {
        self.municipalities = None;
        self
    }

    pub fn with_collection(mut self, collection: MunicipalityCollection) -> Self {
        self.collections
            .insert(collection.crime_type.clone(), collection);
        self
    }

    pub fn failing_crime(mut self, crime_type: &str) -> Self {
        self.failing.insert(crime_type.to_string());
        self
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn list_municipalities(&self) -> Result<Vec<String>, BackendError> {
        self.municipalities
            .clone()
            .ok_or_else(|| BackendError::Payload {
                message: "connection refused".to_string(),
            })
    }

    async fn fetch_map_data(
        &self,
        crime_type: &str,
    ) -> Result<MunicipalityCollection, BackendError> {
        if self.failing.contains(crime_type) {
            return Err(BackendError::Payload {
                message: "connection refused".to_string(),
            });
        }
        self.collections
            .get(crime_type)
            .cloned()
            .ok_or_else(|| BackendError::Payload {
                message: format!("no data for {crime_type}"),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCall {
    SetView(Viewport),
    FitBounds(LatLngBounds),
    ZoomIn,
    ZoomOut,
    AddTileLayer,
    DoubleClickZoom(bool),
    AddLayer(LayerId),
    RemoveLayer(LayerId),
    SetStyle(LayerId, FeatureId),
    BringToFront(LayerId, FeatureId),
}

/// Records every call and tracks just enough state to assert on.
pub struct RecordingWidget {
    pub calls: Vec<WidgetCall>,
    viewport: Viewport,
    layers: BTreeMap<LayerId, FeatureLayer>,
    styles: BTreeMap<(LayerId, FeatureId), PathStyle>,
    next_layer: u64,
}

impl Default for RecordingWidget {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            viewport: Viewport {
                center: LatLng::new(0.0, 0.0),
                zoom: 0,
            },
            layers: BTreeMap::new(),
            styles: BTreeMap::new(),
            next_layer: 1,
        }
    }
}

impl RecordingWidget {
    pub fn layer(&self, id: LayerId) -> Option<&FeatureLayer> {
        self.layers.get(&id)
    }

    pub fn live_layers(&self) -> Vec<LayerId> {
        self.layers.keys().copied().collect()
    }

    /// Latest style applied to a polygon, or the one it was added with.
    pub fn style_of(&self, layer: LayerId, feature: FeatureId) -> Option<&PathStyle> {
        self.styles.get(&(layer, feature)).or_else(|| {
            self.layers
                .get(&layer)?
                .features
                .iter()
                .find(|f| f.id == feature)
                .map(|f| &f.style)
        })
    }
}

impl MapWidget for RecordingWidget {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_view(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.calls.push(WidgetCall::SetView(viewport));
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.viewport = Viewport {
            center: bounds.center(),
            zoom: 10,
        };
        self.calls.push(WidgetCall::FitBounds(bounds));
    }

    fn zoom_in(&mut self) {
        self.viewport.zoom = self.viewport.zoom.saturating_add(1);
        self.calls.push(WidgetCall::ZoomIn);
    }

    fn zoom_out(&mut self) {
        self.viewport.zoom = self.viewport.zoom.saturating_sub(1);
        self.calls.push(WidgetCall::ZoomOut);
    }

    fn add_tile_layer(&mut self, _tiles: &TileLayerConfig) {
        self.calls.push(WidgetCall::AddTileLayer);
    }

    fn set_double_click_zoom(&mut self, enabled: bool) {
        self.calls.push(WidgetCall::DoubleClickZoom(enabled));
    }

    fn add_feature_layer(&mut self, layer: FeatureLayer) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        self.layers.insert(id, layer);
        self.calls.push(WidgetCall::AddLayer(id));
        id
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.layers.remove(&layer);
        self.styles.retain(|(l, _), _| *l != layer);
        self.calls.push(WidgetCall::RemoveLayer(layer));
    }

    fn set_feature_style(&mut self, layer: LayerId, feature: FeatureId, style: &PathStyle) {
        self.styles.insert((layer, feature), style.clone());
        self.calls.push(WidgetCall::SetStyle(layer, feature));
    }

    fn bring_to_front(&mut self, layer: LayerId, feature: FeatureId) {
        self.calls.push(WidgetCall::BringToFront(layer, feature));
    }
}

pub struct StaticControls {
    crime_types: Vec<String>,
    selected_crime: Option<String>,
    pub municipality_options: Vec<String>,
    pub selected_municipality: Option<String>,
}

impl StaticControls {
    pub fn new(crime_types: &[&str]) -> Self {
        Self {
            crime_types: crime_types.iter().map(ToString::to_string).collect(),
            selected_crime: None,
            municipality_options: Vec::new(),
            selected_municipality: None,
        }
    }

    pub fn with_selected(mut self, crime_type: &str) -> Self {
        self.selected_crime = Some(crime_type.to_string());
        self
    }
}

impl FilterControls for StaticControls {
    fn crime_type_options(&self) -> Vec<String> {
        self.crime_types.clone()
    }

    fn selected_crime_type(&self) -> Option<String> {
        self.selected_crime.clone()
    }

    fn set_municipality_options(&mut self, options: &[String]) {
        self.municipality_options = options.to_vec();
    }

    fn set_selected_municipality(&mut self, option: &str) {
        self.selected_municipality = Some(option.to_string());
    }
}
