//! A [`MapWidget`] that keeps the map in memory and prints it as a table.

use std::collections::BTreeMap;

use crime_choropleth_map::{FeatureLayer, FilterControls, LayerId, MapWidget};
use crime_choropleth_map_models::{
    FeatureId, LatLngBounds, PathStyle, TileLayerConfig, Viewport,
};

/// Most detailed zoom level of the CARTO tiles.
const MAX_ZOOM: u8 = 18;

/// Draws nothing; remembers the viewport, the polygon layers, and the last
/// style and draw position of every polygon.
#[derive(Debug)]
pub struct TerminalMap {
    viewport: Viewport,
    tiles: Option<TileLayerConfig>,
    double_click_zoom: bool,
    layers: BTreeMap<LayerId, TerminalLayer>,
    next_layer: u64,
}

#[derive(Debug)]
struct TerminalLayer {
    styles: BTreeMap<FeatureId, PathStyle>,
    /// Back to front.
    draw_order: Vec<FeatureId>,
}

impl TerminalMap {
    /// An empty map at `viewport`.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            tiles: None,
            double_click_zoom: true,
            layers: BTreeMap::new(),
            next_layer: 1,
        }
    }

    /// Current style of a polygon.
    #[must_use]
    pub fn style(&self, layer: LayerId, feature: FeatureId) -> Option<&PathStyle> {
        self.layers.get(&layer)?.styles.get(&feature)
    }

    /// The polygon drawn on top, if the layer exists and is not empty.
    #[must_use]
    pub fn topmost(&self, layer: LayerId) -> Option<FeatureId> {
        self.layers.get(&layer)?.draw_order.last().copied()
    }

    /// Base tile layer, once added.
    #[must_use]
    pub const fn tiles(&self) -> Option<&TileLayerConfig> {
        self.tiles.as_ref()
    }

    /// Whether the built-in double-click zoom is still on.
    #[must_use]
    pub const fn double_click_zoom(&self) -> bool {
        self.double_click_zoom
    }

    /// Number of polygon layers on the map.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Highest zoom at which `bounds` fits in a single 256px tile span.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn zoom_to_fit(bounds: &LatLngBounds) -> u8 {
    let span = bounds.width().max(bounds.height() * 2.0);
    if !span.is_finite() || span <= 0.0 {
        return MAX_ZOOM;
    }

    let zoom = (360.0 / span).log2().floor();
    if zoom <= 0.0 {
        0
    } else if zoom >= f64::from(MAX_ZOOM) {
        MAX_ZOOM
    } else {
        zoom as u8
    }
}

impl MapWidget for TerminalMap {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_view(&mut self, viewport: Viewport) {
        log::debug!("set_view {} z{}", viewport.center, viewport.zoom);
        self.viewport = viewport;
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.viewport = Viewport {
            center: bounds.center(),
            zoom: zoom_to_fit(&bounds),
        };
        log::debug!(
            "fit_bounds -> {} z{}",
            self.viewport.center,
            self.viewport.zoom
        );
    }

    fn zoom_in(&mut self) {
        self.viewport.zoom = self.viewport.zoom.saturating_add(1).min(MAX_ZOOM);
    }

    fn zoom_out(&mut self) {
        self.viewport.zoom = self.viewport.zoom.saturating_sub(1);
    }

    fn add_tile_layer(&mut self, tiles: &TileLayerConfig) {
        self.tiles = Some(tiles.clone());
    }

    fn set_double_click_zoom(&mut self, enabled: bool) {
        self.double_click_zoom = enabled;
    }

    fn add_feature_layer(&mut self, layer: FeatureLayer) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;

        let draw_order = layer.features.iter().map(|f| f.id).collect();
        let styles = layer
            .features
            .into_iter()
            .map(|f| (f.id, f.style))
            .collect();

        self.layers.insert(id, TerminalLayer { styles, draw_order });
        id
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.layers.remove(&layer);
    }

    fn set_feature_style(&mut self, layer: LayerId, feature: FeatureId, style: &PathStyle) {
        if let Some(terminal_layer) = self.layers.get_mut(&layer) {
            terminal_layer.styles.insert(feature, style.clone());
        }
    }

    fn bring_to_front(&mut self, layer: LayerId, feature: FeatureId) {
        if let Some(terminal_layer) = self.layers.get_mut(&layer) {
            terminal_layer.draw_order.retain(|f| *f != feature);
            terminal_layer.draw_order.push(feature);
        }
    }
}

/// Selectors backed by command-line arguments.
#[derive(Debug, Default)]
pub struct ArgControls {
    crime_type: Option<String>,
    municipality_options: Vec<String>,
    selected_municipality: Option<String>,
}

impl ArgControls {
    /// Controls whose crime selector holds `crime_type` (if given).
    #[must_use]
    pub const fn new(crime_type: Option<String>) -> Self {
        Self {
            crime_type,
            municipality_options: Vec::new(),
            selected_municipality: None,
        }
    }

    /// Options of the municipality selector, whole-region first.
    #[must_use]
    pub fn municipality_options(&self) -> &[String] {
        &self.municipality_options
    }

    /// Option the municipality selector shows.
    #[must_use]
    pub fn selected_municipality(&self) -> Option<&str> {
        self.selected_municipality.as_deref()
    }
}

impl FilterControls for ArgControls {
    fn crime_type_options(&self) -> Vec<String> {
        self.crime_type.iter().cloned().collect()
    }

    fn selected_crime_type(&self) -> Option<String> {
        self.crime_type.clone()
    }

    fn set_municipality_options(&mut self, options: &[String]) {
        self.municipality_options = options.to_vec();
    }

    fn set_selected_municipality(&mut self, option: &str) {
        self.selected_municipality = Some(option.to_string());
    }
}
