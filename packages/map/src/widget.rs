//! The mapping widget collaborator.

use crime_choropleth_map_models::{
    FeatureId, LatLngBounds, PathStyle, TileLayerConfig, Viewport,
};

use crate::FeatureCapabilities;

/// Handle to a layer added to a [`MapWidget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

/// One polygon as handed to the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpec {
    /// Id the widget reports back in [`MapEvent`]s.
    pub id: FeatureId,
    /// Geometry to draw.
    pub geometry: Option<geojson::Geometry>,
    /// Initial style.
    pub style: PathStyle,
    /// Tooltip shown on hover.
    pub tooltip: String,
    /// Which pointer events the widget should report for this polygon.
    pub capabilities: FeatureCapabilities,
}

/// A whole polygon layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureLayer {
    /// Polygons in draw order.
    pub features: Vec<FeatureSpec>,
}

/// Pointer events reported by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    /// Pointer entered a polygon.
    FeatureMouseOver {
        /// Layer the polygon belongs to.
        layer: LayerId,
        /// The polygon.
        feature: FeatureId,
    },
    /// Pointer left a polygon.
    FeatureMouseOut {
        /// Layer the polygon belongs to.
        layer: LayerId,
        /// The polygon.
        feature: FeatureId,
    },
    /// A polygon was clicked.
    FeatureClick {
        /// Layer the polygon belongs to.
        layer: LayerId,
        /// The polygon.
        feature: FeatureId,
    },
    /// The map was clicked outside every polygon.
    BackgroundClick,
    /// The map was double-clicked anywhere.
    DoubleClick,
}

/// Operations the map view needs from a mapping library.
///
/// Mirrors the subset of a Leaflet-style API the view uses. Implementations
/// own their own rendering; the view only tells them what changed.
pub trait MapWidget {
    /// Current center and zoom.
    fn viewport(&self) -> Viewport;

    /// Jumps to `viewport`.
    fn set_view(&mut self, viewport: Viewport);

    /// Pans and zooms so `bounds` fills the map.
    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Zooms in one level around the current center.
    fn zoom_in(&mut self);

    /// Zooms out one level around the current center.
    fn zoom_out(&mut self);

    /// Adds the base raster layer.
    fn add_tile_layer(&mut self, tiles: &TileLayerConfig);

    /// Enables or disables the library's built-in double-click zoom.
    fn set_double_click_zoom(&mut self, enabled: bool);

    /// Adds a polygon layer and returns its handle.
    fn add_feature_layer(&mut self, layer: FeatureLayer) -> LayerId;

    /// Removes a layer previously returned by [`Self::add_feature_layer`].
    fn remove_layer(&mut self, layer: LayerId);

    /// Restyles one polygon.
    fn set_feature_style(&mut self, layer: LayerId, feature: FeatureId, style: &PathStyle);

    /// Moves one polygon to the top of the draw order.
    fn bring_to_front(&mut self, layer: LayerId, feature: FeatureId);
}
