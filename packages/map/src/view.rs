//! The map view controller.

use std::sync::Arc;

use crime_choropleth_backend::{Backend, BackendError};
use crime_choropleth_map_models::{
    FeatureId, MapDefaults, MunicipalityCollection, MunicipalityFeature, MunicipalityFilter,
    PathStyle, StyleState, ViewFilters, ZoomAction,
};

use crate::{
    Clickable, FeatureCapabilities, FeatureLayer, FeatureSpec, FilterControls, Hoverable, LayerId,
    MapEvent, MapViewError, MapWidget,
};

/// Proof that a load was started. Only the most recently issued ticket can
/// install a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
    crime_type: String,
}

impl LoadTicket {
    /// Crime type the load was started for.
    #[must_use]
    pub fn crime_type(&self) -> &str {
        &self.crime_type
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The new layer replaced the old one.
    Applied {
        /// Number of polygons in the new layer.
        features: usize,
    },
    /// A newer load was started after this one; the result was dropped.
    Stale,
    /// The fetch or decode failed; the previous layer is still shown.
    Failed,
}

/// The layer currently on the map and the per-polygon style state.
struct ActiveLayer {
    id: LayerId,
    collection: MunicipalityCollection,
    styles: Vec<StyleState>,
}

/// One choropleth map: layer, selection, zoom toggle, and selector state.
pub struct MapView<W: MapWidget, C: FilterControls> {
    backend: Arc<dyn Backend>,
    widget: W,
    controls: C,
    defaults: MapDefaults,
    filters: ViewFilters,
    layer: Option<ActiveLayer>,
    selection: Option<FeatureId>,
    zoom_toggle: ZoomAction,
    generation: u64,
}

impl<W: MapWidget, C: FilterControls> MapView<W, C> {
    /// Builds the view and runs the startup sequence:
    ///
    /// 1. default viewport, base tiles, built-in double-click zoom off;
    /// 2. municipality selector filled from the backend, with the
    ///    whole-region option first and selected;
    /// 3. initial load for the selected crime type, else the selector's
    ///    first option, else [`MapDefaults::default_crime_type`].
    ///
    /// A failure in step 3 is logged and leaves an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`MapViewError::Backend`] if the municipality list cannot be
    /// fetched.
    pub async fn initialize(
        backend: Arc<dyn Backend>,
        mut widget: W,
        mut controls: C,
        defaults: MapDefaults,
    ) -> Result<Self, MapViewError> {
        widget.set_view(defaults.viewport);
        widget.add_tile_layer(&defaults.tiles);
        widget.set_double_click_zoom(false);

        log::info!("Loading municipality list...");
        let names = backend.list_municipalities().await?;
        log::info!("Loaded {} municipalities", names.len());

        let mut options = Vec::with_capacity(names.len() + 1);
        options.push(defaults.whole_region_label.clone());
        options.extend(names);
        controls.set_municipality_options(&options);
        controls.set_selected_municipality(&defaults.whole_region_label);

        let crime_type = controls
            .selected_crime_type()
            .or_else(|| controls.crime_type_options().into_iter().next())
            .unwrap_or_else(|| defaults.default_crime_type.clone());

        let mut view = Self {
            backend,
            widget,
            controls,
            defaults,
            filters: ViewFilters::default(),
            layer: None,
            selection: None,
            zoom_toggle: ZoomAction::ZoomIn,
            generation: 0,
        };

        view.load_data(&crime_type).await;

        Ok(view)
    }

    /// Fetches and installs the layer for `crime_type`.
    ///
    /// On failure the error is logged and the current layer stays.
    pub async fn load_data(&mut self, crime_type: &str) -> LoadOutcome {
        let ticket = self.begin_load(crime_type);
        let result = self.backend.fetch_map_data(crime_type).await;
        self.finish_load(ticket, result)
    }

    /// Starts a load: records the crime type and issues a ticket that
    /// supersedes every earlier one.
    pub fn begin_load(&mut self, crime_type: &str) -> LoadTicket {
        self.generation += 1;
        self.filters.crime_type = crime_type.to_string();
        log::debug!(
            "Starting load #{} for '{crime_type}'",
            self.generation
        );

        LoadTicket {
            generation: self.generation,
            crime_type: crime_type.to_string(),
        }
    }

    /// Completes a load started with [`Self::begin_load`].
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<MunicipalityCollection, BackendError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            log::debug!(
                "Dropping result of load #{} for '{}': load #{} is newer",
                ticket.generation,
                ticket.crime_type,
                self.generation
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(collection) => {
                let features = collection.len();
                self.install_layer(collection);
                log::info!(
                    "Rendered {features} municipalities for '{}'",
                    ticket.crime_type
                );
                LoadOutcome::Applied { features }
            }
            Err(e) => {
                log::error!("Failed to load map data for '{}': {e}", ticket.crime_type);
                LoadOutcome::Failed
            }
        }
    }

    /// Crime selector changed.
    pub async fn on_crime_type_change(&mut self, crime_type: &str) -> LoadOutcome {
        self.load_data(crime_type).await
    }

    /// Municipality selector changed to `option`.
    ///
    /// The whole-region option resets the viewport and clears the
    /// selection. Any other option selects the matching polygon exactly as a
    /// click would. Unknown names are logged and ignored.
    ///
    /// Without a layer on the map the pick is remembered and applied by the
    /// next load that succeeds.
    pub fn on_municipality_change(&mut self, option: &str) {
        if option == self.defaults.whole_region_label {
            self.reset_to_whole_region();
            return;
        }

        let Some(layer) = self.layer.as_ref() else {
            log::debug!("No layer yet; '{option}' will be selected after the next load");
            self.filters.municipality = MunicipalityFilter::Named(option.to_string());
            return;
        };

        match layer.collection.find_by_name(option) {
            Some(feature) => self.click(feature),
            None => log::warn!("No municipality named '{option}' on the current layer"),
        }
    }

    /// The map was clicked outside every polygon.
    pub fn on_background_click(&mut self) {
        if self.clear_selection() {
            self.filters.municipality = MunicipalityFilter::WholeRegion;
            self.controls
                .set_selected_municipality(&self.defaults.whole_region_label);
        }
    }

    /// The map was double-clicked. Returns the zoom that was performed.
    pub fn on_double_click(&mut self) -> ZoomAction {
        let action = self.zoom_toggle;
        match action {
            ZoomAction::ZoomIn => self.widget.zoom_in(),
            ZoomAction::ZoomOut => self.widget.zoom_out(),
        }
        self.zoom_toggle = action.toggled();
        log::debug!("Double-click: {action}");
        action
    }

    /// Routes a widget event. Events for a layer that is no longer active
    /// are ignored.
    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::FeatureMouseOver { layer, feature } => {
                if self.accepts(layer) {
                    self.hover(feature);
                }
            }
            MapEvent::FeatureMouseOut { layer, feature } => {
                if self.accepts(layer) {
                    self.unhover(feature);
                }
            }
            MapEvent::FeatureClick { layer, feature } => {
                if self.accepts(layer) {
                    self.click(feature);
                }
            }
            MapEvent::BackgroundClick => self.on_background_click(),
            MapEvent::DoubleClick => {
                self.on_double_click();
            }
        }
    }

    /// Current selector values.
    #[must_use]
    pub const fn filters(&self) -> &ViewFilters {
        &self.filters
    }

    /// The persistently selected polygon, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<FeatureId> {
        self.selection
    }

    /// The selected municipality, if any.
    #[must_use]
    pub fn selected_feature(&self) -> Option<&MunicipalityFeature> {
        let layer = self.layer.as_ref()?;
        layer.collection.get(self.selection?)
    }

    /// Handle of the active polygon layer.
    #[must_use]
    pub fn layer_id(&self) -> Option<LayerId> {
        self.layer.as_ref().map(|l| l.id)
    }

    /// Municipalities on the active layer.
    #[must_use]
    pub fn collection(&self) -> Option<&MunicipalityCollection> {
        self.layer.as_ref().map(|l| &l.collection)
    }

    /// Which style `feature` currently wears.
    #[must_use]
    pub fn style_state(&self, feature: FeatureId) -> Option<StyleState> {
        self.layer.as_ref()?.styles.get(feature.0).copied()
    }

    /// The zoom the next double-click will perform.
    #[must_use]
    pub const fn next_zoom_action(&self) -> ZoomAction {
        self.zoom_toggle
    }

    /// Map defaults this view was built with.
    #[must_use]
    pub const fn defaults(&self) -> &MapDefaults {
        &self.defaults
    }

    /// The backend, for callers that overlap loads with
    /// [`Self::begin_load`] and [`Self::finish_load`].
    #[must_use]
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// The widget.
    #[must_use]
    pub const fn widget(&self) -> &W {
        &self.widget
    }

    /// The selectors.
    #[must_use]
    pub const fn controls(&self) -> &C {
        &self.controls
    }

    fn accepts(&self, layer: LayerId) -> bool {
        match &self.layer {
            Some(active) if active.id == layer => true,
            _ => {
                log::debug!("Ignoring event for inactive layer {layer:?}");
                false
            }
        }
    }

    fn install_layer(&mut self, collection: MunicipalityCollection) {
        if let Some(old) = self.layer.take() {
            self.widget.remove_layer(old.id);
        }
        self.selection = None;

        let features = collection
            .iter()
            .map(|(id, feature)| FeatureSpec {
                id,
                geometry: feature.geometry.clone(),
                style: PathStyle::default_for(feature.bucket()),
                tooltip: feature.tooltip(),
                capabilities: FeatureCapabilities::ALL,
            })
            .collect();

        let id = self.widget.add_feature_layer(FeatureLayer { features });

        self.layer = Some(ActiveLayer {
            id,
            styles: vec![StyleState::Default; collection.len()],
            collection,
        });

        // Carry the selector's municipality over to the new layer without
        // moving the viewport.
        let carried = match &self.filters.municipality {
            MunicipalityFilter::Named(name) => self
                .collection()
                .and_then(|c| c.find_by_name(name)),
            MunicipalityFilter::WholeRegion => None,
        };
        if let Some(feature) = carried {
            self.select(feature, false);
        }
    }

    /// Applies the selected style to `feature`, resetting the previous
    /// selection. Optionally fits the viewport to the polygon.
    fn select(&mut self, feature: FeatureId, fit: bool) {
        let Some((name, bounds)) = self
            .layer
            .as_ref()
            .and_then(|l| l.collection.get(feature))
            .map(|f| (f.name.clone(), f.bounds))
        else {
            log::warn!("Cannot select unknown feature {feature}");
            return;
        };

        if let Some(previous) = self.selection.take() {
            if previous != feature {
                self.restyle(previous, StyleState::Default);
            }
        }

        self.restyle(feature, StyleState::Selected);
        self.bring_to_front(feature);
        self.selection = Some(feature);

        if fit {
            match bounds {
                Some(bounds) => self.widget.fit_bounds(bounds),
                None => log::warn!("Municipality {name} has no geometry to zoom to"),
            }
        }

        log::debug!("Selected {name}");
        self.controls.set_selected_municipality(&name);
        self.filters.municipality = MunicipalityFilter::Named(name);
    }

    /// Clears the persistent selection. Returns whether there was one.
    fn clear_selection(&mut self) -> bool {
        let Some(previous) = self.selection.take() else {
            return false;
        };
        self.restyle(previous, StyleState::Default);
        true
    }

    fn reset_to_whole_region(&mut self) {
        self.clear_selection();
        self.filters.municipality = MunicipalityFilter::WholeRegion;
        self.controls
            .set_selected_municipality(&self.defaults.whole_region_label);
        self.widget.set_view(self.defaults.viewport);
    }

    fn restyle(&mut self, feature: FeatureId, state: StyleState) {
        let Some(layer) = self.layer.as_mut() else {
            return;
        };
        let Some(municipality) = layer.collection.get(feature) else {
            return;
        };

        let style = PathStyle::for_state(municipality.bucket(), state);
        layer.styles[feature.0] = state;
        self.widget.set_feature_style(layer.id, feature, &style);
    }

    fn bring_to_front(&mut self, feature: FeatureId) {
        if let Some(layer) = &self.layer {
            self.widget.bring_to_front(layer.id, feature);
        }
    }
}

impl<W: MapWidget, C: FilterControls> Hoverable for MapView<W, C> {
    fn hover(&mut self, feature: FeatureId) {
        if self.selection != Some(feature) {
            self.restyle(feature, StyleState::Hovered);
        }
        self.bring_to_front(feature);
    }

    fn unhover(&mut self, feature: FeatureId) {
        if self.selection == Some(feature) {
            return;
        }
        self.restyle(feature, StyleState::Default);
    }
}

impl<W: MapWidget, C: FilterControls> Clickable for MapView<W, C> {
    fn click(&mut self, feature: FeatureId) {
        self.select(feature, true);
    }
}
