//! Pointer capabilities attached to every rendered polygon.

use crime_choropleth_map_models::FeatureId;

/// Reacts to the pointer entering and leaving a polygon.
pub trait Hoverable {
    /// Pointer entered `feature`.
    fn hover(&mut self, feature: FeatureId);

    /// Pointer left `feature`.
    fn unhover(&mut self, feature: FeatureId);
}

/// Reacts to a click on a polygon.
pub trait Clickable {
    /// `feature` was clicked.
    fn click(&mut self, feature: FeatureId);
}

/// Which capabilities a polygon is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureCapabilities {
    /// Mouse over/out is routed to [`Hoverable`].
    pub hoverable: bool,
    /// Clicks are routed to [`Clickable`].
    pub clickable: bool,
}

impl FeatureCapabilities {
    /// Both hover and click.
    pub const ALL: Self = Self {
        hoverable: true,
        clickable: true,
    };
}
