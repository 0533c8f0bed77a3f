#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth map view controller.
//!
//! [`MapView`] owns the state of one map: the active municipality layer,
//! the single persistent selection, the double-click zoom toggle, and the
//! current selector values. It never draws anything itself. Drawing goes
//! through a [`MapWidget`] and the two selectors go through
//! [`FilterControls`], so the same controller drives a browser map, the
//! terminal renderer in `crime_choropleth_cli`, or a recording fake in
//! tests.
//!
//! Widget events are fed back in through [`MapView::handle_event`], which
//! routes them to the [`Hoverable`] and [`Clickable`] capabilities every
//! feature of the layer is installed with.

pub mod capability;
pub mod controls;
pub mod view;
pub mod widget;

#[cfg(test)]
mod test_support;

use crime_choropleth_backend::BackendError;
use thiserror::Error;

pub use capability::{Clickable, FeatureCapabilities, Hoverable};
pub use controls::FilterControls;
pub use view::{LoadOutcome, LoadTicket, MapView};
pub use widget::{FeatureLayer, FeatureSpec, LayerId, MapEvent, MapWidget};

/// Errors that prevent a [`MapView`] from being built.
///
/// Failures while loading map data after initialization are not errors:
/// they are logged and the view keeps its last good layer.
#[derive(Debug, Error)]
pub enum MapViewError {
    /// The municipality list could not be fetched.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}
