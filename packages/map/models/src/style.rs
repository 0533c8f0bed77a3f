//! Polygon path styles.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::ColorBucket;

/// Border color of the persistent selection.
pub const SELECTED_BORDER_COLOR: &str = "#2b83ba";

/// Border color while the pointer is over a polygon.
pub const HOVER_BORDER_COLOR: &str = "#666";

/// Stroke and fill options for one polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    /// Fill color (hex).
    pub fill_color: String,
    /// Fill opacity, `0.0..=1.0`.
    pub fill_opacity: f64,
    /// Border width in pixels.
    pub weight: f64,
    /// Border color.
    pub color: String,
    /// Border opacity, `0.0..=1.0`.
    pub opacity: f64,
    /// SVG dash pattern for the border. `None` draws a solid line.
    pub dash_array: Option<String>,
}

impl PathStyle {
    /// Resting style for a polygon in the given bucket.
    #[must_use]
    pub fn default_for(bucket: ColorBucket) -> Self {
        Self {
            fill_color: bucket.color().to_string(),
            fill_opacity: 0.7,
            weight: 1.0,
            color: "white".to_string(),
            opacity: 1.0,
            dash_array: Some("3".to_string()),
        }
    }

    /// Transient emphasis while hovered. Keeps the bucket fill.
    #[must_use]
    pub fn hover_for(bucket: ColorBucket) -> Self {
        Self {
            weight: 3.0,
            color: HOVER_BORDER_COLOR.to_string(),
            dash_array: None,
            ..Self::default_for(bucket)
        }
    }

    /// Persistent selection highlight. Keeps the bucket fill.
    #[must_use]
    pub fn selected_for(bucket: ColorBucket) -> Self {
        Self {
            weight: 4.0,
            color: SELECTED_BORDER_COLOR.to_string(),
            fill_opacity: 0.5,
            dash_array: None,
            ..Self::default_for(bucket)
        }
    }

    /// Style for a polygon in `bucket` shown in `state`.
    #[must_use]
    pub fn for_state(bucket: ColorBucket, state: StyleState) -> Self {
        match state {
            StyleState::Default => Self::default_for(bucket),
            StyleState::Hovered => Self::hover_for(bucket),
            StyleState::Selected => Self::selected_for(bucket),
        }
    }
}

/// Which of the three styles a polygon currently wears.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleState {
    /// Computed choropleth style.
    #[default]
    Default,
    /// Pointer is over the polygon.
    Hovered,
    /// Persistent selection.
    Selected,
}
