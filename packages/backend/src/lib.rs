#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Backend client for the crime choropleth.
//!
//! The dashboard backend exposes two endpoints:
//!
//! * `GET /api/municipios` returns a JSON array of municipality names.
//! * `GET /api/dados_mapa?crime=<type>` returns a JSON **string** whose
//!   contents are a `GeoJSON` `FeatureCollection`. The payload is encoded
//!   twice, so it has to be decoded twice (see [`decode`]).
//!
//! The [`Backend`] trait is what the map view talks to; [`http::HttpBackend`]
//! is the `reqwest` implementation.

pub mod decode;
pub mod http;

use crime_choropleth_map_models::MunicipalityCollection;
use thiserror::Error;

pub use http::{BackendConfig, HttpBackend};

/// Errors from fetching or decoding backend data.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Inner payload was JSON but not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Payload was valid JSON of the wrong shape.
    #[error("Unexpected payload: {message}")]
    Payload {
        /// Description of the shape that was found.
        message: String,
    },

    /// A feature was missing required properties or had values of the
    /// wrong type.
    #[error("Invalid feature {index}: {message}")]
    InvalidFeature {
        /// Position of the feature in the collection.
        index: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Client configuration was unusable.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Source of municipality names and per-crime map data.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Lists municipality names in the order the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the request or decoding fails.
    async fn list_municipalities(&self) -> Result<Vec<String>, BackendError>;

    /// Fetches every municipality with its figures for `crime_type`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the request or decoding fails.
    async fn fetch_map_data(&self, crime_type: &str)
    -> Result<MunicipalityCollection, BackendError>;
}
