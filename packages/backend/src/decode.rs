//! Decoding of `/api/dados_mapa` payloads into [`MunicipalityCollection`]s.
//!
//! The backend serializes its `GeoDataFrame` to a `GeoJSON` string and then
//! serializes that string again as the JSON response body. Whether this is
//! intended is still open with the backend owner, so both layers are
//! decoded here and nowhere else. A body that is already a
//! `FeatureCollection` object is accepted as well.

use crime_choropleth_map_models::{LatLngBounds, MunicipalityCollection, MunicipalityFeature};
use geojson::{Feature, GeoJson};
use serde_json::Value;

use crate::BackendError;

/// Decodes a raw `/api/dados_mapa` response body.
///
/// # Errors
///
/// Returns [`BackendError`] if either JSON layer fails to parse, the inner
/// document is not a `FeatureCollection`, or a feature lacks `name`,
/// `QUANTIDADE`, or `TAXA_POR_100K`.
pub fn decode_map_payload(
    body: &str,
    crime_type: &str,
) -> Result<MunicipalityCollection, BackendError> {
    let outer: Value = serde_json::from_str(body)?;

    let document = match outer {
        Value::String(inner) => serde_json::from_str::<Value>(&inner)?,
        Value::Object(_) => {
            log::warn!("Map payload for '{crime_type}' was not double-encoded; using it as-is");
            outer
        }
        other => {
            return Err(BackendError::Payload {
                message: format!("expected a JSON string or object, got {}", kind_of(&other)),
            });
        }
    };

    let GeoJson::FeatureCollection(collection) = GeoJson::from_json_value(document)? else {
        return Err(BackendError::Payload {
            message: "GeoJSON document is not a FeatureCollection".to_string(),
        });
    };

    let features = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| decode_feature(index, feature))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "Decoded {} municipalities for '{crime_type}'",
        features.len()
    );

    Ok(MunicipalityCollection {
        crime_type: crime_type.to_string(),
        features,
    })
}

fn decode_feature(index: usize, feature: Feature) -> Result<MunicipalityFeature, BackendError> {
    let invalid = |message: String| BackendError::InvalidFeature { index, message };

    let properties = feature
        .properties
        .ok_or_else(|| invalid("feature has no properties".to_string()))?;

    let name = properties
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing string property 'name'".to_string()))?
        .to_string();

    let quantity = properties
        .get("QUANTIDADE")
        .and_then(as_count)
        .ok_or_else(|| invalid(format!("{name}: missing integer property 'QUANTIDADE'")))?;

    // pandas writes a missing rate as null; the backend fills it with 0
    // before serializing, so null is treated the same way here.
    let rate_per_100k = match properties.get("TAXA_POR_100K") {
        Some(Value::Null) => 0.0,
        Some(value) => value
            .as_f64()
            .ok_or_else(|| invalid(format!("{name}: 'TAXA_POR_100K' is not a number")))?,
        None => {
            return Err(invalid(format!(
                "{name}: missing numeric property 'TAXA_POR_100K'"
            )));
        }
    };

    let bounds = feature.geometry.as_ref().and_then(geometry_bounds);
    if feature.geometry.is_some() && bounds.is_none() {
        log::warn!("Could not compute bounds for municipality {name}");
    }

    Ok(MunicipalityFeature {
        name,
        quantity,
        rate_per_100k,
        geometry: feature.geometry,
        bounds,
    })
}

/// Accepts `12` as well as `12.0`, which is what a float column that was
/// never cast back to integers serializes to.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

/// Bounding box of a `GeoJSON` geometry.
#[must_use]
pub fn geometry_bounds(geometry: &geojson::Geometry) -> Option<LatLngBounds> {
    use geo::BoundingRect;

    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    geo_geom
        .bounding_rect()
        .map(|rect| LatLngBounds::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
