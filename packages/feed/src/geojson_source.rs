//! `GeoJSON` `FeatureCollection` adapter.
//!
//! Flattens each feature's properties into a plain JSON object and
//! injects the Point geometry as `_geometry_x` (longitude) and
//! `_geometry_y` (latitude) synthetic fields, so the same
//! [`crate::feed_def::FieldMapping`] machinery that handles plain JSON
//! APIs applies unchanged.

use geojson::{GeoJson, Value as GeomValue};

use crate::{FeedError, FetchOptions};

/// Configuration for a `GeoJSON` fetch.
#[derive(Debug)]
pub struct GeoJsonConfig<'a> {
    /// Endpoint URL.
    pub url: &'a str,
    /// Human-readable feed name for logging.
    pub label: &'a str,
}

/// Flattens a `GeoJSON` document into one JSON object per feature.
///
/// Features without properties yield an object holding only the
/// synthetic geometry fields; features without a Point geometry keep
/// their properties but gain no geometry fields.
///
/// # Errors
///
/// Returns [`FeedError::GeoJson`] if the document is not valid `GeoJSON`.
pub fn flatten_features(body: &str) -> Result<Vec<serde_json::Value>, FeedError> {
    let geojson: GeoJson = body.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(FeedError::Config {
            message: "expected a GeoJSON FeatureCollection".to_string(),
        });
    };

    let mut records = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let mut record = feature.properties.unwrap_or_default();
        if let Some(geometry) = feature.geometry {
            if let GeomValue::Point(position) = geometry.value {
                if let [x, y, ..] = position.as_slice() {
                    record.insert("_geometry_x".to_string(), serde_json::json!(x));
                    record.insert("_geometry_y".to_string(), serde_json::json!(y));
                }
            }
        }
        records.push(serde_json::Value::Object(record));
    }
    Ok(records)
}

/// Fetches a `GeoJSON` endpoint and returns flattened feature records.
///
/// # Errors
///
/// Returns [`FeedError`] if the endpoint cannot be fetched or the body
/// is not valid `GeoJSON`.
pub async fn fetch_geojson(
    config: &GeoJsonConfig<'_>,
    options: &FetchOptions,
) -> Result<Vec<serde_json::Value>, FeedError> {
    let body = crate::http_client()?
        .get(config.url)
        .send()
        .await?
        .text()
        .await?;
    let mut records = flatten_features(&body)?;
    log::info!("{}: flattened {} features", config.label, records.len());
    if let Some(limit) = options.limit {
        records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    Ok(records)
}
