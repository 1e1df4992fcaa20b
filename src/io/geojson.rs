//! GeoJSON load/save, built directly on `serde_json::json!` construction and
//! `anyhow::Context` for error messages rather than a dedicated `geojson`
//! crate.
//!
//! Restricted to simply-connected polygon features (no holes), matching the
//! restriction `Dataset::new` documents: one exterior ring per feature, no
//! interiors.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use geo::{Coord, LineString, Polygon};
use serde_json::{json, Map, Value};

use crate::dataset::Dataset;
use crate::error::Error;
use crate::options::Options;

/// Per-feature attribute record for GeoJSON-backed datasets: the feature's
/// `properties` object, carried verbatim.
pub type JsonAttrs = Map<String, Value>;

/// Load a `Dataset` from a GeoJSON file on disk.
pub fn load(path: impl AsRef<Path>, options: Options) -> Result<Dataset<JsonAttrs>> {
    let bytes = std::fs::read(path.as_ref()).with_context(|| format!("reading {}", path.as_ref().display()))?;
    from_geojson_str(&String::from_utf8(bytes).context("GeoJSON file was not valid UTF-8")?, options)
}

/// Save a `Dataset`'s current (possibly simplified) geometry to a GeoJSON
/// file on disk.
pub fn save(dataset: &Dataset<JsonAttrs>, path: impl AsRef<Path>) -> Result<()> {
    let text = to_geojson_string(dataset)?;
    std::fs::write(path.as_ref(), text).with_context(|| format!("writing {}", path.as_ref().display()))
}

/// Parse a GeoJSON `FeatureCollection` string into a `Dataset`.
pub fn from_geojson_str(text: &str, options: Options) -> Result<Dataset<JsonAttrs>> {
    let value: Value = serde_json::from_str(text).context("failed to parse GeoJSON")?;
    let srs = value.get("crs").cloned();

    let features = value
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("GeoJSON document has no \"features\" array"))?;

    let mut polygons = Vec::with_capacity(features.len());
    let mut attrs = Vec::with_capacity(features.len());

    for feature in features {
        let geometry = feature
            .get("geometry")
            .ok_or_else(|| anyhow!("feature missing \"geometry\""))?;
        let geom_type = geometry.get("type").and_then(Value::as_str);
        let coords = geometry
            .get("coordinates")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("feature geometry missing \"coordinates\""))?;

        let polygon = match geom_type {
            Some("Polygon") => parse_polygon(coords)?,
            other => return Err(anyhow!("unsupported geometry type {other:?}; only simply-connected Polygon features are supported")),
        };

        polygons.push(polygon);
        let properties = feature.get("properties").and_then(Value::as_object).cloned().unwrap_or_default();
        attrs.push(properties);
    }

    let mut dataset = Dataset::new(polygons, attrs, options).map_err(dataset_error)?;
    dataset.set_srs(srs);
    Ok(dataset)
}

/// Serialize a `Dataset` to a GeoJSON `FeatureCollection` string, using its
/// current (possibly simplified) geometry.
pub fn to_geojson_string(dataset: &Dataset<JsonAttrs>) -> Result<String> {
    let reassembled = dataset.reassemble().map_err(dataset_error)?;
    let attributes = dataset.attributes();

    let features: Vec<Value> = reassembled
        .into_iter()
        .map(|(feature, poly)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [ring_to_coords(poly.exterior())],
                },
                "properties": Value::Object(attributes[feature.0].clone()),
            })
        })
        .collect();

    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if let Some(srs) = dataset.srs() {
        collection["crs"] = srs.clone();
    }

    serde_json::to_string(&collection).context("failed to serialize GeoJSON")
}

fn dataset_error(err: Error) -> anyhow::Error {
    anyhow!(err.to_string())
}

fn ring_to_coords(ring: &LineString<f64>) -> Vec<Vec<f64>> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());
    for pair in coords {
        let pair = pair.as_array().ok_or_else(|| anyhow!("invalid coordinate pair"))?;
        let x = pair.first().and_then(Value::as_f64).ok_or_else(|| anyhow!("coordinate x must be a number"))?;
        let y = pair.get(1).and_then(Value::as_f64).ok_or_else(|| anyhow!("coordinate y must be a number"))?;
        points.push(Coord { x, y });
    }
    if !points.is_empty() && points.first() != points.last() {
        points.push(points[0]);
    }
    Ok(LineString::new(points))
}

fn parse_polygon(coords: &[Value]) -> Result<Polygon<f64>> {
    let exterior = coords.first().and_then(Value::as_array).ok_or_else(|| anyhow!("polygon missing exterior ring"))?;
    let exterior = parse_ring(exterior)?;
    if coords.len() > 1 {
        return Err(anyhow!("polygons with holes are not supported"));
    }
    Ok(Polygon::new(exterior, vec![]))
}
