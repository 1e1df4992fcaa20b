//! Black-box end-to-end scenarios exercising topology build, simplify,
//! reassemble, and GeoJSON round-trip together.

use linework::io::geojson;
use linework::Options;
use serde_json::json;

#[test]
fn load_simplify_save_round_trip_preserves_feature_count_and_attributes() {
    let input = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]],
                },
                "properties": { "name": "left" },
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[2.0, 0.0], [4.0, 0.0], [4.0, 2.0], [2.0, 2.0], [2.0, 0.0]]],
                },
                "properties": { "name": "right" },
            },
        ],
    })
    .to_string();

    let mut dataset = geojson::from_geojson_str(&input, Options::default()).unwrap();
    dataset.simplify(0.01).unwrap();

    let output = geojson::to_geojson_string(&dataset).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let features = parsed["features"].as_array().unwrap();

    assert_eq!(features.len(), 2);
    let names: Vec<&str> = features.iter().map(|f| f["properties"]["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"left"));
    assert!(names.contains(&"right"));

    // The collinear vertex at (1, 0) on the left feature should be gone.
    let left = features.iter().find(|f| f["properties"]["name"] == "left").unwrap();
    let ring = left["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 5); // 4 distinct vertices + ring closure.
}

#[test]
fn srs_is_carried_through_load_and_save_when_present() {
    let input = json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
            },
            "properties": {},
        }],
    })
    .to_string();

    let dataset = geojson::from_geojson_str(&input, Options::default()).unwrap();
    let output = geojson::to_geojson_string(&dataset).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["crs"]["properties"]["name"], "urn:ogc:def:crs:OGC:1.3:CRS84");
}
