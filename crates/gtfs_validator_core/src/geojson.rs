use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use crate::feed::LOCATIONS_GEOJSON_FILE;
use crate::{NoticeSeverity, ValidationNotice};

/// Raw deserialized `locations.geojson`. Only the shape we need from the
/// FeatureCollection is modeled; unrecognized members are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoJsonFeatureCollection {
    #[serde(default)]
    pub features: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Indices over `locations.geojson`, built once at feed-load time so
/// validators (`location_id_foreign_key`, `location_has_stop_times`, ...)
/// can answer membership/lookup questions without re-parsing the document.
#[derive(Debug, Clone, Default)]
pub struct LocationsGeoJson {
    pub location_ids: HashSet<String>,
    pub bounds_by_id: HashMap<String, GeoJsonBounds>,
    pub feature_index_by_id: HashMap<String, usize>,
    pub notices: Vec<ValidationNotice>,
}

impl LocationsGeoJson {
    pub fn malformed_json(message: String) -> Self {
        let mut notice = ValidationNotice::new(
            "malformed_json",
            NoticeSeverity::Error,
            message.clone(),
        );
        notice.file = Some(LOCATIONS_GEOJSON_FILE.to_string());
        notice.insert_context_field("filename", LOCATIONS_GEOJSON_FILE);
        notice.insert_context_field("message", message);
        Self {
            notices: vec![notice],
            ..Default::default()
        }
    }
}

impl From<GeoJsonFeatureCollection> for LocationsGeoJson {
    fn from(collection: GeoJsonFeatureCollection) -> Self {
        let mut location_ids = HashSet::new();
        let mut bounds_by_id = HashMap::new();
        let mut feature_index_by_id = HashMap::new();
        let mut notices = Vec::new();

        for (index, feature) in collection.features.iter().enumerate() {
            let id = feature_id(feature);
            let Some(id) = id else {
                let mut notice = ValidationNotice::new(
                    "geo_json_missing_id",
                    NoticeSeverity::Warning,
                    "geojson feature is missing an id",
                );
                notice.insert_context_field("featureIndex", index as u64);
                notices.push(notice);
                continue;
            };

            if !location_ids.insert(id.clone()) {
                let mut notice = ValidationNotice::new(
                    "duplicate_location_id",
                    NoticeSeverity::Error,
                    "duplicate id across geojson features",
                );
                notice.insert_context_field("locationId", id);
                notices.push(notice);
                continue;
            }

            if let Some(bounds) = feature
                .get("geometry")
                .and_then(|geometry| compute_bounds(geometry))
            {
                bounds_by_id.insert(id.clone(), bounds);
            }
            feature_index_by_id.insert(id, index);
        }

        Self {
            location_ids,
            bounds_by_id,
            feature_index_by_id,
            notices,
        }
    }
}

fn feature_id(feature: &Value) -> Option<String> {
    match feature.get("id")? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn compute_bounds(geometry: &Value) -> Option<GeoJsonBounds> {
    let mut bounds = GeoJsonBounds {
        min_lat: f64::INFINITY,
        min_lon: f64::INFINITY,
        max_lat: f64::NEG_INFINITY,
        max_lon: f64::NEG_INFINITY,
    };
    let mut found = false;
    walk_coordinates(geometry.get("coordinates")?, &mut bounds, &mut found);
    found.then_some(bounds)
}

fn walk_coordinates(value: &Value, bounds: &mut GeoJsonBounds, found: &mut bool) {
    match value {
        Value::Array(items) => {
            if let [Value::Number(lon), Value::Number(lat), ..] = items.as_slice() {
                if let (Some(lon), Some(lat)) = (lon.as_f64(), lat.as_f64()) {
                    bounds.min_lon = bounds.min_lon.min(lon);
                    bounds.max_lon = bounds.max_lon.max(lon);
                    bounds.min_lat = bounds.min_lat.min(lat);
                    bounds.max_lat = bounds.max_lat.max(lat);
                    *found = true;
                    return;
                }
            }
            for item in items {
                walk_coordinates(item, bounds, found);
            }
        }
        _ => {}
    }
}
