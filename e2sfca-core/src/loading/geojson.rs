//! Location sets as `GeoJSON` feature collections.
//!
//! Numeric feature properties become location attributes. A numeric
//! `nearest_osm` property is read back as the resolved street node.

use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value as GeoJsonValue};
use serde_json::{Map, Value as JsonValue};

use crate::{Error, Location, LocationSet, OsmNodeId};

const NEAREST_OSM_PROPERTY: &str = "nearest_osm";

/// Reads a `GeoJSON` `FeatureCollection` file
pub fn read_locations(path: &Path) -> Result<LocationSet, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        ))
    })?;
    locations_from_geojson(&text)
}

/// Parses a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Invalid `GeoJSON`, and features without a geometry.
pub fn locations_from_geojson(text: &str) -> Result<LocationSet, Error> {
    let geojson: GeoJson = text.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| location_from_feature(index, feature))
        .collect::<Result<Vec<_>, _>>()
        .map(LocationSet::new)
}

fn location_from_feature(index: usize, feature: Feature) -> Result<Location, Error> {
    let geometry = feature
        .geometry
        .ok_or_else(|| Error::InvalidData(format!("Feature {index} has no geometry")))?;
    let mut location = Location::new(geo::Geometry::<f64>::try_from(geometry)?);

    for (key, value) in feature.properties.into_iter().flatten() {
        if key == NEAREST_OSM_PROPERTY {
            location.nearest_osm = nearest_osm_from_json(index, &value)?;
        } else if let Some(number) = value.as_f64() {
            location.attributes.insert(key, number);
        }
    }

    Ok(location)
}

/// Node ids written by pandas may come back as floats (`42.0`); integral
/// floats are accepted, `null` means unresolved.
fn nearest_osm_from_json(index: usize, value: &JsonValue) -> Result<Option<OsmNodeId>, Error> {
    if value.is_null() {
        return Ok(None);
    }
    if let Some(id) = value.as_i64() {
        return Ok(Some(id));
    }

    match value.as_f64() {
        Some(id) if id.fract() == 0.0 && id.abs() < i64::MAX as f64 => Ok(Some(id as i64)),
        _ => Err(Error::InvalidData(format!(
            "Feature {index} has a non-integer '{NEAREST_OSM_PROPERTY}' value: {value}"
        ))),
    }
}

/// Converts a location set, with all its attributes, to a `FeatureCollection`
pub fn locations_to_geojson(locations: &LocationSet) -> Result<FeatureCollection, Error> {
    let features = locations
        .iter()
        .map(location_to_feature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn location_to_feature(location: &Location) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&location.geometry));

    let mut keys: Vec<&String> = location.attributes.keys().collect();
    keys.sort();

    let mut properties = Map::new();
    for key in keys {
        properties.insert(key.clone(), JsonValue::from(location.attributes[key]));
    }
    if let Some(id) = location.nearest_osm {
        properties.insert(NEAREST_OSM_PROPERTY.to_string(), JsonValue::from(id));
    }

    let value = serde_json::json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    });

    Ok(serde_json::from_value::<Feature>(value).map_err(geojson::Error::from)?)
}

/// Writes a location set as a `GeoJSON` file
pub fn write_locations(path: &Path, locations: &LocationSet) -> Result<(), Error> {
    let collection = locations_to_geojson(locations)?;
    std::fs::write(path, GeoJson::from(collection).to_string())?;
    Ok(())
}
