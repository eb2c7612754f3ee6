use thiserror::Error;

use crate::OsmNodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No nearby points found for snapping")]
    NoPointsFound,
    #[error("Edge {0} -> {1} has no length")]
    MissingLength(OsmNodeId, OsmNodeId),
    #[error("Node {0} has no coordinates")]
    MissingCoordinates(OsmNodeId),
    #[error("Edge {from} -> {to} has non-positive speed {speed}")]
    InvalidSpeed {
        from: OsmNodeId,
        to: OsmNodeId,
        speed: f64,
    },
    #[error("Location {0} has no nearest network node, resolve nearest nodes first")]
    MissingNearestNode(usize),
    #[error("Node {0} is not part of the street network")]
    UnknownNode(OsmNodeId),
    #[error("Location {index} has no attribute '{attribute}'")]
    MissingAttribute { index: usize, attribute: String },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(#[from] geojson::Error),
}
