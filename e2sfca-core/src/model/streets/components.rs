//! Street network components - nodes and edges of a prepared network

use geo::Point;

use crate::config::CostAttribute;
use crate::{Cost, OsmNodeId};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// OSM ID of the node
    pub id: OsmNodeId,
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Street graph edge (street segment)
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// Segment length in meters
    pub length: f64,
    /// Resolved speed limit in mph
    pub maxspeed: f64,
    /// Speed converted to meters per minute
    pub maxspeed_meters: f64,
    /// Traversal time in minutes
    pub time: f64,
}

impl StreetEdge {
    pub fn cost(&self, attribute: CostAttribute) -> Cost {
        match attribute {
            CostAttribute::Time => self.time,
            CostAttribute::Length => self.length,
        }
    }
}
