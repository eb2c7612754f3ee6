//! Street network import from osmnx-style CSV exports

use std::fs::File;
use std::io::Read;
use std::path::Path;

use hashbrown::HashMap;
use serde::Deserialize;

use super::builder::{RawEdge, RawNode, RawStreetNetwork};
use crate::{Error, OsmNodeId};

#[derive(Debug, Deserialize)]
struct NodeRecord {
    osmid: OsmNodeId,
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    u: OsmNodeId,
    v: OsmNodeId,
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    maxspeed: Option<String>,
    #[serde(default)]
    highway: Option<String>,
}

fn open(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        ))
    })
}

/// Reads `nodes.csv` and `edges.csv` into an unprepared network
pub fn read_network_csv(nodes_path: &Path, edges_path: &Path) -> Result<RawStreetNetwork, Error> {
    read_network(open(nodes_path)?, open(edges_path)?)
}

/// Reads node and edge tables from any reader.
///
/// # Errors
///
/// Malformed rows and edges that reference unknown nodes are errors.
pub fn read_network<N: Read, E: Read>(nodes: N, edges: E) -> Result<RawStreetNetwork, Error> {
    let mut graph = RawStreetNetwork::new();
    let mut index = HashMap::new();

    for record in csv::Reader::from_reader(nodes).deserialize() {
        let record: NodeRecord = record?;
        let idx = graph.add_node(RawNode {
            id: record.osmid,
            x: record.x,
            y: record.y,
        });
        if index.insert(record.osmid, idx).is_some() {
            return Err(Error::InvalidData(format!(
                "Duplicate node id {}",
                record.osmid
            )));
        }
    }

    for record in csv::Reader::from_reader(edges).deserialize() {
        let record: EdgeRecord = record?;
        let source = *index.get(&record.u).ok_or(Error::UnknownNode(record.u))?;
        let target = *index.get(&record.v).ok_or(Error::UnknownNode(record.v))?;
        graph.add_edge(
            source,
            target,
            RawEdge {
                length: record.length,
                maxspeed: record.maxspeed.filter(|tag| !tag.trim().is_empty()),
                highway: record.highway.filter(|tag| !tag.trim().is_empty()),
            },
        );
    }

    Ok(graph)
}
