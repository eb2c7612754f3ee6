use geo::Point;
use log::info;
use petgraph::graph::DiGraph;

use super::cleanup::remove_fragments;
use super::config::NetworkConfig;
use super::csv::read_network_csv;
use super::speed::{MPH_TO_METERS_PER_MINUTE, resolve_speed};
use crate::model::{StreetEdge, StreetNode};
use crate::{Error, OsmNodeId, StreetGraph};

/// Node as delivered by the network provider
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub id: OsmNodeId,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Edge as delivered by the network provider, tags still unparsed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawEdge {
    pub length: Option<f64>,
    pub maxspeed: Option<String>,
    pub highway: Option<String>,
}

/// Unprepared street multigraph
pub type RawStreetNetwork = DiGraph<RawNode, RawEdge>;

/// Loads, cleans and prepares a street network from CSV exports
///
/// # Errors
///
/// Returns an error if the files cannot be read or contain malformed data
pub fn load_street_network(config: &NetworkConfig) -> Result<StreetGraph, Error> {
    validate_config(config)?;

    info!(
        "Reading street network: {} / {}",
        config.nodes_path.display(),
        config.edges_path.display()
    );
    let raw = read_network_csv(&config.nodes_path, &config.edges_path)?;
    let raw = remove_fragments(&raw, config.min_component_size);

    prepare_network(raw)
}

fn validate_config(config: &NetworkConfig) -> Result<(), Error> {
    for path in [&config.nodes_path, &config.edges_path] {
        if !path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Network file not found: {}", path.display()),
            )));
        }
    }

    Ok(())
}

/// Annotates every edge with speed and travel time and every node with a
/// point geometry.
///
/// Speed comes from the `maxspeed` tag when it has a leading number, else
/// from the `highway` class table. Times are in minutes.
///
/// # Errors
///
/// `MissingCoordinates` / `MissingLength` for incomplete records,
/// `InvalidSpeed` for a zero or negative tagged speed and `InvalidData`
/// for a non-positive length.
pub fn prepare_network(raw: RawStreetNetwork) -> Result<StreetGraph, Error> {
    let mut graph = DiGraph::with_capacity(raw.node_count(), raw.edge_count());

    for node in raw.node_weights() {
        let (Some(x), Some(y)) = (node.x, node.y) else {
            return Err(Error::MissingCoordinates(node.id));
        };
        graph.add_node(StreetNode {
            id: node.id,
            geometry: Point::new(x, y),
        });
    }

    for edge in raw.raw_edges() {
        let (source, target) = (edge.source(), edge.target());
        let (from, to) = (raw[source].id, raw[target].id);
        let street_edge = prepare_edge(&edge.weight, from, to)?;
        // node indices are preserved: nodes were added in the same order
        graph.add_edge(source, target, street_edge);
    }

    info!(
        "Prepared street network with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(StreetGraph::new(graph))
}

fn prepare_edge(edge: &RawEdge, from: OsmNodeId, to: OsmNodeId) -> Result<StreetEdge, Error> {
    let length = edge.length.ok_or(Error::MissingLength(from, to))?;
    if !(length.is_finite() && length > 0.0) {
        return Err(Error::InvalidData(format!(
            "Edge {from} -> {to} has non-positive length {length}"
        )));
    }

    let maxspeed = resolve_speed(edge.maxspeed.as_deref(), edge.highway.as_deref());
    if !(maxspeed.is_finite() && maxspeed > 0.0) {
        return Err(Error::InvalidSpeed {
            from,
            to,
            speed: maxspeed,
        });
    }

    let maxspeed_meters = maxspeed * MPH_TO_METERS_PER_MINUTE;

    Ok(StreetEdge {
        length,
        maxspeed,
        maxspeed_meters,
        time: length / maxspeed_meters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_node(id: OsmNodeId, x: f64, y: f64) -> RawNode {
        RawNode {
            id,
            x: Some(x),
            y: Some(y),
        }
    }

    fn raw_edge(length: f64, maxspeed: Option<&str>, highway: Option<&str>) -> RawEdge {
        RawEdge {
            length: Some(length),
            maxspeed: maxspeed.map(String::from),
            highway: highway.map(String::from),
        }
    }

    #[test]
    fn test_prepare_computes_speed_and_time() {
        let mut raw = RawStreetNetwork::new();
        let a = raw.add_node(raw_node(1, 0.0, 0.0));
        let b = raw.add_node(raw_node(2, 1.0, 0.0));
        raw.add_edge(a, b, raw_edge(804.669, Some("30 mph"), Some("primary")));
        raw.add_edge(b, a, raw_edge(536.446, None, Some("residential")));

        let graph = prepare_network(raw).unwrap();
        let edges: Vec<&StreetEdge> = graph.edge_weights().collect();

        assert_eq!(edges[0].maxspeed, 30.0);
        assert!((edges[0].maxspeed_meters - 804.669).abs() < 1e-9);
        assert!((edges[0].time - 1.0).abs() < 1e-9);

        assert_eq!(edges[1].maxspeed, 20.0);
        assert!((edges[1].time - 1.0).abs() < 1e-9);

        assert_eq!(graph[a].geometry, Point::new(0.0, 0.0));
        assert_eq!(graph.node_index(2).unwrap(), b);
    }

    #[test]
    fn test_missing_length_is_fatal() {
        let mut raw = RawStreetNetwork::new();
        let a = raw.add_node(raw_node(1, 0.0, 0.0));
        let b = raw.add_node(raw_node(2, 1.0, 0.0));
        raw.add_edge(a, b, RawEdge::default());

        assert!(matches!(
            prepare_network(raw),
            Err(Error::MissingLength(1, 2))
        ));
    }

    #[test]
    fn test_missing_coordinates_is_fatal() {
        let mut raw = RawStreetNetwork::new();
        raw.add_node(RawNode {
            id: 7,
            x: Some(1.0),
            y: None,
        });

        assert!(matches!(
            prepare_network(raw),
            Err(Error::MissingCoordinates(7))
        ));
    }

    #[test]
    fn test_zero_speed_is_fatal() {
        let mut raw = RawStreetNetwork::new();
        let a = raw.add_node(raw_node(1, 0.0, 0.0));
        let b = raw.add_node(raw_node(2, 1.0, 0.0));
        raw.add_edge(a, b, raw_edge(10.0, Some("0"), None));

        assert!(matches!(
            prepare_network(raw),
            Err(Error::InvalidSpeed { from: 1, to: 2, .. })
        ));
    }
}
