#![allow(dead_code)]

use e2sfca_core::loading::{RawEdge, RawNode, RawStreetNetwork, prepare_network};
use e2sfca_core::prelude::*;
use petgraph::graph::NodeIndex;

/// Travel time of one unit-length edge at 30 mph, in minutes
pub fn unit_edge_time() -> f64 {
    1.0 / (30.0 * 26.8223)
}

fn add_two_way(raw: &mut RawStreetNetwork, a: usize, b: usize, length: f64, maxspeed: &str) {
    let (a, b) = (NodeIndex::new(a), NodeIndex::new(b));
    for (from, to) in [(a, b), (b, a)] {
        raw.add_edge(
            from,
            to,
            RawEdge {
                length: Some(length),
                maxspeed: Some(maxspeed.to_string()),
                highway: Some("residential".to_string()),
            },
        );
    }
}

/// Five nodes at (0, 0) .. (4, 0) joined in a path 0-1-2-3-4 by two-way,
/// unit-length, 30 mph edges
pub fn line_network() -> StreetGraph {
    let mut raw = RawStreetNetwork::new();
    for id in 0..5 {
        raw.add_node(RawNode {
            id: id as OsmNodeId,
            x: Some(id as f64),
            y: Some(0.0),
        });
    }
    for i in 0..4 {
        add_two_way(&mut raw, i, i + 1, 1.0, "30");
    }
    prepare_network(raw).unwrap()
}

/// `size` x `size` grid of two-way 100 m streets, one coordinate unit
/// apart. Node ids are `row * size + col`.
pub fn grid_network(size: usize) -> StreetGraph {
    let mut raw = RawStreetNetwork::new();
    for row in 0..size {
        for col in 0..size {
            raw.add_node(RawNode {
                id: (row * size + col) as OsmNodeId,
                x: Some(col as f64),
                y: Some(row as f64),
            });
        }
    }
    for row in 0..size {
        for col in 0..size {
            let id = row * size + col;
            if col + 1 < size {
                add_two_way(&mut raw, id, id + 1, 100.0, "25 mph");
            }
            if row + 1 < size {
                add_two_way(&mut raw, id, id + size, 100.0, "25 mph");
            }
        }
    }
    prepare_network(raw).unwrap()
}

/// Point location sitting on street node `id`, already snapped to it
pub fn location_at(graph: &StreetGraph, id: OsmNodeId, attribute: &str, value: f64) -> Location {
    let node = graph.node_index(id).unwrap();
    Location::new(graph[node].geometry)
        .with_attribute(attribute, value)
        .with_nearest_osm(id)
}
