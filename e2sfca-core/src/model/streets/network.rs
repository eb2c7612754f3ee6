//! Prepared street network with a spatial index over its nodes

use std::ops::Deref;

use geo::Point;
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::{StreetEdge, StreetNode};
use crate::{Error, OsmNodeId};

/// R-tree entry: node coordinates tagged with the graph index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Directed street multigraph, read-only once prepared.
///
/// Parallel edges between the same pair of nodes are allowed.
#[derive(Debug, Clone)]
pub struct StreetGraph {
    pub graph: DiGraph<StreetNode, StreetEdge>,
    rtree: RTree<IndexedPoint>,
    osm_index: HashMap<OsmNodeId, NodeIndex>,
}

impl StreetGraph {
    pub fn new(graph: DiGraph<StreetNode, StreetEdge>) -> Self {
        let rtree = build_rtree(&graph);
        let osm_index = graph
            .node_indices()
            .map(|idx| (graph[idx].id, idx))
            .collect();

        Self {
            graph,
            rtree,
            osm_index,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Graph index of the node with the given OSM id
    pub fn node_index(&self, id: OsmNodeId) -> Result<NodeIndex, Error> {
        self.osm_index
            .get(&id)
            .copied()
            .ok_or(Error::UnknownNode(id))
    }

    /// Nearest street node to a point, as (graph index, OSM id)
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<(NodeIndex, OsmNodeId)> {
        self.rtree
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|entry| (entry.data, self.graph[entry.data].id))
    }
}

impl Deref for StreetGraph {
    type Target = DiGraph<StreetNode, StreetEdge>;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

pub(crate) fn build_rtree(graph: &DiGraph<StreetNode, StreetEdge>) -> RTree<IndexedPoint> {
    let points = graph
        .node_indices()
        .map(|idx| {
            let node = &graph[idx];
            GeomWithData::new([node.geometry.x(), node.geometry.y()], idx)
        })
        .collect();

    RTree::bulk_load(points)
}
