//! Catchment areas: nested convex hulls of Dijkstra reachability sets,
//! split into disjoint bands.

use geo::{Area, BooleanOps, ConvexHull, Geometry, LineString, MultiPoint, MultiPolygon};
use itertools::{Itertools, MinMaxResult};
use log::debug;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use crate::config::{CostAttribute, validate_thresholds};
use crate::model::catchment::{AREA_EPSILON, without_slivers};
use crate::routing::dijkstra_path_weights;
use crate::{CatchmentBand, Cost, Error, LocationSet, StreetGraph};

/// Builds one band per threshold around `source`.
///
/// The first band is the full hull of its threshold; every later band is
/// its hull minus the union of all smaller hulls. A band that reaches no
/// new street node, or whose hull collapses to the source's position, is
/// empty.
///
/// # Errors
///
/// Returns `InvalidData` if the thresholds are not finite, non-negative
/// and ascending.
pub fn build_catchment(
    graph: &StreetGraph,
    source: NodeIndex,
    thresholds: &[Cost],
    cost: CostAttribute,
) -> Result<Vec<CatchmentBand>, Error> {
    validate_thresholds(thresholds)?;
    Ok(catchment_bands(graph, source, thresholds, cost))
}

/// Same as [`build_catchment`], addressing the source by its OSM id
pub fn build_catchment_from_osm(
    graph: &StreetGraph,
    source: crate::OsmNodeId,
    thresholds: &[Cost],
    cost: CostAttribute,
) -> Result<Vec<CatchmentBand>, Error> {
    build_catchment(graph, graph.node_index(source)?, thresholds, cost)
}

/// Band construction for already validated thresholds
pub(crate) fn catchment_bands(
    graph: &StreetGraph,
    source: NodeIndex,
    thresholds: &[Cost],
    cost: CostAttribute,
) -> Vec<CatchmentBand> {
    let Some(&max_threshold) = thresholds.last() else {
        return Vec::new();
    };

    // One search to the largest cutoff, sliced per threshold
    let reached = dijkstra_path_weights(graph, source, Some(max_threshold), cost);

    let mut bands = Vec::with_capacity(thresholds.len());
    let mut covered = MultiPolygon::new(Vec::new());
    let mut previous_nodes = 0;

    for &threshold in thresholds {
        let nodes: Vec<NodeIndex> = reached
            .iter()
            .filter(|&(_, &node_cost)| node_cost <= threshold)
            .map(|(&node, _)| node)
            .collect();
        let new_nodes = nodes.len().saturating_sub(previous_nodes);
        previous_nodes = nodes.len();

        let reach = reachable_hull(graph, &nodes);
        let hull = match &reach {
            Some(Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon.clone()]),
            _ => MultiPolygon::new(Vec::new()),
        };

        let area = if hull.0.is_empty() || covered.0.is_empty() {
            hull.clone()
        } else {
            without_slivers(hull.difference(&covered))
        };

        if !hull.0.is_empty() {
            covered = if covered.0.is_empty() {
                hull
            } else {
                covered.union(&hull)
            };
        }

        let band = CatchmentBand {
            threshold,
            area,
            reach,
            new_nodes,
        };
        if band.is_empty() {
            debug!("Catchment band {threshold} around node {source:?} is empty");
        }
        bands.push(band);
    }

    bands
}

/// Convex hull of the given nodes. Collinear nodes give the segment
/// between the two outermost ones; `None` when all nodes coincide.
fn reachable_hull(graph: &StreetGraph, nodes: &[NodeIndex]) -> Option<Geometry<f64>> {
    let points: MultiPoint<f64> = nodes.iter().map(|&node| graph.graph[node].geometry).collect();

    if points.0.len() >= 3 {
        let hull = points.convex_hull();
        if hull.unsigned_area() > AREA_EPSILON {
            return Some(Geometry::Polygon(hull));
        }
    }

    match points
        .iter()
        .minmax_by(|a, b| a.x().total_cmp(&b.x()).then(a.y().total_cmp(&b.y())))
    {
        MinMaxResult::MinMax(start, end) if start != end => {
            Some(Geometry::LineString(LineString::from(vec![*start, *end])))
        }
        _ => None,
    }
}

/// Single-cutoff catchment of one node: the convex hull of every node
/// reachable within `threshold`
pub fn service_area(
    graph: &StreetGraph,
    source: NodeIndex,
    threshold: Cost,
    cost: CostAttribute,
) -> Result<Option<Geometry<f64>>, Error> {
    validate_thresholds(&[threshold])?;
    let reached = dijkstra_path_weights(graph, source, Some(threshold), cost);
    let nodes: Vec<NodeIndex> = reached.into_keys().collect();
    Ok(reachable_hull(graph, &nodes))
}

/// Service area of every location, in record order
///
/// # Errors
///
/// Fails if any location has no resolved nearest node.
pub fn service_areas(
    graph: &StreetGraph,
    locations: &LocationSet,
    threshold: Cost,
    cost: CostAttribute,
) -> Result<Vec<Option<Geometry<f64>>>, Error> {
    validate_thresholds(&[threshold])?;
    let sources = locations.source_nodes(graph)?;

    sources
        .par_iter()
        .map(|&source| service_area(graph, source, threshold, cost))
        .collect()
}
