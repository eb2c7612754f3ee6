//! Removal of network fragments that cannot take part in routing

use fixedbitset::FixedBitSet;
use log::info;
use petgraph::Direction;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::DiGraph;

/// Smallest strongly connected component kept by default
pub const DEFAULT_MIN_COMPONENT_SIZE: usize = 10;

/// Drops dead-end nodes (no outgoing edges), then every strongly connected
/// component with fewer than `min_component_size` nodes.
///
/// Such islands are unreachable from the rest of the network and would
/// otherwise collapse the catchments of locations snapped to them.
pub fn remove_fragments<N: Clone, E: Clone>(
    graph: &DiGraph<N, E>,
    min_component_size: usize,
) -> DiGraph<N, E> {
    let mut keep = FixedBitSet::with_capacity(graph.node_count());
    for node in graph.node_indices() {
        let has_outgoing = graph
            .neighbors_directed(node, Direction::Outgoing)
            .next()
            .is_some();
        keep.set(node.index(), has_outgoing);
    }
    let dead_ends = graph.node_count() - keep.count_ones(..);
    let pruned = retain_nodes(graph, &keep);

    let mut keep = FixedBitSet::with_capacity(pruned.node_count());
    let mut fragment_nodes = 0;
    for component in kosaraju_scc(&pruned) {
        let retained = component.len() >= min_component_size;
        if !retained {
            fragment_nodes += component.len();
        }
        for node in component {
            keep.set(node.index(), retained);
        }
    }
    let cleaned = retain_nodes(&pruned, &keep);

    info!(
        "Removed {dead_ends} dead-end nodes and {fragment_nodes} nodes in components smaller than \
         {min_component_size}; {} nodes remain",
        cleaned.node_count()
    );

    cleaned
}

fn retain_nodes<N: Clone, E: Clone>(graph: &DiGraph<N, E>, keep: &FixedBitSet) -> DiGraph<N, E> {
    graph.filter_map(
        |idx, node| keep.contains(idx.index()).then(|| node.clone()),
        |_, edge| Some(edge.clone()),
    )
}
