use e2sfca_core::prelude::*;
use geo::Point;
use pyo3::prelude::*;
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};

use crate::to_py_err;

/// StreetNetwork
///
/// A prepared, read-only street network. Every edge carries its length in
/// meters, its resolved speed limit and its travel time in minutes.
///
/// Example:
///
/// .. code-block:: python
///
///     network = load_street_network("nodes.csv", "edges.csv")
///     network.nearest_node(-88.24, 40.11)
#[gen_stub_pyclass]
#[pyclass(name = "StreetNetwork")]
pub struct PyStreetNetwork {
    pub(crate) graph: StreetGraph,
}

#[gen_stub_pymethods]
#[pymethods]
impl PyStreetNetwork {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// OSM id of the street node closest to (x, y)
    pub fn nearest_node(&self, x: f64, y: f64) -> Option<OsmNodeId> {
        self.graph.nearest_node(&Point::new(x, y)).map(|(_, id)| id)
    }

    fn __repr__(&self) -> String {
        format!(
            "StreetNetwork with {} nodes and {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

/// Load and prepare a street network from osmnx-style CSV exports
///
/// Dead-end nodes and strongly connected components smaller than
/// ``min_component_size`` are removed before edge speeds and travel times
/// are computed.
///
/// Parameters
/// ----------
/// nodes_path : str
///     CSV file with ``osmid``, ``x`` and ``y`` columns
/// edges_path : str
///     CSV file with ``u``, ``v``, ``length``, ``maxspeed`` and ``highway``
///     columns
/// min_component_size : int, default=10
///     Smallest strongly connected component kept in the network
///
/// Returns
/// -------
/// StreetNetwork
///
/// Raises
/// ------
/// ValueError
///     If a node has no coordinates or an edge has no length
/// RuntimeError
///     If the files cannot be read
#[pyfunction(name = "load_street_network")]
#[pyo3(signature = (nodes_path, edges_path, min_component_size = 10))]
#[gen_stub_pyfunction]
pub fn py_load_street_network(
    py: Python<'_>,
    nodes_path: &str,
    edges_path: &str,
    min_component_size: usize,
) -> PyResult<PyStreetNetwork> {
    let config = NetworkConfig {
        nodes_path: std::path::PathBuf::from(nodes_path),
        edges_path: std::path::PathBuf::from(edges_path),
        min_component_size,
    };

    let graph = py
        .detach(|| load_street_network(&config))
        .map_err(|e| to_py_err("Failed to load street network", e))?;

    Ok(PyStreetNetwork { graph })
}
