use e2sfca_core::prelude::*;
use geo::{Geometry, MultiPolygon};
use pyo3::prelude::*;
use pyo3_stub_gen::derive::gen_stub_pyfunction;
use wkt::{ToWkt, TryFromWkt};

use crate::locations::PyLocationSet;
use crate::model::PyStreetNetwork;
use crate::to_py_err;

pub(crate) fn parse_cost(cost: &str) -> PyResult<CostAttribute> {
    cost.parse::<CostAttribute>()
        .map_err(|e| to_py_err("Invalid cost attribute", e))
}

fn multipolygon_wkt(area: &MultiPolygon<f64>) -> String {
    area.to_wkt().to_string()
}

fn geometry_wkt(geometry: &Geometry<f64>) -> String {
    geometry.to_wkt().to_string()
}

/// Build the banded catchment of one street node
///
/// Parameters
/// ----------
/// network : StreetNetwork
/// source_osm : int
///     OSM id of the start node
/// thresholds : list[float]
///     Ascending cost cutoffs
/// cost : str, default="time"
///     ``"time"`` (minutes) or ``"length"`` (meters)
///
/// Returns
/// -------
/// list[tuple[float, str, str | None]]
///     ``(threshold, band, reach)`` per band. ``band`` is a WKT
///     MultiPolygon: the full hull for the first band, the hull minus all
///     smaller hulls for later ones, empty when the nodes are collinear.
///     ``reach`` is the cumulative hull as WKT (a LineString for collinear
///     nodes), ``None`` when only the source is reached.
#[pyfunction]
#[pyo3(signature = (network, source_osm, thresholds, cost = "time"))]
#[gen_stub_pyfunction]
pub fn build_catchment(
    py: Python<'_>,
    network: &PyStreetNetwork,
    source_osm: OsmNodeId,
    thresholds: Vec<f64>,
    cost: &str,
) -> PyResult<Vec<(f64, String, Option<String>)>> {
    let cost = parse_cost(cost)?;
    let bands = py
        .detach(|| build_catchment_from_osm(&network.graph, source_osm, &thresholds, cost))
        .map_err(|e| to_py_err("Failed to build catchment", e))?;

    Ok(bands
        .iter()
        .map(|band| {
            (
                band.threshold,
                multipolygon_wkt(&band.area),
                band.reach.as_ref().map(geometry_wkt),
            )
        })
        .collect())
}

/// Service area of every location: the convex hull of the street nodes
/// reachable from its nearest node within ``threshold``
///
/// Returns WKT geometries in record order: a Polygon, a LineString when
/// the reached nodes are collinear, or ``None`` when nothing is reached.
#[pyfunction]
#[pyo3(signature = (network, locations, threshold, cost = "length"))]
#[gen_stub_pyfunction]
pub fn service_areas(
    py: Python<'_>,
    network: &PyStreetNetwork,
    locations: &PyLocationSet,
    threshold: f64,
    cost: &str,
) -> PyResult<Vec<Option<String>>> {
    let cost = parse_cost(cost)?;
    let areas = py
        .detach(|| {
            e2sfca_core::prelude::service_areas(&network.graph, &locations.inner, threshold, cost)
        })
        .map_err(|e| to_py_err("Failed to build service areas", e))?;

    Ok(areas
        .iter()
        .map(|area| area.as_ref().map(geometry_wkt))
        .collect())
}

/// Sum of ``attribute`` over the locations inside a polygon
///
/// With ``use_centroid`` each location is represented by its point or
/// centroid; otherwise the whole geometry must lie inside the polygon.
#[pyfunction]
#[pyo3(signature = (locations, attribute, polygon, use_centroid = true))]
#[gen_stub_pyfunction]
pub fn sum_attribute_within(
    locations: &PyLocationSet,
    attribute: &str,
    polygon: &str,
    use_centroid: bool,
) -> PyResult<f64> {
    let polygon = MultiPolygon::<f64>::try_from_wkt_str(polygon).map_err(|e| {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "Failed to parse polygon WKT: {e}"
        ))
    })?;

    e2sfca_core::prelude::sum_attribute_within(&locations.inner, attribute, &polygon, use_centroid)
        .map_err(|e| to_py_err("Failed to sum attribute", e))
}
