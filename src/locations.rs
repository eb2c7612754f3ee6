use std::collections::HashMap;
use std::path::Path;

use e2sfca_core::loading::geojson::{locations_from_geojson, locations_to_geojson};
use e2sfca_core::prelude::*;
use geo::Geometry;
use pyo3::prelude::*;
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};
use wkt::{ToWkt, TryFromWkt};

use crate::model::PyStreetNetwork;
use crate::to_py_err;

/// LocationSet
///
/// An ordered collection of supply or demand locations. Each location has
/// a point or area geometry, numeric attributes and, once resolved, the
/// OSM id of its nearest street node. Sets are never modified in place:
/// every operation returns a new set.
///
/// Example:
///
/// .. code-block:: python
///
///     clinics = LocationSet(["POINT (0 0)", "POINT (1 1)"], {"beds": [10, 20]})
///     clinics = clinics.resolve_nearest_nodes(network)
#[gen_stub_pyclass]
#[pyclass(name = "LocationSet")]
pub struct PyLocationSet {
    pub(crate) inner: LocationSet,
}

#[gen_stub_pymethods]
#[pymethods]
impl PyLocationSet {
    #[new]
    #[pyo3(signature = (geometries, attributes, nearest_osm = None))]
    pub fn new(
        geometries: Vec<String>,
        attributes: HashMap<String, Vec<f64>>,
        nearest_osm: Option<Vec<OsmNodeId>>,
    ) -> PyResult<Self> {
        for (name, values) in &attributes {
            if values.len() != geometries.len() {
                return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                    "Attribute '{name}' has {} values for {} geometries",
                    values.len(),
                    geometries.len()
                )));
            }
        }
        if let Some(ids) = &nearest_osm
            && ids.len() != geometries.len()
        {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Got {} nearest nodes for {} geometries",
                ids.len(),
                geometries.len()
            )));
        }

        let mut records = Vec::with_capacity(geometries.len());
        for (index, text) in geometries.iter().enumerate() {
            let geometry = Geometry::<f64>::try_from_wkt_str(text).map_err(|e| {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                    "Invalid WKT geometry at index {index}: {e}"
                ))
            })?;

            let mut location = Location::new(geometry);
            for (name, values) in &attributes {
                location = location.with_attribute(name, values[index]);
            }
            if let Some(ids) = &nearest_osm {
                location = location.with_nearest_osm(ids[index]);
            }
            records.push(location);
        }

        Ok(Self {
            inner: LocationSet::new(records),
        })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!("LocationSet with {} locations", self.inner.len())
    }

    /// Geometries as WKT strings, in record order
    pub fn geometries(&self) -> Vec<String> {
        self.inner
            .iter()
            .map(|record| record.geometry.to_wkt().to_string())
            .collect()
    }

    /// Values of a numeric attribute, in record order
    ///
    /// Raises
    /// ------
    /// ValueError
    ///     If any record lacks the attribute
    pub fn attribute(&self, name: &str) -> PyResult<Vec<f64>> {
        self.inner
            .attribute_values(name)
            .map_err(|e| to_py_err("Failed to read attribute", e))
    }

    /// OSM ids of the nearest street nodes, ``None`` where unresolved
    pub fn nearest_osm(&self) -> Vec<Option<OsmNodeId>> {
        self.inner.iter().map(|record| record.nearest_osm).collect()
    }

    /// Snaps every location (its centroid for areas) to the nearest node
    /// of ``network`` and returns the resolved copy
    pub fn resolve_nearest_nodes(
        &self,
        py: Python<'_>,
        network: &PyStreetNetwork,
    ) -> PyResult<Self> {
        let inner = py
            .detach(|| self.inner.clone().resolve_nearest_nodes(&network.graph))
            .map_err(|e| to_py_err("Failed to resolve nearest nodes", e))?;
        Ok(Self { inner })
    }

    /// Places with a ``rating`` above ``min_rating`` and more than
    /// ``min_reviews`` in ``user_ratings_total``
    pub fn filter_rated(&self, min_rating: f64, min_reviews: f64) -> Self {
        Self {
            inner: self.inner.filter_rated(min_rating, min_reviews),
        }
    }

    /// The set as a GeoJSON FeatureCollection string
    pub fn to_geojson(&self) -> PyResult<String> {
        let collection = locations_to_geojson(&self.inner)
            .map_err(|e| to_py_err("Failed to convert locations to GeoJSON", e))?;
        Ok(geojson::GeoJson::from(collection).to_string())
    }

    /// Parses a GeoJSON FeatureCollection string
    #[staticmethod]
    pub fn from_geojson(text: &str) -> PyResult<Self> {
        let inner =
            locations_from_geojson(text).map_err(|e| to_py_err("Failed to parse GeoJSON", e))?;
        Ok(Self { inner })
    }
}

/// Read a GeoJSON FeatureCollection file into a LocationSet
///
/// Numeric feature properties become attributes; a ``nearest_osm``
/// property is kept as the resolved street node.
#[pyfunction]
#[gen_stub_pyfunction]
pub fn read_locations(path: &str) -> PyResult<PyLocationSet> {
    let inner = e2sfca_core::loading::geojson::read_locations(Path::new(path))
        .map_err(|e| to_py_err("Failed to read locations", e))?;
    Ok(PyLocationSet { inner })
}
