use e2sfca_core::Error;
use pyo3::prelude::*;
use pyo3_stub_gen::define_stub_info_gatherer;

use accessibility::{
    compute_step1, compute_step2, compute_two_step_step1, compute_two_step_step2,
};
use catchment::{build_catchment, service_areas, sum_attribute_within};
use locations::{PyLocationSet, read_locations};
use model::{PyStreetNetwork, py_load_street_network};

pub mod accessibility;
pub mod catchment;
pub mod locations;
pub mod model;

/// A Python module implemented in Rust.
#[pymodule]
fn e2sfca(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyStreetNetwork>()?;
    m.add_function(wrap_pyfunction!(py_load_street_network, m)?)?;

    m.add_class::<PyLocationSet>()?;
    m.add_function(wrap_pyfunction!(read_locations, m)?)?;

    m.add_function(wrap_pyfunction!(build_catchment, m)?)?;
    m.add_function(wrap_pyfunction!(service_areas, m)?)?;
    m.add_function(wrap_pyfunction!(sum_attribute_within, m)?)?;

    m.add_function(wrap_pyfunction!(compute_step1, m)?)?;
    m.add_function(wrap_pyfunction!(compute_step2, m)?)?;
    m.add_function(wrap_pyfunction!(compute_two_step_step1, m)?)?;
    m.add_function(wrap_pyfunction!(compute_two_step_step2, m)?)?;
    Ok(())
}

/// Data problems surface as `ValueError`, everything else as `RuntimeError`
pub(crate) fn to_py_err(context: &str, error: Error) -> PyErr {
    match error {
        Error::IoError(_) | Error::CsvError(_) | Error::GeoJsonError(_) => {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("{context}: {error}"))
        }
        _ => PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("{context}: {error}")),
    }
}

define_stub_info_gatherer!(stub_info);
