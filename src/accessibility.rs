use e2sfca_core::prelude::*;
use pyo3::prelude::*;
use pyo3_stub_gen::derive::gen_stub_pyfunction;

use crate::catchment::parse_cost;
use crate::locations::PyLocationSet;
use crate::model::PyStreetNetwork;
use crate::to_py_err;

/// Pairs thresholds with the weights given in the same order
fn catchment_config(thresholds: &[f64], weights: &[f64], cost: &str) -> PyResult<CatchmentConfig> {
    if thresholds.len() != weights.len() {
        return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "Got {} weights for {} thresholds",
            weights.len(),
            thresholds.len()
        )));
    }

    let pairs: Vec<(f64, f64)> = thresholds.iter().copied().zip(weights.iter().copied()).collect();
    CatchmentConfig::new(thresholds, &pairs, parse_cost(cost)?)
        .map_err(|e| to_py_err("Invalid catchment configuration", e))
}

fn two_step_config(threshold: f64, cost: &str) -> PyResult<TwoStepConfig> {
    TwoStepConfig::new(threshold, parse_cost(cost)?)
        .map_err(|e| to_py_err("Invalid catchment configuration", e))
}

/// E2SFCA step 1: supply-to-demand ratio of every supply location
///
/// Parameters
/// ----------
/// supply : LocationSet
///     Supply with resolved nearest nodes
/// supply_attr : str
///     Capacity attribute of the supply
/// demand : LocationSet
/// demand_attr : str
///     Population attribute of the demand
/// network : StreetNetwork
/// thresholds : list[float]
///     Ascending catchment cutoffs
/// weights : list[float]
///     Decay weight of each threshold, non-increasing, in (0, 1]
/// cost : str, default="time"
///
/// Returns
/// -------
/// LocationSet
///     Copy of ``supply`` with a ``ratio`` attribute (capacity per 100,000
///     weighted demand; 0 where no demand is reached)
#[pyfunction]
#[pyo3(signature = (supply, supply_attr, demand, demand_attr, network, thresholds, weights, cost = "time"))]
#[gen_stub_pyfunction]
#[allow(clippy::too_many_arguments)]
pub fn compute_step1(
    py: Python<'_>,
    supply: &PyLocationSet,
    supply_attr: &str,
    demand: &PyLocationSet,
    demand_attr: &str,
    network: &PyStreetNetwork,
    thresholds: Vec<f64>,
    weights: Vec<f64>,
    cost: &str,
) -> PyResult<PyLocationSet> {
    let config = catchment_config(&thresholds, &weights, cost)?;
    let inner = py
        .detach(|| {
            e2sfca_core::prelude::compute_step1(
                &supply.inner,
                supply_attr,
                &demand.inner,
                demand_attr,
                &network.graph,
                &config,
            )
        })
        .map_err(|e| to_py_err("E2SFCA step 1 failed", e))?;

    Ok(PyLocationSet { inner })
}

/// E2SFCA step 2: accessibility of every demand location
///
/// ``step1`` is the output of ``compute_step1``. Returns a copy of
/// ``demand`` with an ``access`` attribute.
#[pyfunction]
#[pyo3(signature = (step1, demand, network, thresholds, weights, cost = "time"))]
#[gen_stub_pyfunction]
pub fn compute_step2(
    py: Python<'_>,
    step1: &PyLocationSet,
    demand: &PyLocationSet,
    network: &PyStreetNetwork,
    thresholds: Vec<f64>,
    weights: Vec<f64>,
    cost: &str,
) -> PyResult<PyLocationSet> {
    let config = catchment_config(&thresholds, &weights, cost)?;
    let inner = py
        .detach(|| {
            e2sfca_core::prelude::compute_step2(
                &step1.inner,
                &demand.inner,
                &network.graph,
                &config,
            )
        })
        .map_err(|e| to_py_err("E2SFCA step 2 failed", e))?;

    Ok(PyLocationSet { inner })
}

/// 2SFCA step 1 with a single catchment cutoff and no distance decay
#[pyfunction]
#[pyo3(signature = (supply, supply_attr, demand, demand_attr, network, threshold, cost = "length"))]
#[gen_stub_pyfunction]
#[allow(clippy::too_many_arguments)]
pub fn compute_two_step_step1(
    py: Python<'_>,
    supply: &PyLocationSet,
    supply_attr: &str,
    demand: &PyLocationSet,
    demand_attr: &str,
    network: &PyStreetNetwork,
    threshold: f64,
    cost: &str,
) -> PyResult<PyLocationSet> {
    let config = two_step_config(threshold, cost)?;
    let inner = py
        .detach(|| {
            e2sfca_core::prelude::compute_two_step_step1(
                &supply.inner,
                supply_attr,
                &demand.inner,
                demand_attr,
                &network.graph,
                &config,
            )
        })
        .map_err(|e| to_py_err("2SFCA step 1 failed", e))?;

    Ok(PyLocationSet { inner })
}

/// 2SFCA step 2: sum of reachable step 1 ratios per demand location
#[pyfunction]
#[pyo3(signature = (step1, demand, network, threshold, cost = "length"))]
#[gen_stub_pyfunction]
pub fn compute_two_step_step2(
    py: Python<'_>,
    step1: &PyLocationSet,
    demand: &PyLocationSet,
    network: &PyStreetNetwork,
    threshold: f64,
    cost: &str,
) -> PyResult<PyLocationSet> {
    let config = two_step_config(threshold, cost)?;
    let inner = py
        .detach(|| {
            e2sfca_core::prelude::compute_two_step_step2(
                &step1.inner,
                &demand.inner,
                &network.graph,
                &config,
            )
        })
        .map_err(|e| to_py_err("2SFCA step 2 failed", e))?;

    Ok(PyLocationSet { inner })
}
