//! Two-Step Floating Catchment Area (2SFCA): a single catchment per
//! location, no distance decay.

use log::{debug, info};
use rayon::prelude::*;

use super::catchment::catchment_bands;
use super::join::AnchorIndex;
use super::{ACCESS_ATTRIBUTE, RATIO_ATTRIBUTE, supply_ratio};
use crate::config::TwoStepConfig;
use crate::{Error, LocationSet, StreetGraph};

/// Step 1: supply capacity per 100,000 units of demand inside the
/// catchment. Supply covering no demand gets a ratio of 0.
pub fn compute_two_step_step1(
    supply: &LocationSet,
    supply_attr: &str,
    demand: &LocationSet,
    demand_attr: &str,
    graph: &StreetGraph,
    config: &TwoStepConfig,
) -> Result<LocationSet, Error> {
    let capacities = supply.attribute_values(supply_attr)?;
    let sources = supply.source_nodes(graph)?;
    let demand_values = demand.attribute_values(demand_attr)?;
    let demand_index = AnchorIndex::new(demand, &demand_values);
    let thresholds = checked_threshold(config)?;

    info!(
        "2SFCA step 1: {} supply locations, cutoff {} ({})",
        supply.len(),
        config.threshold,
        config.cost
    );

    let ratios = sources
        .par_iter()
        .zip(capacities.par_iter())
        .enumerate()
        .map(|(idx, (&source, &capacity))| {
            let bands = catchment_bands(graph, source, &thresholds, config.cost);
            let covered_demand = demand_index.weighted_sum(&bands, &[1.0]);
            if covered_demand <= 0.0 {
                debug!("Supply location {idx} covers no demand, ratio set to 0");
            }
            supply_ratio(capacity, covered_demand)
        })
        .collect();

    supply.with_attribute(RATIO_ATTRIBUTE, ratios)
}

/// Step 2: sum of the Step 1 ratios of all supply inside each demand
/// location's catchment
pub fn compute_two_step_step2(
    step1: &LocationSet,
    demand: &LocationSet,
    graph: &StreetGraph,
    config: &TwoStepConfig,
) -> Result<LocationSet, Error> {
    let ratios = step1.attribute_values(RATIO_ATTRIBUTE)?;
    let sources = demand.source_nodes(graph)?;
    let supply_index = AnchorIndex::new(step1, &ratios);
    let thresholds = checked_threshold(config)?;

    info!(
        "2SFCA step 2: {} demand locations, cutoff {} ({})",
        demand.len(),
        config.threshold,
        config.cost
    );

    let access = sources
        .par_iter()
        .map(|&source| {
            let bands = catchment_bands(graph, source, &thresholds, config.cost);
            supply_index.weighted_sum(&bands, &[1.0])
        })
        .collect();

    demand.with_attribute(ACCESS_ATTRIBUTE, access)
}

fn checked_threshold(config: &TwoStepConfig) -> Result<[f64; 1], Error> {
    crate::config::validate_thresholds(&[config.threshold])?;
    Ok([config.threshold])
}
