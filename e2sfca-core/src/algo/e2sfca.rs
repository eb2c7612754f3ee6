//! Enhanced Two-Step Floating Catchment Area (E2SFCA).
//!
//! Step 1 grows banded catchments around every supply location and turns
//! the decay-weighted demand they cover into a supply-to-demand ratio.
//! Step 2 grows the same catchments around every demand location and sums
//! the decay-weighted ratios of the supply they cover.

use log::{debug, info};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use super::catchment::catchment_bands;
use super::join::AnchorIndex;
use super::{ACCESS_ATTRIBUTE, RATIO_ATTRIBUTE, supply_ratio};
use crate::config::CatchmentConfig;
use crate::{Error, LocationSet, StreetGraph};

/// Step 1: supply capacity per 100,000 units of decay-weighted demand.
///
/// Returns a copy of `supply` with a `ratio` attribute. Supply whose
/// catchment covers no demand gets a ratio of 0.
///
/// # Errors
///
/// Fails on an invalid `config`, a supply or demand record without the
/// requested attribute, or a supply record without a resolved nearest node.
pub fn compute_step1(
    supply: &LocationSet,
    supply_attr: &str,
    demand: &LocationSet,
    demand_attr: &str,
    graph: &StreetGraph,
    config: &CatchmentConfig,
) -> Result<LocationSet, Error> {
    config.validate()?;

    let capacities = supply.attribute_values(supply_attr)?;
    let sources = supply.source_nodes(graph)?;
    let demand_values = demand.attribute_values(demand_attr)?;
    let demand_index = AnchorIndex::new(demand, &demand_values);

    info!(
        "E2SFCA step 1: {} supply locations against {} demand locations",
        supply.len(),
        demand.len()
    );

    let covered = banded_sums(graph, &sources, &demand_index, config);

    let ratios = capacities
        .iter()
        .zip(&covered)
        .enumerate()
        .map(|(idx, (&capacity, &covered_demand))| {
            if covered_demand <= 0.0 {
                debug!("Supply location {idx} covers no demand, ratio set to 0");
            }
            supply_ratio(capacity, covered_demand)
        })
        .collect();

    info!("E2SFCA step 1 finished");
    supply.with_attribute(RATIO_ATTRIBUTE, ratios)
}

/// Step 2: accessibility of every demand location.
///
/// `step1` is the output of [`compute_step1`]. Returns a copy of `demand`
/// with an `access` attribute.
///
/// # Errors
///
/// Fails on an invalid `config`, a Step 1 record without `ratio`, or a
/// demand record without a resolved nearest node.
pub fn compute_step2(
    step1: &LocationSet,
    demand: &LocationSet,
    graph: &StreetGraph,
    config: &CatchmentConfig,
) -> Result<LocationSet, Error> {
    config.validate()?;

    let ratios = step1.attribute_values(RATIO_ATTRIBUTE)?;
    let sources = demand.source_nodes(graph)?;
    let supply_index = AnchorIndex::new(step1, &ratios);

    info!(
        "E2SFCA step 2: {} demand locations against {} supply locations",
        demand.len(),
        step1.len()
    );

    let access = banded_sums(graph, &sources, &supply_index, config);

    info!("E2SFCA step 2 finished");
    demand.with_attribute(ACCESS_ATTRIBUTE, access)
}

/// Runs both steps, returning the supply with ratios and the demand with
/// accessibility scores
pub fn compute_e2sfca(
    supply: &LocationSet,
    supply_attr: &str,
    demand: &LocationSet,
    demand_attr: &str,
    graph: &StreetGraph,
    config: &CatchmentConfig,
) -> Result<(LocationSet, LocationSet), Error> {
    let step1 = compute_step1(supply, supply_attr, demand, demand_attr, graph, config)?;
    let step2 = compute_step2(&step1, demand, graph, config)?;
    Ok((step1, step2))
}

/// Decay-weighted sum of indexed values over the catchment of each source,
/// in source order
fn banded_sums(
    graph: &StreetGraph,
    sources: &[NodeIndex],
    index: &AnchorIndex<'_>,
    config: &CatchmentConfig,
) -> Vec<f64> {
    let thresholds = config.thresholds();
    let weights = config.weights();

    sources
        .par_iter()
        .map(|&source| {
            let bands = catchment_bands(graph, source, &thresholds, config.cost);
            index.weighted_sum(&bands, &weights)
        })
        .collect()
}
