use e2sfca_core::loading::geojson::{read_locations, write_locations};
use e2sfca_core::prelude::*;
use tracing::info;

use crate::config::{AppConfig, Method};
use crate::error::CliError;

/// Runs the configured accessibility computation, inside a dedicated rayon
/// pool when `threads` is set
pub fn execute(config: &AppConfig) -> Result<String, CliError> {
    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            info!("Using {threads} worker threads");
            pool.install(|| compute(config))
        }
        None => compute(config),
    }
}

fn compute(config: &AppConfig) -> Result<String, CliError> {
    let graph = load_street_network(&config.network)?;
    info!(
        "Street network ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let mut supply = read_locations(&config.supply.path)?;
    if let Some(filter) = config.filter {
        supply = supply.filter_rated(filter.min_rating, filter.min_reviews);
    }
    let supply = supply.resolve_nearest_nodes(&graph)?;
    let demand = read_locations(&config.demand.path)?.resolve_nearest_nodes(&graph)?;

    info!(
        "Loaded {} supply and {} demand locations",
        supply.len(),
        demand.len()
    );

    let (step1, step2) = match config.method {
        Method::Enhanced => {
            let catchment = config.catchment.as_ref().ok_or_else(|| {
                CliError::Config("method \"e2sfca\" requires a [catchment] section".into())
            })?;
            compute_e2sfca(
                &supply,
                &config.supply.attribute,
                &demand,
                &config.demand.attribute,
                &graph,
                catchment,
            )?
        }
        Method::TwoStep => {
            let two_step = config.two_step.as_ref().ok_or_else(|| {
                CliError::Config("method \"2sfca\" requires a [two_step] section".into())
            })?;
            let step1 = compute_two_step_step1(
                &supply,
                &config.supply.attribute,
                &demand,
                &config.demand.attribute,
                &graph,
                two_step,
            )?;
            let step2 = compute_two_step_step2(&step1, &demand, &graph, two_step)?;
            (step1, step2)
        }
    };

    write_locations(&config.output.supply, &step1)?;
    write_locations(&config.output.demand, &step2)?;

    Ok(format!(
        "Wrote {} supply ratios to '{}' and {} accessibility scores to '{}'",
        step1.len(),
        config.output.supply.display(),
        step2.len(),
        config.output.demand.display()
    ))
}
