use std::path::{Path, PathBuf};

use e2sfca_core::prelude::{CatchmentConfig, NetworkConfig, TwoStepConfig};
use serde::Deserialize;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Method {
    #[serde(rename = "e2sfca")]
    Enhanced,
    #[serde(rename = "2sfca")]
    TwoStep,
}

/// One GeoJSON location set and the attribute the run reads from it
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    pub path: PathBuf,
    pub attribute: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub supply: PathBuf,
    pub demand: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RatingFilter {
    pub min_rating: f64,
    pub min_reviews: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub method: Method,
    pub threads: Option<usize>,
    pub network: NetworkConfig,
    pub supply: LayerConfig,
    pub demand: LayerConfig,
    pub catchment: Option<CatchmentConfig>,
    pub two_step: Option<TwoStepConfig>,
    pub filter: Option<RatingFilter>,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses the TOML text and checks that the section `method` needs is present
    pub fn parse(text: &str) -> Result<Self, CliError> {
        let config: Self = toml::from_str(text)?;

        match config.method {
            Method::Enhanced => {
                let catchment = config.catchment.as_ref().ok_or_else(|| {
                    CliError::Config("method \"e2sfca\" requires a [catchment] section".into())
                })?;
                catchment.validate()?;
            }
            Method::TwoStep => {
                let two_step = config.two_step.as_ref().ok_or_else(|| {
                    CliError::Config("method \"2sfca\" requires a [two_step] section".into())
                })?;
                TwoStepConfig::new(two_step.threshold, two_step.cost)?;
            }
        }

        if config.threads == Some(0) {
            return Err(CliError::Config("threads must be at least 1".into()));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use e2sfca_core::prelude::CostAttribute;

    use super::*;

    const E2SFCA_RUN: &str = r#"
method = "e2sfca"
threads = 4

[network]
nodes = "data/nodes.csv"
edges = "data/edges.csv"

[supply]
path = "data/clinics.geojson"
attribute = "beds"

[demand]
path = "data/tracts.geojson"
attribute = "population"

[catchment]
cost = "time"
bands = [
    { threshold = 5.0, weight = 1.0 },
    { threshold = 10.0, weight = 0.68 },
    { threshold = 15.0, weight = 0.22 },
]

[filter]
min_rating = 4.0
min_reviews = 50

[output]
supply = "out/supply.geojson"
demand = "out/demand.geojson"
"#;

    #[test]
    fn parses_e2sfca_run() {
        let config = AppConfig::parse(E2SFCA_RUN).unwrap();

        assert_eq!(config.method, Method::Enhanced);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.network.min_component_size, 10);
        assert_eq!(config.supply.attribute, "beds");

        let catchment = config.catchment.unwrap();
        assert_eq!(catchment.cost, CostAttribute::Time);
        assert_eq!(catchment.thresholds(), vec![5.0, 10.0, 15.0]);
        assert_eq!(catchment.weights(), vec![1.0, 0.68, 0.22]);

        let filter = config.filter.unwrap();
        assert!((filter.min_rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn two_step_defaults_to_length() {
        let text = r#"
method = "2sfca"

[network]
nodes = "nodes.csv"
edges = "edges.csv"
min_component_size = 3

[supply]
path = "supply.geojson"
attribute = "doctors"

[demand]
path = "demand.geojson"
attribute = "population"

[two_step]
threshold = 1600.0

[output]
supply = "supply_out.geojson"
demand = "demand_out.geojson"
"#;
        let config = AppConfig::parse(text).unwrap();

        assert_eq!(config.method, Method::TwoStep);
        assert_eq!(config.network.min_component_size, 3);
        assert!(config.filter.is_none());
        assert_eq!(config.two_step.unwrap().cost, CostAttribute::Length);
    }

    #[test]
    fn method_needs_its_section() {
        let text = E2SFCA_RUN.replace("method = \"e2sfca\"", "method = \"2sfca\"");
        assert!(matches!(AppConfig::parse(&text), Err(CliError::Config(_))));
    }

    #[test]
    fn rejects_increasing_weights() {
        let text = E2SFCA_RUN.replace("weight = 0.22", "weight = 0.9");
        assert!(matches!(AppConfig::parse(&text), Err(CliError::Core(_))));
    }

    #[test]
    fn rejects_unknown_method() {
        let text = E2SFCA_RUN.replace("method = \"e2sfca\"", "method = \"3sfca\"");
        assert!(matches!(AppConfig::parse(&text), Err(CliError::ConfigParse(_))));
    }
}
