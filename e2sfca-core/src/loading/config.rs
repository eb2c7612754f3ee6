use std::path::PathBuf;

use serde::Deserialize;

use super::cleanup::DEFAULT_MIN_COMPONENT_SIZE;

/// Location of a street network export and how to clean it
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// CSV with `osmid,x,y` columns
    #[serde(rename = "nodes")]
    pub nodes_path: PathBuf,
    /// CSV with `u,v,length,maxspeed,highway` columns
    #[serde(rename = "edges")]
    pub edges_path: PathBuf,
    /// Strongly connected components below this size are dropped
    #[serde(default = "default_min_component_size")]
    pub min_component_size: usize,
}

fn default_min_component_size() -> usize {
    DEFAULT_MIN_COMPONENT_SIZE
}
