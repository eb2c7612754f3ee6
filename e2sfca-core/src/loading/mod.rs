//! This module is responsible for loading street networks and location sets
//! and preparing the network for catchment computation.

mod builder;
pub mod cleanup;
mod config;
pub mod csv;
pub mod geojson;
pub mod speed;

pub use builder::{
    RawEdge, RawNode, RawStreetNetwork, load_street_network, prepare_network,
};
pub use cleanup::remove_fragments;
pub use config::NetworkConfig;
