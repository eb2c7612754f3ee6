//! Spatial accessibility scores over a street network.
//!
//! The crate implements the Two-Step Floating Catchment Area family of
//! methods: catchments are grown from every location along the street
//! network with Dijkstra, turned into convex hulls, and used to distribute
//! supply capacity over the demand it can reach.

pub mod algo;
pub mod config;
mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use model::{CatchmentBand, Location, LocationSet, StreetGraph};

/// OSM identifier of a street network node
pub type OsmNodeId = i64;
/// Traversal cost, in minutes or meters depending on [`config::CostAttribute`]
pub type Cost = f64;

/// Multiplier applied to supply-to-demand ratios ("per 100,000 people")
pub const RATIO_SCALE: f64 = 100_000.0;
