//! Data model for accessibility analysis
//!
//! Contains the prepared street network and the supply/demand location sets.

pub mod catchment;
pub mod locations;
pub mod streets;

pub use catchment::CatchmentBand;
pub use locations::{Location, LocationSet};
pub use streets::{IndexedPoint, StreetEdge, StreetGraph, StreetNode};
