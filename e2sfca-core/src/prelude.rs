// Re-export key components
pub use crate::algo::catchment::{build_catchment, build_catchment_from_osm, service_areas};
pub use crate::algo::e2sfca::{compute_e2sfca, compute_step1, compute_step2};
pub use crate::algo::join::sum_attribute_within;
pub use crate::algo::two_step::{compute_two_step_step1, compute_two_step_step2};
pub use crate::algo::{ACCESS_ATTRIBUTE, RATIO_ATTRIBUTE};
pub use crate::config::{CatchmentConfig, CostAttribute, DecayBand, TwoStepConfig};
pub use crate::loading::{NetworkConfig, load_street_network, prepare_network};
pub use crate::model::{CatchmentBand, Location, LocationSet, StreetGraph};

// Core types
pub use crate::Cost;
pub use crate::Error;
pub use crate::OsmNodeId;
