//! Accessibility algorithms: catchment construction, spatial joins and
//! the floating catchment area methods built on them.

pub mod catchment;
pub mod e2sfca;
pub mod join;
pub mod two_step;

/// Attribute written by Step 1 on supply locations
pub const RATIO_ATTRIBUTE: &str = "ratio";
/// Attribute written by Step 2 on demand locations
pub const ACCESS_ATTRIBUTE: &str = "access";

/// Capacity per 100,000 units of covered demand. Zero covered demand
/// yields zero.
pub(crate) fn supply_ratio(capacity: f64, covered_demand: f64) -> f64 {
    if covered_demand > 0.0 {
        capacity / covered_demand * crate::RATIO_SCALE
    } else {
        0.0
    }
}
