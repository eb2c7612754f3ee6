//! Catchment and decay configuration shared by the accessibility methods

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Cost, Error};

/// Edge attribute used as the Dijkstra weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostAttribute {
    /// Travel time in minutes
    #[default]
    Time,
    /// Segment length in meters
    Length,
}

impl FromStr for CostAttribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(Self::Time),
            "length" => Ok(Self::Length),
            other => Err(Error::InvalidData(format!(
                "Unknown cost attribute '{other}', expected 'time' or 'length'"
            ))),
        }
    }
}

impl fmt::Display for CostAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => f.write_str("time"),
            Self::Length => f.write_str("length"),
        }
    }
}

/// One catchment cutoff together with its distance-decay weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayBand {
    pub threshold: Cost,
    pub weight: f64,
}

/// Banded catchment configuration for E2SFCA.
///
/// Bands are ordered by threshold ascending. Repeated thresholds are
/// accepted; the repeated band is always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchmentConfig {
    #[serde(default)]
    pub cost: CostAttribute,
    pub bands: Vec<DecayBand>,
}

impl CatchmentConfig {
    /// Pairs every threshold with its weight from `weights`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` if a threshold has no weight or the resulting
    /// bands violate [`CatchmentConfig::validate`].
    pub fn new(
        thresholds: &[Cost],
        weights: &[(Cost, f64)],
        cost: CostAttribute,
    ) -> Result<Self, Error> {
        let bands = thresholds
            .iter()
            .map(|&threshold| {
                weights
                    .iter()
                    .find(|(t, _)| *t == threshold)
                    .map(|&(_, weight)| DecayBand { threshold, weight })
                    .ok_or_else(|| {
                        Error::InvalidData(format!("Threshold {threshold} has no decay weight"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let config = Self { cost, bands };
        config.validate()?;
        Ok(config)
    }

    /// Checks the band invariants: at least one band, finite non-negative
    /// non-decreasing thresholds, weights in (0, 1] that never increase.
    pub fn validate(&self) -> Result<(), Error> {
        if self.bands.is_empty() {
            return Err(Error::InvalidData(
                "At least one catchment threshold is required".to_string(),
            ));
        }

        validate_thresholds(&self.thresholds())?;

        for band in &self.bands {
            if !(band.weight > 0.0 && band.weight <= 1.0) {
                return Err(Error::InvalidData(format!(
                    "Weight {} for threshold {} must be in (0, 1]",
                    band.weight, band.threshold
                )));
            }
        }

        if let Some((prev, next)) = self
            .bands
            .iter()
            .tuple_windows()
            .find(|(prev, next)| next.weight > prev.weight)
        {
            return Err(Error::InvalidData(format!(
                "Weights must not increase with threshold: {} at {} follows {} at {}",
                next.weight, next.threshold, prev.weight, prev.threshold
            )));
        }

        Ok(())
    }

    pub fn thresholds(&self) -> Vec<Cost> {
        self.bands.iter().map(|band| band.threshold).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.bands.iter().map(|band| band.weight).collect()
    }
}

/// Single-cutoff, undecayed catchment configuration for 2SFCA
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoStepConfig {
    pub threshold: Cost,
    #[serde(default = "default_two_step_cost")]
    pub cost: CostAttribute,
}

impl TwoStepConfig {
    pub fn new(threshold: Cost, cost: CostAttribute) -> Result<Self, Error> {
        validate_thresholds(&[threshold])?;
        Ok(Self { threshold, cost })
    }
}

fn default_two_step_cost() -> CostAttribute {
    CostAttribute::Length
}

/// Thresholds must be finite, non-negative and sorted ascending.
pub(crate) fn validate_thresholds(thresholds: &[Cost]) -> Result<(), Error> {
    if let Some(bad) = thresholds.iter().find(|t| !t.is_finite() || **t < 0.0) {
        return Err(Error::InvalidData(format!(
            "Threshold {bad} must be a finite non-negative number"
        )));
    }

    if thresholds.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(Error::InvalidData(format!(
            "Thresholds must be in ascending order, got {thresholds:?}"
        )));
    }

    Ok(())
}
