use serde::{Deserialize, Serialize};

use crate::{
    error::{SimulationError, SimulationResult},
    model::{END_YEAR, START_YEAR},
};

fn default_co2_growth_rate() -> f64 {
    1.5
}

fn default_reforestation_rate() -> f64 {
    0.0
}

fn default_year() -> u32 {
    START_YEAR
}

/// User-tunable knobs. Growth rate and reforestation rate drive the model; `year` only
/// selects which slice of the computed trajectory is being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Percent per year applied to global emissions.
    #[serde(default = "default_co2_growth_rate")]
    pub co2_growth_rate: f64,
    /// Hectares committed per year.
    #[serde(default = "default_reforestation_rate")]
    pub reforestation_rate: f64,
    #[serde(default = "default_year")]
    pub year: u32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            co2_growth_rate: default_co2_growth_rate(),
            reforestation_rate: default_reforestation_rate(),
            year: default_year(),
        }
    }
}

impl SimulationParameters {
    pub fn new(co2_growth_rate: f64, reforestation_rate: f64, year: u32) -> Self {
        Self {
            co2_growth_rate,
            reforestation_rate,
            year,
        }
    }

    pub fn validate(&self) -> SimulationResult<()> {
        validate_co2_growth_rate(self.co2_growth_rate)?;
        validate_reforestation_rate(self.reforestation_rate)?;
        validate_year(self.year)
    }

    pub fn years_since_start(&self) -> u32 {
        self.year.saturating_sub(START_YEAR)
    }

    /// True when switching to `other` changes the trajectory, not just the viewed slice.
    pub fn requires_rebuild(&self, other: &SimulationParameters) -> bool {
        self.co2_growth_rate != other.co2_growth_rate
            || self.reforestation_rate != other.reforestation_rate
    }
}

pub fn validate_co2_growth_rate(value: f64) -> SimulationResult<()> {
    if !value.is_finite() {
        return Err(SimulationError::InvalidParameter {
            name: "co2_growth_rate",
            value,
            reason: "must be finite",
        });
    }
    if value <= -100.0 {
        return Err(SimulationError::InvalidParameter {
            name: "co2_growth_rate",
            value,
            reason: "must be greater than -100 percent",
        });
    }
    Ok(())
}

pub fn validate_reforestation_rate(value: f64) -> SimulationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimulationError::InvalidParameter {
            name: "reforestation_rate",
            value,
            reason: "must be a finite, non-negative number of hectares",
        });
    }
    Ok(())
}

pub fn validate_year(year: u32) -> SimulationResult<()> {
    if !(START_YEAR..=END_YEAR).contains(&year) {
        return Err(SimulationError::YearOutOfRange {
            year,
            start: START_YEAR,
            end: END_YEAR,
        });
    }
    Ok(())
}
