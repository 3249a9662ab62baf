use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{SimulationError, SimulationResult},
    model::{
        checked_temperature_from_co2, HECTARES_PER_TREE_UNIT, INITIAL_CO2_TONNES,
        INITIAL_GLOBAL_EMISSIONS, START_YEAR,
    },
};

/// One simulated year. The year itself is the trajectory key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyState {
    /// Cumulative atmospheric CO2, tonnes.
    pub co2: f64,
    /// Hectares reforested since the start of the run.
    pub total_reforested_area: f64,
    /// Gross emissions of this year, tonnes/year.
    pub global_emissions: f64,
    /// Degrees C above pre-industrial, derived from `co2`.
    pub temperature_increase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialState {
    pub co2: f64,
    pub global_emissions: f64,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            co2: INITIAL_CO2_TONNES,
            global_emissions: INITIAL_GLOBAL_EMISSIONS,
        }
    }
}

impl InitialState {
    pub fn validate(&self) -> SimulationResult<()> {
        if !self.co2.is_finite() || self.co2 <= 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "initial.co2",
                value: self.co2,
                reason: "must be a finite, positive number of tonnes",
            });
        }
        if !self.global_emissions.is_finite() || self.global_emissions < 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "initial.global_emissions",
                value: self.global_emissions,
                reason: "must be a finite, non-negative number of tonnes per year",
            });
        }
        Ok(())
    }

    pub fn to_yearly_state(self) -> SimulationResult<YearlyState> {
        let temperature_increase = checked_temperature_from_co2(self.co2).ok_or(
            SimulationError::NonFiniteTemperature {
                year: START_YEAR,
                co2: self.co2,
            },
        )?;
        Ok(YearlyState {
            co2: self.co2,
            total_reforested_area: 0.0,
            global_emissions: self.global_emissions,
            temperature_increase,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryForestationPotential {
    pub tco2e_absorption_capacity: f64,
    pub hectare_capacity: f64,
}

impl CountryForestationPotential {
    pub fn new(tco2e_absorption_capacity: f64, hectare_capacity: f64) -> Self {
        Self {
            tco2e_absorption_capacity,
            hectare_capacity,
        }
    }

    /// Tonnes of CO2 absorbed per reforested hectare; zero for a country without area.
    pub fn absorption_per_ha(&self) -> f64 {
        if self.hectare_capacity > 0.0 {
            self.tco2e_absorption_capacity / self.hectare_capacity
        } else {
            0.0
        }
    }

    /// Whole tree units that fit into this country's plantable area.
    pub fn tree_unit_capacity(&self) -> u64 {
        (self.hectare_capacity / HECTARES_PER_TREE_UNIT).floor().max(0.0) as u64
    }

    fn validate(&self, iso: &str) -> SimulationResult<()> {
        let checks = [
            ("tco2e_absorption_capacity", self.tco2e_absorption_capacity),
            ("hectare_capacity", self.hectare_capacity),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidCountry {
                    iso: iso.to_string(),
                    reason: format!("{field} must be a finite, non-negative number (got {value})"),
                });
            }
        }
        Ok(())
    }
}

/// Per-country input tables. Read-only once handed to a simulation.
///
/// Forestation entries keep insertion order: the tree allocator visits countries in that
/// order and uses it as its only tie-break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryTables {
    forestation: Vec<(String, CountryForestationPotential)>,
    base_temperatures: BTreeMap<String, f64>,
    base_emissions_per_capita: BTreeMap<String, f64>,
}

impl CountryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_forestation(
        &mut self,
        iso: impl Into<String>,
        potential: CountryForestationPotential,
    ) -> SimulationResult<()> {
        let iso = iso.into();
        if self.forestation_potential(&iso).is_some() {
            return Err(SimulationError::DuplicateCountry { iso });
        }
        potential.validate(&iso)?;
        self.forestation.push((iso, potential));
        Ok(())
    }

    pub fn insert_base_temperature(&mut self, iso: impl Into<String>, celsius: f64) {
        self.base_temperatures.insert(iso.into(), celsius);
    }

    pub fn insert_base_emissions_per_capita(&mut self, iso: impl Into<String>, tonnes: f64) {
        self.base_emissions_per_capita.insert(iso.into(), tonnes);
    }

    pub fn with_forestation(
        mut self,
        iso: impl Into<String>,
        potential: CountryForestationPotential,
    ) -> SimulationResult<Self> {
        self.insert_forestation(iso, potential)?;
        Ok(self)
    }

    pub fn forestation(&self) -> &[(String, CountryForestationPotential)] {
        &self.forestation
    }

    pub fn forestation_potential(&self, iso: &str) -> Option<&CountryForestationPotential> {
        self.forestation
            .iter()
            .find(|(code, _)| code == iso)
            .map(|(_, potential)| potential)
    }

    pub fn total_potential_ha(&self) -> f64 {
        total_potential_ha(&self.forestation)
    }

    pub fn tree_unit_capacities(&self) -> Vec<(String, u64)> {
        self.forestation
            .iter()
            .map(|(iso, potential)| (iso.clone(), potential.tree_unit_capacity()))
            .collect()
    }

    pub fn base_temperatures(&self) -> &BTreeMap<String, f64> {
        &self.base_temperatures
    }

    pub fn base_emissions_per_capita(&self) -> &BTreeMap<String, f64> {
        &self.base_emissions_per_capita
    }
}

pub(crate) fn total_potential_ha(forestation: &[(String, CountryForestationPotential)]) -> f64 {
    forestation
        .iter()
        .map(|(_, potential)| potential.hectare_capacity)
        .sum()
}
