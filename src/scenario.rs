use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    config::SimulationParameters,
    error::SimulationResult,
    simulation::{Simulation, SimulationBuilder},
    tipping::{default_tipping_groups, TippingPointGroup},
    world::{CountryForestationPotential, CountryTables, InitialState},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: SimulationParameters,
    #[serde(default)]
    pub initial: InitialState,
    pub countries: Vec<ScenarioCountry>,
    #[serde(default)]
    pub tipping_points: Option<Vec<TippingPointGroup>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCountry {
    pub iso: String,
    #[serde(default)]
    pub tco2e_absorption_capacity: f64,
    #[serde(default)]
    pub hectare_capacity: f64,
    pub base_temperature: Option<f64>,
    pub base_emissions_per_capita: Option<f64>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Scenario::from_yaml(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Scenario {
    pub fn from_yaml(data: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(data)?;
        scenario.parameters.validate()?;
        scenario.initial.validate()?;
        for group in scenario.tipping_points.iter().flatten() {
            group.validate()?;
        }
        scenario.build_tables()?;
        Ok(scenario)
    }

    /// Country order in the file is the order the tree allocator visits countries in.
    pub fn build_tables(&self) -> SimulationResult<CountryTables> {
        let mut tables = CountryTables::new();
        for country in &self.countries {
            tables.insert_forestation(
                country.iso.clone(),
                CountryForestationPotential::new(
                    country.tco2e_absorption_capacity,
                    country.hectare_capacity,
                ),
            )?;
            if let Some(celsius) = country.base_temperature {
                tables.insert_base_temperature(country.iso.clone(), celsius);
            }
            if let Some(tonnes) = country.base_emissions_per_capita {
                tables.insert_base_emissions_per_capita(country.iso.clone(), tonnes);
            }
        }
        Ok(tables)
    }

    pub fn tipping_groups(&self) -> Vec<TippingPointGroup> {
        self.tipping_points
            .clone()
            .unwrap_or_else(default_tipping_groups)
    }

    pub fn simulation_builder(&self) -> SimulationResult<SimulationBuilder> {
        Ok(Simulation::builder(self.build_tables()?)
            .parameters(self.parameters)
            .initial_state(self.initial)
            .tipping_groups(self.tipping_groups()))
    }

    pub fn build_simulation(&self) -> SimulationResult<Simulation> {
        self.simulation_builder()?.build()
    }
}
