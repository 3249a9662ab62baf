//! The live session: current parameters, the trajectory computed from them and everything
//! derived from it.
//!
//! Every mutation goes through one path that builds a complete new set of outputs and only
//! then swaps it in. Readers therefore see either the previous complete state or the new one.

use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    allocation::{allocate_trees_round_robin, tree_units_for_area, TreeAllocation},
    config::{
        validate_co2_growth_rate, validate_reforestation_rate, validate_year,
        SimulationParameters,
    },
    engine::Engine,
    error::SimulationResult,
    projections::{project_emissions_per_capita, project_temperatures},
    tipping::{default_tipping_groups, detect_tipping_points, TippingPointCrossing, TippingPointGroup},
    trajectory::Trajectory,
    world::{CountryTables, InitialState, YearlyState},
};

pub struct SimulationBuilder {
    tables: Arc<CountryTables>,
    params: SimulationParameters,
    initial: InitialState,
    tipping_groups: Vec<TippingPointGroup>,
    engine: Engine,
}

impl SimulationBuilder {
    pub fn new(tables: impl Into<Arc<CountryTables>>) -> Self {
        Self {
            tables: tables.into(),
            params: SimulationParameters::default(),
            initial: InitialState::default(),
            tipping_groups: default_tipping_groups(),
            engine: Engine::standard(),
        }
    }

    pub fn parameters(mut self, params: SimulationParameters) -> Self {
        self.params = params;
        self
    }

    pub fn initial_state(mut self, initial: InitialState) -> Self {
        self.initial = initial;
        self
    }

    pub fn tipping_groups(mut self, groups: Vec<TippingPointGroup>) -> Self {
        self.tipping_groups = groups;
        self
    }

    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    pub fn build(self) -> SimulationResult<Simulation> {
        self.params.validate()?;
        let trajectory = Arc::new(self.engine.build_trajectory(
            &self.params,
            &self.tables,
            self.initial,
        )?);
        let tipping_points = detect_tipping_points(&trajectory, &self.tipping_groups);
        let slice = ViewedSlice::compute(&trajectory, &self.tables, &self.params)?;
        Ok(Simulation {
            engine: self.engine,
            tables: self.tables,
            initial: self.initial,
            tipping_groups: self.tipping_groups,
            params: self.params,
            trajectory,
            tipping_points,
            slice,
        })
    }
}

pub struct Simulation {
    engine: Engine,
    tables: Arc<CountryTables>,
    initial: InitialState,
    tipping_groups: Vec<TippingPointGroup>,
    params: SimulationParameters,
    trajectory: Arc<Trajectory>,
    tipping_points: Vec<TippingPointCrossing>,
    slice: ViewedSlice,
}

/// Everything that depends on the viewed year.
#[derive(Debug, Clone)]
struct ViewedSlice {
    state: YearlyState,
    temperatures: BTreeMap<String, f64>,
    emissions_per_capita: BTreeMap<String, f64>,
    tree_allocation: TreeAllocation,
}

impl ViewedSlice {
    fn compute(
        trajectory: &Trajectory,
        tables: &CountryTables,
        params: &SimulationParameters,
    ) -> SimulationResult<Self> {
        let state = *trajectory.state(params.year)?;
        let temperatures = project_temperatures(tables.base_temperatures(), state.temperature_increase);
        let emissions_per_capita = project_emissions_per_capita(
            tables.base_emissions_per_capita(),
            params.co2_growth_rate,
            params.years_since_start(),
        );
        let tree_allocation = allocate_trees_round_robin(
            tree_units_for_area(state.total_reforested_area),
            &tables.tree_unit_capacities(),
        );
        Ok(Self {
            state,
            temperatures,
            emissions_per_capita,
            tree_allocation,
        })
    }
}

/// Serializable view of the current slice for external consumers.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationView {
    pub parameters: SimulationParameters,
    pub state: YearlyState,
    pub temperatures: BTreeMap<String, f64>,
    pub emissions_per_capita: BTreeMap<String, f64>,
    pub tipping_points: Vec<TippingPointCrossing>,
    pub active_tipping_points: Vec<String>,
    pub tree_allocation: TreeAllocation,
}

impl Simulation {
    pub fn builder(tables: impl Into<Arc<CountryTables>>) -> SimulationBuilder {
        SimulationBuilder::new(tables)
    }

    pub fn new(
        tables: impl Into<Arc<CountryTables>>,
        params: SimulationParameters,
    ) -> SimulationResult<Self> {
        SimulationBuilder::new(tables).parameters(params).build()
    }

    /// Rebuilds trajectory, tipping points and the viewed slice for the current inputs.
    pub fn recompute(&mut self) -> SimulationResult<()> {
        self.apply(self.params, Arc::clone(&self.tables))
    }

    pub fn set_co2_growth_rate(&mut self, co2_growth_rate: f64) -> SimulationResult<()> {
        validate_co2_growth_rate(co2_growth_rate)?;
        let params = SimulationParameters {
            co2_growth_rate,
            ..self.params
        };
        self.apply(params, Arc::clone(&self.tables))
    }

    pub fn set_reforestation_rate(&mut self, reforestation_rate: f64) -> SimulationResult<()> {
        validate_reforestation_rate(reforestation_rate)?;
        let params = SimulationParameters {
            reforestation_rate,
            ..self.params
        };
        self.apply(params, Arc::clone(&self.tables))
    }

    /// Moves the viewed year. The trajectory is reused; only the slice is rebuilt.
    pub fn set_year(&mut self, year: u32) -> SimulationResult<()> {
        validate_year(year)?;
        let params = SimulationParameters { year, ..self.params };
        let slice = ViewedSlice::compute(&self.trajectory, &self.tables, &params)?;
        self.params = params;
        self.slice = slice;
        Ok(())
    }

    pub fn set_parameters(&mut self, params: SimulationParameters) -> SimulationResult<()> {
        params.validate()?;
        if self.params.requires_rebuild(&params) {
            self.apply(params, Arc::clone(&self.tables))
        } else {
            self.set_year(params.year)
        }
    }

    pub fn replace_tables(&mut self, tables: impl Into<Arc<CountryTables>>) -> SimulationResult<()> {
        self.apply(self.params, tables.into())
    }

    fn apply(
        &mut self,
        params: SimulationParameters,
        tables: Arc<CountryTables>,
    ) -> SimulationResult<()> {
        let outcome = self
            .engine
            .build_trajectory(&params, &tables, self.initial)
            .and_then(|trajectory| {
                let slice = ViewedSlice::compute(&trajectory, &tables, &params)?;
                Ok((trajectory, slice))
            });
        let (trajectory, slice) = match outcome {
            Ok(built) => built,
            Err(err) => {
                warn!(error = %err, "recompute failed; keeping previous trajectory");
                return Err(err);
            }
        };

        self.tipping_points = detect_tipping_points(&trajectory, &self.tipping_groups);
        self.trajectory = Arc::new(trajectory);
        self.slice = slice;
        self.params = params;
        self.tables = tables;
        info!(
            co2_growth_rate = params.co2_growth_rate,
            reforestation_rate = params.reforestation_rate,
            "simulation recomputed"
        );
        Ok(())
    }

    pub fn parameters(&self) -> SimulationParameters {
        self.params
    }

    pub fn tables(&self) -> &Arc<CountryTables> {
        &self.tables
    }

    pub fn initial_state(&self) -> InitialState {
        self.initial
    }

    pub fn trajectory(&self) -> Arc<Trajectory> {
        Arc::clone(&self.trajectory)
    }

    pub fn current(&self) -> &YearlyState {
        &self.slice.state
    }

    pub fn temperatures(&self) -> &BTreeMap<String, f64> {
        &self.slice.temperatures
    }

    pub fn emissions_per_capita(&self) -> &BTreeMap<String, f64> {
        &self.slice.emissions_per_capita
    }

    pub fn tipping_points(&self) -> &[TippingPointCrossing] {
        &self.tipping_points
    }

    pub fn active_tipping_points(&self) -> Vec<String> {
        self.tipping_points
            .iter()
            .filter(|crossing| crossing.is_active(self.params.year))
            .flat_map(|crossing| crossing.tipping_points.iter().map(|tp| tp.id.clone()))
            .collect()
    }

    pub fn tree_allocation(&self) -> &TreeAllocation {
        &self.slice.tree_allocation
    }

    pub fn view(&self) -> SimulationView {
        SimulationView {
            parameters: self.params,
            state: self.slice.state,
            temperatures: self.slice.temperatures.clone(),
            emissions_per_capita: self.slice.emissions_per_capita.clone(),
            tipping_points: self.tipping_points.clone(),
            active_tipping_points: self.active_tipping_points(),
            tree_allocation: self.slice.tree_allocation.clone(),
        }
    }
}
