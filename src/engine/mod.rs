use tracing::debug;

use crate::{
    config::SimulationParameters,
    error::SimulationResult,
    model::{END_YEAR, START_YEAR},
    systems::{EmissionsSystem, ReforestationSystem, TemperatureSystem},
    trajectory::Trajectory,
    world::{CountryTables, InitialState, YearlyState},
};

pub struct EngineBuilder {
    systems: Vec<Box<dyn System + Send + Sync>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + Send + Sync + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            systems: self.systems,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the year-step systems in order. Holds no state between years: every step is a
/// function of the previous year, the parameters and the country tables.
pub struct Engine {
    systems: Vec<Box<dyn System + Send + Sync>>,
}

impl Engine {
    /// Emissions, then reforestation, then temperature.
    pub fn standard() -> Self {
        EngineBuilder::new()
            .with_system(EmissionsSystem::new())
            .with_system(ReforestationSystem::new())
            .with_system(TemperatureSystem::new())
            .build()
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    pub fn step_year(
        &self,
        previous: &YearlyState,
        ctx: &SystemContext,
    ) -> SimulationResult<YearlyState> {
        let mut next = *previous;
        for system in &self.systems {
            system.run(ctx, &mut next)?;
        }
        Ok(next)
    }

    pub fn build_trajectory(
        &self,
        params: &SimulationParameters,
        tables: &CountryTables,
        initial: InitialState,
    ) -> SimulationResult<Trajectory> {
        self.build_trajectory_with_hook(params, tables, initial, |_, _| {})
    }

    /// Full rebuild from the fixed initial state. `hook` sees every year as it is produced,
    /// including the initial one.
    pub fn build_trajectory_with_hook<F>(
        &self,
        params: &SimulationParameters,
        tables: &CountryTables,
        initial: InitialState,
        mut hook: F,
    ) -> SimulationResult<Trajectory>
    where
        F: FnMut(u32, &YearlyState),
    {
        let mut states = Vec::with_capacity((END_YEAR - START_YEAR + 1) as usize);
        let mut current = initial.to_yearly_state()?;
        hook(START_YEAR, &current);
        states.push((START_YEAR, current));

        for year in (START_YEAR + 1)..=END_YEAR {
            let ctx = SystemContext {
                year,
                params,
                tables,
            };
            current = self.step_year(&current, &ctx)?;
            hook(year, &current);
            states.push((year, current));
        }

        debug!(
            co2_growth_rate = params.co2_growth_rate,
            reforestation_rate = params.reforestation_rate,
            final_temperature = current.temperature_increase,
            "trajectory built"
        );
        Ok(Trajectory::from_states(states))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::standard()
    }
}

pub struct SystemContext<'a> {
    /// Year being produced.
    pub year: u32,
    pub params: &'a SimulationParameters,
    pub tables: &'a CountryTables,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(&self, ctx: &SystemContext, state: &mut YearlyState) -> SimulationResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_engine_runs_systems_in_model_order() {
        let engine = Engine::standard();
        assert_eq!(
            engine.system_names(),
            vec!["emissions", "reforestation", "temperature"]
        );
    }

    #[test]
    fn hook_sees_every_year_once() {
        let engine = Engine::standard();
        let mut years = Vec::new();
        engine
            .build_trajectory_with_hook(
                &SimulationParameters::default(),
                &CountryTables::new(),
                InitialState::default(),
                |year, _| years.push(year),
            )
            .unwrap();
        assert_eq!(years.len(), 101);
        assert_eq!(years.first().copied(), Some(START_YEAR));
        assert_eq!(years.last().copied(), Some(END_YEAR));
    }
}
