use crate::{
    engine::{System, SystemContext},
    error::{SimulationError, SimulationResult},
    model::checked_temperature_from_co2,
    world::YearlyState,
};

pub struct TemperatureSystem;

impl TemperatureSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TemperatureSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TemperatureSystem {
    fn name(&self) -> &str {
        "temperature"
    }

    fn run(&self, ctx: &SystemContext, state: &mut YearlyState) -> SimulationResult<()> {
        // Derived from the pool every year, never carried forward.
        state.temperature_increase = checked_temperature_from_co2(state.co2).ok_or(
            SimulationError::NonFiniteTemperature {
                year: ctx.year,
                co2: state.co2,
            },
        )?;
        Ok(())
    }
}
