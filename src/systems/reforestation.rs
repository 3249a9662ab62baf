use crate::{
    engine::{System, SystemContext},
    error::SimulationResult,
    model::{accumulate_reforested_area, apply_reforestation_effect},
    world::YearlyState,
};

/// Plants this year's hectares and subtracts what the cumulative area absorbs.
pub struct ReforestationSystem;

impl ReforestationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReforestationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ReforestationSystem {
    fn name(&self) -> &str {
        "reforestation"
    }

    fn run(&self, ctx: &SystemContext, state: &mut YearlyState) -> SimulationResult<()> {
        state.total_reforested_area =
            accumulate_reforested_area(state.total_reforested_area, ctx.params.reforestation_rate);
        state.co2 = apply_reforestation_effect(
            state.co2,
            state.total_reforested_area,
            ctx.tables.forestation(),
        );
        Ok(())
    }
}
