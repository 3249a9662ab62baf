use crate::{
    engine::{System, SystemContext},
    error::SimulationResult,
    model::next_global_emissions,
    world::YearlyState,
};

/// Grows the yearly emissions and adds them to the atmospheric pool.
pub struct EmissionsSystem;

impl EmissionsSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmissionsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for EmissionsSystem {
    fn name(&self) -> &str {
        "emissions"
    }

    fn run(&self, ctx: &SystemContext, state: &mut YearlyState) -> SimulationResult<()> {
        state.global_emissions =
            next_global_emissions(state.global_emissions, ctx.params.co2_growth_rate);
        state.co2 += state.global_emissions;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SimulationParameters, world::CountryTables};

    #[test]
    fn emissions_add_directly_to_pool() {
        let params = SimulationParameters::new(0.0, 0.0, 2025);
        let tables = CountryTables::new();
        let ctx = SystemContext {
            year: 2026,
            params: &params,
            tables: &tables,
        };
        let mut state = YearlyState {
            co2: 1_000.0,
            total_reforested_area: 0.0,
            global_emissions: 10.0,
            temperature_increase: 0.0,
        };
        EmissionsSystem::new().run(&ctx, &mut state).unwrap();
        assert_eq!(state.global_emissions, 10.0);
        assert_eq!(state.co2, 1_010.0);
    }
}
