use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::validate_year,
    error::{SimulationError, SimulationResult},
    world::YearlyState,
};

/// The complete year-ordered series produced by one engine run. Rebuilt wholesale on every
/// parameter change and never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    states: BTreeMap<u32, YearlyState>,
}

impl Trajectory {
    pub(crate) fn from_states(states: impl IntoIterator<Item = (u32, YearlyState)>) -> Self {
        Self {
            states: states.into_iter().collect(),
        }
    }

    pub fn get(&self, year: u32) -> Option<&YearlyState> {
        self.states.get(&year)
    }

    pub fn state(&self, year: u32) -> SimulationResult<&YearlyState> {
        validate_year(year)?;
        self.get(year).ok_or(SimulationError::YearOutOfRange {
            year,
            start: self.first_year().unwrap_or(year),
            end: self.last_year().unwrap_or(year),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &YearlyState)> + '_ {
        self.states.iter().map(|(year, state)| (*year, state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first_year(&self) -> Option<u32> {
        self.states.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<u32> {
        self.states.keys().next_back().copied()
    }

    pub fn last(&self) -> Option<(u32, &YearlyState)> {
        self.states.iter().next_back().map(|(year, state)| (*year, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(temperature_increase: f64) -> YearlyState {
        YearlyState {
            co2: 0.0,
            total_reforested_area: 0.0,
            global_emissions: 0.0,
            temperature_increase,
        }
    }

    #[test]
    fn iterates_in_year_order() {
        let trajectory =
            Trajectory::from_states(vec![(2027, state(3.0)), (2025, state(1.0)), (2026, state(2.0))]);
        let years: Vec<u32> = trajectory.iter().map(|(year, _)| year).collect();
        assert_eq!(years, vec![2025, 2026, 2027]);
        assert_eq!(trajectory.last().map(|(year, _)| year), Some(2027));
    }

    #[test]
    fn state_rejects_years_outside_range() {
        let trajectory = Trajectory::from_states(vec![(2025, state(1.0))]);
        assert!(trajectory.state(2024).is_err());
        assert!(trajectory.state(2025).is_ok());
    }
}
