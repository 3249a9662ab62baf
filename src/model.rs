//! Year-step formulas and the constants they are built from.
//!
//! The model is a single global CO2 pool: emissions grow geometrically and add straight to
//! the pool, reforested area subtracts a proportional share of the countries' absorption
//! potential, and temperature follows a logarithmic forcing of the pool's concentration.

use crate::world::{total_potential_ha, CountryForestationPotential};

pub const START_YEAR: u32 = 2025;
pub const END_YEAR: u32 = 2125;

pub const INITIAL_CO2_TONNES: f64 = 3_241_150_000_000.0;
pub const INITIAL_GLOBAL_EMISSIONS: f64 = 37_400_000_000.0;

pub const TONNES_PER_GIGATONNE: f64 = 1_000_000_000.0;
/// Gigatonnes of atmospheric CO2 per ppm.
pub const CO2_GT_PER_PPM: f64 = 7.81;
pub const PRE_INDUSTRIAL_CO2_PPM: f64 = 280.0;
/// W/m^2 per natural-log unit of concentration ratio.
pub const FORCING_SCALAR: f64 = 5.35;
/// Degrees C per W/m^2.
pub const CLIMATE_SENSITIVITY: f64 = 0.5;

pub const REFORESTATION_CEILING_HA: f64 = 566_000_000.0;
pub const HECTARES_PER_TREE_UNIT: f64 = 1_000_000.0;

pub fn growth_factor(co2_growth_rate: f64) -> f64 {
    1.0 + co2_growth_rate / 100.0
}

pub fn next_global_emissions(previous_emissions: f64, co2_growth_rate: f64) -> f64 {
    previous_emissions * growth_factor(co2_growth_rate)
}

/// Adds one year of planting. Once the previous total sits at the ceiling nothing is added,
/// and a partial year tops out at the ceiling: at 14 Mha/yr, 2066 adds 6 Mha and lands on
/// 566 Mha rather than 574 Mha.
pub fn accumulate_reforested_area(previous_area: f64, reforestation_rate: f64) -> f64 {
    if previous_area >= REFORESTATION_CEILING_HA {
        previous_area
    } else {
        (previous_area + reforestation_rate).min(REFORESTATION_CEILING_HA)
    }
}

/// Area credited with absorption: anything beyond the global potential has no effect.
pub fn effective_hectares(total_reforested_area: f64, total_potential_ha: f64) -> f64 {
    total_reforested_area.min(total_potential_ha)
}

/// Splits the effective area across countries by their share of the global potential.
/// Returns an empty list when the table carries no plantable area.
pub fn allocate_effective_hectares(
    total_reforested_area: f64,
    forestation: &[(String, CountryForestationPotential)],
) -> Vec<(String, f64)> {
    let total_potential = total_potential_ha(forestation);
    if total_potential <= 0.0 {
        return Vec::new();
    }
    let effective = effective_hectares(total_reforested_area, total_potential);
    forestation
        .iter()
        .map(|(iso, potential)| {
            let share = potential.hectare_capacity / total_potential;
            (iso.clone(), effective * share)
        })
        .collect()
}

pub fn apply_reforestation_effect(
    co2: f64,
    total_reforested_area: f64,
    forestation: &[(String, CountryForestationPotential)],
) -> f64 {
    let allocated = allocate_effective_hectares(total_reforested_area, forestation);
    let mut co2_after = co2;
    for ((_, potential), (_, allocated_ha)) in forestation.iter().zip(allocated.iter()) {
        if potential.hectare_capacity <= 0.0 {
            continue;
        }
        co2_after -= potential.absorption_per_ha() * allocated_ha;
    }
    co2_after
}

pub fn co2_tonnes_to_ppm(co2_tonnes: f64) -> f64 {
    let co2_gt = co2_tonnes / TONNES_PER_GIGATONNE;
    co2_gt / CO2_GT_PER_PPM
}

pub fn radiative_forcing(co2_ppm: f64) -> f64 {
    FORCING_SCALAR * (co2_ppm / PRE_INDUSTRIAL_CO2_PPM).ln()
}

/// Unchecked temperature formula. Non-finite for a pool at or below zero.
pub fn temperature_from_co2(co2_tonnes: f64) -> f64 {
    CLIMATE_SENSITIVITY * radiative_forcing(co2_tonnes_to_ppm(co2_tonnes))
}

pub fn checked_temperature_from_co2(co2_tonnes: f64) -> Option<f64> {
    if co2_tonnes_to_ppm(co2_tonnes) <= 0.0 {
        return None;
    }
    let temperature = temperature_from_co2(co2_tonnes);
    temperature.is_finite().then_some(temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_equal_countries() -> Vec<(String, CountryForestationPotential)> {
        vec![
            ("AAA".into(), CountryForestationPotential::new(400.0, 100.0)),
            ("BBB".into(), CountryForestationPotential::new(200.0, 100.0)),
        ]
    }

    #[test]
    fn temperature_is_zero_at_pre_industrial_concentration() {
        let tonnes = PRE_INDUSTRIAL_CO2_PPM * CO2_GT_PER_PPM * TONNES_PER_GIGATONNE;
        assert_relative_eq!(temperature_from_co2(tonnes), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn doubling_concentration_matches_log_forcing() {
        let tonnes = 2.0 * PRE_INDUSTRIAL_CO2_PPM * CO2_GT_PER_PPM * TONNES_PER_GIGATONNE;
        let expected = CLIMATE_SENSITIVITY * FORCING_SCALAR * 2.0_f64.ln();
        assert_relative_eq!(temperature_from_co2(tonnes), expected, epsilon = 1e-12);
    }

    #[test]
    fn empty_pool_has_no_temperature() {
        assert!(checked_temperature_from_co2(0.0).is_none());
        assert!(checked_temperature_from_co2(-5.0e12).is_none());
        assert!(checked_temperature_from_co2(INITIAL_CO2_TONNES).is_some());
    }

    #[test]
    fn emissions_grow_by_rate() {
        assert_eq!(next_global_emissions(100.0, 0.0), 100.0);
        assert_relative_eq!(next_global_emissions(100.0, 1.5), 101.5, epsilon = 1e-12);
        assert_relative_eq!(next_global_emissions(100.0, -3.0), 97.0, epsilon = 1e-12);
    }

    #[test]
    fn reforested_area_stops_at_ceiling() {
        assert_eq!(accumulate_reforested_area(0.0, 14_000_000.0), 14_000_000.0);
        assert_eq!(
            accumulate_reforested_area(560_000_000.0, 14_000_000.0),
            REFORESTATION_CEILING_HA
        );
        assert_eq!(
            accumulate_reforested_area(REFORESTATION_CEILING_HA, 14_000_000.0),
            REFORESTATION_CEILING_HA
        );
    }

    #[test]
    fn equal_capacities_split_effective_area_in_half() {
        let table = two_equal_countries();
        let allocated = allocate_effective_hectares(50.0, &table);
        assert_eq!(allocated[0].1, 25.0);
        assert_eq!(allocated[1].1, 25.0);

        let saturated = allocate_effective_hectares(1_000.0, &table);
        assert_eq!(saturated[0].1, 100.0);
        assert_eq!(saturated[1].1, 100.0);
    }

    #[test]
    fn absorption_saturates_at_global_potential() {
        let table = two_equal_countries();
        let at_potential = apply_reforestation_effect(10_000.0, 200.0, &table);
        let beyond = apply_reforestation_effect(10_000.0, 5_000.0, &table);
        assert_eq!(at_potential, 10_000.0 - 400.0 - 200.0);
        assert_eq!(at_potential, beyond);
    }

    #[test]
    fn degenerate_table_absorbs_nothing() {
        assert_eq!(apply_reforestation_effect(42.0, 1_000.0, &[]), 42.0);
        let zeroed = vec![("ZZZ".to_string(), CountryForestationPotential::new(5.0, 0.0))];
        assert_eq!(apply_reforestation_effect(42.0, 1_000.0, &zeroed), 42.0);
    }

    #[test]
    fn zero_capacity_entry_does_not_poison_the_sum() {
        let mut table = two_equal_countries();
        table.push(("ZZZ".into(), CountryForestationPotential::new(9.0, 0.0)));
        let result = apply_reforestation_effect(10_000.0, 200.0, &table);
        assert!(result.is_finite());
        assert_eq!(result, 10_000.0 - 400.0 - 200.0);
    }
}
