use std::collections::BTreeMap;

use crate::model::growth_factor;

/// Applies the global temperature increase uniformly to every country's baseline.
pub fn project_temperatures(
    base_temperatures: &BTreeMap<String, f64>,
    temperature_increase: f64,
) -> BTreeMap<String, f64> {
    base_temperatures
        .iter()
        .map(|(iso, base)| (iso.clone(), base + temperature_increase))
        .collect()
}

/// Compounds each baseline by the emission growth rate for `years_since_base` years.
pub fn project_emissions_per_capita(
    base_emissions_per_capita: &BTreeMap<String, f64>,
    co2_growth_rate: f64,
    years_since_base: u32,
) -> BTreeMap<String, f64> {
    let factor = growth_factor(co2_growth_rate).powi(years_since_base as i32);
    base_emissions_per_capita
        .iter()
        .map(|(iso, base)| (iso.clone(), base * factor))
        .collect()
}
