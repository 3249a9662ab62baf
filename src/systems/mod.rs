mod emissions;
mod reforestation;
mod temperature;

pub use emissions::EmissionsSystem;
pub use reforestation::ReforestationSystem;
pub use temperature::TemperatureSystem;
