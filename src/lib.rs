pub mod allocation;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod projections;
pub mod scenario;
pub mod simulation;
pub mod snapshot;
pub mod systems;
pub mod tipping;
pub mod trajectory;
pub mod web;
pub mod world;

pub use config::SimulationParameters;
pub use engine::{Engine, EngineBuilder};
pub use error::{SimulationError, SimulationResult};
pub use simulation::{Simulation, SimulationBuilder, SimulationView};
pub use trajectory::Trajectory;
pub use world::{CountryForestationPotential, CountryTables, InitialState, YearlyState};
