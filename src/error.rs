use thiserror::Error;

/// Errors raised by the trajectory engine and its boundary checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("year {year} is outside the simulated range {start}..={end}")]
    YearOutOfRange { year: u32, start: u32, end: u32 },
    #[error("temperature for year {year} is not finite (co2 = {co2} t); check the model constants")]
    NonFiniteTemperature { year: u32, co2: f64 },
    #[error("country {iso} defined more than once")]
    DuplicateCountry { iso: String },
    #[error("country {iso} is invalid: {reason}")]
    InvalidCountry { iso: String, reason: String },
}

pub type SimulationResult<T> = Result<T, SimulationError>;
