use thiserror::Error;

/// Rejected configuration; raised before a run starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid number '{value}' in {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must contain at least one value")]
    EmptyList { field: &'static str },

    #[error("Too many {kind}: {count} (maximum {max})")]
    TooMany {
        kind: &'static str,
        count: usize,
        max: usize,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ConfigError::Validation(errors.to_string())
    }
}

/// Failure while handing a result series to its sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Sensor noise standard deviation must be finite and non-negative, got {0}")]
    InvalidNoise(f64),

    #[error("Invalid sensor noise: {0}")]
    Noise(#[from] rand_distr::NormalError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}
