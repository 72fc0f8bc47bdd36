use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("run interrupted after {ticks} ticks")]
    Interrupted { ticks: u64 },
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("time step must be finite and > 0, got {0}")]
    NonPositiveDt(f64),
    #[error("history capacity must be >= 1")]
    InvalidHistory,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
