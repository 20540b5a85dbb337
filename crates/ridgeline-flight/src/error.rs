use ridgeline_core::error::{ConfigError, RidgelineError};
use ridgeline_world::StreamError;
use thiserror::Error;

/// Errors that end a flight run.
#[derive(Debug, Error)]
pub enum FlightError {
    #[error(transparent)]
    Gpu(#[from] RidgelineError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
