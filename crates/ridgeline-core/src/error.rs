use thiserror::Error;

/// Errors that can occur during GPU initialization and resource creation.
#[derive(Debug, Error)]
pub enum RidgelineError {
    #[error("GPU adapter not found: {0}")]
    AdapterNotFound(String),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequestFailed(String),

    #[error("terrain pool needs {required} bytes but the device allows {limit}")]
    BufferTooLarge { required: u64, limit: u64 },
}

/// Errors produced while reading or validating configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Failed to parse config RON: {0}")]
    Parse(String),

    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("invalid generation config: {0}")]
    InvalidGeneration(String),

    #[error("invalid viewer config: {0}")]
    InvalidViewer(String),
}
