pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod types;

pub use config::GenerationConfig;
pub use error::{ConfigError, RidgelineError};
pub use types::ChunkCoord;
