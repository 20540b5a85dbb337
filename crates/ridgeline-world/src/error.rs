use ridgeline_core::error::ConfigError;

/// Errors raised by the chunk streamer. All of them indicate a configuration
/// defect; none is expected at runtime with a consistent setup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    #[error("render radius {radius} outside supported range 0..={max}")]
    RadiusOutOfRange { radius: i32, max: i32 },

    #[error("{slots} slots cannot cover a radius-{radius} diamond of {required} chunks")]
    SlotCountMismatch {
        radius: i32,
        slots: u32,
        required: u32,
    },

    #[error("unbalanced update: {to_free} chunks to free vs {to_allocate} to allocate")]
    UnbalancedUpdate { to_free: usize, to_allocate: usize },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
