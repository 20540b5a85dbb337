pub mod dispatch;
pub mod error;
pub mod heightmap;
pub mod neighborhood;
pub mod residency;
pub mod streaming;

pub use dispatch::{GenUniforms, GenerationBatch, GenerationRequest};
pub use error::StreamError;
pub use neighborhood::{desired_set, Neighborhood};
pub use residency::ResidencyMap;
pub use streaming::{ChunkStreamer, StreamStats};
