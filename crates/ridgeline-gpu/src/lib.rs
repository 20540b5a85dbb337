pub mod buffers;
pub mod pipeline;

pub use buffers::TerrainPool;
pub use pipeline::TerrainGenerator;
