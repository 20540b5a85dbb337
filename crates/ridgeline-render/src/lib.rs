pub mod renderer;
pub mod shading;

pub use renderer::{FrameUniforms, TerrainRenderer, DEPTH_FORMAT};
pub use shading::ShadingParams;
