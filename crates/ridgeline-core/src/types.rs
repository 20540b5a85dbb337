use glam::IVec2;

/// Chunk coordinate on the terrain grid: (x, z) in units of `CHUNK_SPAN`.
pub type ChunkCoord = IVec2;

/// Index of a chunk-sized region in the terrain vertex pool.
pub type Slot = u32;

/// Height-field vertex as laid out in the GPU vertex pool.
/// Must match the 5-float stride written by generate.wgsl.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub tex_coord: [f32; 2],
}
