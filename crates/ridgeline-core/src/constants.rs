//! Single source of truth for shared constants.
//! Values used by WGSL are injected into shader preambles by
//! `shader_preamble()` so Rust and the kernels cannot drift apart.

/// Height-field vertices along one side of a chunk.
/// Must stay divisible by `GEN_WORKGROUP_SIZE`.
pub const CHUNK_SIZE: u32 = 256;

/// World units covered by one chunk along an axis. Neighbouring chunks share
/// their edge row of vertices, so the span is one less than the vertex count.
pub const CHUNK_SPAN: u32 = CHUNK_SIZE - 1;

/// Vertices per chunk (256^2).
pub const CHUNK_VERTICES: u32 = CHUNK_SIZE * CHUNK_SIZE;

/// Index count of one chunk mesh: two triangles per quad.
pub const CHUNK_INDEX_COUNT: u32 = (CHUNK_SIZE - 1) * (CHUNK_SIZE - 1) * 6;

/// Floats per vertex: position (3) + texture coordinate (2).
pub const VERTEX_FLOATS: u32 = 5;

/// Bytes per vertex.
pub const VERTEX_BYTES: u32 = VERTEX_FLOATS * 4;

/// Bytes of vertex data held by one slot.
pub const CHUNK_VERTEX_BYTES: u64 = CHUNK_VERTICES as u64 * VERTEX_BYTES as u64;

/// Largest supported render radius, in chunks (Manhattan distance).
pub const MAX_RENDER_RADIUS: i32 = 4;

/// Slots needed by the diamond of `MAX_RENDER_RADIUS`: 2R^2 + 2R + 1.
pub const MAX_CHUNK_SLOTS: u32 =
    (2 * MAX_RENDER_RADIUS * MAX_RENDER_RADIUS + 2 * MAX_RENDER_RADIUS + 1) as u32;

/// Compute workgroup edge for the generation kernel (8x8 threads).
pub const GEN_WORKGROUP_SIZE: u32 = 8;

/// Upper bound accepted for `GenerationConfig::octaves`.
pub const MAX_OCTAVES: u32 = 150;

/// Gain applied to the summed octaves before clamping to [-1, 1].
pub const HEIGHT_AMPLIFY: f32 = 1.2;

/// WGSL constant block prepended to every shader that touches chunk data.
pub fn shader_preamble() -> String {
    format!(
        "const CHUNK_SIZE: u32 = {CHUNK_SIZE}u;\n\
         const CHUNK_SPAN: f32 = {CHUNK_SPAN}.0;\n\
         const CHUNK_VERTICES: u32 = {CHUNK_VERTICES}u;\n\
         const VERTEX_FLOATS: u32 = {VERTEX_FLOATS}u;\n\
         const GEN_WORKGROUP_SIZE: u32 = {GEN_WORKGROUP_SIZE}u;\n\
         const HEIGHT_AMPLIFY: f32 = {HEIGHT_AMPLIFY:?};\n"
    )
}

const _: () = assert!(CHUNK_SIZE % GEN_WORKGROUP_SIZE == 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_chunk_slots_matches_diamond() {
        assert_eq!(MAX_CHUNK_SLOTS, 41);
    }

    #[test]
    fn test_chunk_sizes() {
        assert_eq!(CHUNK_VERTICES, 65_536);
        assert_eq!(CHUNK_VERTEX_BYTES, 1_310_720);
        assert_eq!(CHUNK_INDEX_COUNT, 255 * 255 * 6);
    }

    #[test]
    fn test_preamble_declares_constants() {
        let preamble = shader_preamble();
        assert!(preamble.contains("const CHUNK_SIZE: u32 = 256u;"));
        assert!(preamble.contains("const CHUNK_SPAN: f32 = 255.0;"));
        assert!(preamble.contains("const HEIGHT_AMPLIFY: f32 = 1.2;"));
        assert!(preamble.contains("const GEN_WORKGROUP_SIZE: u32 = 8u;"));
    }
}
