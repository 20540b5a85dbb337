use ridgeline_core::config::GenerationConfig;
use ridgeline_core::constants::*;
use ridgeline_core::types::{ChunkCoord, Vertex};

/// Host-side height field, the same recipe as generate.wgsl.
/// Used as the reference for the GPU kernel and for height queries on the CPU
/// (e.g. keeping the camera above ground).
///
/// Heights are in [0, 1]; the renderer scales them.
pub fn sample_height(world_x: i32, world_z: i32, config: &GenerationConfig) -> f32 {
    fbm_height(world_x as f32, world_z as f32, config)
}

/// Fractal sum of `config.octaves` layers of gradient noise, amplified,
/// clamped to [-1, 1] and remapped to [0, 1].
pub fn fbm_height(x: f32, z: f32, config: &GenerationConfig) -> f32 {
    let grid = config.grid_size as f32;
    let mut value = 0.0f32;
    let mut freq = 1.0f32;
    let mut amp = 1.0f32;

    for _ in 0..config.octaves {
        value += perlin(x * freq / grid, z * freq / grid) * amp;
        freq *= config.lacunarity;
        amp *= config.gain;
    }

    let value = (value * HEIGHT_AMPLIFY).clamp(-1.0, 1.0);
    (value + 1.0) * 0.5
}

/// 2D gradient noise. Zero on lattice points, roughly within [-0.71, 0.71].
pub fn perlin(x: f32, z: f32) -> f32 {
    let x0 = x.floor() as i32;
    let z0 = z.floor() as i32;
    let x1 = x0 + 1;
    let z1 = z0 + 1;

    let sx = x - x0 as f32;
    let sz = z - z0 as f32;

    let n0 = dot_grid_gradient(x0, z0, x, z);
    let n1 = dot_grid_gradient(x1, z0, x, z);
    let ix0 = interpolate(n0, n1, sx);

    let n0 = dot_grid_gradient(x0, z1, x, z);
    let n1 = dot_grid_gradient(x1, z1, x, z);
    let ix1 = interpolate(n0, n1, sx);

    interpolate(ix0, ix1, sz)
}

/// Unit gradient for a lattice point, from an integer hash of its coordinates.
fn random_gradient(ix: i32, iz: i32) -> (f32, f32) {
    let mut a = ix as u32;
    let mut b = iz as u32;

    a = a.wrapping_mul(3284157443);
    b ^= a.rotate_left(16);
    b = b.wrapping_mul(1911520717);
    a ^= b.rotate_left(16);
    a = a.wrapping_mul(2048419325);

    // [0, 2^32) -> [0, 2pi)
    let angle = a as f32 * (std::f32::consts::PI / 2_147_483_648.0);
    (angle.sin(), angle.cos())
}

fn dot_grid_gradient(ix: i32, iz: i32, x: f32, z: f32) -> f32 {
    let (gx, gz) = random_gradient(ix, iz);
    (x - ix as f32) * gx + (z - iz as f32) * gz
}

/// Cubic (smoothstep) interpolation between `a0` and `a1`.
fn interpolate(a0: f32, a1: f32, w: f32) -> f32 {
    (a1 - a0) * (3.0 - w * 2.0) * w * w + a0
}

/// Generate the `CHUNK_SIZE^2` vertices of one chunk, row-major with z outer.
///
/// Noise is sampled at absolute integer world positions so neighbouring
/// chunks agree on their shared edge; positions are emitted relative to
/// `origin` to keep them small.
pub fn generate_chunk_vertices(
    coord: ChunkCoord,
    origin: ChunkCoord,
    config: &GenerationConfig,
) -> Vec<Vertex> {
    let size = CHUNK_SIZE as i32;
    let span = CHUNK_SPAN as i32;
    let base_x = coord.x * span;
    let base_z = coord.y * span;
    let rel_x = ((coord.x - origin.x) * span) as f32;
    let rel_z = ((coord.y - origin.y) * span) as f32;

    let mut vertices = Vec::with_capacity(CHUNK_VERTICES as usize);
    for lz in 0..size {
        for lx in 0..size {
            let height = sample_height(base_x + lx, base_z + lz, config);
            vertices.push(Vertex {
                pos: [rel_x + lx as f32, height, rel_z + lz as f32],
                tex_coord: [lx as f32 / span as f32, lz as f32 / span as f32],
            });
        }
    }
    vertices
}

/// Triangle-list indices for one chunk grid; shared by every slot, which
/// offsets them with a base vertex at draw time.
pub fn generate_chunk_indices() -> Vec<u32> {
    let w = CHUNK_SIZE;
    let mut indices = Vec::with_capacity(CHUNK_INDEX_COUNT as usize);

    for j in 0..w - 1 {
        for i in 0..w - 1 {
            let tl = i + j * w;
            let tr = i + 1 + j * w;
            let bl = i + (j + 1) * w;
            let br = i + 1 + (j + 1) * w;

            indices.extend_from_slice(&[tl, bl, tr]);
            indices.extend_from_slice(&[bl, br, tr]);
        }
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn light_config() -> GenerationConfig {
        GenerationConfig {
            octaves: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_perlin_zero_on_lattice() {
        for (x, z) in [(0, 0), (3, -7), (-100, 42), (1_000, 1_000)] {
            assert_eq!(perlin(x as f32, z as f32), 0.0);
        }
    }

    #[test]
    fn test_perlin_bounded() {
        let mut max = 0.0f32;
        for i in 0..2000 {
            let x = i as f32 * 0.173 - 150.0;
            let z = i as f32 * 0.311 + 20.0;
            max = max.max(perlin(x, z).abs());
        }
        assert!(max <= 0.75, "got {max}");
        assert!(max > 0.05, "noise should not be flat, got {max}");
    }

    #[test]
    fn test_perlin_continuous_across_negative_cells() {
        let a = perlin(-0.0001, 0.5);
        let b = perlin(0.0001, 0.5);
        assert!((a - b).abs() < 1e-3, "{a} vs {b}");
    }

    #[test]
    fn test_height_in_unit_range() {
        let config = GenerationConfig::default();
        for i in -50..50 {
            let h = sample_height(i * 37, i * -53, &config);
            assert!((0.0..=1.0).contains(&h), "height {h}");
        }
    }

    #[test]
    fn test_zero_octaves_is_flat_midpoint() {
        let config = GenerationConfig {
            octaves: 0,
            ..Default::default()
        };
        assert_eq!(sample_height(123, 456, &config), 0.5);
    }

    #[test]
    fn test_height_deterministic() {
        let config = GenerationConfig::default();
        assert_eq!(
            sample_height(200_000, 200_000, &config),
            sample_height(200_000, 200_000, &config)
        );
    }

    #[test]
    fn test_chunk_vertex_count_and_layout() {
        let vertices = generate_chunk_vertices(IVec2::new(2, 3), IVec2::new(2, 3), &light_config());
        assert_eq!(vertices.len(), CHUNK_VERTICES as usize);
        assert_eq!(vertices[0].pos[0], 0.0);
        assert_eq!(vertices[0].pos[2], 0.0);
        let last = vertices[vertices.len() - 1];
        assert_eq!(last.pos[0], CHUNK_SPAN as f32);
        assert_eq!(last.pos[2], CHUNK_SPAN as f32);
        assert_eq!(last.tex_coord, [1.0, 1.0]);
        // Row-major with z outer
        assert_eq!(vertices[1].pos[0], 1.0);
        assert_eq!(vertices[CHUNK_SIZE as usize].pos[2], 1.0);
    }

    #[test]
    fn test_chunk_positions_relative_to_origin() {
        let origin = IVec2::new(784, 784);
        let vertices = generate_chunk_vertices(origin + IVec2::new(-1, 2), origin, &light_config());
        assert_eq!(vertices[0].pos[0], -(CHUNK_SPAN as f32));
        assert_eq!(vertices[0].pos[2], 2.0 * CHUNK_SPAN as f32);
    }

    #[test]
    fn test_neighbouring_chunks_share_edge_heights() {
        let config = light_config();
        let left = generate_chunk_vertices(IVec2::new(0, 0), IVec2::ZERO, &config);
        let right = generate_chunk_vertices(IVec2::new(1, 0), IVec2::ZERO, &config);
        let size = CHUNK_SIZE as usize;
        for z in 0..size {
            let a = left[z * size + size - 1];
            let b = right[z * size];
            assert_eq!(a.pos, b.pos, "row {z}");
        }
    }

    #[test]
    fn test_height_independent_of_origin() {
        let config = light_config();
        let a = generate_chunk_vertices(IVec2::new(5, 5), IVec2::ZERO, &config);
        let b = generate_chunk_vertices(IVec2::new(5, 5), IVec2::new(4, 6), &config);
        for (va, vb) in a.iter().zip(&b).step_by(997) {
            assert_eq!(va.pos[1], vb.pos[1]);
        }
    }

    #[test]
    fn test_index_count_and_first_quad() {
        let indices = generate_chunk_indices();
        assert_eq!(indices.len(), CHUNK_INDEX_COUNT as usize);
        let w = CHUNK_SIZE;
        assert_eq!(&indices[..6], &[0, w, 1, w, w + 1, 1]);
        let max = *indices.iter().max().expect("non-empty");
        assert_eq!(max, CHUNK_VERTICES - 1);
    }
}
