use ridgeline_core::config::GenerationConfig;
use ridgeline_core::types::{ChunkCoord, Slot};

/// One chunk to (re)generate into a pool slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRequest {
    /// Chunk whose height field is generated.
    pub coord: ChunkCoord,
    /// Destination slot in the vertex pool.
    pub slot: Slot,
    /// View center the vertex positions are expressed relative to.
    pub origin: ChunkCoord,
    pub config: GenerationConfig,
}

/// GPU-uploadable generation parameters. Must match GenUniforms in generate.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GenUniforms {
    pub chunk: [i32; 2],
    pub origin: [i32; 2],
    pub slot: u32,
    pub octaves: u32,
    pub grid_size: f32,
    pub lacunarity: f32,
    pub gain: f32,
    pub _pad: [u32; 3],
}

impl GenerationRequest {
    pub fn uniforms(&self) -> GenUniforms {
        GenUniforms {
            chunk: self.coord.to_array(),
            origin: self.origin.to_array(),
            slot: self.slot,
            octaves: self.config.octaves,
            grid_size: self.config.grid_size as f32,
            lacunarity: self.config.lacunarity,
            gain: self.config.gain,
            _pad: [0; 3],
        }
    }
}

/// Requests produced by one streamer update, in slot-assignment order.
#[derive(Debug, Clone, Default)]
pub struct GenerationBatch {
    /// View center the batch was computed for.
    pub center: ChunkCoord,
    pub requests: Vec<GenerationRequest>,
    /// Chunks that lost their slot during this update.
    pub evicted: Vec<ChunkCoord>,
    /// True when every slot was assigned from scratch.
    pub cold_start: bool,
}

impl GenerationBatch {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationRequest> {
        self.requests.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_uniforms_size_is_uniform_aligned() {
        assert_eq!(std::mem::size_of::<GenUniforms>(), 48);
        assert_eq!(std::mem::size_of::<GenUniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_carry_request_fields() {
        let request = GenerationRequest {
            coord: IVec2::new(-3, 4),
            slot: 7,
            origin: IVec2::new(-2, 4),
            config: GenerationConfig {
                grid_size: 150,
                octaves: 9,
                lacunarity: 2.5,
                gain: 0.4,
            },
        };
        let u = request.uniforms();
        assert_eq!(u.chunk, [-3, 4]);
        assert_eq!(u.origin, [-2, 4]);
        assert_eq!(u.slot, 7);
        assert_eq!(u.octaves, 9);
        assert_eq!(u.grid_size, 150.0);
        assert_eq!(u.lacunarity, 2.5);
        assert_eq!(u.gain, 0.4);
    }

    #[test]
    fn test_uniform_bytes_layout() {
        let request = GenerationRequest {
            coord: IVec2::new(1, 2),
            slot: 3,
            origin: IVec2::ZERO,
            config: GenerationConfig::default(),
        };
        let uniforms = request.uniforms();
        let words: &[u32] = bytemuck::cast_slice(std::slice::from_ref(&uniforms));
        assert_eq!(words[0], 1);
        assert_eq!(words[1], 2);
        assert_eq!(words[4], 3);
        assert_eq!(words[5], 12);
        assert_eq!(f32::from_bits(words[6]), 200.0);
    }
}
