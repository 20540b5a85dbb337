use glam::IVec2;
use ridgeline_core::constants::{CHUNK_VERTEX_BYTES, CHUNK_VERTICES};
use ridgeline_core::error::RidgelineError;
use ridgeline_core::types::{ChunkCoord, Slot};

/// Fixed pool of chunk-sized vertex regions in a single GPU buffer.
///
/// The buffer is written by the generation kernel (storage) and read by the
/// terrain pipeline (vertex). It is created once; streaming only ever
/// rewrites slot contents.
pub struct TerrainPool {
    buffer: wgpu::Buffer,
    slot_count: u32,
    byte_size: u64,
    /// View center each slot's vertex data was generated against.
    /// `None` until the slot is first written.
    origins: Vec<Option<ChunkCoord>>,
}

impl TerrainPool {
    /// Allocate the pool. Fails if the device cannot bind a buffer this large.
    pub fn new(device: &wgpu::Device, slot_count: u32) -> Result<Self, RidgelineError> {
        let byte_size = Self::required_bytes(slot_count);
        let limits = device.limits();
        let limit = limits
            .max_buffer_size
            .min(limits.max_storage_buffer_binding_size as u64);
        if byte_size > limit {
            return Err(RidgelineError::BufferTooLarge {
                required: byte_size,
                limit,
            });
        }

        log::info!(
            "TerrainPool: {} slots, {} MB",
            slot_count,
            byte_size / (1024 * 1024)
        );

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("terrain-vertex-pool"),
            size: byte_size,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        Ok(Self {
            buffer,
            slot_count,
            byte_size,
            origins: vec![None; slot_count as usize],
        })
    }

    /// Total bytes needed for `slot_count` chunk slots.
    pub fn required_bytes(slot_count: u32) -> u64 {
        slot_count as u64 * CHUNK_VERTEX_BYTES
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    /// Byte offset of a slot within the pool buffer.
    pub fn slot_byte_offset(slot: Slot) -> u64 {
        slot as u64 * CHUNK_VERTEX_BYTES
    }

    /// First vertex of a slot, used as the base vertex of its draw call.
    pub fn slot_base_vertex(slot: Slot) -> i32 {
        (slot * CHUNK_VERTICES) as i32
    }

    /// Record the view center a slot was just generated against.
    pub fn set_slot_origin(&mut self, slot: Slot, origin: ChunkCoord) {
        if let Some(entry) = self.origins.get_mut(slot as usize) {
            *entry = Some(origin);
        }
    }

    pub fn slot_origin(&self, slot: Slot) -> Option<ChunkCoord> {
        self.origins.get(slot as usize).copied().flatten()
    }

    /// Per-slot translation from generation origin to `center`, in chunk
    /// units. Unwritten slots get zero; they are never drawn.
    pub fn slot_shifts(&self, center: ChunkCoord) -> impl Iterator<Item = IVec2> + '_ {
        self.origins
            .iter()
            .map(move |origin| origin.map_or(IVec2::ZERO, |o| o - center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridgeline_core::constants::MAX_CHUNK_SLOTS;

    #[test]
    fn test_slot_byte_offset() {
        assert_eq!(TerrainPool::slot_byte_offset(0), 0);
        assert_eq!(TerrainPool::slot_byte_offset(1), 1_310_720);
        assert_eq!(TerrainPool::slot_byte_offset(2), 2_621_440);
    }

    #[test]
    fn test_slot_base_vertex() {
        assert_eq!(TerrainPool::slot_base_vertex(0), 0);
        assert_eq!(TerrainPool::slot_base_vertex(3), 3 * 65_536);
    }

    #[test]
    fn test_full_pool_fits_default_storage_binding() {
        // 41 slots x 1.25 MB stays under the 128 MB default binding limit
        let bytes = TerrainPool::required_bytes(MAX_CHUNK_SLOTS);
        assert_eq!(bytes, 53_739_520);
        assert!(bytes <= wgpu::Limits::default().max_storage_buffer_binding_size as u64);
    }
}
