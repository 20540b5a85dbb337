use crate::constants::CHUNK_SPAN;
use crate::types::ChunkCoord;
use glam::{IVec2, Vec2, Vec3};

/// Number of grid points within Manhattan distance `radius` of a point:
/// 2R^2 + 2R + 1. Returns 0 for negative radii.
pub fn diamond_point_count(radius: i32) -> u32 {
    if radius < 0 {
        return 0;
    }
    let r = radius as u32;
    2 * r * r + 2 * r + 1
}

/// Taxicab distance between two chunk coordinates.
pub fn manhattan_distance(a: ChunkCoord, b: ChunkCoord) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chunk containing a world-space position. Y is ignored.
pub fn world_to_chunk(position: Vec3) -> ChunkCoord {
    let span = CHUNK_SPAN as f32;
    IVec2::new(
        (position.x / span).floor() as i32,
        (position.z / span).floor() as i32,
    )
}

/// World-space (x, z) of a chunk's first vertex.
pub fn chunk_to_world(coord: ChunkCoord) -> Vec2 {
    coord.as_vec2() * CHUNK_SPAN as f32
}

/// Translation of a chunk relative to an origin chunk, in world units.
/// Kept in integer chunk units until the final multiply so the result stays
/// small near the origin regardless of absolute position.
pub fn relative_offset(coord: ChunkCoord, origin: ChunkCoord) -> Vec2 {
    (coord - origin).as_vec2() * CHUNK_SPAN as f32
}
