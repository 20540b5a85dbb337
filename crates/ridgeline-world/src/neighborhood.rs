use glam::IVec2;
use ridgeline_core::types::ChunkCoord;
use std::collections::HashSet;

/// The set of chunks that should be resident around a view center:
/// every coordinate within Manhattan distance `radius`, center included.
///
/// Keeps both an ordered list (deterministic iteration, used for slot
/// assignment on cold start) and a hash set (membership while diffing).
#[derive(Debug, Clone)]
pub struct Neighborhood {
    center: ChunkCoord,
    order: Vec<ChunkCoord>,
    members: HashSet<ChunkCoord>,
}

impl Neighborhood {
    /// Build the neighbourhood from precomputed diamond offsets.
    pub fn from_offsets(center: ChunkCoord, offsets: &[IVec2]) -> Self {
        let order: Vec<ChunkCoord> = offsets.iter().map(|o| center + *o).collect();
        let members = order.iter().copied().collect();
        Self {
            center,
            order,
            members,
        }
    }

    pub fn center(&self) -> ChunkCoord {
        self.center
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.members.contains(coord)
    }

    /// Coordinates in enumeration order (x ascending, then z ascending).
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.order.iter().copied()
    }
}

/// Offsets of the radius-`radius` diamond relative to its center,
/// x ascending then z ascending.
pub fn diamond_offsets(radius: i32) -> Vec<IVec2> {
    let mut offsets = Vec::new();
    for dx in -radius..=radius {
        let reach = radius - dx.abs();
        for dz in -reach..=reach {
            offsets.push(IVec2::new(dx, dz));
        }
    }
    offsets
}

/// All coordinates within Manhattan distance `radius` of `center`.
pub fn desired_set(center: ChunkCoord, radius: i32) -> Neighborhood {
    Neighborhood::from_offsets(center, &diamond_offsets(radius))
}
