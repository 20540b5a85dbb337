use ridgeline_core::types::{ChunkCoord, Slot};
use std::collections::HashMap;

/// One-to-one mapping between resident chunk coordinates and pool slots.
pub struct ResidencyMap {
    by_coord: HashMap<ChunkCoord, Slot>,
    /// Reverse table indexed by slot. `None` marks a free slot.
    by_slot: Vec<Option<ChunkCoord>>,
}

impl ResidencyMap {
    pub fn with_capacity(slot_capacity: u32) -> Self {
        Self {
            by_coord: HashMap::with_capacity(slot_capacity as usize),
            by_slot: vec![None; slot_capacity as usize],
        }
    }

    /// Record `coord` as resident in `slot`.
    /// Both the coordinate and the slot must currently be unmapped.
    pub fn insert(&mut self, coord: ChunkCoord, slot: Slot) {
        debug_assert!(
            !self.by_coord.contains_key(&coord),
            "chunk {coord} already resident"
        );
        debug_assert!(
            self.by_slot[slot as usize].is_none(),
            "slot {slot} already occupied"
        );
        self.by_coord.insert(coord, slot);
        self.by_slot[slot as usize] = Some(coord);
    }

    /// Drop a resident chunk. Returns the slot it occupied.
    pub fn remove(&mut self, coord: &ChunkCoord) -> Option<Slot> {
        let slot = self.by_coord.remove(coord)?;
        self.by_slot[slot as usize] = None;
        Some(slot)
    }

    /// Forget every resident chunk. Slot contents are left as they are;
    /// they are simply no longer considered valid.
    pub fn clear(&mut self) {
        self.by_coord.clear();
        self.by_slot.iter_mut().for_each(|s| *s = None);
    }

    pub fn slot_of(&self, coord: &ChunkCoord) -> Option<Slot> {
        self.by_coord.get(coord).copied()
    }

    pub fn coord_in(&self, slot: Slot) -> Option<ChunkCoord> {
        self.by_slot.get(slot as usize).copied().flatten()
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.by_coord.contains_key(coord)
    }

    /// Resident (coord, slot) pairs in ascending slot order.
    pub fn iter_by_slot(&self) -> impl Iterator<Item = (ChunkCoord, Slot)> + '_ {
        self.by_slot
            .iter()
            .enumerate()
            .filter_map(|(slot, coord)| coord.map(|c| (c, slot as Slot)))
    }

    /// Alias of `iter_by_slot`.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkCoord, Slot)> + '_ {
        self.iter_by_slot()
    }

    /// Occupied slots in ascending order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.iter_by_slot().map(|(_, slot)| slot)
    }

    /// Resident chunk coordinates in arbitrary order.
    pub fn coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.by_coord.keys()
    }

    pub fn len(&self) -> usize {
        self.by_coord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_coord.is_empty()
    }

    pub fn slot_capacity(&self) -> u32 {
        self.by_slot.len() as u32
    }

    pub fn free_slot_count(&self) -> u32 {
        self.slot_capacity() - self.len() as u32
    }
}
