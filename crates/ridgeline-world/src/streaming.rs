use glam::IVec2;
use ridgeline_core::config::GenerationConfig;
use ridgeline_core::constants::MAX_RENDER_RADIUS;
use ridgeline_core::math::diamond_point_count;
use ridgeline_core::types::{ChunkCoord, Slot};

use crate::dispatch::{GenerationBatch, GenerationRequest};
use crate::error::StreamError;
use crate::neighborhood::{diamond_offsets, Neighborhood};
use crate::residency::ResidencyMap;

/// Running totals for debug display and flight reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub updates: u64,
    pub requests: u64,
    pub cold_starts: u64,
}

/// Keeps a fixed pool of chunk slots populated with the diamond of chunks
/// around the view center.
///
/// Each `update` diffs the desired neighbourhood against the resident set,
/// hands the slots of chunks that left the diamond to chunks that entered it,
/// and returns one generation request per reassigned slot. The slot count is
/// exactly the diamond's point count, so once the pool is full every eviction
/// is matched by exactly one allocation.
pub struct ChunkStreamer {
    radius: i32,
    offsets: Vec<IVec2>,
    residency: ResidencyMap,
    current_center: Option<ChunkCoord>,
    config: GenerationConfig,
    stats: StreamStats,
}

impl ChunkStreamer {
    /// Create a streamer whose slot count is derived from the radius.
    pub fn new(radius: i32) -> Result<Self, StreamError> {
        Self::with_slot_count(radius, diamond_point_count(radius))
    }

    /// Create a streamer for an externally sized pool. The slot count must
    /// equal the radius-`radius` diamond, otherwise updates could not cover
    /// the desired set.
    pub fn with_slot_count(radius: i32, slots: u32) -> Result<Self, StreamError> {
        if !(0..=MAX_RENDER_RADIUS).contains(&radius) {
            return Err(StreamError::RadiusOutOfRange {
                radius,
                max: MAX_RENDER_RADIUS,
            });
        }
        let required = diamond_point_count(radius);
        if slots != required {
            return Err(StreamError::SlotCountMismatch {
                radius,
                slots,
                required,
            });
        }

        log::info!("ChunkStreamer: radius {radius}, {slots} slots");

        Ok(Self {
            radius,
            offsets: diamond_offsets(radius),
            residency: ResidencyMap::with_capacity(slots),
            current_center: None,
            config: GenerationConfig::default(),
            stats: StreamStats::default(),
        })
    }

    /// Bring residency in line with the diamond around `center`.
    ///
    /// Returns the generation requests the caller must dispatch before
    /// drawing the affected slots. On error nothing has been modified.
    pub fn update(&mut self, center: ChunkCoord) -> Result<GenerationBatch, StreamError> {
        let desired = Neighborhood::from_offsets(center, &self.offsets);

        let to_allocate: Vec<ChunkCoord> = desired
            .iter()
            .filter(|coord| !self.residency.contains(coord))
            .collect();
        let to_free: Vec<(ChunkCoord, Slot)> = self
            .residency
            .iter_by_slot()
            .filter(|(coord, _)| !desired.contains(coord))
            .collect();

        let mut batch = GenerationBatch {
            center,
            evicted: to_free.iter().map(|(coord, _)| *coord).collect(),
            ..Default::default()
        };

        let pairings: Vec<(ChunkCoord, Slot)> = if to_free.len() == to_allocate.len() {
            // Free before allocate: a slot is unmapped before it is handed on.
            for (coord, _) in &to_free {
                self.residency.remove(coord);
            }
            to_allocate
                .into_iter()
                .zip(to_free.into_iter().map(|(_, slot)| slot))
                .collect()
        } else if to_allocate.len() == self.chunk_count() as usize {
            log::info!(
                "ChunkStreamer: cold start at {center}, populating {} slots",
                to_allocate.len()
            );
            self.residency.clear();
            batch.cold_start = true;
            self.stats.cold_starts += 1;
            desired
                .iter()
                .enumerate()
                .map(|(i, coord)| (coord, i as Slot))
                .collect()
        } else {
            log::error!(
                "ChunkStreamer: {} chunks to free but {} to allocate at {center} (radius {}, {} slots)",
                to_free.len(),
                to_allocate.len(),
                self.radius,
                self.chunk_count()
            );
            return Err(StreamError::UnbalancedUpdate {
                to_free: to_free.len(),
                to_allocate: to_allocate.len(),
            });
        };

        batch.requests.reserve(pairings.len());
        for (coord, slot) in pairings {
            self.residency.insert(coord, slot);
            batch.requests.push(GenerationRequest {
                coord,
                slot,
                origin: center,
                config: self.config,
            });
        }

        self.current_center = Some(center);
        self.stats.updates += 1;
        self.stats.requests += batch.requests.len() as u64;

        if !batch.is_empty() {
            log::debug!(
                "ChunkStreamer: center {center}, {} generated, {} evicted",
                batch.requests.len(),
                batch.evicted.len()
            );
        }

        Ok(batch)
    }

    /// Invalidate every resident chunk. The next `update` repopulates all
    /// slots from scratch.
    pub fn clear(&mut self) {
        self.residency.clear();
    }

    /// Replace the generation parameters. Previously generated heights are
    /// stale, so the cache is cleared.
    pub fn set_config(&mut self, config: GenerationConfig) -> Result<(), StreamError> {
        config.validate()?;
        log::info!("ChunkStreamer: generation config changed to {config:?}");
        self.config = config;
        self.clear();
        Ok(())
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Number of slots in the pool (the diamond's point count).
    pub fn chunk_count(&self) -> u32 {
        self.residency.slot_capacity()
    }

    /// Center passed to the last successful `update`.
    pub fn current_center(&self) -> Option<ChunkCoord> {
        self.current_center
    }

    pub fn residency(&self) -> &ResidencyMap {
        &self.residency
    }

    pub fn is_resident(&self, coord: &ChunkCoord) -> bool {
        self.residency.contains(coord)
    }

    /// Slots holding valid chunk data, ascending. One draw call each.
    pub fn occupied_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.residency.occupied_slots()
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::desired_set;
    use std::collections::HashSet;

    fn resident_set(streamer: &ChunkStreamer) -> HashSet<ChunkCoord> {
        streamer.residency().coords().copied().collect()
    }

    fn assert_bijective(streamer: &ChunkStreamer) {
        let map = streamer.residency();
        let slots: HashSet<Slot> = map.occupied_slots().collect();
        assert_eq!(slots.len(), map.len(), "slot assignment must be injective");
        for (coord, slot) in map.iter_by_slot() {
            assert_eq!(map.slot_of(&coord), Some(slot));
            assert!(slot < streamer.chunk_count());
        }
    }

    #[test]
    fn test_new_derives_chunk_count_from_radius() {
        for (radius, count) in [(1, 5), (2, 13), (3, 25), (4, 41)] {
            let streamer = ChunkStreamer::new(radius).expect("valid radius");
            assert_eq!(streamer.chunk_count(), count);
        }
    }

    #[test]
    fn test_mismatched_slot_count_rejected() {
        let err = ChunkStreamer::with_slot_count(4, 40).err();
        assert_eq!(
            err,
            Some(StreamError::SlotCountMismatch {
                radius: 4,
                slots: 40,
                required: 41,
            })
        );
        assert!(ChunkStreamer::with_slot_count(4, 41).is_ok());
    }

    #[test]
    fn test_radius_out_of_range_rejected() {
        assert!(matches!(
            ChunkStreamer::new(-1),
            Err(StreamError::RadiusOutOfRange { .. })
        ));
        assert!(matches!(
            ChunkStreamer::new(MAX_RENDER_RADIUS + 1),
            Err(StreamError::RadiusOutOfRange { .. })
        ));
    }

    #[test]
    fn test_cold_start_populates_every_slot() {
        let mut streamer = ChunkStreamer::new(2).expect("streamer");
        let batch = streamer.update(IVec2::ZERO).expect("update");

        assert!(batch.cold_start);
        assert_eq!(batch.len(), 13);
        assert!(batch.evicted.is_empty());

        let requested: HashSet<ChunkCoord> = batch.iter().map(|r| r.coord).collect();
        let expected: HashSet<ChunkCoord> = desired_set(IVec2::ZERO, 2).iter().collect();
        assert_eq!(requested, expected);
        for r in batch.iter() {
            assert!(r.coord.x.abs() + r.coord.y.abs() <= 2);
        }

        // Slot i goes to the i-th coordinate of the desired set
        for (i, (request, coord)) in batch
            .iter()
            .zip(desired_set(IVec2::ZERO, 2).iter())
            .enumerate()
        {
            assert_eq!(request.slot, i as Slot);
            assert_eq!(request.coord, coord);
        }
        assert_eq!(streamer.current_center(), Some(IVec2::ZERO));
        assert_bijective(&streamer);
    }

    #[test]
    fn test_single_step_reuses_freed_slots() {
        let mut streamer = ChunkStreamer::new(2).expect("streamer");
        streamer.update(IVec2::ZERO).expect("cold start");

        let leaving = [
            IVec2::new(-2, 0),
            IVec2::new(-1, 1),
            IVec2::new(-1, -1),
            IVec2::new(0, 2),
            IVec2::new(0, -2),
        ];
        let freed: HashSet<Slot> = leaving
            .iter()
            .map(|c| streamer.residency().slot_of(c).expect("resident"))
            .collect();

        let batch = streamer.update(IVec2::new(1, 0)).expect("step");
        assert!(!batch.cold_start);
        assert_eq!(batch.len(), 5);

        let entering: HashSet<ChunkCoord> = batch.iter().map(|r| r.coord).collect();
        let expected: HashSet<ChunkCoord> = [
            IVec2::new(3, 0),
            IVec2::new(2, 1),
            IVec2::new(2, -1),
            IVec2::new(1, 2),
            IVec2::new(1, -2),
        ]
        .into_iter()
        .collect();
        assert_eq!(entering, expected);

        let reused: HashSet<Slot> = batch.iter().map(|r| r.slot).collect();
        assert_eq!(reused, freed);

        let evicted: HashSet<ChunkCoord> = batch.evicted.iter().copied().collect();
        assert_eq!(evicted, leaving.into_iter().collect());

        assert_eq!(streamer.residency().len(), 13);
        let shifted: HashSet<ChunkCoord> = desired_set(IVec2::new(1, 0), 2).iter().collect();
        assert_eq!(resident_set(&streamer), shifted);
        assert_bijective(&streamer);
    }

    #[test]
    fn test_requests_carry_view_center_and_config() {
        let mut streamer = ChunkStreamer::new(1).expect("streamer");
        let config = GenerationConfig {
            octaves: 4,
            ..Default::default()
        };
        streamer.set_config(config).expect("valid config");
        let center = IVec2::new(784, 784);
        let batch = streamer.update(center).expect("update");
        assert_eq!(batch.center, center);
        for request in batch.iter() {
            assert_eq!(request.origin, center);
            assert_eq!(request.config, config);
        }
    }

    #[test]
    fn test_repeated_update_is_idempotent() {
        let mut streamer = ChunkStreamer::new(4).expect("streamer");
        let center = IVec2::new(10, -3);
        streamer.update(center).expect("first");
        let before: Vec<_> = streamer.residency().iter_by_slot().collect();

        let batch = streamer.update(center).expect("second");
        assert!(batch.is_empty());
        assert!(batch.evicted.is_empty());
        assert!(!batch.cold_start);
        let after: Vec<_> = streamer.residency().iter_by_slot().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_clear_forces_full_cold_start() {
        let mut streamer = ChunkStreamer::new(4).expect("streamer");
        streamer.update(IVec2::ZERO).expect("first");
        streamer.update(IVec2::new(0, 1)).expect("step");

        streamer.clear();
        assert!(streamer.residency().is_empty());

        let center = IVec2::new(0, 1);
        let batch = streamer.update(center).expect("after clear");
        assert!(batch.cold_start);
        assert_eq!(batch.len(), 41);
        let requested: HashSet<ChunkCoord> = batch.iter().map(|r| r.coord).collect();
        let expected: HashSet<ChunkCoord> = desired_set(center, 4).iter().collect();
        assert_eq!(requested, expected);
        assert_eq!(streamer.stats().cold_starts, 2);
        assert_bijective(&streamer);
    }

    #[test]
    fn test_axis_step_is_incremental_for_every_radius() {
        for radius in 1..=MAX_RENDER_RADIUS {
            let mut streamer = ChunkStreamer::new(radius).expect("streamer");
            streamer.update(IVec2::ZERO).expect("cold start");
            let steps = [
                IVec2::new(1, 0),
                IVec2::new(1, 1),
                IVec2::new(0, 1),
                IVec2::new(0, 0),
                IVec2::new(-1, 0),
            ];
            for center in steps {
                let batch = streamer.update(center).expect("step");
                // A unit step of a radius-R diamond swaps exactly 2R+1 chunks
                assert_eq!(batch.len(), (2 * radius + 1) as usize, "radius {radius}");
                assert_eq!(batch.evicted.len(), batch.len());
                let expected: HashSet<ChunkCoord> = desired_set(center, radius).iter().collect();
                assert_eq!(resident_set(&streamer), expected);
                assert_bijective(&streamer);
            }
        }
    }

    #[test]
    fn test_teleport_regenerates_every_chunk_without_cold_start() {
        let mut streamer = ChunkStreamer::new(3).expect("streamer");
        streamer.update(IVec2::ZERO).expect("cold start");
        let batch = streamer.update(IVec2::new(500, -500)).expect("teleport");
        assert!(!batch.cold_start);
        assert_eq!(batch.len(), 25);
        let expected: HashSet<ChunkCoord> = desired_set(IVec2::new(500, -500), 3).iter().collect();
        assert_eq!(resident_set(&streamer), expected);
        assert_bijective(&streamer);
    }

    #[test]
    fn test_random_walk_keeps_invariants() {
        let mut streamer = ChunkStreamer::new(4).expect("streamer");
        let mut center = IVec2::ZERO;
        // Deterministic LCG walk over single-axis and diagonal steps
        let mut rng = 0x2545_f491_u64;
        for _ in 0..200 {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let step = match (rng >> 33) % 6 {
                0 => IVec2::new(1, 0),
                1 => IVec2::new(-1, 0),
                2 => IVec2::new(0, 1),
                3 => IVec2::new(0, -1),
                4 => IVec2::new(1, 1),
                _ => IVec2::ZERO,
            };
            center += step;
            streamer.update(center).expect("walk step");
            assert_eq!(streamer.residency().len(), 41);
            let expected: HashSet<ChunkCoord> = desired_set(center, 4).iter().collect();
            assert_eq!(resident_set(&streamer), expected);
            assert_bijective(&streamer);
        }
    }

    #[test]
    fn test_unbalanced_update_is_reported_without_mutation() {
        let mut streamer = ChunkStreamer::new(2).expect("streamer");
        streamer.update(IVec2::ZERO).expect("cold start");

        // Lose one resident chunk behind the streamer's back
        streamer.residency.remove(&IVec2::new(0, 0));
        let before: Vec<_> = streamer.residency().iter_by_slot().collect();

        // The lost chunk is back in range, so one more allocation than evictions
        let err = streamer.update(IVec2::new(1, 0)).err();
        assert_eq!(
            err,
            Some(StreamError::UnbalancedUpdate {
                to_free: 5,
                to_allocate: 6,
            })
        );
        let after: Vec<_> = streamer.residency().iter_by_slot().collect();
        assert_eq!(before, after);
        assert_eq!(streamer.current_center(), Some(IVec2::ZERO));
    }

    #[test]
    fn test_set_config_clears_cache() {
        let mut streamer = ChunkStreamer::new(1).expect("streamer");
        streamer.update(IVec2::ZERO).expect("cold start");
        assert_eq!(streamer.residency().len(), 5);

        let config = GenerationConfig {
            grid_size: 350,
            ..Default::default()
        };
        streamer.set_config(config).expect("valid");
        assert!(streamer.residency().is_empty());
        assert_eq!(streamer.config(), &config);

        let batch = streamer.update(IVec2::ZERO).expect("regenerate");
        assert!(batch.cold_start);
        assert_eq!(batch.len(), 5);
    }

    #[test]
    fn test_invalid_config_rejected_and_cache_kept() {
        let mut streamer = ChunkStreamer::new(1).expect("streamer");
        streamer.update(IVec2::ZERO).expect("cold start");
        let bad = GenerationConfig {
            grid_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            streamer.set_config(bad),
            Err(StreamError::InvalidConfig(_))
        ));
        assert_eq!(streamer.residency().len(), 5);
        assert_eq!(streamer.config(), &GenerationConfig::default());
    }

    #[test]
    fn test_occupied_slots_cover_whole_pool_after_update() {
        let mut streamer = ChunkStreamer::new(3).expect("streamer");
        assert_eq!(streamer.occupied_slots().count(), 0);
        streamer.update(IVec2::new(2, 2)).expect("update");
        let slots: Vec<Slot> = streamer.occupied_slots().collect();
        assert_eq!(slots, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_stats_accumulate() {
        let mut streamer = ChunkStreamer::new(2).expect("streamer");
        streamer.update(IVec2::ZERO).expect("cold");
        streamer.update(IVec2::new(1, 0)).expect("step");
        streamer.update(IVec2::new(1, 0)).expect("idle");
        assert_eq!(
            streamer.stats(),
            StreamStats {
                updates: 3,
                requests: 13 + 5,
                cold_starts: 1,
            }
        );
    }
}
