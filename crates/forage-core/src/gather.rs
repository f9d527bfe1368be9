//! The gather resolver.
//!
//! [`GatherEngine`] owns everything a gather attempt reads and writes: the
//! location store, the seeded stream, and the tuning. Terrain and time are
//! injected. One call to [`GatherEngine::gather`] runs the whole resolution
//! to completion:
//!
//! 1. biome lookup (no profile: `NoResourceHere`, nothing drawn or written);
//! 2. time-decayed depletion;
//! 3. depleted check (`LocationDepleted`, decayed level written back);
//! 4. success rate;
//! 5. success roll (miss: clock and count advance, depletion does not);
//! 6. resource selection, hint-biased when the terrain offers a hint;
//! 7. quantity roll over the depletion-shrunk range;
//! 8. capacity check (`InventoryFull`, nothing written);
//! 9. commit, depletion increase, and store maintenance.
//!
//! # Draw order
//!
//! Cross-engine agreement depends on every engine consuming the same number
//! of draws per call: one success roll, one hint-bias roll only when the
//! terrain hints at a resource the profile carries, one weighted-selection
//! roll unless the hint won, and one quantity roll. Branches that fail
//! before the success roll draw nothing.

use tracing::{debug, info, warn};

use forage_agents::InventorySink;
use forage_types::{Coord, GatherOutcome, GatherReport, LocationRecord, ResourceType, StoreMetrics};
use forage_world::catalog::{self, BiomeProfile, ResourceEntry};
use forage_world::resource::{after_gather, effective_depletion, shrink_quantity_range, success_rate};
use forage_world::{CleanupReport, GatherTuning, LocationStore, SeededRng, StoreConfig, Terrain, WorldError};

use crate::clock::Clock;
use crate::config::ForageConfig;

/// A successful gather.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gathered {
    /// The resource committed to the sink.
    pub resource: ResourceType,
    /// Units committed, at least 1.
    pub quantity: u32,
}

/// Why a gather attempt yielded nothing. Messages are player-facing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatherError {
    /// The tile has no resource profile (water, unknown biome, or no data).
    #[error("there is nothing to gather at {coord}")]
    NoResourceHere {
        /// The tile.
        coord: Coord,
    },

    /// The location is too exhausted to gather from.
    #[error("this spot is exhausted; come back later")]
    LocationDepleted {
        /// The tile.
        coord: Coord,
        /// Effective depletion at the time of the attempt.
        depletion: f64,
    },

    /// The success roll failed.
    #[error("you search but find nothing")]
    GatherMiss {
        /// The tile.
        coord: Coord,
        /// The drawn sample.
        roll: f64,
        /// The success rate it was compared against.
        rate: f64,
    },

    /// The sink has no room for the rolled yield.
    #[error("no room to carry {quantity} {resource}")]
    InventoryFull {
        /// The rolled resource.
        resource: ResourceType,
        /// The rolled quantity.
        quantity: u32,
    },

    /// The sink refused a yield that nominally fit.
    #[error("could not store {quantity} {resource}")]
    SinkRejected {
        /// The rolled resource.
        resource: ResourceType,
        /// The rolled quantity.
        quantity: u32,
    },
}

impl GatherError {
    /// The outcome label of this failure.
    pub const fn outcome(&self) -> GatherOutcome {
        match self {
            Self::NoResourceHere { .. } => GatherOutcome::NoResourceHere,
            Self::LocationDepleted { .. } => GatherOutcome::LocationDepleted,
            Self::GatherMiss { .. } => GatherOutcome::GatherMiss,
            Self::InventoryFull { .. } => GatherOutcome::InventoryFull,
            Self::SinkRejected { .. } => GatherOutcome::SinkRejected,
        }
    }
}

/// Deterministic gather resolver over an unbounded tile field.
#[derive(Debug)]
pub struct GatherEngine<T, C> {
    pub(crate) terrain: T,
    pub(crate) clock: C,
    pub(crate) rng: SeededRng,
    pub(crate) store: LocationStore,
    pub(crate) tuning: GatherTuning,
}

impl<T: Terrain, C: Clock> GatherEngine<T, C> {
    /// Engine with reference tuning and store settings.
    pub fn new(terrain: T, clock: C, seed: i64) -> Self {
        Self::with_settings(terrain, clock, seed, GatherTuning::default(), StoreConfig::default())
    }

    /// Engine with explicit tuning and store settings.
    pub fn with_settings(
        terrain: T,
        clock: C,
        seed: i64,
        tuning: GatherTuning,
        store_config: StoreConfig,
    ) -> Self {
        let now_ms = clock.now_ms();
        Self {
            terrain,
            clock,
            rng: SeededRng::new(seed),
            store: LocationStore::new(store_config, now_ms),
            tuning,
        }
    }

    /// Engine configured from a loaded [`ForageConfig`].
    pub fn from_config(terrain: T, clock: C, config: &ForageConfig) -> Self {
        Self::with_settings(
            terrain,
            clock,
            config.world.seed,
            config.gather.clone(),
            config.store,
        )
    }

    /// The injected terrain.
    pub const fn terrain(&self) -> &T {
        &self.terrain
    }

    /// The injected clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// The shared random stream.
    pub const fn rng(&self) -> &SeededRng {
        &self.rng
    }

    /// Active tuning.
    pub const fn tuning(&self) -> &GatherTuning {
        &self.tuning
    }

    /// The location store.
    pub const fn store(&self) -> &LocationStore {
        &self.store
    }

    /// Stored (undecayed) record for `coord`, or the fresh default.
    pub fn location_state(&self, coord: Coord) -> LocationRecord {
        self.store.get(coord)
    }

    /// Reseed the random stream. Location state is kept.
    pub fn reseed(&mut self, seed: i64) {
        self.rng.set_seed(seed);
        info!(seed, "Gather stream reseeded");
    }

    /// Resolve one gather attempt at `coord`, committing any yield to `sink`.
    pub fn gather<S: InventorySink + ?Sized>(
        &mut self,
        coord: Coord,
        sink: &mut S,
    ) -> Result<Gathered, GatherError> {
        let now_ms = self.clock.now_ms();

        let Some(reading) = self.terrain.biome_at(coord) else {
            debug!(%coord, "Gather: no terrain data");
            return Err(GatherError::NoResourceHere { coord });
        };
        let Some(profile) = catalog::biome_profile(&reading.biome).filter(|p| !p.resources.is_empty())
        else {
            debug!(%coord, biome = %reading.biome, "Gather: biome has no resources");
            return Err(GatherError::NoResourceHere { coord });
        };

        let record = self.store.get(coord);
        let elapsed_ms = now_ms.saturating_sub(record.last_gathered_ms);
        let depletion =
            effective_depletion(record.depletion_level, elapsed_ms, profile.regeneration_time_ms);

        if depletion >= self.tuning.depleted_threshold {
            self.store.put(
                coord,
                LocationRecord {
                    depletion_level: depletion,
                    ..record
                },
            );
            debug!(%coord, depletion, "Gather: location depleted");
            return Err(GatherError::LocationDepleted { coord, depletion });
        }

        let rate = success_rate(profile.base_success_rate, depletion, elapsed_ms, &self.tuning);
        let roll = self.rng.next_f64();
        if roll > rate {
            self.store.put(
                coord,
                LocationRecord {
                    last_gathered_ms: now_ms,
                    depletion_level: depletion,
                    total_gathers: record.total_gathers.saturating_add(1),
                },
            );
            debug!(%coord, roll, rate, "Gather: miss");
            return Err(GatherError::GatherMiss { coord, roll, rate });
        }

        let Some(entry) = self.select_resource(coord, &reading.biome, profile) else {
            return Err(GatherError::NoResourceHere { coord });
        };
        let resource = entry.resource;

        let (min_quantity, max_quantity) = shrink_quantity_range(
            entry.min_quantity,
            entry.max_quantity,
            depletion,
            self.tuning.quantity_shrink,
        );
        let drawn = self
            .rng
            .random_int(i64::from(min_quantity), i64::from(max_quantity));
        let quantity = u32::try_from(drawn).unwrap_or(min_quantity);

        if !sink.has_capacity(quantity) {
            // Location state is deliberately left untouched on this branch.
            debug!(%coord, %resource, quantity, "Gather: inventory full, location state unchanged");
            return Err(GatherError::InventoryFull { resource, quantity });
        }

        let receipt = sink.commit(resource, quantity);
        if !receipt.accepted {
            warn!(%coord, %resource, quantity, "Gather: sink rejected commit");
            return Err(GatherError::SinkRejected { resource, quantity });
        }

        let new_depletion = after_gather(depletion, profile.depletion_rate);
        self.store.put(
            coord,
            LocationRecord {
                last_gathered_ms: now_ms,
                depletion_level: new_depletion,
                total_gathers: record.total_gathers.saturating_add(1),
            },
        );
        self.store.maybe_cleanup(now_ms);

        debug!(
            %coord,
            %resource,
            quantity,
            depletion = new_depletion,
            held = receipt.held_after,
            "Gather: success"
        );
        Ok(Gathered { resource, quantity })
    }

    /// [`GatherEngine::gather`], flattened into a loggable report.
    pub fn gather_report<S: InventorySink + ?Sized>(&mut self, coord: Coord, sink: &mut S) -> GatherReport {
        match self.gather(coord, sink) {
            Ok(g) => GatherReport {
                coord,
                outcome: GatherOutcome::Gathered,
                resource: Some(g.resource),
                quantity: Some(g.quantity),
            },
            Err(e) => {
                let (resource, quantity) = match e {
                    GatherError::InventoryFull { resource, quantity }
                    | GatherError::SinkRejected { resource, quantity } => {
                        (Some(resource), Some(quantity))
                    }
                    GatherError::NoResourceHere { .. }
                    | GatherError::LocationDepleted { .. }
                    | GatherError::GatherMiss { .. } => (None, None),
                };
                GatherReport {
                    coord,
                    outcome: e.outcome(),
                    resource,
                    quantity,
                }
            }
        }
    }

    /// Hint-biased, then weighted, resource pick.
    fn select_resource(
        &mut self,
        coord: Coord,
        biome: &str,
        profile: &'static BiomeProfile,
    ) -> Option<&'static ResourceEntry> {
        let hinted = self
            .terrain
            .resource_hint(coord, biome, profile)
            .and_then(|hint| hint.resource)
            .and_then(|resource| profile.entry_for(resource));
        hinted
            .filter(|_entry| self.rng.next_f64() < self.tuning.hint_bias)
            .or_else(|| profile.pick_resource(self.rng.next_f64()))
    }

    /// Store size and activity counters.
    pub fn metrics(&self) -> StoreMetrics {
        self.store.metrics(self.clock.now_ms())
    }

    /// Run a maintenance pass now, regardless of interval or size.
    pub fn run_maintenance(&mut self) -> CleanupReport {
        self.store.cleanup(self.clock.now_ms())
    }

    /// Snapshot every stored location as JSON.
    pub fn serialize_location_states(&self) -> Result<String, WorldError> {
        self.store.serialize()
    }

    /// Replace location state from a snapshot. Returns the number of
    /// records loaded; on error the existing state is untouched.
    pub fn deserialize_location_states(&mut self, data: &str) -> Result<usize, WorldError> {
        match self.store.restore(data) {
            Ok(count) => {
                info!(count, "Location states restored");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Location state restore rejected; keeping existing state");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::arithmetic_side_effects,
    clippy::panic
)]
mod tests {
    use forage_agents::{CommitReceipt, Inventory};
    use forage_world::{BiomeReading, GlyphHint, StaticTerrain};

    use super::*;
    use crate::clock::ManualClock;

    const START_MS: u64 = 1_000_000;

    /// Terrain that always hints at one resource.
    struct HintTerrain {
        biome: &'static str,
        hint: ResourceType,
    }

    impl Terrain for HintTerrain {
        fn biome_at(&self, _coord: Coord) -> Option<BiomeReading> {
            Some(BiomeReading::new(self.biome))
        }

        fn resource_hint(&self, _coord: Coord, _biome: &str, _profile: &BiomeProfile) -> Option<GlyphHint> {
            Some(GlyphHint {
                resource: Some(self.hint),
                depleted: false,
            })
        }
    }

    /// Sink that claims room but refuses every commit.
    struct RefusingSink;

    impl InventorySink for RefusingSink {
        fn has_capacity(&self, _quantity: u32) -> bool {
            true
        }

        fn commit(&mut self, _resource: ResourceType, _quantity: u32) -> CommitReceipt {
            CommitReceipt {
                accepted: false,
                held_after: 0,
            }
        }
    }

    fn draws_after(seed: i64, n: usize) -> u32 {
        let mut rng = SeededRng::new(seed);
        for _ in 0..n {
            rng.next_f64();
        }
        rng.state()
    }

    fn forest_engine(clock: &ManualClock) -> GatherEngine<StaticTerrain, &ManualClock> {
        GatherEngine::new(StaticTerrain::uniform("forest"), clock, 12_345)
    }

    #[test]
    fn reference_forest_sequence() {
        let clock = ManualClock::new(START_MS);
        let mut engine = forest_engine(&clock);
        let mut inv = Inventory::new(100);
        let origin = Coord::new(0, 0);

        let first = engine.gather(origin, &mut inv).unwrap();
        assert_eq!(first, Gathered { resource: ResourceType::Wood, quantity: 1 });
        let state = engine.location_state(origin);
        assert_eq!(state.depletion_level, 0.1);
        assert_eq!(state.total_gathers, 1);
        assert_eq!(state.last_gathered_ms, START_MS);
        assert_eq!(engine.rng().state(), draws_after(12_345, 3));

        // Immediately again: depletion 0.1, rate 0.63, roll 0.4089 succeeds.
        let second = engine.gather(origin, &mut inv).unwrap();
        assert_eq!(second, Gathered { resource: ResourceType::Berries, quantity: 1 });
        assert!((engine.location_state(origin).depletion_level - 0.2).abs() < 1e-12);
        assert_eq!(engine.rng().state(), draws_after(12_345, 6));
        assert_eq!(inv.quantity(ResourceType::Wood), 1);
        assert_eq!(inv.quantity(ResourceType::Berries), 1);
    }

    #[test]
    fn no_profile_draws_and_writes_nothing() {
        let clock = ManualClock::new(START_MS);
        let mut inv = Inventory::new(10);

        let mut blank = GatherEngine::new(StaticTerrain::new(), &clock, 12_345);
        assert!(matches!(
            blank.gather(Coord::new(1, 1), &mut inv),
            Err(GatherError::NoResourceHere { .. })
        ));
        assert!(blank.store().is_empty());
        assert_eq!(blank.rng().state(), blank.rng().initial_state());

        let mut ocean = GatherEngine::new(StaticTerrain::uniform("ocean"), &clock, 12_345);
        let err = ocean.gather(Coord::new(1, 1), &mut inv).unwrap_err();
        assert_eq!(err.outcome(), GatherOutcome::NoResourceHere);
        assert!(ocean.store().is_empty());
        assert_eq!(ocean.rng().state(), ocean.rng().initial_state());
    }

    #[test]
    fn hint_in_profile_costs_one_draw_and_can_win() {
        let clock = ManualClock::new(START_MS);
        let terrain = HintTerrain { biome: "forest", hint: ResourceType::Berries };
        let mut engine = GatherEngine::new(terrain, &clock, 12_345);
        let mut inv = Inventory::new(100);
        // Roll 0.8818 succeeds, hint roll 0.3394 < 0.7 takes berries,
        // quantity roll 0.2536 over [1, 2] gives 1.
        let got = engine.gather(Coord::new(0, 0), &mut inv).unwrap();
        assert_eq!(got, Gathered { resource: ResourceType::Berries, quantity: 1 });
        assert_eq!(engine.rng().state(), draws_after(12_345, 3));
    }

    #[test]
    fn hint_outside_profile_draws_nothing_extra() {
        let clock = ManualClock::new(START_MS);
        let terrain = HintTerrain { biome: "forest", hint: ResourceType::Ore };
        let mut engine = GatherEngine::new(terrain, &clock, 12_345);
        let mut inv = Inventory::new(100);
        let got = engine.gather(Coord::new(0, 0), &mut inv).unwrap();
        assert_eq!(got.resource, ResourceType::Wood);
        assert_eq!(engine.rng().state(), draws_after(12_345, 3));
    }

    #[test]
    fn hint_fallthrough_costs_four_draws() {
        // Find a seed whose success roll passes and whose hint roll misses.
        let seed = (0_i64..10_000)
            .find(|&s| {
                let mut rng = SeededRng::new(s);
                rng.next_f64() <= 0.9 && rng.next_f64() >= 0.7
            })
            .unwrap();
        let clock = ManualClock::new(START_MS);
        let terrain = HintTerrain { biome: "forest", hint: ResourceType::Berries };
        let mut engine = GatherEngine::new(terrain, &clock, seed);
        let mut inv = Inventory::new(100);
        assert!(engine.gather(Coord::new(0, 0), &mut inv).is_ok());
        assert_eq!(engine.rng().state(), draws_after(seed, 4));
    }

    #[test]
    fn depleted_location_refuses_without_drawing() {
        let clock = ManualClock::new(START_MS);
        let mut engine = forest_engine(&clock);
        let mut inv = Inventory::new(10_000);
        let c = Coord::new(3, -2);

        let mut depleted = None;
        for _ in 0..200 {
            match engine.gather(c, &mut inv) {
                Err(GatherError::LocationDepleted { depletion, .. }) => {
                    depleted = Some(depletion);
                    break;
                }
                Ok(_) | Err(GatherError::GatherMiss { .. }) => {}
                Err(other) => panic!("unexpected outcome {other:?}"),
            }
        }
        let depletion = depleted.unwrap();
        assert!(depletion >= 0.8);

        let before = engine.location_state(c);
        let state_before = engine.rng().state();
        assert!(matches!(
            engine.gather(c, &mut inv),
            Err(GatherError::LocationDepleted { .. })
        ));
        assert_eq!(engine.rng().state(), state_before);
        assert_eq!(engine.location_state(c), before);
    }

    #[test]
    fn depleted_read_refresh_writes_only_depletion() {
        let clock = ManualClock::new(START_MS);
        let mut engine = forest_engine(&clock);
        let c = Coord::new(0, 0);
        engine.store.put(
            c,
            LocationRecord {
                last_gathered_ms: START_MS,
                depletion_level: 1.0,
                total_gathers: 9,
            },
        );
        clock.advance(30_000).unwrap();
        let mut inv = Inventory::new(10);
        let err = engine.gather(c, &mut inv).unwrap_err();
        let GatherError::LocationDepleted { depletion, .. } = err else {
            panic!("expected depleted, got {err:?}");
        };
        assert!((depletion - 0.9).abs() < 1e-12);
        let after = engine.location_state(c);
        assert_eq!(after.last_gathered_ms, START_MS);
        assert_eq!(after.total_gathers, 9);
        assert_eq!(after.depletion_level, depletion);
    }

    #[test]
    fn miss_advances_clock_and_count_only() {
        let clock = ManualClock::new(START_MS);
        let mut engine = forest_engine(&clock);
        let c = Coord::new(0, 0);
        // d = 0.6 at elapsed 0: rate = 0.7 - 0.42 = 0.28; roll 0.8818 misses.
        engine.store.put(
            c,
            LocationRecord {
                last_gathered_ms: START_MS,
                depletion_level: 0.6,
                total_gathers: 4,
            },
        );
        let mut inv = Inventory::new(10);
        let err = engine.gather(c, &mut inv).unwrap_err();
        assert_eq!(err.outcome(), GatherOutcome::GatherMiss);
        let after = engine.location_state(c);
        assert_eq!(after.total_gathers, 5);
        assert_eq!(after.depletion_level, 0.6);
        assert_eq!(engine.rng().state(), draws_after(12_345, 1));
        assert_eq!(inv.total_weight(), Some(0));
    }

    #[test]
    fn full_inventory_never_touches_location_state() {
        let clock = ManualClock::new(START_MS);
        let mut engine = forest_engine(&clock);
        let mut full = Inventory::new(0);
        let c = Coord::new(0, 0);

        let first = engine.gather(c, &mut full).unwrap_err();
        assert!(matches!(first, GatherError::InventoryFull { resource: ResourceType::Wood, quantity: 1 }));
        assert!(!engine.store().contains(c));

        for _ in 0..50 {
            let before = engine.location_state(c);
            if let Err(GatherError::InventoryFull { .. }) = engine.gather(c, &mut full) {
                assert_eq!(engine.location_state(c), before);
            }
        }
    }

    #[test]
    fn rejected_commit_is_reported_and_not_recorded() {
        let clock = ManualClock::new(START_MS);
        let mut engine = forest_engine(&clock);
        let c = Coord::new(0, 0);
        let err = engine.gather(c, &mut RefusingSink).unwrap_err();
        assert_eq!(err, GatherError::SinkRejected { resource: ResourceType::Wood, quantity: 1 });
        assert!(!engine.store().contains(c));
    }

    #[test]
    fn report_flattens_outcomes() {
        let clock = ManualClock::new(START_MS);
        let mut engine = forest_engine(&clock);
        let mut inv = Inventory::new(0);
        let report = engine.gather_report(Coord::new(0, 0), &mut inv);
        assert_eq!(report.outcome, GatherOutcome::InventoryFull);
        assert_eq!(report.resource, Some(ResourceType::Wood));
        assert_eq!(report.quantity, Some(1));
    }

    #[test]
    fn error_messages_are_presentable() {
        let err = GatherError::InventoryFull { resource: ResourceType::Stone, quantity: 3 };
        assert_eq!(err.to_string(), "no room to carry 3 stone");
        let err = GatherError::NoResourceHere { coord: Coord::new(1, -1) };
        assert_eq!(err.to_string(), "there is nothing to gather at (1, -1)");
    }

    #[test]
    fn reseed_restarts_stream() {
        let clock = ManualClock::new(START_MS);
        let mut engine = forest_engine(&clock);
        let mut inv = Inventory::new(100);
        engine.gather(Coord::new(0, 0), &mut inv).unwrap();
        engine.reseed(12_345);
        assert_eq!(engine.rng().state(), engine.rng().initial_state());
        assert_eq!(engine.location_state(Coord::new(0, 0)).total_gathers, 1);
    }
}
