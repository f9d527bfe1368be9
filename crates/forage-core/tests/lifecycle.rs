//! Depletion and regeneration lifecycle of single locations, and the
//! bounds every gather must respect.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::arithmetic_side_effects,
    clippy::panic
)]

use forage_agents::{Inventory, InventorySink};
use forage_core::{GatherEngine, GatherError, ManualClock};
use forage_types::{Coord, DepletionStage, ResourceType};
use forage_world::catalog;
use forage_world::{GatherTuning, StaticTerrain, StoreConfig};

const START_MS: u64 = 1_700_000_000_000;

#[test]
fn depletion_rises_only_on_success_and_decays_with_time() {
    let clock = ManualClock::new(START_MS);
    let mut engine = GatherEngine::new(StaticTerrain::uniform("forest"), &clock, 12_345);
    let mut inventory = Inventory::new(10_000);
    let c = Coord::new(0, 0);

    let mut depleted = false;
    for _ in 0..300 {
        let before = engine.location_state(c);
        let outcome = engine.gather(c, &mut inventory);
        let after = engine.location_state(c);
        assert!((0.0..=1.0).contains(&after.depletion_level));
        match outcome {
            Ok(_) => assert!(after.depletion_level > before.depletion_level),
            Err(GatherError::GatherMiss { .. }) => {
                assert!(after.depletion_level <= before.depletion_level);
            }
            Err(GatherError::LocationDepleted { depletion, .. }) => {
                assert!(depletion >= 0.8);
                assert_eq!(after.total_gathers, before.total_gathers);
                depleted = true;
                break;
            }
            Err(other) => panic!("unexpected outcome {other:?}"),
        }
    }
    assert!(depleted);

    let report = engine.examine(c).unwrap();
    assert_eq!(report.stage, DepletionStage::Depleted);

    // Idle decay never increases depletion and reaches zero after a full
    // regeneration period.
    let mut last = report.depletion;
    for _ in 0..10 {
        clock.advance(30_000).unwrap();
        let d = engine.examine(c).unwrap().depletion;
        assert!(d <= last);
        last = d;
    }
    assert_eq!(engine.examine(c).unwrap().depletion, 0.0);
    assert_eq!(engine.examine(c).unwrap().stage, DepletionStage::Fresh);
    // History survives regeneration.
    assert!(engine.location_state(c).total_gathers >= 9);
}

#[test]
fn gathered_quantities_stay_in_shrunk_range() {
    let clock = ManualClock::new(START_MS);
    let mut engine = GatherEngine::new(StaticTerrain::uniform("mountain"), &clock, 77);
    let mountain = catalog::biome_profile("mountain").unwrap();
    let mut inventory = Inventory::new(100_000);

    for i in 0..600 {
        let c = Coord::new(i % 4, 0);
        let depletion = engine.examine(c).unwrap().depletion;
        if let Ok(g) = engine.gather(c, &mut inventory) {
            let entry = mountain.entry_for(g.resource).unwrap();
            let (lo, hi) = forage_world::resource::shrink_quantity_range(
                entry.min_quantity,
                entry.max_quantity,
                depletion,
                0.5,
            );
            assert!(g.quantity >= 1);
            assert!(g.quantity >= lo && g.quantity <= hi);
        }
        clock.advance(2_000).unwrap();
        if inventory.contents().values().any(|q| *q > 5) {
            inventory.drain_all();
        }
    }
}

#[test]
fn success_rate_preview_is_bounded() {
    let clock = ManualClock::new(START_MS);
    let mut engine = GatherEngine::new(StaticTerrain::uniform("desert"), &clock, 5);
    let mut inventory = Inventory::new(100_000);
    for i in 0..300 {
        let c = Coord::new(0, i % 3);
        let rate = engine.examine(c).unwrap().success_rate.unwrap();
        assert!((0.10..=0.95).contains(&rate));
        engine.gather(c, &mut inventory).ok();
        clock.advance(1_500).unwrap();
        if inventory.contents().values().any(|q| *q > 5) {
            inventory.drain_all();
        }
    }
}

#[test]
fn full_sink_probes_never_deplete() {
    let clock = ManualClock::new(START_MS);
    let mut engine = GatherEngine::new(StaticTerrain::uniform("forest"), &clock, 12_345);
    let mut full = Inventory::new(1);
    full.add_resource(ResourceType::Stone, 1).unwrap();
    assert!(!full.has_capacity(1));
    let c = Coord::new(4, 4);

    let mut full_count = 0;
    for _ in 0..100 {
        let before = engine.location_state(c);
        if let Err(GatherError::InventoryFull { .. }) = engine.gather(c, &mut full) {
            full_count += 1;
            assert_eq!(engine.location_state(c), before);
        }
    }
    assert!(full_count > 0);
    assert_eq!(engine.location_state(c).depletion_level, 0.0);
}

#[test]
fn store_stays_within_capacity() {
    let clock = ManualClock::new(START_MS);
    let store = StoreConfig {
        max_entries: 25,
        expiry_ms: 3_600_000,
        cleanup_interval_ms: 600_000,
    };
    let tuning = GatherTuning {
        min_success_rate: 0.95,
        ..GatherTuning::default()
    };
    let mut engine =
        GatherEngine::with_settings(StaticTerrain::uniform("grassland"), &clock, 3, tuning, store);
    let mut inventory = Inventory::new(1_000_000);

    let mut passes = 0;
    for i in 0..500 {
        let before = engine.store().last_cleanup_ms();
        // Successful gathers run the maintenance check; misses do not.
        let _outcome = engine.gather(Coord::new(i, -i), &mut inventory);
        if engine.store().last_cleanup_ms() != before {
            passes += 1;
            assert!(engine.store().len() <= 25);
        }
        clock.advance(10_000).unwrap();
        if inventory.contents().values().any(|q| *q > 10) {
            inventory.drain_all();
        }
    }
    // 500 steps of 10 s span a little over eight intervals.
    assert!(passes <= 9);
    engine.run_maintenance();
    assert!(engine.store().len() <= 25);
    let metrics = engine.metrics();
    assert_eq!(metrics.total_location_states, engine.store().len());
    assert_eq!(metrics.active_locations, metrics.total_location_states);

    clock.advance(3_600_001).unwrap();
    let report = engine.run_maintenance();
    assert_eq!(report.remaining, 0);
    assert_eq!(engine.metrics().total_location_states, 0);
}
