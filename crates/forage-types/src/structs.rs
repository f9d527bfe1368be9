//! Core structs shared between the world, the resolver, and UI layers.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DepletionStage, GatherOutcome, ResourceType};

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A tile coordinate in the unbounded 2D world.
///
/// Ordered by `x` then `y`, so maps keyed by `Coord` iterate in a stable,
/// platform-independent order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct Coord {
    /// Horizontal tile index.
    pub x: i32,
    /// Vertical tile index.
    pub y: i32,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Location state
// ---------------------------------------------------------------------------

/// Gathering history of one coordinate.
///
/// A location that has never been touched is represented by the default
/// record: never gathered, no depletion, zero gathers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LocationRecord {
    /// Epoch milliseconds of the last gather attempt that touched the clock.
    pub last_gathered_ms: u64,
    /// Stored depletion in `[0, 1]` as of `last_gathered_ms`.
    pub depletion_level: f64,
    /// Number of completed attempts (hits and misses).
    pub total_gathers: u64,
}

impl LocationRecord {
    /// The synthesized record for a location with no history.
    pub const fn fresh() -> Self {
        Self {
            last_gathered_ms: 0,
            depletion_level: 0.0,
            total_gathers: 0,
        }
    }
}

/// Introspection counters for the location state store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StoreMetrics {
    /// Entries currently held.
    pub total_location_states: usize,
    /// Entries gathered within the expiry window.
    pub active_locations: usize,
    /// Approximate bytes held by the entries.
    pub memory_estimate: usize,
}

// ---------------------------------------------------------------------------
// Read-only projections
// ---------------------------------------------------------------------------

/// One resource a location can yield, as seen by `examine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourcePreview {
    /// The resource type.
    pub resource: ResourceType,
    /// Display name from the catalog.
    pub name: String,
    /// Selection weight within the biome profile.
    pub weight: u32,
    /// Smallest quantity a gather could yield right now.
    pub min_quantity: u32,
    /// Largest quantity a gather could yield right now.
    pub max_quantity: u32,
}

/// Non-mutating view of a location for UI layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExamineReport {
    /// The examined coordinate.
    pub coord: Coord,
    /// Biome id reported by the terrain.
    pub biome: String,
    /// Depletion after time decay.
    pub depletion: f64,
    /// Stage derived from `depletion`.
    pub stage: DepletionStage,
    /// Success probability the next gather would roll against, always in
    /// the clamped rate range. `None` where the biome has nothing to gather.
    pub success_rate: Option<f64>,
    /// Completed attempts at this location.
    pub total_gathers: u64,
    /// Milliseconds until depletion decays to zero.
    pub regenerates_in_ms: u64,
    /// Resources the biome can yield, with depletion-shrunk ranges.
    pub resources: Vec<ResourcePreview>,
}

/// Flat record of a single gather attempt, suitable for logs and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GatherReport {
    /// Where the attempt happened.
    pub coord: Coord,
    /// What happened.
    pub outcome: GatherOutcome,
    /// Resource rolled, if the attempt got that far.
    pub resource: Option<ResourceType>,
    /// Quantity rolled, if the attempt got that far.
    pub quantity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_order_by_x_then_y() {
        let mut coords = vec![Coord::new(1, -1), Coord::new(-2, 5), Coord::new(1, -3), Coord::new(-2, 0)];
        coords.sort();
        assert_eq!(
            coords,
            vec![Coord::new(-2, 0), Coord::new(-2, 5), Coord::new(1, -3), Coord::new(1, -1)]
        );
    }

    #[test]
    fn fresh_record_is_default() {
        assert_eq!(LocationRecord::fresh(), LocationRecord::default());
    }

    #[test]
    fn coord_display() {
        assert_eq!(Coord::new(-3, 7).to_string(), "(-3, 7)");
    }
}
