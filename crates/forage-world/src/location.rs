//! Location state store: bounded per-coordinate gathering history.
//!
//! The world is unbounded, so the store never tries to hold every tile.
//! A coordinate with no entry reads as a fresh default record; entries are
//! created by the first write and removed only by the maintenance pass,
//! which bounds memory to recently-active locations.
//!
//! # Maintenance
//!
//! [`LocationStore::maybe_cleanup`] runs at most one pass per cleanup
//! interval. Between passes the store may grow past `max_entries`; the
//! next pass trims it back, so the overflow sort costs amortized O(1) per
//! write. A pass:
//!
//! 1. drops every entry last gathered before `now - expiry_ms`;
//! 2. if still over capacity, sorts the survivors by last-gather time and
//!    drops the oldest until the store is at capacity.
//!
//! No surviving entry is older than any evicted one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use forage_types::{Coord, LocationRecord, StoreMetrics};

use crate::error::WorldError;

/// Default number of entries held before overflow trimming.
pub const DEFAULT_MAX_ENTRIES: usize = 1_000;

/// Default age after which an untouched entry expires (1 hour).
pub const DEFAULT_EXPIRY_MS: u64 = 3_600_000;

/// Default spacing between maintenance passes (10 minutes).
pub const DEFAULT_CLEANUP_INTERVAL_MS: u64 = 600_000;

/// Approximate per-entry overhead of the map beyond key and value.
const ENTRY_OVERHEAD_BYTES: usize = 32;

/// Capacity and expiry settings for a [`LocationStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Entries held before the overflow trim kicks in.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Age in milliseconds after which an entry expires.
    #[serde(default = "default_expiry_ms")]
    pub expiry_ms: u64,

    /// Minimum milliseconds between routine maintenance passes.
    #[serde(default = "default_cleanup_interval_ms")]
    pub cleanup_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            expiry_ms: DEFAULT_EXPIRY_MS,
            cleanup_interval_ms: DEFAULT_CLEANUP_INTERVAL_MS,
        }
    }
}

const fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

const fn default_expiry_ms() -> u64 {
    DEFAULT_EXPIRY_MS
}

const fn default_cleanup_interval_ms() -> u64 {
    DEFAULT_CLEANUP_INTERVAL_MS
}

/// What a maintenance pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Entries dropped for being older than the expiry window.
    pub expired: usize,
    /// Entries dropped by the overflow trim.
    pub trimmed: usize,
    /// Entries left after the pass.
    pub remaining: usize,
}

/// On-disk shape of one entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersistedLocation {
    x: i32,
    y: i32,
    last_gathered_ms: u64,
    depletion_level: f64,
    total_gathers: u64,
}

/// Bounded map from coordinate to gathering history.
#[derive(Debug, Clone)]
pub struct LocationStore {
    entries: BTreeMap<Coord, LocationRecord>,
    config: StoreConfig,
    last_cleanup_ms: u64,
}

impl LocationStore {
    /// Create an empty store. `now_ms` starts the maintenance interval.
    pub const fn new(config: StoreConfig, now_ms: u64) -> Self {
        Self {
            entries: BTreeMap::new(),
            config,
            last_cleanup_ms: now_ms,
        }
    }

    /// The store's settings.
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `coord` has a stored entry (as opposed to the synthesized
    /// default).
    pub fn contains(&self, coord: Coord) -> bool {
        self.entries.contains_key(&coord)
    }

    /// Record for `coord`, or the fresh default if none is stored.
    pub fn get(&self, coord: Coord) -> LocationRecord {
        self.entries
            .get(&coord)
            .copied()
            .unwrap_or_else(LocationRecord::fresh)
    }

    /// Insert or overwrite the record for `coord`. Depletion is clamped to
    /// `[0, 1]`.
    pub fn put(&mut self, coord: Coord, mut record: LocationRecord) {
        record.depletion_level = record.depletion_level.clamp(0.0, 1.0);
        self.entries.insert(coord, record);
    }

    /// Iterate stored entries in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &LocationRecord)> {
        self.entries.iter().map(|(c, r)| (*c, r))
    }

    /// Millisecond timestamp of the last maintenance pass.
    pub const fn last_cleanup_ms(&self) -> u64 {
        self.last_cleanup_ms
    }

    /// Run a maintenance pass if a full cleanup interval has elapsed since
    /// the previous one. Returns the pass report when one ran.
    pub fn maybe_cleanup(&mut self, now_ms: u64) -> Option<CleanupReport> {
        let due = now_ms.saturating_sub(self.last_cleanup_ms) >= self.config.cleanup_interval_ms;
        if !due {
            return None;
        }
        Some(self.cleanup(now_ms))
    }

    /// Run a maintenance pass unconditionally.
    pub fn cleanup(&mut self, now_ms: u64) -> CleanupReport {
        let cutoff = now_ms.saturating_sub(self.config.expiry_ms);
        let before = self.entries.len();
        self.entries.retain(|_, r| r.last_gathered_ms >= cutoff);
        let expired = before.saturating_sub(self.entries.len());

        let excess = self.entries.len().saturating_sub(self.config.max_entries);
        if excess > 0 {
            let mut by_age: Vec<(u64, Coord)> = self
                .entries
                .iter()
                .map(|(c, r)| (r.last_gathered_ms, *c))
                .collect();
            by_age.sort_unstable();
            for (_, coord) in by_age.into_iter().take(excess) {
                self.entries.remove(&coord);
            }
        }

        self.last_cleanup_ms = now_ms;
        let report = CleanupReport {
            expired,
            trimmed: excess,
            remaining: self.entries.len(),
        };
        if expired > 0 || excess > 0 {
            info!(
                expired,
                trimmed = excess,
                remaining = report.remaining,
                "Location store maintenance evicted entries"
            );
        } else {
            debug!(remaining = report.remaining, "Location store maintenance: nothing to evict");
        }
        report
    }

    /// Size and activity counters. An entry is active if it was gathered
    /// within the expiry window.
    pub fn metrics(&self, now_ms: u64) -> StoreMetrics {
        let cutoff = now_ms.saturating_sub(self.config.expiry_ms);
        let active = self
            .entries
            .values()
            .filter(|r| r.last_gathered_ms >= cutoff)
            .count();
        let per_entry = size_of::<Coord>()
            .saturating_add(size_of::<LocationRecord>())
            .saturating_add(ENTRY_OVERHEAD_BYTES);
        StoreMetrics {
            total_location_states: self.entries.len(),
            active_locations: active,
            memory_estimate: self.entries.len().saturating_mul(per_entry),
        }
    }

    /// Encode every entry as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Serialization`] if encoding fails.
    pub fn serialize(&self) -> Result<String, WorldError> {
        let rows: Vec<PersistedLocation> = self
            .entries
            .iter()
            .map(|(c, r)| PersistedLocation {
                x: c.x,
                y: c.y,
                last_gathered_ms: r.last_gathered_ms,
                depletion_level: r.depletion_level,
                total_gathers: r.total_gathers,
            })
            .collect();
        serde_json::to_string(&rows).map_err(|source| WorldError::Serialization { source })
    }

    /// Replace the store contents with a snapshot produced by
    /// [`LocationStore::serialize`]. Returns the number of entries loaded.
    ///
    /// The whole snapshot is parsed and validated before anything is
    /// replaced; on error the store is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MalformedSnapshot`] for unparseable input,
    /// [`WorldError::InvalidRecord`] for a depletion outside `[0, 1]`, or
    /// [`WorldError::DuplicateCoord`] if a coordinate repeats.
    pub fn restore(&mut self, data: &str) -> Result<usize, WorldError> {
        let rows: Vec<PersistedLocation> =
            serde_json::from_str(data).map_err(|source| WorldError::MalformedSnapshot { source })?;

        let mut restored = BTreeMap::new();
        for row in rows {
            let coord = Coord::new(row.x, row.y);
            if !(row.depletion_level.is_finite() && (0.0..=1.0).contains(&row.depletion_level)) {
                return Err(WorldError::InvalidRecord {
                    coord,
                    reason: format!("depletion {} outside [0, 1]", row.depletion_level),
                });
            }
            let record = LocationRecord {
                last_gathered_ms: row.last_gathered_ms,
                depletion_level: row.depletion_level,
                total_gathers: row.total_gathers,
            };
            if restored.insert(coord, record).is_some() {
                return Err(WorldError::DuplicateCoord(coord));
            }
        }

        let count = restored.len();
        self.entries = restored;
        Ok(count)
    }
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new(StoreConfig::default(), 0)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    fn record(last: u64, depletion: f64, gathers: u64) -> LocationRecord {
        LocationRecord {
            last_gathered_ms: last,
            depletion_level: depletion,
            total_gathers: gathers,
        }
    }

    fn small_store(max_entries: usize) -> LocationStore {
        LocationStore::new(
            StoreConfig {
                max_entries,
                expiry_ms: 1_000,
                cleanup_interval_ms: 500,
            },
            0,
        )
    }

    #[test]
    fn missing_coord_reads_as_fresh() {
        let store = LocationStore::default();
        let r = store.get(Coord::new(5, -5));
        assert_eq!(r, LocationRecord::fresh());
        assert!(!store.contains(Coord::new(5, -5)));
        assert!(store.is_empty());
    }

    #[test]
    fn put_overwrites_and_clamps() {
        let mut store = LocationStore::default();
        let c = Coord::new(1, 1);
        store.put(c, record(10, 0.4, 1));
        store.put(c, record(20, 1.7, 2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(c), record(20, 1.0, 2));
    }

    #[test]
    fn maybe_cleanup_respects_interval() {
        let mut store = small_store(10);
        store.put(Coord::new(0, 0), record(0, 0.5, 1));
        assert!(store.maybe_cleanup(100).is_none());
        let report = store.maybe_cleanup(500).unwrap();
        assert_eq!(report.remaining, 1);
        assert_eq!(store.last_cleanup_ms(), 500);
        assert!(store.maybe_cleanup(900).is_none());
    }

    #[test]
    fn expired_entries_are_removed() {
        let mut store = small_store(10);
        store.put(Coord::new(0, 0), record(100, 0.5, 1));
        store.put(Coord::new(1, 0), record(1_900, 0.5, 1));
        store.put(Coord::new(2, 0), record(1_000, 0.5, 1));
        let report = store.cleanup(2_000);
        // cutoff = 1000: entry at 100 is older, entry at 1000 survives.
        assert_eq!(report.expired, 1);
        assert_eq!(report.trimmed, 0);
        assert!(!store.contains(Coord::new(0, 0)));
        assert!(store.contains(Coord::new(2, 0)));
    }

    #[test]
    fn overflow_waits_for_interval() {
        let mut store = small_store(3);
        for i in 0..5 {
            store.put(Coord::new(i, 0), record(10 + i as u64, 0.1, 1));
        }
        assert!(store.maybe_cleanup(20).is_none());
        assert_eq!(store.len(), 5);

        let report = store.maybe_cleanup(500).unwrap();
        assert_eq!(report.expired, 0);
        assert_eq!(report.trimmed, 2);
        assert_eq!(store.len(), 3);
        // The two oldest are gone.
        assert!(!store.contains(Coord::new(0, 0)));
        assert!(!store.contains(Coord::new(1, 0)));
        assert!(store.contains(Coord::new(4, 0)));
    }

    #[test]
    fn at_most_one_pass_per_interval_when_full() {
        let mut store = LocationStore::new(
            StoreConfig {
                max_entries: 5,
                expiry_ms: 3_600_000,
                cleanup_interval_ms: 600_000,
            },
            0,
        );
        let mut passes = 0;
        for i in 0..50_u64 {
            let now = 600_000 + i;
            store.put(Coord::new(i as i32, 0), record(now, 0.1, 1));
            if store.maybe_cleanup(now).is_some() {
                passes += 1;
            }
        }
        assert_eq!(passes, 1);
        assert_eq!(store.last_cleanup_ms(), 600_000);
        // Overflow accumulates until the next interval, then is trimmed.
        assert_eq!(store.len(), 50);
        let report = store.maybe_cleanup(1_200_000).unwrap();
        assert_eq!(report.trimmed, 45);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn survivors_are_never_older_than_evicted() {
        let mut store = small_store(50);
        let mut stamps = Vec::new();
        for i in 0_u64..200 {
            let stamp = (i * 7_919) % 1_000 + 5_000;
            stamps.push(stamp);
            store.put(Coord::new(i as i32, -(i as i32)), record(stamp, 0.2, 1));
        }
        store.cleanup(5_500);
        assert!(store.len() <= 50);
        let oldest_survivor = store.iter().map(|(_, r)| r.last_gathered_ms).min().unwrap();
        let mut sorted = stamps.clone();
        sorted.sort_unstable();
        let evicted_max = sorted[sorted.len() - store.len() - 1];
        assert!(oldest_survivor >= evicted_max);
    }

    #[test]
    fn metrics_count_active_entries() {
        let mut store = small_store(10);
        store.put(Coord::new(0, 0), record(100, 0.5, 1));
        store.put(Coord::new(0, 1), record(4_500, 0.5, 1));
        let m = store.metrics(5_000);
        assert_eq!(m.total_location_states, 2);
        assert_eq!(m.active_locations, 1);
        assert!(m.memory_estimate > 0);
    }

    #[test]
    fn snapshot_round_trip_is_exact() {
        let mut store = LocationStore::default();
        store.put(Coord::new(-3, 9), record(1_700_000_000_123, 0.1 + 0.2, 7));
        store.put(Coord::new(4, 4), record(42, 1.0 / 3.0, 1));
        store.put(Coord::new(0, 0), record(0, 0.0, 0));
        let text = store.serialize().unwrap();

        let mut restored = LocationStore::default();
        assert_eq!(restored.restore(&text).unwrap(), 3);
        for (coord, r) in store.iter() {
            assert_eq!(restored.get(coord), *r);
        }
    }

    #[test]
    fn malformed_snapshot_leaves_state_untouched() {
        let mut store = LocationStore::default();
        store.put(Coord::new(1, 2), record(5, 0.5, 3));
        let before = store.serialize().unwrap();

        assert!(matches!(store.restore("not json"), Err(WorldError::MalformedSnapshot { .. })));
        assert!(matches!(
            store.restore(r#"[{"x":0,"y":0,"last_gathered_ms":1,"depletion_level":1.5,"total_gathers":1}]"#),
            Err(WorldError::InvalidRecord { .. })
        ));
        assert!(matches!(
            store.restore(
                r#"[{"x":0,"y":0,"last_gathered_ms":1,"depletion_level":0.5,"total_gathers":1},
                    {"x":0,"y":0,"last_gathered_ms":2,"depletion_level":0.5,"total_gathers":1}]"#
            ),
            Err(WorldError::DuplicateCoord(_))
        ));
        assert!(store.restore(r#"[{"x":0}]"#).is_err());

        assert_eq!(store.serialize().unwrap(), before);
    }
}
