//! Error types for the `forage-world` crate.
//!
//! Lookups in this crate never fail (unknown keys resolve to `None`); errors
//! only arise at the persistence boundary, where malformed snapshots are
//! rejected without touching the existing store.

use forage_types::Coord;

/// Errors that can occur while saving or restoring location state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The snapshot text is not a valid location-state document.
    #[error("malformed location snapshot: {source}")]
    MalformedSnapshot {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Encoding the store to text failed.
    #[error("failed to serialize location states: {source}")]
    Serialization {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A snapshot entry parsed but violates a record invariant.
    #[error("invalid location record at {coord}: {reason}")]
    InvalidRecord {
        /// Coordinate of the offending entry.
        coord: Coord,
        /// What is wrong with it.
        reason: String,
    },

    /// The same coordinate appears more than once in a snapshot.
    #[error("duplicate location record at {0}")]
    DuplicateCoord(Coord),
}
