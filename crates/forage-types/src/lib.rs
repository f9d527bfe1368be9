//! Shared type definitions for the Forage simulation.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: coordinates, resource identifiers, per-location records, and
//! the read-only projections UI layers consume. Types flow downstream to
//! `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`enums`] -- Resource ids, catalog classification, glyph channels,
//!   depletion stages, and gather outcome kinds
//! - [`structs`] -- Coordinates, location records, metrics, and projections

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DepletionStage, GatherOutcome, GlyphChannel, Rarity, ResourceCategory, ResourceType};
pub use structs::{
    Coord, ExamineReport, GatherReport, LocationRecord, ResourcePreview, StoreMetrics,
};
