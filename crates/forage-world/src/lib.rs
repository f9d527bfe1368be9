//! Seeded randomness, resource catalog, and location state for the Forage
//! simulation.
//!
//! This crate models everything the gather resolver reads and writes: the
//! deterministic random stream, the static resource/biome tables, the
//! depletion and regeneration math, the bounded per-coordinate state store,
//! and the terrain seam through which biome data flows in.
//!
//! # Modules
//!
//! - [`catalog`] -- Static resource definitions and biome profiles with
//!   weighted selection helpers.
//! - [`error`] -- Error types for the persistence boundary.
//! - [`location`] -- [`LocationStore`], a bounded map from coordinate to
//!   gathering history with expiry and overflow eviction.
//! - [`prng`] -- [`SeededRng`], the 32-bit LCG stream every engine shares.
//! - [`resource`] -- Depletion decay, success rate, and quantity shrink.
//! - [`terrain`] -- The [`Terrain`] trait, [`StaticTerrain`], and the shared
//!   coordinate-hashed glyph hint.

pub mod catalog;
pub mod error;
pub mod location;
pub mod prng;
pub mod resource;
pub mod terrain;

// Re-export primary types at crate root.
pub use catalog::{BiomeProfile, ResourceDefinition, ResourceEntry, biome_profile};
pub use error::WorldError;
pub use location::{CleanupReport, LocationStore, StoreConfig};
pub use prng::{SeededRng, hash_seed};
pub use resource::GatherTuning;
pub use terrain::{BiomeReading, GlyphHint, StaticTerrain, Terrain, hashed_glyph_hint};
