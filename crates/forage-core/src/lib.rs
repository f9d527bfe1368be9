//! Clock, configuration, and the gather resolver for the Forage simulation.
//!
//! This crate ties the world model together: a [`GatherEngine`] owns the
//! location store and the seeded stream, reads biomes through an injected
//! terrain, reads time through an injected clock, and hands yields to an
//! inventory sink.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait with the system clock and a manual clock
//!   for harnesses and tests.
//! - [`config`] -- Configuration loading from `forage-config.yaml` into
//!   strongly-typed structs.
//! - [`examine`] -- Non-mutating tile projections for UI layers.
//! - [`gather`] -- [`GatherEngine`] and the gather resolution.
//!
//! [`Clock`]: clock::Clock
//! [`GatherEngine`]: gather::GatherEngine

pub mod clock;
pub mod config;
pub mod examine;
pub mod gather;

// Re-export primary types at crate root.
pub use clock::{Clock, ClockError, ManualClock, SystemClock};
pub use config::{ConfigError, ForageConfig};
pub use gather::{GatherEngine, GatherError, Gathered};
