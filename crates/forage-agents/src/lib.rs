//! Inventory sinks for the Forage simulation.
//!
//! The gather resolver never owns an inventory; it hands yields to an
//! [`InventorySink`] supplied by the caller. This crate defines that seam
//! and a concrete [`Inventory`] bounded by carry capacity and the catalog's
//! per-resource stack limits.
//!
//! # Modules
//!
//! - [`error`] -- Error types for inventory operations ([`AgentError`])
//! - [`inventory`] -- The sink trait, the carry-capacity inventory, and the
//!   checked map operations underneath it

pub mod error;
pub mod inventory;

// Re-export primary types at crate root for convenience.
pub use error::AgentError;
pub use inventory::{CommitReceipt, Inventory, InventorySink};
