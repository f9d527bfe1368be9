//! Error types for the forage-agents crate.
//!
//! Inventory operations return typed errors rather than panicking. A failed
//! operation leaves the inventory exactly as it was.

use forage_types::ResourceType;

/// Errors that can occur during inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Attempted to add resources that would exceed carry capacity.
    #[error("inventory overflow: adding {attempted} of {resource} would exceed capacity (current load: {current_load}, capacity: {capacity})")]
    InventoryOverflow {
        /// The resource type being added.
        resource: ResourceType,
        /// The quantity the caller attempted to add.
        attempted: u32,
        /// The inventory's current total load.
        current_load: u32,
        /// The inventory's maximum carry capacity.
        capacity: u32,
    },

    /// Attempted to hold more of one resource than its catalog stack limit.
    #[error("stack limit exceeded: adding {attempted} of {resource} to {held} held would pass the limit of {limit}")]
    StackLimitExceeded {
        /// The resource type being added.
        resource: ResourceType,
        /// The quantity the caller attempted to add.
        attempted: u32,
        /// The quantity already held.
        held: u32,
        /// The catalog stack limit for this resource.
        limit: u32,
    },

    /// Attempted to remove more of a resource than the inventory holds.
    #[error("insufficient resource: wanted {requested} of {resource} but only have {available}")]
    InsufficientResource {
        /// The resource type being removed.
        resource: ResourceType,
        /// The quantity the caller attempted to remove.
        requested: u32,
        /// The quantity actually held.
        available: u32,
    },

    /// An arithmetic overflow occurred while computing a load.
    #[error("arithmetic overflow in inventory computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
