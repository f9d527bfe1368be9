//! Inventory operations and the sink seam used by the gather resolver.
//!
//! An inventory carries resources subject to a weight limit
//! (`carry_capacity`, one unit of weight per unit of resource) and to the
//! catalog's per-resource stack limit. The free functions operate on a bare
//! map with full checked arithmetic -- no silent overflows, no panics.
//! [`Inventory`] wraps them and implements [`InventorySink`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use forage_types::ResourceType;
use forage_world::catalog;

use crate::error::AgentError;

/// Outcome of handing a yield to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Whether the sink stored the whole yield.
    pub accepted: bool,
    /// Units of the resource held after the commit.
    pub held_after: u32,
}

/// Destination for gathered resources.
pub trait InventorySink {
    /// Whether `quantity` more units fit.
    fn has_capacity(&self, quantity: u32) -> bool;

    /// Store `quantity` units of `resource`. A rejected commit must leave
    /// the sink unchanged.
    fn commit(&mut self, resource: ResourceType, quantity: u32) -> CommitReceipt;
}

/// Compute the total weight (sum of all quantities) in an inventory.
///
/// Returns `None` if the sum overflows `u32`.
pub fn total_weight(inventory: &BTreeMap<ResourceType, u32>) -> Option<u32> {
    let mut total: u32 = 0;
    for qty in inventory.values() {
        total = total.checked_add(*qty)?;
    }
    Some(total)
}

/// Check whether the inventory contains at least `amount` of the given resource.
pub fn has_resource(inventory: &BTreeMap<ResourceType, u32>, resource: ResourceType, amount: u32) -> bool {
    inventory.get(&resource).copied().unwrap_or(0) >= amount
}

/// Add `amount` units of `resource` to the inventory.
///
/// Fails if the addition would exceed `carry_capacity`, pass the catalog
/// stack limit, or cause a `u32` overflow.
pub fn add_resource(
    inventory: &mut BTreeMap<ResourceType, u32>,
    carry_capacity: u32,
    resource: ResourceType,
    amount: u32,
) -> Result<u32, AgentError> {
    let current_load = total_weight(inventory).ok_or_else(|| AgentError::ArithmeticOverflow {
        context: String::from("total_weight overflow in add_resource"),
    })?;

    let new_load = current_load.checked_add(amount).ok_or(AgentError::InventoryOverflow {
        resource,
        attempted: amount,
        current_load,
        capacity: carry_capacity,
    })?;

    if new_load > carry_capacity {
        return Err(AgentError::InventoryOverflow {
            resource,
            attempted: amount,
            current_load,
            capacity: carry_capacity,
        });
    }

    let held = inventory.get(&resource).copied().unwrap_or(0);
    let limit = catalog::resource(resource).stack_limit;
    let new_held = held.checked_add(amount).ok_or_else(|| AgentError::ArithmeticOverflow {
        context: String::from("individual resource quantity overflow"),
    })?;
    if new_held > limit {
        return Err(AgentError::StackLimitExceeded {
            resource,
            attempted: amount,
            held,
            limit,
        });
    }

    inventory.insert(resource, new_held);
    Ok(new_held)
}

/// Remove `amount` units of `resource` from the inventory.
///
/// Fails if the inventory does not hold enough of the resource.
/// Removes the key entirely if quantity reaches zero.
pub fn remove_resource(
    inventory: &mut BTreeMap<ResourceType, u32>,
    resource: ResourceType,
    amount: u32,
) -> Result<(), AgentError> {
    let current = inventory.get(&resource).copied().unwrap_or(0);

    let remaining = current.checked_sub(amount).ok_or(AgentError::InsufficientResource {
        resource,
        requested: amount,
        available: current,
    })?;

    if remaining == 0 {
        inventory.remove(&resource);
    } else {
        inventory.insert(resource, remaining);
    }

    Ok(())
}

/// Drain all resources from the inventory, returning them as a new map.
///
/// The inventory is left empty after this call.
pub const fn drain_all(inventory: &mut BTreeMap<ResourceType, u32>) -> BTreeMap<ResourceType, u32> {
    let mut dropped = BTreeMap::new();
    core::mem::swap(inventory, &mut dropped);
    dropped
}

/// A carry-capacity inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    carry_capacity: u32,
    contents: BTreeMap<ResourceType, u32>,
}

impl Inventory {
    /// Empty inventory with the given carry capacity.
    pub const fn new(carry_capacity: u32) -> Self {
        Self {
            carry_capacity,
            contents: BTreeMap::new(),
        }
    }

    /// Maximum total units carried.
    pub const fn carry_capacity(&self) -> u32 {
        self.carry_capacity
    }

    /// Units of `resource` held.
    pub fn quantity(&self, resource: ResourceType) -> u32 {
        self.contents.get(&resource).copied().unwrap_or(0)
    }

    /// Held resources in resource order.
    pub const fn contents(&self) -> &BTreeMap<ResourceType, u32> {
        &self.contents
    }

    /// Total units held. `None` on overflow.
    pub fn total_weight(&self) -> Option<u32> {
        total_weight(&self.contents)
    }

    /// Units that still fit under the carry capacity.
    pub fn remaining_capacity(&self) -> u32 {
        self.total_weight()
            .map_or(0, |load| self.carry_capacity.saturating_sub(load))
    }

    /// Whether at least `amount` of `resource` is held.
    pub fn has_resource(&self, resource: ResourceType, amount: u32) -> bool {
        has_resource(&self.contents, resource, amount)
    }

    /// Add `amount` of `resource`. Returns the quantity held afterwards.
    pub fn add_resource(&mut self, resource: ResourceType, amount: u32) -> Result<u32, AgentError> {
        add_resource(&mut self.contents, self.carry_capacity, resource, amount)
    }

    /// Remove `amount` of `resource`.
    pub fn remove_resource(&mut self, resource: ResourceType, amount: u32) -> Result<(), AgentError> {
        remove_resource(&mut self.contents, resource, amount)
    }

    /// Empty the inventory, returning what it held.
    pub const fn drain_all(&mut self) -> BTreeMap<ResourceType, u32> {
        drain_all(&mut self.contents)
    }
}

impl InventorySink for Inventory {
    fn has_capacity(&self, quantity: u32) -> bool {
        self.remaining_capacity() >= quantity
    }

    fn commit(&mut self, resource: ResourceType, quantity: u32) -> CommitReceipt {
        match self.add_resource(resource, quantity) {
            Ok(held_after) => CommitReceipt {
                accepted: true,
                held_after,
            },
            Err(e) => {
                debug!(%resource, quantity, error = %e, "Inventory rejected commit");
                CommitReceipt {
                    accepted: false,
                    held_after: self.quantity(resource),
                }
            }
        }
    }
}
