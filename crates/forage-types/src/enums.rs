//! Enumeration types for the Forage simulation.
//!
//! Resource identifiers, catalog classification (category, rarity), glyph
//! output channels, and the outcome/stage labels surfaced to UI layers.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Resource types
// ---------------------------------------------------------------------------

/// A harvestable resource that can appear in the world.
///
/// Serialized in `snake_case`, which is also the stable string id used by
/// catalog lookups ([`ResourceType::id`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceType {
    /// Timber cut from trees.
    Wood,
    /// Loose rock and cobbles.
    Stone,
    /// Wild berries picked from bushes.
    Berries,
    /// Medicinal plants.
    Herbs,
    /// Metal-bearing rock.
    Ore,
    /// Wet, workable earth.
    Clay,
    /// Rare mineral crystals.
    Crystal,
}

impl ResourceType {
    /// Every resource type, in catalog order.
    pub const ALL: [Self; 7] = [
        Self::Wood,
        Self::Stone,
        Self::Berries,
        Self::Herbs,
        Self::Ore,
        Self::Clay,
        Self::Crystal,
    ];

    /// Stable string id of this resource type.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Berries => "berries",
            Self::Herbs => "herbs",
            Self::Ore => "ore",
            Self::Clay => "clay",
            Self::Crystal => "crystal",
        }
    }

    /// Resolve a string id. Unknown ids return `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.id() == id)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Broad grouping of a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceCategory {
    /// Building and crafting material.
    Material,
    /// Edible.
    Food,
    /// Used for healing.
    Medicine,
    /// Mined from rock.
    Mineral,
    /// Precious and scarce.
    Gem,
}

/// Rarity tier of a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// Found almost everywhere it can occur.
    Common,
    /// Occurs in a few biomes or at low weight.
    Uncommon,
    /// Scarce in every biome that carries it.
    Rare,
}

// ---------------------------------------------------------------------------
// Presentation channels
// ---------------------------------------------------------------------------

/// Output channel a glyph is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GlyphChannel {
    /// Plain 7-bit terminals.
    Ascii,
    /// Terminals with Unicode symbol support.
    Unicode,
}

// ---------------------------------------------------------------------------
// Location stages and gather outcomes
// ---------------------------------------------------------------------------

/// Conceptual depletion stage of a location.
///
/// Depletion is continuous; the stage is derived on read and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DepletionStage {
    /// Untouched or fully regenerated.
    Fresh,
    /// Partly exhausted but still gatherable.
    Partial,
    /// Exhausted past the gather threshold.
    Depleted,
}

impl DepletionStage {
    /// Classify an effective depletion level against the depleted threshold.
    pub fn from_level(depletion: f64, depleted_threshold: f64) -> Self {
        if depletion >= depleted_threshold {
            Self::Depleted
        } else if depletion <= 0.0 {
            Self::Fresh
        } else {
            Self::Partial
        }
    }
}

/// Kind of outcome a single gather attempt produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GatherOutcome {
    /// A resource was committed to the inventory.
    Gathered,
    /// The tile has no resource profile.
    NoResourceHere,
    /// The location is too exhausted to gather from.
    LocationDepleted,
    /// The success roll failed.
    GatherMiss,
    /// The inventory had no room for the rolled quantity.
    InventoryFull,
    /// The inventory refused a commit that nominally fit.
    SinkRejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_ids_round_trip() {
        for resource in ResourceType::ALL {
            assert_eq!(ResourceType::from_id(resource.id()), Some(resource));
        }
        assert_eq!(ResourceType::from_id("unobtainium"), None);
    }

    #[test]
    fn serde_name_matches_id() {
        let json = serde_json::to_string(&ResourceType::Berries).unwrap_or_default();
        assert_eq!(json, "\"berries\"");
    }

    #[test]
    fn stage_classification() {
        assert_eq!(DepletionStage::from_level(0.0, 0.8), DepletionStage::Fresh);
        assert_eq!(DepletionStage::from_level(0.3, 0.8), DepletionStage::Partial);
        assert_eq!(DepletionStage::from_level(0.8, 0.8), DepletionStage::Depleted);
        assert_eq!(DepletionStage::from_level(1.0, 0.8), DepletionStage::Depleted);
    }
}
