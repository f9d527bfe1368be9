//! Static resource catalog: resource-type definitions and biome profiles.
//!
//! Everything in this module is immutable data plus side-effect-free
//! lookups. Unknown ids resolve to `None` or an empty list; nothing here
//! can fail.
//!
//! # Biome profiles
//!
//! | Biome     | Success | Depletion | Regen   | Resources (weight, quantity)              |
//! |-----------|---------|-----------|---------|-------------------------------------------|
//! | forest    | 0.70    | 0.10      | 5 min   | wood 60 [1,3], berries 40 [1,2]           |
//! | jungle    | 0.65    | 0.12      | 6 min   | wood 45 [1,4], berries 35 [1,3], herbs 20 |
//! | grassland | 0.75    | 0.08      | 4 min   | berries 50, herbs 30, clay 20             |
//! | savanna   | 0.60    | 0.10      | 5 min   | stone 40, wood 30, berries 30             |
//! | desert    | 0.40    | 0.15      | 10 min  | stone 70 [1,2], crystal 30 [1,1]          |
//! | tundra    | 0.45    | 0.12      | 8 min   | stone 50, berries 30, ore 20              |
//! | mountain  | 0.50    | 0.15      | 10 min  | stone 50 [2,4], ore 35 [1,3], crystal 15  |
//! | swamp     | 0.55    | 0.10      | 6 min   | herbs 40, clay 40, wood 20                |
//! | beach     | 0.60    | 0.08      | 4 min   | stone 50, clay 40, crystal 10             |
//!
//! Water biomes (ocean, lake, river) and any unknown id carry no profile.

use serde::Serialize;

use forage_types::{GlyphChannel, Rarity, ResourceCategory, ResourceType};

// ---------------------------------------------------------------------------
// Definition types
// ---------------------------------------------------------------------------

/// A glyph with an optional depleted variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlyphPair {
    /// Glyph shown while the location is gatherable.
    pub normal: char,
    /// Glyph shown while depleted; falls back to `normal` when absent.
    pub depleted: Option<char>,
}

impl GlyphPair {
    /// Resolve the glyph for a depletion flag.
    pub fn pick(self, depleted: bool) -> char {
        if depleted {
            self.depleted.unwrap_or(self.normal)
        } else {
            self.normal
        }
    }
}

/// Display colors (hex) with an optional depleted variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    /// Color while gatherable.
    pub normal: &'static str,
    /// Color while depleted; falls back to `normal` when absent.
    pub depleted: Option<&'static str>,
}

/// Immutable description of a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceDefinition {
    /// The resource this entry describes.
    pub resource: ResourceType,
    /// Display name.
    pub name: &'static str,
    /// Flavor description.
    pub description: &'static str,
    /// Broad grouping.
    pub category: ResourceCategory,
    /// Maximum units of this resource a single inventory slot may hold.
    pub stack_limit: u32,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Glyphs for 7-bit output.
    pub ascii: GlyphPair,
    /// Glyphs for Unicode output.
    pub unicode: GlyphPair,
    /// Display colors.
    pub colors: ColorPair,
}

impl ResourceDefinition {
    /// Glyph pair for an output channel.
    pub const fn glyphs(&self, channel: GlyphChannel) -> GlyphPair {
        match channel {
            GlyphChannel::Ascii => self.ascii,
            GlyphChannel::Unicode => self.unicode,
        }
    }
}

/// One weighted resource in a biome profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    /// The resource yielded.
    pub resource: ResourceType,
    /// Relative selection weight.
    pub weight: u32,
    /// Smallest quantity per successful gather (at least 1).
    pub min_quantity: u32,
    /// Largest quantity per successful gather (at least `min_quantity`).
    pub max_quantity: u32,
}

/// One weighted entry in a biome's glyph distribution. `resource: None`
/// is the fallback: plain terrain, no resource shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlyphWeight {
    /// Resource whose glyph is shown, or `None` for plain terrain.
    pub resource: Option<ResourceType>,
    /// Relative weight.
    pub weight: u32,
}

/// Immutable gathering profile of a biome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiomeProfile {
    /// Biome id as reported by the terrain.
    pub biome: &'static str,
    /// Ordered weighted resources.
    pub resources: &'static [ResourceEntry],
    /// Weighted glyph distribution, including the plain-terrain fallback.
    pub glyphs: &'static [GlyphWeight],
    /// Success probability of a gather on a fresh location, in `(0, 1]`.
    pub base_success_rate: f64,
    /// Depletion added by each successful gather, in `(0, 1]`.
    pub depletion_rate: f64,
    /// Milliseconds for full depletion to decay back to zero.
    pub regeneration_time_ms: u64,
}

impl BiomeProfile {
    /// Sum of all resource weights.
    pub fn total_weight(&self) -> u32 {
        self.resources
            .iter()
            .fold(0_u32, |acc, e| acc.saturating_add(e.weight))
    }

    /// The entry for `resource`, if this biome yields it.
    pub fn entry_for(&self, resource: ResourceType) -> Option<&'static ResourceEntry> {
        self.resources.iter().find(|e| e.resource == resource)
    }

    /// Weighted resource pick for a unit draw in `[0, 1)`.
    ///
    /// The draw is scaled to the total weight and the cumulative weights are
    /// walked; the first entry whose cumulative weight reaches the scaled
    /// draw wins. Falls back to the first entry if rounding leaves the walk
    /// unmatched.
    pub fn pick_resource(&self, unit_draw: f64) -> Option<&'static ResourceEntry> {
        let target = unit_draw * f64::from(self.total_weight());
        let mut cumulative = 0.0_f64;
        for entry in self.resources {
            cumulative += f64::from(entry.weight);
            if cumulative >= target {
                return Some(entry);
            }
        }
        self.resources.first()
    }

    /// Weighted glyph pick for a unit draw in `[0, 1)`. `None` means plain
    /// terrain.
    pub fn pick_glyph(&self, unit_draw: f64) -> Option<ResourceType> {
        let total = self
            .glyphs
            .iter()
            .fold(0_u32, |acc, g| acc.saturating_add(g.weight));
        let target = unit_draw * f64::from(total);
        let mut cumulative = 0.0_f64;
        for glyph in self.glyphs {
            cumulative += f64::from(glyph.weight);
            if glyph.weight > 0 && cumulative > target {
                return glyph.resource;
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Resource table
// ---------------------------------------------------------------------------

static WOOD: ResourceDefinition = ResourceDefinition {
    resource: ResourceType::Wood,
    name: "Wood",
    description: "Sturdy timber, the backbone of every shelter and fire.",
    category: ResourceCategory::Material,
    stack_limit: 50,
    rarity: Rarity::Common,
    ascii: GlyphPair { normal: 'T', depleted: Some('t') },
    unicode: GlyphPair { normal: '♣', depleted: Some('♧') },
    colors: ColorPair { normal: "#8b5a2b", depleted: Some("#5c4033") },
};

static STONE: ResourceDefinition = ResourceDefinition {
    resource: ResourceType::Stone,
    name: "Stone",
    description: "Loose rock, easy to pick up and hard to break.",
    category: ResourceCategory::Material,
    stack_limit: 50,
    rarity: Rarity::Common,
    ascii: GlyphPair { normal: 'o', depleted: Some('.') },
    unicode: GlyphPair { normal: '●', depleted: Some('○') },
    colors: ColorPair { normal: "#808080", depleted: Some("#505050") },
};

static BERRIES: ResourceDefinition = ResourceDefinition {
    resource: ResourceType::Berries,
    name: "Berries",
    description: "Sweet wild berries. Filling, if you find enough.",
    category: ResourceCategory::Food,
    stack_limit: 20,
    rarity: Rarity::Common,
    ascii: GlyphPair { normal: '*', depleted: Some(',') },
    unicode: GlyphPair { normal: '✿', depleted: None },
    colors: ColorPair { normal: "#c71585", depleted: None },
};

static HERBS: ResourceDefinition = ResourceDefinition {
    resource: ResourceType::Herbs,
    name: "Herbs",
    description: "Bitter leaves with a knack for closing wounds.",
    category: ResourceCategory::Medicine,
    stack_limit: 20,
    rarity: Rarity::Uncommon,
    ascii: GlyphPair { normal: '"', depleted: None },
    unicode: GlyphPair { normal: '❦', depleted: Some('⁂') },
    colors: ColorPair { normal: "#2e8b57", depleted: Some("#556b2f") },
};

static ORE: ResourceDefinition = ResourceDefinition {
    resource: ResourceType::Ore,
    name: "Ore",
    description: "Veined rock that promises metal to whoever smelts it.",
    category: ResourceCategory::Mineral,
    stack_limit: 30,
    rarity: Rarity::Uncommon,
    ascii: GlyphPair { normal: '%', depleted: Some(':') },
    unicode: GlyphPair { normal: '◆', depleted: Some('◇') },
    colors: ColorPair { normal: "#b87333", depleted: Some("#6e4b2a") },
};

static CLAY: ResourceDefinition = ResourceDefinition {
    resource: ResourceType::Clay,
    name: "Clay",
    description: "Slick earth that holds its shape once fired.",
    category: ResourceCategory::Material,
    stack_limit: 40,
    rarity: Rarity::Common,
    ascii: GlyphPair { normal: '=', depleted: Some('-') },
    unicode: GlyphPair { normal: '▤', depleted: Some('▭') },
    colors: ColorPair { normal: "#cd853f", depleted: None },
};

static CRYSTAL: ResourceDefinition = ResourceDefinition {
    resource: ResourceType::Crystal,
    name: "Crystal",
    description: "A clear shard that catches light. Rarely found intact.",
    category: ResourceCategory::Gem,
    stack_limit: 10,
    rarity: Rarity::Rare,
    ascii: GlyphPair { normal: '^', depleted: None },
    unicode: GlyphPair { normal: '✦', depleted: Some('✧') },
    colors: ColorPair { normal: "#7fffd4", depleted: Some("#5f9ea0") },
};

static RESOURCES: [&ResourceDefinition; 7] =
    [&WOOD, &STONE, &BERRIES, &HERBS, &ORE, &CLAY, &CRYSTAL];

// ---------------------------------------------------------------------------
// Biome table
// ---------------------------------------------------------------------------

const fn entry(resource: ResourceType, weight: u32, min: u32, max: u32) -> ResourceEntry {
    ResourceEntry {
        resource,
        weight,
        min_quantity: min,
        max_quantity: max,
    }
}

const fn glyph(resource: Option<ResourceType>, weight: u32) -> GlyphWeight {
    GlyphWeight { resource, weight }
}

use ResourceType::{Berries, Clay, Crystal, Herbs, Ore, Stone, Wood};

static BIOMES: [BiomeProfile; 9] = [
    BiomeProfile {
        biome: "forest",
        resources: &[entry(Wood, 60, 1, 3), entry(Berries, 40, 1, 2)],
        glyphs: &[glyph(Some(Wood), 25), glyph(Some(Berries), 10), glyph(None, 65)],
        base_success_rate: 0.7,
        depletion_rate: 0.1,
        regeneration_time_ms: 300_000,
    },
    BiomeProfile {
        biome: "jungle",
        resources: &[entry(Wood, 45, 1, 4), entry(Berries, 35, 1, 3), entry(Herbs, 20, 1, 2)],
        glyphs: &[
            glyph(Some(Wood), 20),
            glyph(Some(Berries), 12),
            glyph(Some(Herbs), 8),
            glyph(None, 60),
        ],
        base_success_rate: 0.65,
        depletion_rate: 0.12,
        regeneration_time_ms: 360_000,
    },
    BiomeProfile {
        biome: "grassland",
        resources: &[entry(Berries, 50, 1, 2), entry(Herbs, 30, 1, 2), entry(Clay, 20, 1, 2)],
        glyphs: &[
            glyph(Some(Berries), 10),
            glyph(Some(Herbs), 8),
            glyph(Some(Clay), 4),
            glyph(None, 78),
        ],
        base_success_rate: 0.75,
        depletion_rate: 0.08,
        regeneration_time_ms: 240_000,
    },
    BiomeProfile {
        biome: "savanna",
        resources: &[entry(Stone, 40, 1, 2), entry(Wood, 30, 1, 2), entry(Berries, 30, 1, 2)],
        glyphs: &[
            glyph(Some(Stone), 8),
            glyph(Some(Wood), 6),
            glyph(Some(Berries), 6),
            glyph(None, 80),
        ],
        base_success_rate: 0.6,
        depletion_rate: 0.1,
        regeneration_time_ms: 300_000,
    },
    BiomeProfile {
        biome: "desert",
        resources: &[entry(Stone, 70, 1, 2), entry(Crystal, 30, 1, 1)],
        glyphs: &[glyph(Some(Stone), 6), glyph(Some(Crystal), 2), glyph(None, 92)],
        base_success_rate: 0.4,
        depletion_rate: 0.15,
        regeneration_time_ms: 600_000,
    },
    BiomeProfile {
        biome: "tundra",
        resources: &[entry(Stone, 50, 1, 2), entry(Berries, 30, 1, 1), entry(Ore, 20, 1, 1)],
        glyphs: &[
            glyph(Some(Stone), 6),
            glyph(Some(Berries), 4),
            glyph(Some(Ore), 2),
            glyph(None, 88),
        ],
        base_success_rate: 0.45,
        depletion_rate: 0.12,
        regeneration_time_ms: 480_000,
    },
    BiomeProfile {
        biome: "mountain",
        resources: &[entry(Stone, 50, 2, 4), entry(Ore, 35, 1, 3), entry(Crystal, 15, 1, 1)],
        glyphs: &[
            glyph(Some(Stone), 15),
            glyph(Some(Ore), 10),
            glyph(Some(Crystal), 3),
            glyph(None, 72),
        ],
        base_success_rate: 0.5,
        depletion_rate: 0.15,
        regeneration_time_ms: 600_000,
    },
    BiomeProfile {
        biome: "swamp",
        resources: &[entry(Herbs, 40, 1, 3), entry(Clay, 40, 1, 3), entry(Wood, 20, 1, 2)],
        glyphs: &[
            glyph(Some(Herbs), 10),
            glyph(Some(Clay), 10),
            glyph(Some(Wood), 5),
            glyph(None, 75),
        ],
        base_success_rate: 0.55,
        depletion_rate: 0.1,
        regeneration_time_ms: 360_000,
    },
    BiomeProfile {
        biome: "beach",
        resources: &[entry(Stone, 50, 1, 2), entry(Clay, 40, 1, 2), entry(Crystal, 10, 1, 1)],
        glyphs: &[
            glyph(Some(Stone), 6),
            glyph(Some(Clay), 5),
            glyph(Some(Crystal), 1),
            glyph(None, 88),
        ],
        base_success_rate: 0.6,
        depletion_rate: 0.08,
        regeneration_time_ms: 240_000,
    },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Definition of a resource type.
pub fn resource(resource: ResourceType) -> &'static ResourceDefinition {
    match resource {
        ResourceType::Wood => &WOOD,
        ResourceType::Stone => &STONE,
        ResourceType::Berries => &BERRIES,
        ResourceType::Herbs => &HERBS,
        ResourceType::Ore => &ORE,
        ResourceType::Clay => &CLAY,
        ResourceType::Crystal => &CRYSTAL,
    }
}

/// Definition of a resource by string id.
pub fn resource_by_id(id: &str) -> Option<&'static ResourceDefinition> {
    ResourceType::from_id(id).map(resource)
}

/// Every resource definition, in catalog order.
pub fn all_resources() -> impl Iterator<Item = &'static ResourceDefinition> {
    RESOURCES.iter().copied()
}

/// Resource definitions in a category.
pub fn resources_in_category(category: ResourceCategory) -> Vec<&'static ResourceDefinition> {
    all_resources().filter(|d| d.category == category).collect()
}

/// Resource definitions of a rarity tier.
pub fn resources_of_rarity(rarity: Rarity) -> Vec<&'static ResourceDefinition> {
    all_resources().filter(|d| d.rarity == rarity).collect()
}

/// Gathering profile of a biome. Biomes without resources (water, unknown
/// ids) return `None`.
pub fn biome_profile(biome: &str) -> Option<&'static BiomeProfile> {
    BIOMES.iter().find(|p| p.biome == biome)
}

/// Ids of every resource-bearing biome.
pub fn resource_biomes() -> impl Iterator<Item = &'static str> {
    BIOMES.iter().map(|p| p.biome)
}

/// Resources a biome can yield, in profile order. Empty for unknown biomes.
pub fn available_resources(biome: &str) -> Vec<ResourceType> {
    biome_profile(biome)
        .map(|p| p.resources.iter().map(|e| e.resource).collect())
        .unwrap_or_default()
}

/// Whether `biome` can yield `resource`.
pub fn is_available_in(biome: &str, resource: ResourceType) -> bool {
    biome_profile(biome).is_some_and(|p| p.entry_for(resource).is_some())
}

/// Glyph for a resource on an output channel.
pub fn glyph_for(resource_type: ResourceType, channel: GlyphChannel, depleted: bool) -> char {
    resource(resource_type).glyphs(channel).pick(depleted)
}

/// Glyph for a resource id. Unknown ids return `None`.
pub fn glyph_by_id(id: &str, channel: GlyphChannel, depleted: bool) -> Option<char> {
    ResourceType::from_id(id).map(|r| glyph_for(r, channel, depleted))
}

/// Display color for a resource.
pub fn color_for(resource_type: ResourceType, depleted: bool) -> &'static str {
    let colors = resource(resource_type).colors;
    if depleted {
        colors.depleted.unwrap_or(colors.normal)
    } else {
        colors.normal
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_has_a_definition() {
        for r in ResourceType::ALL {
            assert_eq!(resource(r).resource, r);
        }
        assert_eq!(all_resources().count(), 7);
    }

    #[test]
    fn profiles_satisfy_invariants() {
        assert_eq!(resource_biomes().count(), 9);
        for profile in &BIOMES {
            assert!(!profile.resources.is_empty(), "{}", profile.biome);
            assert!(profile.base_success_rate > 0.0 && profile.base_success_rate <= 1.0);
            assert!(profile.depletion_rate > 0.0 && profile.depletion_rate <= 1.0);
            assert!(profile.regeneration_time_ms > 0);
            assert!(profile.glyphs.iter().any(|g| g.resource.is_none()));
            for e in profile.resources {
                assert!(e.min_quantity >= 1);
                assert!(e.max_quantity >= e.min_quantity);
            }
            for g in profile.glyphs {
                if let Some(r) = g.resource {
                    assert!(profile.entry_for(r).is_some());
                }
            }
        }
    }

    #[test]
    fn forest_reference_profile() {
        let forest = biome_profile("forest").unwrap();
        assert_eq!(forest.base_success_rate, 0.7);
        assert_eq!(forest.depletion_rate, 0.1);
        assert_eq!(forest.regeneration_time_ms, 300_000);
        assert_eq!(forest.total_weight(), 100);
        assert_eq!(available_resources("forest"), vec![Wood, Berries]);
    }

    #[test]
    fn unknown_biomes_yield_nothing() {
        assert!(biome_profile("ocean").is_none());
        assert!(biome_profile("").is_none());
        assert!(available_resources("lake").is_empty());
        assert!(!is_available_in("ocean", Wood));
        assert!(resource_by_id("mithril").is_none());
        assert!(glyph_by_id("mithril", GlyphChannel::Ascii, false).is_none());
    }

    #[test]
    fn weighted_pick_walks_cumulative_weights() {
        let forest = biome_profile("forest").unwrap();
        assert_eq!(forest.pick_resource(0.0).unwrap().resource, Wood);
        assert_eq!(forest.pick_resource(0.599).unwrap().resource, Wood);
        assert_eq!(forest.pick_resource(0.6).unwrap().resource, Wood);
        assert_eq!(forest.pick_resource(0.601).unwrap().resource, Berries);
        assert_eq!(forest.pick_resource(0.999_999).unwrap().resource, Berries);
        // Out-of-range draws fall back to the first entry.
        assert_eq!(forest.pick_resource(2.0).unwrap().resource, Wood);
    }

    #[test]
    fn glyph_pick_includes_plain_terrain() {
        let forest = biome_profile("forest").unwrap();
        assert_eq!(forest.pick_glyph(0.0), Some(Wood));
        assert_eq!(forest.pick_glyph(0.3), Some(Berries));
        assert_eq!(forest.pick_glyph(0.5), None);
    }

    #[test]
    fn depleted_glyph_falls_back_to_normal() {
        assert_eq!(glyph_for(Berries, GlyphChannel::Unicode, true), '✿');
        assert_eq!(glyph_for(Berries, GlyphChannel::Ascii, true), ',');
        assert_eq!(glyph_for(Herbs, GlyphChannel::Ascii, true), '"');
        assert_eq!(glyph_by_id("wood", GlyphChannel::Ascii, false), Some('T'));
        assert_eq!(color_for(Clay, true), color_for(Clay, false));
        assert_ne!(color_for(Wood, true), color_for(Wood, false));
    }

    #[test]
    fn category_and_rarity_filters() {
        let rare: Vec<ResourceType> = resources_of_rarity(Rarity::Rare)
            .into_iter()
            .map(|d| d.resource)
            .collect();
        assert_eq!(rare, vec![Crystal]);
        assert_eq!(resources_in_category(ResourceCategory::Material).len(), 3);
    }
}
