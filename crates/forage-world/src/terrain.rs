//! Terrain collaborator seam.
//!
//! Biome generation lives outside this workspace. The resolver only needs
//! two answers about a tile: which biome it is, and (optionally) which
//! resource glyph the map currently shows there. [`Terrain`] is that narrow
//! interface; [`StaticTerrain`] is a table-backed implementation for
//! harnesses and tests.
//!
//! Glyph hints must never consume draws from the resolver's stream. The
//! shared [`hashed_glyph_hint`] derives a hint purely from `(seed, x, y)`,
//! so every engine with the same seed agrees on which tiles carry a hint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use forage_types::{Coord, ResourceType};

use crate::catalog::BiomeProfile;

/// Biome data reported for one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeReading {
    /// Biome id, matched against the catalog's profiles.
    pub biome: String,
}

impl BiomeReading {
    /// Reading for a biome id.
    pub fn new(biome: impl Into<String>) -> Self {
        Self {
            biome: biome.into(),
        }
    }
}

/// The resource glyph a renderer shows on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphHint {
    /// Resource shown, or `None` for plain terrain.
    pub resource: Option<ResourceType>,
    /// Whether the depleted variant is shown.
    pub depleted: bool,
}

/// Source of biome data and glyph hints.
pub trait Terrain {
    /// Biome at `coord`, or `None` where the terrain has no data.
    fn biome_at(&self, coord: Coord) -> Option<BiomeReading>;

    /// Glyph hint for `coord`. The default implementation offers none.
    fn resource_hint(&self, _coord: Coord, _biome: &str, _profile: &BiomeProfile) -> Option<GlyphHint> {
        None
    }
}

/// Mix a seed and a coordinate into a unit draw in `[0, 1)`.
///
/// Uses wrapping 64-bit arithmetic only; the top 32 bits of the mixed word
/// become the draw, so the division is exact.
pub fn coord_unit_draw(seed: i64, coord: Coord) -> f64 {
    let mut h = u64::from_ne_bytes(seed.to_ne_bytes());
    for axis in [coord.x, coord.y] {
        h ^= u64::from(u32::from_ne_bytes(axis.to_ne_bytes()));
        h = h.wrapping_add(0x9e37_79b9_7f4a_7c15);
        h = (h ^ (h >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        h = (h ^ (h >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        h ^= h >> 31;
    }
    let word = u32::try_from(h >> 32).unwrap_or(u32::MAX);
    f64::from(word) / 4_294_967_296.0
}

/// The shared glyph hint: the profile's glyph distribution sampled with a
/// coordinate-hashed draw. Returns `None` on plain-terrain tiles.
pub fn hashed_glyph_hint(seed: i64, coord: Coord, profile: &BiomeProfile) -> Option<GlyphHint> {
    profile
        .pick_glyph(coord_unit_draw(seed, coord))
        .map(|resource| GlyphHint {
            resource: Some(resource),
            depleted: false,
        })
}

/// Table-backed terrain.
///
/// Tiles not in the table report `default_biome` (if set). When a hint seed
/// is set, hints come from [`hashed_glyph_hint`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticTerrain {
    tiles: BTreeMap<Coord, String>,
    default_biome: Option<String>,
    hint_seed: Option<i64>,
}

impl StaticTerrain {
    /// Empty terrain: every tile reports no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Terrain where every tile is `biome` unless overridden.
    pub fn uniform(biome: impl Into<String>) -> Self {
        Self {
            default_biome: Some(biome.into()),
            ..Self::default()
        }
    }

    /// Enable coordinate-hashed glyph hints.
    #[must_use]
    pub const fn with_hint_seed(mut self, seed: i64) -> Self {
        self.hint_seed = Some(seed);
        self
    }

    /// Set the biome of one tile.
    pub fn set(&mut self, coord: Coord, biome: impl Into<String>) {
        self.tiles.insert(coord, biome.into());
    }

    /// Set the biome of every tile in the inclusive rectangle spanned by
    /// `a` and `b`.
    pub fn fill(&mut self, a: Coord, b: Coord, biome: &str) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                self.tiles.insert(Coord::new(x, y), biome.to_owned());
            }
        }
    }

    /// Number of explicitly set tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

impl Terrain for StaticTerrain {
    fn biome_at(&self, coord: Coord) -> Option<BiomeReading> {
        self.tiles
            .get(&coord)
            .or(self.default_biome.as_ref())
            .map(BiomeReading::new)
    }

    fn resource_hint(&self, coord: Coord, _biome: &str, profile: &BiomeProfile) -> Option<GlyphHint> {
        self.hint_seed
            .and_then(|seed| hashed_glyph_hint(seed, coord, profile))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::catalog::biome_profile;

    #[test]
    fn static_terrain_lookup_and_default() {
        let mut terrain = StaticTerrain::new();
        assert!(terrain.biome_at(Coord::new(0, 0)).is_none());
        terrain.set(Coord::new(0, 0), "forest");
        assert_eq!(terrain.biome_at(Coord::new(0, 0)).unwrap().biome, "forest");

        let mut meadow = StaticTerrain::uniform("grassland");
        meadow.fill(Coord::new(2, 2), Coord::new(0, 0), "swamp");
        assert_eq!(meadow.tile_count(), 9);
        assert_eq!(meadow.biome_at(Coord::new(1, 2)).unwrap().biome, "swamp");
        assert_eq!(meadow.biome_at(Coord::new(-40, 9)).unwrap().biome, "grassland");
    }

    #[test]
    fn no_hints_without_seed() {
        let forest = biome_profile("forest").unwrap();
        let terrain = StaticTerrain::uniform("forest");
        assert!(terrain.resource_hint(Coord::new(3, 3), "forest", forest).is_none());
    }

    #[test]
    fn unit_draw_is_pure_and_bounded() {
        for seed in [0, 1, -5, 12_345, i64::MAX] {
            for (x, y) in [(0, 0), (1, 0), (0, 1), (-7, 99), (i32::MIN, i32::MAX)] {
                let c = Coord::new(x, y);
                let a = coord_unit_draw(seed, c);
                assert_eq!(a, coord_unit_draw(seed, c));
                assert!((0.0..1.0).contains(&a));
            }
        }
        assert_ne!(
            coord_unit_draw(12_345, Coord::new(1, 0)),
            coord_unit_draw(12_345, Coord::new(0, 1))
        );
    }

    #[test]
    fn hashed_hints_name_profile_resources() {
        let forest = biome_profile("forest").unwrap();
        let terrain = StaticTerrain::uniform("forest").with_hint_seed(12_345);
        let mut hinted = 0;
        let mut plain = 0;
        for x in -20..20 {
            for y in -20..20 {
                let c = Coord::new(x, y);
                match terrain.resource_hint(c, "forest", forest) {
                    Some(hint) => {
                        hinted += 1;
                        assert!(forest.entry_for(hint.resource.unwrap()).is_some());
                        assert_eq!(Some(hint), hashed_glyph_hint(12_345, c, forest));
                    }
                    None => plain += 1,
                }
            }
        }
        assert!(hinted > 0);
        assert!(plain > 0);
    }
}
