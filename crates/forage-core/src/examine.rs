//! Read-only projections of engine state for UI layers.
//!
//! Nothing here draws from the random stream or writes location state, so
//! examining a tile never changes what the next gather will do.

use forage_agents::InventorySink;
use forage_types::{Coord, DepletionStage, ExamineReport, GlyphChannel, ResourcePreview};
use forage_world::catalog;
use forage_world::resource::{
    effective_depletion, regeneration_remaining_ms, shrink_quantity_range, success_rate,
};
use forage_world::Terrain;

use crate::clock::Clock;
use crate::gather::GatherEngine;

impl<T: Terrain, C: Clock> GatherEngine<T, C> {
    /// Describe `coord` as the next gather would see it.
    ///
    /// Returns `None` where the terrain has no data. Biomes without a
    /// resource profile report no resources, zero depletion, and no
    /// success rate.
    pub fn examine(&self, coord: Coord) -> Option<ExamineReport> {
        let reading = self.terrain.biome_at(coord)?;
        let now_ms = self.clock.now_ms();
        let record = self.store.get(coord);

        let Some(profile) = catalog::biome_profile(&reading.biome) else {
            return Some(ExamineReport {
                coord,
                biome: reading.biome,
                depletion: 0.0,
                stage: DepletionStage::Fresh,
                success_rate: None,
                total_gathers: record.total_gathers,
                regenerates_in_ms: 0,
                resources: Vec::new(),
            });
        };

        let elapsed_ms = now_ms.saturating_sub(record.last_gathered_ms);
        let depletion =
            effective_depletion(record.depletion_level, elapsed_ms, profile.regeneration_time_ms);
        let resources = profile
            .resources
            .iter()
            .map(|entry| {
                let (min_quantity, max_quantity) = shrink_quantity_range(
                    entry.min_quantity,
                    entry.max_quantity,
                    depletion,
                    self.tuning.quantity_shrink,
                );
                ResourcePreview {
                    resource: entry.resource,
                    name: catalog::resource(entry.resource).name.to_owned(),
                    weight: entry.weight,
                    min_quantity,
                    max_quantity,
                }
            })
            .collect();

        Some(ExamineReport {
            coord,
            biome: reading.biome,
            depletion,
            stage: DepletionStage::from_level(depletion, self.tuning.depleted_threshold),
            success_rate: Some(success_rate(
                profile.base_success_rate,
                depletion,
                elapsed_ms,
                &self.tuning,
            )),
            total_gathers: record.total_gathers,
            regenerates_in_ms: regeneration_remaining_ms(
                depletion,
                record.last_gathered_ms,
                now_ms,
                profile.regeneration_time_ms,
            ),
            resources,
        })
    }

    /// Glyph a renderer should draw for the resource hinted at `coord`, in
    /// its depleted variant when the hint says so or the location is
    /// depleted. `None` on plain terrain or where there is no hint.
    pub fn glyph_at(&self, coord: Coord, channel: GlyphChannel) -> Option<char> {
        let reading = self.terrain.biome_at(coord)?;
        let profile = catalog::biome_profile(&reading.biome)?;
        let hint = self.terrain.resource_hint(coord, &reading.biome, profile)?;
        let resource = hint.resource?;
        let depleted = hint.depleted
            || self.examine(coord).is_some_and(|r| r.stage == DepletionStage::Depleted);
        Some(catalog::glyph_for(resource, channel, depleted))
    }

    /// Whether `sink` could take the largest yield `coord` can produce
    /// right now. Does not roll or write anything.
    pub fn could_carry<S: InventorySink + ?Sized>(&self, coord: Coord, sink: &S) -> bool {
        self.examine(coord)
            .and_then(|r| r.resources.iter().map(|p| p.max_quantity).max())
            .is_some_and(|max| sink.has_capacity(max))
    }
}
