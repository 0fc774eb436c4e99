//! MineralLayer: Extractor on the mineral and a buffer beside it.

use super::container::{best_adjacent, is_guarded};
use crate::layer::*;
use crate::structure::StructureKind;
use log::*;

pub struct MineralLayer;

impl PlacementLayer for MineralLayer {
    fn name(&self) -> &str {
        "mineral"
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(StructureKind::Extractor) > 0 && !context.data.get_minerals().is_empty()
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let terrain = context.terrain();
        let anchor = context.anchor;
        let target = context.target(StructureKind::Extractor);

        for &mineral in context.data.get_minerals().iter().take(target) {
            if is_guarded(mineral, context.data.get_keeper_lairs()) {
                debug!("MineralLayer: mineral {} is guarded, skipping", mineral);
                continue;
            }

            if !state.place(terrain, mineral, StructureKind::Extractor) {
                warn!("MineralLayer: cannot place extractor on {}", mineral);
                continue;
            }

            if state.roles.mineral_buffer.is_some() {
                continue;
            }

            match best_adjacent(state, terrain, mineral, anchor) {
                Some(loc) if state.place(terrain, loc, StructureKind::Container) => {
                    state.roles.mineral_buffer = Some(loc);
                }
                _ => warn!("MineralLayer: no buffer cell next to mineral {}", mineral),
            }
        }
    }
}
