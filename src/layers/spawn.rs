//! SpawnLayer: The anchor spawn plus any additional spawns near it.

use crate::layer::*;
use crate::structure::StructureKind;
use log::*;

/// Range band for additional spawns around the anchor.
const EXTRA_SPAWN_RANGE: (u8, u8) = (2, 4);

/// Wider band tried when the close band is full.
const EXTRA_SPAWN_FALLBACK_RANGE: (u8, u8) = (2, 7);

/// The first spawn is the anchor itself. Further spawns (unlocked at high
/// tiers) go into the first open cell around it.
pub struct SpawnLayer;

impl PlacementLayer for SpawnLayer {
    fn name(&self) -> &str {
        "spawn"
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let terrain = context.terrain();
        let anchor = context.anchor;

        if !state.place(terrain, anchor, StructureKind::Spawn) {
            warn!("SpawnLayer: anchor {} is not placeable", anchor);
            return;
        }

        let needed = context.target(StructureKind::Spawn).saturating_sub(1);
        let mut placed = state.place_open(
            context,
            StructureKind::Spawn,
            anchor,
            EXTRA_SPAWN_RANGE,
            needed,
        );
        if placed < needed {
            placed += state.place_open(
                context,
                StructureKind::Spawn,
                anchor,
                EXTRA_SPAWN_FALLBACK_RANGE,
                needed - placed,
            );
        }

        debug!("SpawnLayer: placed {} / {} extra spawns", placed, needed);
    }
}
