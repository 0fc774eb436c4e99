//! TowerLayer: Defense emitters.
//!
//! The first tower guards the anchor from close range. The second sits near
//! the middle of the room so the two together cover most of it. Any further
//! towers cluster around the anchor again.

use crate::layer::*;
use crate::structure::StructureKind;
use log::*;

const FIRST_TOWER_RANGE: (u8, u8) = (2, 4);
const CENTER_TOWER_RANGE: (u8, u8) = (3, 8);
const EXTRA_TOWER_RANGE: (u8, u8) = (2, 8);

pub struct TowerLayer;

impl PlacementLayer for TowerLayer {
    fn name(&self) -> &str {
        "tower"
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(StructureKind::Tower) > 0
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let target = context.target(StructureKind::Tower);
        let anchor = context.anchor;
        let center = context.room_center();

        let mut placed =
            state.place_open(context, StructureKind::Tower, anchor, FIRST_TOWER_RANGE, 1);

        if placed < target {
            let mut second =
                state.place_open(context, StructureKind::Tower, center, CENTER_TOWER_RANGE, 1);
            if second == 0 {
                second =
                    state.place_open(context, StructureKind::Tower, anchor, EXTRA_TOWER_RANGE, 1);
            }
            placed += second;
        }

        if placed < target {
            placed += state.place_open(
                context,
                StructureKind::Tower,
                anchor,
                EXTRA_TOWER_RANGE,
                target - placed,
            );
        }

        debug!("TowerLayer: placed {} / {} towers", placed, target);
    }
}
