//! LabLayer: The synthesis lab cluster. One seed lab a little away from the
//! anchor, the rest packed around the seed so every lab stays in reaction
//! range of the first two.

use crate::layer::*;
use crate::structure::StructureKind;
use log::*;

const SEED_LAB_RANGE: (u8, u8) = (4, 10);
const CLUSTER_RANGE: (u8, u8) = (1, 4);
const FALLBACK_RANGE: (u8, u8) = (4, 14);

pub struct LabLayer;

impl PlacementLayer for LabLayer {
    fn name(&self) -> &str {
        "lab"
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(StructureKind::Lab) > 0
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let target = context.target(StructureKind::Lab);
        let anchor = context.anchor;

        if state.place_open(context, StructureKind::Lab, anchor, SEED_LAB_RANGE, 1) == 0 {
            warn!("LabLayer: no room for the seed lab");
            return;
        }

        let seed = match state.first(StructureKind::Lab) {
            Some(loc) => loc,
            None => return,
        };

        let mut placed = 1;
        placed += state.place_open(context, StructureKind::Lab, seed, CLUSTER_RANGE, target - placed);
        if placed < target {
            placed +=
                state.place_open(context, StructureKind::Lab, anchor, FALLBACK_RANGE, target - placed);
        }

        debug!("LabLayer: placed {} / {} labs", placed, target);
    }
}
