//! LinkLayer: Transfer nodes.
//!
//! Generation order is storage-side, controller-side, then one per resource
//! node. Each link is also tagged with its role in `PlanRoles`, and the
//! resource-side links take over the cell of that node's buffer.

use crate::layer::*;
use crate::location::*;
use crate::plan::TransferRole;
use crate::structure::StructureKind;
use log::*;

const STORAGE_LINK_RANGE: (u8, u8) = (1, 3);
const ANCHOR_FALLBACK_RANGE: (u8, u8) = (2, 5);
const CONTROLLER_LINK_RANGE: (u8, u8) = (1, 2);
const CONTROLLER_FALLBACK_RANGE: (u8, u8) = (1, 4);
const RESOURCE_FALLBACK_RANGE: (u8, u8) = (1, 3);

/// The controller link sits next to the controller buffer, not on it: the
/// controller buffer stays planned at every tier, so the two cells coexist.
pub struct LinkLayer;

impl LinkLayer {
    fn place_tagged(
        state: &mut PlacementState,
        context: &mut PlanContext,
        role: TransferRole,
        attempts: &[(Location, (u8, u8))],
    ) -> bool {
        for (reference, range) in attempts {
            if state.place_open(context, StructureKind::Link, *reference, *range, 1) == 1 {
                if let Some(&loc) = state.locations(StructureKind::Link).last() {
                    state.roles.transfer_nodes.push((loc, role));
                    return true;
                }
            }
        }
        false
    }
}

impl PlacementLayer for LinkLayer {
    fn name(&self) -> &str {
        "link"
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(StructureKind::Link) > 0
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let target = context.target(StructureKind::Link);
        let anchor = context.anchor;

        let mut storage_attempts = Vec::new();
        if let Some(storage) = state.first(StructureKind::Storage) {
            storage_attempts.push((storage, STORAGE_LINK_RANGE));
        }
        storage_attempts.push((anchor, ANCHOR_FALLBACK_RANGE));
        Self::place_tagged(state, context, TransferRole::Storage, &storage_attempts);

        if state.count(StructureKind::Link) < target {
            let mut controller_attempts = Vec::new();
            if let Some(buffer) = state.roles.controller_buffer {
                controller_attempts.push((buffer, CONTROLLER_LINK_RANGE));
            }
            if let Some(controller) = context.controller() {
                controller_attempts.push((controller, CONTROLLER_FALLBACK_RANGE));
            }
            Self::place_tagged(state, context, TransferRole::Controller, &controller_attempts);
        }

        let buffers = state.roles.resource_buffers.clone();
        for buffer in buffers {
            if state.count(StructureKind::Link) >= target {
                break;
            }
            if state.convert(buffer, StructureKind::Container, StructureKind::Link) {
                state.roles.transfer_nodes.push((buffer, TransferRole::Resource));
            } else {
                Self::place_tagged(
                    state,
                    context,
                    TransferRole::Resource,
                    &[(buffer, RESOURCE_FALLBACK_RANGE)],
                );
            }
        }

        debug!(
            "LinkLayer: placed {} / {} links",
            state.count(StructureKind::Link),
            target
        );
    }
}
