//! ContainerLayer: Resource buffers next to each resource node and one next
//! to the controller.
//!
//! A node buffer takes the most open of the node's 8 neighbours; openness
//! counts non-wall cells around the candidate, so harvesters have the most
//! room to stand. Nodes guarded by a hostile spawn point are skipped.
//!
//! The controller buffer is picked from the ring 1..=3 around the controller
//! by the same openness rule, penalised by distance so it stays close.

use crate::layer::*;
use crate::location::*;
use crate::structure::StructureKind;
use crate::terrain::*;
use log::*;
use std::cmp::Reverse;

/// Resource nodes closer than this (Chebyshev) to a keeper lair get no buffer.
pub const KEEPER_SAFETY_RADIUS: u8 = 5;

const CONTROLLER_BUFFER_RANGE: std::ops::RangeInclusive<u8> = 1..=3;

/// Openness points lost per cell of distance from the controller.
const CONTROLLER_DISTANCE_PENALTY: i16 = 2;

pub struct ContainerLayer;

impl PlacementLayer for ContainerLayer {
    fn name(&self) -> &str {
        "container"
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(StructureKind::Container) > 0
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let terrain = context.terrain();
        let anchor = context.anchor;
        let lairs = context.data.get_keeper_lairs();

        for &source in context.data.get_sources() {
            if is_guarded(source, lairs) {
                debug!("ContainerLayer: source {} is guarded, skipping", source);
                continue;
            }

            match best_adjacent(state, terrain, source, anchor) {
                Some(loc) if state.place(terrain, loc, StructureKind::Container) => {
                    state.roles.resource_buffers.push(loc);
                }
                _ => warn!("ContainerLayer: no buffer cell next to source {}", source),
            }
        }

        if let Some(controller) = context.controller() {
            let best = CONTROLLER_BUFFER_RANGE
                .flat_map(|radius| crate::search::ring_cells(controller, radius))
                .filter(|loc| state.is_free(terrain, *loc))
                .max_by_key(|loc| {
                    let openness = score_position(terrain, loc.x(), loc.y(), true) as i16;
                    let distance = loc.distance_to(controller) as i16;
                    (
                        openness - CONTROLLER_DISTANCE_PENALTY * distance,
                        Reverse(loc.distance_to(anchor)),
                        Reverse(loc.packed_repr()),
                    )
                });

            match best {
                Some(loc) if state.place(terrain, loc, StructureKind::Container) => {
                    state.roles.controller_buffer = Some(loc);
                }
                _ => warn!("ContainerLayer: no buffer cell near controller {}", controller),
            }
        }
    }
}

pub fn is_guarded(node: Location, lairs: &[Location]) -> bool {
    lairs
        .iter()
        .any(|lair| lair.distance_to(node) <= KEEPER_SAFETY_RADIUS)
}

/// The free neighbour of `node` with the highest openness, closest to the
/// anchor on ties.
pub fn best_adjacent(
    state: &PlacementState,
    terrain: &FastRoomTerrain,
    node: Location,
    anchor: Location,
) -> Option<Location> {
    node.neighbors()
        .filter(|loc| state.is_free(terrain, *loc))
        .max_by_key(|loc| {
            (
                score_position(terrain, loc.x(), loc.y(), true),
                Reverse(loc.distance_to(anchor)),
                Reverse(loc.packed_repr()),
            )
        })
}
