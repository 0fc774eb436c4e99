//! ExtensionLayer: Capacity extensions.
//!
//! Two strategies are available:
//!
//! * `Ring` sweeps square rings outward from the anchor starting at radius 2,
//!   accepting any free perimeter cell that keeps a Manhattan spacing of 2
//!   from every blocking structure. If the sweep runs out before the target
//!   is met, a bounded spiral walk from an offset origin fills the rest.
//! * `Scored` gathers three candidate pools (close to the anchor, next to
//!   planned roads, open ground) and greedily accepts the best-scoring cell
//!   until the target is met. Scores reward proximity to the anchor, road
//!   adjacency and neighbouring extensions, and penalise distance from the
//!   room center.

use crate::layer::*;
use crate::location::*;
use crate::search::*;
use crate::structure::StructureKind;
use crate::terrain::*;
use fnv::FnvHashSet;
use log::*;
use serde::{Deserialize, Serialize};

const RING_START_RADIUS: u8 = 2;
const RING_MAX_RADIUS: u8 = 12;

/// Offset of the spiral fallback origin from the anchor.
const SPIRAL_ORIGIN_OFFSET: (i8, i8) = (3, 3);
const SPIRAL_MAX_STEPS: usize = 2500;

/// Cells within this Chebyshev band of the anchor form the "clustered" pool.
const CLUSTER_POOL_RANGE: (u8, u8) = (2, 6);
/// Radius of the window used to measure open ground.
const OPEN_AREA_RADIUS: u8 = 2;
/// Minimum non-wall cells in the window for the open-area pool.
const OPEN_AREA_MIN: u16 = 15;
/// Open-area candidates further than this from the anchor are ignored.
const OPEN_AREA_MAX_DISTANCE: u8 = 15;

const ANCHOR_DISTANCE_BONUS: i32 = 3;
const ANCHOR_DISTANCE_HORIZON: i32 = 20;
const ROAD_ADJACENCY_BONUS: i32 = 10;
const CENTER_DISTANCE_PENALTY: i32 = 1;
const CLUSTER_BONUS: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionStrategy {
    Ring,
    Scored,
}

impl Default for ExtensionStrategy {
    fn default() -> Self {
        ExtensionStrategy::Ring
    }
}

pub struct ExtensionLayer {
    pub strategy: ExtensionStrategy,
}

impl Default for ExtensionLayer {
    fn default() -> Self {
        ExtensionLayer {
            strategy: ExtensionStrategy::Ring,
        }
    }
}

impl PlacementLayer for ExtensionLayer {
    fn name(&self) -> &str {
        "extension"
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(StructureKind::Extension) > 0
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let target = context.target(StructureKind::Extension);

        let placed = match self.strategy {
            ExtensionStrategy::Ring => place_ring(state, context, target),
            ExtensionStrategy::Scored => place_scored(state, context, target),
        };

        debug!(
            "ExtensionLayer ({:?}): placed {} / {} extensions",
            self.strategy, placed, target
        );
    }
}

fn accept(state: &PlacementState, terrain: &FastRoomTerrain, loc: Location) -> bool {
    state.is_free(terrain, loc) && has_spacing(loc, &state.occupied)
}

fn place_ring(state: &mut PlacementState, context: &mut PlanContext, target: usize) -> usize {
    let terrain = context.terrain();
    let anchor = context.anchor;
    let mut placed = 0;

    for radius in RING_START_RADIUS..=RING_MAX_RADIUS {
        if placed >= target {
            break;
        }
        let mut cells = ring_cells(anchor, radius);
        context.order.order(&mut cells);

        for loc in cells {
            if placed >= target {
                break;
            }
            if accept(state, terrain, loc) && state.place(terrain, loc, StructureKind::Extension) {
                placed += 1;
            }
        }
    }

    if placed < target {
        let origin = anchor
            .checked_add(SPIRAL_ORIGIN_OFFSET.0, SPIRAL_ORIGIN_OFFSET.1)
            .unwrap_or(anchor);
        debug!(
            "ExtensionLayer: ring sweep exhausted at {} / {}, spiralling from {}",
            placed, target, origin
        );
        for loc in spiral_walk(origin, SPIRAL_MAX_STEPS) {
            if placed >= target {
                break;
            }
            if accept(state, terrain, loc) && state.place(terrain, loc, StructureKind::Extension) {
                placed += 1;
            }
        }
    }

    placed
}

fn candidate_pools(state: &PlacementState, context: &PlanContext) -> Vec<Location> {
    let terrain = context.terrain();
    let anchor = context.anchor;
    let mut seen: FnvHashSet<Location> = FnvHashSet::default();
    let mut candidates = Vec::new();

    let mut push = |loc: Location, candidates: &mut Vec<Location>| {
        if seen.insert(loc) && state.is_free(terrain, loc) {
            candidates.push(loc);
        }
    };

    for radius in CLUSTER_POOL_RANGE.0..=CLUSTER_POOL_RANGE.1 {
        for loc in ring_cells(anchor, radius) {
            push(loc, &mut candidates);
        }
    }

    let mut roads: Vec<Location> = state.roads.iter().copied().collect();
    roads.sort();
    for road in roads {
        for loc in road.neighbors() {
            push(loc, &mut candidates);
        }
    }

    for radius in 1..=OPEN_AREA_MAX_DISTANCE {
        for loc in ring_cells(anchor, radius) {
            if loc.in_build_bounds() && openness_in_radius(terrain, loc, OPEN_AREA_RADIUS) >= OPEN_AREA_MIN
            {
                push(loc, &mut candidates);
            }
        }
    }

    candidates
}

/// Score of a candidate ignoring neighbouring extensions.
pub fn static_score(state: &PlacementState, anchor: Location, center: Location, loc: Location) -> i32 {
    let anchor_bonus = (ANCHOR_DISTANCE_HORIZON - loc.distance_to(anchor) as i32).max(0)
        * ANCHOR_DISTANCE_BONUS;
    let road_bonus = if loc.neighbors().any(|n| state.has_road(n)) {
        ROAD_ADJACENCY_BONUS
    } else {
        0
    };
    let center_penalty = loc.distance_to(center) as i32 * CENTER_DISTANCE_PENALTY;

    anchor_bonus + road_bonus - center_penalty
}

fn place_scored(state: &mut PlacementState, context: &mut PlanContext, target: usize) -> usize {
    let terrain = context.terrain();
    let anchor = context.anchor;
    let center = context.room_center();

    let mut candidates: Vec<(Location, i32)> = candidate_pools(state, context)
        .into_iter()
        .map(|loc| (loc, static_score(state, anchor, center, loc)))
        .collect();

    let mut placed = 0;
    while placed < target {
        let best = candidates
            .iter()
            .enumerate()
            .filter(|(_, (loc, _))| accept(state, terrain, *loc))
            .map(|(index, (loc, score))| {
                let cluster = loc
                    .neighbors()
                    .filter(|n| state.locations(StructureKind::Extension).contains(n))
                    .count() as i32;
                (index, *score + cluster * CLUSTER_BONUS, loc.packed_repr())
            })
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.2.cmp(&a.2)));

        let Some((index, _, _)) = best else {
            break;
        };

        let (loc, _) = candidates.swap_remove(index);
        if state.place(terrain, loc, StructureKind::Extension) {
            placed += 1;
        }
    }

    placed
}
