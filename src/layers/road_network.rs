//! Road layers: the transit network.
//!
//! `RoadTrunkLayer` routes A* paths from the anchor to every resource node,
//! the controller and (when an extractor is planned) the mineral. Paths run
//! incrementally, nearest destination first, and cells that already carry a
//! planned road are cheaper so later paths merge onto earlier ones. The
//! destination cell itself never gets a road.
//!
//! `RoadRingLayer` runs after every blocking kind is placed and surrounds the
//! anchor and each extension with a one-cell ring of road.

use crate::layer::*;
use crate::location::*;
use crate::structure::StructureKind;
use crate::terrain::*;
use log::*;
use pathfinding::directed::astar::astar;

/// Movement costs used when routing roads.
#[derive(Clone, Copy, Debug)]
pub struct RoadCost {
    pub plain: u32,
    pub slow: u32,
    pub existing_road: u32,
}

impl Default for RoadCost {
    fn default() -> Self {
        RoadCost {
            plain: 2,
            slow: 10,
            existing_road: 1,
        }
    }
}

pub struct RoadTrunkLayer;

impl PlacementLayer for RoadTrunkLayer {
    fn name(&self) -> &str {
        "road_trunk"
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(StructureKind::Road) > 0
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let terrain = context.terrain();
        let anchor = context.anchor;
        let cost = RoadCost::default();

        let mut destinations: Vec<Location> = context.data.get_sources().to_vec();
        destinations.extend(context.controller());
        if state.count(StructureKind::Extractor) > 0 {
            destinations.extend(state.locations(StructureKind::Extractor).iter().copied());
        }
        destinations.sort_by_key(|d| anchor.distance_to(*d));

        let mut placed = 0usize;
        for destination in destinations {
            match find_path(anchor, destination, terrain, state, cost) {
                Some(path) => {
                    // Drop the anchor and the destination itself.
                    let inner = path.len().saturating_sub(1);
                    for &loc in path.iter().take(inner).skip(1) {
                        if state.place(terrain, loc, StructureKind::Road) {
                            placed += 1;
                        }
                    }
                }
                None => warn!("RoadTrunkLayer: no path from {} to {}", anchor, destination),
            }
        }

        debug!("RoadTrunkLayer: placed {} road tiles", placed);
    }
}

pub struct RoadRingLayer;

impl PlacementLayer for RoadRingLayer {
    fn name(&self) -> &str {
        "road_ring"
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(StructureKind::Road) > 0
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let terrain = context.terrain();

        let mut centers = vec![context.anchor];
        centers.extend(state.locations(StructureKind::Extension).iter().copied());

        let mut placed = 0usize;
        for center in centers {
            for loc in center.neighbors() {
                if !state.has_road(loc) && state.place(terrain, loc, StructureKind::Road) {
                    placed += 1;
                }
            }
        }

        debug!("RoadRingLayer: placed {} road tiles", placed);
    }
}

/// A* pathfinding between two locations over the planned layout.
///
/// Walls are impassable and so are cells claimed by blocking structures,
/// except containers which units can walk over. The goal may be any cell.
pub fn find_path(
    start: Location,
    goal: Location,
    terrain: &FastRoomTerrain,
    state: &PlacementState,
    cost: RoadCost,
) -> Option<Vec<Location>> {
    let containers = state.locations(StructureKind::Container);

    let result = astar(
        &start,
        |&loc| {
            loc.neighbors()
                .filter_map(|next| {
                    if next == goal {
                        return Some((next, cost.plain));
                    }
                    if terrain.is_wall_at(next) || state.is_reserved(next) {
                        return None;
                    }
                    if state.is_occupied(next) && !containers.contains(&next) {
                        return None;
                    }
                    let step = if state.has_road(next) {
                        cost.existing_road
                    } else if terrain.is_swamp(next.x(), next.y()) {
                        cost.slow
                    } else {
                        cost.plain
                    };
                    Some((next, step))
                })
                .collect::<Vec<_>>()
        },
        |&loc| loc.distance_to(goal) as u32 * cost.existing_road,
        |&loc| loc == goal,
    );

    result.map(|(path, _cost)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_avoids_walls_and_prefers_plain() {
        // Wall column at x = 20 with a gap at y = 30; swamp row along y = 25.
        let terrain = FastRoomTerrain::from_fn(|x, y| {
            if x == 20 && y != 30 {
                TerrainClass::Wall
            } else if y == 25 {
                TerrainClass::Slow
            } else {
                TerrainClass::Plain
            }
        });
        let state = PlacementState::new();
        let start = Location::from_xy(15, 30);
        let goal = Location::from_xy(25, 30);

        let path = find_path(start, goal, &terrain, &state, RoadCost::default()).unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert!(path.iter().all(|l| !terrain.is_wall_at(*l)));
        assert!(path.contains(&Location::from_xy(20, 30)));
        assert!(path.iter().all(|l| !terrain.is_swamp(l.x(), l.y())));
    }

    #[test]
    fn path_goes_around_blocking_structures() {
        let terrain = FastRoomTerrain::plain();
        let mut state = PlacementState::new();
        for y in 10..=30 {
            state.place(&terrain, Location::from_xy(20, y), StructureKind::Extension);
        }
        let path = find_path(
            Location::from_xy(15, 20),
            Location::from_xy(25, 20),
            &terrain,
            &state,
            RoadCost::default(),
        )
        .unwrap();
        assert!(path.iter().all(|l| !state.is_occupied(*l)));
    }
}
