//! Core types shared by the placement layers.
//!
//! `PlacementState` is the evolving top-tier layout. Layers run in priority
//! order and each one only ever claims cells nothing earlier has claimed, so
//! a higher-priority kind always wins a contested cell.

use crate::constants::*;
use crate::location::*;
use crate::plan::PlanRoles;
use crate::room_data::PlannerRoomDataSource;
use crate::search::*;
use crate::structure::StructureKind;
use crate::terrain::*;
use fnv::{FnvHashMap, FnvHashSet};

/// The evolving plan state passed through the layer stack.
#[derive(Clone, Default)]
pub struct PlacementState {
    /// Ordered placements per kind, in generation order.
    pub placements: FnvHashMap<StructureKind, Vec<Location>>,
    /// Tiles claimed by blocking structures.
    pub occupied: FnvHashSet<Location>,
    /// Tiles carrying a planned road.
    pub roads: FnvHashSet<Location>,
    /// Room objects (controller, sources, minerals) that nothing may be built on.
    pub reserved: FnvHashSet<Location>,
    /// Semantic roles of buffers and transfer nodes.
    pub roles: PlanRoles,
}

impl PlacementState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locations(&self, kind: StructureKind) -> &[Location] {
        self.placements
            .get(&kind)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, kind: StructureKind) -> usize {
        self.locations(kind).len()
    }

    pub fn first(&self, kind: StructureKind) -> Option<Location> {
        self.locations(kind).first().copied()
    }

    pub fn is_occupied(&self, loc: Location) -> bool {
        self.occupied.contains(&loc)
    }

    pub fn has_road(&self, loc: Location) -> bool {
        self.roads.contains(&loc)
    }

    pub fn is_reserved(&self, loc: Location) -> bool {
        self.reserved.contains(&loc)
    }

    /// A blocking structure could be placed here: buildable, not a wall and
    /// not claimed by anything yet (roads included).
    pub fn is_free(&self, terrain: &FastRoomTerrain, loc: Location) -> bool {
        loc.in_build_bounds()
            && !terrain.is_wall_at(loc)
            && !self.is_occupied(loc)
            && !self.has_road(loc)
            && !self.is_reserved(loc)
    }

    /// A road could be placed here. Roads may share a cell with containers.
    pub fn is_free_for_road(&self, terrain: &FastRoomTerrain, loc: Location) -> bool {
        if !loc.in_build_bounds() || terrain.is_wall_at(loc) || self.is_reserved(loc) {
            return false;
        }
        if !self.is_occupied(loc) {
            return true;
        }
        self.locations(StructureKind::Container).contains(&loc)
    }

    /// Record a placement. Returns false (and changes nothing) if the cell is
    /// already taken for this kind of structure.
    pub fn place(&mut self, terrain: &FastRoomTerrain, loc: Location, kind: StructureKind) -> bool {
        match kind {
            StructureKind::Road => {
                if self.has_road(loc) || !self.is_free_for_road(terrain, loc) {
                    return false;
                }
                self.roads.insert(loc);
            }
            StructureKind::Extractor => {
                // Extractors sit on their mineral, which is reserved.
                if self.is_occupied(loc) || terrain.is_wall_at(loc) || !loc.in_build_bounds() {
                    return false;
                }
                self.occupied.insert(loc);
            }
            _ => {
                if !self.is_free(terrain, loc) {
                    return false;
                }
                if kind.is_blocking() {
                    self.occupied.insert(loc);
                }
            }
        }

        self.placements.entry(kind).or_default().push(loc);
        true
    }

    /// Move a placement from one kind to another without releasing the cell.
    pub fn convert(&mut self, loc: Location, from: StructureKind, to: StructureKind) -> bool {
        let removed = match self.placements.get_mut(&from) {
            Some(locs) => match locs.iter().position(|l| *l == loc) {
                Some(index) => {
                    locs.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };
        if removed {
            self.placements.entry(to).or_default().push(loc);
        }
        removed
    }

    /// `find_open_position` against everything claimed so far.
    pub fn find_open(
        &self,
        terrain: &FastRoomTerrain,
        reference: Location,
        min_range: u8,
        max_range: u8,
        order: &mut dyn RingOrder,
    ) -> Option<Location> {
        find_open_position_where(
            terrain,
            reference,
            min_range,
            max_range,
            &self.occupied,
            order,
            |loc| self.is_free(terrain, loc),
        )
    }

    /// Place up to `count` structures of `kind` via repeated open-position
    /// searches around `reference`. Returns how many were placed.
    pub fn place_open(
        &mut self,
        context: &mut PlanContext,
        kind: StructureKind,
        reference: Location,
        range: (u8, u8),
        count: usize,
    ) -> usize {
        let terrain = context.terrain();
        let mut placed = 0;
        while placed < count {
            let found = self.find_open(terrain, reference, range.0, range.1, &mut *context.order);
            match found {
                Some(loc) if self.place(terrain, loc, kind) => placed += 1,
                _ => break,
            }
        }
        placed
    }
}

/// Everything a layer may read while placing.
pub struct PlanContext<'a> {
    pub data: &'a dyn PlannerRoomDataSource,
    pub capabilities: &'a crate::constants::Capabilities,
    pub order: &'a mut dyn RingOrder,
    pub anchor: Location,
}

impl<'a> PlanContext<'a> {
    pub fn terrain(&self) -> &'a FastRoomTerrain {
        self.data.get_terrain()
    }

    pub fn controller(&self) -> Option<Location> {
        self.data.get_controllers().first().copied()
    }

    /// How many of `kind` the final (max tier) layout holds.
    pub fn target(&self, kind: StructureKind) -> usize {
        self.capabilities.final_count(kind) as usize
    }

    pub fn room_center(&self) -> Location {
        Location::from_xy(ROOM_WIDTH / 2, ROOM_HEIGHT / 2)
    }
}

/// A placement layer proposes positions for one structure kind (or a small
/// group of related kinds) and records them in the `PlacementState`.
///
/// Layers are stateless -- all mutable state lives in `PlacementState`.
pub trait PlacementLayer {
    /// Human-readable name for debugging.
    fn name(&self) -> &str;

    /// Quick check before placing. Return false to skip this layer.
    fn is_applicable(&self, _state: &PlacementState, _context: &PlanContext) -> bool {
        true
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roads_and_blocking_do_not_share() {
        let terrain = FastRoomTerrain::plain();
        let mut state = PlacementState::new();
        let loc = Location::from_xy(20, 20);

        assert!(state.place(&terrain, loc, StructureKind::Road));
        assert!(!state.place(&terrain, loc, StructureKind::Extension));
        assert!(!state.place(&terrain, loc, StructureKind::Road));
    }

    #[test]
    fn roads_may_cross_containers() {
        let terrain = FastRoomTerrain::plain();
        let mut state = PlacementState::new();
        let loc = Location::from_xy(20, 20);

        assert!(state.place(&terrain, loc, StructureKind::Container));
        assert!(state.place(&terrain, loc, StructureKind::Road));
        assert!(state.place(&terrain, Location::from_xy(20, 21), StructureKind::Tower));
    }

    #[test]
    fn margin_cells_are_rejected() {
        let terrain = FastRoomTerrain::plain();
        let mut state = PlacementState::new();
        assert!(!state.place(&terrain, Location::from_xy(1, 20), StructureKind::Tower));
        assert!(!state.place(&terrain, Location::from_xy(20, 48), StructureKind::Road));
        assert_eq!(state.count(StructureKind::Tower), 0);
    }
}
