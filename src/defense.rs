//! Defensive shell around the final layout.
//!
//! Every cell occupied by a blocking structure is protected. Each open cell
//! touching a protected cell (8-adjacency) joins the shell: on the outer ring
//! of the grid it becomes a perimeter barrier (rampart), anywhere else a
//! closed barrier (wall). This is a single adjacency pass, so the shell is
//! exactly one cell thick.

use crate::constants::*;
use crate::location::*;
use crate::plan::*;
use crate::terrain::*;
use log::*;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Open,
    Protected,
    Wall,
}

pub fn plan_defenses(terrain: &FastRoomTerrain, top: &TierPlan) -> Defenses {
    let mut grid = RoomDataArray::new(Cell::Open);

    for y in 0..ROOM_HEIGHT {
        for x in 0..ROOM_WIDTH {
            if terrain.is_wall(x, y) {
                grid.set(x as usize, y as usize, Cell::Wall);
            }
        }
    }

    for kind in top.kinds().into_iter().filter(|k| k.is_blocking()) {
        for loc in top.locations(kind) {
            grid.set(loc.x() as usize, loc.y() as usize, Cell::Protected);
        }
    }

    let mut defenses = Defenses::default();

    for y in 0..ROOM_HEIGHT {
        for x in 0..ROOM_WIDTH {
            let loc = Location::from_xy(x, y);
            if !loc.in_build_bounds() || *grid.get(x as usize, y as usize) != Cell::Open {
                continue;
            }

            let touches_protected = NEIGHBORS_8.iter().any(|&(dx, dy)| {
                let nx = x as i16 + dx as i16;
                let ny = y as i16 + dy as i16;
                (0..ROOM_WIDTH as i16).contains(&nx)
                    && (0..ROOM_HEIGHT as i16).contains(&ny)
                    && *grid.get(nx as usize, ny as usize) == Cell::Protected
            });

            if !touches_protected {
                continue;
            }

            if loc.on_outer_ring() {
                defenses.perimeter.push(loc);
            } else {
                defenses.barriers.push(loc);
            }
        }
    }

    debug!(
        "Defense: {} barriers, {} perimeter cells",
        defenses.barriers.len(),
        defenses.perimeter.len()
    );

    defenses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::StructureKind;

    fn tier_with(kind: StructureKind, locs: &[Location]) -> TierPlan {
        let mut tier = TierPlan::default();
        tier.placements.insert(kind, locs.to_vec());
        tier
    }

    #[test]
    fn single_structure_gets_eight_cell_shell() {
        let terrain = FastRoomTerrain::plain();
        let tier = tier_with(StructureKind::Tower, &[Location::from_xy(20, 20)]);
        let defenses = plan_defenses(&terrain, &tier);

        assert_eq!(defenses.barriers.len(), 8);
        assert!(defenses.perimeter.is_empty());
        assert!(!defenses.barriers.contains(&Location::from_xy(20, 20)));
        assert!(defenses
            .barriers
            .iter()
            .all(|l| l.distance_to(Location::from_xy(20, 20)) == 1));
    }

    #[test]
    fn roads_are_not_protected_and_walls_are_skipped() {
        let terrain = FastRoomTerrain::from_fn(|x, y| {
            if x == 21 && y == 20 {
                TerrainClass::Wall
            } else {
                TerrainClass::Plain
            }
        });
        let mut tier = tier_with(StructureKind::Extension, &[Location::from_xy(20, 20)]);
        tier.placements
            .insert(StructureKind::Road, vec![Location::from_xy(30, 30)]);
        let defenses = plan_defenses(&terrain, &tier);

        assert_eq!(defenses.barriers.len(), 7);
        assert!(!defenses.barriers.contains(&Location::from_xy(21, 20)));
        assert!(defenses
            .barriers
            .iter()
            .all(|l| l.distance_to(Location::from_xy(30, 30)) > 1));
    }

    #[test]
    fn outer_ring_cells_become_perimeter() {
        let terrain = FastRoomTerrain::plain();
        let tier = tier_with(StructureKind::Spawn, &[Location::from_xy(3, 10)]);
        let defenses = plan_defenses(&terrain, &tier);

        assert_eq!(defenses.perimeter.len(), 3);
        assert!(defenses.perimeter.iter().all(|l| l.x() == 2));
        assert_eq!(defenses.barriers.len(), 5);
    }

    #[test]
    fn shell_stays_inside_build_bounds() {
        let terrain = FastRoomTerrain::plain();
        let tier = tier_with(StructureKind::Spawn, &[Location::from_xy(2, 10)]);
        let defenses = plan_defenses(&terrain, &tier);

        let cells: Vec<Location> = defenses
            .barriers
            .iter()
            .chain(defenses.perimeter.iter())
            .copied()
            .collect();
        assert!(cells.iter().all(|l| l.in_build_bounds()), "{:?}", cells);
        assert!(!cells.contains(&Location::from_xy(1, 10)));
        assert_eq!(
            defenses.perimeter,
            vec![Location::from_xy(2, 9), Location::from_xy(2, 11)]
        );
        assert_eq!(defenses.barriers.len(), 3);
    }
}
