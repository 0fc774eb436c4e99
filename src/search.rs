//! Generic position search shared by every placement layer.
//!
//! Candidate cells are produced ring by ring (Chebyshev radius) around a
//! reference point. Before a ring is scanned its cells are reordered by a
//! `RingOrder` strategy; the default shuffles them so placements do not all
//! pile up on the same side of the reference point. Tests substitute
//! `ScanOrder` to get a fixed, reproducible scan.

use crate::location::*;
use crate::terrain::*;
use fnv::FnvHashSet;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Reorders the cells of one ring before they are scanned.
pub trait RingOrder {
    fn order(&mut self, cells: &mut [Location]);
}

/// Shuffle-before-scan, driven by a seeded generator.
pub struct ShuffledRing {
    rng: SmallRng,
}

impl ShuffledRing {
    pub fn seeded(seed: u64) -> Self {
        ShuffledRing {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RingOrder for ShuffledRing {
    fn order(&mut self, cells: &mut [Location]) {
        cells.shuffle(&mut self.rng);
    }
}

/// Leaves cells in generation order (row-major along the ring's square).
#[derive(Default)]
pub struct ScanOrder;

impl RingOrder for ScanOrder {
    fn order(&mut self, _cells: &mut [Location]) {}
}

/// Cells exactly `radius` away (Chebyshev) from `center` that lie in the grid.
pub fn ring_cells(center: Location, radius: u8) -> Vec<Location> {
    let r = radius as i16;
    let cx = center.x() as i16;
    let cy = center.y() as i16;

    if r == 0 {
        return vec![center];
    }

    let mut cells = Vec::with_capacity(8 * radius as usize);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx.abs().max(dy.abs()) != r {
                continue;
            }
            if let Some(loc) = Location::checked_from_i16(cx + dx, cy + dy) {
                cells.push(loc);
            }
        }
    }
    cells
}

/// True if no location of `existing` is within Manhattan distance 1 of `loc`.
pub fn has_spacing(loc: Location, existing: &FnvHashSet<Location>) -> bool {
    if existing.contains(&loc) {
        return false;
    }
    NEIGHBORS_4.iter().all(|&(dx, dy)| {
        loc.checked_add(dx, dy)
            .map(|n| !existing.contains(&n))
            .unwrap_or(true)
    })
}

/// Expand square rings from `min_range` to `max_range` around `reference`
/// and return the first cell that is inside the build bounds, not a wall and
/// at Manhattan distance >= 2 from everything in `existing`.
pub fn find_open_position(
    terrain: &FastRoomTerrain,
    reference: Location,
    min_range: u8,
    max_range: u8,
    existing: &FnvHashSet<Location>,
    order: &mut dyn RingOrder,
) -> Option<Location> {
    find_open_position_where(terrain, reference, min_range, max_range, existing, order, |_| {
        true
    })
}

/// `find_open_position` with an extra acceptance predicate.
pub fn find_open_position_where<F>(
    terrain: &FastRoomTerrain,
    reference: Location,
    min_range: u8,
    max_range: u8,
    existing: &FnvHashSet<Location>,
    order: &mut dyn RingOrder,
    accept: F,
) -> Option<Location>
where
    F: Fn(Location) -> bool,
{
    for radius in min_range..=max_range {
        let mut cells = ring_cells(reference, radius);
        order.order(&mut cells);

        let found = cells.into_iter().find(|&loc| {
            loc.in_build_bounds()
                && !terrain.is_wall_at(loc)
                && has_spacing(loc, existing)
                && accept(loc)
        });

        if found.is_some() {
            return found;
        }
    }

    None
}

/// Square spiral walk starting at `origin`, clipped to the grid.
/// Produces at most `max_steps` cells.
pub fn spiral_walk(origin: Location, max_steps: usize) -> Vec<Location> {
    let mut cells = Vec::new();
    let (mut x, mut y) = (origin.x() as i16, origin.y() as i16);
    let (mut dx, mut dy) = (1i16, 0i16);
    let mut leg_length = 1;
    let mut steps = 0;

    'walk: while steps < max_steps {
        for _ in 0..2 {
            for _ in 0..leg_length {
                if steps >= max_steps {
                    break 'walk;
                }
                if let Some(loc) = Location::checked_from_i16(x, y) {
                    cells.push(loc);
                }
                x += dx;
                y += dy;
                steps += 1;
            }
            let turned = (-dy, dx);
            dx = turned.0;
            dy = turned.1;
        }
        leg_length += 1;
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_has_perimeter_cells_only() {
        let center = Location::from_xy(25, 25);
        let ring = ring_cells(center, 3);
        assert_eq!(ring.len(), 24);
        assert!(ring.iter().all(|c| c.distance_to(center) == 3));
        assert_eq!(ring_cells(center, 0), vec![center]);
    }

    #[test]
    fn open_position_respects_spacing() {
        let terrain = FastRoomTerrain::plain();
        let anchor = Location::from_xy(25, 25);
        let mut existing = FnvHashSet::default();
        existing.insert(anchor);

        let mut order = ShuffledRing::seeded(7);
        for _ in 0..20 {
            let found = find_open_position(&terrain, anchor, 1, 6, &existing, &mut order)
                .expect("open room has space");
            assert!(existing.iter().all(|e| e.manhattan_to(found) >= 2));
            assert!(found.in_build_bounds());
            existing.insert(found);
        }
    }

    #[test]
    fn open_position_skips_walls_and_margin() {
        let terrain = FastRoomTerrain::from_fn(|x, _| {
            if x < 45 {
                TerrainClass::Wall
            } else {
                TerrainClass::Plain
            }
        });
        let existing = FnvHashSet::default();
        let found = find_open_position(
            &terrain,
            Location::from_xy(44, 25),
            0,
            5,
            &existing,
            &mut ScanOrder,
        )
        .unwrap();
        assert!((45..=47).contains(&found.x()));

        let nothing = find_open_position(
            &terrain,
            Location::from_xy(10, 25),
            0,
            5,
            &existing,
            &mut ScanOrder,
        );
        assert_eq!(nothing, None);
    }

    #[test]
    fn scan_order_is_reproducible() {
        let terrain = FastRoomTerrain::plain();
        let existing = FnvHashSet::default();
        let anchor = Location::from_xy(10, 10);
        let a = find_open_position(&terrain, anchor, 2, 4, &existing, &mut ScanOrder);
        let b = find_open_position(&terrain, anchor, 2, 4, &existing, &mut ScanOrder);
        assert_eq!(a, b);
        assert_eq!(a, Some(Location::from_xy(8, 8)));
    }

    #[test]
    fn spiral_visits_distinct_cells() {
        let cells = spiral_walk(Location::from_xy(20, 20), 25);
        assert_eq!(cells.len(), 25);
        let unique: FnvHashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), 25);
        assert!(cells.iter().all(|c| c.distance_to(Location::from_xy(20, 20)) <= 2));
    }
}
