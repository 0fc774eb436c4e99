use crate::constants::*;
use crate::location::*;
use bitflags::*;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TerrainFlags: u8 {
        const NONE = 0;
        const WALL = 1;
        const SWAMP = 2;
    }
}

/// Movement class of a terrain cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainClass {
    Wall,
    Plain,
    Slow,
}

#[derive(Clone)]
pub struct FastRoomTerrain {
    buffer: Vec<u8>,
}

impl FastRoomTerrain {
    pub fn new(buffer: Vec<u8>) -> FastRoomTerrain {
        FastRoomTerrain { buffer }
    }

    /// A room with no walls or swamps.
    pub fn plain() -> FastRoomTerrain {
        FastRoomTerrain {
            buffer: vec![0; ROOM_WIDTH as usize * ROOM_HEIGHT as usize],
        }
    }

    /// Build a terrain buffer cell by cell.
    pub fn from_fn<F>(classify: F) -> FastRoomTerrain
    where
        F: Fn(u8, u8) -> TerrainClass,
    {
        let mut buffer = Vec::with_capacity(ROOM_WIDTH as usize * ROOM_HEIGHT as usize);
        for y in 0..ROOM_HEIGHT {
            for x in 0..ROOM_WIDTH {
                let flags = match classify(x, y) {
                    TerrainClass::Wall => TerrainFlags::WALL,
                    TerrainClass::Slow => TerrainFlags::SWAMP,
                    TerrainClass::Plain => TerrainFlags::NONE,
                };
                buffer.push(flags.bits());
            }
        }
        FastRoomTerrain { buffer }
    }

    pub fn get(&self, pos: &Location) -> TerrainFlags {
        self.get_xy(pos.x(), pos.y())
    }

    pub fn get_xy(&self, x: u8, y: u8) -> TerrainFlags {
        if x >= ROOM_WIDTH || y >= ROOM_HEIGHT {
            return TerrainFlags::WALL;
        }
        let index = (y as usize * ROOM_WIDTH as usize) + (x as usize);
        self.buffer
            .get(index)
            .map(|bits| TerrainFlags::from_bits_truncate(*bits))
            .unwrap_or(TerrainFlags::WALL)
    }

    pub fn classify(&self, x: u8, y: u8) -> TerrainClass {
        let flags = self.get_xy(x, y);
        if flags.contains(TerrainFlags::WALL) {
            TerrainClass::Wall
        } else if flags.contains(TerrainFlags::SWAMP) {
            TerrainClass::Slow
        } else {
            TerrainClass::Plain
        }
    }

    pub fn is_wall(&self, x: u8, y: u8) -> bool {
        self.get_xy(x, y).contains(TerrainFlags::WALL)
    }

    pub fn is_wall_at(&self, loc: Location) -> bool {
        self.is_wall(loc.x(), loc.y())
    }

    pub fn is_swamp(&self, x: u8, y: u8) -> bool {
        self.get_xy(x, y).contains(TerrainFlags::SWAMP)
    }
}

/// A 50x50 array for room-sized data.
#[derive(Clone)]
pub struct RoomDataArray<T: Copy> {
    data: Vec<T>,
}

impl<T: Copy> RoomDataArray<T> {
    pub fn new(initial: T) -> Self {
        RoomDataArray {
            data: vec![initial; (ROOM_WIDTH as usize) * (ROOM_HEIGHT as usize)],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        let index = y * (ROOM_WIDTH as usize) + x;
        &self.data[index]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let index = y * (ROOM_WIDTH as usize) + x;
        &mut self.data[index]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        *self.get_mut(x, y) = value;
    }
}

/// Neighbor offsets for 8-directional movement.
pub const NEIGHBORS_8: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Neighbor offsets for 4-directional (cardinal) movement.
pub const NEIGHBORS_4: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Openness heuristic: number of non-wall cells around `(x, y)`.
/// With `include_self` the cell itself is counted too (max 9).
pub fn score_position(terrain: &FastRoomTerrain, x: u8, y: u8, include_self: bool) -> u8 {
    let mut score = NEIGHBORS_8
        .iter()
        .filter(|&&(dx, dy)| {
            let nx = x as i16 + dx as i16;
            let ny = y as i16 + dy as i16;
            (0..ROOM_WIDTH as i16).contains(&nx)
                && (0..ROOM_HEIGHT as i16).contains(&ny)
                && !terrain.is_wall(nx as u8, ny as u8)
        })
        .count() as u8;

    if include_self && !terrain.is_wall(x, y) {
        score += 1;
    }

    score
}

/// Number of non-wall cells in the square of Chebyshev `radius` around a cell.
pub fn openness_in_radius(terrain: &FastRoomTerrain, loc: Location, radius: u8) -> u16 {
    let r = radius as i16;
    let mut open = 0u16;
    for dy in -r..=r {
        for dx in -r..=r {
            let x = loc.x() as i16 + dx;
            let y = loc.y() as i16 + dy;
            if (0..ROOM_WIDTH as i16).contains(&x)
                && (0..ROOM_HEIGHT as i16).contains(&y)
                && !terrain.is_wall(x as u8, y as u8)
            {
                open += 1;
            }
        }
    }
    open
}
