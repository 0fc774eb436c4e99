use crate::constants::*;
use serde::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_coords(x: u32, y: u32) -> Self {
        Location {
            packed: ((x << 8) | y) as u16,
        }
    }

    #[inline]
    pub fn from_xy(x: u8, y: u8) -> Self {
        Self::from_coords(x as u32, y as u32)
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Chebyshev distance.
    pub fn distance_to(self, other: Self) -> u8 {
        let dx = (self.x() as i16) - (other.x() as i16);
        let dy = (self.y() as i16) - (other.y() as i16);

        dx.abs().max(dy.abs()) as u8
    }

    pub fn manhattan_to(self, other: Self) -> u8 {
        let dx = (self.x() as i16) - (other.x() as i16);
        let dy = (self.y() as i16) - (other.y() as i16);

        (dx.abs() + dy.abs()) as u8
    }

    /// Offset by `(dx, dy)`, returning `None` when the result leaves the grid.
    pub fn checked_add(self, dx: i8, dy: i8) -> Option<Location> {
        Self::checked_from_i16(self.x() as i16 + dx as i16, self.y() as i16 + dy as i16)
    }

    pub fn checked_from_i16(x: i16, y: i16) -> Option<Location> {
        if (0..ROOM_WIDTH as i16).contains(&x) && (0..ROOM_HEIGHT as i16).contains(&y) {
            Some(Location::from_coords(x as u32, y as u32))
        } else {
            None
        }
    }

    /// True if the cell lies inside `[ROOM_BUILD_BORDER, size - ROOM_BUILD_BORDER]`,
    /// the only cells any placement may claim.
    pub fn in_build_bounds(self) -> bool {
        let min = ROOM_BUILD_BORDER;
        let max_x = ROOM_WIDTH - ROOM_BUILD_BORDER - 1;
        let max_y = ROOM_HEIGHT - ROOM_BUILD_BORDER - 1;

        (min..=max_x).contains(&self.x()) && (min..=max_y).contains(&self.y())
    }

    /// True for cells at or outside the edge of the buildable area.
    pub fn on_outer_ring(self) -> bool {
        let min = ROOM_BUILD_BORDER;
        let max_x = ROOM_WIDTH - ROOM_BUILD_BORDER - 1;
        let max_y = ROOM_HEIGHT - ROOM_BUILD_BORDER - 1;

        self.x() <= min || self.y() <= min || self.x() >= max_x || self.y() >= max_y
    }

    pub fn neighbors(self) -> impl Iterator<Item = Location> {
        crate::terrain::NEIGHBORS_8
            .iter()
            .filter_map(move |&(dx, dy)| self.checked_add(dx, dy))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(Location::from_packed)
    }
}
