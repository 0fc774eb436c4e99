//! In-memory world for offline runs and tests.
//!
//! `SimWorld` holds any number of rooms. `SimWorld::room` hands out a
//! `SimRoom` view implementing `World` for one of them; markers placed
//! through a view count against the world-wide marker limit.

use crate::constants::Capabilities;
use crate::error::*;
use crate::location::*;
use crate::room_data::RoomData;
use crate::structure::StructureKind;
use crate::world::*;
use fnv::FnvHashMap;

/// Markers the host allows in total, across every room.
pub const MAX_CONSTRUCTION_SITES: usize = 100;

struct RoomState {
    data: RoomData,
    tier: u8,
    structures: Vec<LiveStructure>,
    markers: Vec<PendingMarker>,
}

pub struct SimWorld {
    time: u32,
    capabilities: Capabilities,
    rooms: FnvHashMap<String, RoomState>,
    next_id: u64,
}

impl Default for SimWorld {
    fn default() -> Self {
        SimWorld {
            time: 1,
            capabilities: Capabilities::controller_structures(),
            rooms: FnvHashMap::default(),
            next_id: 0,
        }
    }
}

impl SimWorld {
    pub fn new(capabilities: Capabilities) -> Self {
        SimWorld {
            capabilities,
            ..Default::default()
        }
    }

    pub fn add_room(&mut self, name: &str, data: RoomData, tier: u8) {
        self.rooms.insert(
            name.to_owned(),
            RoomState {
                data,
                tier,
                structures: Vec::new(),
                markers: Vec::new(),
            },
        );
    }

    /// A `World` view of one room.
    pub fn room(&mut self, name: &str) -> Option<SimRoom<'_>> {
        if self.rooms.contains_key(name) {
            Some(SimRoom {
                world: self,
                name: name.to_owned(),
            })
        } else {
            None
        }
    }

    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn advance(&mut self, ticks: u32) {
        self.time += ticks;
    }

    pub fn set_tier(&mut self, name: &str, tier: u8) {
        if let Some(room) = self.rooms.get_mut(name) {
            room.tier = tier;
        }
    }

    /// Add a finished structure directly, bypassing markers.
    pub fn add_structure(&mut self, name: &str, kind: StructureKind, position: Location) -> Option<LiveRef> {
        let live_ref = self.allocate_ref();
        let room = self.rooms.get_mut(name)?;
        room.structures.push(LiveStructure {
            kind,
            position,
            live_ref: live_ref.clone(),
        });
        Some(live_ref)
    }

    pub fn structures(&self, name: &str) -> &[LiveStructure] {
        self.rooms
            .get(name)
            .map(|r| r.structures.as_slice())
            .unwrap_or(&[])
    }

    pub fn markers(&self, name: &str) -> &[PendingMarker] {
        self.rooms
            .get(name)
            .map(|r| r.markers.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_markers(&self) -> usize {
        self.rooms.values().map(|r| r.markers.len()).sum()
    }

    /// Finish up to `count` of a room's oldest markers. Returns how many
    /// became structures.
    pub fn complete_markers(&mut self, name: &str, count: usize) -> usize {
        let finished: Vec<PendingMarker> = match self.rooms.get_mut(name) {
            Some(room) => {
                let n = count.min(room.markers.len());
                room.markers.drain(..n).collect()
            }
            None => return 0,
        };

        for marker in &finished {
            self.add_structure(name, marker.kind, marker.position);
        }
        finished.len()
    }

    fn allocate_ref(&mut self) -> LiveRef {
        self.next_id += 1;
        LiveRef(format!("{:x}", self.next_id))
    }
}

/// One room of a `SimWorld`.
pub struct SimRoom<'a> {
    world: &'a mut SimWorld,
    name: String,
}

impl<'a> SimRoom<'a> {
    fn state(&self) -> Option<&RoomState> {
        self.world.rooms.get(&self.name)
    }
}

impl<'a> World for SimRoom<'a> {
    fn time(&self) -> u32 {
        self.world.time
    }

    fn tier(&self) -> u8 {
        self.state().map(|r| r.tier).unwrap_or(0)
    }

    fn room_data(&self) -> RoomData {
        match self.state() {
            Some(room) => room.data.clone(),
            None => RoomData::new(crate::terrain::FastRoomTerrain::plain()),
        }
    }

    fn find_structures(&self, kind: Option<StructureKind>) -> Vec<LiveStructure> {
        self.state()
            .map(|room| {
                room.structures
                    .iter()
                    .filter(|s| kind.map(|k| k == s.kind).unwrap_or(true))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_pending_markers(&self, kind: Option<StructureKind>) -> Vec<PendingMarker> {
        self.state()
            .map(|room| {
                room.markers
                    .iter()
                    .filter(|m| kind.map(|k| k == m.kind).unwrap_or(true))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn global_marker_count(&self) -> usize {
        self.world.total_markers()
    }

    fn place_marker(&mut self, position: Location, kind: StructureKind) -> Result<(), MarkerError> {
        if self.world.total_markers() >= MAX_CONSTRUCTION_SITES {
            return Err(MarkerError::Full);
        }

        let world = &mut *self.world;
        let room = world
            .rooms
            .get_mut(&self.name)
            .ok_or_else(|| MarkerError::Other(format!("unknown room {}", self.name)))?;

        if !position.in_build_bounds() || room.data.terrain.is_wall_at(position) {
            return Err(MarkerError::InvalidTarget);
        }
        if room.markers.iter().any(|m| m.position == position) {
            return Err(MarkerError::InvalidTarget);
        }
        let conflict = room.structures.iter().any(|s| {
            s.position == position && (s.kind == kind || (kind.is_blocking() && s.kind.is_blocking()))
        });
        if conflict {
            return Err(MarkerError::InvalidTarget);
        }

        let existing = room.structures.iter().filter(|s| s.kind == kind).count()
            + room.markers.iter().filter(|m| m.kind == kind).count();
        if existing as u32 >= world.capabilities.max_count(kind, room.tier) {
            return Err(MarkerError::Other(format!("{:?} limit reached at tier {}", kind, room.tier)));
        }

        room.markers.push(PendingMarker { kind, position });
        Ok(())
    }

    fn destroy(&mut self, live_ref: &LiveRef) -> Result<(), WorldError> {
        let room = self
            .world
            .rooms
            .get_mut(&self.name)
            .ok_or_else(|| WorldError::Other(format!("unknown room {}", self.name)))?;

        match room.structures.iter().position(|s| &s.live_ref == live_ref) {
            Some(index) => {
                room.structures.remove(index);
                Ok(())
            }
            None => Err(WorldError::NotFound(live_ref.clone())),
        }
    }
}
