//! `World` over a live Screeps room.

use crate::error::*;
use crate::location::*;
use crate::room_data::RoomData;
use crate::structure::StructureKind;
use crate::terrain::FastRoomTerrain;
use crate::world::*;
use screeps::*;

impl StructureKind {
    pub fn to_structure_type(self) -> StructureType {
        match self {
            StructureKind::Spawn => StructureType::Spawn,
            StructureKind::Extension => StructureType::Extension,
            StructureKind::Road => StructureType::Road,
            StructureKind::Wall => StructureType::Wall,
            StructureKind::Rampart => StructureType::Rampart,
            StructureKind::Link => StructureType::Link,
            StructureKind::Storage => StructureType::Storage,
            StructureKind::Tower => StructureType::Tower,
            StructureKind::Observer => StructureType::Observer,
            StructureKind::PowerSpawn => StructureType::PowerSpawn,
            StructureKind::Extractor => StructureType::Extractor,
            StructureKind::Lab => StructureType::Lab,
            StructureKind::Terminal => StructureType::Terminal,
            StructureKind::Container => StructureType::Container,
            StructureKind::Nuker => StructureType::Nuker,
            StructureKind::Factory => StructureType::Factory,
        }
    }

    pub fn from_structure_type(structure_type: StructureType) -> Option<StructureKind> {
        StructureKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.to_structure_type() == structure_type)
    }
}

impl FastRoomTerrain {
    pub fn from_room_terrain(terrain: &RoomTerrain) -> FastRoomTerrain {
        FastRoomTerrain::new(terrain.get_raw_buffer().to_vec())
    }
}

fn to_location(pos: Position) -> Location {
    Location::from_coords(pos.x().u8() as u32, pos.y().u8() as u32)
}

/// One owned room as seen by the engine.
pub struct GameRoom {
    room: Room,
}

impl GameRoom {
    pub fn new(room: Room) -> Self {
        GameRoom { room }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }
}

impl World for GameRoom {
    fn time(&self) -> u32 {
        game::time()
    }

    fn tier(&self) -> u8 {
        self.room.controller().map(|c| c.level()).unwrap_or(0)
    }

    fn room_data(&self) -> RoomData {
        let terrain = FastRoomTerrain::from_room_terrain(&self.room.get_terrain());
        let mut data = RoomData::new(terrain);

        if let Some(controller) = self.room.controller() {
            data = data.with_controller(to_location(controller.pos()));
        }
        for source in self.room.find(find::SOURCES, None) {
            data = data.with_source(to_location(source.pos()));
        }
        for mineral in self.room.find(find::MINERALS, None) {
            data = data.with_mineral(to_location(mineral.pos()));
        }
        for structure in self.room.find(find::STRUCTURES, None) {
            if structure.structure_type() == StructureType::KeeperLair {
                data = data.with_keeper_lair(to_location(structure.pos()));
            }
        }

        data
    }

    fn find_structures(&self, kind: Option<StructureKind>) -> Vec<LiveStructure> {
        self.room
            .find(find::STRUCTURES, None)
            .into_iter()
            .filter_map(|structure| {
                let structure_kind = StructureKind::from_structure_type(structure.structure_type())?;
                if kind.map(|k| k != structure_kind).unwrap_or(false) {
                    return None;
                }
                Some(LiveStructure {
                    kind: structure_kind,
                    position: to_location(structure.pos()),
                    live_ref: LiveRef(structure.as_structure().id().to_string()),
                })
            })
            .collect()
    }

    fn find_pending_markers(&self, kind: Option<StructureKind>) -> Vec<PendingMarker> {
        self.room
            .find(find::MY_CONSTRUCTION_SITES, None)
            .into_iter()
            .filter_map(|site| {
                let site_kind = StructureKind::from_structure_type(site.structure_type())?;
                if kind.map(|k| k != site_kind).unwrap_or(false) {
                    return None;
                }
                Some(PendingMarker {
                    kind: site_kind,
                    position: to_location(site.pos()),
                })
            })
            .collect()
    }

    fn global_marker_count(&self) -> usize {
        game::construction_sites().values().count()
    }

    fn place_marker(&mut self, position: Location, kind: StructureKind) -> Result<(), MarkerError> {
        self.room
            .create_construction_site(position.x(), position.y(), kind.to_structure_type(), None)
            .map_err(|err| match err {
                RoomCreateConstructionSiteErrorCode::Full => MarkerError::Full,
                RoomCreateConstructionSiteErrorCode::InvalidTarget => MarkerError::InvalidTarget,
                other => MarkerError::Other(format!("{:?}", other)),
            })
    }

    fn destroy(&mut self, live_ref: &LiveRef) -> Result<(), WorldError> {
        let id: ObjectId<Structure> = live_ref
            .0
            .parse()
            .map_err(|_| WorldError::NotFound(live_ref.clone()))?;
        let structure = id
            .resolve()
            .ok_or_else(|| WorldError::NotFound(live_ref.clone()))?;
        structure
            .destroy()
            .map_err(|err| WorldError::Other(format!("{:?}", err)))
    }
}
