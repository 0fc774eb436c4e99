use crate::location::*;
use crate::terrain::*;

/// Trait for providing room data to the planner.
/// Implementations exist for both in-game (screeps API) and offline use.
pub trait PlannerRoomDataSource {
    fn get_terrain(&self) -> &FastRoomTerrain;
    fn get_controllers(&self) -> &[Location];
    fn get_sources(&self) -> &[Location];
    fn get_minerals(&self) -> &[Location];
    /// Spawn points of hostile guardians (source keeper lairs).
    fn get_keeper_lairs(&self) -> &[Location];
}

/// Plain owned room description used by the offline world and tests.
#[derive(Clone)]
pub struct RoomData {
    pub terrain: FastRoomTerrain,
    pub controllers: Vec<Location>,
    pub sources: Vec<Location>,
    pub minerals: Vec<Location>,
    pub keeper_lairs: Vec<Location>,
}

impl RoomData {
    pub fn new(terrain: FastRoomTerrain) -> Self {
        RoomData {
            terrain,
            controllers: Vec::new(),
            sources: Vec::new(),
            minerals: Vec::new(),
            keeper_lairs: Vec::new(),
        }
    }

    pub fn with_controller(mut self, loc: Location) -> Self {
        self.controllers.push(loc);
        self
    }

    pub fn with_source(mut self, loc: Location) -> Self {
        self.sources.push(loc);
        self
    }

    pub fn with_mineral(mut self, loc: Location) -> Self {
        self.minerals.push(loc);
        self
    }

    pub fn with_keeper_lair(mut self, loc: Location) -> Self {
        self.keeper_lairs.push(loc);
        self
    }
}

impl PlannerRoomDataSource for RoomData {
    fn get_terrain(&self) -> &FastRoomTerrain {
        &self.terrain
    }

    fn get_controllers(&self) -> &[Location] {
        &self.controllers
    }

    fn get_sources(&self) -> &[Location] {
        &self.sources
    }

    fn get_minerals(&self) -> &[Location] {
        &self.minerals
    }

    fn get_keeper_lairs(&self) -> &[Location] {
        &self.keeper_lairs
    }
}
