pub mod audit;
pub mod config;
pub mod constants;
pub mod defense;
pub mod engine;
pub mod error;
pub mod executor;
pub mod layer;
pub mod layers;
pub mod location;
pub mod plan;
pub mod planner;
pub mod room_data;
pub mod search;
pub mod sim;
pub mod state;
pub mod store;
pub mod structure;
pub mod terrain;
pub mod visual;
pub mod world;

#[cfg(feature = "screeps")]
pub mod game;

pub use audit::{AlignmentAuditor, AuditReport};
pub use config::EngineConfig;
pub use constants::Capabilities;
pub use engine::Engine;
pub use error::{MarkerError, PlanError, WorldError};
pub use executor::{ConstructionExecutor, ExecutionReport};
pub use layers::ExtensionStrategy;
pub use location::Location;
pub use plan::{Defenses, Plan, PlanRoles, TierPlan, TransferRole, PLAN_VERSION};
pub use planner::{Planner, PlannerBuilder};
pub use room_data::{PlannerRoomDataSource, RoomData};
pub use search::{RingOrder, ScanOrder, ShuffledRing};
pub use sim::SimWorld;
pub use state::{BasePhase, ExecutionState, MisalignedRecord};
pub use store::{MemoryStore, PlanStore};
pub use structure::StructureKind;
pub use terrain::{FastRoomTerrain, TerrainClass};
pub use visual::{RoomVisualizer, TextVisualizer};
pub use world::{LiveRef, LiveStructure, PendingMarker, World};

#[cfg(feature = "screeps")]
pub use game::GameRoom;
