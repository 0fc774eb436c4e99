pub mod container;
pub mod extension;
pub mod lab;
pub mod link;
pub mod mineral;
pub mod road_network;
pub mod spawn;
pub mod tower;
pub mod utility;

pub use container::ContainerLayer;
pub use extension::{ExtensionLayer, ExtensionStrategy};
pub use lab::LabLayer;
pub use link::LinkLayer;
pub use mineral::MineralLayer;
pub use road_network::{RoadRingLayer, RoadTrunkLayer};
pub use spawn::SpawnLayer;
pub use tower::TowerLayer;
pub use utility::UtilityLayer;

use crate::layer::PlacementLayer;

/// Build the default layer stack (15 layers).
///
/// Order is placement priority: an earlier layer always wins a contested cell.
///
/// 1. SpawnLayer -- anchor spawn, extra spawns nearby
/// 2. storage
/// 3. ContainerLayer -- resource and controller buffers
/// 4. MineralLayer -- extractor + mineral buffer
/// 5. LinkLayer -- storage, controller, resource transfer nodes
/// 6. TowerLayer
/// 7. RoadTrunkLayer -- anchor to sources, controller, extractor
/// 8. ExtensionLayer
/// 9. terminal
/// 10. LabLayer
/// 11. factory
/// 12. power_spawn
/// 13. observer
/// 14. nuker
/// 15. RoadRingLayer -- rings around anchor and extensions
pub fn default_layers(strategy: ExtensionStrategy) -> Vec<Box<dyn PlacementLayer>> {
    vec![
        Box::new(SpawnLayer),
        Box::new(UtilityLayer::storage()),
        Box::new(ContainerLayer),
        Box::new(MineralLayer),
        Box::new(LinkLayer),
        Box::new(TowerLayer),
        Box::new(RoadTrunkLayer),
        Box::new(ExtensionLayer { strategy }),
        Box::new(UtilityLayer::terminal()),
        Box::new(LabLayer),
        Box::new(UtilityLayer::factory()),
        Box::new(UtilityLayer::power_spawn()),
        Box::new(UtilityLayer::observer()),
        Box::new(UtilityLayer::nuker()),
        Box::new(RoadRingLayer),
    ]
}
