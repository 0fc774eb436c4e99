use serde::{Deserialize, Serialize};

/// Every structure kind the planner knows how to place.
///
/// Serialized with the Screeps structure type strings so persisted plans stay
/// readable from the game console.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructureKind {
    Spawn,
    Extension,
    Road,
    #[serde(rename = "constructedWall")]
    Wall,
    Rampart,
    Link,
    Storage,
    Tower,
    Observer,
    PowerSpawn,
    Extractor,
    Lab,
    Terminal,
    Container,
    Nuker,
    Factory,
}

impl StructureKind {
    pub const ALL: [StructureKind; 16] = [
        StructureKind::Spawn,
        StructureKind::Extension,
        StructureKind::Road,
        StructureKind::Wall,
        StructureKind::Rampart,
        StructureKind::Link,
        StructureKind::Storage,
        StructureKind::Tower,
        StructureKind::Observer,
        StructureKind::PowerSpawn,
        StructureKind::Extractor,
        StructureKind::Lab,
        StructureKind::Terminal,
        StructureKind::Container,
        StructureKind::Nuker,
        StructureKind::Factory,
    ];

    /// Kinds that occupy their cell exclusively. Roads and barriers may share.
    pub fn is_blocking(self) -> bool {
        !matches!(
            self,
            StructureKind::Road | StructureKind::Wall | StructureKind::Rampart
        )
    }

    pub fn is_transit(self) -> bool {
        self == StructureKind::Road
    }

    /// Order in which misaligned structures are torn down, lower first.
    /// `None` means the kind is never removed automatically.
    pub fn removal_priority(self) -> Option<u8> {
        match self {
            StructureKind::Road => Some(0),
            StructureKind::Extension => Some(1),
            StructureKind::Container => Some(2),
            StructureKind::Tower => Some(3),
            _ => None,
        }
    }

    /// Single character used by the text visualizer.
    pub fn glyph(self) -> char {
        match self {
            StructureKind::Spawn => 'S',
            StructureKind::Extension => 'e',
            StructureKind::Road => '.',
            StructureKind::Wall => 'W',
            StructureKind::Rampart => 'R',
            StructureKind::Link => 'l',
            StructureKind::Storage => 'O',
            StructureKind::Tower => 'T',
            StructureKind::Observer => 'b',
            StructureKind::PowerSpawn => 'P',
            StructureKind::Extractor => 'x',
            StructureKind::Lab => 'L',
            StructureKind::Terminal => 'M',
            StructureKind::Container => 'c',
            StructureKind::Nuker => 'N',
            StructureKind::Factory => 'F',
        }
    }
}
