//! The live world as seen by the executor and the auditor.
//!
//! `World` is the seam between the engine and whatever hosts it: the Screeps
//! game API (see `game`) or the in-memory `SimWorld`. A `World` value is the
//! view of one base; the global marker count spans every base.

use crate::error::*;
use crate::location::*;
use crate::room_data::RoomData;
use crate::structure::StructureKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a live object (a game object id).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiveRef(pub String);

impl fmt::Display for LiveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A built structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveStructure {
    pub kind: StructureKind,
    pub position: Location,
    pub live_ref: LiveRef,
}

/// An outstanding build marker (construction site).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingMarker {
    pub kind: StructureKind,
    pub position: Location,
}

pub trait World {
    /// Current game tick.
    fn time(&self) -> u32;

    /// Current progression tier of the base.
    fn tier(&self) -> u8;

    /// Terrain and room objects of the base.
    fn room_data(&self) -> RoomData;

    /// Structures of the base, optionally filtered by kind.
    fn find_structures(&self, kind: Option<StructureKind>) -> Vec<LiveStructure>;

    /// Outstanding markers of the base, optionally filtered by kind.
    fn find_pending_markers(&self, kind: Option<StructureKind>) -> Vec<PendingMarker>;

    /// Outstanding markers across every base.
    fn global_marker_count(&self) -> usize;

    fn place_marker(&mut self, position: Location, kind: StructureKind) -> Result<(), MarkerError>;

    fn destroy(&mut self, live_ref: &LiveRef) -> Result<(), WorldError>;

    /// The base anchor: position of the first spawn.
    fn anchor(&self) -> Option<Location> {
        self.find_structures(Some(StructureKind::Spawn))
            .first()
            .map(|s| s.position)
    }
}
