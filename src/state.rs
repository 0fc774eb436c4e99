//! Per-base execution record, persisted between ticks.

use crate::location::*;
use crate::structure::StructureKind;
use crate::world::LiveRef;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// Where a base is in its plan lifecycle. Auditing runs alongside
/// `Executing` and `Converged` on its own interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasePhase {
    Unplanned,
    Generating,
    Executing,
    Converged,
}

impl Default for BasePhase {
    fn default() -> Self {
        BasePhase::Unplanned
    }
}

/// A live structure whose position is not in its kind's planned set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MisalignedRecord {
    pub kind: StructureKind,
    pub position: Location,
    pub live_ref: LiveRef,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionState {
    #[serde(default)]
    pub phase: BasePhase,
    /// Kinds whose every planned position at `tier` is built or marked.
    #[serde(default)]
    pub planned_flags: FnvHashMap<StructureKind, bool>,
    /// Built structures per kind, as of the last update.
    #[serde(default)]
    pub counts: FnvHashMap<StructureKind, u32>,
    #[serde(default)]
    pub last_update_tick: u32,
    #[serde(default)]
    pub misaligned: Vec<MisalignedRecord>,
    /// Offset into the kind rotation for the next execution pass.
    #[serde(default)]
    pub rotation_cursor: usize,
    /// Last tick a non-road marker was placed.
    #[serde(default)]
    pub last_non_transit_tick: u32,
    #[serde(default)]
    pub last_audit_tick: u32,
    /// Tier the flags and counts refer to.
    #[serde(default)]
    pub tier: u8,
}

impl ExecutionState {
    pub fn is_planned(&self, kind: StructureKind) -> bool {
        self.planned_flags.get(&kind).copied().unwrap_or(false)
    }

    pub fn count(&self, kind: StructureKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Forget all progress; the base returns to `Unplanned`.
    pub fn reset(&mut self) {
        self.phase = BasePhase::Unplanned;
        self.planned_flags.clear();
        self.counts.clear();
        self.misaligned.clear();
        self.rotation_cursor = 0;
        self.tier = 0;
    }
}
