//! Single-instance structures placed by one open-position search each:
//! storage, terminal, factory, power spawn, observer and nuker.

use crate::layer::*;
use crate::structure::StructureKind;
use log::*;

/// Places `target(kind)` structures of one kind in a range band around the
/// anchor. Skipped entirely when the kind is never unlocked.
pub struct UtilityLayer {
    name: &'static str,
    kind: StructureKind,
    range: (u8, u8),
}

impl UtilityLayer {
    pub const fn new(name: &'static str, kind: StructureKind, range: (u8, u8)) -> Self {
        UtilityLayer { name, kind, range }
    }

    pub const fn storage() -> Self {
        Self::new("storage", StructureKind::Storage, (2, 5))
    }

    pub const fn terminal() -> Self {
        Self::new("terminal", StructureKind::Terminal, (2, 6))
    }

    pub const fn factory() -> Self {
        Self::new("factory", StructureKind::Factory, (2, 7))
    }

    pub const fn power_spawn() -> Self {
        Self::new("power_spawn", StructureKind::PowerSpawn, (2, 7))
    }

    pub const fn observer() -> Self {
        Self::new("observer", StructureKind::Observer, (3, 12))
    }

    pub const fn nuker() -> Self {
        Self::new("nuker", StructureKind::Nuker, (3, 10))
    }
}

impl PlacementLayer for UtilityLayer {
    fn name(&self) -> &str {
        self.name
    }

    fn is_applicable(&self, _state: &PlacementState, context: &PlanContext) -> bool {
        context.target(self.kind) > 0
    }

    fn place(&self, state: &mut PlacementState, context: &mut PlanContext) {
        let target = context.target(self.kind);
        let anchor = context.anchor;
        let placed = state.place_open(context, self.kind, anchor, self.range, target);

        if placed < target {
            warn!(
                "{}: only placed {} / {} in range {:?}",
                self.name, placed, target, self.range
            );
        }
    }
}
