pub const ROOM_WIDTH: u8 = 50;
pub const ROOM_HEIGHT: u8 = 50;
pub const ROOM_BUILD_BORDER: u8 = 2;

/// Highest controller level in the standard table.
pub const MAX_RCL: u8 = 8;

use crate::structure::StructureKind;
use fnv::FnvHashMap;

/// Maximum number of a given structure type allowed at a given RCL.
/// Returns 0 if the structure is not available at that RCL.
/// Based on the Screeps API: <https://docs.screeps.com/control.html>
///
/// Note: Road has no per-RCL limit (effectively unlimited at all RCLs).
/// Rampart and Wall share the same limits.
pub fn max_structures_at_rcl(structure_type: StructureKind, rcl: u8) -> u32 {
    match structure_type {
        StructureKind::Spawn => match rcl {
            0 => 0,
            1..=6 => 1,
            7 => 2,
            _ => 3,
        },
        StructureKind::Extension => match rcl {
            0 | 1 => 0,
            2 => 5,
            3 => 10,
            4 => 20,
            5 => 30,
            6 => 40,
            7 => 50,
            _ => 60,
        },
        StructureKind::Link => match rcl {
            0..=4 => 0,
            5 => 2,
            6 => 3,
            7 => 4,
            _ => 6,
        },
        StructureKind::Storage => match rcl {
            0..=3 => 0,
            _ => 1,
        },
        StructureKind::Tower => match rcl {
            0..=2 => 0,
            3..=4 => 1,
            5..=6 => 2,
            7 => 3,
            _ => 6,
        },
        StructureKind::Observer | StructureKind::PowerSpawn | StructureKind::Nuker => match rcl {
            0..=7 => 0,
            _ => 1,
        },
        StructureKind::Extractor | StructureKind::Terminal => match rcl {
            0..=5 => 0,
            _ => 1,
        },
        StructureKind::Lab => match rcl {
            0..=5 => 0,
            6 => 3,
            7 => 6,
            _ => 10,
        },
        StructureKind::Factory => match rcl {
            0..=6 => 0,
            _ => 1,
        },
        StructureKind::Container => 5,
        StructureKind::Rampart | StructureKind::Wall => match rcl {
            0 | 1 => 0,
            _ => 2500,
        },
        StructureKind::Road => 2500,
    }
}

/// The capability table: structure kind x progression tier -> maximum count.
///
/// Tiers run from 1 to `max_tier`. Queries outside that range return 0.
#[derive(Clone, Debug)]
pub struct Capabilities {
    max_tier: u8,
    limits: FnvHashMap<StructureKind, Vec<u32>>,
}

impl Capabilities {
    /// The standard controller structure table.
    pub fn controller_structures() -> Self {
        let limits = StructureKind::ALL
            .iter()
            .map(|&kind| {
                let counts = (1..=MAX_RCL)
                    .map(|rcl| max_structures_at_rcl(kind, rcl))
                    .collect();
                (kind, counts)
            })
            .collect();

        Capabilities {
            max_tier: MAX_RCL,
            limits,
        }
    }

    /// An empty table with every count at zero.
    pub fn empty(max_tier: u8) -> Self {
        Capabilities {
            max_tier,
            limits: FnvHashMap::default(),
        }
    }

    /// Replace the per-tier counts for one kind. `counts[0]` is tier 1;
    /// tiers past the end of `counts` reuse the last value.
    pub fn with_limits(mut self, kind: StructureKind, counts: &[u32]) -> Self {
        let expanded = (0..self.max_tier as usize)
            .map(|i| counts.get(i).or(counts.last()).copied().unwrap_or(0))
            .collect();
        self.limits.insert(kind, expanded);
        self
    }

    pub fn max_tier(&self) -> u8 {
        self.max_tier
    }

    pub fn max_count(&self, kind: StructureKind, tier: u8) -> u32 {
        if tier == 0 || tier > self.max_tier {
            return 0;
        }
        self.limits
            .get(&kind)
            .and_then(|counts| counts.get(tier as usize - 1))
            .copied()
            .unwrap_or(0)
    }

    /// Count at the highest tier, i.e. how many the final layout holds.
    pub fn final_count(&self, kind: StructureKind) -> u32 {
        self.max_count(kind, self.max_tier)
    }

    /// Minimum tier at which the Nth structure of a kind can be built.
    /// `count` is 1-based. Returns `None` if the count is never reached.
    pub fn min_tier_for_nth(&self, kind: StructureKind, count: u32) -> Option<u8> {
        if count == 0 {
            return Some(1);
        }
        (1..=self.max_tier).find(|&tier| self.max_count(kind, tier) >= count)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::controller_structures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_matches_game() {
        let caps = Capabilities::controller_structures();
        assert_eq!(caps.max_count(StructureKind::Extension, 2), 5);
        assert_eq!(caps.max_count(StructureKind::Link, 5), 2);
        assert_eq!(caps.max_count(StructureKind::Tower, 8), 6);
        assert_eq!(caps.max_count(StructureKind::Spawn, 0), 0);
        assert_eq!(caps.max_count(StructureKind::Spawn, 9), 0);
    }

    #[test]
    fn min_tier_for_nth_structure() {
        let caps = Capabilities::controller_structures();
        assert_eq!(caps.min_tier_for_nth(StructureKind::Link, 1), Some(5));
        assert_eq!(caps.min_tier_for_nth(StructureKind::Link, 3), Some(6));
        assert_eq!(caps.min_tier_for_nth(StructureKind::Link, 7), None);
    }

    #[test]
    fn custom_limits_extend_last_value() {
        let caps = Capabilities::empty(4).with_limits(StructureKind::Extension, &[0, 2]);
        assert_eq!(caps.max_count(StructureKind::Extension, 1), 0);
        assert_eq!(caps.max_count(StructureKind::Extension, 4), 2);
        assert_eq!(caps.max_count(StructureKind::Tower, 4), 0);
    }
}
