use crate::location::*;
use crate::structure::StructureKind;
use crate::visual::*;
use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bumped whenever generation changes in a way that invalidates stored plans.
pub const PLAN_VERSION: u32 = 2;

/// Target layout for one progression tier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TierPlan {
    #[serde(default)]
    pub placements: FnvHashMap<StructureKind, Vec<Location>>,
    #[serde(default)]
    pub caps: FnvHashMap<StructureKind, u32>,
}

impl TierPlan {
    pub fn locations(&self, kind: StructureKind) -> &[Location] {
        self.placements
            .get(&kind)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn cap(&self, kind: StructureKind) -> u32 {
        self.caps.get(&kind).copied().unwrap_or(0)
    }

    /// Kinds with at least one placement, in a fixed order.
    pub fn kinds(&self) -> Vec<StructureKind> {
        StructureKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.locations(*kind).is_empty())
            .collect()
    }

    pub fn contains(&self, kind: StructureKind, loc: Location) -> bool {
        self.locations(kind).contains(&loc)
    }

    pub fn planned_sets(&self) -> FnvHashMap<StructureKind, FnvHashSet<Location>> {
        self.placements
            .iter()
            .map(|(kind, locs)| (*kind, locs.iter().copied().collect()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.placements.values().map(|v| v.len()).sum()
    }
}

/// What a transfer node (link) is for. Buffer derivation for low tiers keys
/// off these roles rather than the position of a link in the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferRole {
    Storage,
    Controller,
    Resource,
}

/// Semantic roles of the buffer and transfer-node cells of the final layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRoles {
    /// Every max-tier transfer node, in the same order as the max-tier link list.
    #[serde(default)]
    pub transfer_nodes: Vec<(Location, TransferRole)>,
    #[serde(default)]
    pub controller_buffer: Option<Location>,
    #[serde(default)]
    pub mineral_buffer: Option<Location>,
    /// One buffer per usable resource node. Each cell later holds that
    /// node's transfer node once links are unlocked.
    #[serde(default)]
    pub resource_buffers: Vec<Location>,
}

impl PlanRoles {
    pub fn transfer_node(&self, role: TransferRole) -> Option<Location> {
        self.transfer_nodes
            .iter()
            .find(|(_, r)| *r == role)
            .map(|(loc, _)| *loc)
    }

    /// Index in the link list of the transfer node sitting on `loc`.
    pub fn transfer_index(&self, loc: Location) -> Option<usize> {
        self.transfer_nodes.iter().position(|(l, _)| *l == loc)
    }
}

/// Defensive shell around the final layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Defenses {
    /// Closed interior barriers (constructed walls).
    #[serde(default)]
    pub barriers: Vec<Location>,
    /// Passable barriers on the outer ring of the grid (ramparts).
    #[serde(default)]
    pub perimeter: Vec<Location>,
}

/// The complete plan for one base.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub anchor: Location,
    #[serde(default)]
    pub tiers: BTreeMap<u8, TierPlan>,
    #[serde(default)]
    pub roles: PlanRoles,
    #[serde(default)]
    pub defenses: Option<Defenses>,
    #[serde(default)]
    pub version: u32,
    #[serde(default, rename = "generatedAt")]
    pub generated_at: u32,
}

impl Plan {
    pub fn max_tier(&self) -> u8 {
        self.tiers.keys().next_back().copied().unwrap_or(0)
    }

    pub fn tier(&self, tier: u8) -> Option<&TierPlan> {
        self.tiers.get(&tier)
    }

    /// The plan to build towards at `tier`, clamped to the tiers the plan has.
    pub fn active_tier(&self, tier: u8) -> Option<&TierPlan> {
        let clamped = tier.min(self.max_tier());
        self.tiers.get(&clamped)
    }

    pub fn is_current(&self) -> bool {
        self.version == PLAN_VERSION
    }

    /// Render one tier (plus the defensive shell) using a visualizer.
    pub fn visualize<V: RoomVisualizer>(&self, tier: u8, visualizer: &mut V) {
        if let Some(tier_plan) = self.tier(tier) {
            for kind in tier_plan.kinds() {
                for location in tier_plan.locations(kind) {
                    visualizer.render(*location, kind);
                }
            }
        }

        if let Some(defenses) = &self.defenses {
            for location in &defenses.barriers {
                visualizer.render(*location, StructureKind::Wall);
            }
            for location in &defenses.perimeter {
                visualizer.render(*location, StructureKind::Rampart);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let plan: Plan = serde_json::from_str("{}").unwrap();
        assert_eq!(plan.max_tier(), 0);
        assert!(plan.defenses.is_none());
        assert!(!plan.is_current());

        let tier: TierPlan = serde_json::from_str(r#"{"placements":{"tower":[6425]}}"#).unwrap();
        assert_eq!(tier.locations(StructureKind::Tower), &[Location::from_xy(25, 25)]);
        assert_eq!(tier.cap(StructureKind::Tower), 0);
    }

    #[test]
    fn active_tier_clamps_to_highest() {
        let mut plan = Plan::default();
        plan.tiers.insert(1, TierPlan::default());
        plan.tiers.insert(2, TierPlan::default());
        assert_eq!(plan.max_tier(), 2);
        assert!(plan.active_tier(5).is_some());
        assert!(plan.active_tier(0).is_none());
    }

    #[test]
    fn roles_lookup() {
        let roles = PlanRoles {
            transfer_nodes: vec![
                (Location::from_xy(10, 10), TransferRole::Storage),
                (Location::from_xy(20, 20), TransferRole::Controller),
                (Location::from_xy(30, 30), TransferRole::Resource),
            ],
            ..Default::default()
        };
        assert_eq!(
            roles.transfer_node(TransferRole::Controller),
            Some(Location::from_xy(20, 20))
        );
        assert_eq!(roles.transfer_index(Location::from_xy(30, 30)), Some(2));
    }
}
