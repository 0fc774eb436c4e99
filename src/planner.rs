//! Plan generation.
//!
//! The `PlannerBuilder` provides a fluent, append-only API for configuring the
//! layer stack. The resulting `Planner` computes the max-tier layout in one
//! pass through the layers and then derives every lower tier from it, so a
//! lower tier never holds a structure the final layout would have to move.

use crate::constants::*;
use crate::defense::plan_defenses;
use crate::error::*;
use crate::layer::*;
use crate::layers::{default_layers, ExtensionStrategy};
use crate::location::*;
use crate::plan::*;
use crate::room_data::PlannerRoomDataSource;
use crate::search::RingOrder;
use crate::structure::StructureKind;
use fnv::FnvHashMap;
use itertools::Itertools;
use log::*;

/// Append-only builder for configuring the layer stack.
pub struct PlannerBuilder {
    layers: Vec<Box<dyn PlacementLayer>>,
}

impl PlannerBuilder {
    /// Start with an empty layer stack.
    pub fn new() -> Self {
        PlannerBuilder { layers: Vec::new() }
    }

    /// The default stack with the given extension strategy.
    pub fn with_extension_strategy(strategy: ExtensionStrategy) -> Self {
        PlannerBuilder {
            layers: default_layers(strategy),
        }
    }

    /// Append a layer to the end of the stack.
    pub fn add_layer(mut self, layer: Box<dyn PlacementLayer>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn build(self) -> Planner {
        Planner {
            layers: self.layers,
        }
    }
}

impl Default for PlannerBuilder {
    /// Returns a builder pre-loaded with the default 15-layer stack.
    fn default() -> Self {
        Self::with_extension_strategy(ExtensionStrategy::default())
    }
}

pub struct Planner {
    layers: Vec<Box<dyn PlacementLayer>>,
}

impl Planner {
    /// Generate the full plan for a base anchored at `anchor`.
    pub fn generate(
        &self,
        data: &dyn PlannerRoomDataSource,
        capabilities: &Capabilities,
        anchor: Location,
        order: &mut dyn RingOrder,
        time: u32,
    ) -> Result<Plan, PlanError> {
        let terrain = data.get_terrain();
        let max_tier = capabilities.max_tier();
        if max_tier == 0 {
            return Err(PlanError::NoPlan { tier: 0 });
        }

        let mut state = PlacementState::new();
        state.reserved.extend(data.get_controllers().iter().copied());
        state.reserved.extend(data.get_sources().iter().copied());
        state.reserved.extend(data.get_minerals().iter().copied());

        if !state.is_free(terrain, anchor) {
            return Err(PlanError::InvalidAnchor(anchor));
        }

        let mut context = PlanContext {
            data,
            capabilities,
            order,
            anchor,
        };

        for layer in &self.layers {
            if !layer.is_applicable(&state, &context) {
                trace!("Planner: skipping layer {}", layer.name());
                continue;
            }
            layer.place(&mut state, &mut context);
        }

        let tiers = (1..=max_tier)
            .map(|tier| {
                (
                    tier,
                    derive_tier(&state.placements, &state.roles, capabilities, tier),
                )
            })
            .collect();

        let mut plan = Plan {
            anchor,
            tiers,
            roles: state.roles,
            defenses: None,
            version: PLAN_VERSION,
            generated_at: time,
        };

        plan.defenses = plan.tier(max_tier).map(|top| plan_defenses(terrain, top));

        info!(
            "Planner: generated plan at {} with {} tiers, {} placements at tier {}",
            anchor,
            max_tier,
            plan.tier(max_tier).map(|t| t.total()).unwrap_or(0),
            max_tier
        );

        Ok(plan)
    }
}

/// Derive the layout of one tier from the max-tier placement lists.
///
/// Every kind keeps the first `cap` entries of its max-tier list, except
/// containers which are rebuilt from the buffer roles (see `buffers_for_tier`).
pub fn derive_tier(
    top: &FnvHashMap<StructureKind, Vec<Location>>,
    roles: &PlanRoles,
    capabilities: &Capabilities,
    tier: u8,
) -> TierPlan {
    let mut tier_plan = TierPlan::default();

    for &kind in StructureKind::ALL.iter() {
        let cap = capabilities.max_count(kind, tier);
        tier_plan.caps.insert(kind, cap);
        if cap == 0 {
            continue;
        }

        let locations: Vec<Location> = match kind {
            StructureKind::Container => buffers_for_tier(roles, capabilities, tier),
            _ => top
                .get(&kind)
                .map(|locs| locs.iter().take(cap as usize).copied().collect())
                .unwrap_or_default(),
        };

        if !locations.is_empty() {
            tier_plan.placements.insert(kind, locations);
        }
    }

    tier_plan
}

/// The max-tier buffer (container) list.
///
/// Order is controller buffer, resource-node buffers that never receive a
/// transfer node, then the mineral buffer when an extractor is allowed.
pub fn final_buffers(roles: &PlanRoles, capabilities: &Capabilities) -> Vec<Location> {
    let max_tier = capabilities.max_tier();
    let link_cap = capabilities.max_count(StructureKind::Link, max_tier) as usize;

    let mut buffers: Vec<Location> = roles.controller_buffer.into_iter().collect();

    for &buffer in &roles.resource_buffers {
        match roles.transfer_index(buffer) {
            Some(index) if index < link_cap => {}
            _ => buffers.push(buffer),
        }
    }

    if capabilities.max_count(StructureKind::Extractor, max_tier) > 0 {
        buffers.extend(roles.mineral_buffer);
    }

    buffers.truncate(capabilities.max_count(StructureKind::Container, max_tier) as usize);
    buffers
}

/// The buffer (container) list at `tier`, derived from `final_buffers`.
///
/// Below the first tier with transfer nodes, the resource-node cells (which
/// later hold those nodes) are injected after the controller buffer. From
/// that tier on only the first two max-tier buffers are kept. Either way the
/// list is truncated to the container cap.
pub fn buffers_for_tier(roles: &PlanRoles, capabilities: &Capabilities, tier: u8) -> Vec<Location> {
    let buffer_cap = capabilities.max_count(StructureKind::Container, tier) as usize;
    let top = final_buffers(roles, capabilities);

    if tier >= capabilities.max_tier() {
        return top.into_iter().take(buffer_cap).collect();
    }

    let link_tier = capabilities.min_tier_for_nth(StructureKind::Link, 1);

    let buffers: Vec<Location> = match link_tier {
        Some(link_tier) if tier >= link_tier => top.into_iter().take(2).collect(),
        _ => roles
            .controller_buffer
            .into_iter()
            .chain(roles.resource_buffers.iter().copied())
            .chain(top)
            .unique()
            .collect(),
    };

    buffers.into_iter().take(buffer_cap).collect()
}
