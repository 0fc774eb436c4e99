//! The per-base driver and operator surface.
//!
//! `Engine` owns the configuration, the capability table, the planner and a
//! `PlanStore`. Every operation loads what it needs from the store, does its
//! work against the supplied `World` and writes the execution state back
//! last, so an interrupted tick leaves the previous state intact.

use crate::audit::*;
use crate::config::EngineConfig;
use crate::constants::Capabilities;
use crate::defense::plan_defenses;
use crate::error::*;
use crate::executor::*;
use crate::location::*;
use crate::plan::*;
use crate::planner::*;
use crate::search::ShuffledRing;
use crate::state::*;
use crate::store::PlanStore;
use crate::structure::StructureKind;
use crate::visual::RoomVisualizer;
use crate::world::World;
use log::*;
use std::hash::Hasher;

pub struct Engine<S: PlanStore> {
    config: EngineConfig,
    capabilities: Capabilities,
    planner: Planner,
    store: S,
}

impl<S: PlanStore> Engine<S> {
    pub fn new(config: EngineConfig, capabilities: Capabilities, store: S) -> Self {
        let planner = PlannerBuilder::with_extension_strategy(config.extension_strategy).build();
        Engine {
            config,
            capabilities,
            planner,
            store,
        }
    }

    /// Replace the default planner.
    pub fn with_planner(mut self, planner: Planner) -> Self {
        self.planner = planner;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn phase(&self, base: &str) -> BasePhase {
        self.store.load_state(base).phase
    }

    /// The stored plan, unless it was generated by an incompatible version.
    fn current_plan(&self, base: &str) -> Option<Plan> {
        let plan = self.store.load_plan(base)?;
        if plan.is_current() {
            Some(plan)
        } else {
            info!(
                "Plan for {} has version {} (want {}), discarding",
                base, plan.version, PLAN_VERSION
            );
            None
        }
    }

    fn seed(&self, base: &str, time: u32) -> u64 {
        self.config.seed.unwrap_or_else(|| {
            let mut hasher = fnv::FnvHasher::default();
            hasher.write(base.as_bytes());
            hasher.write_u32(time);
            hasher.finish()
        })
    }

    /// Generate and store a fresh plan for `base`.
    pub fn generate_plan(&mut self, base: &str, world: &dyn World) -> Result<Plan, PlanError> {
        let mut state = self.store.load_state(base);
        state.phase = BasePhase::Generating;
        self.store.save_state(base, &state);

        let time = world.time();
        let result = match world.anchor() {
            Some(anchor) => {
                let data = world.room_data();
                let mut order = ShuffledRing::seeded(self.seed(base, time));
                self.planner
                    .generate(&data, &self.capabilities, anchor, &mut order, time)
            }
            None => Err(PlanError::NoAnchor),
        };

        match result {
            Ok(plan) => {
                self.store.save_plan(base, &plan);
                state.phase = BasePhase::Executing;
                state.planned_flags.clear();
                state.tier = 0;
                self.store.save_state(base, &state);
                info!("Generated plan for {} anchored at {}", base, plan.anchor);
                Ok(plan)
            }
            Err(err) => {
                state.phase = BasePhase::Unplanned;
                self.store.save_state(base, &state);
                warn!("Plan generation for {} failed: {}", base, err);
                Err(err)
            }
        }
    }

    /// One tier of the stored plan.
    pub fn get_plan(&self, base: &str, tier: u8) -> Result<TierPlan, PlanError> {
        let plan = self
            .current_plan(base)
            .ok_or_else(|| PlanError::UnknownBase(base.to_owned()))?;
        plan.tier(tier).cloned().ok_or(PlanError::NoPlan { tier })
    }

    /// One scheduling opportunity for `base`: generate the plan if needed,
    /// place markers, and audit when the interval has elapsed.
    pub fn execute_once(&mut self, base: &str, world: &mut dyn World) -> Result<ExecutionReport, PlanError> {
        let mut plan = match self.current_plan(base) {
            Some(plan) => plan,
            None => self.generate_plan(base, &*world)?,
        };

        if plan.defenses.is_none() {
            let data = world.room_data();
            plan.defenses = plan
                .tier(plan.max_tier())
                .map(|top| plan_defenses(&data.terrain, top));
            self.store.save_plan(base, &plan);
        }

        let mut state = self.store.load_state(base);
        let previous = state.phase;

        let report = ConstructionExecutor::new(&self.config).execute(world, &plan, &mut state)?;

        let time = world.time();
        if time.saturating_sub(state.last_audit_tick) >= self.config.audit_interval {
            if let Some(tier_plan) = plan.active_tier(world.tier()) {
                AlignmentAuditor::new(self.config.misaligned_threshold).audit(world, tier_plan, &mut state);
            }
        }

        state.phase = if report.remaining == 0 && report.outstanding == 0 {
            BasePhase::Converged
        } else {
            BasePhase::Executing
        };
        if state.phase != previous {
            info!("Base {}: {:?} -> {:?}", base, previous, state.phase);
        }

        self.store.save_state(base, &state);
        Ok(report)
    }

    /// Run an alignment audit now, regardless of the interval.
    pub fn audit(&mut self, base: &str, world: &mut dyn World) -> Result<AuditReport, PlanError> {
        let plan = self
            .current_plan(base)
            .ok_or_else(|| PlanError::UnknownBase(base.to_owned()))?;
        let tier = world.tier();
        let tier_plan = plan.active_tier(tier).ok_or(PlanError::NoPlan { tier })?;

        let mut state = self.store.load_state(base);
        let report =
            AlignmentAuditor::new(self.config.misaligned_threshold).audit(world, tier_plan, &mut state);
        self.store.save_state(base, &state);
        Ok(report)
    }

    /// Up to `limit` planned positions at the current tier that are neither
    /// built nor marked, in plan order.
    pub fn next_pending_positions(
        &self,
        base: &str,
        world: &dyn World,
        limit: usize,
    ) -> Result<Vec<(StructureKind, Location)>, PlanError> {
        let plan = self
            .current_plan(base)
            .ok_or_else(|| PlanError::UnknownBase(base.to_owned()))?;
        let tier = world.tier();
        let tier_plan = plan.active_tier(tier).ok_or(PlanError::NoPlan { tier })?;

        let structures = world.find_structures(None);
        let markers = world.find_pending_markers(None);

        Ok(missing_positions(tier_plan, &structures, &markers)
            .into_iter()
            .flat_map(|(kind, locs)| locs.into_iter().map(move |loc| (kind, loc)))
            .take(limit)
            .collect())
    }

    pub fn visualize<V: RoomVisualizer>(&self, base: &str, tier: u8, visualizer: &mut V) -> Result<(), PlanError> {
        let plan = self
            .current_plan(base)
            .ok_or_else(|| PlanError::UnknownBase(base.to_owned()))?;
        if plan.tier(tier).is_none() {
            return Err(PlanError::NoPlan { tier });
        }
        plan.visualize(tier, visualizer);
        Ok(())
    }

    /// Drop the plan and all progress; the next execution regenerates.
    pub fn request_replan(&mut self, base: &str) {
        self.store.remove_plan(base);
        let mut state = self.store.load_state(base);
        state.reset();
        self.store.save_state(base, &state);
        info!("Replan requested for {}", base);
    }
}
