//! ConstructionExecutor: turns the active tier's plan into build markers.
//!
//! Each pass tops the base up to `markers_per_base` outstanding markers
//! without pushing the global count past `global_marker_cap`. Kinds are
//! tried in a rotating order so every kind eventually gets a turn; roads go
//! last while they dominate the outstanding markers or while nothing else
//! has been placed for `starvation_ticks`.

use crate::config::EngineConfig;
use crate::error::*;
use crate::location::*;
use crate::plan::*;
use crate::state::ExecutionState;
use crate::structure::StructureKind;
use crate::world::*;
use fnv::{FnvHashMap, FnvHashSet};
use itertools::Itertools;
use log::*;

/// Outcome of one execution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub sites_created: usize,
    /// Kinds that had at least one placement attempt, in attempt order.
    pub attempted_kinds: Vec<StructureKind>,
    /// Planned positions neither built nor marked after this pass.
    pub remaining: usize,
    /// Outstanding markers of the base after this pass.
    pub outstanding: usize,
    /// Obsolete buffers torn down to make room for a planned structure.
    pub cleared: Vec<Location>,
}

/// Planned positions of each kind that are neither built nor marked, in
/// plan order. Kinds with nothing missing are omitted.
pub fn missing_positions(
    tier_plan: &TierPlan,
    structures: &[LiveStructure],
    markers: &[PendingMarker],
) -> Vec<(StructureKind, Vec<Location>)> {
    let built: FnvHashSet<(StructureKind, Location)> =
        structures.iter().map(|s| (s.kind, s.position)).collect();
    let blocked: FnvHashSet<Location> = structures
        .iter()
        .filter(|s| s.kind.is_blocking())
        .map(|s| s.position)
        .collect();
    let marked: FnvHashSet<Location> = markers.iter().map(|m| m.position).collect();

    tier_plan
        .kinds()
        .into_iter()
        .filter_map(|kind| {
            let missing: Vec<Location> = tier_plan
                .locations(kind)
                .iter()
                .copied()
                .filter(|loc| {
                    !built.contains(&(kind, *loc))
                        && !marked.contains(loc)
                        && !(kind.is_blocking() && blocked.contains(loc))
                })
                .collect();
            if missing.is_empty() {
                None
            } else {
                Some((kind, missing))
            }
        })
        .collect()
}

/// Planned cells of blocking kinds held by a live blocking structure of a
/// different kind, in plan order.
pub fn blocked_positions(tier_plan: &TierPlan, structures: &[LiveStructure]) -> Vec<(StructureKind, LiveStructure)> {
    let occupants: FnvHashMap<Location, &LiveStructure> = structures
        .iter()
        .filter(|s| s.kind.is_blocking())
        .map(|s| (s.position, s))
        .collect();

    tier_plan
        .kinds()
        .into_iter()
        .filter(|kind| kind.is_blocking())
        .flat_map(|kind| {
            tier_plan
                .locations(kind)
                .iter()
                .filter_map(|loc| occupants.get(loc))
                .filter(move |occupant| occupant.kind != kind)
                .map(move |occupant| (kind, (*occupant).clone()))
                .collect::<Vec<_>>()
        })
        .collect()
}

pub struct ConstructionExecutor<'a> {
    config: &'a EngineConfig,
}

impl<'a> ConstructionExecutor<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        ConstructionExecutor { config }
    }

    /// Kind order for this pass, starting at the persisted cursor.
    pub fn rotation(
        &self,
        kinds: &[StructureKind],
        state: &ExecutionState,
        markers: &[PendingMarker],
        time: u32,
    ) -> Vec<StructureKind> {
        if kinds.is_empty() {
            return Vec::new();
        }

        let start = state.rotation_cursor % kinds.len();
        let rotated = kinds[start..].iter().chain(kinds[..start].iter()).copied();

        let transit_markers = markers.iter().filter(|m| m.kind.is_transit()).count();
        let dominated = !markers.is_empty()
            && transit_markers as f32 / markers.len() as f32 > self.config.transit_dominance;
        let starving =
            time.saturating_sub(state.last_non_transit_tick) >= self.config.starvation_ticks;

        if dominated || starving {
            let (transit, other): (Vec<_>, Vec<_>) = rotated.partition(|k| k.is_transit());
            other.into_iter().chain(transit).collect()
        } else {
            rotated.collect()
        }
    }

    pub fn execute(
        &self,
        world: &mut dyn World,
        plan: &Plan,
        state: &mut ExecutionState,
    ) -> Result<ExecutionReport, PlanError> {
        let tier = world.tier();
        let time = world.time();
        let tier_plan = plan.active_tier(tier).ok_or(PlanError::NoPlan { tier })?;

        if state.tier != tier {
            debug!("Executor: tier changed {} -> {}, clearing flags", state.tier, tier);
            state.planned_flags.clear();
            state.tier = tier;
        }

        let structures = world.find_structures(None);
        let markers = world.find_pending_markers(None);
        let missing = missing_positions(tier_plan, &structures, &markers);

        state.counts = structures
            .iter()
            .map(|s| s.kind)
            .counts()
            .into_iter()
            .map(|(kind, count)| (kind, count as u32))
            .collect();
        state.last_update_tick = time;

        let blocked = blocked_positions(tier_plan, &structures);

        let mut report = ExecutionReport {
            remaining: missing.iter().map(|(_, locs)| locs.len()).sum::<usize>() + blocked.len(),
            outstanding: markers.len(),
            ..Default::default()
        };

        for (kind, occupant) in &blocked {
            if occupant.kind != StructureKind::Container
                || tier_plan.contains(StructureKind::Container, occupant.position)
            {
                debug!(
                    "Executor: {:?} at {} blocked by {:?}",
                    kind, occupant.position, occupant.kind
                );
                continue;
            }
            match world.destroy(&occupant.live_ref) {
                Ok(()) => {
                    info!(
                        "Executor: cleared buffer at {} for planned {:?}",
                        occupant.position, kind
                    );
                    report.cleared.push(occupant.position);
                }
                Err(WorldError::NotFound(live_ref)) => {
                    debug!("Executor: buffer {} already gone", live_ref);
                }
                Err(err) => {
                    warn!("Executor: failed to clear buffer at {}: {}", occupant.position, err);
                }
            }
        }

        let base_room = self.config.markers_per_base.saturating_sub(markers.len());
        let global_room = self
            .config
            .global_marker_cap
            .saturating_sub(world.global_marker_count());
        let budget = base_room.min(global_room);

        let kinds: Vec<StructureKind> = missing.iter().map(|(kind, _)| *kind).collect();
        let order = self.rotation(&kinds, state, &markers, time);
        let mut missing_by_kind: FnvHashMap<StructureKind, Vec<Location>> =
            missing.into_iter().collect();

        if budget == 0 || order.is_empty() {
            debug!(
                "Executor: no work (budget {}, {} kinds missing, {} outstanding)",
                budget,
                order.len(),
                markers.len()
            );
            self.update_flags(tier_plan, &missing_by_kind, state);
            return Ok(report);
        }

        state.rotation_cursor = (state.rotation_cursor + 1) % order.len();

        'kinds: for kind in order {
            let Some(locations) = missing_by_kind.get_mut(&kind) else {
                continue;
            };
            report.attempted_kinds.push(kind);

            let mut placed_here = Vec::new();
            for &loc in locations.iter() {
                if report.sites_created >= budget {
                    break;
                }
                match world.place_marker(loc, kind) {
                    Ok(()) => {
                        report.sites_created += 1;
                        placed_here.push(loc);
                        if !kind.is_transit() {
                            state.last_non_transit_tick = time;
                        }
                    }
                    Err(MarkerError::Full) => {
                        debug!("Executor: marker limit reached at {} for {:?}", loc, kind);
                    }
                    Err(MarkerError::InvalidTarget) => {
                        warn!("Executor: invalid target {} for {:?}", loc, kind);
                    }
                    Err(err) => {
                        warn!("Executor: failed to place {:?} at {}: {}", kind, loc, err);
                    }
                }
            }
            locations.retain(|loc| !placed_here.contains(loc));

            if report.sites_created >= budget {
                break 'kinds;
            }
        }

        report.remaining -= report.sites_created;
        report.outstanding += report.sites_created;
        self.update_flags(tier_plan, &missing_by_kind, state);

        debug!(
            "Executor: placed {} / {} markers, {} positions remaining",
            report.sites_created, budget, report.remaining
        );

        Ok(report)
    }

    fn update_flags(
        &self,
        tier_plan: &TierPlan,
        missing: &FnvHashMap<StructureKind, Vec<Location>>,
        state: &mut ExecutionState,
    ) {
        for kind in tier_plan.kinds() {
            let done = missing.get(&kind).map(|l| l.is_empty()).unwrap_or(true);
            state.planned_flags.insert(kind, done);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room_data::RoomData;
    use crate::terrain::FastRoomTerrain;

    /// A base whose marker calls fail on chosen cells.
    #[derive(Default)]
    struct FlakyWorld {
        structures: Vec<LiveStructure>,
        markers: Vec<PendingMarker>,
        failures: FnvHashMap<Location, MarkerError>,
    }

    impl World for FlakyWorld {
        fn time(&self) -> u32 {
            10
        }

        fn tier(&self) -> u8 {
            1
        }

        fn room_data(&self) -> RoomData {
            RoomData::new(FastRoomTerrain::plain())
        }

        fn find_structures(&self, _kind: Option<StructureKind>) -> Vec<LiveStructure> {
            self.structures.clone()
        }

        fn find_pending_markers(&self, _kind: Option<StructureKind>) -> Vec<PendingMarker> {
            self.markers.clone()
        }

        fn global_marker_count(&self) -> usize {
            self.markers.len()
        }

        fn place_marker(&mut self, position: Location, kind: StructureKind) -> Result<(), MarkerError> {
            if let Some(err) = self.failures.get(&position) {
                return Err(err.clone());
            }
            self.markers.push(PendingMarker { kind, position });
            Ok(())
        }

        fn destroy(&mut self, live_ref: &LiveRef) -> Result<(), WorldError> {
            let before = self.structures.len();
            self.structures.retain(|s| &s.live_ref != live_ref);
            if self.structures.len() == before {
                Err(WorldError::NotFound(live_ref.clone()))
            } else {
                Ok(())
            }
        }
    }

    fn plan_of(tier: TierPlan) -> Plan {
        let mut plan = Plan::default();
        plan.tiers.insert(1, tier);
        plan
    }

    fn marker(kind: StructureKind, x: u8) -> PendingMarker {
        PendingMarker {
            kind,
            position: Location::from_xy(x, 10),
        }
    }

    #[test]
    fn missing_skips_built_and_marked() {
        let mut tier = TierPlan::default();
        tier.placements.insert(
            StructureKind::Extension,
            vec![
                Location::from_xy(10, 10),
                Location::from_xy(12, 10),
                Location::from_xy(14, 10),
            ],
        );
        let structures = vec![LiveStructure {
            kind: StructureKind::Extension,
            position: Location::from_xy(10, 10),
            live_ref: LiveRef("a".to_owned()),
        }];
        let markers = vec![marker(StructureKind::Extension, 12)];

        let missing = missing_positions(&tier, &structures, &markers);
        assert_eq!(
            missing,
            vec![(StructureKind::Extension, vec![Location::from_xy(14, 10)])]
        );
    }

    #[test]
    fn failed_placements_do_not_stop_the_pass() {
        let mut tier = TierPlan::default();
        tier.placements.insert(
            StructureKind::Extension,
            (0..5).map(|i| Location::from_xy(10 + i * 2, 10)).collect(),
        );
        let plan = plan_of(tier);

        let mut world = FlakyWorld::default();
        world
            .failures
            .insert(Location::from_xy(12, 10), MarkerError::InvalidTarget);
        world
            .failures
            .insert(Location::from_xy(14, 10), MarkerError::Other("busy".to_owned()));

        let config = EngineConfig::default();
        let mut state = ExecutionState::default();
        let report = ConstructionExecutor::new(&config)
            .execute(&mut world, &plan, &mut state)
            .unwrap();

        assert_eq!(report.sites_created, 3);
        assert_eq!(report.remaining, 2);
        let placed: Vec<Location> = world.markers.iter().map(|m| m.position).collect();
        assert_eq!(
            placed,
            vec![
                Location::from_xy(10, 10),
                Location::from_xy(16, 10),
                Location::from_xy(18, 10)
            ]
        );
        assert_eq!(state.planned_flags.get(&StructureKind::Extension), Some(&false));
    }

    #[test]
    fn obsolete_buffer_is_cleared_for_transfer_node() {
        let mut tier = TierPlan::default();
        tier.placements
            .insert(StructureKind::Link, vec![Location::from_xy(20, 20)]);
        tier.placements
            .insert(StructureKind::Tower, vec![Location::from_xy(30, 30)]);
        let plan = plan_of(tier);

        let mut world = FlakyWorld::default();
        world.structures = vec![
            LiveStructure {
                kind: StructureKind::Container,
                position: Location::from_xy(20, 20),
                live_ref: LiveRef("buffer".to_owned()),
            },
            LiveStructure {
                kind: StructureKind::Extension,
                position: Location::from_xy(30, 30),
                live_ref: LiveRef("ext".to_owned()),
            },
        ];

        let config = EngineConfig::default();
        let mut state = ExecutionState::default();
        let report = ConstructionExecutor::new(&config)
            .execute(&mut world, &plan, &mut state)
            .unwrap();

        assert_eq!(report.cleared, vec![Location::from_xy(20, 20)]);
        assert_eq!(report.sites_created, 0);
        assert_eq!(report.remaining, 2);
        assert_eq!(world.structures.len(), 1);
        assert_eq!(world.structures[0].kind, StructureKind::Extension);

        // The freed cell is marked on the next pass; the extension stays
        // for the auditor.
        let report = ConstructionExecutor::new(&config)
            .execute(&mut world, &plan, &mut state)
            .unwrap();
        assert_eq!(report.sites_created, 1);
        assert_eq!(report.remaining, 1);
        assert_eq!(
            world.markers,
            vec![PendingMarker {
                kind: StructureKind::Link,
                position: Location::from_xy(20, 20)
            }]
        );
    }

    #[test]
    fn roads_deferred_when_dominant() {
        let config = EngineConfig::default();
        let executor = ConstructionExecutor::new(&config);
        let kinds = [StructureKind::Extension, StructureKind::Road, StructureKind::Tower];
        let state = ExecutionState {
            rotation_cursor: 1,
            last_non_transit_tick: 1000,
            ..Default::default()
        };

        let calm = executor.rotation(&kinds, &state, &[], 1000);
        assert_eq!(
            calm,
            vec![StructureKind::Road, StructureKind::Tower, StructureKind::Extension]
        );

        let markers = vec![
            marker(StructureKind::Road, 10),
            marker(StructureKind::Road, 11),
            marker(StructureKind::Extension, 12),
        ];
        let biased = executor.rotation(&kinds, &state, &markers, 1000);
        assert_eq!(
            biased,
            vec![StructureKind::Tower, StructureKind::Extension, StructureKind::Road]
        );

        let starving = executor.rotation(&kinds, &state, &[], 1000 + config.starvation_ticks);
        assert_eq!(starving.last(), Some(&StructureKind::Road));
    }
}
