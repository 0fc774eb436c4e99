//! AlignmentAuditor: detects live structures that drifted from the plan.
//!
//! A structure is misaligned when its position is not in its kind's planned
//! set at the active tier. Only blocking kinds and roads are audited;
//! defensive barriers are not part of a tier plan. Once more than
//! `misaligned_threshold` structures are misaligned, the one with the lowest
//! removal priority value is destroyed. One removal per audit.

use crate::error::WorldError;
use crate::plan::TierPlan;
use crate::state::{ExecutionState, MisalignedRecord};
use crate::structure::StructureKind;
use crate::world::*;
use log::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub misaligned: Vec<MisalignedRecord>,
    pub removed: Option<MisalignedRecord>,
}

fn is_audited(kind: StructureKind) -> bool {
    kind.is_blocking() || kind == StructureKind::Road
}

/// Live structures whose position is absent from their kind's planned set.
pub fn find_misaligned(tier_plan: &TierPlan, structures: &[LiveStructure]) -> Vec<MisalignedRecord> {
    let planned = tier_plan.planned_sets();

    structures
        .iter()
        .filter(|s| is_audited(s.kind))
        .filter(|s| {
            !planned
                .get(&s.kind)
                .map(|set| set.contains(&s.position))
                .unwrap_or(false)
        })
        .map(|s| MisalignedRecord {
            kind: s.kind,
            position: s.position,
            live_ref: s.live_ref.clone(),
        })
        .collect()
}

pub struct AlignmentAuditor {
    threshold: usize,
}

impl AlignmentAuditor {
    pub fn new(threshold: usize) -> Self {
        AlignmentAuditor { threshold }
    }

    pub fn audit(
        &self,
        world: &mut dyn World,
        tier_plan: &TierPlan,
        state: &mut ExecutionState,
    ) -> AuditReport {
        let structures = world.find_structures(None);
        let misaligned = find_misaligned(tier_plan, &structures);

        state.last_audit_tick = world.time();
        state.misaligned = misaligned.clone();

        let mut report = AuditReport {
            misaligned,
            removed: None,
        };

        if report.misaligned.len() <= self.threshold {
            debug!(
                "Auditor: {} misaligned structures, under threshold {}",
                report.misaligned.len(),
                self.threshold
            );
            return report;
        }

        let candidate = report
            .misaligned
            .iter()
            .filter_map(|r| r.kind.removal_priority().map(|p| (p, r)))
            .min_by_key(|(priority, r)| (*priority, r.position))
            .map(|(_, r)| r.clone());

        let Some(candidate) = candidate else {
            debug!("Auditor: no removable misaligned structure");
            return report;
        };

        match world.destroy(&candidate.live_ref) {
            Ok(()) => {
                info!(
                    "Auditor: removed misaligned {:?} at {}",
                    candidate.kind, candidate.position
                );
                state.misaligned.retain(|r| r.live_ref != candidate.live_ref);
                report.removed = Some(candidate);
            }
            Err(WorldError::NotFound(live_ref)) => {
                debug!("Auditor: {} already gone", live_ref);
                state.misaligned.retain(|r| r.live_ref != candidate.live_ref);
            }
            Err(err) => {
                warn!(
                    "Auditor: failed to remove {:?} at {}: {}",
                    candidate.kind, candidate.position, err
                );
            }
        }

        report
    }
}
