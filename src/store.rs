//! Persistence of plans and execution state, keyed by base name.

use crate::plan::Plan;
use crate::state::ExecutionState;
use fnv::FnvHashMap;
use log::*;

pub trait PlanStore {
    /// The stored plan, if present and readable.
    fn load_plan(&self, base: &str) -> Option<Plan>;

    fn save_plan(&mut self, base: &str, plan: &Plan);

    fn remove_plan(&mut self, base: &str);

    /// The stored execution state, or a fresh one.
    fn load_state(&self, base: &str) -> ExecutionState;

    fn save_state(&mut self, base: &str, state: &ExecutionState);
}

/// Keeps one JSON document per record, the way the host's `Memory` object
/// stores them.
#[derive(Default, Clone)]
pub struct MemoryStore {
    plans: FnvHashMap<String, String>,
    states: FnvHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the raw serialized plan of a base.
    pub fn put_raw_plan(&mut self, base: &str, raw: impl Into<String>) {
        self.plans.insert(base.to_owned(), raw.into());
    }

    pub fn raw_plan(&self, base: &str) -> Option<&str> {
        self.plans.get(base).map(|s| s.as_str())
    }

    /// Overwrite the raw serialized execution state of a base.
    pub fn put_raw_state(&mut self, base: &str, raw: impl Into<String>) {
        self.states.insert(base.to_owned(), raw.into());
    }

    pub fn raw_state(&self, base: &str) -> Option<&str> {
        self.states.get(base).map(|s| s.as_str())
    }
}

impl PlanStore for MemoryStore {
    fn load_plan(&self, base: &str) -> Option<Plan> {
        let raw = self.plans.get(base)?;
        match serde_json::from_str(raw) {
            Ok(plan) => Some(plan),
            Err(err) => {
                warn!("Discarding unreadable plan for {}: {}", base, err);
                None
            }
        }
    }

    fn save_plan(&mut self, base: &str, plan: &Plan) {
        match serde_json::to_string(plan) {
            Ok(raw) => {
                self.plans.insert(base.to_owned(), raw);
            }
            Err(err) => warn!("Failed to serialize plan for {}: {}", base, err),
        }
    }

    fn remove_plan(&mut self, base: &str) {
        self.plans.remove(base);
    }

    fn load_state(&self, base: &str) -> ExecutionState {
        match self.states.get(base) {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|err| {
                warn!("Resetting unreadable execution state for {}: {}", base, err);
                ExecutionState::default()
            }),
            None => ExecutionState::default(),
        }
    }

    fn save_state(&mut self, base: &str, state: &ExecutionState) {
        match serde_json::to_string(state) {
            Ok(raw) => {
                self.states.insert(base.to_owned(), raw);
            }
            Err(err) => warn!("Failed to serialize execution state for {}: {}", base, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use crate::plan::PLAN_VERSION;
    use crate::state::BasePhase;

    #[test]
    fn plan_survives_round_trip() {
        let mut store = MemoryStore::new();
        let plan = Plan {
            anchor: Location::from_xy(25, 25),
            version: PLAN_VERSION,
            ..Default::default()
        };
        store.save_plan("W1N1", &plan);
        assert_eq!(store.load_plan("W1N1"), Some(plan));
        assert_eq!(store.load_plan("W2N2"), None);

        store.remove_plan("W1N1");
        assert_eq!(store.load_plan("W1N1"), None);
    }

    #[test]
    fn corrupt_records_are_treated_as_missing() {
        let mut store = MemoryStore::new();
        store.put_raw_plan("W1N1", "{not json");
        store.put_raw_state("W1N1", "[1,2,3]");
        assert!(store.load_plan("W1N1").is_none());
        assert_eq!(store.load_state("W1N1").phase, BasePhase::Unplanned);
    }
}
