use crate::layers::ExtensionStrategy;
use serde::{Deserialize, Serialize};

/// Tunables of the engine. Every field may be omitted when read from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Outstanding markers allowed across every base.
    pub global_marker_cap: usize,
    /// Outstanding markers a base tries to keep.
    pub markers_per_base: usize,
    /// Share of outstanding markers that are roads above which roads are
    /// deferred to the end of the rotation.
    pub transit_dominance: f32,
    /// Ticks without a non-road marker after which roads are deferred.
    pub starvation_ticks: u32,
    /// Ticks between alignment audits.
    pub audit_interval: u32,
    /// Misaligned structures tolerated before one is removed.
    pub misaligned_threshold: usize,
    pub extension_strategy: ExtensionStrategy,
    /// Fixed shuffle seed. When unset the seed is derived from the base
    /// name and the game time.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            global_marker_cap: 100,
            markers_per_base: 5,
            transit_dominance: 0.5,
            starvation_ticks: 100,
            audit_interval: 5000,
            misaligned_threshold: 5,
            extension_strategy: ExtensionStrategy::Ring,
            seed: None,
        }
    }
}
