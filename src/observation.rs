// src/observation.rs
//
// Versioned observation snapshot consumed by policies and renderers.
//
// Design requirements (mirrors the engine state, never aliases it):
// - Versioned (obs_version) for schema evolution
// - Serializable (serde) for logging and replay
// - Deterministic ordering (rows by slot index)
// - Every value in [0,1]; state codes exactly {1.0, 0.6, 0.3, 0.0}

use serde::{Deserialize, Serialize};

use crate::state::EpisodeState;

/// Current observation schema version.
/// Increment when adding/removing/changing fields.
pub const OBS_VERSION: u32 = 1;

/// Column order of each process-table row.
pub const PROCESS_COLUMNS: [&str; 4] = ["ram", "cpu", "priority", "state_code"];

/// Read-only snapshot of the episode for policy input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Schema version for forwards/backwards compatibility.
    pub obs_version: u32,
    /// Completed tick count.
    pub step: u64,
    /// [ram_usage, cpu_usage, page_faults, swap_usage, power].
    pub system_stats: [f64; 5],
    /// One row per slot: [ram, cpu, priority, state_code].
    pub process_table: Vec<[f64; 4]>,
}

impl Observation {
    /// Build an observation from episode state. Pure; same state always
    /// yields the identical snapshot.
    pub fn from_state(state: &EpisodeState) -> Self {
        let process_table = state
            .processes
            .iter()
            .map(|p| [p.ram, p.cpu, p.priority, p.state.code()])
            .collect();

        Self {
            obs_version: OBS_VERSION,
            step: state.step,
            system_stats: state.stats.as_array(),
            process_table,
        }
    }

    /// Number of process slots.
    pub fn k(&self) -> usize {
        self.process_table.len()
    }
}
