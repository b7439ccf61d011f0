// src/stats.rs
//
// System-wide metric aggregation: a pure reduction of the process table
// into five normalised metrics. Nothing here is stored independently;
// the stats are recomputed from the live table every tick.

use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::process::Process;
use crate::types::ProcessState;

/// Five normalised system metrics, each in [0,1] by construction.
///
/// Observation ordering: [ram_usage, cpu_usage, page_faults, swap_usage, power].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemStats {
    /// Mean RAM share across non-killed processes.
    pub ram_usage: f64,
    /// Mean CPU share across Running processes (0 when none run).
    pub cpu_usage: f64,
    /// Thrash indicator: swap_usage * ram_usage.
    pub page_faults: f64,
    /// Fraction of process slots currently Swapped.
    pub swap_usage: f64,
    /// Energy proxy: weighted blend of cpu_usage and ram_usage.
    pub power: f64,
}

/// Unnormalised totals exposed through the info channel for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTotals {
    /// Sum of RAM shares across non-killed processes (may exceed 1).
    pub ram_total: f64,
    /// Sum of CPU shares across Running processes (may exceed 1).
    pub cpu_total: f64,
}

impl SystemStats {
    /// Reduce the process table into system metrics.
    ///
    /// Inputs are already in [0,1], so every derived metric lands in [0,1]
    /// without external clipping.
    pub fn aggregate(processes: &[Process], cfg: &StatsConfig) -> SystemStats {
        if processes.is_empty() {
            return SystemStats::default();
        }

        let mut ram_sum = 0.0;
        let mut alive = 0usize;
        let mut cpu_sum = 0.0;
        let mut running = 0usize;
        let mut swapped = 0usize;

        for p in processes {
            match p.state {
                ProcessState::Killed => continue,
                ProcessState::Running => {
                    cpu_sum += p.cpu;
                    running += 1;
                }
                ProcessState::Swapped => swapped += 1,
                ProcessState::Suspended => {}
            }
            ram_sum += p.ram;
            alive += 1;
        }

        let ram_usage = if alive > 0 {
            ram_sum / alive as f64
        } else {
            0.0
        };
        let cpu_usage = if running > 0 {
            cpu_sum / running as f64
        } else {
            0.0
        };
        let swap_usage = swapped as f64 / processes.len() as f64;
        let page_faults = swap_usage * ram_usage;
        let power = cfg.power_cpu_weight * cpu_usage + cfg.power_ram_weight * ram_usage;

        SystemStats {
            ram_usage,
            cpu_usage,
            page_faults,
            swap_usage,
            power,
        }
    }

    /// Unnormalised sums for the info channel.
    pub fn raw_totals(processes: &[Process]) -> RawTotals {
        let mut totals = RawTotals::default();
        for p in processes {
            if p.state == ProcessState::Killed {
                continue;
            }
            totals.ram_total += p.ram;
            if p.state == ProcessState::Running {
                totals.cpu_total += p.cpu;
            }
        }
        totals
    }

    /// Observation-ordered array.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.ram_usage,
            self.cpu_usage,
            self.page_faults,
            self.swap_usage,
            self.power,
        ]
    }
}
