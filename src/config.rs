// src/config.rs
//
// Central configuration for the RamSim engine.
// Every numeric constant that shapes behaviour lives here as a named field:
// profile dynamics bands, action-reward magnitudes, spawn distribution,
// aggregation weights, and termination thresholds. Nothing is re-derived
// inline in the simulation code.

use crate::error::EnvError;
use crate::types::Profile;

/// Top-level engine configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Human-readable config / release version.
    pub version: &'static str,
    /// Number of process slots in the table (the action vector length).
    pub k: usize,
    /// Profile-driven dynamics coefficients.
    pub dynamics: DynamicsConfig,
    /// Action-reward magnitudes and legality thresholds.
    pub actions: ActionRewardConfig,
    /// Killed-slot replacement policy.
    pub spawn: SpawnConfig,
    /// System-metric aggregation weights.
    pub stats: StatsConfig,
    /// Episode termination / truncation predicates.
    pub termination: TerminationConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            version: "ramsim-0.1",
            k: 5,
            dynamics: DynamicsConfig::default(),
            actions: ActionRewardConfig::default(),
            spawn: SpawnConfig::default(),
            stats: StatsConfig::default(),
            termination: TerminationConfig::default(),
        }
    }
}

impl SimConfig {
    /// Construct a default config for `k` process slots.
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Validate construction-time invariants.
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.k == 0 {
            return Err(EnvError::invalid_configuration(
                "process count k must be at least 1",
            ));
        }
        if self.termination.max_steps == 0 {
            return Err(EnvError::invalid_configuration(
                "max_steps must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.dynamics.crash_prob) {
            return Err(EnvError::invalid_configuration(
                "crash_prob must lie in [0,1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.spawn.respawn_prob) {
            return Err(EnvError::invalid_configuration(
                "respawn_prob must lie in [0,1]",
            ));
        }
        Ok(())
    }
}

/// Sampling bands for one profile: initial ram / cpu / priority ranges.
#[derive(Debug, Clone, Copy)]
pub struct ProfileBands {
    pub ram: (f64, f64),
    pub cpu: (f64, f64),
    pub priority: (f64, f64),
}

/// Per-profile dynamics coefficients.
///
/// Bands are (min, max) ranges for uniform sampling or clamping.
#[derive(Debug, Clone)]
pub struct DynamicsConfig {
    // ----- Heavy -----
    /// RAM band the process drifts toward.
    pub heavy_ram_band: (f64, f64),
    /// CPU band the process jitters within.
    pub heavy_cpu_band: (f64, f64),
    /// Per-tick RAM drift magnitude when outside the band.
    pub heavy_ram_drift: f64,

    // ----- Leaky -----
    /// Per-tick leak increment range (always positive).
    pub leak_increment: (f64, f64),
    /// CPU band a leaky process stays within (near zero).
    pub leaky_cpu_band: (f64, f64),

    // ----- Active -----
    /// RAM band for the random walk.
    pub active_ram_band: (f64, f64),
    /// CPU band for the random walk.
    pub active_cpu_band: (f64, f64),

    // ----- Idle -----
    pub idle_ram_band: (f64, f64),
    pub idle_cpu_band: (f64, f64),

    // ----- Shared noise -----
    /// Symmetric per-tick RAM jitter amplitude.
    pub ram_jitter: f64,
    /// Symmetric per-tick CPU jitter amplitude.
    pub cpu_jitter: f64,

    /// Probability per tick that a Running process crashes spontaneously.
    pub crash_prob: f64,

    // ----- Initial-table priority bands -----
    pub heavy_priority_band: (f64, f64),
    pub leaky_priority_band: (f64, f64),
    pub active_priority_band: (f64, f64),
    pub idle_priority_band: (f64, f64),

    /// Initial RAM band for a fresh leaky process (steeper than the spawn
    /// band so a leak is already visible at reset).
    pub leaky_initial_ram_band: (f64, f64),
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            heavy_ram_band: (0.4, 0.6),
            heavy_cpu_band: (0.6, 0.9),
            heavy_ram_drift: 0.02,
            leak_increment: (0.01, 0.06),
            leaky_cpu_band: (0.0, 0.05),
            active_ram_band: (0.1, 0.4),
            active_cpu_band: (0.2, 0.5),
            idle_ram_band: (0.01, 0.05),
            idle_cpu_band: (0.0, 0.02),
            ram_jitter: 0.02,
            cpu_jitter: 0.05,
            crash_prob: 0.02,
            heavy_priority_band: (0.7, 1.0),
            leaky_priority_band: (0.0, 0.2),
            active_priority_band: (0.4, 0.7),
            idle_priority_band: (0.1, 0.4),
            leaky_initial_ram_band: (0.6, 0.8),
        }
    }
}

impl DynamicsConfig {
    /// Sampling bands used when a process of `profile` is created.
    pub fn bands(&self, profile: Profile) -> ProfileBands {
        match profile {
            Profile::Heavy => ProfileBands {
                ram: self.heavy_ram_band,
                cpu: self.heavy_cpu_band,
                priority: self.heavy_priority_band,
            },
            Profile::Leaky => ProfileBands {
                ram: self.leaky_initial_ram_band,
                cpu: self.leaky_cpu_band,
                priority: self.leaky_priority_band,
            },
            Profile::Active => ProfileBands {
                ram: self.active_ram_band,
                cpu: self.active_cpu_band,
                priority: self.active_priority_band,
            },
            Profile::Idle => ProfileBands {
                ram: self.idle_ram_band,
                cpu: self.idle_cpu_band,
                priority: self.idle_priority_band,
            },
        }
    }
}

/// Action-reward magnitudes.
///
/// These magnitudes are load-bearing for reproducing training curves;
/// tune them here, never inline.
#[derive(Debug, Clone)]
pub struct ActionRewardConfig {
    /// Bonus for killing a leaky process whose RAM exceeds the threshold.
    pub kill_leak_bonus: f64,
    /// RAM threshold above which a leaky kill earns the bonus.
    pub kill_leak_ram_threshold: f64,
    /// Penalty for killing a high-priority ("critical") process.
    pub kill_critical_penalty: f64,
    /// Priority above which a process counts as critical.
    pub critical_priority_threshold: f64,
    /// Cost of killing an ordinary healthy process.
    pub kill_base_cost: f64,

    /// Bonus for swapping out under memory pressure.
    pub swap_out_pressure_bonus: f64,
    /// Cost of swapping out when the system is not under pressure.
    pub swap_out_base_cost: f64,
    /// System ram_usage at or above which the system counts as pressured.
    pub ram_pressure_threshold: f64,
    /// Penalty for swapping a process back in while under pressure.
    pub swap_in_pressure_penalty: f64,

    /// Bonus for suspending a process that is actually contending for CPU.
    pub suspend_contention_bonus: f64,
    /// CPU usage above which a process counts as contending.
    pub cpu_contention_threshold: f64,

    /// Priority delta applied by a renice action.
    pub renice_step: f64,

    /// Reward for a semantically invalid action. Must stay strictly inside
    /// [-5, -2] so it is distinguishable from legal-but-unfavourable moves.
    pub invalid_action_penalty: f64,
}

impl Default for ActionRewardConfig {
    fn default() -> Self {
        Self {
            kill_leak_bonus: 20.0,
            kill_leak_ram_threshold: 0.4,
            kill_critical_penalty: -10.0,
            critical_priority_threshold: 0.7,
            kill_base_cost: -2.0,
            swap_out_pressure_bonus: 10.0,
            swap_out_base_cost: -1.0,
            ram_pressure_threshold: 0.8,
            swap_in_pressure_penalty: -8.0,
            suspend_contention_bonus: 2.0,
            cpu_contention_threshold: 0.5,
            renice_step: 0.2,
            invalid_action_penalty: -3.0,
        }
    }
}

/// Killed-slot replacement policy.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Probability per killed slot per tick of spawning a replacement.
    /// Set to 0.0 to disable respawning entirely (useful in tests).
    pub respawn_prob: f64,
    /// Profile distribution for replacements, in sampling order.
    /// Weights must be non-negative; they are normalised at sample time.
    pub profile_weights: [(Profile, f64); 4],
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            respawn_prob: 0.25,
            profile_weights: [
                (Profile::Idle, 0.5),
                (Profile::Active, 0.3),
                (Profile::Heavy, 0.15),
                (Profile::Leaky, 0.05),
            ],
        }
    }
}

/// System-metric aggregation weights.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// CPU contribution to the power metric.
    pub power_cpu_weight: f64,
    /// RAM contribution to the power metric.
    pub power_ram_weight: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            power_cpu_weight: 0.6,
            power_ram_weight: 0.4,
        }
    }
}

/// Episode termination and truncation predicates.
#[derive(Debug, Clone)]
pub struct TerminationConfig {
    /// ram_usage at or above which a tick counts as critical.
    pub critical_ram_threshold: f64,
    /// Consecutive critical ticks before the episode terminates.
    pub critical_ram_patience: u32,
    /// Step budget; reaching it truncates the episode.
    pub max_steps: u64,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            critical_ram_threshold: 0.95,
            critical_ram_patience: 3,
            max_steps: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_k_rejected() {
        let cfg = SimConfig::with_k(0);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, EnvError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_invalid_penalty_within_contract_band() {
        let cfg = ActionRewardConfig::default();
        assert!(cfg.invalid_action_penalty >= -5.0);
        assert!(cfg.invalid_action_penalty <= -2.0);
    }

    #[test]
    fn test_spawn_weights_cover_all_profiles() {
        let cfg = SpawnConfig::default();
        let total: f64 = cfg.profile_weights.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
