// src/reward.rs
//
// Reward composition: combines the per-action reward sum with four global
// weighted terms into the scalar training signal.
//
//   stability  = -10 if ram_usage >= 0.90 else +1   (boundary inclusive)
//   power_term = (1 - power) * 2
//   qos        = sum of priority over Running processes above the
//                high-priority threshold
//   thrash     = -(swap_usage + page_faults) * 5
//   reward     = sum(action_rewards)
//              + 0.4*stability + 0.2*power_term + 0.3*qos + 0.1*thrash
//
// The 0.4/0.2/0.3/0.1 weighting and the term magnitudes are load-bearing
// for reproducing published training curves; they live in RewardWeights
// and are never re-derived.

use serde::{Deserialize, Serialize};

use crate::process::Process;
use crate::stats::SystemStats;

/// Named constants of the global reward formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardWeights {
    /// Weight on the stability term.
    pub stability_weight: f64,
    /// Weight on the power term.
    pub power_weight: f64,
    /// Weight on the QoS term.
    pub qos_weight: f64,
    /// Weight on the thrash term.
    pub thrash_weight: f64,

    /// Stability penalty when ram_usage crosses the threshold.
    pub stability_penalty: f64,
    /// Stability bonus otherwise.
    pub stability_bonus: f64,
    /// ram_usage at or above which stability flips to the penalty.
    pub stability_ram_threshold: f64,

    /// Scale of the power-saving term.
    pub power_scale: f64,
    /// Priority above which a Running process contributes to QoS.
    pub qos_priority_threshold: f64,
    /// Scale of the thrash penalty.
    pub thrash_scale: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            stability_weight: 0.4,
            power_weight: 0.2,
            qos_weight: 0.3,
            thrash_weight: 0.1,
            stability_penalty: -10.0,
            stability_bonus: 1.0,
            stability_ram_threshold: 0.90,
            power_scale: 2.0,
            qos_priority_threshold: 0.7,
            thrash_scale: 5.0,
        }
    }
}

/// Decomposed reward terms for one tick, logged for reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardComponents {
    /// Sum of per-action rewards this tick.
    pub action_total: f64,
    /// Raw stability term (pre-weight).
    pub stability: f64,
    /// Raw power term (pre-weight).
    pub power_term: f64,
    /// Raw QoS term (pre-weight).
    pub qos: f64,
    /// Raw thrash term (pre-weight).
    pub thrash: f64,
}

impl RewardComponents {
    /// Compute the tick's reward terms from the freshly aggregated stats
    /// and the post-dynamics process table.
    pub fn from_tick(
        stats: &SystemStats,
        processes: &[Process],
        action_total: f64,
        weights: &RewardWeights,
    ) -> Self {
        let stability = if stats.ram_usage >= weights.stability_ram_threshold {
            weights.stability_penalty
        } else {
            weights.stability_bonus
        };

        let power_term = (1.0 - stats.power) * weights.power_scale;

        let qos = processes
            .iter()
            .filter(|p| p.is_running() && p.priority > weights.qos_priority_threshold)
            .map(|p| p.priority)
            .sum();

        let thrash = -(stats.swap_usage + stats.page_faults) * weights.thrash_scale;

        Self {
            action_total,
            stability,
            power_term,
            qos,
            thrash,
        }
    }

    /// Weighted global reward (excludes the action sum).
    pub fn global(&self, weights: &RewardWeights) -> f64 {
        weights.stability_weight * self.stability
            + weights.power_weight * self.power_term
            + weights.qos_weight * self.qos
            + weights.thrash_weight * self.thrash
    }

    /// Scalar reward for the tick.
    pub fn total(&self, weights: &RewardWeights) -> f64 {
        self.action_total + self.global(weights)
    }
}
