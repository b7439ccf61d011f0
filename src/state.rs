// src/state.rs
//
// Episode-owned mutable state: the process table plus step counter and
// episode-control flags. Created on reset, mutated only through the
// engine's step, discarded on the next reset. Nothing here is shared
// across episodes or instances.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::SimConfig;
use crate::process::Process;
use crate::stats::SystemStats;
use crate::types::Profile;
use serde::{Deserialize, Serialize};

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Hard fail: ram_usage sustained at or above the critical threshold.
    RamExhaustion,
    /// Step budget exhausted (truncation, not termination).
    MaxSteps,
}

/// All mutable state of one episode.
#[derive(Debug, Clone)]
pub struct EpisodeState {
    /// The process table; index == process id.
    pub processes: Vec<Process>,
    /// Stats aggregated at the end of the last completed tick (or at reset).
    pub stats: SystemStats,
    /// Completed tick count.
    pub step: u64,
    /// Hard-fail flag.
    pub terminated: bool,
    /// Step-budget flag.
    pub truncated: bool,
    /// Set when either flag is raised.
    pub termination_reason: Option<TerminationReason>,
    /// Consecutive ticks with critical ram_usage.
    pub critical_ram_streak: u32,
}

impl EpisodeState {
    /// Build a fresh episode with a stochastically mixed process table.
    ///
    /// Profile counts: up to one Heavy and one Leaky, a random number of
    /// Active, the rest Idle. The table is shuffled afterwards so slot
    /// position carries no profile signal.
    pub fn new(cfg: &SimConfig, rng: &mut ChaCha8Rng) -> Self {
        let k = cfg.k;
        let heavy = rng.gen_range(0..=1usize).min(k);
        let leaky = rng.gen_range(0..=1usize).min(k - heavy);
        let active = rng.gen_range(0..=(k - heavy - leaky));

        let mut profiles = Vec::with_capacity(k);
        profiles.extend(std::iter::repeat(Profile::Heavy).take(heavy));
        profiles.extend(std::iter::repeat(Profile::Leaky).take(leaky));
        profiles.extend(std::iter::repeat(Profile::Active).take(active));
        while profiles.len() < k {
            profiles.push(Profile::Idle);
        }
        profiles.shuffle(rng);

        Self::from_profiles(cfg, &profiles, rng)
    }

    /// Build an episode with an explicit profile per slot.
    ///
    /// Used by tests and the research harness to pin scenarios.
    pub fn from_profiles(cfg: &SimConfig, profiles: &[Profile], rng: &mut ChaCha8Rng) -> Self {
        let processes: Vec<Process> = profiles
            .iter()
            .enumerate()
            .map(|(id, profile)| Process::sample(id, *profile, &cfg.dynamics, rng))
            .collect();
        let stats = SystemStats::aggregate(&processes, &cfg.stats);

        Self {
            processes,
            stats,
            step: 0,
            terminated: false,
            truncated: false,
            termination_reason: None,
            critical_ram_streak: 0,
        }
    }

    /// Whether the episode accepts further steps.
    pub fn is_finished(&self) -> bool {
        self.terminated || self.truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_new_fills_exactly_k_slots() {
        let cfg = SimConfig::with_k(7);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = EpisodeState::new(&cfg, &mut rng);
        assert_eq!(state.processes.len(), 7);
        for (i, p) in state.processes.iter().enumerate() {
            assert_eq!(p.id, i);
            assert!(p.is_running());
        }
        assert_eq!(state.step, 0);
        assert!(!state.is_finished());
    }

    #[test]
    fn test_from_profiles_pins_archetypes() {
        let cfg = SimConfig::with_k(3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let profiles = [Profile::Leaky, Profile::Idle, Profile::Heavy];
        let state = EpisodeState::from_profiles(&cfg, &profiles, &mut rng);
        assert_eq!(state.processes[0].profile, Profile::Leaky);
        assert_eq!(state.processes[1].profile, Profile::Idle);
        assert_eq!(state.processes[2].profile, Profile::Heavy);
    }

    #[test]
    fn test_initial_stats_match_table() {
        let cfg = SimConfig::with_k(4);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let state = EpisodeState::new(&cfg, &mut rng);
        let recomputed = SystemStats::aggregate(&state.processes, &cfg.stats);
        assert_eq!(state.stats, recomputed);
    }

    #[test]
    fn test_same_seed_same_table() {
        let cfg = SimConfig::with_k(5);
        let mut r1 = ChaCha8Rng::seed_from_u64(42);
        let mut r2 = ChaCha8Rng::seed_from_u64(42);
        let s1 = EpisodeState::new(&cfg, &mut r1);
        let s2 = EpisodeState::new(&cfg, &mut r2);
        assert_eq!(s1.processes, s2.processes);
    }
}
