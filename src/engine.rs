// src/engine.rs
//
// The simulation engine: owns the episode state and the episode RNG, and
// runs one tick in a fixed order:
//
//   resolve actions -> advance dynamics -> respawn killed slots ->
//   aggregate stats -> compose reward -> evaluate termination predicates
//
// Spawned replacements are therefore visible in the same tick's stats and
// reward. All randomness flows through the single episode generator, so
// reset(seed) followed by a fixed action sequence is exactly reproducible.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actions::apply_action;
use crate::config::SimConfig;
use crate::error::{EnvError, ShapeViolation};
use crate::observation::Observation;
use crate::process::Process;
use crate::reward::{RewardComponents, RewardWeights};
use crate::spawn::respawn_killed;
use crate::state::{EpisodeState, TerminationReason};
use crate::stats::{RawTotals, SystemStats};
use crate::types::{Action, Profile};

/// Result of one engine tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Snapshot after the tick.
    pub observation: Observation,
    /// Scalar reward.
    pub reward: f64,
    /// Decomposed reward terms (action_total + four global terms).
    pub components: RewardComponents,
    /// Hard-fail flag.
    pub terminated: bool,
    /// Step-budget flag.
    pub truncated: bool,
    /// Set when either flag is raised.
    pub termination_reason: Option<TerminationReason>,
    /// Unnormalised resource totals for diagnostics.
    pub raw: RawTotals,
}

/// Deterministic single-episode simulator.
pub struct SimulationEngine {
    config: SimConfig,
    weights: RewardWeights,
    state: EpisodeState,
    rng: ChaCha8Rng,
    seed: u64,
}

impl SimulationEngine {
    /// Create an engine. Fails fast on an invalid configuration; the
    /// episode starts from seed 0 until the first reset.
    pub fn new(config: SimConfig, weights: RewardWeights) -> Result<Self, EnvError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let state = EpisodeState::new(&config, &mut rng);
        Ok(Self {
            config,
            weights,
            state,
            rng,
            seed: 0,
        })
    }

    /// Begin a fresh episode. Deterministic: the same seed always yields
    /// the same initial table and observation.
    pub fn reset(&mut self, seed: u64) -> Observation {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.state = EpisodeState::new(&self.config, &mut self.rng);
        Observation::from_state(&self.state)
    }

    /// Begin a fresh episode with a pinned profile per slot.
    ///
    /// Scenario hook for tests and the research harness; `profiles` must
    /// have length k.
    pub fn reset_with_profiles(&mut self, seed: u64, profiles: &[Profile]) -> Result<Observation, EnvError> {
        if profiles.len() != self.config.k {
            return Err(EnvError::InvalidActionShape(ShapeViolation::Length {
                expected: self.config.k,
                got: profiles.len(),
            }));
        }
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.state = EpisodeState::from_profiles(&self.config, profiles, &mut self.rng);
        Ok(Observation::from_state(&self.state))
    }

    /// Run one tick.
    ///
    /// Rejects a wrong-length action vector before touching any state. On
    /// a finished episode the call is a no-op that returns the terminal
    /// observation with zero reward and the flags still raised.
    pub fn step(&mut self, actions: &[Action]) -> Result<TickOutcome, EnvError> {
        if actions.len() != self.config.k {
            return Err(EnvError::InvalidActionShape(ShapeViolation::Length {
                expected: self.config.k,
                got: actions.len(),
            }));
        }

        if self.state.is_finished() {
            return Ok(self.finished_outcome());
        }

        // 1) Resolve actions against the previous tick's stats.
        let prev_stats = self.state.stats;
        let mut action_total = 0.0;
        for (process, action) in self.state.processes.iter_mut().zip(actions) {
            let outcome = apply_action(process, *action, &prev_stats, &self.config.actions);
            action_total += outcome.reward;
        }

        // 2) Natural dynamics for all surviving processes.
        for process in self.state.processes.iter_mut() {
            process.advance(&self.config.dynamics, &mut self.rng);
        }

        // 3) Backfill killed slots.
        respawn_killed(
            &mut self.state.processes,
            &self.config.spawn,
            &self.config.dynamics,
            &mut self.rng,
        );

        // 4) Aggregate system metrics.
        self.state.stats = SystemStats::aggregate(&self.state.processes, &self.config.stats);
        let raw = SystemStats::raw_totals(&self.state.processes);

        // 5) Compose the reward.
        let components = RewardComponents::from_tick(
            &self.state.stats,
            &self.state.processes,
            action_total,
            &self.weights,
        );
        let reward = components.total(&self.weights);

        // 6) Count the tick and evaluate episode-control predicates.
        self.state.step += 1;
        self.evaluate_episode_end();

        Ok(TickOutcome {
            observation: Observation::from_state(&self.state),
            reward,
            components,
            terminated: self.state.terminated,
            truncated: self.state.truncated,
            termination_reason: self.state.termination_reason,
            raw,
        })
    }

    fn evaluate_episode_end(&mut self) {
        let term = &self.config.termination;

        if self.state.stats.ram_usage >= term.critical_ram_threshold {
            self.state.critical_ram_streak += 1;
        } else {
            self.state.critical_ram_streak = 0;
        }

        if self.state.critical_ram_streak >= term.critical_ram_patience {
            self.state.terminated = true;
            self.state.termination_reason = Some(TerminationReason::RamExhaustion);
        } else if self.state.step >= term.max_steps {
            self.state.truncated = true;
            self.state.termination_reason = Some(TerminationReason::MaxSteps);
        }
    }

    fn finished_outcome(&self) -> TickOutcome {
        let components = RewardComponents {
            action_total: 0.0,
            stability: 0.0,
            power_term: 0.0,
            qos: 0.0,
            thrash: 0.0,
        };
        TickOutcome {
            observation: Observation::from_state(&self.state),
            reward: 0.0,
            components,
            terminated: self.state.terminated,
            truncated: self.state.truncated,
            termination_reason: self.state.termination_reason,
            raw: SystemStats::raw_totals(&self.state.processes),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn weights(&self) -> &RewardWeights {
        &self.weights
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    /// Mutable state access: scenario hook for tests and research tooling.
    /// Production callers drive the engine through reset/step only.
    pub fn state_mut(&mut self) -> &mut EpisodeState {
        &mut self.state
    }

    /// Number of process slots (the action vector length).
    pub fn k(&self) -> usize {
        self.config.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config(k: usize) -> SimConfig {
        // No crashes or respawns so tests isolate the tick pipeline.
        let mut cfg = SimConfig::with_k(k);
        cfg.dynamics.crash_prob = 0.0;
        cfg.spawn.respawn_prob = 0.0;
        cfg
    }

    fn noop_vector(k: usize) -> Vec<Action> {
        vec![Action::NoOp; k]
    }

    #[test]
    fn test_wrong_length_rejected_without_mutation() {
        let mut engine = SimulationEngine::new(quiet_config(3), RewardWeights::default()).unwrap();
        engine.reset(1);
        let before = engine.state().processes.clone();

        let err = engine.step(&noop_vector(2)).unwrap_err();
        assert!(matches!(err, EnvError::InvalidActionShape(_)));
        assert_eq!(engine.state().processes, before);
        assert_eq!(engine.state().step, 0);
    }

    #[test]
    fn test_reset_is_deterministic() {
        let mut e1 = SimulationEngine::new(quiet_config(5), RewardWeights::default()).unwrap();
        let mut e2 = SimulationEngine::new(quiet_config(5), RewardWeights::default()).unwrap();
        assert_eq!(e1.reset(123), e2.reset(123));
    }

    #[test]
    fn test_step_counts_and_truncates() {
        let mut cfg = quiet_config(2);
        cfg.termination.max_steps = 3;
        let mut engine = SimulationEngine::new(cfg, RewardWeights::default()).unwrap();
        engine.reset(7);

        for expected in 1..=2u64 {
            let out = engine.step(&noop_vector(2)).unwrap();
            assert_eq!(out.observation.step, expected);
            assert!(!out.truncated);
        }
        let out = engine.step(&noop_vector(2)).unwrap();
        assert!(out.truncated);
        assert!(!out.terminated);
        assert_eq!(out.termination_reason, Some(TerminationReason::MaxSteps));
    }

    #[test]
    fn test_finished_episode_is_inert() {
        let mut cfg = quiet_config(2);
        cfg.termination.max_steps = 1;
        let mut engine = SimulationEngine::new(cfg, RewardWeights::default()).unwrap();
        engine.reset(7);
        let first = engine.step(&noop_vector(2)).unwrap();
        assert!(first.truncated);

        let snapshot = engine.state().processes.clone();
        let again = engine.step(&noop_vector(2)).unwrap();
        assert_eq!(again.reward, 0.0);
        assert!(again.truncated);
        assert_eq!(engine.state().processes, snapshot);
        assert_eq!(engine.state().step, 1);
    }

    #[test]
    fn test_sustained_critical_ram_terminates() {
        let mut cfg = quiet_config(2);
        cfg.termination.critical_ram_patience = 2;
        let mut engine = SimulationEngine::new(cfg, RewardWeights::default()).unwrap();
        engine
            .reset_with_profiles(3, &[Profile::Leaky, Profile::Leaky])
            .unwrap();

        // Pin both processes at full RAM; leak dynamics keep them there.
        for p in engine.state_mut().processes.iter_mut() {
            p.ram = 1.0;
        }

        let out = engine.step(&noop_vector(2)).unwrap();
        assert!(!out.terminated, "one critical tick is below patience");
        let out = engine.step(&noop_vector(2)).unwrap();
        assert!(out.terminated);
        assert_eq!(out.termination_reason, Some(TerminationReason::RamExhaustion));
    }

    #[test]
    fn test_reward_matches_components() {
        let mut engine = SimulationEngine::new(quiet_config(4), RewardWeights::default()).unwrap();
        engine.reset(11);
        let weights = engine.weights().clone();
        for _ in 0..10 {
            let out = engine.step(&noop_vector(4)).unwrap();
            assert!((out.reward - out.components.total(&weights)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spawn_visible_same_tick() {
        let mut cfg = quiet_config(1);
        cfg.spawn.respawn_prob = 1.0;
        let mut engine = SimulationEngine::new(cfg, RewardWeights::default()).unwrap();
        engine.reset_with_profiles(5, &[Profile::Idle]).unwrap();

        let out = engine.step(&[Action::Kill]).unwrap();
        // The kill happened this tick, the replacement too.
        assert_eq!(out.observation.process_table[0][3], 1.0);
    }

    #[test]
    fn test_killed_slot_stays_dead_without_respawn() {
        let mut engine = SimulationEngine::new(quiet_config(1), RewardWeights::default()).unwrap();
        engine.reset_with_profiles(5, &[Profile::Idle]).unwrap();

        let out = engine.step(&[Action::Kill]).unwrap();
        assert_eq!(out.observation.process_table[0][3], 0.0);
        for _ in 0..5 {
            let out = engine.step(&[Action::NoOp]).unwrap();
            assert_eq!(out.observation.process_table[0][3], 0.0);
            assert_eq!(out.observation.process_table[0][0], 0.0);
        }
    }
}
