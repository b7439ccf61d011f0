// src/env.rs
//
// Gym-style environment wrapper around the simulation engine:
// reset(seed) / step(action codes) / render() / close().
//
// The wrapper is the validation boundary: action vectors are decoded into
// the closed Action enum here, before any engine state is touched. The
// engine below it works only with typed actions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::engine::SimulationEngine;
use crate::error::{EnvError, ShapeViolation};
use crate::observation::Observation;
use crate::render::{RenderSnapshot, Renderer, RendererStyle};
use crate::reward::{RewardComponents, RewardWeights};
use crate::state::TerminationReason;
use crate::telemetry::{TelemetrySink, TickRecord};
use crate::types::{Action, Profile};

/// Whether render() draws to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Headless,
    Human,
}

/// Environment construction parameters.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub sim: SimConfig,
    pub weights: RewardWeights,
    pub render_mode: RenderMode,
    pub style: RendererStyle,
    /// Frame size override (columns, rows); per-style default when None.
    pub window_size: Option<(u16, u16)>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            weights: RewardWeights::default(),
            render_mode: RenderMode::Headless,
            style: RendererStyle::Cyberpunk,
            window_size: None,
        }
    }
}

impl EnvConfig {
    /// Default config for `k` process slots.
    pub fn with_k(k: usize) -> Self {
        Self {
            sim: SimConfig::with_k(k),
            ..Self::default()
        }
    }
}

/// Info returned by reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetInfo {
    /// Seed actually used for the episode.
    pub seed: u64,
}

/// Diagnostic side channel returned by step.
///
/// Carries the unnormalised resource totals alongside the clipped stats so
/// debugging does not have to undo the observation normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Completed tick count.
    pub step: u64,
    /// Normalised ram_usage (as in the observation).
    pub ram_usage: f64,
    /// Normalised cpu_usage (as in the observation).
    pub cpu_usage: f64,
    /// Unnormalised RAM total across live processes (may exceed 1).
    pub raw_ram_total: f64,
    /// Unnormalised CPU total across running processes (may exceed 1).
    pub raw_cpu_total: f64,
    pub page_faults: f64,
    pub swap_usage: f64,
    pub power: f64,
    /// Decomposed reward terms for this tick.
    pub reward_components: RewardComponents,
    /// Set when the episode ended this tick (or earlier).
    pub termination_reason: Option<TerminationReason>,
}

/// Result of one environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfo,
}

/// Gym-style RAM-management environment.
pub struct RamSimEnv {
    config: EnvConfig,
    engine: SimulationEngine,
    renderer: Option<Box<dyn Renderer>>,
    telemetry: TelemetrySink,
    /// Draws episode seeds when reset() is called without one.
    seed_rng: ChaCha8Rng,
    episode_id: u64,
    episode_open: bool,
}

impl RamSimEnv {
    /// Construct an environment. Fails with InvalidConfiguration for k == 0
    /// or other bad parameters; the renderer is built lazily on first
    /// render().
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        let engine = SimulationEngine::new(config.sim.clone(), config.weights.clone())?;
        Ok(Self {
            config,
            engine,
            renderer: None,
            telemetry: TelemetrySink::from_env(),
            seed_rng: ChaCha8Rng::from_entropy(),
            episode_id: 0,
            episode_open: false,
        })
    }

    /// Construct with an explicit telemetry sink (tests, research runs).
    pub fn with_telemetry(config: EnvConfig, telemetry: TelemetrySink) -> Result<Self, EnvError> {
        let mut env = Self::new(config)?;
        env.telemetry = telemetry;
        Ok(env)
    }

    /// Begin a new episode. A missing seed is drawn from the env's own
    /// generator; the seed actually used is reported in ResetInfo.
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, ResetInfo) {
        let seed = seed.unwrap_or_else(|| self.seed_rng.gen());
        let observation = self.engine.reset(seed);
        self.episode_id = self.telemetry.begin_episode(seed);
        self.episode_open = true;
        (observation, ResetInfo { seed })
    }

    /// Begin a new episode with a pinned profile per slot.
    pub fn reset_with_profiles(
        &mut self,
        seed: u64,
        profiles: &[Profile],
    ) -> Result<(Observation, ResetInfo), EnvError> {
        let observation = self.engine.reset_with_profiles(seed, profiles)?;
        self.episode_id = self.telemetry.begin_episode(seed);
        self.episode_open = true;
        Ok((observation, ResetInfo { seed }))
    }

    /// Run one tick from raw action codes.
    ///
    /// The vector must have length k with every entry in [0,7]; otherwise
    /// the call fails before any state mutation.
    pub fn step(&mut self, action_codes: &[u8]) -> Result<StepResult, EnvError> {
        let actions = self.decode_actions(action_codes)?;
        let outcome = self.engine.step(&actions)?;

        let stats = self.engine.state().stats;
        let info = StepInfo {
            step: outcome.observation.step,
            ram_usage: stats.ram_usage,
            cpu_usage: stats.cpu_usage,
            raw_ram_total: outcome.raw.ram_total,
            raw_cpu_total: outcome.raw.cpu_total,
            page_faults: stats.page_faults,
            swap_usage: stats.swap_usage,
            power: stats.power,
            reward_components: outcome.components,
            termination_reason: outcome.termination_reason,
        };

        if self.telemetry.is_enabled() {
            self.telemetry.log_tick(&TickRecord {
                episode_id: self.episode_id,
                step: info.step,
                actions: action_codes.to_vec(),
                reward: outcome.reward,
                components: outcome.components,
                system_stats: stats.as_array(),
                terminated: outcome.terminated,
                truncated: outcome.truncated,
            });
        }

        if (outcome.terminated || outcome.truncated) && self.episode_open {
            self.telemetry
                .end_episode(self.engine.seed(), info.step, outcome.termination_reason);
            self.episode_open = false;
        }

        Ok(StepResult {
            observation: outcome.observation,
            reward: outcome.reward,
            terminated: outcome.terminated,
            truncated: outcome.truncated,
            info,
        })
    }

    /// Draw the current state with the configured style.
    ///
    /// Forwards a read-only snapshot to the renderer; no simulation side
    /// effects. Headless mode is a no-op.
    pub fn render(&mut self) -> std::io::Result<()> {
        if self.config.render_mode != RenderMode::Human {
            return Ok(());
        }
        if self.renderer.is_none() {
            let k = self.engine.k();
            self.renderer = Some(self.config.style.build(self.config.window_size, k));
        }
        let snapshot =
            RenderSnapshot::from_observation(&Observation::from_state(self.engine.state()));
        match self.renderer.as_mut() {
            Some(renderer) => renderer.present(&snapshot),
            None => Ok(()),
        }
    }

    /// Release renderer resources. Idempotent; simulation state is
    /// unaffected.
    pub fn close(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            let _ = renderer.close();
        }
    }

    /// Number of process slots (the action vector length).
    pub fn k(&self) -> usize {
        self.engine.k()
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SimulationEngine {
        &mut self.engine
    }

    fn decode_actions(&self, codes: &[u8]) -> Result<Vec<Action>, EnvError> {
        let k = self.engine.k();
        if codes.len() != k {
            return Err(EnvError::InvalidActionShape(ShapeViolation::Length {
                expected: k,
                got: codes.len(),
            }));
        }
        codes
            .iter()
            .enumerate()
            .map(|(index, &code)| {
                Action::from_code(code).ok_or(EnvError::InvalidActionShape(
                    ShapeViolation::Code { index, code },
                ))
            })
            .collect()
    }
}

impl Drop for RamSimEnv {
    fn drop(&mut self) {
        self.close();
    }
}

/// N independent environments for parallel rollouts.
///
/// Each env owns its own generator; nothing is shared, so there is no
/// cross-instance coupling and no locking.
pub struct VecEnv {
    envs: Vec<RamSimEnv>,
}

impl VecEnv {
    pub fn new(n: usize, config: EnvConfig) -> Result<Self, EnvError> {
        if n == 0 {
            return Err(EnvError::invalid_configuration(
                "vectorised environment needs at least one instance",
            ));
        }
        let envs = (0..n)
            .map(|_| RamSimEnv::new(config.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { envs })
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// Reset every env, with per-env seeds when provided.
    pub fn reset_all(&mut self, seeds: Option<&[u64]>) -> Vec<(Observation, ResetInfo)> {
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(i, env)| env.reset(seeds.and_then(|s| s.get(i).copied())))
            .collect()
    }

    /// Step every env. `actions` must contain one code vector per env.
    pub fn step_all(&mut self, actions: &[Vec<u8>]) -> Result<Vec<StepResult>, EnvError> {
        if actions.len() != self.envs.len() {
            return Err(EnvError::InvalidActionShape(ShapeViolation::Length {
                expected: self.envs.len(),
                got: actions.len(),
            }));
        }
        self.envs
            .iter_mut()
            .zip(actions)
            .map(|(env, codes)| env.step(codes))
            .collect()
    }

    /// Episode-finished flag per env.
    pub fn dones(&self) -> Vec<bool> {
        self.envs
            .iter()
            .map(|env| env.engine().state().is_finished())
            .collect()
    }
}
