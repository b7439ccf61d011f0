// src/lib.rs
//
// ramsim: a deterministic OS resource-management simulation for
// reinforcement-learning research.
//
// The crate simulates k synthetic processes with profile-driven RAM/CPU
// dynamics. An agent observes the process table plus five aggregate
// system stats and issues one action per process each tick (kill, swap,
// suspend, resume, renice, no-op). The engine applies the actions,
// advances the stochastic dynamics, backfills killed slots, and composes
// a weighted reward from stability, power, quality-of-service, and
// thrashing terms.
//
// Layering, from the bottom up:
// - types / config / error: closed enums, tunable constants, error taxonomy
// - process / actions / spawn / stats / reward: per-tick mechanics
// - state / engine: episode state and the deterministic tick pipeline
// - observation / env: the flat agent view and the Gym-style wrapper
// - telemetry / render: JSONL logging and the terminal dashboards
//
// Determinism contract: every random draw flows through a single ChaCha8
// generator seeded at reset, so identical (seed, action sequence) pairs
// produce bitwise-identical trajectories on any platform.

pub mod actions;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod observation;
pub mod process;
pub mod render;
pub mod reward;
pub mod spawn;
pub mod state;
pub mod stats;
pub mod telemetry;
pub mod types;

pub use config::SimConfig;
pub use engine::{SimulationEngine, TickOutcome};
pub use env::{EnvConfig, RamSimEnv, RenderMode, ResetInfo, StepInfo, StepResult, VecEnv};
pub use error::{EnvError, ShapeViolation};
pub use observation::{Observation, OBS_VERSION};
pub use render::{RenderSnapshot, Renderer, RendererStyle};
pub use reward::{RewardComponents, RewardWeights};
pub use state::{EpisodeState, TerminationReason};
pub use stats::SystemStats;
pub use telemetry::TelemetrySink;
pub use types::{Action, ProcessState, Profile, ACTION_COUNT};
