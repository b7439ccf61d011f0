// src/process.rs
//
// Per-process state and profile-driven natural dynamics.
//
// A process is a row in the table: (ram, cpu, priority, state), plus its
// fixed profile and an optional saved image while swapped out. Dynamics
// advance Running processes only; Suspended and Swapped processes sit
// still (their cpu is already forced to zero by the action layer).

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::DynamicsConfig;
use crate::types::{ProcessState, Profile};

/// Saved (ram, cpu) image of a swapped-out process, restored on SwapIn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapImage {
    pub ram: f64,
    pub cpu: f64,
}

/// One simulated workload.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    /// Stable slot index in [0, k).
    pub id: usize,
    /// Behavioural archetype, fixed at creation.
    pub profile: Profile,
    /// Normalised RAM share in [0,1].
    pub ram: f64,
    /// Normalised CPU share in [0,1].
    pub cpu: f64,
    /// Scheduling priority in [0,1].
    pub priority: f64,
    /// Lifecycle state.
    pub state: ProcessState,
    /// Present iff state == Swapped.
    pub swap_image: Option<SwapImage>,
}

impl Process {
    /// Sample a fresh Running process of the given profile.
    pub fn sample(
        id: usize,
        profile: Profile,
        cfg: &DynamicsConfig,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let bands = cfg.bands(profile);
        Self {
            id,
            profile,
            ram: sample_band(bands.ram, rng),
            cpu: sample_band(bands.cpu, rng),
            priority: sample_band(bands.priority, rng),
            state: ProcessState::Running,
            swap_image: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state != ProcessState::Killed
    }

    pub fn is_running(&self) -> bool {
        self.state == ProcessState::Running
    }

    /// Transition to Killed, wiping the observation row and any swap image.
    pub fn kill(&mut self) {
        self.state = ProcessState::Killed;
        self.ram = 0.0;
        self.cpu = 0.0;
        self.priority = 0.0;
        self.swap_image = None;
    }

    /// Advance one tick of natural dynamics.
    ///
    /// Only Running processes evolve. Draw order per process is fixed
    /// (ram, cpu, crash check) so trajectories are reproducible for a
    /// given seed.
    pub fn advance(&mut self, cfg: &DynamicsConfig, rng: &mut ChaCha8Rng) {
        if self.state != ProcessState::Running {
            return;
        }

        match self.profile {
            Profile::Heavy => {
                let (lo, hi) = cfg.heavy_ram_band;
                if self.ram < lo {
                    self.ram += cfg.heavy_ram_drift;
                } else if self.ram > hi {
                    self.ram -= cfg.heavy_ram_drift;
                } else {
                    self.ram += rng.gen_range(-cfg.ram_jitter..=cfg.ram_jitter);
                }
                let jitter = rng.gen_range(-cfg.cpu_jitter..=cfg.cpu_jitter);
                self.cpu = clamp_band(self.cpu + jitter, cfg.heavy_cpu_band);
            }
            Profile::Leaky => {
                // The leak never reverses; no action slows it short of a kill.
                let (lo, hi) = cfg.leak_increment;
                self.ram += rng.gen_range(lo..=hi);
                let jitter = rng.gen_range(-cfg.cpu_jitter..=cfg.cpu_jitter);
                self.cpu = clamp_band(self.cpu + jitter, cfg.leaky_cpu_band);
            }
            Profile::Active => {
                let ram_step = rng.gen_range(-cfg.ram_jitter..=cfg.ram_jitter);
                self.ram = clamp_band(self.ram + ram_step, cfg.active_ram_band);
                let cpu_step = rng.gen_range(-cfg.cpu_jitter..=cfg.cpu_jitter);
                self.cpu = clamp_band(self.cpu + cpu_step, cfg.active_cpu_band);
            }
            Profile::Idle => {
                let ram_step = rng.gen_range(-cfg.ram_jitter..=cfg.ram_jitter) * 0.25;
                self.ram = clamp_band(self.ram + ram_step, cfg.idle_ram_band);
                let cpu_step = rng.gen_range(-cfg.cpu_jitter..=cfg.cpu_jitter) * 0.25;
                self.cpu = clamp_band(self.cpu + cpu_step, cfg.idle_cpu_band);
            }
        }

        self.ram = self.ram.clamp(0.0, 1.0);
        self.cpu = self.cpu.clamp(0.0, 1.0);

        // Spontaneous crash, independent of the action taken this tick.
        if cfg.crash_prob > 0.0 && rng.gen_bool(cfg.crash_prob) {
            self.kill();
        }
    }
}

fn sample_band((lo, hi): (f64, f64), rng: &mut ChaCha8Rng) -> f64 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

fn clamp_band(value: f64, (lo, hi): (f64, f64)) -> f64 {
    value.clamp(lo, hi)
}
