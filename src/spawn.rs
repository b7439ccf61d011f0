// src/spawn.rs
//
// Killed-slot replacement. Keeps the live population near k so the control
// problem stays non-trivial: an agent that kills everything does not get an
// empty system forever.
//
// Sampling is deterministic given the episode RNG. Draw order per killed
// slot is fixed: respawn coin, then profile, then the three resource draws
// inside Process::sample.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::{DynamicsConfig, SpawnConfig};
use crate::process::Process;
use crate::types::{ProcessState, Profile};

/// Replace killed slots with freshly sampled Running processes.
///
/// Each killed slot respawns independently with `cfg.respawn_prob`. The
/// slot index is reused as the new process id. Returns the number of
/// processes spawned.
pub fn respawn_killed(
    table: &mut [Process],
    cfg: &SpawnConfig,
    dynamics: &DynamicsConfig,
    rng: &mut ChaCha8Rng,
) -> usize {
    if cfg.respawn_prob <= 0.0 {
        return 0;
    }

    let mut spawned = 0;
    for slot in table.iter_mut() {
        if slot.state != ProcessState::Killed {
            continue;
        }
        if !rng.gen_bool(cfg.respawn_prob.min(1.0)) {
            continue;
        }
        let profile = sample_profile(&cfg.profile_weights, rng);
        *slot = Process::sample(slot.id, profile, dynamics, rng);
        spawned += 1;
    }
    spawned
}

/// Draw a profile from the weighted distribution.
///
/// Weights are normalised at sample time; the last entry absorbs any
/// floating-point remainder.
pub fn sample_profile(weights: &[(Profile, f64); 4], rng: &mut ChaCha8Rng) -> Profile {
    let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return Profile::Idle;
    }

    let mut draw = rng.gen_range(0.0..total);
    for (profile, weight) in weights.iter() {
        let w = weight.max(0.0);
        if draw < w {
            return *profile;
        }
        draw -= w;
    }
    weights[weights.len() - 1].0
}
