// src/actions.rs
//
// Action resolution: validates one action against a process's current
// state, applies the legal ones, and computes the per-action reward term.
//
// Legality table (anything else is invalid):
//
//   Kill            Running | Suspended | Swapped
//   SwapOut         Running
//   SwapIn          Swapped
//   Suspend         Running
//   Resume          Suspended
//   Renice +/-      Running | Suspended | Swapped
//   NoOp            any state
//
// Invalid combinations leave the process untouched and contribute the
// configured negative penalty; the tick still counts. Killed processes
// accept only NoOp.
//
// Pressure-sensitive rewards (swap in/out) read the SystemStats aggregated
// at the end of the previous tick.

use crate::config::ActionRewardConfig;
use crate::process::{Process, SwapImage};
use crate::stats::SystemStats;
use crate::types::{Action, ProcessState};

/// Result of resolving one action against one process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionOutcome {
    /// Reward contribution of this action.
    pub reward: f64,
    /// Whether the (action, state) combination was legal.
    pub legal: bool,
}

impl ActionOutcome {
    fn legal(reward: f64) -> Self {
        Self {
            reward,
            legal: true,
        }
    }

    fn invalid(cfg: &ActionRewardConfig) -> Self {
        Self {
            reward: cfg.invalid_action_penalty,
            legal: false,
        }
    }
}

/// Resolve one action against one process.
///
/// Mutates the process only when the combination is legal.
pub fn apply_action(
    process: &mut Process,
    action: Action,
    stats: &SystemStats,
    cfg: &ActionRewardConfig,
) -> ActionOutcome {
    match (action, process.state) {
        (Action::NoOp, _) => ActionOutcome::legal(0.0),

        // Killed processes accept nothing else.
        (_, ProcessState::Killed) => ActionOutcome::invalid(cfg),

        (Action::Kill, _) => {
            let reward = kill_reward(process, cfg);
            process.kill();
            ActionOutcome::legal(reward)
        }

        (Action::SwapOut, ProcessState::Running) => {
            let reward = if stats.ram_usage >= cfg.ram_pressure_threshold {
                cfg.swap_out_pressure_bonus
            } else {
                cfg.swap_out_base_cost
            };
            process.swap_image = Some(SwapImage {
                ram: process.ram,
                cpu: process.cpu,
            });
            process.ram = 0.0;
            process.cpu = 0.0;
            process.state = ProcessState::Swapped;
            ActionOutcome::legal(reward)
        }

        (Action::SwapIn, ProcessState::Swapped) => {
            if let Some(image) = process.swap_image.take() {
                process.ram = image.ram;
                process.cpu = image.cpu;
            }
            process.state = ProcessState::Running;
            let reward = if stats.ram_usage >= cfg.ram_pressure_threshold {
                cfg.swap_in_pressure_penalty
            } else {
                0.0
            };
            ActionOutcome::legal(reward)
        }

        (Action::Suspend, ProcessState::Running) => {
            let reward = if process.cpu > cfg.cpu_contention_threshold {
                cfg.suspend_contention_bonus
            } else {
                0.0
            };
            process.cpu = 0.0;
            process.state = ProcessState::Suspended;
            ActionOutcome::legal(reward)
        }

        (Action::Resume, ProcessState::Suspended) => {
            process.state = ProcessState::Running;
            ActionOutcome::legal(0.0)
        }

        (Action::ReniceIncrease, _) => {
            process.priority = (process.priority + cfg.renice_step).clamp(0.0, 1.0);
            ActionOutcome::legal(0.0)
        }

        (Action::ReniceDecrease, _) => {
            process.priority = (process.priority - cfg.renice_step).clamp(0.0, 1.0);
            ActionOutcome::legal(0.0)
        }

        // Everything else is an illegal transition.
        (Action::SwapOut, _)
        | (Action::SwapIn, _)
        | (Action::Suspend, _)
        | (Action::Resume, _) => ActionOutcome::invalid(cfg),
    }
}

/// Reward for a kill, judged against the victim's profile and priority.
fn kill_reward(process: &Process, cfg: &ActionRewardConfig) -> f64 {
    use crate::types::Profile;

    if process.profile == Profile::Leaky && process.ram > cfg.kill_leak_ram_threshold {
        // The ideal target: reclaiming a leak.
        cfg.kill_leak_bonus
    } else if process.priority > cfg.critical_priority_threshold {
        cfg.kill_critical_penalty
    } else {
        cfg.kill_base_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DynamicsConfig;
    use crate::types::Profile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_process(profile: Profile) -> Process {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        Process::sample(0, profile, &DynamicsConfig::default(), &mut rng)
    }

    fn calm_stats() -> SystemStats {
        SystemStats {
            ram_usage: 0.2,
            cpu_usage: 0.1,
            page_faults: 0.0,
            swap_usage: 0.0,
            power: 0.2,
        }
    }

    fn pressured_stats() -> SystemStats {
        SystemStats {
            ram_usage: 0.85,
            ..calm_stats()
        }
    }

    #[test]
    fn test_kill_leaky_over_threshold_earns_bonus() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Leaky);
        p.ram = 0.7;
        let out = apply_action(&mut p, Action::Kill, &calm_stats(), &cfg);
        assert_eq!(out.reward, cfg.kill_leak_bonus);
        assert_eq!(p.state, ProcessState::Killed);
        assert_eq!((p.ram, p.cpu), (0.0, 0.0));
    }

    #[test]
    fn test_kill_critical_process_penalised() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Heavy);
        p.priority = 0.9;
        let out = apply_action(&mut p, Action::Kill, &calm_stats(), &cfg);
        assert_eq!(out.reward, cfg.kill_critical_penalty);
        assert!(out.legal);
    }

    #[test]
    fn test_kill_ordinary_process_small_cost() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Idle);
        p.priority = 0.3;
        let out = apply_action(&mut p, Action::Kill, &calm_stats(), &cfg);
        assert_eq!(out.reward, cfg.kill_base_cost);
    }

    #[test]
    fn test_swap_out_under_pressure_rewarded() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Heavy);
        let out = apply_action(&mut p, Action::SwapOut, &pressured_stats(), &cfg);
        assert_eq!(out.reward, cfg.swap_out_pressure_bonus);
        assert_eq!(p.state, ProcessState::Swapped);
        assert_eq!((p.ram, p.cpu), (0.0, 0.0));
        assert!(p.swap_image.is_some());
    }

    #[test]
    fn test_swap_roundtrip_restores_image() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Active);
        let (ram0, cpu0) = (p.ram, p.cpu);
        apply_action(&mut p, Action::SwapOut, &calm_stats(), &cfg);
        let out = apply_action(&mut p, Action::SwapIn, &calm_stats(), &cfg);
        assert_eq!(out.reward, 0.0);
        assert_eq!(p.state, ProcessState::Running);
        assert_eq!((p.ram, p.cpu), (ram0, cpu0));
        assert!(p.swap_image.is_none());
    }

    #[test]
    fn test_swap_in_under_pressure_penalised() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Active);
        apply_action(&mut p, Action::SwapOut, &calm_stats(), &cfg);
        let out = apply_action(&mut p, Action::SwapIn, &pressured_stats(), &cfg);
        assert_eq!(out.reward, cfg.swap_in_pressure_penalty);
    }

    #[test]
    fn test_suspend_retains_ram_and_zeroes_cpu() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Heavy);
        let ram0 = p.ram;
        let out = apply_action(&mut p, Action::Suspend, &calm_stats(), &cfg);
        assert_eq!(out.reward, cfg.suspend_contention_bonus); // heavy cpu > threshold
        assert_eq!(p.state, ProcessState::Suspended);
        assert_eq!(p.ram, ram0);
        assert_eq!(p.cpu, 0.0);
    }

    #[test]
    fn test_resume_is_neutral() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Active);
        apply_action(&mut p, Action::Suspend, &calm_stats(), &cfg);
        let out = apply_action(&mut p, Action::Resume, &calm_stats(), &cfg);
        assert_eq!(out.reward, 0.0);
        assert_eq!(p.state, ProcessState::Running);
    }

    #[test]
    fn test_renice_clips_to_unit_interval() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Heavy);
        p.priority = 0.95;
        apply_action(&mut p, Action::ReniceIncrease, &calm_stats(), &cfg);
        assert_eq!(p.priority, 1.0);
        p.priority = 0.05;
        apply_action(&mut p, Action::ReniceDecrease, &calm_stats(), &cfg);
        assert_eq!(p.priority, 0.0);
    }

    #[test]
    fn test_invalid_combinations_penalised_and_inert() {
        let cfg = ActionRewardConfig::default();

        // SwapIn on a Running process.
        let mut p = make_process(Profile::Active);
        let before = p.clone();
        let out = apply_action(&mut p, Action::SwapIn, &calm_stats(), &cfg);
        assert!(!out.legal);
        assert!(out.reward >= -5.0 && out.reward <= -2.0);
        assert_eq!(p, before);

        // Resume on a Running process.
        let out = apply_action(&mut p, Action::Resume, &calm_stats(), &cfg);
        assert!(!out.legal);
        assert_eq!(p, before);

        // Suspend on a Swapped process.
        apply_action(&mut p, Action::SwapOut, &calm_stats(), &cfg);
        let swapped = p.clone();
        let out = apply_action(&mut p, Action::Suspend, &calm_stats(), &cfg);
        assert!(!out.legal);
        assert_eq!(p, swapped);
    }

    #[test]
    fn test_killed_accepts_only_noop() {
        let cfg = ActionRewardConfig::default();
        let mut p = make_process(Profile::Idle);
        p.kill();
        let dead = p.clone();

        let out = apply_action(&mut p, Action::NoOp, &calm_stats(), &cfg);
        assert!(out.legal);
        assert_eq!(out.reward, 0.0);

        for action in [
            Action::Kill,
            Action::SwapOut,
            Action::SwapIn,
            Action::Suspend,
            Action::Resume,
            Action::ReniceIncrease,
            Action::ReniceDecrease,
        ] {
            let out = apply_action(&mut p, action, &calm_stats(), &cfg);
            assert!(!out.legal, "{:?} must be invalid on a killed process", action);
            assert_eq!(out.reward, cfg.invalid_action_penalty);
            assert_eq!(p, dead);
        }
    }
}
