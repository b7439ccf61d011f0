// src/types.rs
//
// Common shared types for the RamSim engine: the closed process-profile,
// process-state, and action enumerations plus their wire codes.

use serde::{Deserialize, Serialize};

/// Highest valid action code (codes are 0..=ACTION_CODE_MAX).
pub const ACTION_CODE_MAX: u8 = 7;

/// Number of distinct actions in the action space.
pub const ACTION_COUNT: usize = 8;

/// Fixed behavioural archetype governing a process's resource trajectory.
///
/// The profile is assigned at creation and never changes; dynamics and
/// spawn sampling both key off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    /// High memory footprint and sustained high CPU.
    Heavy,
    /// Monotonic RAM growth with negligible CPU (memory-leak anomaly).
    Leaky,
    /// Moderate resource demand with a random walk.
    Active,
    /// Baseline background task with minimal footprint.
    Idle,
}

impl Profile {
    /// Stable lowercase name for logs/telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Heavy => "heavy",
            Profile::Leaky => "leaky",
            Profile::Active => "active",
            Profile::Idle => "idle",
        }
    }
}

/// Lifecycle state of a simulated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    Running,
    Suspended,
    Swapped,
    Killed,
}

impl ProcessState {
    /// Numeric encoding used in the observation's process table.
    ///
    /// These codes are part of the observation contract and must stay
    /// exactly 1.0 / 0.6 / 0.3 / 0.0.
    pub fn code(&self) -> f64 {
        match self {
            ProcessState::Running => 1.0,
            ProcessState::Suspended => 0.6,
            ProcessState::Swapped => 0.3,
            ProcessState::Killed => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::Running => "running",
            ProcessState::Suspended => "suspended",
            ProcessState::Swapped => "swapped",
            ProcessState::Killed => "killed",
        }
    }
}

/// One per-process control action.
///
/// The agent submits one action per process slot each tick, encoded as an
/// integer in [0,7]. Decoding happens once at the environment boundary;
/// everything past that point works with this closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Kill,
    SwapOut,
    SwapIn,
    Suspend,
    Resume,
    ReniceIncrease,
    ReniceDecrease,
    NoOp,
}

impl Action {
    /// Decode a wire code. Returns None for codes outside [0,7].
    pub fn from_code(code: u8) -> Option<Action> {
        match code {
            0 => Some(Action::Kill),
            1 => Some(Action::SwapOut),
            2 => Some(Action::SwapIn),
            3 => Some(Action::Suspend),
            4 => Some(Action::Resume),
            5 => Some(Action::ReniceIncrease),
            6 => Some(Action::ReniceDecrease),
            7 => Some(Action::NoOp),
            _ => None,
        }
    }

    /// Wire code of this action.
    pub fn code(&self) -> u8 {
        match self {
            Action::Kill => 0,
            Action::SwapOut => 1,
            Action::SwapIn => 2,
            Action::Suspend => 3,
            Action::Resume => 4,
            Action::ReniceIncrease => 5,
            Action::ReniceDecrease => 6,
            Action::NoOp => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Kill => "kill",
            Action::SwapOut => "swap_out",
            Action::SwapIn => "swap_in",
            Action::Suspend => "suspend",
            Action::Resume => "resume",
            Action::ReniceIncrease => "renice_increase",
            Action::ReniceDecrease => "renice_decrease",
            Action::NoOp => "noop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_codes_roundtrip() {
        for code in 0..=ACTION_CODE_MAX {
            let action = Action::from_code(code).expect("code in range must decode");
            assert_eq!(action.code(), code);
        }
        assert_eq!(Action::from_code(ACTION_CODE_MAX + 1), None);
        assert_eq!(Action::from_code(255), None);
    }

    #[test]
    fn test_state_codes_exact() {
        assert_eq!(ProcessState::Running.code(), 1.0);
        assert_eq!(ProcessState::Suspended.code(), 0.6);
        assert_eq!(ProcessState::Swapped.code(), 0.3);
        assert_eq!(ProcessState::Killed.code(), 0.0);
    }
}
