// src/error.rs
//
// Error taxonomy for the RamSim environment.
//
// Two kinds of failure are fatal and surface as errors:
// - InvalidActionShape: the action vector does not match the declared
//   action space (wrong length, or a code outside [0,7]). The call is
//   rejected before any state mutation.
// - InvalidConfiguration: bad construction parameters (k == 0, unknown
//   renderer style).
//
// Semantically invalid actions (e.g. Resume on a Running process) are NOT
// errors: they are recovered locally as a negative reward contribution and
// the tick proceeds. The reward channel is the RL feedback path.

use crate::types::ACTION_CODE_MAX;

/// Violation of the declared action-vector shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeViolation {
    /// The vector length does not equal the process count k.
    Length { expected: usize, got: usize },
    /// An entry is outside the closed action-code range.
    Code { index: usize, code: u8 },
}

/// Fatal environment errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// Action vector rejected at the boundary; no state was mutated.
    InvalidActionShape(ShapeViolation),
    /// Construction-time configuration error.
    InvalidConfiguration { message: String },
}

impl EnvError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        EnvError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::InvalidActionShape(ShapeViolation::Length { expected, got }) => {
                write!(
                    f,
                    "invalid action shape: expected vector of length {}, got {}",
                    expected, got
                )
            }
            EnvError::InvalidActionShape(ShapeViolation::Code { index, code }) => {
                write!(
                    f,
                    "invalid action shape: code {} at index {} outside [0,{}]",
                    code, index, ACTION_CODE_MAX
                )
            }
            EnvError::InvalidConfiguration { message } => {
                write!(f, "invalid configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for EnvError {}
