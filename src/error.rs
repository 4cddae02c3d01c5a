use std::fmt;

use crate::sim::Phase;

/// Errors surfaced to the host.
///
/// Timer-driven operations never produce these; they are silent no-ops
/// outside their valid phase.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// Level must be at least 1
    InvalidLevel { level: u32 },
    /// Viewport is non-finite, non-positive, or too short for the play margin
    InvalidViewport { width: f32, height: f32 },
    /// Host asked for a transition the current phase doesn't allow
    IllegalTransition { action: &'static str, phase: Phase },
    /// Tuning document failed to parse or validate
    Tuning(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { level } => {
                write!(f, "invalid level {level}: levels start at 1")
            }
            Self::InvalidViewport { width, height } => {
                write!(f, "unusable viewport: {width}x{height}")
            }
            Self::IllegalTransition { action, phase } => {
                write!(f, "cannot {action} while {phase:?}")
            }
            Self::Tuning(msg) => write!(f, "bad tuning: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Tuning(err.to_string())
    }
}
