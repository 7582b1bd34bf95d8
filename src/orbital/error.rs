//! Errors raised by the orbital state model

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrbitError {
    /// The two element lines were rejected before a propagator could be built.
    #[error("invalid element set for {name}: {reason}")]
    Parse { name: String, reason: String },

    /// SGP4 could not resolve a position for the requested instant.
    #[error("propagation failed for {name}: {reason}")]
    Propagation { name: String, reason: String },
}

impl OrbitError {
    pub fn parse(name: &str, reason: impl ToString) -> Self {
        Self::Parse {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn propagation(name: &str, reason: impl ToString) -> Self {
        Self::Propagation {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
