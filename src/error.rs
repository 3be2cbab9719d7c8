//! Errors reported by world mutations.

use std::fmt;

use crate::properties::BodyId;

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Recoverable failures of registry and constraint operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationError {
    /// Shape kind is unknown or the shape geometry is degenerate.
    InvalidShape,
    /// Dynamic bodies need a finite, positive mass.
    InvalidMass,
    /// A constraint referenced a body that is not in the world.
    UnknownBody(BodyId),
    /// Pivots join the kinematic mouse anchor to a different, dynamic body.
    InvalidPivot,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidShape => write!(f, "invalid or unrecognized shape"),
            SimulationError::InvalidMass => write!(f, "mass must be positive and finite"),
            SimulationError::UnknownBody(id) => write!(f, "unknown body {}", id),
            SimulationError::InvalidPivot => {
                write!(f, "pivot must join a kinematic anchor to a dynamic body")
            }
        }
    }
}

impl std::error::Error for SimulationError {}
