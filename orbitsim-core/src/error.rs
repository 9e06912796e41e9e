use glam::DVec2;
use thiserror::Error;

/// Errors raised by the physics core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Body constructed with a mass that is not finite and positive
    #[error("invalid body: mass must be finite and positive, got {mass}")]
    InvalidBody { mass: f64 },

    /// Body constructed with a non-finite position or velocity
    #[error("invalid body: {field} must be finite, got {value}")]
    NonFiniteState { field: &'static str, value: DVec2 },

    /// Two bodies are coincident (or not a finite distance apart), so the
    /// force law is undefined
    #[error("degenerate configuration: bodies {a} and {b} are {distance} m apart at {at}")]
    DegenerateConfiguration {
        a: String,
        b: String,
        at: DVec2,
        distance: f64,
    },

    /// Timestep that is not finite and positive
    #[error("invalid timestep {0}: must be finite and positive")]
    InvalidTimestep(f64),

    /// A body handle that does not belong to this simulator
    #[error("unknown body id {0}")]
    UnknownBody(usize),
}
