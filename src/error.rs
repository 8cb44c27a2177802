//! Error types for the simulation core and the score submission boundary
//!
//! Neither kind is fatal: simulation faults are caught by the scheduler and shown as an
//! overlay, submission failures are logged and dropped.

use thiserror::Error;

/// Faults raised while stepping the simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// A run-state invariant no longer holds
    #[error("invariant violated: {what}")]
    InvariantViolated { what: String },

    /// An entity picked up a NaN or infinite coordinate
    #[error("non-finite state on {entity}")]
    NonFiniteState { entity: &'static str },

    /// Balance constants that cannot drive a level
    #[error("invalid tuning: {0}")]
    Tuning(String),

    /// A tick panicked; the payload message is kept for the overlay
    #[error("tick panicked: {0}")]
    Panicked(String),
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

/// Failures sending a finished run's score to the leaderboard collaborator
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to encode submission: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("transport failed: {0}")]
    Transport(String),

    #[error("submission worker is gone")]
    QueueClosed,
}

/// Failures presenting a frame to a render target
#[derive(Debug, Error)]
pub enum RenderError {
    /// The surface went away (resize, device loss); the next frame may recover
    #[error("render target lost: {0}")]
    Lost(String),

    #[error("render target failed: {0}")]
    Backend(String),
}
