//! Error types for the locomotion core.
//!
//! Runtime ticks never fail: out-of-range values are clamped in place. Errors
//! only surface while wiring a controller together.

use crate::config::ConfigError;

/// Errors that can occur while building a [`crate::game::LocomotionController`].
#[derive(Debug, thiserror::Error)]
pub enum LocomotionError {
    /// A collaborator the controller cannot run without was never supplied.
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The supplied configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
