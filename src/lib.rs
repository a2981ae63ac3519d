//! Mirador locomotion core.
//!
//! The first-person movement layer of Mirador as a standalone library: walk,
//! sprint, crouch, a stamina pool that gates sprinting and a camera sway while
//! running. Everything is driven by [`game::LocomotionController::tick`] once
//! per frame and talks to the outside world through the small traits in
//! [`game::collaborators`].
//!
//! # Architecture
//! - `config`: YAML-loadable tuning values
//! - `error`: error types surfaced at construction time
//! - `game/`: locomotion state, per-tick tasks and the controller
//! - `math/`: vector and matrix helpers for camera and movement

pub mod config;
pub mod error;
pub mod game;
pub mod math;

pub use config::{ConfigError, LocomotionConfig};
pub use error::LocomotionError;
pub use game::{LocomotionController, PlayerInput};
