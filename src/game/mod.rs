//! Locomotion state and per-tick logic.
//!
//! This module defines [`PlayerLocomotionState`], the single aggregate holding
//! everything the locomotion core mutates, and the components that act on it.
//!
//! # Overview
//!
//! - [`stamina`]: stamina pool with its drain/recovery task
//! - [`crouch`]: crouch posture and the stand-up task
//! - [`run_shake`]: camera sway while sprinting
//! - [`movement`]: translation and look rotation
//! - [`controller`]: [`LocomotionController`], which runs one tick of all the above
//! - [`task`]: the single-instance, cancellable task slot they all share
//!
//! Everything runs on the caller's thread. Tasks are plain state machines that
//! the controller advances once per tick, so no locking is involved.

pub mod audio;
pub mod camera;
pub mod collaborators;
pub mod controller;
pub mod crouch;
pub mod keys;
pub mod movement;
pub mod run_shake;
pub mod stamina;
pub mod task;

pub use self::camera::{CameraRig, CameraUniform};
pub use self::collaborators::{
    AudioCue, BodyPlacement, KinematicBody, LocomotionAnimator, LocomotionAudio, StaminaDisplay,
};
pub use self::controller::{LocomotionController, LocomotionControllerBuilder};
pub use self::crouch::Posture;
pub use self::keys::{GameKey, KeyState, PlayerInput};
pub use self::stamina::{StaminaEvent, StaminaState};

use self::crouch::CrouchController;
use self::run_shake::RunShakeOscillator;
use self::stamina::StaminaManager;
use crate::config::LocomotionConfig;

/// Everything the locomotion core mutates, created once per controller.
#[derive(Debug, Clone)]
pub struct PlayerLocomotionState {
    /// Strafe axis sampled this tick.
    pub horizontal: f32,
    /// Forward axis sampled this tick.
    pub vertical: f32,
    pub is_moving: bool,
    /// Sprint is held. Whether it takes effect depends on stamina and posture.
    pub is_running: bool,
    pub is_crouching: bool,
    /// Speed used for this tick's translation.
    pub speed: f32,
    pub stamina: StaminaManager,
    pub crouch: CrouchController,
    pub run_shake: RunShakeOscillator,
    pub camera: CameraRig,
    /// Spine bend for the animation rig, in degrees.
    pub spine_pitch: f32,
}

impl PlayerLocomotionState {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            horizontal: 0.0,
            vertical: 0.0,
            is_moving: false,
            is_running: false,
            is_crouching: false,
            speed: config.speed.walk,
            stamina: StaminaManager::new(&config.stamina),
            crouch: CrouchController::new(&config.crouch),
            run_shake: RunShakeOscillator::new(&config.shake),
            camera: CameraRig::new(&config.camera),
            spine_pitch: config.look.spine_rest_pitch,
        }
    }
}
