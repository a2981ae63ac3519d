//! Narrow interfaces to the systems the controller drives but does not own.
//!
//! The controller is handed these at construction time. Only the body is
//! required; the display, animator and audio hooks are optional and simply
//! skipped when absent.

use crate::math::Vec3;

/// Owner of the player's physical placement.
///
/// Yaw is in degrees; positive values turn towards +X from +Z.
pub trait BodyPlacement {
    fn position(&self) -> Vec3;
    fn yaw(&self) -> f32;
    /// Requests a position change. The owner may resolve collisions.
    fn translate(&mut self, delta: Vec3);
    fn rotate_yaw(&mut self, degrees: f32);
}

/// On-screen stamina readout.
pub trait StaminaDisplay {
    /// Receives a value in `[0, max_stamina]`.
    fn update_stamina(&mut self, value: f32);
}

/// Animation parameters for the player rig. Fire-and-forget.
pub trait LocomotionAnimator {
    fn set_locomotion(&mut self, horizontal: f32, vertical: f32, running: bool);
    fn set_crouching(&mut self, crouching: bool);
}

/// Sound events raised by the locomotion core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    StartWalking,
    StartSprinting,
    StopMoving,
    /// Stamina ran out while sprinting.
    OutOfBreath,
}

pub trait LocomotionAudio {
    fn play(&mut self, cue: AudioCue);
}

/// A body with no physics: translations are applied verbatim.
///
/// Used by the sandbox and headless runs, and handy for embedding the
/// controller where no rigid-body engine is available.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KinematicBody {
    pub position: Vec3,
    pub yaw: f32,
}

impl KinematicBody {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}

impl BodyPlacement for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    fn rotate_yaw(&mut self, degrees: f32) {
        self.yaw = (self.yaw + degrees).rem_euclid(360.0);
    }
}
