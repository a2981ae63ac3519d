//! Per-tick translation and look rotation.
//!
//! # Coordinate System
//!
//! - Y-axis: up
//! - Yaw: degrees, 0 faces +Z, 90 faces +X
//! - `forward = (sin yaw, 0, cos yaw)`, `right = (cos yaw, 0, -sin yaw)`
//!
//! Look pitch is in degrees with positive values looking up. The spine bone
//! uses the rig's euler convention instead, where positive bends forward, so
//! it receives `spine_rest_pitch - look_pitch`.

use crate::config::LookConfig;
use crate::game::camera::CameraRig;
use crate::game::collaborators::BodyPlacement;
use crate::math::{Vec3, deg_to_rad};

/// Unit vector the body faces at `yaw` degrees.
pub fn forward(yaw: f32) -> Vec3 {
    let r = deg_to_rad(yaw);
    Vec3::new(r.sin(), 0.0, r.cos())
}

/// Unit vector to the body's right at `yaw` degrees.
pub fn right(yaw: f32) -> Vec3 {
    let r = deg_to_rad(yaw);
    Vec3::new(r.cos(), 0.0, -r.sin())
}

/// Normalized movement direction for the given axes.
///
/// Diagonal input is not faster than straight input.
pub fn move_vector(horizontal: f32, vertical: f32, yaw: f32) -> Vec3 {
    (forward(yaw) * vertical + right(yaw) * horizontal).normalize()
}

/// Stateless resolver turning input into body and camera transforms.
#[derive(Debug, Clone, Copy)]
pub struct MovementResolver {
    look: LookConfig,
}

impl MovementResolver {
    pub fn new(look: &LookConfig) -> Self {
        Self { look: *look }
    }

    /// Position delta for this tick, or `None` when there is no movement input.
    pub fn translation(
        &self,
        moving: bool,
        horizontal: f32,
        vertical: f32,
        speed: f32,
        yaw: f32,
        dt: f32,
    ) -> Option<Vec3> {
        if !moving {
            return None;
        }
        Some(move_vector(horizontal, vertical, yaw) * (speed * dt))
    }

    /// Turns the body by `yaw_delta` and tilts the camera to `look_pitch`.
    ///
    /// Returns the spine pitch for the animation rig.
    pub fn apply_look(
        &self,
        yaw_delta: f32,
        look_pitch: f32,
        body: &mut dyn BodyPlacement,
        camera: &mut CameraRig,
    ) -> f32 {
        if yaw_delta.is_finite() && yaw_delta != 0.0 {
            body.rotate_yaw(yaw_delta);
        }
        let limit = self.look.pitch_limit;
        let pitch = if look_pitch.is_nan() {
            0.0
        } else {
            look_pitch.clamp(-limit, limit)
        };
        camera.set_pitch(pitch);
        self.look.spine_rest_pitch - pitch
    }
}
