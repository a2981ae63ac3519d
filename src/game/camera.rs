//! First-person camera rig.
//!
//! The camera is a child of the body, so everything here is kept in
//! body-local space: `local_position` is what the crouch, stand-up and
//! run-shake logic write to. World-space pose and the view matrix are derived
//! on demand from the body's position and yaw.

use crate::config::CameraConfig;
use crate::math::{Mat4, Vec3};

/// Camera data laid out for a uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    /// World-space eye position; `w` is always 1.
    pub position: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    local_position: Vec3,
    origin_local: Vec3,
    crouch_local: Vec3,
    /// Degrees, positive looks up.
    pitch: f32,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        let origin_local = Vec3::from(config.origin_local);
        Self {
            local_position: origin_local,
            origin_local,
            crouch_local: Vec3::from(config.crouch_local),
            pitch: 0.0,
        }
    }

    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    pub fn origin_local(&self) -> Vec3 {
        self.origin_local
    }

    pub fn crouch_local(&self) -> Vec3 {
        self.crouch_local
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    pub fn set_local_position(&mut self, position: Vec3) {
        self.local_position = position;
    }

    /// Snaps back to the standing anchor.
    pub fn reset_to_origin(&mut self) {
        self.local_position = self.origin_local;
    }

    pub fn is_at_origin(&self) -> bool {
        self.local_position == self.origin_local
    }

    /// Moves a fraction `factor` of the remaining way to the crouch anchor.
    pub fn approach_crouch(&mut self, factor: f32) {
        self.local_position = self.local_position.lerp(&self.crouch_local, factor);
    }

    /// Moves straight up by `distance`.
    pub fn raise(&mut self, distance: f32) {
        self.local_position += Vec3::UP * distance;
    }

    /// Eye position in world space for a body at `body_position` facing `yaw`.
    pub fn world_position(&self, body_position: Vec3, yaw: f32) -> Vec3 {
        Mat4::rotation_y(yaw).transform_point(self.local_position) + body_position
    }

    /// World-to-view transform. View space looks down +Z with +Y up.
    pub fn view_matrix(&self, body_position: Vec3, yaw: f32) -> Mat4 {
        let eye = self.world_position(body_position, yaw);
        Mat4::translation(-eye.x(), -eye.y(), -eye.z())
            .multiply(&Mat4::rotation_y(-yaw))
            .multiply(&Mat4::rotation_x(self.pitch))
    }

    pub fn uniform(&self, body_position: Vec3, yaw: f32) -> CameraUniform {
        let eye = self.world_position(body_position, yaw);
        CameraUniform {
            view: self.view_matrix(body_position, yaw).into(),
            position: [eye.x(), eye.y(), eye.z(), 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(&CameraConfig::default())
    }

    #[test]
    fn test_starts_at_origin() {
        let camera = rig();
        assert!(camera.is_at_origin());
        assert_eq!(camera.local_position(), Vec3::new(0.0, 1.6, 0.0));
    }

    #[test]
    fn test_world_position_follows_body_yaw() {
        let mut camera = rig();
        camera.set_local_position(Vec3::new(0.0, 1.6, 0.5));
        let eye = camera.world_position(Vec3::new(10.0, 0.0, 0.0), 90.0);
        assert!(eye.distance(&Vec3::new(10.5, 1.6, 0.0)) < 1e-5, "{eye:?}");
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let camera = rig();
        let body = Vec3::new(3.0, 0.0, -2.0);
        let view = camera.view_matrix(body, 45.0);
        let eye = camera.world_position(body, 45.0);
        assert!(view.transform_point(eye).length() < 1e-5);
    }

    #[test]
    fn test_view_matrix_puts_facing_direction_on_plus_z() {
        let camera = rig();
        let view = camera.view_matrix(Vec3::ZERO, 90.0);
        let ahead = camera.world_position(Vec3::ZERO, 90.0) + Vec3::new(1.0, 0.0, 0.0);
        let p = view.transform_point(ahead);
        assert!(p.distance(&Vec3::new(0.0, 0.0, 1.0)) < 1e-5, "{p:?}");
    }

    #[test]
    fn test_uniform_is_gpu_sized() {
        let uniform = rig().uniform(Vec3::ZERO, 0.0);
        assert_eq!(bytemuck::bytes_of(&uniform).len(), 80);
        assert_eq!(uniform.position[3], 1.0);
    }

    #[test]
    fn test_approach_crouch_converges() {
        let mut camera = rig();
        for _ in 0..200 {
            camera.approach_crouch(0.1);
        }
        assert!(camera.local_position().distance(&camera.crouch_local()) < 1e-4);
    }
}
