//! Camera bob while sprinting.
//!
//! The offset traces an ellipse around the standing anchor: `x = cos(phase) *
//! x_radius`, `y = sin(phase) * y_radius`. The phase sweeps one way for
//! `swing_period` seconds, then the other, which reads as a side-to-side
//! head sway in step with running.

use crate::config::ShakeConfig;
use crate::game::camera::CameraRig;
use crate::game::task::{Step, TaskSlot};
use crate::math::{Vec3, deg_to_rad};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Swing {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShakeTask {
    config: ShakeConfig,
    degree: f32,
    timer: f32,
    swing: Swing,
}

impl ShakeTask {
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            degree: config.start_degree,
            timer: 0.0,
            swing: Swing::Left,
        }
    }

    /// Current phase in degrees.
    pub fn degree(&self) -> f32 {
        self.degree
    }

    /// Offset from the standing anchor for the current phase.
    pub fn offset(&self) -> Vec3 {
        let radians = deg_to_rad(self.degree);
        Vec3::new(
            radians.cos() * self.config.x_radius,
            radians.sin() * self.config.y_radius,
            0.0,
        )
    }

    fn run(&mut self, camera: &mut CameraRig, dt: f32) -> Step {
        self.timer += dt;
        if self.timer > self.config.swing_period {
            self.swing = match self.swing {
                Swing::Left => Swing::Right,
                Swing::Right => Swing::Left,
            };
            self.timer = 0.0;
        }

        let sweep = self.config.angular_speed * dt;
        match self.swing {
            Swing::Left => self.degree += sweep,
            Swing::Right => self.degree -= sweep,
        }

        camera.set_local_position(camera.origin_local() + self.offset());
        Step::Continue
    }
}

#[derive(Debug, Clone)]
pub struct RunShakeOscillator {
    config: ShakeConfig,
    task: TaskSlot<ShakeTask>,
}

impl RunShakeOscillator {
    pub fn new(config: &ShakeConfig) -> Self {
        Self {
            config: *config,
            task: TaskSlot::new("run_shake"),
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.is_active()
    }

    pub fn task(&self) -> &TaskSlot<ShakeTask> {
        &self.task
    }

    /// Starts the shake when `active` and stops it otherwise.
    pub fn set_active(&mut self, active: bool, camera: &mut CameraRig) {
        if active {
            let config = self.config;
            self.task.start_if_idle(|| ShakeTask::new(config));
        } else {
            self.stop(camera);
        }
    }

    /// Cancels the shake and puts the camera straight back on its anchor.
    pub fn stop(&mut self, camera: &mut CameraRig) -> bool {
        if self.task.cancel().is_some() {
            camera.reset_to_origin();
            return true;
        }
        false
    }

    pub fn advance(&mut self, camera: &mut CameraRig, dt: f32) {
        self.task.advance(|task| task.run(camera, dt));
    }
}
