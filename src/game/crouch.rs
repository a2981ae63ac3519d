//! Crouch posture and the stand-up transition.
//!
//! While crouch is held the camera eases towards the crouch anchor every tick.
//! Releasing crouch starts a stand-up task that raises the camera until it
//! passes the standing anchor, then snaps it exactly onto the anchor.

use tracing::debug;

use crate::config::{CrouchConfig, StandUpStep};
use crate::game::camera::CameraRig;
use crate::game::task::{Step, TaskSlot};
use crate::math::smoothing_factor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Posture {
    #[default]
    Standing,
    Crouching,
    StandingUp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandUpTask {
    step: StandUpStep,
}

impl StandUpTask {
    pub fn new(step: StandUpStep) -> Self {
        Self { step }
    }

    fn run(&mut self, camera: &mut CameraRig, dt: f32) -> Step {
        camera.raise(self.step.distance(dt));
        if camera.local_position().y() > camera.origin_local().y() {
            camera.reset_to_origin();
            return Step::Done;
        }
        Step::Continue
    }
}

#[derive(Debug, Clone)]
pub struct CrouchController {
    posture: Posture,
    smoothing: f32,
    step: StandUpStep,
    stand_up: TaskSlot<StandUpTask>,
}

impl CrouchController {
    pub fn new(config: &CrouchConfig) -> Self {
        Self {
            posture: Posture::Standing,
            smoothing: config.smoothing,
            step: config.stand_up,
            stand_up: TaskSlot::new("stand_up"),
        }
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn stand_up(&self) -> &TaskSlot<StandUpTask> {
        &self.stand_up
    }

    /// Applies this tick's crouch input. Returns `true` while crouching.
    ///
    /// A crouch that ends without a release edge (input dropped between
    /// samples) still stands the player up.
    pub fn evaluate(&mut self, held: bool, released: bool, camera: &mut CameraRig, dt: f32) -> bool {
        if held {
            if self.stand_up.cancel().is_some() {
                debug!("stand-up interrupted by crouch");
            }
            self.posture = Posture::Crouching;
            camera.approach_crouch(smoothing_factor(self.smoothing, dt));
            return true;
        }

        if released || self.posture == Posture::Crouching {
            self.posture = Posture::StandingUp;
            self.stand_up.start(StandUpTask::new(self.step));
        }
        false
    }

    /// Runs one stand-up slice. Returns `true` on the tick the player is upright again.
    pub fn advance(&mut self, camera: &mut CameraRig, dt: f32) -> bool {
        let finished = self.stand_up.advance(|task| task.run(camera, dt));
        if finished {
            self.posture = Posture::Standing;
        }
        finished
    }
}
