//! The per-tick locomotion orchestrator.
//!
//! [`LocomotionController::tick`] runs the whole locomotion core once, in a
//! fixed order:
//!
//! 1. Sample the input into [`PlayerLocomotionState`] flags.
//! 2. Crouch. While crouched, speed is forced to crouch speed and the
//!    stamina and run evaluation is skipped. A live stamina task keeps going.
//! 3. Stamina and speed: run speed only while moving, sprinting and stamina
//!    is above zero; otherwise walk speed.
//! 4. Run shake: on exactly while sprinting, reset on stop or exhaustion.
//! 5. Advance the live tasks by one slice. Tasks started in steps 2–4 skip
//!    this tick and begin on the next.
//! 6. Translate and rotate the body, tilt the camera.
//! 7. Push animation parameters and gait audio cues.

use tracing::{debug, info, warn};

use crate::config::LocomotionConfig;
use crate::error::LocomotionError;
use crate::game::camera::{CameraRig, CameraUniform};
use crate::game::collaborators::{
    AudioCue, BodyPlacement, LocomotionAnimator, LocomotionAudio, StaminaDisplay,
};
use crate::game::crouch::Posture;
use crate::game::keys::PlayerInput;
use crate::game::movement::MovementResolver;
use crate::game::stamina::{StaminaEvent, StaminaState};
use crate::game::PlayerLocomotionState;
use crate::math::{Mat4, approximately_zero};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gait {
    Still,
    Walking,
    Sprinting,
}

impl Gait {
    fn cue(self) -> AudioCue {
        match self {
            Gait::Still => AudioCue::StopMoving,
            Gait::Walking => AudioCue::StartWalking,
            Gait::Sprinting => AudioCue::StartSprinting,
        }
    }
}

/// Builder for [`LocomotionController`].
///
/// The body is required; everything else is optional.
#[derive(Default)]
pub struct LocomotionControllerBuilder {
    config: LocomotionConfig,
    body: Option<Box<dyn BodyPlacement>>,
    display: Option<Box<dyn StaminaDisplay>>,
    animator: Option<Box<dyn LocomotionAnimator>>,
    audio: Option<Box<dyn LocomotionAudio>>,
}

impl LocomotionControllerBuilder {
    pub fn config(mut self, config: LocomotionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn body(mut self, body: impl BodyPlacement + 'static) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    pub fn display(mut self, display: impl StaminaDisplay + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn animator(mut self, animator: impl LocomotionAnimator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    pub fn audio(mut self, audio: impl LocomotionAudio + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Sets or clears the audio hook from an already boxed backend.
    pub fn boxed_audio(mut self, audio: Option<Box<dyn LocomotionAudio>>) -> Self {
        self.audio = audio;
        self
    }

    /// Validates the configuration and wires the controller.
    ///
    /// # Errors
    ///
    /// Returns [`LocomotionError::MissingCollaborator`] without a body, or
    /// [`LocomotionError::Config`] when the configuration is invalid.
    pub fn build(self) -> Result<LocomotionController, LocomotionError> {
        self.config.validate()?;
        let body = self
            .body
            .ok_or(LocomotionError::MissingCollaborator("body"))?;

        info!(
            walk = self.config.speed.walk,
            run = self.config.speed.run,
            crouch = self.config.speed.crouch,
            max_stamina = self.config.stamina.max,
            display = self.display.is_some(),
            animator = self.animator.is_some(),
            audio = self.audio.is_some(),
            "locomotion controller ready"
        );

        Ok(LocomotionController {
            state: PlayerLocomotionState::new(&self.config),
            movement: MovementResolver::new(&self.config.look),
            config: self.config,
            body,
            display: self.display,
            animator: self.animator,
            audio: self.audio,
            gait: Gait::Still,
            sprinting: false,
            ticks: 0,
        })
    }
}

/// First-person locomotion core: one [`tick`](Self::tick) per frame.
pub struct LocomotionController {
    config: LocomotionConfig,
    state: PlayerLocomotionState,
    movement: MovementResolver,
    body: Box<dyn BodyPlacement>,
    display: Option<Box<dyn StaminaDisplay>>,
    animator: Option<Box<dyn LocomotionAnimator>>,
    audio: Option<Box<dyn LocomotionAudio>>,
    gait: Gait,
    sprinting: bool,
    ticks: u64,
}

impl LocomotionController {
    pub fn builder() -> LocomotionControllerBuilder {
        LocomotionControllerBuilder::default()
    }

    /// Advances the locomotion core by `dt` seconds.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, input: &PlayerInput, dt: f32) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "ignoring invalid frame time");
            0.0
        };
        self.ticks += 1;

        self.sample(input);
        self.sprinting = self.evaluate(input, dt);
        self.advance_tasks(input.cheat, dt);
        self.apply_motion(input, dt);
        self.notify_rig();
    }

    fn sample(&mut self, input: &PlayerInput) {
        let state = &mut self.state;
        state.horizontal = clamp_axis(input.horizontal);
        state.vertical = clamp_axis(input.vertical);
        state.is_moving =
            !approximately_zero(state.vertical) || !approximately_zero(state.horizontal);
        state.is_running = input.sprint_held;
        state.is_crouching = input.crouch_held;
    }

    /// Returns whether sprint takes effect this tick.
    fn evaluate(&mut self, input: &PlayerInput, dt: f32) -> bool {
        let speeds = self.config.speed;
        let state = &mut self.state;

        if state.is_crouching {
            state.run_shake.stop(&mut state.camera);
        }
        if state
            .crouch
            .evaluate(input.crouch_held, input.crouch_released, &mut state.camera, dt)
        {
            state.speed = speeds.crouch;
            return false;
        }

        state.stamina.evaluate(state.is_running, state.is_moving);
        let sprinting = state.is_moving && state.is_running && state.stamina.can_sprint();
        state.speed = if sprinting { speeds.run } else { speeds.walk };

        state.run_shake.set_active(sprinting, &mut state.camera);
        sprinting
    }

    fn advance_tasks(&mut self, cheat: bool, dt: f32) {
        let state = &mut self.state;

        if let Some(event) = state.stamina.advance(dt, cheat, self.display.as_deref_mut()) {
            if event == StaminaEvent::Exhausted {
                state.run_shake.stop(&mut state.camera);
                if let Some(audio) = self.audio.as_deref_mut() {
                    audio.play(AudioCue::OutOfBreath);
                }
            }
        }
        if state.crouch.advance(&mut state.camera, dt) {
            debug!("stood up");
        }
        state.run_shake.advance(&mut state.camera, dt);
    }

    fn apply_motion(&mut self, input: &PlayerInput, dt: f32) {
        let state = &mut self.state;
        let yaw = self.body.yaw();
        if let Some(delta) = self.movement.translation(
            state.is_moving,
            state.horizontal,
            state.vertical,
            state.speed,
            yaw,
            dt,
        ) {
            self.body.translate(delta);
        }
        state.spine_pitch = self.movement.apply_look(
            input.look_yaw_delta,
            input.look_pitch,
            self.body.as_mut(),
            &mut state.camera,
        );
    }

    fn notify_rig(&mut self) {
        let state = &self.state;
        if let Some(animator) = self.animator.as_deref_mut() {
            animator.set_locomotion(state.horizontal, state.vertical, self.sprinting);
            animator.set_crouching(state.is_crouching);
        }

        let gait = match (state.is_moving, self.sprinting) {
            (false, _) => Gait::Still,
            (true, false) => Gait::Walking,
            (true, true) => Gait::Sprinting,
        };
        if gait != self.gait {
            debug!(from = ?self.gait, to = ?gait, "gait changed");
            self.gait = gait;
            if let Some(audio) = self.audio.as_deref_mut() {
                audio.play(gait.cue());
            }
        }
    }

    pub fn state(&self) -> &PlayerLocomotionState {
        &self.state
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn body(&self) -> &dyn BodyPlacement {
        self.body.as_ref()
    }

    pub fn camera(&self) -> &CameraRig {
        &self.state.camera
    }

    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    pub fn stamina(&self) -> f32 {
        self.state.stamina.stamina()
    }

    pub fn stamina_state(&self) -> StaminaState {
        self.state.stamina.state()
    }

    pub fn posture(&self) -> Posture {
        self.state.crouch.posture()
    }

    /// Whether run speed was selected on the last tick.
    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    pub fn spine_pitch(&self) -> f32 {
        self.state.spine_pitch
    }

    /// Ticks processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Overwrites stamina (clamped) and refreshes the display.
    pub fn set_stamina(&mut self, value: f32) {
        self.state.stamina.set_stamina(value);
        if let Some(display) = self.display.as_deref_mut() {
            display.update_stamina(self.state.stamina.stamina());
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.state
            .camera
            .view_matrix(self.body.position(), self.body.yaw())
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        self.state
            .camera
            .uniform(self.body.position(), self.body.yaw())
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, StaminaConfig};
    use crate::game::collaborators::KinematicBody;
    use crate::game::stamina::StaminaTask;
    use crate::math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBody(Rc<RefCell<KinematicBody>>);

    impl BodyPlacement for SharedBody {
        fn position(&self) -> Vec3 {
            self.0.borrow().position()
        }
        fn yaw(&self) -> f32 {
            self.0.borrow().yaw()
        }
        fn translate(&mut self, delta: Vec3) {
            self.0.borrow_mut().translate(delta);
        }
        fn rotate_yaw(&mut self, degrees: f32) {
            self.0.borrow_mut().rotate_yaw(degrees);
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        stamina: Rc<RefCell<Vec<f32>>>,
        cues: Rc<RefCell<Vec<AudioCue>>>,
        crouching: Rc<RefCell<Vec<bool>>>,
    }

    impl StaminaDisplay for Recorder {
        fn update_stamina(&mut self, value: f32) {
            self.stamina.borrow_mut().push(value);
        }
    }

    impl LocomotionAudio for Recorder {
        fn play(&mut self, cue: AudioCue) {
            self.cues.borrow_mut().push(cue);
        }
    }

    impl LocomotionAnimator for Recorder {
        fn set_locomotion(&mut self, _horizontal: f32, _vertical: f32, _running: bool) {}
        fn set_crouching(&mut self, crouching: bool) {
            self.crouching.borrow_mut().push(crouching);
        }
    }

    const DT: f32 = 0.1;

    fn controller_with(initial: f32) -> (LocomotionController, Recorder, SharedBody) {
        let recorder = Recorder::default();
        let body = SharedBody::default();
        let config = LocomotionConfig {
            stamina: StaminaConfig {
                initial,
                ..StaminaConfig::default()
            },
            ..LocomotionConfig::default()
        };
        let controller = LocomotionController::builder()
            .config(config)
            .body(body.clone())
            .display(recorder.clone())
            .audio(recorder.clone())
            .animator(recorder.clone())
            .build()
            .expect("controller builds");
        (controller, recorder, body)
    }

    fn sprint_forward() -> PlayerInput {
        PlayerInput::moving(0.0, 1.0).sprinting()
    }

    #[test]
    fn test_missing_body_fails_fast() {
        let result = LocomotionController::builder().build();
        assert!(matches!(
            result,
            Err(LocomotionError::MissingCollaborator("body"))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = LocomotionConfig::default();
        config.stamina.max = 0.0;
        let result = LocomotionController::builder()
            .config(config)
            .body(KinematicBody::default())
            .build();
        assert!(matches!(
            result,
            Err(LocomotionError::Config(ConfigError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_one_second_sprint_costs_twenty_stamina() {
        let (mut controller, _, _) = controller_with(100.0);
        for _ in 0..11 {
            controller.tick(&sprint_forward(), DT);
        }
        assert!((controller.stamina() - 80.0).abs() < 1e-3);
        assert_eq!(controller.stamina_state(), StaminaState::Decreasing);
        assert_eq!(controller.speed(), controller.config().speed.run);
        assert!(controller.is_sprinting());
    }

    #[test]
    fn test_exhaustion_forces_walk_speed() {
        let (mut controller, recorder, _) = controller_with(5.0);
        let dt = 0.05;
        controller.tick(&sprint_forward(), dt);
        let mut elapsed = 0.0;
        while controller.stamina() > 0.0 {
            controller.tick(&sprint_forward(), dt);
            elapsed += dt;
            assert!(elapsed < 0.3 + 1e-4, "stamina should be gone after 0.25s");
        }
        assert!((elapsed - 0.25).abs() < 1e-3, "ran out after {elapsed}");
        assert!(!controller.state().stamina.task().is_active());
        // The shake stops on the tick stamina runs out, not the one after.
        assert!(!controller.state().run_shake.is_active());
        assert!(controller.camera().is_at_origin());
        assert!(recorder.cues.borrow().contains(&AudioCue::OutOfBreath));

        for _ in 0..5 {
            controller.tick(&sprint_forward(), dt);
            assert_eq!(controller.speed(), controller.config().speed.walk);
            assert!(!controller.state().run_shake.is_active());
            assert_eq!(controller.stamina_state(), StaminaState::Exhausted);
        }
        assert_eq!(controller.stamina(), 0.0);
    }

    #[test]
    fn test_sprint_with_empty_stamina_walks() {
        let (mut controller, _, _) = controller_with(100.0);
        controller.set_stamina(0.0);
        controller.tick(&sprint_forward(), DT);
        assert_eq!(controller.speed(), controller.config().speed.walk);
        assert!(!controller.is_sprinting());
    }

    #[test]
    fn test_crouch_overrides_sprint() {
        let (mut controller, recorder, _) = controller_with(50.0);
        for _ in 0..3 {
            controller.tick(&sprint_forward(), DT);
        }
        let drained = controller.stamina();
        assert!((drained - 46.0).abs() < 1e-3);

        let input = sprint_forward().crouching();
        for _ in 0..5 {
            controller.tick(&input, DT);
            assert_eq!(controller.speed(), controller.config().speed.crouch);
            assert!(!controller.state().run_shake.is_active());
        }
        assert_eq!(controller.posture(), Posture::Crouching);
        // The drain started before crouching is left running.
        assert_eq!(controller.stamina_state(), StaminaState::Decreasing);
        assert!((controller.stamina() - 36.0).abs() < 1e-3);
        assert_eq!(controller.state().stamina.task().started(), 1);
        assert_eq!(recorder.crouching.borrow().last(), Some(&true));
    }

    #[test]
    fn test_crouch_does_not_start_recovery() {
        let (mut controller, _, _) = controller_with(50.0);
        for _ in 0..5 {
            controller.tick(&PlayerInput::moving(0.0, 1.0).crouching(), DT);
        }
        assert_eq!(controller.stamina(), 50.0);
        assert_eq!(controller.stamina_state(), StaminaState::Idle);

        let release = PlayerInput {
            crouch_released: true,
            ..PlayerInput::default()
        };
        controller.tick(&release, DT);
        controller.tick(&PlayerInput::default(), DT);
        assert_eq!(controller.stamina_state(), StaminaState::Recovering);
        assert!(controller.stamina() > 50.0);
    }

    #[test]
    fn test_stopping_sprint_resets_camera_same_tick() {
        let (mut controller, _, _) = controller_with(100.0);
        for _ in 0..10 {
            controller.tick(&sprint_forward(), DT);
        }
        assert!(controller.state().run_shake.is_active());
        assert!(!controller.camera().is_at_origin());

        controller.tick(&PlayerInput::moving(0.0, 1.0), DT);
        assert!(!controller.state().run_shake.is_active());
        assert!(controller.camera().is_at_origin());
    }

    #[test]
    fn test_stopping_movement_resets_camera_same_tick() {
        let (mut controller, _, _) = controller_with(100.0);
        for _ in 0..10 {
            controller.tick(&sprint_forward(), DT);
        }
        controller.tick(&PlayerInput::default().sprinting(), DT);
        assert!(!controller.state().run_shake.is_active());
        assert!(controller.camera().is_at_origin());
    }

    #[test]
    fn test_crouch_release_stands_up_exactly_once() {
        let (mut controller, _, _) = controller_with(100.0);
        let crouch = PlayerInput::default().crouching();
        for _ in 0..20 {
            controller.tick(&crouch, DT);
        }
        let low = controller.camera().local_position().y();
        assert!(low < controller.camera().origin_local().y());

        let release = PlayerInput {
            crouch_released: true,
            ..PlayerInput::default()
        };
        controller.tick(&release, DT);
        assert_eq!(controller.posture(), Posture::StandingUp);

        let mut ticks = 0;
        while controller.posture() != Posture::Standing {
            controller.tick(&PlayerInput::default(), 1.0 / 60.0);
            ticks += 1;
            assert!(ticks < 600);
        }
        let camera = controller.camera();
        assert_eq!(camera.local_position().y(), camera.origin_local().y());
        assert!(camera.is_at_origin());
        assert_eq!(controller.state().crouch.stand_up().started(), 1);
    }

    #[test]
    fn test_shake_runs_while_standing_up() {
        let (mut controller, _, _) = controller_with(100.0);
        for _ in 0..10 {
            controller.tick(&PlayerInput::default().crouching(), DT);
        }
        let release = PlayerInput {
            crouch_released: true,
            ..sprint_forward()
        };
        controller.tick(&release, DT);
        assert_eq!(controller.posture(), Posture::StandingUp);
        assert!(controller.state().run_shake.is_active());
        assert_eq!(controller.speed(), controller.config().speed.run);

        let mut ticks = 0;
        while controller.posture() != Posture::Standing {
            controller.tick(&sprint_forward(), DT);
            assert!(controller.state().run_shake.is_active());
            ticks += 1;
            assert!(ticks < 10, "stand-up never finished under the shake");
        }
        assert_eq!(controller.state().crouch.stand_up().started(), 1);
        assert!(controller.state().run_shake.is_active());

        controller.tick(&PlayerInput::moving(0.0, 1.0), DT);
        assert!(controller.camera().is_at_origin());
    }

    #[test]
    fn test_walking_moves_body_forward() {
        let (mut controller, _, body) = controller_with(100.0);
        for _ in 0..10 {
            controller.tick(&PlayerInput::moving(0.0, 1.0), DT);
        }
        let position = body.position();
        assert!(position.distance(&Vec3::new(0.0, 0.0, 2.0)) < 1e-4, "{position:?}");
    }

    #[test]
    fn test_look_turns_body_and_moves_along_new_heading() {
        let (mut controller, _, body) = controller_with(100.0);
        let turn = PlayerInput {
            look_yaw_delta: 90.0,
            ..PlayerInput::default()
        };
        controller.tick(&turn, DT);
        controller.tick(&PlayerInput::moving(0.0, 1.0), 1.0);
        let position = body.position();
        assert!(position.distance(&Vec3::new(2.0, 0.0, 0.0)) < 1e-4, "{position:?}");
        assert!((controller.body().yaw() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_gait_cues() {
        let (mut controller, recorder, _) = controller_with(100.0);
        controller.tick(&PlayerInput::moving(1.0, 0.0), DT);
        controller.tick(&PlayerInput::moving(1.0, 0.0), DT);
        controller.tick(&PlayerInput::moving(1.0, 0.0).sprinting(), DT);
        controller.tick(&PlayerInput::default(), DT);
        assert_eq!(
            *recorder.cues.borrow(),
            vec![
                AudioCue::StartWalking,
                AudioCue::StartSprinting,
                AudioCue::StopMoving
            ]
        );
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let (mut controller, _, body) = controller_with(50.0);
        controller.tick(&sprint_forward(), DT);
        let stamina = controller.stamina();
        let position = body.position();
        controller.tick(&sprint_forward(), f32::NAN);
        controller.tick(&sprint_forward(), -1.0);
        assert_eq!(controller.stamina(), stamina);
        assert_eq!(body.position(), position);
        assert_eq!(controller.ticks(), 3);
    }

    #[test]
    fn test_camera_uniform_tracks_body() {
        let (mut controller, _, _) = controller_with(100.0);
        controller.tick(&PlayerInput::moving(0.0, 1.0), 1.0);
        let uniform = controller.camera_uniform();
        assert!((uniform.position[2] - 2.0).abs() < 1e-4);
        assert!((uniform.position[1] - 1.6).abs() < 1e-4);
    }

    #[test]
    fn test_random_inputs_keep_invariants() {
        let (mut controller, recorder, _) = controller_with(60.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut input = PlayerInput::default();
        let mut crouch_was_held = false;

        for _ in 0..5_000 {
            if rng.gen_bool(0.1) {
                input.horizontal = rng.gen_range(-1..=1) as f32;
                input.vertical = rng.gen_range(-1..=1) as f32;
                input.sprint_held = rng.gen_bool(0.6);
                input.crouch_held = rng.gen_bool(0.2);
                input.cheat = rng.gen_bool(0.02);
            }
            input.crouch_released = crouch_was_held && !input.crouch_held;
            crouch_was_held = input.crouch_held;

            let dt = rng.gen_range(0.005..0.05);
            controller.tick(&input, dt);

            let state = controller.state();
            let stamina = state.stamina.stamina();
            assert!((0.0..=state.stamina.max()).contains(&stamina));
            assert!(matches!(
                state.stamina.task().get(),
                None | Some(StaminaTask::Decreasing) | Some(StaminaTask::Recovering)
            ));
            let sprint_allowed =
                state.is_moving && state.is_running && !state.is_crouching && stamina > 0.0;
            assert_eq!(state.run_shake.is_active(), sprint_allowed);
            if state.crouch.posture() == Posture::Standing && !state.run_shake.is_active() {
                assert!(state.camera.is_at_origin());
            }
            if controller.is_sprinting() {
                assert_eq!(state.speed, controller.config().speed.run);
            }
        }

        assert!(
            recorder
                .stamina
                .borrow()
                .iter()
                .all(|v| (0.0..=100.0).contains(v))
        );
    }
}
