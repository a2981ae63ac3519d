//! Headless soak: random key presses at a fixed 60 Hz step.
//!
//! Inputs go through [`KeyState`] exactly like the window does, so crouch
//! release edges and look clamping are exercised too. After every tick the
//! controller is checked against the invariants it must never break, and each
//! violation is logged as an error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mirador_locomotion::game::crouch::Posture;
use mirador_locomotion::game::{GameKey, KeyState, KinematicBody, StaminaState};
use mirador_locomotion::{LocomotionConfig, LocomotionController, LocomotionError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info, warn};

const STEP: f32 = 1.0 / 60.0;

const HELD_KEYS: [GameKey; 6] = [
    GameKey::MoveForward,
    GameKey::MoveBackward,
    GameKey::MoveLeft,
    GameKey::MoveRight,
    GameKey::Sprint,
    GameKey::Crouch,
];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SoakReport {
    pub ticks: u64,
    pub violations: u64,
    pub exhaustions: u64,
    pub stand_ups: u64,
    pub min_stamina: f32,
}

/// Runs `ticks` random-input ticks, stopping early once `stop` is set.
pub fn simulate(
    controller: &mut LocomotionController,
    rng: &mut StdRng,
    ticks: u64,
    stop: &AtomicBool,
) -> SoakReport {
    let mut keys = KeyState::new(&controller.config().look);
    let mut report = SoakReport {
        min_stamina: controller.stamina(),
        ..SoakReport::default()
    };
    let mut was_exhausted = false;

    while report.ticks < ticks && !stop.load(Ordering::Relaxed) {
        for key in HELD_KEYS {
            if rng.gen_bool(0.03) {
                if keys.is_pressed(key) {
                    keys.release_key(key);
                } else {
                    keys.press_key(key);
                }
            }
        }
        if rng.gen_bool(0.001) {
            keys.toggle_cheat();
        }
        keys.mouse_movement(rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0));

        let input = keys.sample();
        controller.tick(&input, STEP);
        report.ticks += 1;

        let exhausted = controller.stamina_state() == StaminaState::Exhausted;
        if exhausted && !was_exhausted {
            report.exhaustions += 1;
        }
        was_exhausted = exhausted;
        report.stand_ups = controller.state().crouch.stand_up().started();
        report.min_stamina = report.min_stamina.min(controller.stamina());

        for violation in check(controller) {
            error!(tick = report.ticks, "{violation}");
            report.violations += 1;
        }
    }
    report
}

fn check(controller: &LocomotionController) -> Vec<String> {
    let state = controller.state();
    let mut violations = Vec::new();

    let stamina = state.stamina.stamina();
    if !(0.0..=state.stamina.max()).contains(&stamina) {
        violations.push(format!("stamina {stamina} outside 0..={}", state.stamina.max()));
    }
    let sprint_allowed = state.is_moving && state.is_running && !state.is_crouching && stamina > 0.0;
    if state.run_shake.is_active() != sprint_allowed {
        violations.push(format!(
            "run shake active = {} but sprint allowed = {sprint_allowed}",
            state.run_shake.is_active()
        ));
    }
    if state.crouch.posture() == Posture::Standing
        && !state.run_shake.is_active()
        && !state.camera.is_at_origin()
    {
        violations.push(format!(
            "camera left at {:?} while standing without run shake",
            state.camera.local_position()
        ));
    }
    if state.crouch.stand_up().is_active() && state.crouch.posture() != Posture::StandingUp {
        violations.push(format!("stand-up running while {:?}", state.crouch.posture()));
    }
    violations
}

/// Builds a controller on a bare kinematic body and soaks it for `seconds`.
pub fn run(config: LocomotionConfig, seconds: f32, seed: u64) -> Result<SoakReport, LocomotionError> {
    let mut controller = LocomotionController::builder()
        .config(config)
        .body(KinematicBody::default())
        .build()?;

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    if let Err(err) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
        warn!("ctrl-c will not stop the soak early: {err}");
    }

    let ticks = (seconds / STEP).ceil() as u64;
    info!(seconds, ticks, seed, "starting headless soak");

    let mut rng = StdRng::seed_from_u64(seed);
    let report = simulate(&mut controller, &mut rng, ticks, &stop);

    let position = controller.body().position();
    info!(
        ticks = report.ticks,
        violations = report.violations,
        exhaustions = report.exhaustions,
        stand_ups = report.stand_ups,
        min_stamina = report.min_stamina,
        x = position.x(),
        z = position.z(),
        "soak finished"
    );
    Ok(report)
}
