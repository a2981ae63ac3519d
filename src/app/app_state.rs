//! Application state for the sandbox window.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use mirador_locomotion::game::audio::{AudioAssets, KiraLocomotionAudio};
use mirador_locomotion::game::{KeyState, KinematicBody, LocomotionAudio, StaminaDisplay};
use mirador_locomotion::{LocomotionConfig, LocomotionController, LocomotionError};
use tracing::{info, warn};
use winit::window::{CursorGrabMode, Window};

/// Stamina readout shared between the controller and the window title.
#[derive(Debug, Clone, Default)]
pub struct StaminaReadout(Rc<Cell<f32>>);

impl StaminaReadout {
    pub fn get(&self) -> f32 {
        self.0.get()
    }
}

impl StaminaDisplay for StaminaReadout {
    fn update_stamina(&mut self, value: f32) {
        self.0.set(value);
    }
}

pub struct AppState {
    pub controller: LocomotionController,
    pub key_state: KeyState,
    pub stamina: StaminaReadout,
    pub capture_mouse: bool,
    pub start_time: Instant,
    pub last_frame_time: Instant,
    pub last_status_time: Instant,
    pub frame_count: u32,
}

impl AppState {
    pub fn new(config: LocomotionConfig) -> Result<Self, LocomotionError> {
        let stamina = StaminaReadout::default();
        stamina.0.set(config.stamina.initial);

        let audio: Option<Box<dyn LocomotionAudio>> =
            match KiraLocomotionAudio::new(&AudioAssets::default()) {
                Ok(audio) => Some(Box::new(audio)),
                Err(err) => {
                    warn!("running without audio: {err}");
                    None
                }
            };

        let key_state = KeyState::new(&config.look);
        let controller = LocomotionController::builder()
            .config(config)
            .body(KinematicBody::default())
            .display(stamina.clone())
            .boxed_audio(audio)
            .build()?;

        let now = Instant::now();
        Ok(Self {
            controller,
            key_state,
            stamina,
            capture_mouse: true,
            start_time: now,
            last_frame_time: now,
            last_status_time: now,
            frame_count: 0,
        })
    }

    /// Locks and hides the cursor while mouse look is captured.
    pub fn triage_mouse(&self, window: &Window) {
        if self.capture_mouse {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                warn!("failed to grab cursor: {err}");
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!("failed to release cursor: {err}");
            }
            window.set_cursor_visible(true);
        }
        info!(captured = self.capture_mouse, "mouse capture changed");
    }
}
