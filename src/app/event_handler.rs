//! Event handler for the sandbox window.

use mirador_locomotion::game::GameKey;
use mirador_locomotion::game::keys::winit_key_to_game_key;
use mirador_locomotion::{LocomotionConfig, LocomotionError};
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::app::AppState;

/// Owns the window and the sandbox state, which are both created on `resumed`.
pub struct App {
    config: LocomotionConfig,
    pub state: Option<AppState>,
    pub window: Option<Window>,
    error: Option<LocomotionError>,
}

impl App {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            state: None,
            window: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<LocomotionError> {
        self.error.take()
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: GameKey, pressed: bool) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if !pressed {
            state.key_state.release_key(key);
            return;
        }

        state.key_state.press_key(key);
        match key {
            GameKey::Quit => {
                info!("quit requested");
                event_loop.exit();
            }
            GameKey::ToggleCheat => {
                let enabled = state.key_state.toggle_cheat();
                info!(enabled, "infinite stamina toggled");
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("mirador locomotion")
            .with_inner_size(PhysicalSize::new(1360, 768));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(err) => {
                error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        match AppState::new(self.config.clone()) {
            Ok(state) => {
                state.triage_mouse(&window);
                self.state = Some(state);
                self.window = Some(window);
            }
            Err(err) => {
                error!("failed to start locomotion: {err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(state) = self.state.as_mut() {
                if state.capture_mouse {
                    state.key_state.mouse_movement(delta.0, delta.1);
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("the close button was pressed; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: key,
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(game_key) = winit_key_to_game_key(&key) {
                    self.handle_key(event_loop, game_key, key_state == ElementState::Pressed);
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let (Some(state), Some(window)) = (self.state.as_mut(), self.window.as_ref()) {
                    if !state.capture_mouse {
                        state.capture_mouse = true;
                        state.triage_mouse(window);
                    }
                }
            }

            WindowEvent::Focused(false) => {
                if let (Some(state), Some(window)) = (self.state.as_mut(), self.window.as_ref()) {
                    // Keys released while unfocused never arrive.
                    state.key_state.pressed_keys.clear();
                    state.capture_mouse = false;
                    state.triage_mouse(window);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.handle_frame();
    }
}
