//! Windowed sandbox for the locomotion controller.
//!
//! - [`app_state`]: [`AppState`], the controller plus input and frame timing
//! - [`event_handler`]: [`App`], the winit event handler
//! - [`update`]: the per-frame tick and status reporting
//!
//! Nothing is rendered. Stamina, posture and position are shown in the window
//! title and logged once a second, which is enough to feel the tuning out.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::App;
