//! Per-frame update for the sandbox.

use std::time::Instant;

use tracing::info;

use crate::app::App;

impl App {
    /// Ticks the controller with the measured frame time.
    ///
    /// Once a second the window title is refreshed and a status line is logged.
    pub fn handle_frame(&mut self) {
        let (Some(state), Some(window)) = (self.state.as_mut(), self.window.as_ref()) else {
            return;
        };

        let now = Instant::now();
        let delta_time = now.duration_since(state.last_frame_time).as_secs_f32();
        state.last_frame_time = now;
        state.frame_count += 1;

        let input = state.key_state.sample();
        state.controller.tick(&input, delta_time);

        if now.duration_since(state.last_status_time).as_secs_f32() < 1.0 {
            return;
        }

        let controller = &state.controller;
        let position = controller.body().position();
        window.set_title(&format!(
            "mirador locomotion | stamina {:.0} | {:?} | speed {:.1}",
            state.stamina.get(),
            controller.posture(),
            controller.speed(),
        ));
        info!(
            fps = state.frame_count,
            uptime = now.duration_since(state.start_time).as_secs(),
            stamina = controller.stamina(),
            stamina_state = ?controller.stamina_state(),
            posture = ?controller.posture(),
            sprinting = controller.is_sprinting(),
            x = position.x(),
            z = position.z(),
            yaw = controller.body().yaw(),
            "status"
        );

        state.frame_count = 0;
        state.last_status_time = now;
    }
}
