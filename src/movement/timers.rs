//! Movement domain: the four grace/cooldown timers that gate actions.

use crate::movement::MovementConfig;

/// Countdown timers, advanced once per frame.
///
/// All values floor at zero. A window is open while its value is positive;
/// the ground-dash cooldown is ready once it reaches zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimerBank {
    pub jump_buffer: f32,
    pub coyote: f32,
    pub wall_jump_post_buffer: f32,
    pub ground_dash_cooldown: f32,
}

fn countdown(value: f32, dt: f32) -> f32 {
    (value - dt).max(0.0)
}

impl TimerBank {
    /// Advance every timer by one frame.
    ///
    /// `holding_wall` is true while airborne and touching a wall or sliding;
    /// the post wall-jump buffer only drains once that stops.
    pub fn tick(&mut self, dt: f32, grounded: bool, holding_wall: bool, config: &MovementConfig) {
        self.jump_buffer = countdown(self.jump_buffer, dt);

        if grounded {
            self.coyote = config.jump_coyote_time;
        } else {
            self.coyote = countdown(self.coyote, dt);
        }

        if !holding_wall {
            self.wall_jump_post_buffer = countdown(self.wall_jump_post_buffer, dt);
        }

        if grounded {
            self.ground_dash_cooldown = countdown(self.ground_dash_cooldown, dt);
        }
    }

    pub fn buffer_jump(&mut self, config: &MovementConfig) {
        self.jump_buffer = config.jump_buffer_time;
    }

    pub fn consume_jump_buffer(&mut self) {
        self.jump_buffer = 0.0;
    }

    pub fn jump_buffered(&self) -> bool {
        self.jump_buffer > 0.0
    }

    pub fn consume_coyote(&mut self) {
        self.coyote = 0.0;
    }

    pub fn coyote_open(&self) -> bool {
        self.coyote > 0.0
    }

    pub fn hold_wall_jump_window(&mut self, config: &MovementConfig) {
        self.wall_jump_post_buffer = config.wall_jump_post_buffer_time;
    }

    pub fn wall_jump_window_open(&self) -> bool {
        self.wall_jump_post_buffer > 0.0
    }

    pub fn start_ground_dash_cooldown(&mut self, config: &MovementConfig) {
        self.ground_dash_cooldown = config.time_btw_dashes_on_ground;
    }

    pub fn clear_ground_dash_cooldown(&mut self) {
        self.ground_dash_cooldown = 0.0;
    }

    pub fn ground_dash_ready(&self) -> bool {
        self.ground_dash_cooldown <= 0.0
    }
}
