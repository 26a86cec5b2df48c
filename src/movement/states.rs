//! Movement domain: per-state enter, exit, frame and physics behaviour.
//!
//! States carry no data of their own; each one is a strategy over the
//! controller's runtime state. Transition checks run in priority order and
//! an `else` chain stops at the first match, but a dash request is always
//! checked last and wins over anything earlier in the same frame.

use bevy::prelude::*;

use crate::movement::controller::{PlayerController, Tick};
use crate::movement::events::{AnimationCue, ParticleKind};
use crate::movement::runtime::VerticalMode;
use crate::movement::state_machine::{JumpKind, PlayerState};

impl PlayerController {
    /// Run entry behaviour. Returns the state to hand off to, for states
    /// that only exist for the instant of their entry.
    pub(crate) fn enter_state(&mut self, state: PlayerState, tick: &Tick) -> Option<PlayerState> {
        match state {
            PlayerState::Idle => {
                self.cue(AnimationCue::Walking(false));
                self.cue(AnimationCue::Running(false));
                None
            }
            PlayerState::Walk => {
                self.cue(AnimationCue::Walking(true));
                None
            }
            PlayerState::Run => {
                self.cue(AnimationCue::Walking(true));
                self.cue(AnimationCue::Running(true));
                None
            }
            PlayerState::Jump(kind) => {
                self.initiate_jump(kind, tick.config);
                Some(PlayerState::InAir)
            }
            PlayerState::InAir => None,
            PlayerState::WallSlide => {
                self.enter_wall_slide(tick);
                None
            }
            PlayerState::WallJump => {
                self.initiate_wall_jump(tick.config);
                Some(PlayerState::InAir)
            }
            PlayerState::Dash => {
                self.initiate_dash(tick);
                None
            }
        }
    }

    pub(crate) fn exit_state(&mut self, state: PlayerState, _tick: &Tick) {
        if state == PlayerState::Run && self.runtime.speed_effect_active {
            self.runtime.speed_effect_active = false;
            self.cue(AnimationCue::SpeedEffect(false));
        }
    }

    pub(crate) fn update_state(&mut self, state: PlayerState, tick: &Tick) {
        match state {
            PlayerState::Idle | PlayerState::Walk | PlayerState::Run => {
                self.update_grounded(state, tick)
            }
            // Hand off to InAir on entry, so never current here
            PlayerState::Jump(_) | PlayerState::WallJump => {}
            PlayerState::InAir => self.update_in_air(tick),
            PlayerState::WallSlide => self.update_wall_slide(tick),
            PlayerState::Dash => self.update_dash(tick),
        }
    }

    pub(crate) fn fixed_update_state(&mut self, state: PlayerState, tick: &Tick) {
        let config = tick.config;
        let movement = tick.input.movement;

        match state {
            PlayerState::Idle | PlayerState::Walk | PlayerState::Run => {
                self.move_horizontal(
                    config.ground_acceleration,
                    config.ground_deceleration,
                    movement,
                    tick,
                );
            }
            PlayerState::InAir => {
                self.jump_physics(config, tick.dt);
                self.wall_jump_physics(config, tick.dt);
                self.dash_physics(config, tick.dt);

                if self.runtime.uses_wall_jump_move_stats() {
                    self.move_horizontal(
                        config.wall_jump_move_acceleration,
                        config.wall_jump_move_deceleration,
                        movement,
                        tick,
                    );
                } else {
                    self.move_horizontal(config.air_acceleration, config.air_deceleration, movement, tick);
                }
            }
            PlayerState::WallSlide => {
                self.wall_slide_physics(config, tick.dt);
                self.wall_slide_move(tick);
            }
            PlayerState::Dash => self.dash_physics(config, tick.dt),
            PlayerState::Jump(_) | PlayerState::WallJump => {}
        }
    }

    // ------------------------------------------------------------------
    // Idle / Walk / Run
    // ------------------------------------------------------------------

    fn update_grounded(&mut self, state: PlayerState, tick: &Tick) {
        let input = tick.input;
        let threshold = tick.config.move_threshold;
        let moving = input.movement.x.abs() > threshold;
        let stopped = input.movement.x.abs() < threshold;

        let next = match state {
            PlayerState::Idle if moving && input.run_held => Some(PlayerState::Run),
            PlayerState::Idle if moving => Some(PlayerState::Walk),
            PlayerState::Walk if moving && input.run_held => Some(PlayerState::Run),
            PlayerState::Walk | PlayerState::Run if stopped => Some(PlayerState::Idle),
            PlayerState::Run if moving && !input.run_held => {
                self.cue(AnimationCue::Running(false));
                Some(PlayerState::Walk)
            }
            _ => None,
        };

        match next {
            Some(next) => self.change_state(next, tick),
            None if self.can_jump() => self.change_state(PlayerState::Jump(JumpKind::Primary), tick),
            None => {}
        }

        self.check_dash(tick);

        if self.machine.current() == PlayerState::Run {
            self.update_speed_effect(tick);
        }
    }

    fn update_speed_effect(&mut self, tick: &Tick) {
        let config = tick.config;
        let fast = self.runtime.horizontal_velocity.abs()
            >= config.max_run_speed - config.speed_effect_margin;

        if fast != self.runtime.speed_effect_active {
            self.runtime.speed_effect_active = fast;
            self.cue(AnimationCue::SpeedEffect(fast));
        }
    }

    // ------------------------------------------------------------------
    // InAir
    // ------------------------------------------------------------------

    fn update_in_air(&mut self, tick: &Tick) {
        let config = tick.config;

        if tick.input.jump_pressed {
            if self.can_jump() {
                self.change_state(PlayerState::Jump(JumpKind::Primary), tick);
            } else if let Some(kind) = self.can_air_jump(config) {
                self.change_state(PlayerState::Jump(kind), tick);
            } else if self.can_wall_jump(config) {
                self.change_state(PlayerState::WallJump, tick);
            }
        } else if self.can_jump() {
            self.change_state(PlayerState::Jump(JumpKind::Primary), tick);
        }

        if self.try_land(config) {
            self.spawn(ParticleKind::Land, 0.0);
            self.change_state(PlayerState::Idle, tick);
        }

        if self.should_wall_slide() {
            self.change_state(PlayerState::WallSlide, tick);
        }

        self.check_dash(tick);
    }

    // ------------------------------------------------------------------
    // WallSlide
    // ------------------------------------------------------------------

    fn enter_wall_slide(&mut self, tick: &Tick) {
        let config = tick.config;

        if self.runtime.air_dash_falling {
            self.cue(AnimationCue::AirDashFalling(false));
        }

        let runtime = &mut self.runtime;
        runtime.mode = VerticalMode::WallSliding;
        runtime.air_dash_falling = false;
        runtime.timers.clear_ground_dash_cooldown();
        if config.reset_dash_on_wall_slide {
            runtime.dashes_used = 0;
        }
        if config.reset_jumps_on_wall_slide {
            runtime.jumps_used = 0;
        }

        self.cue(AnimationCue::WallSliding(true));
    }

    fn update_wall_slide(&mut self, tick: &Tick) {
        let config = tick.config;

        if self.should_stop_wall_sliding() {
            self.stop_wall_sliding(config);
            self.cue(AnimationCue::Fall);
            self.change_state(PlayerState::InAir, tick);
        } else if self.try_land(config) {
            self.change_state(PlayerState::Idle, tick);
        } else if tick.input.jump_pressed && self.can_wall_jump(config) {
            self.change_state(PlayerState::WallJump, tick);
        }

        self.check_dash(tick);
    }

    /// Air control while sliding. Input pushing further into the wall is
    /// dropped so the body cannot snag on the surface it is sliding down.
    fn wall_slide_move(&mut self, tick: &Tick) {
        let Some(hit) = self.runtime.contacts.wall_hit else {
            return;
        };

        let input = tick.input.movement;
        let center_x = self.runtime.body.center.x;
        let pressing_into_wall =
            (input.x > 0.0 && hit.point.x > center_x) || (input.x < 0.0 && hit.point.x < center_x);
        let effective = if pressing_into_wall { Vec2::ZERO } else { input };

        let config = tick.config;
        self.move_horizontal(config.air_acceleration, config.air_deceleration, effective, tick);
    }

    // ------------------------------------------------------------------
    // Dash
    // ------------------------------------------------------------------

    fn update_dash(&mut self, tick: &Tick) {
        let entered = self.machine.transitions();

        if self.should_wall_slide() {
            self.change_state(PlayerState::WallSlide, tick);
        }

        let still_dash_state = self.machine.transitions() == entered;
        let dashing = self.runtime.is_dashing();
        let grounded = self.runtime.is_grounded();

        if !dashing && !grounded && still_dash_state {
            self.change_state(PlayerState::InAir, tick);
        } else if !dashing && grounded && still_dash_state {
            self.change_state(PlayerState::Idle, tick);
        } else if tick.input.jump_pressed && self.can_jump() {
            self.change_state(PlayerState::Jump(JumpKind::Primary), tick);
        }
    }

    fn check_dash(&mut self, tick: &Tick) {
        if self.dash_requested(tick) {
            self.change_state(PlayerState::Dash, tick);
        }
    }
}
