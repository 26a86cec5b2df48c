//! Movement domain: eligibility checks, action initiation and per-step physics
//! shared by the controller states.

use bevy::prelude::*;

use crate::movement::controller::{PlayerController, Tick};
use crate::movement::dash::{
    DashMotion, DashStep, dash_particle_rotation, resolve_dash_direction, step_dash_fast_fall,
};
use crate::movement::events::{AnimationCue, ParticleKind};
use crate::movement::kinematics::{
    ArcParams, FastFall, JumpArc, WallJumpArc, lerp_clamped, step_horizontal,
};
use crate::movement::runtime::VerticalMode;
use crate::movement::state_machine::{JumpKind, PlayerState};
use crate::movement::MovementConfig;

impl PlayerController {
    // ------------------------------------------------------------------
    // Frame bookkeeping
    // ------------------------------------------------------------------

    pub(crate) fn update_timers(&mut self, tick: &Tick) {
        let runtime = &mut self.runtime;
        let grounded = runtime.is_grounded();
        let holding_wall = holding_wall(grounded, runtime.is_touching_wall(), runtime.is_wall_sliding());
        runtime.timers.tick(tick.dt, grounded, holding_wall, tick.config);
    }

    /// Buffer jump presses and turn releases into fast falls.
    pub(crate) fn jump_input_checks(&mut self, tick: &Tick) {
        let runtime = &mut self.runtime;

        if tick.input.jump_pressed {
            let reserved_for_wall_jump = runtime.is_wall_slide_falling()
                && runtime.timers.wall_jump_window_open();
            let on_wall = runtime.is_wall_sliding()
                || (runtime.is_touching_wall() && !runtime.is_grounded());

            if reserved_for_wall_jump || on_wall {
                return;
            }

            runtime.timers.buffer_jump(tick.config);
            runtime.jump_released_during_buffer = false;
        }

        if tick.input.jump_released {
            if runtime.timers.jump_buffered() {
                runtime.jump_released_during_buffer = true;
            }

            let velocity = runtime.vertical_velocity;
            if let VerticalMode::Jumping(arc) = &mut runtime.mode
                && velocity > 0.0
            {
                runtime.vertical_velocity = arc.release(velocity, tick.config.time_for_upwards_cancel);
            }
        }
    }

    /// Hold the late wall-jump window open and cut wall jumps short on release.
    pub(crate) fn wall_jump_checks(&mut self, tick: &Tick) {
        let runtime = &mut self.runtime;
        let grounded = runtime.is_grounded();
        let touching_wall = runtime.is_touching_wall();

        if holding_wall(grounded, touching_wall, runtime.is_wall_sliding()) {
            runtime.timers.hold_wall_jump_window(tick.config);
        }

        if tick.input.jump_released && !touching_wall {
            let velocity = runtime.vertical_velocity;
            if let VerticalMode::WallJumping(wall_jump) = &mut runtime.mode
                && velocity > 0.0
            {
                runtime.vertical_velocity = wall_jump
                    .arc
                    .release(velocity, tick.config.time_for_upwards_cancel);
            }
        }
    }

    /// Walked off a ledge (or decelerated off one) with nothing driving
    /// vertical motion: start falling and hand over to InAir.
    pub(crate) fn check_for_falling(&mut self, tick: &Tick) {
        let runtime = &self.runtime;
        if runtime.is_grounded() || runtime.mode != VerticalMode::Grounded || runtime.is_dashing() {
            return;
        }

        self.runtime.mode = VerticalMode::Falling {
            after_wall_slide: false,
        };
        self.cue(AnimationCue::Fall);
        self.change_state(PlayerState::InAir, tick);
    }

    // ------------------------------------------------------------------
    // Eligibility
    // ------------------------------------------------------------------

    /// Buffered jump while grounded or inside coyote time.
    pub fn can_jump(&self) -> bool {
        let runtime = &self.runtime;
        runtime.timers.jump_buffered()
            && !runtime.is_jumping()
            && (runtime.is_grounded() || runtime.timers.coyote_open())
    }

    /// Buffered jump from an airborne action, or after coyote time ran out.
    pub fn can_air_jump(&self, config: &MovementConfig) -> Option<JumpKind> {
        let runtime = &self.runtime;
        if !runtime.timers.jump_buffered() {
            return None;
        }

        let airborne_action = runtime.is_jumping()
            || runtime.is_wall_jumping()
            || runtime.is_wall_slide_falling()
            || runtime.is_air_dashing()
            || runtime.is_dash_fast_falling();
        let allowed = config.number_of_jumps_allowed;

        if airborne_action && !runtime.is_touching_wall() && runtime.jumps_used < allowed {
            return Some(JumpKind::Air);
        }

        let plain_fall = runtime.mode
            == VerticalMode::Falling {
                after_wall_slide: false,
            };
        if plain_fall && runtime.jumps_used + 1 < allowed {
            return Some(JumpKind::CoyoteExpired);
        }

        None
    }

    pub fn can_wall_jump(&self, config: &MovementConfig) -> bool {
        config.can_wall_jump && self.runtime.timers.wall_jump_window_open()
    }

    /// Ground dash: grounded, cooldown elapsed, not already dashing.
    pub fn can_dash(&self) -> bool {
        let runtime = &self.runtime;
        runtime.is_grounded() && runtime.timers.ground_dash_ready() && !runtime.is_dashing()
    }

    pub fn can_air_dash(&self, config: &MovementConfig) -> bool {
        let runtime = &self.runtime;
        !runtime.is_grounded() && !runtime.is_dashing() && runtime.dashes_used < config.number_of_dashes
    }

    pub(crate) fn dash_requested(&self, tick: &Tick) -> bool {
        tick.input.dash_pressed && (self.can_dash() || self.can_air_dash(tick.config))
    }

    pub fn should_wall_slide(&self) -> bool {
        let runtime = &self.runtime;
        runtime.is_touching_wall()
            && !runtime.is_grounded()
            && !runtime.is_dashing()
            && runtime.vertical_velocity < 0.0
            && !runtime.is_wall_sliding()
    }

    pub fn should_stop_wall_sliding(&self) -> bool {
        let runtime = &self.runtime;
        runtime.is_wall_sliding() && !runtime.is_touching_wall() && !runtime.is_grounded()
    }

    // ------------------------------------------------------------------
    // Landing
    // ------------------------------------------------------------------

    /// Landing check. On success every airborne action is cleared at once.
    ///
    /// A landing out of a dash fast fall whose air-dash-falling flag is still
    /// up is held back one frame; the flag is lowered so the next check lands.
    pub(crate) fn try_land(&mut self, config: &MovementConfig) -> bool {
        let runtime = &self.runtime;
        if !runtime.is_grounded() || runtime.vertical_velocity > 0.0 || !runtime.is_landable() {
            return false;
        }

        if runtime.is_dash_fast_falling() && runtime.air_dash_falling {
            self.runtime.air_dash_falling = false;
            self.cue(AnimationCue::AirDashFalling(false));
            return false;
        }

        if self.runtime.is_wall_sliding() {
            self.cue(AnimationCue::WallSliding(false));
        }
        if self.runtime.air_dash_falling {
            self.cue(AnimationCue::AirDashFalling(false));
        }
        // A dash-jump cut short ends its dash here; grounded states never step it.
        if self.runtime.dash.take().is_some() {
            self.cue(AnimationCue::Dashing(false));
        }

        let runtime = &mut self.runtime;
        runtime.mode = VerticalMode::Grounded;
        runtime.jumps_used = 0;
        runtime.dashes_used = 0;
        runtime.vertical_velocity = config.resting_gravity;
        runtime.timers.clear_ground_dash_cooldown();
        runtime.air_dash_falling = false;
        runtime.jump_released_during_buffer = false;

        if config.debug_log_jump_height {
            debug!("Highest point: {:.1}", runtime.height.gained());
        }
        debug!("Landed at ({:.1}, {:.1})", runtime.body.center.x, runtime.body.center.y);

        self.cue(AnimationCue::Land);
        true
    }

    // ------------------------------------------------------------------
    // Jump
    // ------------------------------------------------------------------

    pub(crate) fn initiate_jump(&mut self, kind: JumpKind, config: &MovementConfig) {
        let allowed = config.number_of_jumps_allowed;
        let cost = match kind {
            JumpKind::CoyoteExpired => 2,
            JumpKind::Primary | JumpKind::Air => 1,
        };

        let runtime = &mut self.runtime;
        let velocity = config.initial_jump_velocity();
        let mut arc = JumpArc::default();
        if runtime.jump_released_during_buffer {
            arc.fast_fall = Some(FastFall::from_release(velocity));
            runtime.jump_released_during_buffer = false;
        }

        runtime.mode = VerticalMode::Jumping(arc);
        runtime.vertical_velocity = velocity;
        runtime.jumps_used = (runtime.jumps_used + cost).min(allowed);
        runtime.timers.consume_jump_buffer();
        runtime.timers.consume_coyote();
        if let Some(dash) = runtime.dash.as_mut() {
            dash.drives_vertical = false;
        }
        let feet = runtime.body.feet().y;
        runtime.height.restart(feet);

        debug!(
            "Jump ({:?}): velocity={:.1}, jumps_used={}/{}",
            kind, velocity, runtime.jumps_used, allowed
        );

        self.cue(AnimationCue::Jump);
        let particles = match kind {
            JumpKind::Primary => ParticleKind::Jump,
            JumpKind::Air | JumpKind::CoyoteExpired => ParticleKind::SecondJump,
        };
        self.spawn(particles, 0.0);
    }

    pub(crate) fn jump_physics(&mut self, config: &MovementConfig, dt: f32) {
        let runtime = &mut self.runtime;
        let bumped_head = runtime.contacts.bumped_head;

        match &mut runtime.mode {
            VerticalMode::Jumping(arc) => {
                runtime.vertical_velocity =
                    arc.step(runtime.vertical_velocity, bumped_head, &ArcParams::jump(config), dt);
            }
            VerticalMode::Falling { .. } if !runtime.contacts.grounded => {
                runtime.vertical_velocity += config.gravity() * dt;
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Wall slide / wall jump
    // ------------------------------------------------------------------

    /// Leave a wall slide. Costs one jump credit.
    pub(crate) fn stop_wall_sliding(&mut self, config: &MovementConfig) {
        if !self.runtime.is_wall_sliding() {
            return;
        }

        let runtime = &mut self.runtime;
        runtime.jumps_used = (runtime.jumps_used + 1).min(config.number_of_jumps_allowed);
        runtime.mode = VerticalMode::Falling {
            after_wall_slide: true,
        };
        self.cue(AnimationCue::WallSliding(false));
    }

    pub(crate) fn wall_slide_physics(&mut self, config: &MovementConfig, dt: f32) {
        let runtime = &mut self.runtime;
        runtime.vertical_velocity = lerp_clamped(
            runtime.vertical_velocity,
            -config.wall_slide_speed,
            config.wall_slide_deceleration_speed * dt,
        );
    }

    pub(crate) fn initiate_wall_jump(&mut self, config: &MovementConfig) {
        if !config.can_wall_jump {
            return;
        }

        self.stop_wall_sliding(config);

        let runtime = &mut self.runtime;
        let away_from_wall = match runtime.contacts.last_wall_hit {
            Some(hit) if hit.point.x > runtime.body.center.x => -1.0,
            Some(_) => 1.0,
            None => -runtime.facing.sign(),
        };

        runtime.mode = VerticalMode::WallJumping(WallJumpArc::launched());
        runtime.vertical_velocity = config.initial_wall_jump_velocity();
        runtime.horizontal_velocity = config.wall_jump_direction().x.abs() * away_from_wall;
        runtime.timers.consume_jump_buffer();
        if let Some(dash) = runtime.dash.as_mut() {
            dash.drives_vertical = false;
        }
        let feet = runtime.body.feet().y;
        runtime.height.restart(feet);

        debug!(
            "Wall jump: velocity=({:.1}, {:.1}), jumps_used={}",
            runtime.horizontal_velocity, runtime.vertical_velocity, runtime.jumps_used
        );

        self.cue(AnimationCue::Jump);
    }

    pub(crate) fn wall_jump_physics(&mut self, config: &MovementConfig, dt: f32) {
        let runtime = &mut self.runtime;
        let bumped_head = runtime.contacts.bumped_head;

        if let VerticalMode::WallJumping(wall_jump) = &mut runtime.mode {
            runtime.vertical_velocity =
                wall_jump.step(runtime.vertical_velocity, bumped_head, config, dt);
        }
    }

    // ------------------------------------------------------------------
    // Dash
    // ------------------------------------------------------------------

    pub(crate) fn initiate_dash(&mut self, tick: &Tick) {
        let config = tick.config;
        let airborne = !self.runtime.is_grounded();

        // A wall-jump credit spent by letting go of the wall comes back when
        // the player dashes instead of jumping.
        if airborne && self.runtime.timers.wall_jump_window_open() {
            self.runtime.jumps_used = self.runtime.jumps_used.saturating_sub(1);
        }

        self.stop_wall_sliding(config);
        if self.runtime.air_dash_falling {
            self.runtime.air_dash_falling = false;
            self.cue(AnimationCue::AirDashFalling(false));
        }

        let runtime = &mut self.runtime;
        let direction = resolve_dash_direction(tick.input.movement, runtime.facing, config);
        runtime.dash = Some(DashMotion::new(direction, airborne));
        runtime.mode = VerticalMode::Dashing;
        runtime.dashes_used += 1;
        runtime.timers.start_ground_dash_cooldown(config);

        debug!(
            "Dash: direction=({:.2}, {:.2}), airborne={}, dashes_used={}/{}",
            direction.x, direction.y, airborne, runtime.dashes_used, config.number_of_dashes
        );

        self.cue(AnimationCue::Dashing(true));
        self.spawn(ParticleKind::Dash, dash_particle_rotation(direction));
    }

    pub(crate) fn dash_physics(&mut self, config: &MovementConfig, dt: f32) {
        if let Some(mut dash) = self.runtime.dash {
            match dash.step(config, dt) {
                DashStep::Moving {
                    horizontal,
                    vertical,
                } => {
                    self.runtime.dash = Some(dash);
                    self.runtime.horizontal_velocity = horizontal;
                    if let Some(vertical) = vertical {
                        self.runtime.vertical_velocity = vertical;
                    }
                }
                DashStep::Finished => self.finish_dash(config),
            }
            return;
        }

        let runtime = &mut self.runtime;
        if let VerticalMode::DashFastFalling(fall) = &mut runtime.mode {
            runtime.vertical_velocity = step_dash_fast_fall(fall, runtime.vertical_velocity, config, dt);
        }
    }

    fn finish_dash(&mut self, config: &MovementConfig) {
        let grounded = self.runtime.is_grounded();

        if grounded {
            self.runtime.dashes_used = 0;
        } else {
            self.runtime.air_dash_falling = true;
            self.cue(AnimationCue::AirDashFalling(true));
        }

        let runtime = &mut self.runtime;
        runtime.dash = None;
        if runtime.mode == VerticalMode::Dashing {
            runtime.mode = if grounded {
                VerticalMode::Grounded
            } else {
                VerticalMode::DashFastFalling(FastFall::from_release(runtime.vertical_velocity))
            };
        }

        debug!(
            "Dash finished: grounded={}, dashes_used={}/{}",
            grounded, runtime.dashes_used, config.number_of_dashes
        );
        self.cue(AnimationCue::Dashing(false));
    }

    // ------------------------------------------------------------------
    // Horizontal
    // ------------------------------------------------------------------

    /// Ease horizontal velocity toward the input. No-op while a dash is active.
    pub(crate) fn move_horizontal(&mut self, acceleration: f32, deceleration: f32, input: Vec2, tick: &Tick) {
        let runtime = &mut self.runtime;
        if runtime.is_dashing() {
            return;
        }

        let step = step_horizontal(
            runtime.horizontal_velocity,
            runtime.facing,
            acceleration,
            deceleration,
            input,
            tick.input.run_held,
            tick.config,
            tick.dt,
        );
        runtime.horizontal_velocity = step.velocity;
        runtime.facing = step.facing;
    }
}

fn holding_wall(grounded: bool, touching_wall: bool, wall_sliding: bool) -> bool {
    !grounded && (touching_wall || wall_sliding)
}
