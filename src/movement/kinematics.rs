//! Movement domain: horizontal smoothing and jump-arc integration.
//!
//! Normal jumps, wall jumps and the post-dash fall all share the same curve:
//! rise under gravity, hang at the apex, fall harder than the rise, and on an
//! early release blend the captured upward speed down to zero before full
//! release gravity takes over.

use bevy::prelude::*;

use crate::movement::{Facing, MovementConfig};

/// Engine-style lerp: `t` is clamped to [0, 1].
pub fn lerp_clamped(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Where `value` sits between `a` and `b`, clamped to [0, 1].
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Velocity falloff after an early jump release or a dash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastFall {
    pub elapsed: f32,
    pub release_speed: f32,
}

impl FastFall {
    pub fn from_release(release_speed: f32) -> Self {
        Self {
            elapsed: 0.0,
            release_speed,
        }
    }

    /// Released after the apex: no blend, straight to release gravity.
    pub fn past_apex(cancel_time: f32) -> Self {
        Self {
            elapsed: cancel_time,
            release_speed: 0.0,
        }
    }

    /// Blend from the release speed to zero over `cancel_time`, then fall
    /// with `release_gravity`.
    pub fn step(&mut self, velocity: f32, cancel_time: f32, release_gravity: f32, dt: f32) -> f32 {
        let next = if self.elapsed >= cancel_time {
            velocity + release_gravity * dt
        } else {
            lerp_clamped(self.release_speed, 0.0, self.elapsed / cancel_time)
        };
        self.elapsed += dt;
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ApexTracker {
    pub past_threshold: bool,
    pub time_past_threshold: f32,
}

/// Constants for one kind of jump arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub initial_velocity: f32,
    /// Gravity while rising
    pub gravity: f32,
    /// Gravity while falling without a release
    pub descent_gravity: f32,
    /// Gravity once a release blend has finished
    pub release_gravity: f32,
    pub apex_threshold: f32,
    pub apex_hang_time: f32,
    pub upwards_cancel_time: f32,
}

impl ArcParams {
    pub fn jump(config: &MovementConfig) -> Self {
        let gravity = config.gravity();
        Self {
            initial_velocity: config.initial_jump_velocity(),
            gravity,
            descent_gravity: gravity * config.gravity_on_release_multiplier,
            release_gravity: gravity * config.gravity_on_release_multiplier,
            apex_threshold: config.apex_threshold,
            apex_hang_time: config.apex_hang_time,
            upwards_cancel_time: config.time_for_upwards_cancel,
        }
    }

    pub fn wall_jump(config: &MovementConfig) -> Self {
        let gravity = config.wall_jump_gravity();
        Self {
            initial_velocity: config.initial_wall_jump_velocity(),
            gravity,
            descent_gravity: gravity,
            release_gravity: gravity * config.wall_jump_gravity_on_release_multiplier,
            apex_threshold: config.apex_threshold,
            apex_hang_time: config.apex_hang_time,
            upwards_cancel_time: config.time_for_upwards_cancel,
        }
    }
}

/// Per-jump scratch: apex tracking and the release blend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JumpArc {
    pub apex: ApexTracker,
    pub fast_fall: Option<FastFall>,
}

impl JumpArc {
    pub fn is_fast_falling(&self) -> bool {
        self.fast_fall.is_some()
    }

    /// Jump button let go while still rising. Returns the new vertical velocity.
    pub fn release(&mut self, velocity: f32, cancel_time: f32) -> f32 {
        if self.fast_fall.is_some() {
            return velocity;
        }

        if self.apex.past_threshold {
            self.apex.past_threshold = false;
            self.fast_fall = Some(FastFall::past_apex(cancel_time));
            0.0
        } else {
            self.fast_fall = Some(FastFall::from_release(velocity));
            velocity
        }
    }

    /// Integrate one physics step. Returns the new vertical velocity.
    pub fn step(&mut self, velocity: f32, bumped_head: bool, params: &ArcParams, dt: f32) -> f32 {
        let mut velocity = velocity;

        if bumped_head && self.fast_fall.is_none() {
            self.fast_fall = Some(FastFall::from_release(0.0));
        }

        if velocity >= 0.0 {
            let progress = inverse_lerp(params.initial_velocity, 0.0, velocity);

            if progress > params.apex_threshold {
                if !self.apex.past_threshold {
                    self.apex.past_threshold = true;
                    self.apex.time_past_threshold = 0.0;
                }

                self.apex.time_past_threshold += dt;
                velocity = if self.apex.time_past_threshold < params.apex_hang_time {
                    0.0
                } else {
                    -0.01
                };
            } else if self.fast_fall.is_none() {
                velocity += params.gravity * dt;
                self.apex.past_threshold = false;
            }
        } else if self.fast_fall.is_none() {
            velocity += params.descent_gravity * dt;
        }

        if let Some(fast_fall) = self.fast_fall.as_mut() {
            velocity = fast_fall.step(
                velocity,
                params.upwards_cancel_time,
                params.release_gravity,
                dt,
            );
        }

        velocity
    }
}

/// Wall jump arc plus the window during which wall-jump movement stats
/// override normal air control.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WallJumpArc {
    pub arc: JumpArc,
    pub elapsed: f32,
    pub override_movement: bool,
}

impl WallJumpArc {
    pub fn launched() -> Self {
        Self {
            arc: JumpArc::default(),
            elapsed: 0.0,
            override_movement: true,
        }
    }

    pub fn step(&mut self, velocity: f32, bumped_head: bool, config: &MovementConfig, dt: f32) -> f32 {
        self.elapsed += dt;
        if self.elapsed >= config.time_till_jump_apex {
            self.override_movement = false;
        }

        if bumped_head {
            self.override_movement = false;
        }

        self.arc
            .step(velocity, bumped_head, &ArcParams::wall_jump(config), dt)
    }
}

/// Outcome of one horizontal movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalStep {
    pub velocity: f32,
    pub facing: Facing,
}

/// Ease horizontal velocity toward the input's target speed.
///
/// Input inside the dead zone decays velocity toward zero instead. Input
/// pointing against `facing` turns the player around without touching the
/// velocity.
pub fn step_horizontal(
    velocity: f32,
    facing: Facing,
    acceleration: f32,
    deceleration: f32,
    input: Vec2,
    run_held: bool,
    config: &MovementConfig,
    dt: f32,
) -> HorizontalStep {
    if input.x.abs() > config.move_threshold {
        let facing = if input.x.signum() != facing.sign() {
            facing.flipped()
        } else {
            facing
        };

        let speed = if run_held {
            config.max_run_speed
        } else {
            config.max_walk_speed
        };
        let target = input.x * speed;

        HorizontalStep {
            velocity: lerp_clamped(velocity, target, acceleration * dt),
            facing,
        }
    } else {
        HorizontalStep {
            velocity: lerp_clamped(velocity, 0.0, deceleration * dt),
            facing,
        }
    }
}
