//! Movement domain: dash direction snapping and the dash's own motion.

use bevy::prelude::*;

use crate::movement::kinematics::{FastFall, lerp_clamped};
use crate::movement::{Facing, MovementConfig};

/// Snap raw stick input to the nearest configured dash direction.
///
/// Diagonal candidates have `dash_diagonally_bias` subtracted from their
/// distance, so slightly-off-axis input still reads as a diagonal. Zero input
/// dashes the way the player is facing.
pub fn resolve_dash_direction(input: Vec2, facing: Facing, config: &MovementConfig) -> Vec2 {
    if input == Vec2::ZERO {
        return Vec2::new(facing.sign(), 0.0);
    }

    let directions = &config.dash_directions;
    if let Some(exact) = directions.iter().find(|d| **d == input) {
        return *exact;
    }

    let mut closest = directions[0];
    let mut min_distance = f32::MAX;

    for direction in directions {
        let mut distance = input.distance(*direction);
        if is_diagonal(*direction) {
            distance -= config.dash_diagonally_bias;
        }

        if distance < min_distance {
            min_distance = distance;
            closest = *direction;
        }
    }

    closest
}

fn is_diagonal(direction: Vec2) -> bool {
    direction.x != 0.0 && direction.y != 0.0
}

/// Particle rotation for a dash, in radians. The trail points back along
/// the dash.
pub fn dash_particle_rotation(direction: Vec2) -> f32 {
    let back = -direction;
    back.y.atan2(back.x)
}

/// An active dash. The direction is fixed when the dash starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashMotion {
    pub direction: Vec2,
    pub elapsed: f32,
    pub airborne: bool,
    /// Cleared when a jump interrupts the dash and takes over vertical motion
    pub drives_vertical: bool,
}

/// What one dash physics step produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashStep {
    Moving {
        horizontal: f32,
        vertical: Option<f32>,
    },
    Finished,
}

impl DashMotion {
    pub fn new(direction: Vec2, airborne: bool) -> Self {
        Self {
            direction,
            elapsed: 0.0,
            airborne,
            drives_vertical: true,
        }
    }

    pub fn step(&mut self, config: &MovementConfig, dt: f32) -> DashStep {
        self.elapsed += dt;
        if self.elapsed >= config.dash_time {
            return DashStep::Finished;
        }

        let velocity = self.direction * config.dash_speed;
        let vertical = if self.drives_vertical && (self.direction.y != 0.0 || self.airborne) {
            Some(velocity.y)
        } else {
            None
        };

        DashStep::Moving {
            horizontal: velocity.x,
            vertical,
        }
    }
}

/// Vertical motion after an airborne dash ends: blend any upward speed out
/// over the dash cancel time, otherwise fall under dash release gravity.
pub fn step_dash_fast_fall(
    fall: &mut FastFall,
    velocity: f32,
    config: &MovementConfig,
    dt: f32,
) -> f32 {
    let gravity = config.gravity() * config.dash_gravity_on_release_multiplier;

    if velocity > 0.0 {
        let cancel_time = config.dash_time_for_upwards_cancel;
        let next = if fall.elapsed < cancel_time {
            lerp_clamped(fall.release_speed, 0.0, fall.elapsed / cancel_time)
        } else {
            velocity + gravity * dt
        };
        fall.elapsed += dt;
        next
    } else {
        velocity + gravity * dt
    }
}
