//! Movement domain: tuning resource and the values derived from it.

use std::f32::consts::FRAC_1_SQRT_2;

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::Deserialize;

use crate::movement::GameLayer;

/// Canonical dash directions, clockwise from right.
pub const DASH_DIRECTIONS: [Vec2; 8] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    Vec2::new(0.0, -1.0),
    Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    Vec2::new(-1.0, 0.0),
    Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    Vec2::new(0.0, 1.0),
    Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
];

/// Tunables for the player controller. Distances are in pixels, rates are
/// per second, durations in seconds.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // Walk
    pub move_threshold: f32,
    pub max_walk_speed: f32,
    pub max_run_speed: f32,
    pub ground_acceleration: f32,
    pub ground_deceleration: f32,
    pub air_acceleration: f32,
    pub air_deceleration: f32,
    pub wall_jump_move_acceleration: f32,
    pub wall_jump_move_deceleration: f32,
    /// How close to `max_run_speed` the run speed effect kicks in
    pub speed_effect_margin: f32,

    // Environment probe
    pub ground_detection_ray_length: f32,
    pub head_detection_ray_length: f32,
    /// Head probe width as a fraction of the body width
    pub head_width: f32,
    /// Fraction of body width covered by the ground probe
    pub feet_width: f32,
    pub wall_detection_ray_length: f32,
    pub wall_detection_ray_height_multiplier: f32,
    #[serde(skip, default = "default_ground_layer")]
    pub ground_layer: LayerMask,

    // Jump
    pub jump_height: f32,
    pub jump_height_compensation_factor: f32,
    pub time_till_jump_apex: f32,
    pub gravity_on_release_multiplier: f32,
    pub max_fall_speed: f32,
    /// Upper bound on upward speed, and on vertical speed either way while dashing
    pub vertical_speed_limit: f32,
    pub number_of_jumps_allowed: u32,
    pub time_for_upwards_cancel: f32,
    pub apex_threshold: f32,
    pub apex_hang_time: f32,
    pub jump_buffer_time: f32,
    pub jump_coyote_time: f32,
    /// Vertical velocity left on the body after landing; matches world gravity
    pub resting_gravity: f32,

    // Wall slide / wall jump
    pub reset_jumps_on_wall_slide: bool,
    pub wall_slide_speed: f32,
    pub wall_slide_deceleration_speed: f32,
    pub can_wall_jump: bool,
    pub wall_jump_horizontal_speed: f32,
    pub wall_jump_height: f32,
    pub wall_jump_post_buffer_time: f32,
    pub wall_jump_gravity_on_release_multiplier: f32,

    // Dash
    pub dash_time: f32,
    pub dash_speed: f32,
    pub time_btw_dashes_on_ground: f32,
    pub reset_dash_on_wall_slide: bool,
    pub number_of_dashes: u32,
    pub dash_diagonally_bias: f32,
    pub dash_gravity_on_release_multiplier: f32,
    pub dash_time_for_upwards_cancel: f32,
    #[serde(skip, default = "default_dash_directions")]
    pub dash_directions: [Vec2; 8],

    // Debug
    pub debug_log_jump_height: bool,
}

fn default_ground_layer() -> LayerMask {
    GameLayer::Ground.into()
}

fn default_dash_directions() -> [Vec2; 8] {
    DASH_DIRECTIONS
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_threshold: 0.25,
            max_walk_speed: 400.0,
            max_run_speed: 640.0,
            ground_acceleration: 5.0,
            ground_deceleration: 20.0,
            air_acceleration: 5.0,
            air_deceleration: 5.0,
            wall_jump_move_acceleration: 5.0,
            wall_jump_move_deceleration: 5.0,
            speed_effect_margin: 64.0,

            ground_detection_ray_length: 2.0,
            head_detection_ray_length: 2.0,
            head_width: 0.75,
            feet_width: 0.9,
            wall_detection_ray_length: 4.0,
            wall_detection_ray_height_multiplier: 0.9,
            ground_layer: default_ground_layer(),

            jump_height: 208.0,
            jump_height_compensation_factor: 1.054,
            time_till_jump_apex: 0.35,
            gravity_on_release_multiplier: 2.0,
            max_fall_speed: 832.0,
            vertical_speed_limit: 1600.0,
            number_of_jumps_allowed: 2,
            time_for_upwards_cancel: 0.027,
            apex_threshold: 0.97,
            apex_hang_time: 0.075,
            jump_buffer_time: 0.125,
            jump_coyote_time: 0.1,
            resting_gravity: -9.81 * 32.0,

            reset_jumps_on_wall_slide: true,
            wall_slide_speed: 160.0,
            wall_slide_deceleration_speed: 50.0,
            can_wall_jump: true,
            wall_jump_horizontal_speed: 640.0,
            wall_jump_height: 208.0,
            wall_jump_post_buffer_time: 0.125,
            wall_jump_gravity_on_release_multiplier: 1.0,

            dash_time: 0.11,
            dash_speed: 1280.0,
            time_btw_dashes_on_ground: 0.225,
            reset_dash_on_wall_slide: true,
            number_of_dashes: 2,
            dash_diagonally_bias: 0.4,
            dash_gravity_on_release_multiplier: 1.0,
            dash_time_for_upwards_cancel: 0.027,
            dash_directions: DASH_DIRECTIONS,

            debug_log_jump_height: false,
        }
    }
}

impl MovementConfig {
    pub fn adjusted_jump_height(&self) -> f32 {
        self.jump_height * self.jump_height_compensation_factor
    }

    /// Downward acceleration of a jump arc (negative).
    /// Uses h = -g t² / 2 solved for the configured apex time.
    pub fn gravity(&self) -> f32 {
        -(2.0 * self.adjusted_jump_height()) / self.time_till_jump_apex.powi(2)
    }

    pub fn initial_jump_velocity(&self) -> f32 {
        self.gravity().abs() * self.time_till_jump_apex
    }

    pub fn adjusted_wall_jump_height(&self) -> f32 {
        self.wall_jump_height * self.jump_height_compensation_factor
    }

    pub fn wall_jump_gravity(&self) -> f32 {
        -(2.0 * self.adjusted_wall_jump_height()) / self.time_till_jump_apex.powi(2)
    }

    pub fn initial_wall_jump_velocity(&self) -> f32 {
        self.wall_jump_gravity().abs() * self.time_till_jump_apex
    }

    /// Wall jump launch vector as authored: away-from-wall speed on x (left
    /// when the wall is on the right), height on y.
    pub fn wall_jump_direction(&self) -> Vec2 {
        Vec2::new(-self.wall_jump_horizontal_speed, self.wall_jump_height)
    }

    /// Check ranges. Returns every violation, empty when valid.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        macro_rules! non_negative {
            ($($field:ident),+ $(,)?) => {
                $(
                    if !(self.$field >= 0.0) {
                        errors.push(ConfigValidationError {
                            field: stringify!($field),
                            value: self.$field,
                            rule: "must be >= 0",
                        });
                    }
                )+
            };
        }

        non_negative!(
            move_threshold,
            max_walk_speed,
            max_run_speed,
            ground_acceleration,
            ground_deceleration,
            air_acceleration,
            air_deceleration,
            wall_jump_move_acceleration,
            wall_jump_move_deceleration,
            speed_effect_margin,
            ground_detection_ray_length,
            head_detection_ray_length,
            wall_detection_ray_length,
            jump_height,
            jump_height_compensation_factor,
            gravity_on_release_multiplier,
            max_fall_speed,
            vertical_speed_limit,
            time_for_upwards_cancel,
            apex_hang_time,
            jump_buffer_time,
            jump_coyote_time,
            wall_slide_speed,
            wall_slide_deceleration_speed,
            wall_jump_horizontal_speed,
            wall_jump_height,
            wall_jump_post_buffer_time,
            wall_jump_gravity_on_release_multiplier,
            dash_time,
            dash_speed,
            time_btw_dashes_on_ground,
            dash_diagonally_bias,
            dash_gravity_on_release_multiplier,
            dash_time_for_upwards_cancel,
        );

        if !(self.time_till_jump_apex > 0.0) {
            errors.push(ConfigValidationError {
                field: "time_till_jump_apex",
                value: self.time_till_jump_apex,
                rule: "must be > 0",
            });
        }

        if !(0.0..=1.0).contains(&self.apex_threshold) {
            errors.push(ConfigValidationError {
                field: "apex_threshold",
                value: self.apex_threshold,
                rule: "must be within [0, 1]",
            });
        }

        for (field, value) in [
            ("head_width", self.head_width),
            ("feet_width", self.feet_width),
            (
                "wall_detection_ray_height_multiplier",
                self.wall_detection_ray_height_multiplier,
            ),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                errors.push(ConfigValidationError {
                    field,
                    value,
                    rule: "must be within (0, 1]",
                });
            }
        }

        if !(self.resting_gravity <= 0.0) {
            errors.push(ConfigValidationError {
                field: "resting_gravity",
                value: self.resting_gravity,
                rule: "must be <= 0",
            });
        }

        errors
    }
}

/// A tunable outside its allowed range.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    pub field: &'static str,
    pub value: f32,
    pub rule: &'static str,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {} {}", self.field, self.value, self.rule)
    }
}
