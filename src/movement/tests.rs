//! Movement domain: unit tests for tuning, timers, arcs, dash resolution and
//! the controller state machine driven by a scripted probe.

use bevy::prelude::*;

use super::dash::{dash_particle_rotation, step_dash_fast_fall};
use super::kinematics::{ArcParams, inverse_lerp, lerp_clamped, step_horizontal};
use super::probe::{ground_cast, head_cast, wall_cast};
use super::{
    AnimationCue, BodyFrame, BoxCast, BoxCaster, Contacts, ControllerEvent, DashMotion, Facing,
    FastFall, InputSnapshot, JumpArc, JumpKind, MovementConfig, ParticleKind, PlayerController,
    PlayerState, ProbeHit, ProbeResult, TimerBank, VerticalMode, parse_movement_config,
    resolve_dash_direction,
};

const DT: f32 = 0.02;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// -----------------------------------------------------------------------------
// Scripted probe
// -----------------------------------------------------------------------------

/// Answers box casts from flags instead of level geometry.
#[derive(Debug, Default)]
struct FakeCaster {
    ground: bool,
    head: bool,
    /// Contact point of a wall, reported only to casts pointing at it
    wall: Option<Vec2>,
}

impl BoxCaster for FakeCaster {
    fn box_intersect(&self, cast: &BoxCast) -> Option<ProbeHit> {
        let hit = |point: Vec2| ProbeHit {
            entity: Entity::PLACEHOLDER,
            point,
        };

        if cast.direction.y < -0.5 {
            return self.ground.then(|| hit(Vec2::new(cast.origin.x, cast.origin.y)));
        }
        if cast.direction.y > 0.5 {
            return self.head.then(|| hit(Vec2::new(cast.origin.x, cast.origin.y)));
        }

        self.wall
            .filter(|point| (point.x - cast.origin.x) * cast.direction.x >= 0.0)
            .map(hit)
    }
}

/// A controller plus the world it is stepped against.
struct Rig {
    controller: PlayerController,
    config: MovementConfig,
    caster: FakeCaster,
    body: BodyFrame,
}

impl Rig {
    fn with_config(config: MovementConfig) -> Self {
        Self {
            controller: PlayerController::new(&config),
            config,
            caster: FakeCaster::default(),
            body: BodyFrame::new(Vec2::ZERO, Vec2::new(12.0, 24.0)),
        }
    }

    /// Standing on the floor with contacts already probed.
    fn grounded() -> Self {
        Self::grounded_with(MovementConfig::default())
    }

    fn grounded_with(config: MovementConfig) -> Self {
        let mut rig = Self::with_config(config);
        rig.caster.ground = true;
        rig.step(InputSnapshot::default());
        rig.frame(InputSnapshot::default());
        rig
    }

    /// Off the floor, falling, already handed over to InAir.
    fn airborne() -> Self {
        let mut rig = Self::with_config(MovementConfig::default());
        rig.step(InputSnapshot::default());
        rig.frame(InputSnapshot::default());
        rig
    }

    fn frame(&mut self, input: InputSnapshot) {
        self.controller.frame_update(&self.config, &input, DT);
    }

    fn step(&mut self, input: InputSnapshot) -> Vec2 {
        self.controller
            .physics_step(&self.caster, &self.config, self.body, &input, DT)
    }

    fn idle_frame(&mut self) {
        self.frame(InputSnapshot::default());
    }

    fn idle_step(&mut self) -> Vec2 {
        self.step(InputSnapshot::default())
    }

    fn cues(&mut self) -> Vec<AnimationCue> {
        self.controller
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                ControllerEvent::Animation(cue) => Some(cue),
                ControllerEvent::Spawn(_) => None,
            })
            .collect()
    }
}

fn press_jump() -> InputSnapshot {
    InputSnapshot {
        jump_pressed: true,
        ..default()
    }
}

fn press_dash() -> InputSnapshot {
    InputSnapshot {
        dash_pressed: true,
        ..default()
    }
}

// -----------------------------------------------------------------------------
// Config tests
// -----------------------------------------------------------------------------

#[test]
fn test_default_config_is_valid() {
    assert!(MovementConfig::default().validate().is_empty());
}

#[test]
fn test_derived_jump_quantities() {
    let config = MovementConfig::default();
    let gravity = config.gravity();
    let velocity = config.initial_jump_velocity();

    assert!(gravity < 0.0);
    assert!(approx(velocity, gravity.abs() * config.time_till_jump_apex));
    // v0² / 2|g| recovers the compensated apex height
    let apex = velocity * velocity / (2.0 * gravity.abs());
    assert!((apex - config.adjusted_jump_height()).abs() < 0.1);
}

#[test]
fn test_wall_jump_direction_points_left_of_wall() {
    let config = MovementConfig::default();
    let direction = config.wall_jump_direction();
    assert_eq!(direction.x, -config.wall_jump_horizontal_speed);
    assert_eq!(direction.y, config.wall_jump_height);
}

#[test]
fn test_validate_reports_every_violation() {
    let config = MovementConfig {
        dash_time: -1.0,
        time_till_jump_apex: 0.0,
        apex_threshold: 1.5,
        ..default()
    };

    let fields: Vec<_> = config.validate().iter().map(|e| e.field).collect();
    assert_eq!(fields.len(), 3);
    assert!(fields.contains(&"dash_time"));
    assert!(fields.contains(&"time_till_jump_apex"));
    assert!(fields.contains(&"apex_threshold"));
}

#[test]
fn test_parse_partial_config_keeps_defaults() {
    let config = parse_movement_config("inline", "(max_walk_speed: 300.0, number_of_dashes: 1)")
        .expect("partial config should parse");

    assert_eq!(config.max_walk_speed, 300.0);
    assert_eq!(config.number_of_dashes, 1);
    assert_eq!(config.max_run_speed, MovementConfig::default().max_run_speed);
}

#[test]
fn test_parse_rejects_out_of_range_values() {
    let err = parse_movement_config("inline", "(dash_time: -0.5)").unwrap_err();
    assert_eq!(err.file, "inline");
    assert!(err.message.contains("dash_time"));
}

#[test]
fn test_parse_reports_malformed_ron() {
    let err = parse_movement_config("inline", "(max_walk_speed: ").unwrap_err();
    assert!(err.message.starts_with("Parse error"));
}

#[test]
fn test_shipped_tuning_file_parses() {
    let contents = include_str!("../../assets/config/movement.ron");
    let config = parse_movement_config("movement.ron", contents).expect("shipped tuning is valid");
    let defaults = MovementConfig::default();

    assert_eq!(config.number_of_jumps_allowed, defaults.number_of_jumps_allowed);
    assert!(approx(config.jump_height, defaults.jump_height));
    assert!(approx(config.dash_speed, defaults.dash_speed));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = super::load_movement_config(std::path::Path::new("does/not/exist.ron")).unwrap_err();
    assert!(err.message.starts_with("IO error"));
}

// -----------------------------------------------------------------------------
// TimerBank tests
// -----------------------------------------------------------------------------

#[test]
fn test_timers_floor_at_zero() {
    let config = MovementConfig::default();
    let mut timers = TimerBank::default();
    timers.buffer_jump(&config);

    for _ in 0..20 {
        timers.tick(DT, false, false, &config);
    }

    assert_eq!(timers.jump_buffer, 0.0);
    assert_eq!(timers.coyote, 0.0);
    assert!(!timers.jump_buffered());
}

#[test]
fn test_coyote_refills_while_grounded() {
    let config = MovementConfig::default();
    let mut timers = TimerBank::default();

    timers.tick(DT, true, false, &config);
    assert_eq!(timers.coyote, config.jump_coyote_time);

    timers.tick(DT, false, false, &config);
    assert!(timers.coyote_open());
    assert!(timers.coyote < config.jump_coyote_time);
}

#[test]
fn test_wall_jump_window_holds_while_on_wall() {
    let config = MovementConfig::default();
    let mut timers = TimerBank::default();
    timers.hold_wall_jump_window(&config);

    timers.tick(DT, false, true, &config);
    assert_eq!(timers.wall_jump_post_buffer, config.wall_jump_post_buffer_time);

    timers.tick(DT, false, false, &config);
    assert!(timers.wall_jump_post_buffer < config.wall_jump_post_buffer_time);
}

#[test]
fn test_ground_dash_cooldown_only_drains_on_ground() {
    let config = MovementConfig::default();
    let mut timers = TimerBank::default();
    timers.start_ground_dash_cooldown(&config);

    timers.tick(DT, false, false, &config);
    assert_eq!(timers.ground_dash_cooldown, config.time_btw_dashes_on_ground);
    assert!(!timers.ground_dash_ready());

    timers.tick(DT, true, false, &config);
    assert!(timers.ground_dash_cooldown < config.time_btw_dashes_on_ground);
}

// -----------------------------------------------------------------------------
// Kinematics tests
// -----------------------------------------------------------------------------

#[test]
fn test_lerp_and_inverse_lerp_clamp() {
    assert_eq!(lerp_clamped(0.0, 10.0, 2.0), 10.0);
    assert_eq!(lerp_clamped(0.0, 10.0, -1.0), 0.0);
    assert_eq!(inverse_lerp(100.0, 0.0, 25.0), 0.75);
    assert_eq!(inverse_lerp(5.0, 5.0, 5.0), 0.0);
}

#[test]
fn test_turning_flips_facing_and_eases_velocity() {
    let config = MovementConfig::default();
    let step = step_horizontal(
        100.0,
        Facing::Right,
        config.ground_acceleration,
        config.ground_deceleration,
        Vec2::new(-1.0, 0.0),
        false,
        &config,
        DT,
    );

    assert_eq!(step.facing, Facing::Left);
    // 100 toward -400 by 5 * 0.02
    assert!(approx(step.velocity, 50.0));
}

#[test]
fn test_input_inside_dead_zone_decelerates() {
    let config = MovementConfig::default();
    let step = step_horizontal(
        100.0,
        Facing::Right,
        config.ground_acceleration,
        config.ground_deceleration,
        Vec2::new(0.1, 0.0),
        false,
        &config,
        DT,
    );

    assert_eq!(step.facing, Facing::Right);
    assert!(approx(step.velocity, 60.0));
}

#[test]
fn test_fast_fall_blends_then_applies_gravity() {
    let mut fall = FastFall::from_release(300.0);
    let gravity = -1000.0;

    let first = fall.step(300.0, 0.027, gravity, DT);
    let second = fall.step(first, 0.027, gravity, DT);
    let third = fall.step(second, 0.027, gravity, DT);

    assert_eq!(first, 300.0);
    assert!(second > 0.0 && second < 300.0);
    assert!(approx(third, second + gravity * DT));
}

#[test]
fn test_apex_hang_lasts_hang_time() {
    let config = MovementConfig::default();
    let params = ArcParams::jump(&config);
    let mut arc = JumpArc::default();
    let mut velocity = config.initial_jump_velocity();
    let mut hang_steps = 0;

    for _ in 0..100 {
        velocity = arc.step(velocity, false, &params, DT);
        if velocity == 0.0 {
            hang_steps += 1;
        }
        if velocity < 0.0 {
            break;
        }
    }

    let hang = hang_steps as f32 * DT;
    assert!(hang_steps > 0);
    assert!((hang - config.apex_hang_time).abs() <= DT);
    assert_eq!(velocity, -0.01);
}

#[test]
fn test_release_past_apex_zeroes_velocity() {
    let mut arc = JumpArc::default();
    arc.apex.past_threshold = true;

    let velocity = arc.release(20.0, 0.027);

    assert_eq!(velocity, 0.0);
    assert!(arc.is_fast_falling());
    assert!(!arc.apex.past_threshold);
}

#[test]
fn test_second_release_is_ignored() {
    let mut arc = JumpArc::default();
    arc.release(500.0, 0.027);
    let captured = arc.fast_fall;

    assert_eq!(arc.release(400.0, 0.027), 400.0);
    assert_eq!(arc.fast_fall, captured);
}

#[test]
fn test_head_bump_cancels_rise() {
    let config = MovementConfig::default();
    let params = ArcParams::jump(&config);
    let mut arc = JumpArc::default();

    let velocity = arc.step(500.0, true, &params, DT);

    assert_eq!(velocity, 0.0);
    assert!(arc.is_fast_falling());
}

// -----------------------------------------------------------------------------
// Dash resolution tests
// -----------------------------------------------------------------------------

#[test]
fn test_zero_input_dashes_facing_direction() {
    let config = MovementConfig::default();
    assert_eq!(
        resolve_dash_direction(Vec2::ZERO, Facing::Left, &config),
        Vec2::new(-1.0, 0.0)
    );
    assert_eq!(
        resolve_dash_direction(Vec2::ZERO, Facing::Right, &config),
        Vec2::new(1.0, 0.0)
    );
}

#[test]
fn test_exact_direction_is_returned_unchanged() {
    let config = MovementConfig::default();
    for direction in config.dash_directions {
        assert_eq!(resolve_dash_direction(direction, Facing::Right, &config), direction);
    }
}

#[test]
fn test_dash_resolution_is_idempotent() {
    let config = MovementConfig::default();
    let once = resolve_dash_direction(Vec2::new(0.3, -0.8), Facing::Right, &config);
    let twice = resolve_dash_direction(once, Facing::Right, &config);
    assert_eq!(once, twice);
}

#[test]
fn test_diagonal_bias_tips_near_diagonal_input() {
    let diagonal = Vec2::new(1.0, 1.0).normalize();
    let input = Vec2::new(0.9, 0.35);

    let biased = MovementConfig {
        dash_diagonally_bias: 0.1,
        ..default()
    };
    let unbiased = MovementConfig {
        dash_diagonally_bias: 0.0,
        ..default()
    };

    let with_bias = resolve_dash_direction(input, Facing::Right, &biased);
    assert!(approx(with_bias.x, diagonal.x) && approx(with_bias.y, diagonal.y));
    assert_eq!(
        resolve_dash_direction(input, Facing::Right, &unbiased),
        Vec2::new(1.0, 0.0)
    );

    let up_right = resolve_dash_direction(Vec2::new(0.9, 0.9), Facing::Right, &biased);
    assert!(approx(up_right.x, diagonal.x) && approx(up_right.y, diagonal.y));
}

#[test]
fn test_dash_particles_point_behind_the_dash() {
    let rightward = dash_particle_rotation(Vec2::new(1.0, 0.0));
    assert!(approx(rightward.abs(), std::f32::consts::PI));
    assert!(approx(dash_particle_rotation(Vec2::new(0.0, -1.0)), std::f32::consts::FRAC_PI_2));
}

#[test]
fn test_ground_dash_leaves_vertical_alone() {
    let config = MovementConfig::default();
    let mut dash = DashMotion::new(Vec2::new(1.0, 0.0), false);

    match dash.step(&config, DT) {
        super::dash::DashStep::Moving {
            horizontal,
            vertical,
        } => {
            assert_eq!(horizontal, config.dash_speed);
            assert_eq!(vertical, None);
        }
        super::dash::DashStep::Finished => panic!("dash ended after one step"),
    }
}

#[test]
fn test_dash_fast_fall_uses_dash_release_gravity() {
    let config = MovementConfig::default();
    let mut fall = FastFall::from_release(0.0);

    let velocity = step_dash_fast_fall(&mut fall, -10.0, &config, DT);
    let expected = -10.0 + config.gravity() * config.dash_gravity_on_release_multiplier * DT;
    assert!(approx(velocity, expected));
}

// -----------------------------------------------------------------------------
// Probe tests
// -----------------------------------------------------------------------------

#[test]
fn test_casts_start_at_body_edges() {
    let config = MovementConfig::default();
    let body = BodyFrame::new(Vec2::new(10.0, 50.0), Vec2::new(12.0, 24.0));

    assert_eq!(ground_cast(&body, &config).origin, Vec2::new(10.0, 26.0));
    assert_eq!(head_cast(&body, &config).origin, Vec2::new(10.0, 74.0));
    assert_eq!(head_cast(&body, &config).size.x, 24.0 * config.head_width);
    assert_eq!(
        wall_cast(&body, Facing::Left, &config).origin,
        Vec2::new(-2.0, 50.0)
    );
}

#[test]
fn test_ground_cast_stays_clear_of_side_walls() {
    let config = MovementConfig::default();
    let body = BodyFrame::new(Vec2::ZERO, Vec2::new(12.0, 24.0));
    let cast = ground_cast(&body, &config);

    assert_eq!(cast.size.x, body.size().x * config.feet_width);
    // A wall flush with either side of the body starts outside the box
    assert!(cast.origin.x + cast.size.x / 2.0 < body.center.x + body.half_extents.x);
    assert!(cast.origin.x - cast.size.x / 2.0 > body.center.x - body.half_extents.x);
}

#[test]
fn test_feet_width_must_be_a_fraction() {
    let config = MovementConfig {
        feet_width: 0.0,
        ..default()
    };
    let fields: Vec<_> = config.validate().iter().map(|e| e.field).collect();
    assert_eq!(fields, vec!["feet_width"]);
}

#[test]
fn test_contacts_remember_last_wall_hit() {
    let hit = ProbeHit {
        entity: Entity::PLACEHOLDER,
        point: Vec2::new(14.0, 0.0),
    };
    let mut contacts = Contacts::default();

    contacts.apply(ProbeResult {
        wall_hit: Some(hit),
        ..default()
    });
    assert!(contacts.touching_wall);

    contacts.apply(ProbeResult::default());
    assert!(!contacts.touching_wall);
    assert_eq!(contacts.wall_hit, None);
    assert_eq!(contacts.last_wall_hit, Some(hit));
}

// -----------------------------------------------------------------------------
// Controller: jumping
// -----------------------------------------------------------------------------

#[test]
fn test_new_controller_starts_idle() {
    let config = MovementConfig::default();
    let controller = PlayerController::new(&config);

    assert_eq!(controller.state(), PlayerState::Idle);
    assert_eq!(controller.previous_state(), None);
    assert_eq!(controller.runtime().vertical_velocity, config.resting_gravity);
}

#[test]
fn test_grounded_jump_press_launches_jump() {
    let mut rig = Rig::grounded();
    rig.controller.drain_events();

    rig.frame(press_jump());

    let runtime = rig.controller.runtime();
    assert_eq!(rig.controller.state(), PlayerState::InAir);
    assert_eq!(
        rig.controller.previous_state(),
        Some(PlayerState::Jump(JumpKind::Primary))
    );
    assert!(runtime.is_jumping());
    assert_eq!(runtime.vertical_velocity, rig.config.initial_jump_velocity());
    assert_eq!(runtime.jumps_used, 1);
    assert!(!runtime.timers.jump_buffered());

    let events = rig.controller.drain_events();
    assert!(events.contains(&ControllerEvent::Animation(AnimationCue::Jump)));
    assert!(events.iter().any(|event| matches!(
        event,
        ControllerEvent::Spawn(request) if request.kind == ParticleKind::Jump
    )));
}

#[test]
fn test_release_during_buffer_starts_short_hop() {
    let mut rig = Rig::grounded();

    rig.frame(InputSnapshot {
        jump_pressed: true,
        jump_released: true,
        ..default()
    });

    match rig.controller.runtime().mode {
        VerticalMode::Jumping(arc) => assert!(arc.is_fast_falling()),
        other => panic!("expected a jump, got {}", other.label()),
    }
}

#[test]
fn test_air_jump_then_out_of_jumps() {
    let mut rig = Rig::grounded();
    rig.frame(press_jump());
    rig.caster.ground = false;
    rig.idle_step();

    rig.frame(press_jump());
    assert_eq!(rig.controller.runtime().jumps_used, 2);
    assert_eq!(
        rig.controller.previous_state(),
        Some(PlayerState::Jump(JumpKind::Air))
    );

    rig.idle_step();
    let transitions = rig.controller.machine.transitions();
    rig.frame(press_jump());

    let runtime = rig.controller.runtime();
    assert_eq!(runtime.jumps_used, rig.config.number_of_jumps_allowed);
    assert!(runtime.vertical_velocity < rig.config.initial_jump_velocity());
    assert_eq!(rig.controller.machine.transitions(), transitions);
}

#[test]
fn test_coyote_jump_after_walking_off_ledge() {
    let mut rig = Rig::grounded();
    rig.caster.ground = false;
    rig.idle_step();
    rig.idle_frame();

    assert_eq!(rig.controller.state(), PlayerState::InAir);
    assert!(rig.controller.runtime().is_falling());
    assert!(rig.controller.runtime().timers.coyote_open());

    rig.frame(press_jump());

    let runtime = rig.controller.runtime();
    assert!(runtime.is_jumping());
    assert_eq!(runtime.jumps_used, 1);
    assert!(!runtime.timers.coyote_open());
}

#[test]
fn test_late_jump_after_coyote_costs_two_credits() {
    let mut rig = Rig::grounded();
    rig.caster.ground = false;
    rig.idle_step();
    for _ in 0..8 {
        rig.idle_frame();
    }
    assert!(!rig.controller.runtime().timers.coyote_open());

    rig.frame(press_jump());

    let runtime = rig.controller.runtime();
    assert!(runtime.is_jumping());
    assert_eq!(runtime.jumps_used, 2);
    assert_eq!(
        rig.controller.previous_state(),
        Some(PlayerState::Jump(JumpKind::CoyoteExpired))
    );
}

#[test]
fn test_fall_speed_clamps_at_max() {
    let mut rig = Rig::airborne();
    rig.controller.runtime_mut().vertical_velocity = -2000.0;

    let velocity = rig.idle_step();

    assert_eq!(velocity.y, -rig.config.max_fall_speed);
    assert_eq!(rig.controller.runtime().vertical_velocity, -rig.config.max_fall_speed);
}

#[test]
fn test_jump_rises_under_gravity() {
    let mut rig = Rig::grounded();
    rig.frame(press_jump());
    rig.caster.ground = false;

    let velocity = rig.idle_step();

    let expected = rig.config.initial_jump_velocity() + rig.config.gravity() * DT;
    assert!(approx(velocity.y, expected));
}

// -----------------------------------------------------------------------------
// Controller: landing
// -----------------------------------------------------------------------------

#[test]
fn test_landing_clears_airborne_state() {
    let mut rig = Rig::airborne();
    {
        let runtime = rig.controller.runtime_mut();
        runtime.mode = VerticalMode::DashFastFalling(FastFall::from_release(0.0));
        runtime.jumps_used = 2;
        runtime.dashes_used = 2;
        runtime.vertical_velocity = -50.0;
    }
    rig.caster.ground = true;
    rig.idle_step();
    rig.idle_frame();

    let runtime = rig.controller.runtime();
    assert_eq!(rig.controller.state(), PlayerState::Idle);
    assert_eq!(runtime.mode, VerticalMode::Grounded);
    assert!(!runtime.is_jumping());
    assert!(!runtime.is_falling());
    assert!(!runtime.is_wall_jumping());
    assert!(!runtime.is_wall_sliding());
    assert!(!runtime.is_wall_slide_falling());
    assert!(!runtime.is_dash_fast_falling());
    assert_eq!(runtime.jumps_used, 0);
    assert_eq!(runtime.dashes_used, 0);
    assert_eq!(runtime.vertical_velocity, rig.config.resting_gravity);
}

#[test]
fn test_air_dash_fall_defers_landing_one_frame() {
    let mut rig = Rig::airborne();
    {
        let runtime = rig.controller.runtime_mut();
        runtime.mode = VerticalMode::DashFastFalling(FastFall::from_release(0.0));
        runtime.air_dash_falling = true;
        runtime.vertical_velocity = -50.0;
    }
    rig.caster.ground = true;
    rig.idle_step();

    rig.idle_frame();
    assert_eq!(rig.controller.state(), PlayerState::InAir);
    assert!(!rig.controller.runtime().air_dash_falling);

    rig.idle_frame();
    assert_eq!(rig.controller.state(), PlayerState::Idle);
}

// -----------------------------------------------------------------------------
// Controller: walls
// -----------------------------------------------------------------------------

/// Airborne against a wall on the right, already sliding.
fn sliding_on_right_wall() -> Rig {
    sliding_on_right_wall_with(MovementConfig::default())
}

fn sliding_on_right_wall_with(config: MovementConfig) -> Rig {
    let mut rig = Rig::with_config(config);
    rig.caster.wall = Some(Vec2::new(14.0, 0.0));
    rig.idle_step();
    rig.idle_frame();
    rig
}

/// Slid down a right-hand wall, let go, then wall jumped inside the late window.
fn wall_jumped_off_right_wall(config: MovementConfig) -> Rig {
    let mut rig = sliding_on_right_wall_with(config);
    rig.idle_step();
    rig.caster.wall = None;
    rig.idle_step();
    rig.idle_frame();
    rig.frame(press_jump());
    assert!(rig.controller.runtime().is_wall_jumping());
    rig
}

#[test]
fn test_falling_against_wall_starts_slide() {
    let mut rig = sliding_on_right_wall();

    assert_eq!(rig.controller.state(), PlayerState::WallSlide);
    assert!(rig.controller.runtime().is_wall_sliding());
    assert_eq!(rig.controller.runtime().jumps_used, 0);

    // Full-rate lerp lands on the slide speed in one step
    let velocity = rig.idle_step();
    assert!(approx(velocity.y, -rig.config.wall_slide_speed));
}

#[test]
fn test_jump_press_on_wall_is_not_buffered() {
    let mut rig = sliding_on_right_wall();
    rig.idle_step();

    rig.frame(press_jump());

    assert!(!rig.controller.runtime().timers.jump_buffered());
    assert_eq!(rig.controller.previous_state(), Some(PlayerState::WallJump));
}

#[test]
fn test_late_wall_jump_pushes_away_from_wall() {
    let mut rig = sliding_on_right_wall();
    rig.idle_step();

    rig.caster.wall = None;
    rig.idle_step();
    rig.idle_frame();
    assert_eq!(rig.controller.state(), PlayerState::InAir);
    assert!(rig.controller.runtime().is_wall_slide_falling());
    assert_eq!(rig.controller.runtime().jumps_used, 1);

    rig.idle_frame();
    rig.frame(press_jump());

    assert_eq!(rig.controller.previous_state(), Some(PlayerState::WallJump));
    let runtime = rig.controller.runtime();
    assert!(runtime.is_wall_jumping());
    assert_eq!(runtime.vertical_velocity, rig.config.initial_wall_jump_velocity());
    assert_eq!(runtime.horizontal_velocity, -rig.config.wall_jump_horizontal_speed);

    let velocity = rig.idle_step();
    assert!(velocity.x < 0.0);
}

#[test]
fn test_wall_jump_disabled_blocks_late_jump() {
    let mut rig = sliding_on_right_wall();
    rig.config.can_wall_jump = false;
    rig.caster.wall = None;
    rig.idle_step();
    rig.idle_frame();

    assert!(!rig.controller.can_wall_jump(&rig.config));
}

// -----------------------------------------------------------------------------
// Controller: dashing
// -----------------------------------------------------------------------------

#[test]
fn test_ground_dash_respects_cooldown() {
    let config = MovementConfig {
        time_btw_dashes_on_ground: 0.3,
        ..default()
    };
    let mut rig = Rig::grounded_with(config);

    rig.frame(press_dash());
    assert_eq!(rig.controller.state(), PlayerState::Dash);
    assert_eq!(rig.controller.runtime().dashes_used, 1);

    for _ in 0..8 {
        rig.idle_step();
        rig.idle_frame();
    }
    assert_eq!(rig.controller.state(), PlayerState::Idle);
    assert!(!rig.controller.runtime().is_dashing());

    rig.frame(press_dash());
    assert!(!rig.controller.can_dash());
    assert_eq!(rig.controller.state(), PlayerState::Idle);

    for _ in 0..10 {
        rig.idle_frame();
    }
    assert!(rig.controller.can_dash());
}

#[test]
fn test_dash_moves_at_dash_speed() {
    let mut rig = Rig::grounded();
    rig.frame(press_dash());

    let velocity = rig.idle_step();

    assert_eq!(velocity.x, rig.config.dash_speed);
    assert_eq!(velocity.y, rig.config.resting_gravity);
}

#[test]
fn test_jump_out_of_dash_keeps_dash_speed() {
    let mut rig = Rig::grounded();
    rig.frame(press_dash());
    rig.frame(press_jump());

    assert_eq!(rig.controller.state(), PlayerState::InAir);
    assert!(rig.controller.runtime().is_jumping());
    assert!(rig.controller.runtime().is_dashing());

    rig.caster.ground = false;
    let velocity = rig.idle_step();

    assert_eq!(velocity.x, rig.config.dash_speed);
    let expected = rig.config.initial_jump_velocity() + rig.config.gravity() * DT;
    assert!(approx(velocity.y, expected));
}

#[test]
fn test_air_dash_refunds_wall_credit() {
    let mut rig = sliding_on_right_wall();
    rig.idle_step();
    rig.caster.wall = None;
    rig.idle_step();
    rig.idle_frame();
    assert_eq!(rig.controller.runtime().jumps_used, 1);

    rig.frame(press_dash());

    let runtime = rig.controller.runtime();
    assert_eq!(rig.controller.state(), PlayerState::Dash);
    assert!(runtime.is_air_dashing());
    assert_eq!(runtime.jumps_used, 0);
    assert_eq!(runtime.dashes_used, 1);
}

#[test]
fn test_air_dash_ends_in_fast_fall() {
    let mut rig = Rig::airborne();
    rig.frame(press_dash());
    assert!(rig.controller.runtime().is_air_dashing());

    for _ in 0..6 {
        rig.idle_step();
    }

    let runtime = rig.controller.runtime();
    assert!(!runtime.is_dashing());
    assert!(runtime.is_dash_fast_falling());
    assert!(runtime.air_dash_falling);

    rig.idle_frame();
    assert_eq!(rig.controller.state(), PlayerState::InAir);
}

#[test]
fn test_air_dashes_run_out() {
    let mut rig = Rig::airborne();
    let allowed = rig.config.number_of_dashes;
    rig.controller.runtime_mut().dashes_used = allowed;

    rig.frame(press_dash());

    assert!(!rig.controller.can_air_dash(&rig.config));
    assert_eq!(rig.controller.state(), PlayerState::InAir);
}

// -----------------------------------------------------------------------------
// Controller: ground movement
// -----------------------------------------------------------------------------

#[test]
fn test_walk_then_stop() {
    let mut rig = Rig::grounded();
    let walk = InputSnapshot {
        movement: Vec2::new(1.0, 0.0),
        ..default()
    };

    rig.frame(walk);
    assert_eq!(rig.controller.state(), PlayerState::Walk);
    let velocity = rig.step(walk);
    assert!(velocity.x > 0.0 && velocity.x <= rig.config.max_walk_speed);

    rig.idle_frame();
    assert_eq!(rig.controller.state(), PlayerState::Idle);
}

#[test]
fn test_run_speed_effect_toggles() {
    let mut rig = Rig::grounded();
    rig.controller.runtime_mut().horizontal_velocity = rig.config.max_run_speed;
    rig.controller.drain_events();

    rig.frame(InputSnapshot {
        movement: Vec2::new(1.0, 0.0),
        run_held: true,
        ..default()
    });
    assert_eq!(rig.controller.state(), PlayerState::Run);
    assert!(rig.controller.runtime().speed_effect_active);

    rig.idle_frame();
    assert_eq!(rig.controller.state(), PlayerState::Idle);

    let cues = rig.cues();
    let on = cues.iter().position(|cue| *cue == AnimationCue::SpeedEffect(true));
    let off = cues.iter().position(|cue| *cue == AnimationCue::SpeedEffect(false));
    assert!(on.is_some() && off.is_some());
    assert!(on < off);
}

// -----------------------------------------------------------------------------
// Controller: dash lifecycle and arcs
// -----------------------------------------------------------------------------

#[test]
fn test_landing_ends_a_live_dash() {
    let mut rig = Rig::grounded();
    rig.frame(press_dash());
    rig.frame(press_jump());
    assert!(rig.controller.runtime().is_dashing());

    // Ceiling kills the rise while the floor is still underfoot
    rig.caster.head = true;
    rig.idle_step();
    rig.caster.head = false;
    rig.controller.drain_events();
    rig.idle_frame();

    assert_eq!(rig.controller.state(), PlayerState::Idle);
    assert!(!rig.controller.runtime().is_dashing());
    assert!(rig.cues().contains(&AnimationCue::Dashing(false)));

    let velocity = rig.idle_step();
    assert!(velocity.x < rig.config.dash_speed);
    rig.idle_frame();
    assert!(rig.controller.can_dash());
}

#[test]
fn test_jump_release_mid_rise_blends_to_fall() {
    let mut rig = Rig::grounded();
    rig.frame(press_jump());
    rig.caster.ground = false;
    rig.idle_step();
    let rising = rig.controller.runtime().vertical_velocity;

    rig.frame(InputSnapshot {
        jump_released: true,
        ..default()
    });

    match rig.controller.runtime().mode {
        VerticalMode::Jumping(arc) => {
            assert_eq!(arc.fast_fall.map(|fall| fall.release_speed), Some(rising));
        }
        other => panic!("expected a jump, got {}", other.label()),
    }

    let held = rig.idle_step();
    let blended = rig.idle_step();
    assert_eq!(held.y, rising);
    assert!(blended.y < rising * 0.5);
}

#[test]
fn test_wall_jump_release_blends_to_fall() {
    let mut rig = wall_jumped_off_right_wall(MovementConfig::default());
    let launch = rig.config.initial_wall_jump_velocity();

    rig.frame(InputSnapshot {
        jump_released: true,
        ..default()
    });

    match rig.controller.runtime().mode {
        VerticalMode::WallJumping(wall_jump) => {
            assert_eq!(
                wall_jump.arc.fast_fall.map(|fall| fall.release_speed),
                Some(launch)
            );
        }
        other => panic!("expected a wall jump, got {}", other.label()),
    }

    rig.idle_step();
    let blended = rig.idle_step();
    assert!(blended.y < launch * 0.5);
}

#[test]
fn test_wall_jump_stats_hand_back_after_apex_time() {
    // No wall-jump deceleration, so the launch speed holds until air stats return
    let config = MovementConfig {
        wall_jump_move_deceleration: 0.0,
        ..default()
    };
    let mut rig = wall_jumped_off_right_wall(config);
    let launch = rig.controller.runtime().horizontal_velocity;

    for _ in 0..17 {
        rig.idle_step();
    }
    assert!(rig.controller.runtime().uses_wall_jump_move_stats());
    assert_eq!(rig.controller.runtime().horizontal_velocity, launch);

    rig.idle_step();
    assert!(!rig.controller.runtime().uses_wall_jump_move_stats());
    assert!(rig.controller.runtime().horizontal_velocity > launch);
}

#[test]
fn test_head_bump_ends_wall_jump_override() {
    let mut rig = wall_jumped_off_right_wall(MovementConfig::default());
    assert!(rig.controller.runtime().uses_wall_jump_move_stats());

    rig.caster.head = true;
    let velocity = rig.idle_step();

    assert!(!rig.controller.runtime().uses_wall_jump_move_stats());
    assert_eq!(velocity.y, 0.0);
}

#[test]
fn test_wall_slide_ignores_input_into_the_wall() {
    let mut rig = sliding_on_right_wall();
    let into_wall = InputSnapshot {
        movement: Vec2::new(1.0, 0.0),
        ..default()
    };

    let velocity = rig.step(into_wall);
    assert_eq!(velocity.x, 0.0);
    assert_eq!(rig.controller.runtime().facing, Facing::Right);

    let away = InputSnapshot {
        movement: Vec2::new(-1.0, 0.0),
        ..default()
    };
    let velocity = rig.step(away);
    assert!(velocity.x < 0.0);
    assert_eq!(rig.controller.runtime().facing, Facing::Left);
}

#[test]
fn test_coyote_refills_only_after_regrounding() {
    let mut rig = Rig::grounded();
    rig.caster.ground = false;
    rig.idle_step();
    rig.idle_frame();
    rig.frame(press_jump());
    assert!(rig.controller.runtime().is_jumping());

    for _ in 0..3 {
        rig.idle_step();
        rig.idle_frame();
        assert!(!rig.controller.runtime().timers.coyote_open());
    }

    // Come down onto the floor
    rig.controller.runtime_mut().vertical_velocity = -10.0;
    rig.caster.ground = true;
    rig.idle_step();
    rig.idle_frame();
    assert_eq!(rig.controller.state(), PlayerState::Idle);
    assert_eq!(rig.controller.runtime().timers.coyote, rig.config.jump_coyote_time);

    // Walking off again grants a fresh coyote jump
    rig.caster.ground = false;
    rig.idle_step();
    rig.idle_frame();
    rig.frame(press_jump());
    assert_eq!(
        rig.controller.previous_state(),
        Some(PlayerState::Jump(JumpKind::Primary))
    );
    assert_eq!(rig.controller.runtime().jumps_used, 1);
}
