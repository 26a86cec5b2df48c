//! Movement domain: fixed-step probing and velocity application.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::frame::forward_events;
use crate::movement::{
    AvianBoxCaster, BodyFrame, InputSnapshot, MovementConfig, MovementCueEvent,
    ParticleSpawnEvent, Player, PlayerController,
};

const FALLBACK_HALF_EXTENTS: Vec2 = Vec2::new(12.0, 24.0);

pub(crate) fn step_controllers(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    config: Res<MovementConfig>,
    input: Res<InputSnapshot>,
    mut query: Query<
        (
            Entity,
            &Transform,
            &Collider,
            &mut PlayerController,
            &mut LinearVelocity,
        ),
        With<Player>,
    >,
    mut cues: MessageWriter<MovementCueEvent>,
    mut particles: MessageWriter<ParticleSpawnEvent>,
) {
    let dt = time.delta_secs();

    for (entity, transform, collider, mut controller, mut velocity) in &mut query {
        let half_extents = match collider.shape_scaled().as_cuboid() {
            Some(c) => Vec2::new(c.half_extents.x, c.half_extents.y),
            None => FALLBACK_HALF_EXTENTS,
        };
        let body = BodyFrame::new(transform.translation.truncate(), half_extents);

        let caster = AvianBoxCaster {
            spatial_query: &spatial_query,
            exclude: entity,
        };

        velocity.0 = controller.physics_step(&caster, &config, body, &input, dt);
        forward_events(entity, &mut controller, &mut cues, &mut particles);
    }
}

/// Report players spawned without the physics components the controller
/// needs. Such players never get a physics step.
pub(crate) fn verify_player_wiring(
    query: Query<(Entity, Has<Collider>, Has<LinearVelocity>, Has<PlayerController>), With<Player>>,
) {
    for (entity, has_collider, has_velocity, has_controller) in &query {
        if !has_collider {
            error!("Player {:?} has no Collider; movement disabled", entity);
        }
        if !has_velocity {
            error!("Player {:?} has no LinearVelocity; movement disabled", entity);
        }
        if !has_controller {
            error!("Player {:?} has no PlayerController; movement disabled", entity);
        }
    }
}
