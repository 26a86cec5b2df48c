//! Movement domain: per-frame controller systems.

use bevy::prelude::*;

use crate::movement::{
    ControllerEvent, Facing, InputSnapshot, MovementConfig, MovementCueEvent, ParticleSpawnEvent,
    Player, PlayerController,
};

pub(crate) fn update_controllers(
    time: Res<Time>,
    config: Res<MovementConfig>,
    input: Res<InputSnapshot>,
    mut query: Query<(Entity, &mut PlayerController), With<Player>>,
    mut cues: MessageWriter<MovementCueEvent>,
    mut particles: MessageWriter<ParticleSpawnEvent>,
) {
    let dt = time.delta_secs();

    for (entity, mut controller) in &mut query {
        controller.frame_update(&config, &input, dt);
        forward_events(entity, &mut controller, &mut cues, &mut particles);
    }
}

/// Publish the controller's pending events as messages.
pub(crate) fn forward_events(
    entity: Entity,
    controller: &mut PlayerController,
    cues: &mut MessageWriter<MovementCueEvent>,
    particles: &mut MessageWriter<ParticleSpawnEvent>,
) {
    for event in controller.drain_events() {
        match event {
            ControllerEvent::Animation(cue) => {
                cues.write(MovementCueEvent { entity, cue });
            }
            ControllerEvent::Spawn(request) => {
                particles.write(ParticleSpawnEvent { entity, request });
            }
        }
    }
}

/// Mirror the controller's facing onto the sprite.
pub(crate) fn sync_facing(mut query: Query<(&PlayerController, &mut Sprite), With<Player>>) {
    for (controller, mut sprite) in &mut query {
        let flip = controller.runtime().facing == Facing::Left;
        if sprite.flip_x != flip {
            sprite.flip_x = flip;
        }
    }
}
