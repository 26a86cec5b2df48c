//! Movement domain: cues raised by the controller for animation and FX.

use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Named animation trigger or boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCue {
    Jump,
    Land,
    Fall,
    Walking(bool),
    Running(bool),
    WallSliding(bool),
    Dashing(bool),
    AirDashFalling(bool),
    /// Run-speed particles
    SpeedEffect(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Jump,
    SecondJump,
    Land,
    Dash,
}

/// Request to spawn a one-shot particle effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: ParticleKind,
    /// World position, bottom-centre of the body
    pub anchor: Vec2,
    /// Radians, counter-clockwise from +X. Zero except for dash particles.
    pub rotation: f32,
}

/// Everything the controller emits, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    Animation(AnimationCue),
    Spawn(SpawnRequest),
}

/// Message fired for each animation cue a player controller raises
#[derive(Debug, Clone, Copy)]
pub struct MovementCueEvent {
    pub entity: Entity,
    pub cue: AnimationCue,
}

impl Message for MovementCueEvent {}

/// Message fired when a player controller asks for particles
#[derive(Debug, Clone, Copy)]
pub struct ParticleSpawnEvent {
    pub entity: Entity,
    pub request: SpawnRequest,
}

impl Message for ParticleSpawnEvent {}
