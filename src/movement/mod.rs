//! Movement domain: player controller plugin wiring and public exports.
//!
//! The controller core (config, timers, probe, kinematics, dash, states) is
//! plain data and functions; the `systems` modules adapt it to the ECS.

mod actions;
mod bootstrap;
mod components;
mod config;
mod controller;
mod dash;
mod events;
mod kinematics;
mod loader;
mod probe;
mod resources;
mod runtime;
mod state_machine;
mod states;
mod systems;
mod timers;

#[cfg(test)]
mod tests;

pub use components::{BodyFrame, Facing, GameLayer, Ground, Player};
pub use config::{ConfigValidationError, DASH_DIRECTIONS, MovementConfig};
pub use controller::PlayerController;
pub use dash::{DashMotion, resolve_dash_direction};
pub use events::{
    AnimationCue, ControllerEvent, MovementCueEvent, ParticleKind, ParticleSpawnEvent,
    SpawnRequest,
};
pub use kinematics::{FastFall, JumpArc, WallJumpArc};
pub use loader::{ConfigLoadError, MovementConfigPath, load_movement_config, parse_movement_config};
pub use probe::{AvianBoxCaster, BoxCast, BoxCaster, Contacts, ProbeHit, ProbeResult};
pub use resources::InputSnapshot;
pub use runtime::{HeightTracker, PlayerRuntimeState, VerticalMode};
pub use state_machine::{JumpKind, PlayerState, StateMachine};
pub use timers::TimerBank;

use bevy::prelude::*;

use crate::movement::bootstrap::{spawn_player, spawn_test_room, sync_world_gravity};
use crate::movement::loader::apply_movement_config_file;
use crate::movement::systems::{
    read_input, step_controllers, sync_facing, update_controllers, verify_player_wiring,
};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementConfig>()
            .init_resource::<MovementConfigPath>()
            .init_resource::<InputSnapshot>()
            .add_message::<MovementCueEvent>()
            .add_message::<ParticleSpawnEvent>()
            .add_systems(
                Startup,
                (
                    apply_movement_config_file,
                    sync_world_gravity,
                    spawn_test_room,
                    spawn_player,
                )
                    .chain(),
            )
            .add_systems(PostStartup, verify_player_wiring)
            // Frame tick: sample input, then timers and transitions
            .add_systems(Update, (read_input, update_controllers, sync_facing).chain())
            // Physics tick: probe, integrate, write velocity before the solver
            .add_systems(FixedUpdate, step_controllers);
    }
}
