//! Core domain: camera, clear colour and the fixed physics rate.

mod systems;

use bevy::prelude::*;

use crate::core::systems::setup_camera;

/// Physics steps per second (0.02 s per step).
pub const PHYSICS_HZ: f64 = 50.0;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ))
            .insert_resource(ClearColor(Color::srgb(0.08, 0.08, 0.12)))
            .add_systems(Startup, setup_camera);
    }
}
