//! Debug domain: on-screen controller overlay (dev-tools only).
//!
//! F3 toggles a panel with the player's state, vertical mode, velocity,
//! contacts, timers, counters and the most recent controller cues.

mod state;
mod systems;
mod ui;

pub use state::DebugState;

use bevy::prelude::*;

use crate::debug::systems::{record_movement_cues, toggle_debug_info, update_debug_info_overlay};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_systems(Update, (toggle_debug_info, record_movement_cues).chain())
            .add_systems(
                Update,
                update_debug_info_overlay.run_if(|state: Res<DebugState>| state.show_info),
            );
    }
}
