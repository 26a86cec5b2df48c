//! Debug domain: overlay toggling and refresh.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::debug::state::DebugState;
use crate::debug::ui::{DebugInfoOverlay, spawn_debug_info_overlay};
use crate::movement::{MovementCueEvent, Player, PlayerController};

/// Toggle the controller overlay with F3
pub(crate) fn toggle_debug_info(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    if !keyboard.just_pressed(KeyCode::F3) {
        return;
    }

    debug_state.show_info = !debug_state.show_info;
    info!(
        "[DEBUG] Controller info {}",
        if debug_state.show_info { "ON" } else { "OFF" }
    );

    if debug_state.show_info {
        spawn_debug_info_overlay(&mut commands);
    } else {
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
    }
}

pub(crate) fn record_movement_cues(
    mut cues: MessageReader<MovementCueEvent>,
    mut debug_state: ResMut<DebugState>,
) {
    for event in cues.read() {
        debug_state.record_cue(event.cue);
    }
}

/// Update the overlay with the player's controller state
pub(crate) fn update_debug_info_overlay(
    debug_state: Res<DebugState>,
    player_query: Query<(&Transform, &PlayerController), With<Player>>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
) {
    if let (Some((transform, controller)), Ok(mut text)) =
        (player_query.iter().next(), overlay_query.single_mut())
    {
        **text = format_controller_info(transform.translation.truncate(), controller, &debug_state);
    }
}

pub(crate) fn format_controller_info(
    position: Vec2,
    controller: &PlayerController,
    debug_state: &DebugState,
) -> String {
    let runtime = controller.runtime();
    let contacts = &runtime.contacts;
    let timers = &runtime.timers;

    let cues = debug_state
        .recent_cues
        .iter()
        .map(|cue| format!("{:?}", cue))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Pos: ({:.0}, {:.0})\nState: {} (prev {})\nMode: {}\nVel: ({:.1}, {:.1})\n\
         Grounded: {}  Wall: {}  Head: {}\n\
         Buffer: {:.3}  Coyote: {:.3}  WallJump: {:.3}  DashCd: {:.3}\n\
         Jumps: {}  Dashes: {}\nCues: {}",
        position.x,
        position.y,
        controller.state(),
        controller
            .previous_state()
            .map(|s| s.name())
            .unwrap_or("-"),
        runtime.mode.label(),
        runtime.horizontal_velocity,
        runtime.vertical_velocity,
        contacts.grounded,
        contacts.touching_wall,
        contacts.bumped_head,
        timers.jump_buffer,
        timers.coyote,
        timers.wall_jump_post_buffer,
        timers.ground_dash_cooldown,
        runtime.jumps_used,
        runtime.dashes_used,
        cues,
    )
}
