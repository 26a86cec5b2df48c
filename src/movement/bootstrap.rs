//! Movement domain: player spawn and the bootstrap test room.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{GameLayer, Ground, MovementConfig, Player, PlayerController};

const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 48.0);
const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, -200.0, 1.0);

/// Spawn the controllable player with the physics body the controller drives.
pub(crate) fn spawn_player(mut commands: Commands, config: Res<MovementConfig>) {
    commands.spawn((
        // Identity & movement
        (Player, PlayerController::new(&config)),
        // Rendering
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(PLAYER_SIZE),
            ..default()
        },
        Transform::from_translation(PLAYER_SPAWN),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(0.0), // The controller integrates gravity itself
            Friction::new(0.0),
            CollisionLayers::new(GameLayer::Player, [GameLayer::Ground]),
        ),
    ));

    info!(
        "Spawned player at ({:.0}, {:.0})",
        PLAYER_SPAWN.x, PLAYER_SPAWN.y
    );
}

/// Keep avian's world gravity in step with the controller's resting gravity.
pub(crate) fn sync_world_gravity(config: Res<MovementConfig>, mut gravity: ResMut<Gravity>) {
    gravity.0 = Vec2::new(0.0, config.resting_gravity);
}

#[derive(Debug, Clone, Copy)]
enum PieceKind {
    Floor,
    Wall,
    Platform,
}

impl PieceKind {
    fn color(self) -> Color {
        match self {
            PieceKind::Floor => Color::srgb(0.4, 0.5, 0.4),
            PieceKind::Wall => Color::srgb(0.3, 0.3, 0.4),
            PieceKind::Platform => Color::srgb(0.5, 0.4, 0.3),
        }
    }
}

/// (kind, center, size)
const TEST_ROOM: [(PieceKind, Vec2, Vec2); 8] = [
    (PieceKind::Floor, Vec2::new(0.0, -300.0), Vec2::new(1600.0, 40.0)),
    (PieceKind::Wall, Vec2::new(-820.0, 50.0), Vec2::new(40.0, 740.0)),
    (PieceKind::Wall, Vec2::new(820.0, 50.0), Vec2::new(40.0, 740.0)),
    (PieceKind::Platform, Vec2::new(-300.0, -120.0), Vec2::new(200.0, 20.0)),
    (PieceKind::Platform, Vec2::new(150.0, 20.0), Vec2::new(200.0, 20.0)),
    (PieceKind::Platform, Vec2::new(500.0, 180.0), Vec2::new(160.0, 20.0)),
    // Wall-jump shaft: two pillars close enough to bounce between
    (PieceKind::Wall, Vec2::new(-640.0, -80.0), Vec2::new(30.0, 400.0)),
    (PieceKind::Wall, Vec2::new(-470.0, 40.0), Vec2::new(30.0, 400.0)),
];

pub(crate) fn spawn_test_room(mut commands: Commands) {
    // Everything the player stands on or slides down is on the ground layer.
    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);

    for (kind, center, size) in TEST_ROOM {
        commands.spawn((
            Ground,
            Sprite {
                color: kind.color(),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(center.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            ground_layers,
        ));
    }

    debug!("Spawned test room with {} pieces", TEST_ROOM.len());
}
