//! Movement domain: components and physics layers for locomotion.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Level geometry: floors, ceilings, walls and platforms
    Ground,
    /// Player character
    Player,
}

#[derive(Component, Debug)]
pub struct Player;

/// Marker for level colliders the probe can hit
#[derive(Component, Debug)]
pub struct Ground;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn direction(self) -> Dir2 {
        match self {
            Facing::Right => Dir2::X,
            Facing::Left => Dir2::NEG_X,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }
}

/// Where the body collider sat at the start of the current physics step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyFrame {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl BodyFrame {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// Bottom-centre of the collider, used as the particle anchor.
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.center.x, self.bottom())
    }
}
