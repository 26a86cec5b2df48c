//! Movement domain: per-frame input resource.

use bevy::prelude::*;

/// Input sampled once per frame. Edges are true only on the frame they happen.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub movement: Vec2,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub dash_pressed: bool,
    pub run_held: bool,
}
