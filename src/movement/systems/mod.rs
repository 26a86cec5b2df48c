//! Movement domain: system modules for the player controller.

pub(crate) mod frame;
pub(crate) mod input;
pub(crate) mod physics;

pub(crate) use frame::{sync_facing, update_controllers};
pub(crate) use input::read_input;
pub(crate) use physics::{step_controllers, verify_player_wiring};
