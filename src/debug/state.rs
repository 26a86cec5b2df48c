//! Debug domain: overlay state.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::movement::AnimationCue;

/// How many recent controller cues the overlay lists.
pub const RECENT_CUE_CAPACITY: usize = 8;

/// Resource tracking debug overlay state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Whether the controller info overlay is shown
    pub show_info: bool,
    /// Most recent cues, newest last
    pub recent_cues: VecDeque<AnimationCue>,
}

impl DebugState {
    pub fn record_cue(&mut self, cue: AnimationCue) {
        if self.recent_cues.len() == RECENT_CUE_CAPACITY {
            self.recent_cues.pop_front();
        }
        self.recent_cues.push_back(cue);
    }
}
