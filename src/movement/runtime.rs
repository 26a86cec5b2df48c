//! Movement domain: the mutable state a controller owns.

use bevy::prelude::*;

use crate::movement::dash::DashMotion;
use crate::movement::kinematics::{FastFall, JumpArc, WallJumpArc};
use crate::movement::probe::Contacts;
use crate::movement::timers::TimerBank;
use crate::movement::{BodyFrame, Facing};

/// Who drives vertical velocity right now.
///
/// Exactly one variant is active, so a jump, a wall slide, a wall jump and
/// a dash can never integrate vertical motion in the same step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VerticalMode {
    #[default]
    Grounded,
    Jumping(JumpArc),
    /// Airborne without a jump: walked off a ledge or let go of a wall
    Falling { after_wall_slide: bool },
    WallSliding,
    WallJumping(WallJumpArc),
    Dashing,
    /// Recovering from an airborne dash
    DashFastFalling(FastFall),
}

impl VerticalMode {
    pub fn label(&self) -> &'static str {
        match self {
            VerticalMode::Grounded => "grounded",
            VerticalMode::Jumping(_) => "jumping",
            VerticalMode::Falling {
                after_wall_slide: false,
            } => "falling",
            VerticalMode::Falling {
                after_wall_slide: true,
            } => "wall-slide falling",
            VerticalMode::WallSliding => "wall sliding",
            VerticalMode::WallJumping(_) => "wall jumping",
            VerticalMode::Dashing => "dashing",
            VerticalMode::DashFastFalling(_) => "dash fast falling",
        }
    }
}

/// Highest point reached since the last jump started.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeightTracker {
    pub start: f32,
    pub highest: f32,
}

impl HeightTracker {
    pub fn restart(&mut self, y: f32) {
        self.start = y;
        self.highest = y;
    }

    pub fn observe(&mut self, y: f32) {
        self.highest = self.highest.max(y);
    }

    pub fn gained(&self) -> f32 {
        self.highest - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerRuntimeState {
    pub horizontal_velocity: f32,
    pub vertical_velocity: f32,
    pub facing: Facing,
    pub contacts: Contacts,
    pub mode: VerticalMode,
    /// Active dash. Usually paired with `VerticalMode::Dashing`; a jump out of
    /// a dash keeps the dash's horizontal drive while the jump owns vertical.
    pub dash: Option<DashMotion>,
    pub jumps_used: u32,
    pub dashes_used: u32,
    pub timers: TimerBank,
    pub jump_released_during_buffer: bool,
    /// Air-dash-falling animation flag; holds a landing back one frame
    pub air_dash_falling: bool,
    pub speed_effect_active: bool,
    /// Body position seen by the latest physics step
    pub body: BodyFrame,
    pub height: HeightTracker,
}

impl PlayerRuntimeState {
    pub fn is_grounded(&self) -> bool {
        self.contacts.grounded
    }

    pub fn is_touching_wall(&self) -> bool {
        self.contacts.touching_wall
    }

    pub fn is_jumping(&self) -> bool {
        matches!(self.mode, VerticalMode::Jumping(_))
    }

    pub fn is_wall_jumping(&self) -> bool {
        matches!(self.mode, VerticalMode::WallJumping(_))
    }

    pub fn is_wall_sliding(&self) -> bool {
        self.mode == VerticalMode::WallSliding
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.mode, VerticalMode::Falling { .. })
    }

    pub fn is_wall_slide_falling(&self) -> bool {
        self.mode
            == VerticalMode::Falling {
                after_wall_slide: true,
            }
    }

    pub fn is_dash_fast_falling(&self) -> bool {
        matches!(self.mode, VerticalMode::DashFastFalling(_))
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    pub fn is_air_dashing(&self) -> bool {
        self.dash.is_some_and(|dash| dash.airborne)
    }

    /// Any airborne motion a landing should end.
    pub fn is_landable(&self) -> bool {
        !matches!(self.mode, VerticalMode::Grounded | VerticalMode::Dashing)
    }

    /// Wall-jump arc still overriding air control with wall-jump stats.
    pub fn uses_wall_jump_move_stats(&self) -> bool {
        matches!(self.mode, VerticalMode::WallJumping(arc) if arc.override_movement)
    }
}
