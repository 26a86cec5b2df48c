//! Movement domain: controller states and the single-slot machine holding them.

use std::fmt;

/// Which predicate granted a jump; decides particles and credit cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Grounded, or inside coyote time
    Primary,
    /// Double jump from a jump, wall jump, wall-slide fall or dash
    Air,
    /// Walked off a ledge and missed coyote time; costs one extra credit
    CoyoteExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Walk,
    Run,
    Jump(JumpKind),
    InAir,
    WallSlide,
    WallJump,
    Dash,
}

impl PlayerState {
    pub fn name(self) -> &'static str {
        match self {
            PlayerState::Idle => "Idle",
            PlayerState::Walk => "Walk",
            PlayerState::Run => "Run",
            PlayerState::Jump(_) => "Jump",
            PlayerState::InAir => "InAir",
            PlayerState::WallSlide => "WallSlide",
            PlayerState::WallJump => "WallJump",
            PlayerState::Dash => "Dash",
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Holds the current state. Enter/exit dispatch lives on the controller,
/// which owns the data the states act on.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: PlayerState,
    previous: Option<PlayerState>,
    transitions: u64,
}

impl StateMachine {
    pub fn current(&self) -> PlayerState {
        self.current
    }

    pub fn previous(&self) -> Option<PlayerState> {
        self.previous
    }

    /// Monotonic count of transitions; lets an update tell whether it has
    /// already handed control to another state.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub(crate) fn set(&mut self, next: PlayerState) {
        self.previous = Some(self.current);
        self.current = next;
        self.transitions += 1;
    }
}
