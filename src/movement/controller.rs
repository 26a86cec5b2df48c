//! Movement domain: the player controller component.
//!
//! A frame update advances timers, reads input edges and runs the current
//! state's transition checks. A physics step probes the environment, runs the
//! current state's kinematics and returns the velocity for the rigid body.
//! Transitions happen immediately: checks later in the same update see the
//! state the transition left behind.

use bevy::prelude::*;

use crate::movement::events::{AnimationCue, ControllerEvent, ParticleKind, SpawnRequest};
use crate::movement::probe::{BoxCaster, probe_environment};
use crate::movement::runtime::PlayerRuntimeState;
use crate::movement::state_machine::{PlayerState, StateMachine};
use crate::movement::{BodyFrame, InputSnapshot, MovementConfig};

/// Everything one update or step reads besides the controller itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tick<'a> {
    pub config: &'a MovementConfig,
    pub input: &'a InputSnapshot,
    pub dt: f32,
}

#[derive(Component, Debug, Clone, Default)]
pub struct PlayerController {
    pub(crate) machine: StateMachine,
    pub(crate) runtime: PlayerRuntimeState,
    pub(crate) events: Vec<ControllerEvent>,
}

impl PlayerController {
    pub fn new(config: &MovementConfig) -> Self {
        let mut controller = Self::default();
        controller.runtime.vertical_velocity = config.resting_gravity;
        controller.runtime.timers.coyote = config.jump_coyote_time;
        controller
    }

    pub fn state(&self) -> PlayerState {
        self.machine.current()
    }

    pub fn previous_state(&self) -> Option<PlayerState> {
        self.machine.previous()
    }

    pub fn runtime(&self) -> &PlayerRuntimeState {
        &self.runtime
    }

    #[cfg(test)]
    pub(crate) fn runtime_mut(&mut self) -> &mut PlayerRuntimeState {
        &mut self.runtime
    }

    /// Take the events raised since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Per-frame update: timers, input edges, falling detection, then the
    /// current state's transitions.
    pub fn frame_update(&mut self, config: &MovementConfig, input: &InputSnapshot, dt: f32) {
        let tick = Tick { config, input, dt };

        self.update_timers(&tick);
        self.jump_input_checks(&tick);
        self.wall_jump_checks(&tick);
        self.check_for_falling(&tick);

        self.update_state(self.machine.current(), &tick);
    }

    /// Per-physics-step update. Returns the velocity to hand the rigid body.
    pub fn physics_step<C: BoxCaster + ?Sized>(
        &mut self,
        caster: &C,
        config: &MovementConfig,
        body: BodyFrame,
        input: &InputSnapshot,
        dt: f32,
    ) -> Vec2 {
        let tick = Tick { config, input, dt };

        self.runtime.body = body;
        let probe = probe_environment(caster, &body, self.runtime.facing, config);
        self.runtime.contacts.apply(probe);

        self.fixed_update_state(self.machine.current(), &tick);

        if !self.runtime.is_grounded() {
            self.runtime.height.observe(body.feet().y);
        }

        self.apply_velocity(config)
    }

    /// Exit the current state and enter `next`, following any state that
    /// hands off on entry.
    pub(crate) fn change_state(&mut self, next: PlayerState, tick: &Tick) {
        let mut pending = Some(next);

        while let Some(state) = pending.take() {
            let leaving = self.machine.current();
            self.exit_state(leaving, tick);
            self.machine.set(state);
            debug!("Entered state {} (from {})", state, leaving);
            pending = self.enter_state(state, tick);
        }
    }

    /// Clamp vertical speed and produce the final velocity.
    pub(crate) fn apply_velocity(&mut self, config: &MovementConfig) -> Vec2 {
        let limit = config.vertical_speed_limit;
        let runtime = &mut self.runtime;

        runtime.vertical_velocity = if runtime.is_dashing() {
            runtime.vertical_velocity.clamp(-limit, limit)
        } else {
            runtime
                .vertical_velocity
                .clamp(-config.max_fall_speed, limit)
        };

        Vec2::new(runtime.horizontal_velocity, runtime.vertical_velocity)
    }

    pub(crate) fn cue(&mut self, cue: AnimationCue) {
        self.events.push(ControllerEvent::Animation(cue));
    }

    pub(crate) fn spawn(&mut self, kind: ParticleKind, rotation: f32) {
        self.events.push(ControllerEvent::Spawn(SpawnRequest {
            kind,
            anchor: self.runtime.body.feet(),
            rotation,
        }));
    }
}
