//! Frame-stepped walk / jump / fall state machine for the [`Figure`].
//!
//! Each call to [`Locomotion::step`] resolves ground contact first, then runs
//! exactly one of falling down, getting up, or the upright stances (nodding
//! plus at most one of jump up, jump forward, or steering).

mod routines;
pub mod state;

pub use self::state::{AnimationState, Stance, Swing};

use self::routines::Rig;
use crate::config::Tunables;
use crate::input::{Controls, InputFrame};
use crate::probe::SpatialProbe;
use crate::scene::{Facing, Figure};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub on_ground: bool,
    pub stance: Stance,
}

#[derive(Clone, Debug, Default)]
pub struct Locomotion {
    pub tunables: Tunables,
}

impl Locomotion {
    pub fn new(tunables: Tunables) -> Self {
        Self { tunables }
    }

    pub fn step<P>(
        &self,
        figure: &mut Figure,
        state: &mut AnimationState,
        input: &InputFrame,
        probe: &P,
        dt: f32,
    ) -> StepReport
    where
        P: SpatialProbe + ?Sized,
    {
        if !state.is_down() && input.just_pressed(Controls::FALL) {
            // A fall cuts any jump short.
            state.animating = false;
            state.enter(Stance::FallingDown);
        }

        let on_ground = self.apply_vertical_momentum(figure, state, probe, dt);

        match state.stance {
            Stance::FallingDown => {
                let mut rig = Rig::new(figure, state, dt);
                routines::fall_down(&mut rig, state, self.tunables.settle_time);
            }
            Stance::GettingUp { .. } => {
                let mut rig = Rig::new(figure, state, dt);
                routines::get_up(&mut rig, state);
            }
            _ => self.step_upright(figure, state, input, probe, on_ground, dt),
        }

        StepReport {
            on_ground,
            stance: state.stance,
        }
    }

    fn step_upright<P>(
        &self,
        figure: &mut Figure,
        state: &mut AnimationState,
        input: &InputFrame,
        probe: &P,
        on_ground: bool,
        dt: f32,
    ) where
        P: SpatialProbe + ?Sized,
    {
        routines::nod(&mut Rig::new(figure, state, dt), state);

        match state.stance {
            Stance::JumpingUp => routines::jump_up(&mut Rig::new(figure, state, dt), state),
            Stance::JumpingForward => {
                routines::jump_forward(&mut Rig::new(figure, state, dt), state);
                if !on_ground {
                    self.walk(figure, state, probe, on_ground, dt);
                }
            }
            _ => {
                if input.is_held(Controls::LEFT) {
                    state.facing = Facing::Left;
                } else if input.is_held(Controls::RIGHT) {
                    state.facing = Facing::Right;
                }

                self.walk(figure, state, probe, on_ground, dt);

                if input.is_held(Controls::JUMP_UP) {
                    if self.begin_jump(state, Stance::JumpingUp) {
                        routines::jump_up(&mut Rig::new(figure, state, dt), state);
                    }
                } else if input.is_held(Controls::JUMP_FORWARD)
                    && self.begin_jump(state, Stance::JumpingForward)
                {
                    routines::jump_forward(&mut Rig::new(figure, state, dt), state);
                }
            }
        }

        if on_ground {
            state.jump_cooldown = (state.jump_cooldown - dt).max(0.0);
            if state.jump_cooldown <= 0.0 && !state.animating && state.is_jumping() {
                state.enter(Stance::Idle);
            }
        }
    }

    /// Starts a jump if none is running and the cooldown has expired.
    fn begin_jump(&self, state: &mut AnimationState, stance: Stance) -> bool {
        if state.animating || state.jump_cooldown > 0.0 {
            return false;
        }

        state.vertical_velocity = match stance {
            Stance::JumpingForward => self.tunables.jump_forward_velocity,
            _ => self.tunables.jump_up_velocity,
        };
        state.jump_cooldown = self.tunables.jump_cooldown;
        state.animating = true;
        state.swing = Swing::Forward;
        state.enter(stance);
        true
    }

    /// Snaps to the ground when falling onto it, otherwise integrates gravity.
    /// Returns whether the figure is standing on something.
    fn apply_vertical_momentum<P>(
        &self,
        figure: &mut Figure,
        state: &mut AnimationState,
        probe: &P,
        dt: f32,
    ) -> bool
    where
        P: SpatialProbe + ?Sized,
    {
        let ground = probe.cast(figure.base_point(), Vec2::NEG_Y, self.tunables.ground_probe);
        match ground {
            Some(hit) if state.vertical_velocity <= 0.0 => {
                figure.translate(Vec2::new(0.0, -hit.distance));
                state.vertical_velocity = 0.0;
                true
            }
            _ => {
                figure.translate(Vec2::new(0.0, state.vertical_velocity * dt));
                state.vertical_velocity += self.tunables.gravity * dt;
                false
            }
        }
    }

    /// Moves sideways. A wall ahead turns the figure around when grounded and
    /// just blocks it when airborne. Either way the figure does not move on
    /// the frame it meets the wall; after a turn it walks away on the next one.
    fn walk<P>(
        &self,
        figure: &mut Figure,
        state: &mut AnimationState,
        probe: &P,
        on_ground: bool,
        dt: f32,
    ) where
        P: SpatialProbe + ?Sized,
    {
        let speed = if on_ground {
            self.tunables.walking_speed
        } else {
            self.tunables.airborne_speed
        };
        let distance = speed * dt;
        let direction = state.facing.unit();

        if probe
            .cast(figure.front_point(state.facing), direction, distance)
            .is_some()
        {
            if on_ground {
                state.facing = state.facing.flipped();
                tracing::trace!("hit a wall, now facing {:?}", state.facing);
            }
            return;
        }

        figure.translate(direction * distance);
    }
}
