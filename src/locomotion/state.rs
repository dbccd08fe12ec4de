use crate::scene::Facing;
use std::mem::discriminant;

/// The primary animation the figure is in. Exactly one is active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stance {
    /// Walking and steering.
    Idle,
    JumpingUp,
    JumpingForward,
    FallingDown,
    /// Lying down for `settle` more seconds, then straightening up.
    GettingUp { settle: f32 },
}

impl Default for Stance {
    fn default() -> Self {
        Self::Idle
    }
}

/// Phase of a jump's arm swing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swing {
    Forward,
    Return,
}

impl Default for Swing {
    fn default() -> Self {
        Self::Forward
    }
}

/// Everything the state machine remembers between frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub stance: Stance,
    pub facing: Facing,
    pub swing: Swing,
    /// A jump's swing is still running and must not be retriggered.
    pub animating: bool,
    /// Nodding direction: `false` while the head dips, `true` while it lifts.
    pub head_rising: bool,
    pub vertical_velocity: f32,
    pub jump_cooldown: f32,
}

impl AnimationState {
    pub fn enter(&mut self, stance: Stance) {
        if discriminant(&self.stance) != discriminant(&stance) {
            tracing::debug!("stance {:?} -> {:?}", self.stance, stance);
        }
        self.stance = stance;
    }

    pub fn is_down(&self) -> bool {
        matches!(self.stance, Stance::FallingDown | Stance::GettingUp { .. })
    }

    pub fn is_jumping(&self) -> bool {
        matches!(self.stance, Stance::JumpingUp | Stance::JumpingForward)
    }
}
