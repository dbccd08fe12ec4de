//! Per-frame joint motions for each stance.
//!
//! Angles and rates below are written for a figure facing right. `Rig`
//! mirrors both for a figure facing left, so every guard is a one-sided
//! crossing test on the mirrored angle.

use super::state::{AnimationState, Stance, Swing};
use crate::scene::{Figure, Joint};

use Joint::{Head, LowerArm, UpperArm};

pub(super) struct Rig<'a> {
    figure: &'a mut Figure,
    sign: f32,
    dt: f32,
}

impl<'a> Rig<'a> {
    pub fn new(figure: &'a mut Figure, state: &AnimationState, dt: f32) -> Self {
        Self {
            figure,
            sign: state.facing.sign(),
            dt,
        }
    }

    /// Joint angle as seen by a figure facing right.
    fn angle(&self, joint: Joint) -> f32 {
        self.figure.angle(joint) * self.sign
    }

    /// Turns `joint` at `rate` degrees per second for this frame.
    fn turn(&mut self, joint: Joint, rate: f32) {
        self.figure.rotate(joint, rate * self.dt * self.sign);
    }

    fn straighten(&mut self, joint: Joint) {
        self.figure.straighten(joint);
    }
}

pub(super) fn fall_down(rig: &mut Rig, state: &mut AnimationState, settle_time: f32) {
    if rig.angle(Head) < 0.0 {
        rig.turn(Head, 160.0);
    }
    if rig.angle(LowerArm) < 15.0 {
        rig.turn(LowerArm, 80.0);
    }

    if rig.angle(UpperArm) > -110.0 {
        rig.turn(UpperArm, -200.0);
    } else {
        state.enter(Stance::GettingUp {
            settle: settle_time,
        });
    }
}

pub(super) fn get_up(rig: &mut Rig, state: &mut AnimationState) {
    if let Stance::GettingUp { settle } = &mut state.stance {
        if *settle > 0.0 {
            *settle -= rig.dt;
            return;
        }
    }

    let upper = rig.angle(UpperArm);
    if upper < -60.0 {
        rig.turn(UpperArm, 40.0);
        rig.turn(LowerArm, 30.0);
        rig.turn(Head, 30.0);
    } else if upper < 0.0 {
        rig.turn(UpperArm, 100.0);
        if rig.angle(LowerArm) > 0.0 {
            rig.turn(LowerArm, -100.0);
        }
        if rig.angle(Head) > 0.0 {
            rig.turn(Head, -50.0);
        }
    } else {
        rig.straighten(UpperArm);
        rig.straighten(LowerArm);
        rig.straighten(Head);
        state.enter(Stance::Idle);
    }
}

/// Arm swing shared by both jumps. `lower` is the lower arm's rate during
/// the forward swing; it swings back at the opposite rate.
struct JumpSwing {
    peak: f32,
    upper: f32,
    lower: f32,
}

const JUMP_UP: JumpSwing = JumpSwing {
    peak: 15.0,
    upper: 50.0,
    lower: 40.0,
};

const JUMP_FORWARD: JumpSwing = JumpSwing {
    peak: 30.0,
    upper: 60.0,
    lower: -20.0,
};

pub(super) fn jump_up(rig: &mut Rig, state: &mut AnimationState) {
    swing(rig, state, &JUMP_UP);
}

pub(super) fn jump_forward(rig: &mut Rig, state: &mut AnimationState) {
    swing(rig, state, &JUMP_FORWARD);
}

fn swing(rig: &mut Rig, state: &mut AnimationState, jump: &JumpSwing) {
    let upper = rig.angle(UpperArm);
    match state.swing {
        Swing::Forward if upper < jump.peak => {
            rig.turn(UpperArm, jump.upper);
            if rig.angle(UpperArm) >= jump.peak {
                state.swing = Swing::Return;
            }
            rig.turn(LowerArm, jump.lower);
        }
        Swing::Return if upper > 0.0 => {
            rig.turn(UpperArm, -jump.upper);
            // The lower arm only swings back while it is still displaced
            // in the forward-swing direction.
            if rig.angle(LowerArm) * jump.lower.signum() > 0.0 {
                rig.turn(LowerArm, -jump.lower);
            }
        }
        _ => {
            state.animating = false;
            rig.straighten(UpperArm);
            rig.straighten(LowerArm);
        }
    }
}

/// Head bob layered over every upright stance.
pub(super) fn nod(rig: &mut Rig, state: &mut AnimationState) {
    if !state.head_rising {
        rig.turn(Head, -140.0);
        rig.turn(LowerArm, -28.0);
        rig.turn(UpperArm, 14.0);
        if rig.angle(Head) < -60.0 {
            state.head_rising = true;
        }
    } else {
        rig.turn(Head, 120.0);
        rig.turn(LowerArm, 24.0);
        rig.turn(UpperArm, -12.0);
        if rig.angle(Head) > -15.0 {
            state.head_rising = false;
        }
    }
}
