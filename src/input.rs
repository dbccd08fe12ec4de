use bitflags::bitflags;

bitflags! {
    /// Logical buttons the figure responds to.
    #[derive(Default)]
    pub struct Controls: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP_UP = 1 << 2;
        const JUMP_FORWARD = 1 << 3;
        const FALL = 1 << 4;
    }
}

/// One frame of input: what is held and what went down this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub held: Controls,
    pub pressed: Controls,
}

impl InputFrame {
    pub fn holding(held: Controls) -> Self {
        Self {
            held,
            pressed: Controls::empty(),
        }
    }

    /// Press and hold in the same frame.
    pub fn press(pressed: Controls) -> Self {
        Self {
            held: pressed,
            pressed,
        }
    }

    pub fn is_held(&self, control: Controls) -> bool {
        self.held.contains(control)
    }

    pub fn just_pressed(&self, control: Controls) -> bool {
        self.pressed.contains(control)
    }
}
