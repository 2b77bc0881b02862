//! Input model.
//!
//! The host samples which controls are currently held into an
//! `InputSnapshot` once per frame.  Movement is read as a level (held =
//! moving), while fire and confirm are one-shot actions: `EdgeDetector`
//! turns the level into a single "pressed" pulse per physical press.

/// Level state of every control for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    pub confirm: bool,
}

/// What the simulation consumes: held movement plus one-shot edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    /// True only on the frame fire went from released to held.
    pub fire_pressed: bool,
    /// True only on the frame confirm went from released to held.
    pub confirm_pressed: bool,
}

impl FrameInput {
    /// Same movement, edges already spent.
    pub fn without_edges(self) -> Self {
        FrameInput {
            fire_pressed: false,
            confirm_pressed: false,
            ..self
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EdgeDetector {
    previous: InputSnapshot,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, current: InputSnapshot) -> FrameInput {
        let input = FrameInput {
            move_left: current.move_left,
            move_right: current.move_right,
            fire_pressed: current.fire && !self.previous.fire,
            confirm_pressed: current.confirm && !self.previous.confirm,
        };
        self.previous = current;
        input
    }

    /// Forget held keys, e.g. after a restart, so a key still down from
    /// the previous run does not count as pressed again.
    pub fn reset(&mut self, current: InputSnapshot) {
        self.previous = current;
    }
}
