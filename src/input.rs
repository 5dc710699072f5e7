//! Per-frame input snapshot.
//!
//! The window glue captures one of these per frame; the camera consumes it.
//! Mouse deltas are meaningful only while the look button is held and are
//! taken through an explicit drain so a frame's motion is never applied
//! twice.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub look: bool,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
}

impl InputFrame {
    /// Returns the accumulated mouse deltas and zeroes them.
    pub fn drain_mouse(&mut self) -> (f32, f32) {
        let d = (self.mouse_dx, self.mouse_dy);
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        d
    }
}
