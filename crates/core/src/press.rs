//! Press feedback for clip buttons as a plain state machine.
//!
//! The view calls [`PressAnimation::press`] / [`PressAnimation::release`] from
//! pointer events and [`PressAnimation::step`] once per frame, then draws the
//! button at [`PressAnimation::scale`]. Nothing here knows about the toolkit.

pub const PRESSED_SCALE: f32 = 0.9;
pub const RESTING_SCALE: f32 = 1.0;

// Tension 40 / friction 7 expressed as spring stiffness and damping (mass 1).
const STIFFNESS: f32 = 230.2;
const DAMPING: f32 = 22.0;

const MAX_SUBSTEP: f32 = 1.0 / 240.0;
const REST_DISPLACEMENT: f32 = 0.001;
const REST_SPEED: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressAnimation {
    pressed: bool,
    scale: f32,
    velocity: f32,
}

impl Default for PressAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl PressAnimation {
    pub fn new() -> Self {
        Self {
            pressed: false,
            scale: RESTING_SCALE,
            velocity: 0.0,
        }
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn target(&self) -> f32 {
        if self.pressed {
            PRESSED_SCALE
        } else {
            RESTING_SCALE
        }
    }

    pub fn is_settled(&self) -> bool {
        (self.scale - self.target()).abs() < REST_DISPLACEMENT && self.velocity.abs() < REST_SPEED
    }

    /// Advance by `dt` seconds. Returns true while still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        let target = self.target();
        let mut remaining = dt.max(0.0);

        while remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP);
            let accel = -STIFFNESS * (self.scale - target) - DAMPING * self.velocity;
            self.velocity += accel * h;
            self.scale += self.velocity * h;
            remaining -= h;
        }

        if self.is_settled() {
            self.scale = target;
            self.velocity = 0.0;
            return false;
        }
        true
    }
}
