//! Input Module
//!
//! Per-tick movement input consumed by the mode controllers. The host
//! application translates its own pointer, touch and on-screen joystick
//! events into one [`NavigationInput`] per frame; nothing here knows about a
//! windowing system.
//!
//! # Example
//!
//! ```rust,ignore
//! use campus_tour_engine::input::NavigationInput;
//! use glam::Vec2;
//!
//! let mut input = NavigationInput::new();
//! input.move_stick = Vec2::new(0.0, 1.0); // push forward
//! input.pointer_drag = Vec2::new(12.0, -3.0); // pixels this frame
//! navigator.tick(dt, &input, &mut services);
//! input.reset();
//! ```

use glam::Vec2;

/// Movement input for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavigationInput {
    /// Pointer or single-finger drag this frame, in pixels (+y = up the screen)
    pub pointer_drag: Vec2,
    /// Left virtual joystick, each axis in [-1, 1] (+y = forward)
    pub move_stick: Vec2,
    /// Right virtual joystick, each axis in [-1, 1] (+x = turn right, +y = look up)
    pub look_stick: Vec2,
    /// Change in two-finger distance this frame, in pixels (positive = spread = zoom in)
    pub pinch: f32,
    /// Zoom button axis in [-1, 1] (positive = zoom in)
    pub zoom: f32,
}

impl NavigationInput {
    /// Create an input with nothing pressed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drag(drag: Vec2) -> Self {
        Self {
            pointer_drag: drag,
            ..Self::default()
        }
    }

    pub fn with_sticks(move_stick: Vec2, look_stick: Vec2) -> Self {
        Self {
            move_stick,
            look_stick,
            ..Self::default()
        }
    }

    pub fn with_pinch(pinch: f32) -> Self {
        Self {
            pinch,
            ..Self::default()
        }
    }

    /// Clear all input (call after the frame consumed it).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Joystick axes limited to the unit square.
    pub fn clamped_sticks(&self) -> (Vec2, Vec2) {
        let unit = |v: Vec2| v.clamp(Vec2::NEG_ONE, Vec2::ONE);
        (unit(self.move_stick), unit(self.look_stick))
    }

    /// Check if any input is active this frame.
    pub fn is_moving(&self) -> bool {
        self.pointer_drag != Vec2::ZERO
            || self.move_stick != Vec2::ZERO
            || self.look_stick != Vec2::ZERO
            || self.pinch != 0.0
            || self.zoom != 0.0
    }
}
