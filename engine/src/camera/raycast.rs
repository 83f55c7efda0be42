//! Raycast Module
//!
//! Screen-space helpers for the camera: the forward probe ray and the
//! conversion of pinch/drag screen deltas into world-space translation.
//!
//! # Screen To World
//!
//! For a viewpoint `h` meters above the ground reference, pitched down by
//! `pitch`, the distance along the view axis to the ground is
//! `d = h / sin(pitch)`. The visible ground extent at that distance is
//!
//! ```text
//! world_height = 2 * d * tan(fov / 2)
//! world_width  = world_height * aspect
//! ```
//!
//! A screen delta moves by the same fraction of that extent as it covers of
//! the screen. When the viewpoint is too close to the ground (or looks too
//! flat for the ground to be in view) the conversion is undefined and a zero
//! delta is returned instead of dividing by almost nothing.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::viewpoint::Viewpoint;

/// Below this height above ground the screen-to-world conversion returns zero.
pub const MIN_PROJECTION_HEIGHT: f32 = 0.1;

/// Below this `sin(pitch)` the ground footprint is unbounded; treated as zero delta.
pub const MIN_PROJECTION_SIN_PITCH: f32 = 0.05;

/// Screen and lens parameters for screen-to-world conversion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenProjection {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Screen aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Screen width in pixels
    pub screen_width: f32,
    /// Screen height in pixels
    pub screen_height: f32,
}

impl Default for ScreenProjection {
    fn default() -> Self {
        Self {
            fov: 60.0,
            aspect_ratio: 16.0 / 9.0,
            screen_width: 1600.0,
            screen_height: 900.0,
        }
    }
}

impl ScreenProjection {
    /// Create a projection for a screen size; the aspect ratio follows from it.
    pub fn for_screen(fov: f32, screen_width: f32, screen_height: f32) -> Self {
        Self {
            fov,
            aspect_ratio: screen_width / screen_height.max(1.0),
            screen_width,
            screen_height,
        }
    }

    /// Visible ground extent `(width, height)` in meters, if defined.
    ///
    /// # Arguments
    /// * `height` - Viewpoint height above the ground reference
    /// * `pitch` - Downward pitch in degrees
    pub fn ground_footprint(&self, height: f32, pitch: f32) -> Option<(f32, f32)> {
        if height <= MIN_PROJECTION_HEIGHT {
            return None;
        }
        let sin_pitch = pitch.to_radians().sin();
        if sin_pitch < MIN_PROJECTION_SIN_PITCH {
            return None;
        }
        let distance = height / sin_pitch;
        let world_height = 2.0 * distance * (self.fov.to_radians() * 0.5).tan();
        Some((world_height * self.aspect_ratio, world_height))
    }

    /// Convert a screen delta (pixels, +y = up the screen) into a ground-plane delta.
    ///
    /// The result is expressed along the viewpoint's flattened right and
    /// forward axes. Returns `Vec3::ZERO` when the conversion is undefined.
    pub fn screen_delta_to_world(&self, delta: Vec2, viewpoint: &Viewpoint, ground_height: f32) -> Vec3 {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Vec3::ZERO;
        }
        let height = viewpoint.height_above(ground_height);
        let Some((world_width, world_height)) =
            self.ground_footprint(height, viewpoint.orientation.pitch)
        else {
            return Vec3::ZERO;
        };

        let along_right = delta.x / self.screen_width * world_width;
        let along_forward = delta.y / self.screen_height * world_height;
        viewpoint.orientation.right() * along_right
            + viewpoint.orientation.flat_forward() * along_forward
    }
}

/// Ray used by door and stair probing: from the viewpoint along its forward axis.
pub fn forward_ray(viewpoint: &Viewpoint) -> (Vec3, Vec3) {
    (viewpoint.position, viewpoint.forward())
}
