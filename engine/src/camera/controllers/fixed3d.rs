//! Fixed3D Controller
//!
//! A fixed-angle view that never rotates. Drags translate over the ground
//! using the screen-to-world conversion of [`ScreenProjection`], so the point
//! under the finger stays under the finger; pinch changes height.

use glam::Vec3;

use super::ModeController;
use crate::camera::mode::Mode;
use crate::camera::raycast::ScreenProjection;
use crate::camera::viewpoint::{Orientation, Viewpoint};
use crate::config::Fixed3dConfig;
use crate::input::NavigationInput;
use crate::world::boundary::BoundaryService;

#[derive(Debug, Clone)]
pub struct Fixed3dController {
    config: Fixed3dConfig,
    ground_height: f32,
    enabled: bool,
}

impl Fixed3dController {
    pub fn new(config: Fixed3dConfig, ground_height: f32) -> Self {
        Self {
            config,
            ground_height,
            enabled: false,
        }
    }

    pub fn config(&self) -> &Fixed3dConfig {
        &self.config
    }

    pub fn projection(&self) -> &ScreenProjection {
        &self.config.projection
    }

    /// Track a new screen size (e.g. after a resize).
    pub fn set_projection(&mut self, projection: ScreenProjection) {
        self.config.projection = projection;
    }

    /// The fixed viewing angle.
    pub fn fixed_orientation(&self) -> Orientation {
        Orientation::looking(self.config.pitch, self.config.yaw)
    }

    /// World-space translation for a screen drag at the current viewpoint.
    pub fn drag_to_world(&self, drag: glam::Vec2, viewpoint: &Viewpoint) -> Vec3 {
        self.config
            .projection
            .screen_delta_to_world(drag, viewpoint, self.ground_height)
    }
}

impl ModeController for Fixed3dController {
    fn mode(&self) -> Mode {
        Mode::Fixed3D
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn update(
        &mut self,
        viewpoint: &mut Viewpoint,
        input: &NavigationInput,
        boundary: &BoundaryService,
        _delta_time: f32,
    ) {
        // The ground moves with the finger, so the view moves the other way
        let pan = -self.drag_to_world(input.pointer_drag, viewpoint);

        // Height limits apply to zooming only; a height left by a transition stays put
        let y = if input.pinch == 0.0 {
            viewpoint.position.y
        } else {
            let height = (viewpoint.height_above(self.ground_height) - input.pinch * self.config.pinch_speed)
                .clamp(self.config.min_height, self.config.max_height);
            self.ground_height + height
        };

        let candidate = Vec3::new(viewpoint.position.x + pan.x, y, viewpoint.position.z + pan.z);
        viewpoint.position = boundary.clamp(candidate);
    }
}
