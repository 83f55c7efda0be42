//! TopDown Controller
//!
//! Map-like view looking straight down. Dragging pans over the ground plane,
//! scaled by height so the map follows the pointer at any zoom level; pinch
//! and the zoom buttons change height.
//!
//! Re-entering the mode does not snap the height. Instead a glide target is
//! set and the height approaches it exponentially, so the controller stays
//! the only writer of the viewpoint while the glide runs.

use glam::Vec3;

use super::ModeController;
use crate::camera::mode::Mode;
use crate::camera::viewpoint::{Orientation, Viewpoint};
use crate::config::TopDownConfig;
use crate::input::NavigationInput;
use crate::world::boundary::BoundaryService;

/// Pitch of the overhead view (straight down)
pub const TOP_DOWN_PITCH: f32 = 90.0;

/// A glide closer than this to its target snaps and finishes.
const GLIDE_SNAP_DISTANCE: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct TopDownController {
    config: TopDownConfig,
    ground_height: f32,
    enabled: bool,
    /// Height above ground being glided to
    glide_target: Option<f32>,
}

impl TopDownController {
    pub fn new(config: TopDownConfig, ground_height: f32) -> Self {
        Self {
            config,
            ground_height,
            enabled: false,
            glide_target: None,
        }
    }

    pub fn config(&self) -> &TopDownConfig {
        &self.config
    }

    /// Start gliding to a height above ground (limited to the zoom range).
    pub fn glide_to_height(&mut self, height: f32) {
        let target = height.clamp(self.config.min_height, self.config.max_height);
        log::debug!("[TopDown] gliding to {target:.1}m");
        self.glide_target = Some(target);
    }

    pub fn glide_target(&self) -> Option<f32> {
        self.glide_target
    }

    pub fn is_gliding(&self) -> bool {
        self.glide_target.is_some()
    }

    pub fn cancel_glide(&mut self) {
        self.glide_target = None;
    }

    /// Pose applied on the very first entry.
    pub fn initial_viewpoint(&self) -> Viewpoint {
        let p = self.config.initial_position;
        Viewpoint::new(
            Vec3::new(p.x, self.ground_height + p.y, p.z),
            Orientation::looking(TOP_DOWN_PITCH, self.config.initial_yaw),
        )
    }

    fn step_glide(&mut self, height: f32, delta_time: f32) -> f32 {
        let Some(target) = self.glide_target else {
            return height;
        };
        let blend = 1.0 - (-self.config.glide_rate * delta_time).exp();
        let next = height + (target - height) * blend;
        if (target - next).abs() < GLIDE_SNAP_DISTANCE {
            self.glide_target = None;
            target
        } else {
            next
        }
    }
}

impl ModeController for TopDownController {
    fn mode(&self) -> Mode {
        Mode::TopDown
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.glide_target = None;
        }
    }

    fn update(
        &mut self,
        viewpoint: &mut Viewpoint,
        input: &NavigationInput,
        boundary: &BoundaryService,
        delta_time: f32,
    ) {
        let orientation = Orientation::looking(TOP_DOWN_PITCH, viewpoint.orientation.yaw);
        let mut height = viewpoint.height_above(self.ground_height);

        // Manual zoom overrides any glide in progress
        let zoom = input.zoom * self.config.zoom_speed * delta_time + input.pinch * self.config.pinch_speed;
        if zoom != 0.0 {
            self.glide_target = None;
            height -= zoom;
        } else {
            height = self.step_glide(height, delta_time);
        }
        let height = height.clamp(self.config.min_height, self.config.max_height);

        // Dragging moves the map with the pointer, so the view moves the other way
        let drag = input.pointer_drag * self.config.pan_speed * height;
        let pan = -(orientation.right() * drag.x + orientation.flat_forward() * drag.y);

        let candidate = Vec3::new(
            viewpoint.position.x + pan.x,
            self.ground_height + height,
            viewpoint.position.z + pan.z,
        );
        viewpoint.position = boundary.clamp(candidate);
        viewpoint.orientation = orientation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Aabb;
    use glam::Vec2;

    fn boundary() -> BoundaryService {
        BoundaryService::new(
            Aabb::new(Vec3::new(-500.0, -10.0, -500.0), Vec3::new(500.0, 500.0, 500.0)),
            0.0,
        )
    }

    fn enabled() -> TopDownController {
        let mut controller = TopDownController::new(TopDownConfig::default(), 0.0);
        controller.set_enabled(true);
        controller
    }

    #[test]
    fn test_drag_pans_against_pointer() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 100.0, 0.0), Orientation::looking(90.0, 0.0));
        controller.update(&mut viewpoint, &NavigationInput::with_drag(Vec2::new(10.0, 0.0)), &boundary(), 0.016);
        // 10 px * 0.0015 * 100 m
        assert!((viewpoint.position.x + 1.5).abs() < 1e-4);
        assert!((viewpoint.position.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_pinch_lowers_within_limits() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 50.0, 0.0), Orientation::looking(90.0, 0.0));
        controller.update(&mut viewpoint, &NavigationInput::with_pinch(1000.0), &boundary(), 0.016);
        assert_eq!(viewpoint.position.y, controller.config().min_height);
    }

    #[test]
    fn test_pitch_is_locked_down() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 100.0, 0.0), Orientation::new(10.0, 45.0, 5.0));
        controller.update(&mut viewpoint, &NavigationInput::new(), &boundary(), 0.016);
        assert_eq!(viewpoint.orientation, Orientation::looking(90.0, 45.0));
    }

    #[test]
    fn test_glide_converges_to_target() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 60.0, 0.0), Orientation::looking(90.0, 0.0));
        controller.glide_to_height(180.0);
        let mut previous = viewpoint.position.y;
        for _ in 0..600 {
            controller.update(&mut viewpoint, &NavigationInput::new(), &boundary(), 1.0 / 60.0);
            assert!(viewpoint.position.y >= previous);
            previous = viewpoint.position.y;
        }
        assert!(!controller.is_gliding());
        assert_eq!(viewpoint.position.y, 180.0);
    }

    #[test]
    fn test_zoom_cancels_glide() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 60.0, 0.0), Orientation::looking(90.0, 0.0));
        controller.glide_to_height(180.0);
        let input = NavigationInput {
            zoom: 1.0,
            ..Default::default()
        };
        controller.update(&mut viewpoint, &input, &boundary(), 0.1);
        assert!(!controller.is_gliding());
        assert!(viewpoint.position.y < 60.0);
    }
}
