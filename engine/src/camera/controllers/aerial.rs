//! Aerial Controller
//!
//! Bird's-eye flight at a fixed downward pitch. The move stick translates
//! over the ground relative to the current heading, the look stick turns,
//! and the zoom buttons change height.

use glam::Vec3;

use super::ModeController;
use crate::camera::mode::Mode;
use crate::camera::viewpoint::{Orientation, Viewpoint, wrap_degrees};
use crate::config::AerialConfig;
use crate::input::NavigationInput;
use crate::world::boundary::BoundaryService;

#[derive(Debug, Clone)]
pub struct AerialController {
    config: AerialConfig,
    ground_height: f32,
    enabled: bool,
}

impl AerialController {
    pub fn new(config: AerialConfig, ground_height: f32) -> Self {
        Self {
            config,
            ground_height,
            enabled: false,
        }
    }

    pub fn config(&self) -> &AerialConfig {
        &self.config
    }

    /// Entry pose: keep x/z and heading, reset pitch, roll and height.
    pub fn entry_viewpoint(&self, from: &Viewpoint) -> Viewpoint {
        Viewpoint::new(
            Vec3::new(
                from.position.x,
                self.ground_height + self.config.height,
                from.position.z,
            ),
            Orientation::looking(self.config.pitch, from.orientation.yaw),
        )
    }
}

impl ModeController for AerialController {
    fn mode(&self) -> Mode {
        Mode::Aerial
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
        delta_time: f32,
    ) {
        let (move_stick, look_stick) = input.clamped_sticks();

        let yaw = wrap_degrees(viewpoint.orientation.yaw + look_stick.x * self.config.turn_speed * delta_time);
        let orientation = Orientation::looking(self.config.pitch, yaw);

        let step = (orientation.flat_forward() * move_stick.y + orientation.right() * move_stick.x)
            * self.config.move_speed
            * delta_time;

        let height = (viewpoint.height_above(self.ground_height)
            - input.zoom.clamp(-1.0, 1.0) * self.config.zoom_speed * delta_time)
            .clamp(self.config.min_height, self.config.max_height);

        let candidate = Vec3::new(
            viewpoint.position.x + step.x,
            self.ground_height + height,
            viewpoint.position.z + step.z,
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
            Aabb::new(Vec3::new(-100.0, 0.0, -100.0), Vec3::new(100.0, 300.0, 100.0)),
            0.5,
        )
    }

    fn enabled() -> AerialController {
        let mut controller = AerialController::new(AerialConfig::default(), 0.0);
        controller.set_enabled(true);
        controller
    }

    #[test]
    fn test_move_stick_follows_heading() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 60.0, 0.0), Orientation::looking(30.0, 90.0));
        let input = NavigationInput::with_sticks(Vec2::new(0.0, 1.0), Vec2::ZERO);
        controller.update(&mut viewpoint, &input, &boundary(), 1.0);
        // Heading 90 flies along +X at 25 m/s
        assert!((viewpoint.position.x - 25.0).abs() < 1e-3);
        assert!(viewpoint.position.z.abs() < 1e-3);
    }

    #[test]
    fn test_pitch_and_roll_are_fixed() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 60.0, 0.0), Orientation::new(5.0, 0.0, 12.0));
        controller.update(&mut viewpoint, &NavigationInput::new(), &boundary(), 0.016);
        assert_eq!(viewpoint.orientation.pitch, 30.0);
        assert_eq!(viewpoint.orientation.roll, 0.0);
    }

    #[test]
    fn test_position_is_clamped_to_boundary() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 60.0, 99.0), Orientation::looking(30.0, 0.0));
        let input = NavigationInput::with_sticks(Vec2::new(0.0, 1.0), Vec2::ZERO);
        controller.update(&mut viewpoint, &input, &boundary(), 1.0);
        assert_eq!(viewpoint.position.z, 99.5);
    }

    #[test]
    fn test_entry_viewpoint_resets_height() {
        let controller = AerialController::new(AerialConfig::default(), 2.0);
        let from = Viewpoint::new(Vec3::new(4.0, 250.0, -3.0), Orientation::looking(90.0, 45.0));
        let entry = controller.entry_viewpoint(&from);
        assert_eq!(entry.position, Vec3::new(4.0, 62.0, -3.0));
        assert_eq!(entry.orientation, Orientation::looking(30.0, 45.0));
    }
}
