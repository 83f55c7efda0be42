//! Walk Controller
//!
//! Eye-level walking, the only mode available inside buildings. The move
//! stick walks relative to the heading; the look stick and pointer drags turn
//! and tilt the head. Height is left alone: it comes from the mode entry or
//! from the door/stair pose that placed the viewpoint.

use glam::Vec3;

use super::ModeController;
use crate::camera::mode::Mode;
use crate::camera::viewpoint::{Orientation, Viewpoint, wrap_degrees};
use crate::config::WalkConfig;
use crate::input::NavigationInput;
use crate::world::boundary::BoundaryService;

#[derive(Debug, Clone)]
pub struct WalkController {
    config: WalkConfig,
    enabled: bool,
}

impl WalkController {
    pub fn new(config: WalkConfig) -> Self {
        Self {
            config,
            enabled: false,
        }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Entry pose outside: lowered to eye height, looking level.
    pub fn entry_viewpoint(&self, from: &Viewpoint, ground_height: f32) -> Viewpoint {
        Viewpoint::new(
            Vec3::new(
                from.position.x,
                ground_height + self.config.eye_height,
                from.position.z,
            ),
            Orientation::looking(0.0, from.orientation.yaw),
        )
    }
}

impl ModeController for WalkController {
    fn mode(&self) -> Mode {
        Mode::Walk
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
        let turn = self.config.turn_speed * delta_time;
        let drag = input.pointer_drag * self.config.drag_look_speed;

        let yaw = wrap_degrees(viewpoint.orientation.yaw + look_stick.x * turn + drag.x);
        // Pushing up looks up, which is negative pitch
        let pitch = (viewpoint.orientation.pitch - look_stick.y * turn - drag.y)
            .clamp(-self.config.max_pitch, self.config.max_pitch);
        let orientation = Orientation::looking(pitch, yaw);

        let step = (orientation.flat_forward() * move_stick.y + orientation.right() * move_stick.x)
            * self.config.move_speed
            * delta_time;

        let candidate = Vec3::new(
            viewpoint.position.x + step.x,
            viewpoint.position.y,
            viewpoint.position.z + step.z,
        );
        viewpoint.position = boundary.clamp(candidate);
        viewpoint.orientation = orientation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Aabb, Volume};
    use crate::world::entities::RoomId;
    use glam::Vec2;

    fn room_boundary() -> BoundaryService {
        let mut service = BoundaryService::new(
            Aabb::new(Vec3::splat(-100.0), Vec3::splat(100.0)),
            0.25,
        );
        service.insert_room(
            RoomId(0),
            vec![Volume::Box(Aabb::new(Vec3::ZERO, Vec3::new(10.0, 4.0, 10.0)))],
        );
        service.activate_room(RoomId(0));
        service
    }

    fn enabled() -> WalkController {
        let mut controller = WalkController::new(WalkConfig::default());
        controller.set_enabled(true);
        controller
    }

    #[test]
    fn test_walks_forward_keeping_height() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(5.0, 1.7, 2.0), Orientation::default());
        let input = NavigationInput::with_sticks(Vec2::new(0.0, 1.0), Vec2::ZERO);
        controller.update(&mut viewpoint, &input, &room_boundary(), 1.0);
        assert!((viewpoint.position.z - 5.0).abs() < 1e-4);
        assert_eq!(viewpoint.position.y, 1.7);
    }

    #[test]
    fn test_walls_stop_the_walker() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(5.0, 1.7, 9.0), Orientation::default());
        let input = NavigationInput::with_sticks(Vec2::new(0.0, 1.0), Vec2::ZERO);
        controller.update(&mut viewpoint, &input, &room_boundary(), 1.0);
        assert_eq!(viewpoint.position.z, 9.75);
    }

    #[test]
    fn test_pitch_is_limited() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(5.0, 1.7, 5.0), Orientation::default());
        let look_up = NavigationInput::with_sticks(Vec2::ZERO, Vec2::new(0.0, 1.0));
        for _ in 0..10 {
            controller.update(&mut viewpoint, &look_up, &room_boundary(), 1.0);
        }
        assert_eq!(viewpoint.orientation.pitch, -60.0);
        assert_eq!(viewpoint.orientation.roll, 0.0);
    }

    #[test]
    fn test_drag_turns_head() {
        let mut controller = enabled();
        let mut viewpoint = Viewpoint::new(Vec3::new(5.0, 1.7, 5.0), Orientation::default());
        controller.update(
            &mut viewpoint,
            &NavigationInput::with_drag(Vec2::new(100.0, 0.0)),
            &room_boundary(),
            0.016,
        );
        assert!((viewpoint.orientation.yaw - 20.0).abs() < 1e-4);
    }
}
