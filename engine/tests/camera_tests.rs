//! Camera Tests - Mode Switching and Screen Projection
//!
//! Tests for the camera module: viewpoint conventions, screen-to-world
//! conversion and the mode state machine's entry normalization.

use glam::{Vec2, Vec3};
use campus_tour_engine::activation::{ActivationLog, UiElement};
use campus_tour_engine::camera::controllers::ModeController;
use campus_tour_engine::camera::raycast::ScreenProjection;
use campus_tour_engine::camera::{Mode, ModeStateMachine, ModeSwitch, Orientation, Viewpoint};
use campus_tour_engine::config::ModeConfig;
use campus_tour_engine::error::NavigationError;
use campus_tour_engine::input::NavigationInput;
use campus_tour_engine::physics::Aabb;
use campus_tour_engine::world::BoundaryService;

fn boundary() -> BoundaryService {
    BoundaryService::new(
        Aabb::new(Vec3::new(-500.0, -5.0, -500.0), Vec3::new(500.0, 400.0, 500.0)),
        0.25,
    )
}

fn machine() -> ModeStateMachine {
    ModeStateMachine::new(&ModeConfig::default(), Mode::TopDown)
}

// ============================================================================
// Viewpoint Conventions
// ============================================================================

#[test]
fn test_forward_yaw_zero_pitch_zero() {
    let orientation = Orientation::looking(0.0, 0.0);
    let forward = orientation.forward();

    assert!((forward - Vec3::Z).length() < 1e-5);
}

#[test]
fn test_positive_pitch_looks_down() {
    let forward = Orientation::looking(90.0, 0.0).forward();
    assert!((forward - Vec3::NEG_Y).length() < 1e-5);
}

#[test]
fn test_right_is_perpendicular_to_forward() {
    for yaw in [0.0, 45.0, 90.0, 180.0, 270.0] {
        let orientation = Orientation::looking(20.0, yaw);
        assert!(orientation.right().dot(orientation.flat_forward()).abs() < 1e-5);
        assert!((orientation.right().length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_yaw_ninety_looks_along_x() {
    let forward = Orientation::looking(0.0, 90.0).forward();
    assert!((forward - Vec3::X).length() < 1e-5);
}

// ============================================================================
// Screen To World
// ============================================================================

#[test]
fn test_screen_delta_at_five_meters() {
    let projection = ScreenProjection::default();
    let viewpoint = Viewpoint::new(Vec3::new(0.0, 5.0, 0.0), Orientation::looking(30.0, 0.0));

    let delta = projection.screen_delta_to_world(Vec2::new(100.0, 0.0), &viewpoint, 0.0);

    // d = 10, world height = 11.547, world width = 20.528
    assert!((delta.x - 1.283).abs() < 1e-3, "x = {}", delta.x);
    assert!(delta.y.abs() < 1e-6);
    assert!(delta.z.abs() < 1e-5);
}

#[test]
fn test_screen_delta_forward_axis() {
    let projection = ScreenProjection::default();
    let viewpoint = Viewpoint::new(Vec3::new(0.0, 5.0, 0.0), Orientation::looking(30.0, 0.0));

    let delta = projection.screen_delta_to_world(Vec2::new(0.0, 90.0), &viewpoint, 0.0);

    // 90 / 900 of an 11.547 m tall footprint
    assert!((delta.z - 1.1547).abs() < 1e-3);
    assert!(delta.x.abs() < 1e-5);
}

#[test]
fn test_screen_delta_zero_near_ground() {
    let projection = ScreenProjection::default();
    for height in [0.1, 0.05, 0.0, -2.0] {
        let viewpoint = Viewpoint::new(Vec3::new(0.0, height, 0.0), Orientation::looking(30.0, 0.0));
        let delta = projection.screen_delta_to_world(Vec2::new(100.0, 50.0), &viewpoint, 0.0);
        assert_eq!(delta, Vec3::ZERO, "height {height}");
    }
}

#[test]
fn test_screen_delta_uses_ground_reference() {
    let projection = ScreenProjection::default();
    let viewpoint = Viewpoint::new(Vec3::new(0.0, 15.0, 0.0), Orientation::looking(30.0, 0.0));

    let raised = projection.screen_delta_to_world(Vec2::new(100.0, 0.0), &viewpoint, 10.0);
    assert!((raised.x - 1.283).abs() < 1e-3);
}

// ============================================================================
// Mode State Machine
// ============================================================================

#[test]
fn test_nothing_enabled_before_first_switch() {
    let modes = machine();
    assert_eq!(modes.active_controller_count(), 0);
    assert!(!modes.check_single_writer());
}

#[test]
fn test_first_top_down_entry_uses_initial_pose() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();

    modes
        .switch_mode(Mode::TopDown, &mut viewpoint, false, &boundary(), &mut activation)
        .unwrap();

    let initial = ModeConfig::default().top_down.initial_position;
    assert_eq!(viewpoint.position, initial);
    assert_eq!(viewpoint.orientation.pitch, 90.0);
    assert!(modes.check_single_writer());
}

#[test]
fn test_top_down_to_aerial_first_time() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let config = ModeConfig::default();

    modes
        .switch_mode(Mode::TopDown, &mut viewpoint, false, &boundary(), &mut activation)
        .unwrap();
    let result = modes
        .switch_mode(Mode::Aerial, &mut viewpoint, false, &boundary(), &mut activation)
        .unwrap();

    assert_eq!(
        result,
        ModeSwitch::Changed {
            from: Mode::TopDown,
            to: Mode::Aerial
        }
    );
    assert!((viewpoint.orientation.pitch - 30.0).abs() < 1e-5);
    assert!((viewpoint.position.y - (config.ground_height + config.aerial.height)).abs() < 1e-4);
    assert!(modes.has_seen(Mode::Aerial));
    assert!(modes.check_single_writer());
}

#[test]
fn test_second_top_down_entry_glides_to_smooth_height() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    modes.switch_mode(Mode::TopDown, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    modes.switch_mode(Mode::Aerial, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    let yaw_before = viewpoint.orientation.yaw;
    modes.switch_mode(Mode::TopDown, &mut viewpoint, false, &bounds, &mut activation).unwrap();

    // The switch itself only levels the view; the height follows over ticks
    assert_eq!(viewpoint.orientation.pitch, 90.0);
    assert_eq!(viewpoint.orientation.yaw, yaw_before);
    assert_eq!(modes.controllers().top_down.glide_target(), Some(180.0));

    for _ in 0..200 {
        modes.update(&mut viewpoint, &NavigationInput::default(), &bounds, 0.05);
    }
    assert!((viewpoint.position.y - 180.0).abs() < 1e-3);
    assert!(!modes.controllers().top_down.is_gliding());
}

#[test]
fn test_zoom_cancels_glide() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    modes.switch_mode(Mode::TopDown, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    modes.switch_mode(Mode::Aerial, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    modes.switch_mode(Mode::TopDown, &mut viewpoint, false, &bounds, &mut activation).unwrap();

    let input = NavigationInput {
        zoom: 1.0,
        ..Default::default()
    };
    modes.update(&mut viewpoint, &input, &bounds, 0.05);
    assert!(!modes.controllers().top_down.is_gliding());
}

#[test]
fn test_same_mode_switch_is_unchanged() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    modes.switch_mode(Mode::Aerial, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    let before = viewpoint;
    let result = modes
        .switch_mode(Mode::Aerial, &mut viewpoint, false, &bounds, &mut activation)
        .unwrap();

    assert_eq!(result, ModeSwitch::Unchanged(Mode::Aerial));
    assert_eq!(viewpoint, before);
    assert!(modes.check_single_writer());
}

#[test]
fn test_walk_lowers_to_eye_height() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::new(Vec3::new(12.0, 60.0, -4.0), Orientation::looking(30.0, 45.0));

    modes.switch_mode(Mode::Walk, &mut viewpoint, false, &boundary(), &mut activation).unwrap();

    let config = ModeConfig::default();
    assert!((viewpoint.position.y - (config.ground_height + config.walk.eye_height)).abs() < 1e-5);
    assert_eq!(viewpoint.position.x, 12.0);
    assert_eq!(viewpoint.position.z, -4.0);
    assert_eq!(viewpoint.orientation.pitch, 0.0);
    assert_eq!(viewpoint.orientation.yaw, 45.0);
}

#[test]
fn test_walk_pitch_is_clamped() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    modes.switch_mode(Mode::Walk, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    let look_down = NavigationInput::with_sticks(Vec2::ZERO, Vec2::new(0.0, -1.0));
    for _ in 0..100 {
        modes.update(&mut viewpoint, &look_down, &bounds, 0.1);
    }
    let limit = ModeConfig::default().walk.max_pitch;
    assert!(viewpoint.orientation.pitch.abs() <= limit + 1e-4);
}

#[test]
fn test_only_walk_inside() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    modes.switch_mode(Mode::Walk, &mut viewpoint, true, &bounds, &mut activation).unwrap();
    for mode in [Mode::TopDown, Mode::Aerial, Mode::Fixed3D] {
        let result = modes.switch_mode(mode, &mut viewpoint, true, &bounds, &mut activation);
        assert_eq!(result, Err(NavigationError::ModeUnavailableInside(mode)));
    }
    assert_eq!(modes.current_mode(), Mode::Walk);
    assert!(modes.check_single_writer());
}

#[test]
fn test_single_writer_across_switches() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    for mode in [Mode::TopDown, Mode::Fixed3D, Mode::Walk, Mode::Aerial, Mode::TopDown, Mode::Walk] {
        modes.switch_mode(mode, &mut viewpoint, false, &bounds, &mut activation).unwrap();
        assert_eq!(modes.active_controller_count(), 1, "after {mode}");
        assert!(modes.controllers().get(mode).is_enabled());
    }
}

#[test]
fn test_movement_lock_freezes_viewpoint() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    modes.switch_mode(Mode::Aerial, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    modes.set_movement_enabled(false);
    let before = viewpoint;
    let input = NavigationInput::with_sticks(Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0));
    modes.update(&mut viewpoint, &input, &bounds, 0.5);
    assert_eq!(viewpoint, before);

    modes.set_movement_enabled(true);
    modes.update(&mut viewpoint, &input, &bounds, 0.5);
    assert_ne!(viewpoint, before);
}

#[test]
fn test_mode_presentation_toggles_ui() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    modes.switch_mode(Mode::Walk, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    let walk_ui = modes.ui_visibility();
    assert_eq!(activation.is_active(UiElement::Joysticks), walk_ui.joysticks);
    assert_eq!(activation.is_active(UiElement::Compass), walk_ui.compass);

    modes.switch_mode(Mode::TopDown, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    let top_down_ui = modes.ui_visibility();
    assert_eq!(activation.is_active(UiElement::Joysticks), top_down_ui.joysticks);
    assert_eq!(activation.is_active(UiElement::ZoomButtons), top_down_ui.zoom_buttons);
}

#[test]
fn test_fixed3d_never_rotates() {
    let mut modes = machine();
    let mut activation = ActivationLog::new();
    let mut viewpoint = Viewpoint::default();
    let bounds = boundary();

    modes.switch_mode(Mode::Fixed3D, &mut viewpoint, false, &bounds, &mut activation).unwrap();
    let orientation = viewpoint.orientation;
    let input = NavigationInput {
        pointer_drag: Vec2::new(120.0, -40.0),
        look_stick: Vec2::new(1.0, 1.0),
        ..Default::default()
    };
    modes.update(&mut viewpoint, &input, &bounds, 0.1);
    assert_eq!(viewpoint.orientation, orientation);
}
