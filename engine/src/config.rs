//! Navigator Configuration
//!
//! Centralized tunables for camera modes, probing, transitions and
//! boundaries. `Default` returns the values the tour ships with; every struct
//! deserializes with `#[serde(default)]` so a scene file only needs to list
//! the fields it overrides.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_ITEMS_PER_TICK;
use crate::camera::mode::Mode;
use crate::camera::raycast::ScreenProjection;
use crate::camera::viewpoint::{Orientation, Pose};

/// TopDown (map) mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopDownConfig {
    /// Position hard-set on the first entry; `y` is the height above ground
    pub initial_position: Vec3,
    /// Yaw hard-set on the first entry
    pub initial_yaw: f32,
    /// Height above ground glided to on later entries
    pub smooth_height: f32,
    /// Exponential approach rate of the height glide (1/s)
    pub glide_rate: f32,
    /// Height limits above ground
    pub min_height: f32,
    pub max_height: f32,
    /// Pan distance per dragged pixel, per meter of height
    pub pan_speed: f32,
    /// Height change per second at full zoom-button input
    pub zoom_speed: f32,
    /// Height change per pinched pixel
    pub pinch_speed: f32,
}

impl Default for TopDownConfig {
    fn default() -> Self {
        Self {
            initial_position: Vec3::new(0.0, 250.0, 0.0),
            initial_yaw: 0.0,
            smooth_height: 180.0,
            glide_rate: 4.0,
            min_height: 40.0,
            max_height: 350.0,
            pan_speed: 0.0015,
            zoom_speed: 120.0,
            pinch_speed: 0.5,
        }
    }
}

/// Aerial (bird's-eye) mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AerialConfig {
    /// Height above ground hard-set on every entry
    pub height: f32,
    /// Fixed downward pitch in degrees
    pub pitch: f32,
    /// Ground speed at full stick (m/s)
    pub move_speed: f32,
    /// Yaw rate at full stick (deg/s)
    pub turn_speed: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Height change per second at full zoom-button input
    pub zoom_speed: f32,
}

impl Default for AerialConfig {
    fn default() -> Self {
        Self {
            height: 60.0,
            pitch: 30.0,
            move_speed: 25.0,
            turn_speed: 90.0,
            min_height: 20.0,
            max_height: 150.0,
            zoom_speed: 40.0,
        }
    }
}

/// Walk (eye-level) mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Eye height above ground when lowered into walk mode
    pub eye_height: f32,
    /// Walking speed at full stick (m/s)
    pub move_speed: f32,
    /// Look rate at full stick (deg/s)
    pub turn_speed: f32,
    /// Pitch limit in either direction (degrees)
    pub max_pitch: f32,
    /// Look rotation per dragged pixel (degrees)
    pub drag_look_speed: f32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            eye_height: 1.7,
            move_speed: 3.0,
            turn_speed: 90.0,
            max_pitch: 60.0,
            drag_look_speed: 0.2,
        }
    }
}

/// Fixed3D (fixed angle) mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixed3dConfig {
    /// Pose hard-set on the first entry
    pub initial_pose: Pose,
    /// Fixed pitch applied on every entry (degrees)
    pub pitch: f32,
    /// Fixed yaw applied on every entry (degrees)
    pub yaw: f32,
    /// Lens and screen used to convert drags into world movement
    pub projection: ScreenProjection,
    pub min_height: f32,
    pub max_height: f32,
    /// Height change per pinched pixel
    pub pinch_speed: f32,
}

impl Default for Fixed3dConfig {
    fn default() -> Self {
        Self {
            initial_pose: Pose::new(Vec3::new(0.0, 80.0, -120.0), Orientation::looking(35.0, 0.0)),
            pitch: 35.0,
            yaw: 0.0,
            projection: ScreenProjection::default(),
            min_height: 15.0,
            max_height: 200.0,
            pinch_speed: 0.3,
        }
    }
}

/// All mode tunables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Exterior ground reference height
    pub ground_height: f32,
    pub top_down: TopDownConfig,
    pub aerial: AerialConfig,
    pub walk: WalkConfig,
    pub fixed3d: Fixed3dConfig,
}

/// Door and stair ray probing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Longest ray cast against doors and stairs
    pub max_distance: f32,
    /// Doors closer than this show their affordances
    pub door_ui_distance: f32,
    /// Stairs closer than this show their affordances
    pub stair_ui_distance: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_distance: 30.0,
            door_ui_distance: 12.0,
            stair_ui_distance: 6.0,
        }
    }
}

/// Fade / move / fade transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Duration of each fade (seconds)
    pub fade_duration: f32,
    /// Duration of the viewpoint glide while the screen is covered (seconds)
    pub move_duration: f32,
    /// Mode used when returning outside without a saved mode
    pub exterior_arrival_mode: Mode,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_duration: 0.35,
            move_duration: 0.8,
            exterior_arrival_mode: Mode::Aerial,
        }
    }
}

/// Boundary clamping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Inward padding kept from boundary faces (meters)
    pub padding: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self { padding: 0.25 }
    }
}

/// Label placement scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Height above the anchor the downward scan ray starts from
    pub scan_height: f32,
    /// Distance the label floats above the surface found below it
    pub label_offset: f32,
    /// Anchors scanned per tick
    pub items_per_tick: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            scan_height: 100.0,
            label_offset: 2.5,
            items_per_tick: DEFAULT_ITEMS_PER_TICK,
        }
    }
}

/// Everything the navigator can be tuned with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Mode entered at startup
    pub start_mode: Mode,
    pub modes: ModeConfig,
    pub probe: ProbeConfig,
    pub transition: TransitionConfig,
    pub boundary: BoundaryConfig,
    pub labels: LabelConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = NavigatorConfig::default();
        assert_eq!(config.start_mode, Mode::TopDown);
        assert!(config.modes.top_down.min_height < config.modes.top_down.smooth_height);
        assert!(config.modes.top_down.smooth_height < config.modes.top_down.max_height);
        assert!(config.probe.door_ui_distance <= config.probe.max_distance);
        assert!(config.probe.stair_ui_distance <= config.probe.max_distance);
        assert_eq!(config.modes.aerial.pitch, 30.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "start_mode": "Aerial", "modes": { "aerial": { "height": 80.0 } } }"#;
        let config: NavigatorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.start_mode, Mode::Aerial);
        assert_eq!(config.modes.aerial.height, 80.0);
        assert_eq!(config.modes.aerial.pitch, 30.0);
        assert_eq!(config.transition, TransitionConfig::default());
    }
}
