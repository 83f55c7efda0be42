//! Camera Modes
//!
//! The four mutually exclusive movement schemes and the presentation state
//! that is a pure function of the active one: which on-screen controls are
//! visible and how far the fog reaches.

use serde::{Deserialize, Serialize};

/// Camera mode - determines which controller may move the viewpoint
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Map-like view straight down, drag to pan
    #[default]
    TopDown,
    /// Bird's-eye view at a fixed 30° pitch, dual joysticks
    Aerial,
    /// Eye-level walking, dual joysticks
    Walk,
    /// Fixed angle view, pinch/drag translation only
    Fixed3D,
}

impl Mode {
    /// All modes, in controller order.
    pub const ALL: [Mode; 4] = [Mode::TopDown, Mode::Aerial, Mode::Walk, Mode::Fixed3D];

    /// Index into per-mode tables.
    pub const fn index(self) -> usize {
        match self {
            Mode::TopDown => 0,
            Mode::Aerial => 1,
            Mode::Walk => 2,
            Mode::Fixed3D => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Mode::TopDown => "TopDown",
            Mode::Aerial => "Aerial",
            Mode::Walk => "Walk",
            Mode::Fixed3D => "Fixed3D",
        }
    }

    /// Only walking is possible inside buildings.
    pub const fn allowed_inside(self) -> bool {
        matches!(self, Mode::Walk)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Visibility of mode-dependent UI.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct UiVisibility {
    /// Movement and look joysticks
    pub joysticks: bool,
    /// Zoom in/out buttons
    pub zoom_buttons: bool,
    /// Compass rose
    pub compass: bool,
}

impl UiVisibility {
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::TopDown => Self {
                joysticks: false,
                zoom_buttons: true,
                compass: true,
            },
            Mode::Aerial => Self {
                joysticks: true,
                zoom_buttons: true,
                compass: true,
            },
            Mode::Walk => Self {
                joysticks: true,
                zoom_buttons: false,
                compass: true,
            },
            Mode::Fixed3D => Self {
                joysticks: false,
                zoom_buttons: false,
                compass: false,
            },
        }
    }
}

/// Linear fog range in meters.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FogPreset {
    pub start: f32,
    pub end: f32,
}

impl FogPreset {
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::TopDown => Self {
                start: 350.0,
                end: 1200.0,
            },
            Mode::Aerial => Self {
                start: 150.0,
                end: 800.0,
            },
            Mode::Walk => Self {
                start: 40.0,
                end: 250.0,
            },
            Mode::Fixed3D => Self {
                start: 200.0,
                end: 900.0,
            },
        }
    }
}
