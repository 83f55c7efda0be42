//! Camera Module
//!
//! The viewpoint, the four mode controllers that move it, and the state
//! machine deciding which controller is allowed to.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod controllers;
pub mod mode;
pub mod mode_state;
pub mod raycast;
pub mod viewpoint;

pub use controllers::{
    AerialController, ControllerSet, Fixed3dController, ModeController, TopDownController,
    WalkController,
};
pub use mode::{FogPreset, Mode, UiVisibility};
pub use mode_state::{ModeStateMachine, ModeSwitch};
pub use raycast::{ScreenProjection, forward_ray};
pub use viewpoint::{Orientation, Pose, Viewpoint};
