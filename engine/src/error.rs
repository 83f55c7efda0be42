//! Error Types
//!
//! Nothing in the navigation core terminates the process. Requests that
//! cannot be honoured return a [`NavigationError`] and leave the navigator in
//! its prior state; scene files that cannot be read return a
//! [`SceneConfigError`].

use crate::camera::mode::Mode;
use crate::world::entities::{DoorId, FloorDirection, StairId};

/// Why a navigation request was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// The viewpoint is detached (scene reload in progress)
    ViewpointUnavailable,
    /// Another transition is in flight; the request was dropped
    TransitionInFlight,
    /// The door id does not exist in the loaded scene
    UnknownDoor(DoorId),
    /// The stair id does not exist in the loaded scene
    UnknownStair(StairId),
    /// The door only shows a label
    DoorNotEnterable(DoorId),
    /// The door is not reachable from where the viewpoint is
    DoorNotReachable(DoorId),
    /// Exiting requires the door that was used to enter
    NotEntryDoor(DoorId),
    /// A secondary interior is already open
    NestingLimit(DoorId),
    /// The operation requires being inside a building
    NotInterior,
    /// No arrival pose could be determined
    MissingPose(DoorId),
    /// The stair does not offer that direction
    StairNotLinked(StairId, FloorDirection),
    /// Nothing is hovered by the door probe
    NoHoveredDoor,
    /// Nothing is hovered by the stair probe
    NoHoveredStair,
    /// The hovered door offers no action
    NoDoorAction(DoorId),
    /// The mode cannot be used inside buildings
    ModeUnavailableInside(Mode),
}

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationError::ViewpointUnavailable => write!(f, "viewpoint is not available"),
            NavigationError::TransitionInFlight => write!(f, "a transition is already in flight"),
            NavigationError::UnknownDoor(door) => write!(f, "unknown {door}"),
            NavigationError::UnknownStair(stair) => write!(f, "unknown {stair}"),
            NavigationError::DoorNotEnterable(door) => write!(f, "{door} cannot be entered"),
            NavigationError::DoorNotReachable(door) => {
                write!(f, "{door} is not reachable from the current location")
            }
            NavigationError::NotEntryDoor(door) => {
                write!(f, "{door} is not the door the interior was entered through")
            }
            NavigationError::NestingLimit(door) => {
                write!(f, "cannot enter {door}: a secondary interior is already open")
            }
            NavigationError::NotInterior => write!(f, "not inside a building"),
            NavigationError::MissingPose(door) => write!(f, "no arrival pose for {door}"),
            NavigationError::StairNotLinked(stair, direction) => {
                write!(f, "{stair} does not lead {direction}")
            }
            NavigationError::NoHoveredDoor => write!(f, "no door in view"),
            NavigationError::NoHoveredStair => write!(f, "no stair in view"),
            NavigationError::NoDoorAction(door) => write!(f, "{door} offers no action"),
            NavigationError::ModeUnavailableInside(mode) => {
                write!(f, "{mode} mode is not available inside buildings")
            }
        }
    }
}

impl std::error::Error for NavigationError {}

/// Errors that can occur while reading a scene file.
#[derive(Debug)]
pub enum SceneConfigError {
    /// Standard I/O error.
    IoError(std::io::Error),
    /// JSON deserialization error.
    JsonError(serde_json::Error),
}

impl std::fmt::Display for SceneConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneConfigError::IoError(e) => write!(f, "IO error: {e}"),
            SceneConfigError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for SceneConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneConfigError::IoError(e) => Some(e),
            SceneConfigError::JsonError(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SceneConfigError {
    fn from(e: std::io::Error) -> Self {
        SceneConfigError::IoError(e)
    }
}

impl From<serde_json::Error> for SceneConfigError {
    fn from(e: serde_json::Error) -> Self {
        SceneConfigError::JsonError(e)
    }
}
