//! World Module
//!
//! The static description of the campus: rooms, doors and stairs resolved
//! from a scene file, and the boundaries that keep the viewpoint in legal
//! regions.
//!
//! ## Lifecycle
//! A [`SceneConfig`] is read once at startup and resolved into a
//! [`NavigationScene`]. Afterwards only the viewpoint, the active mode and the
//! interior/exterior state change.

pub mod boundary;
pub mod entities;
pub mod scene;

pub use boundary::{Boundary, BoundaryService};
pub use entities::{Door, DoorId, FloorDirection, Room, RoomId, Stair, StairId, StairType};
pub use scene::{ConfigIssue, DoorConfig, NavigationScene, RoomConfig, SceneConfig, StairConfig};
