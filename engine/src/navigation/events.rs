//! Navigation Events
//!
//! Everything the host may want to react to (fog and lighting changes,
//! floor banners, label placement) is reported as a [`NavigationEvent`]
//! queued by the navigator and drained once per frame.

use crate::camera::mode::Mode;
use crate::world::entities::{DoorId, FloorDirection, RoomId, StairId};

/// What a transition is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Through a door into a room (from outside, or from a primary interior)
    Enter(DoorId),
    /// Back out through the door that was used to enter
    Exit(DoorId),
    /// One floor up or down via a stair
    ChangeFloor {
        from: StairId,
        to: StairId,
        direction: FloorDirection,
    },
}

/// Which entity a placed label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelTarget {
    Door(DoorId),
    Stair(StairId),
}

/// A label height computed by the label scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub target: LabelTarget,
    /// World height the label floats at
    pub height: f32,
    /// Whether a surface was found below the anchor
    pub grounded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    ModeChanged { from: Mode, to: Mode },
    TransitionStarted(TransitionKind),
    TransitionFinished(TransitionKind),
    /// Arrived in a room through a door
    EnteredRoom { room: RoomId, door: DoorId },
    /// Back outside
    ReturnedToExterior { door: DoorId },
    /// The floor banner should change; `None` hides it
    FloorChanged {
        room: Option<RoomId>,
        floor_name: Option<String>,
    },
    /// Lighting multiplier for the current surroundings
    LightingChanged { factor: f32 },
    DoorHoverChanged(Option<DoorId>),
    StairHoverChanged(Option<StairId>),
    LabelPlaced(LabelPlacement),
}
