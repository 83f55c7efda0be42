//! Transition Entities and Rooms
//!
//! Doors, stairs and rooms as they exist after the scene has been loaded.
//! Every cross reference is a typed id resolved once at load time; nothing
//! looks an entity up by name while the tour is running.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::viewpoint::Pose;
use crate::physics::{EntityId, Volume};

/// Index of a door in the loaded scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoorId(pub u32);

/// Index of a stair in the loaded scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StairId(pub u32);

/// Index of a room in the loaded scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub u32);

macro_rules! id_display {
    ($id:ty, $prefix:literal) => {
        impl std::fmt::Display for $id {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl $id {
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

id_display!(DoorId, "door");
id_display!(StairId, "stair");
id_display!(RoomId, "room");

/// A door between the exterior and a room, or between two rooms.
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub id: DoorId,
    pub name: String,
    /// Geometry the forward probe ray is tested against
    pub geometry: EntityId,
    /// Doors that cannot be entered only ever show their label
    pub allow_entering: bool,
    /// Pose the viewpoint arrives at when entering
    pub entry_pose: Option<Pose>,
    /// Pose the viewpoint arrives at when leaving; falls back to the pose saved on entry
    pub exit_pose: Option<Pose>,
    /// Label shown while inside, overriding the room's floor name
    pub floor_name: Option<String>,
    /// Room this door leads into
    pub room: Option<RoomId>,
    /// Room this door is located in; `None` for doors on the exterior
    pub parent_room: Option<RoomId>,
    /// Point the door label is placed above
    pub label_anchor: Vec3,
}

impl Door {
    pub fn is_exterior(&self) -> bool {
        self.parent_room.is_none()
    }
}

/// Which floor affordances a stair may ever offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StairType {
    /// Bottom floor: may go up, never down
    GroundFloor,
    /// In-between floor: may go both ways
    #[default]
    MiddleFloor,
    /// Top floor: may go down, never up
    UpperFloor,
}

impl StairType {
    pub const fn permits_up(self) -> bool {
        !matches!(self, StairType::UpperFloor)
    }

    pub const fn permits_down(self) -> bool {
        !matches!(self, StairType::GroundFloor)
    }
}

/// Up or down one floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloorDirection {
    Up,
    Down,
}

impl std::fmt::Display for FloorDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloorDirection::Up => f.write_str("up"),
            FloorDirection::Down => f.write_str("down"),
        }
    }
}

/// A staircase landing on one floor, linked to the landings above and below.
#[derive(Debug, Clone, PartialEq)]
pub struct Stair {
    pub id: StairId,
    pub name: String,
    pub geometry: EntityId,
    pub floor_name: String,
    pub stair_type: StairType,
    /// Room this landing stands in
    pub room: Option<RoomId>,
    /// Landing one floor up, resolved by name at load
    pub up_stair: Option<StairId>,
    /// Landing one floor down, resolved by name at load
    pub down_stair: Option<StairId>,
    /// Arrival pose when going up from this landing
    pub up_pose: Option<Pose>,
    /// Arrival pose when going down from this landing
    pub down_pose: Option<Pose>,
    pub label_anchor: Vec3,
}

impl Stair {
    /// "Up" is offered only when the link resolved and the stair type allows it.
    pub fn offers_up(&self) -> bool {
        self.stair_type.permits_up() && self.up_stair.is_some() && self.up_pose.is_some()
    }

    /// "Down" is offered only when the link resolved and the stair type allows it.
    pub fn offers_down(&self) -> bool {
        self.stair_type.permits_down() && self.down_stair.is_some() && self.down_pose.is_some()
    }

    pub fn offers(&self, direction: FloorDirection) -> bool {
        match direction {
            FloorDirection::Up => self.offers_up(),
            FloorDirection::Down => self.offers_down(),
        }
    }

    /// Destination landing and arrival pose for a direction, if offered.
    ///
    /// The pose is always this landing's own `up_pose` / `down_pose`, never
    /// the destination's, so no knowledge of the destination frame is needed.
    pub fn link(&self, direction: FloorDirection) -> Option<(StairId, Pose)> {
        if !self.offers(direction) {
            return None;
        }
        match direction {
            FloorDirection::Up => Some((self.up_stair?, self.up_pose?)),
            FloorDirection::Down => Some((self.down_stair?, self.down_pose?)),
        }
    }
}

/// An interior room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Boundary volumes; several volumes describe non-convex footprints
    pub volumes: Vec<Volume>,
    pub floor_name: String,
    /// Default arrival pose for doors without their own entry pose
    pub entry_pose: Option<Pose>,
    /// Doors located in this room (secondary entrances and ways out)
    pub doors: Vec<DoorId>,
    /// Stairs standing in this room
    pub stairs: Vec<StairId>,
    /// Lighting multiplier applied while inside
    pub lighting_factor: f32,
    /// Interior geometry shown only while the room is occupied
    pub interior_entities: Vec<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::viewpoint::Orientation;

    fn stair(stair_type: StairType) -> Stair {
        let pose = Pose::new(Vec3::new(0.0, 5.0, 0.0), Orientation::default());
        Stair {
            id: StairId(0),
            name: "Main Stair".to_string(),
            geometry: EntityId(1),
            floor_name: "Ground".to_string(),
            stair_type,
            room: None,
            up_stair: Some(StairId(1)),
            down_stair: Some(StairId(2)),
            up_pose: Some(pose),
            down_pose: Some(pose),
            label_anchor: Vec3::ZERO,
        }
    }

    #[test]
    fn test_ground_floor_never_offers_down() {
        let s = stair(StairType::GroundFloor);
        assert!(s.offers_up());
        assert!(!s.offers_down());
        assert!(s.link(FloorDirection::Down).is_none());
    }

    #[test]
    fn test_upper_floor_never_offers_up() {
        let s = stair(StairType::UpperFloor);
        assert!(!s.offers_up());
        assert!(s.offers_down());
    }

    #[test]
    fn test_unresolved_link_is_not_offered() {
        let mut s = stair(StairType::MiddleFloor);
        s.up_stair = None;
        assert!(!s.offers_up());
        assert!(s.offers_down());
    }

    #[test]
    fn test_link_uses_own_pose() {
        let s = stair(StairType::MiddleFloor);
        let (target, pose) = s.link(FloorDirection::Up).unwrap();
        assert_eq!(target, StairId(1));
        assert_eq!(pose, s.up_pose.unwrap());
    }
}
