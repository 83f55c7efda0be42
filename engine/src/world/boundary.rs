//! Boundary Service
//!
//! Keeps the viewpoint inside legal regions: the exterior box while outside,
//! and the active room's volumes while inside.
//!
//! ## Clamping
//!
//! - **Exterior**: a single box; per-axis clamp into the box shrunk by the padding.
//! - **Room**: one or more volumes. A point inside any volume's geometry is
//!   returned unchanged. Otherwise it is pulled into the volume whose surface
//!   is nearest, so L-shaped halls and corridors work without a convex hull.
//!
//! Both policies are idempotent: `clamp(clamp(p)) == clamp(p)`.

use std::collections::HashMap;

use glam::Vec3;

use crate::physics::{Aabb, Volume};
use crate::world::entities::RoomId;

/// A region the viewpoint may occupy.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// Single axis-aligned box (the exterior)
    Region(Aabb),
    /// Union of volumes (an interior room)
    Volumes(Vec<Volume>),
}

impl Boundary {
    /// Whether the point lies in the region (exact geometry, no padding).
    pub fn contains(&self, point: Vec3) -> bool {
        match self {
            Boundary::Region(aabb) => aabb.contains(point, crate::physics::volume::CONTAINMENT_TOLERANCE),
            Boundary::Volumes(volumes) => volumes.iter().any(|v| v.contains(point)),
        }
    }

    /// Clamp a point into the region, keeping `padding` from its faces.
    ///
    /// An empty volume set imposes no constraint.
    pub fn clamp(&self, point: Vec3, padding: f32) -> Vec3 {
        match self {
            Boundary::Region(aabb) => aabb.clamp_inside(point, padding),
            Boundary::Volumes(volumes) => {
                if volumes.iter().any(|v| v.contains(point)) {
                    return point;
                }
                let nearest = volumes.iter().filter(|v| v.is_valid()).min_by(|a, b| {
                    a.distance_to(point).total_cmp(&b.distance_to(point))
                });
                match nearest {
                    Some(volume) => volume.clamp_inside(point, padding),
                    None => point,
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Boundary::Volumes(volumes) if volumes.is_empty())
    }
}

/// Governing boundary selection plus clamping.
#[derive(Debug, Clone)]
pub struct BoundaryService {
    /// Always present, ignored while a room is active
    exterior: Boundary,
    rooms: HashMap<RoomId, Boundary>,
    active_room: Option<RoomId>,
    padding: f32,
}

impl BoundaryService {
    pub fn new(exterior: Aabb, padding: f32) -> Self {
        Self {
            exterior: Boundary::Region(exterior),
            rooms: HashMap::new(),
            active_room: None,
            padding: padding.max(0.0),
        }
    }

    /// Register (or replace) a room's boundary. Volumes that enclose no space are dropped.
    pub fn insert_room(&mut self, room: RoomId, mut volumes: Vec<Volume>) {
        let before = volumes.len();
        volumes.retain(Volume::is_valid);
        if volumes.len() < before {
            log::warn!(
                "[Boundary] {room}: dropped {} degenerate volume(s)",
                before - volumes.len()
            );
        }
        self.rooms.insert(room, Boundary::Volumes(volumes));
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn active_room(&self) -> Option<RoomId> {
        self.active_room
    }

    /// Make a room's boundary the governing one.
    ///
    /// Unknown rooms are refused so the viewpoint is never left unconstrained
    /// by a typo; the exterior keeps governing instead.
    pub fn activate_room(&mut self, room: RoomId) -> bool {
        if !self.rooms.contains_key(&room) {
            log::error!("[Boundary] no boundary registered for {room}");
            return false;
        }
        if let Some(previous) = self.active_room.replace(room) {
            if previous != room {
                log::debug!("[Boundary] {previous} -> {room}");
            }
        }
        true
    }

    /// Disable a room's boundary; the exterior governs again if it was active.
    pub fn deactivate_room(&mut self, room: RoomId) {
        if self.active_room == Some(room) {
            self.active_room = None;
        }
    }

    /// The boundary currently constraining the viewpoint.
    pub fn governing(&self) -> &Boundary {
        self.active_room
            .and_then(|room| self.rooms.get(&room))
            .unwrap_or(&self.exterior)
    }

    pub fn exterior(&self) -> &Boundary {
        &self.exterior
    }

    pub fn room(&self, room: RoomId) -> Option<&Boundary> {
        self.rooms.get(&room)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.governing().contains(point)
    }

    /// Clamp against the governing boundary.
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        self.governing().clamp(point, self.padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exterior() -> Aabb {
        Aabb::new(Vec3::new(-100.0, 0.0, -100.0), Vec3::new(100.0, 300.0, 100.0))
    }

    /// Two disjoint boxes joined only in spirit: a hall and an annex
    fn split_room() -> Vec<Volume> {
        vec![
            Volume::Box(Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 4.0, 10.0))),
            Volume::Box(Aabb::new(Vec3::new(20.0, 0.0, 0.0), Vec3::new(30.0, 4.0, 10.0))),
        ]
    }

    #[test]
    fn test_exterior_governs_by_default() {
        let service = BoundaryService::new(exterior(), 0.5);
        let clamped = service.clamp(Vec3::new(500.0, 10.0, 0.0));
        assert_eq!(clamped, Vec3::new(99.5, 10.0, 0.0));
    }

    #[test]
    fn test_room_governs_while_active() {
        let mut service = BoundaryService::new(exterior(), 0.5);
        service.insert_room(RoomId(0), split_room());
        assert!(service.activate_room(RoomId(0)));
        let clamped = service.clamp(Vec3::new(50.0, 2.0, 5.0));
        assert_eq!(clamped, Vec3::new(29.5, 2.0, 5.0));

        service.deactivate_room(RoomId(0));
        assert_eq!(service.clamp(Vec3::new(50.0, 2.0, 5.0)), Vec3::new(50.0, 2.0, 5.0));
    }

    #[test]
    fn test_point_inside_any_volume_is_unchanged() {
        let boundary = Boundary::Volumes(split_room());
        // Within padding distance of a wall, but inside the geometry
        let p = Vec3::new(9.9, 2.0, 0.1);
        assert_eq!(boundary.clamp(p, 0.5), p);
    }

    #[test]
    fn test_gap_point_goes_to_nearest_volume() {
        let boundary = Boundary::Volumes(split_room());
        let near_annex = boundary.clamp(Vec3::new(18.0, 2.0, 5.0), 0.5);
        assert_eq!(near_annex, Vec3::new(20.5, 2.0, 5.0));
        let near_hall = boundary.clamp(Vec3::new(12.0, 2.0, 5.0), 0.5);
        assert_eq!(near_hall, Vec3::new(9.5, 2.0, 5.0));
    }

    #[test]
    fn test_unknown_room_is_refused() {
        let mut service = BoundaryService::new(exterior(), 0.5);
        assert!(!service.activate_room(RoomId(7)));
        assert_eq!(service.active_room(), None);
    }

    #[test]
    fn test_empty_room_imposes_no_constraint() {
        let boundary = Boundary::Volumes(Vec::new());
        assert!(boundary.is_empty());
        let p = Vec3::new(1.0e4, -3.0, 2.0);
        assert_eq!(boundary.clamp(p, 0.5), p);
    }
}
