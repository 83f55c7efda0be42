//! Scene Query Service
//!
//! The navigation core never touches meshes directly. It asks a
//! [`SceneQuery`] implementation to cast rays against collidable geometry and
//! to check whether anything blocks the straight path between two points.
//!
//! [`SceneGeometry`] is the in-memory implementation used by the demo binary
//! and the tests: a flat list of box colliders that can be toggled on and off.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Distance kept short of the far point when checking occlusion, so the
/// target's own surface never counts as a blocker.
pub const OCCLUSION_EPSILON: f32 = 1e-3;

/// Identity of a piece of scene geometry (or any other activatable entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Result of a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space position where the ray met the surface
    pub point: Vec3,
    /// Outward surface normal at the hit point
    pub normal: Vec3,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// Entity that owns the surface
    pub entity: EntityId,
}

/// Geometry queries consumed by the navigation core.
pub trait SceneQuery {
    /// Nearest hit against every active collider within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Hit against one specific entity's geometry, ignoring everything else.
    fn intersect_entity(
        &self,
        entity: EntityId,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit>;

    /// Whether any active geometry other than `ignoring` lies on the segment `a -> b`.
    fn occluded_between(&self, a: Vec3, b: Vec3, ignoring: EntityId) -> bool;
}

/// A box collider owned by an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub entity: EntityId,
    pub bounds: Aabb,
    /// Inactive colliders are invisible to every query
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Collider {
    pub fn new(entity: EntityId, bounds: Aabb) -> Self {
        Self {
            entity,
            bounds,
            active: true,
        }
    }

    fn hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let t = self.bounds.ray_intersect(origin, direction)?;
        if t > max_distance {
            return None;
        }
        let point = origin + direction * t;
        Some(RayHit {
            point,
            normal: self.bounds.surface_normal(point),
            distance: t,
            entity: self.entity,
        })
    }
}

/// In-memory scene made of box colliders.
///
/// An entity may own several colliders (a door frame and its leaf, for example).
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    colliders: Vec<Collider>,
    /// Collider indices per entity
    index: HashMap<EntityId, Vec<usize>>,
}

impl SceneGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from a list of colliders.
    pub fn from_colliders(colliders: impl IntoIterator<Item = Collider>) -> Self {
        let mut scene = Self::new();
        for collider in colliders {
            scene.insert(collider);
        }
        scene
    }

    pub fn insert(&mut self, collider: Collider) {
        self.index
            .entry(collider.entity)
            .or_default()
            .push(self.colliders.len());
        self.colliders.push(collider);
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Enable or disable every collider of an entity.
    ///
    /// Returns `false` when the entity owns no geometry.
    pub fn set_active(&mut self, entity: EntityId, active: bool) -> bool {
        match self.index.get(&entity) {
            Some(indices) => {
                for &i in indices {
                    self.colliders[i].active = active;
                }
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, entity: EntityId) -> bool {
        self.index
            .get(&entity)
            .is_some_and(|indices| indices.iter().any(|&i| self.colliders[i].active))
    }

    fn active(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter().filter(|c| c.active)
    }
}

/// Keep the closer of two optional hits.
fn nearer(best: Option<RayHit>, hit: Option<RayHit>) -> Option<RayHit> {
    match (best, hit) {
        (Some(b), Some(h)) if h.distance < b.distance => Some(h),
        (None, h) => h,
        (b, _) => b,
    }
}

impl SceneQuery for SceneGeometry {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        self.active()
            .fold(None, |best, c| nearer(best, c.hit(origin, direction, max_distance)))
    }

    fn intersect_entity(
        &self,
        entity: EntityId,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let indices = self.index.get(&entity)?;
        indices
            .iter()
            .map(|&i| &self.colliders[i])
            .filter(|c| c.active)
            .fold(None, |best, c| nearer(best, c.hit(origin, direction, max_distance)))
    }

    fn occluded_between(&self, a: Vec3, b: Vec3, ignoring: EntityId) -> bool {
        let segment = b - a;
        let length = segment.length();
        if length <= OCCLUSION_EPSILON {
            return false;
        }
        let direction = segment / length;
        let reach = length - OCCLUSION_EPSILON;
        self.active()
            .filter(|c| c.entity != ignoring)
            .any(|c| c.hit(a, direction, reach).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab_at_z(entity: u32, z: f32) -> Collider {
        Collider::new(
            EntityId(entity),
            Aabb::new(Vec3::new(-1.0, 0.0, z - 0.1), Vec3::new(1.0, 3.0, z + 0.1)),
        )
    }

    #[test]
    fn test_raycast_returns_nearest() {
        let scene = SceneGeometry::from_colliders([slab_at_z(1, 10.0), slab_at_z(2, 4.0)]);
        let hit = scene.raycast(Vec3::new(0.0, 1.5, 0.0), Vec3::Z, 50.0).unwrap();
        assert_eq!(hit.entity, EntityId(2));
        assert!((hit.distance - 3.9).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let scene = SceneGeometry::from_colliders([slab_at_z(1, 10.0)]);
        assert!(scene.raycast(Vec3::new(0.0, 1.5, 0.0), Vec3::Z, 5.0).is_none());
    }

    #[test]
    fn test_intersect_entity_ignores_other_geometry() {
        let scene = SceneGeometry::from_colliders([slab_at_z(1, 10.0), slab_at_z(2, 4.0)]);
        let hit = scene
            .intersect_entity(EntityId(1), Vec3::new(0.0, 1.5, 0.0), Vec3::Z, 50.0)
            .unwrap();
        assert_eq!(hit.entity, EntityId(1));
        assert!((hit.distance - 9.9).abs() < 1e-4);
    }

    #[test]
    fn test_occluded_between_detects_wall() {
        let scene = SceneGeometry::from_colliders([slab_at_z(1, 10.0), slab_at_z(2, 4.0)]);
        let origin = Vec3::new(0.0, 1.5, 0.0);
        let door_point = Vec3::new(0.0, 1.5, 9.9);
        assert!(scene.occluded_between(origin, door_point, EntityId(1)));
    }

    #[test]
    fn test_target_surface_is_not_an_occluder() {
        let scene = SceneGeometry::from_colliders([slab_at_z(1, 10.0)]);
        let origin = Vec3::new(0.0, 1.5, 0.0);
        assert!(!scene.occluded_between(origin, Vec3::new(0.0, 1.5, 9.9), EntityId(1)));
    }

    #[test]
    fn test_inactive_colliders_are_skipped() {
        let mut scene = SceneGeometry::from_colliders([slab_at_z(1, 10.0), slab_at_z(2, 4.0)]);
        assert!(scene.set_active(EntityId(2), false));
        assert!(!scene.is_active(EntityId(2)));
        let hit = scene.raycast(Vec3::new(0.0, 1.5, 0.0), Vec3::Z, 50.0).unwrap();
        assert_eq!(hit.entity, EntityId(1));
        assert!(!scene.set_active(EntityId(99), false));
    }
}
