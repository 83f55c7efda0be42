//! Activation Toggles
//!
//! The navigation core shows and hides things it does not own: interior
//! geometry when a room is entered, joysticks and zoom buttons when the mode
//! changes, door and stair affordances while one is hovered. It does so
//! through the [`EntityActivation`] trait.
//!
//! [`ActivationLog`] is an in-memory implementation that remembers the last
//! state of every target and the order of every call. [`SceneHost`] pairs it
//! with [`SceneGeometry`] so entity toggles also reach the colliders.

use std::collections::HashMap;

use glam::Vec3;

use crate::physics::{EntityId, RayHit, SceneGeometry, SceneQuery};
use crate::world::entities::{DoorId, StairId};

/// A piece of UI owned by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiElement {
    /// Movement and look joysticks
    Joysticks,
    /// Zoom in/out buttons
    ZoomButtons,
    /// Compass rose
    Compass,
    /// Floor name banner shown while inside
    FloorLabel,
    /// Name label of a hovered door
    DoorLabel(DoorId),
    /// Enter/exit button of a hovered door
    DoorButton(DoorId),
    /// Name label of a hovered stair
    StairLabel(StairId),
    /// "Up one floor" button of a hovered stair
    StairUpButton(StairId),
    /// "Down one floor" button of a hovered stair
    StairDownButton(StairId),
}

/// Anything the core can switch on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationTarget {
    Entity(EntityId),
    Ui(UiElement),
}

impl From<EntityId> for ActivationTarget {
    fn from(entity: EntityId) -> Self {
        ActivationTarget::Entity(entity)
    }
}

impl From<UiElement> for ActivationTarget {
    fn from(element: UiElement) -> Self {
        ActivationTarget::Ui(element)
    }
}

/// Per-entity activation toggle provided by the host.
pub trait EntityActivation {
    fn set_active(&mut self, target: ActivationTarget, active: bool);
}

/// Records activation calls.
#[derive(Debug, Clone, Default)]
pub struct ActivationLog {
    states: HashMap<ActivationTarget, bool>,
    history: Vec<(ActivationTarget, bool)>,
}

impl ActivationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state set for a target; targets never touched count as inactive.
    pub fn is_active(&self, target: impl Into<ActivationTarget>) -> bool {
        self.states.get(&target.into()).copied().unwrap_or(false)
    }

    /// Whether the target has ever been set.
    pub fn was_set(&self, target: impl Into<ActivationTarget>) -> bool {
        self.states.contains_key(&target.into())
    }

    /// Every call in order.
    pub fn history(&self) -> &[(ActivationTarget, bool)] {
        &self.history
    }

    /// Targets currently switched on.
    pub fn active_targets(&self) -> impl Iterator<Item = ActivationTarget> + '_ {
        self.states
            .iter()
            .filter(|(_, active)| **active)
            .map(|(target, _)| *target)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl EntityActivation for ActivationLog {
    fn set_active(&mut self, target: ActivationTarget, active: bool) {
        self.states.insert(target, active);
        self.history.push((target, active));
    }
}

/// Geometry entities toggle their colliders; UI targets are not the scene's concern.
impl EntityActivation for SceneGeometry {
    fn set_active(&mut self, target: ActivationTarget, active: bool) {
        if let ActivationTarget::Entity(entity) = target {
            if !SceneGeometry::set_active(self, entity, active) {
                log::debug!("[Activation] {entity} owns no geometry");
            }
        }
    }
}

/// The scene as the host exposes it: ray queries plus the toggle that
/// hides and shows the geometry those queries see.
pub trait SceneServices {
    fn query(&self) -> &dyn SceneQuery;
    fn activation(&mut self) -> &mut dyn EntityActivation;
}

impl<T: SceneQuery + EntityActivation> SceneServices for T {
    fn query(&self) -> &dyn SceneQuery {
        self
    }

    fn activation(&mut self) -> &mut dyn EntityActivation {
        self
    }
}

/// In-memory host: box colliders plus a record of every toggle.
///
/// Entity toggles reach the colliders, so hidden geometry drops out of ray
/// queries. UI toggles are only recorded.
#[derive(Debug, Clone, Default)]
pub struct SceneHost {
    pub geometry: SceneGeometry,
    pub activation: ActivationLog,
}

impl SceneHost {
    pub fn new(geometry: SceneGeometry) -> Self {
        Self {
            geometry,
            activation: ActivationLog::new(),
        }
    }
}

impl EntityActivation for SceneHost {
    fn set_active(&mut self, target: ActivationTarget, active: bool) {
        self.activation.set_active(target, active);
        EntityActivation::set_active(&mut self.geometry, target, active);
    }
}

impl SceneQuery for SceneHost {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.geometry.raycast(origin, direction, max_distance)
    }

    fn intersect_entity(
        &self,
        entity: EntityId,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        self.geometry.intersect_entity(entity, origin, direction, max_distance)
    }

    fn occluded_between(&self, a: Vec3, b: Vec3, ignoring: EntityId) -> bool {
        self.geometry.occluded_between(a, b, ignoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Aabb, Collider};

    #[test]
    fn test_log_tracks_last_state() {
        let mut log = ActivationLog::new();
        log.set_active(UiElement::Compass.into(), true);
        log.set_active(UiElement::Compass.into(), false);
        assert!(!log.is_active(UiElement::Compass));
        assert!(log.was_set(UiElement::Compass));
        assert_eq!(log.history().len(), 2);
    }

    #[test]
    fn test_untouched_target_is_inactive() {
        let log = ActivationLog::new();
        assert!(!log.is_active(EntityId(3)));
        assert!(!log.was_set(EntityId(3)));
    }

    #[test]
    fn test_geometry_activation_toggles_colliders() {
        let mut scene = SceneGeometry::from_colliders([Collider::new(
            EntityId(5),
            Aabb::new(Vec3::new(-1.0, 0.0, 4.0), Vec3::new(1.0, 2.0, 5.0)),
        )]);
        EntityActivation::set_active(&mut scene, EntityId(5).into(), false);
        assert!(scene.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 10.0).is_none());
        EntityActivation::set_active(&mut scene, UiElement::Joysticks.into(), false);
        EntityActivation::set_active(&mut scene, EntityId(5).into(), true);
        assert!(scene.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 10.0).is_some());
    }

    #[test]
    fn test_host_forwards_entity_toggles_to_geometry() {
        let mut host = SceneHost::new(SceneGeometry::from_colliders([Collider::new(
            EntityId(5),
            Aabb::new(Vec3::new(-1.0, 0.0, 4.0), Vec3::new(1.0, 2.0, 5.0)),
        )]));
        let origin = Vec3::new(0.0, 1.0, 0.0);

        host.activation().set_active(EntityId(5).into(), false);
        assert!(!host.activation.is_active(EntityId(5)));
        assert!(host.query().raycast(origin, Vec3::Z, 10.0).is_none());

        host.activation().set_active(UiElement::Compass.into(), true);
        assert!(host.activation.is_active(UiElement::Compass));

        host.activation().set_active(EntityId(5).into(), true);
        assert_eq!(host.query().raycast(origin, Vec3::Z, 10.0).map(|h| h.entity), Some(EntityId(5)));
    }
}
