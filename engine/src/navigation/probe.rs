//! Ray Probe
//!
//! One ray per tick from the viewpoint along its forward axis, tested against
//! a set of candidate entities. A candidate only counts when nothing else
//! lies between the viewpoint and the point where the ray met it, so a door
//! behind a wall is never picked.

use glam::Vec3;

use crate::camera::raycast::forward_ray;
use crate::camera::viewpoint::Viewpoint;
use crate::physics::{EntityId, SceneQuery};

/// Nearest unoccluded candidate hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit<T> {
    pub target: T,
    pub entity: EntityId,
    pub point: Vec3,
    pub distance: f32,
}

/// Forward ray tester with a range limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayProbe {
    pub max_distance: f32,
}

impl RayProbe {
    pub fn new(max_distance: f32) -> Self {
        Self { max_distance }
    }

    /// Find the nearest candidate hit by the forward ray.
    ///
    /// Candidates are `(target, geometry)` pairs; the target is handed back in
    /// the hit so callers get their own ids, not geometry ids.
    pub fn probe<T: Copy>(
        &self,
        scene: &dyn SceneQuery,
        viewpoint: &Viewpoint,
        candidates: impl IntoIterator<Item = (T, EntityId)>,
    ) -> Option<ProbeHit<T>> {
        let (origin, direction) = forward_ray(viewpoint);
        let mut best: Option<ProbeHit<T>> = None;

        for (target, entity) in candidates {
            let Some(hit) = scene.intersect_entity(entity, origin, direction, self.max_distance) else {
                continue;
            };
            if best.is_some_and(|b| b.distance <= hit.distance) {
                continue;
            }
            if scene.occluded_between(origin, hit.point, entity) {
                continue;
            }
            best = Some(ProbeHit {
                target,
                entity,
                point: hit.point,
                distance: hit.distance,
            });
        }
        best
    }
}

/// Per-system hover state, re-evaluated every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverState<T> {
    Idle,
    Hovering { target: T, distance: f32 },
}

impl<T> Default for HoverState<T> {
    fn default() -> Self {
        HoverState::Idle
    }
}

impl<T: Copy + PartialEq> HoverState<T> {
    pub fn target(&self) -> Option<T> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering { target, .. } => Some(*target),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, HoverState::Idle)
    }

    /// Hover state for a probe result given the UI activation distance.
    pub fn from_hit(hit: Option<ProbeHit<T>>, ui_distance: f32) -> Self {
        match hit {
            Some(hit) if hit.distance <= ui_distance => HoverState::Hovering {
                target: hit.target,
                distance: hit.distance,
            },
            _ => HoverState::Idle,
        }
    }
}
