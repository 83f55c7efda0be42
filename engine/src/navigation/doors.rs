//! Door Transition System
//!
//! Probes the doors reachable from where the viewpoint is and shows the
//! hovered door's label and, when it offers one, its enter/exit button.
//!
//! Candidate doors:
//! - outside: every door on the exterior
//! - inside: doors located in the current room, plus the door used to enter

use crate::activation::{ActivationTarget, EntityActivation, SceneServices, UiElement};
use crate::camera::viewpoint::Viewpoint;
use crate::config::ProbeConfig;
use crate::navigation::interior::{DoorAction, InteriorState, door_action};
use crate::navigation::probe::{HoverState, RayProbe};
use crate::physics::EntityId;
use crate::world::entities::DoorId;
use crate::world::scene::NavigationScene;

/// Doors the probe may pick from the current state.
pub fn door_candidates(scene: &NavigationScene, state: &InteriorState) -> Vec<DoorId> {
    if !state.is_interior {
        return scene
            .doors()
            .iter()
            .filter(|door| door.is_exterior())
            .map(|door| door.id)
            .collect();
    }
    let mut candidates: Vec<DoorId> = state
        .current_room
        .and_then(|room| scene.room(room))
        .map(|room| room.doors.clone())
        .unwrap_or_default();
    if let Some(entry) = state.current_entry_door {
        if !candidates.contains(&entry) {
            candidates.push(entry);
        }
    }
    candidates
}

#[derive(Debug, Clone)]
pub struct DoorSystem {
    probe: RayProbe,
    ui_distance: f32,
    hover: HoverState<DoorId>,
    /// Affordances currently on screen: door and whether its button is shown
    shown: Option<(DoorId, bool)>,
}

impl DoorSystem {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            probe: RayProbe::new(config.max_distance),
            ui_distance: config.door_ui_distance,
            hover: HoverState::Idle,
            shown: None,
        }
    }

    pub fn hover(&self) -> HoverState<DoorId> {
        self.hover
    }

    pub fn hovered(&self) -> Option<DoorId> {
        self.hover.target()
    }

    /// Action the hovered door offers right now.
    pub fn hovered_action(&self, scene: &NavigationScene, state: &InteriorState) -> Option<DoorAction> {
        let door = scene.door(self.hovered()?)?;
        door_action(door, state)
    }

    /// Re-evaluate hovering for this tick. Returns `true` when the hovered door changed.
    pub fn update(
        &mut self,
        services: &mut dyn SceneServices,
        scene: &NavigationScene,
        viewpoint: &Viewpoint,
        state: &InteriorState,
    ) -> bool {
        let candidates: Vec<(DoorId, EntityId)> = door_candidates(scene, state)
            .into_iter()
            .filter_map(|id| scene.door(id).map(|door| (id, door.geometry)))
            .collect();
        let hit = self.probe.probe(services.query(), viewpoint, candidates);
        let hover = HoverState::from_hit(hit, self.ui_distance);
        let changed = hover.target() != self.hover.target();
        if changed {
            log::debug!("[Doors] hover {:?} -> {:?}", self.hover.target(), hover.target());
        }
        self.hover = hover;

        let wanted = hover
            .target()
            .map(|id| (id, scene.door(id).and_then(|door| door_action(door, state)).is_some()));
        self.show(wanted, services.activation());
        changed
    }

    /// Go idle and hide everything (a transition took over).
    pub fn clear(&mut self, activation: &mut dyn EntityActivation) -> bool {
        let changed = !self.hover.is_idle();
        self.hover = HoverState::Idle;
        self.show(None, activation);
        changed
    }

    fn show(&mut self, wanted: Option<(DoorId, bool)>, activation: &mut dyn EntityActivation) {
        if wanted == self.shown {
            return;
        }
        if let Some((door, _)) = self.shown {
            activation.set_active(ActivationTarget::Ui(UiElement::DoorLabel(door)), false);
            activation.set_active(ActivationTarget::Ui(UiElement::DoorButton(door)), false);
        }
        if let Some((door, button)) = wanted {
            activation.set_active(ActivationTarget::Ui(UiElement::DoorLabel(door)), true);
            activation.set_active(ActivationTarget::Ui(UiElement::DoorButton(door)), button);
        }
        self.shown = wanted;
    }
}
