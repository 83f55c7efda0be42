//! Stair Transition System
//!
//! Stairs are only probed inside, and only those standing in the current
//! room. A hovered stair shows its label plus an "up" and a "down" button for
//! the directions it actually offers.

use crate::activation::{ActivationTarget, EntityActivation, SceneServices, UiElement};
use crate::camera::viewpoint::Viewpoint;
use crate::config::ProbeConfig;
use crate::navigation::interior::InteriorState;
use crate::navigation::probe::{HoverState, RayProbe};
use crate::physics::EntityId;
use crate::world::entities::{FloorDirection, StairId};
use crate::world::scene::NavigationScene;

/// Stairs the probe may pick from the current state.
pub fn stair_candidates(scene: &NavigationScene, state: &InteriorState) -> Vec<StairId> {
    if !state.is_interior {
        return Vec::new();
    }
    state
        .current_room
        .and_then(|room| scene.room(room))
        .map(|room| room.stairs.clone())
        .unwrap_or_default()
}

/// Which stair affordances are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StairAffordances {
    stair: StairId,
    up: bool,
    down: bool,
}

#[derive(Debug, Clone)]
pub struct StairSystem {
    probe: RayProbe,
    ui_distance: f32,
    hover: HoverState<StairId>,
    shown: Option<StairAffordances>,
}

impl StairSystem {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            probe: RayProbe::new(config.max_distance),
            ui_distance: config.stair_ui_distance,
            hover: HoverState::Idle,
            shown: None,
        }
    }

    pub fn hover(&self) -> HoverState<StairId> {
        self.hover
    }

    pub fn hovered(&self) -> Option<StairId> {
        self.hover.target()
    }

    /// Whether the hovered stair offers a direction.
    pub fn hovered_offers(&self, scene: &NavigationScene, direction: FloorDirection) -> bool {
        self.hovered()
            .and_then(|id| scene.stair(id))
            .is_some_and(|stair| stair.offers(direction))
    }

    /// Re-evaluate hovering for this tick. Returns `true` when the hovered stair changed.
    pub fn update(
        &mut self,
        services: &mut dyn SceneServices,
        scene: &NavigationScene,
        viewpoint: &Viewpoint,
        state: &InteriorState,
    ) -> bool {
        let candidates: Vec<(StairId, EntityId)> = stair_candidates(scene, state)
            .into_iter()
            .filter_map(|id| scene.stair(id).map(|stair| (id, stair.geometry)))
            .collect();
        let hit = self.probe.probe(services.query(), viewpoint, candidates);
        let hover = HoverState::from_hit(hit, self.ui_distance);
        let changed = hover.target() != self.hover.target();
        if changed {
            log::debug!("[Stairs] hover {:?} -> {:?}", self.hover.target(), hover.target());
        }
        self.hover = hover;

        let wanted = hover.target().and_then(|id| scene.stair(id)).map(|stair| StairAffordances {
            stair: stair.id,
            up: stair.offers_up(),
            down: stair.offers_down(),
        });
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

    fn show(&mut self, wanted: Option<StairAffordances>, activation: &mut dyn EntityActivation) {
        if wanted == self.shown {
            return;
        }
        if let Some(shown) = self.shown {
            activation.set_active(ActivationTarget::Ui(UiElement::StairLabel(shown.stair)), false);
            activation.set_active(ActivationTarget::Ui(UiElement::StairUpButton(shown.stair)), false);
            activation.set_active(ActivationTarget::Ui(UiElement::StairDownButton(shown.stair)), false);
        }
        if let Some(wanted) = wanted {
            activation.set_active(ActivationTarget::Ui(UiElement::StairLabel(wanted.stair)), true);
            activation.set_active(ActivationTarget::Ui(UiElement::StairUpButton(wanted.stair)), wanted.up);
            activation.set_active(
                ActivationTarget::Ui(UiElement::StairDownButton(wanted.stair)),
                wanted.down,
            );
        }
        self.shown = wanted;
    }
}
