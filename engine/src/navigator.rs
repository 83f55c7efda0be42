//! Campus Navigator
//!
//! The façade the host talks to. It owns the viewpoint, the mode state
//! machine, the boundaries, the door/stair systems and the transition
//! manager, and advances them once per tick:
//!
//! 1. advance the fade overlay
//! 2. step the in-flight transition, or else run the enabled controller
//! 3. probe doors and stairs (or hide their affordances during a transition)
//! 4. place the next batch of labels
//!
//! Host-owned services are passed in each call as [`Collaborators`].

use crate::activation::{ActivationTarget, EntityActivation, SceneServices, UiElement};
use crate::camera::mode::{FogPreset, Mode, UiVisibility};
use crate::camera::mode_state::{ModeStateMachine, ModeSwitch};
use crate::camera::viewpoint::Viewpoint;
use crate::config::NavigatorConfig;
use crate::error::NavigationError;
use crate::input::NavigationInput;
use crate::navigation::doors::DoorSystem;
use crate::navigation::events::{LabelTarget, NavigationEvent};
use crate::navigation::fade::FadeOverlay;
use crate::navigation::interior::{DoorAction, InteriorExteriorManager, InteriorState};
use crate::navigation::labels::LabelHeightScan;
use crate::navigation::stairs::StairSystem;
use crate::world::boundary::BoundaryService;
use crate::world::entities::{DoorId, FloorDirection, RoomId, StairId};
use crate::world::scene::{NavigationScene, SceneConfig};

/// Host services the navigator uses during a call.
pub struct Collaborators<'a> {
    pub scene: &'a mut dyn SceneServices,
    pub fade: &'a mut dyn FadeOverlay,
}

impl<'a> Collaborators<'a> {
    pub fn new(scene: &'a mut dyn SceneServices, fade: &'a mut dyn FadeOverlay) -> Self {
        Self { scene, fade }
    }
}

pub struct CampusNavigator {
    scene: NavigationScene,
    /// `None` while detached (scene reload)
    viewpoint: Option<Viewpoint>,
    modes: ModeStateMachine,
    boundary: BoundaryService,
    manager: InteriorExteriorManager,
    doors: DoorSystem,
    stairs: StairSystem,
    labels: LabelHeightScan,
    events: Vec<NavigationEvent>,
}

impl CampusNavigator {
    /// Create a navigator for a resolved scene and enter the start mode.
    pub fn new(
        scene: NavigationScene,
        config: &NavigatorConfig,
        activation: &mut dyn EntityActivation,
    ) -> Self {
        let boundary = scene.boundary_service(config.boundary.padding);
        let mut modes = ModeStateMachine::new(&config.modes, config.start_mode);

        // Interior geometry stays hidden until its room is entered
        for room in scene.rooms() {
            for &entity in &room.interior_entities {
                activation.set_active(ActivationTarget::Entity(entity), false);
            }
        }
        activation.set_active(ActivationTarget::Ui(UiElement::FloorLabel), false);

        let mut viewpoint = Viewpoint::default();
        match scene.start_pose() {
            Some(pose) => {
                viewpoint.set_pose(pose);
                viewpoint.position = boundary.clamp(viewpoint.position);
                modes.restore_mode(config.start_mode, activation);
            }
            None => {
                if let Err(err) =
                    modes.switch_mode(config.start_mode, &mut viewpoint, false, &boundary, activation)
                {
                    log::error!("[Navigator] start mode {}: {err}", config.start_mode);
                }
            }
        }

        let mut labels = LabelHeightScan::new(config.labels.clone());
        labels.schedule(&scene);

        log::info!(
            "[Navigator] started in {} at {:?}",
            modes.current_mode(),
            viewpoint.position
        );

        Self {
            scene,
            viewpoint: Some(viewpoint),
            modes,
            boundary,
            manager: InteriorExteriorManager::new(config.transition.clone()),
            doors: DoorSystem::new(&config.probe),
            stairs: StairSystem::new(&config.probe),
            labels,
            events: Vec::new(),
        }
    }

    /// Resolve a scene file and create a navigator with its tunables.
    pub fn from_config(config: &SceneConfig, activation: &mut dyn EntityActivation) -> Self {
        let scene = NavigationScene::from_config(config);
        Self::new(scene, &config.navigator, activation)
    }

    /// Advance everything by one tick.
    pub fn tick(&mut self, delta_time: f32, input: &NavigationInput, services: &mut Collaborators<'_>) {
        services.fade.tick(delta_time);

        let Some(mut viewpoint) = self.viewpoint else {
            return;
        };

        if self.manager.is_transitioning() {
            self.manager.step(
                delta_time,
                &mut viewpoint,
                &self.scene,
                &mut self.boundary,
                &mut self.modes,
                services.scene.activation(),
                &mut *services.fade,
                &mut self.events,
            );
        } else {
            self.modes.update(&mut viewpoint, input, &self.boundary, delta_time);
        }

        if self.manager.is_transitioning() {
            if self.doors.clear(services.scene.activation()) {
                self.events.push(NavigationEvent::DoorHoverChanged(None));
            }
            if self.stairs.clear(services.scene.activation()) {
                self.events.push(NavigationEvent::StairHoverChanged(None));
            }
        } else {
            let state = self.manager.state();
            if self.doors.update(&mut *services.scene, &self.scene, &viewpoint, state) {
                self.events.push(NavigationEvent::DoorHoverChanged(self.doors.hovered()));
            }
            if self.stairs.update(&mut *services.scene, &self.scene, &viewpoint, state) {
                self.events.push(NavigationEvent::StairHoverChanged(self.stairs.hovered()));
            }
        }

        for placement in self.labels.step(services.scene.query()) {
            self.events.push(NavigationEvent::LabelPlaced(placement));
        }

        self.viewpoint = Some(viewpoint);
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Viewpoint a new transition may start from.
    fn transition_origin(&self) -> Result<Viewpoint, NavigationError> {
        if self.manager.is_transitioning() {
            log::warn!("[Navigator] request dropped, transition in flight");
            return Err(NavigationError::TransitionInFlight);
        }
        self.viewpoint.ok_or_else(|| {
            log::error!("[Navigator] request aborted, viewpoint detached");
            NavigationError::ViewpointUnavailable
        })
    }

    pub fn switch_mode(
        &mut self,
        mode: Mode,
        services: &mut Collaborators<'_>,
    ) -> Result<ModeSwitch, NavigationError> {
        if self.manager.is_transitioning() {
            log::warn!("[Navigator] mode switch to {mode} dropped, transition in flight");
            return Err(NavigationError::TransitionInFlight);
        }
        let viewpoint = self
            .viewpoint
            .as_mut()
            .ok_or(NavigationError::ViewpointUnavailable)?;
        let result = self.modes.switch_mode(
            mode,
            viewpoint,
            self.manager.state().is_interior,
            &self.boundary,
            services.scene.activation(),
        )?;
        if let ModeSwitch::Changed { from, to } = result {
            self.events.push(NavigationEvent::ModeChanged { from, to });
        }
        Ok(result)
    }

    /// Enter a room through a door.
    pub fn enter_door(&mut self, door: DoorId, services: &mut Collaborators<'_>) -> Result<(), NavigationError> {
        let viewpoint = self.transition_origin()?;
        let kind = self.manager.request_enter(
            &self.scene,
            door,
            &viewpoint,
            self.modes.current_mode(),
            &mut *services.fade,
        )?;
        self.events.push(NavigationEvent::TransitionStarted(kind));
        Ok(())
    }

    /// Leave through the door that was used to enter.
    pub fn exit_door(&mut self, door: DoorId, services: &mut Collaborators<'_>) -> Result<(), NavigationError> {
        let viewpoint = self.transition_origin()?;
        let kind = self
            .manager
            .request_exit(&self.scene, door, &viewpoint, &mut *services.fade)?;
        self.events.push(NavigationEvent::TransitionStarted(kind));
        Ok(())
    }

    /// Move one floor up or down from a stair.
    pub fn change_floor(
        &mut self,
        stair: StairId,
        direction: FloorDirection,
        services: &mut Collaborators<'_>,
    ) -> Result<(), NavigationError> {
        self.transition_origin()?;
        let kind = self
            .manager
            .request_floor_change(&self.scene, stair, direction, &mut *services.fade)?;
        self.events.push(NavigationEvent::TransitionStarted(kind));
        Ok(())
    }

    /// "Up" button of the hovered stair.
    pub fn go_up_one_floor(&mut self, services: &mut Collaborators<'_>) -> Result<(), NavigationError> {
        let stair = self.stairs.hovered().ok_or(NavigationError::NoHoveredStair)?;
        self.change_floor(stair, FloorDirection::Up, services)
    }

    /// "Down" button of the hovered stair.
    pub fn go_down_one_floor(&mut self, services: &mut Collaborators<'_>) -> Result<(), NavigationError> {
        let stair = self.stairs.hovered().ok_or(NavigationError::NoHoveredStair)?;
        self.change_floor(stair, FloorDirection::Down, services)
    }

    /// Enter/exit button of the hovered door.
    pub fn confirm_door_action(&mut self, services: &mut Collaborators<'_>) -> Result<(), NavigationError> {
        let door = self.doors.hovered().ok_or(NavigationError::NoHoveredDoor)?;
        match self.doors.hovered_action(&self.scene, self.manager.state()) {
            Some(DoorAction::Enter) => self.enter_door(door, services),
            Some(DoorAction::Exit) => self.exit_door(door, services),
            None => Err(NavigationError::NoDoorAction(door)),
        }
    }

    /// Block or allow user movement (e.g. while a modal dialog is open).
    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.modes.set_movement_enabled(enabled);
    }

    /// Take the viewpoint away (scene reload). Requests fail until it is attached again.
    pub fn detach_viewpoint(&mut self) -> Option<Viewpoint> {
        log::debug!("[Navigator] viewpoint detached");
        self.viewpoint.take()
    }

    pub fn attach_viewpoint(&mut self, viewpoint: Viewpoint) {
        log::debug!("[Navigator] viewpoint attached");
        self.viewpoint = Some(viewpoint);
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn current_mode(&self) -> Mode {
        self.modes.current_mode()
    }

    pub fn is_interior(&self) -> bool {
        self.manager.state().is_interior
    }

    pub fn current_room(&self) -> Option<RoomId> {
        self.manager.state().current_room
    }

    pub fn current_floor_name(&self) -> Option<&str> {
        self.manager.state().floor_name.as_deref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.manager.is_transitioning()
    }

    pub fn interior_state(&self) -> &InteriorState {
        self.manager.state()
    }

    pub fn viewpoint(&self) -> Option<&Viewpoint> {
        self.viewpoint.as_ref()
    }

    pub fn scene(&self) -> &NavigationScene {
        &self.scene
    }

    pub fn boundary(&self) -> &BoundaryService {
        &self.boundary
    }

    pub fn modes(&self) -> &ModeStateMachine {
        &self.modes
    }

    pub fn movement_enabled(&self) -> bool {
        self.modes.movement_enabled()
    }

    pub fn ui_visibility(&self) -> UiVisibility {
        self.modes.ui_visibility()
    }

    pub fn fog(&self) -> FogPreset {
        self.modes.fog()
    }

    pub fn hovered_door(&self) -> Option<DoorId> {
        self.doors.hovered()
    }

    pub fn hovered_door_action(&self) -> Option<DoorAction> {
        self.doors.hovered_action(&self.scene, self.manager.state())
    }

    pub fn hovered_stair(&self) -> Option<StairId> {
        self.stairs.hovered()
    }

    pub fn label_height(&self, target: LabelTarget) -> Option<f32> {
        self.labels.height(target)
    }

    pub fn labels_placed(&self) -> bool {
        self.labels.is_done()
    }
}
