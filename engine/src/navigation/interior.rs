//! Interior / Exterior Manager
//!
//! Owns the interior/exterior state and the single in-flight transition.
//!
//! ## States
//!
//! ```text
//! Exterior --enter--> Interior --enter secondary--> SecondaryInterior
//! Exterior <--exit--- Interior <--exit secondary--- SecondaryInterior
//! ```
//!
//! Only one level of nesting exists: while a secondary interior is open the
//! primary entry door is parked in `previous_entry_door`.
//!
//! ## Transition sequence
//!
//! 1. fade to opaque
//! 2. disable all controllers
//! 3. glide the viewpoint to the target pose
//! 4. swap room boundaries and interior geometry (old off, new on)
//! 5. re-enable exactly one controller (Walk inside, the saved mode outside)
//! 6. fade back in

use crate::activation::{ActivationTarget, EntityActivation, UiElement};
use crate::camera::mode::Mode;
use crate::camera::mode_state::ModeStateMachine;
use crate::camera::viewpoint::{Pose, Viewpoint};
use crate::config::TransitionConfig;
use crate::error::NavigationError;
use crate::navigation::events::{NavigationEvent, TransitionKind};
use crate::navigation::fade::FadeOverlay;
use crate::navigation::transition::{TransitionStep, TransitionTask};
use crate::world::boundary::BoundaryService;
use crate::world::entities::{Door, DoorId, FloorDirection, RoomId, StairId};
use crate::world::scene::NavigationScene;

/// Exterior viewpoint remembered while inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedExterior {
    pub pose: Pose,
    pub mode: Mode,
}

/// Where the viewpoint is, in building terms.
///
/// `current_room.is_some()` implies `is_interior`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteriorState {
    pub is_interior: bool,
    /// Valid only while interior
    pub saved_exterior: Option<SavedExterior>,
    pub current_room: Option<RoomId>,
    /// Door used to enter the current interior
    pub current_entry_door: Option<DoorId>,
    /// Primary entry door, parked while a secondary interior is open
    pub previous_entry_door: Option<DoorId>,
    /// Pose captured when entering the secondary interior
    pub saved_secondary: Option<Pose>,
    /// Floor banner text while inside
    pub floor_name: Option<String>,
}

impl InteriorState {
    pub fn in_secondary(&self) -> bool {
        self.previous_entry_door.is_some()
    }

    pub fn is_consistent(&self) -> bool {
        let room_implies_interior = self.current_room.is_none() || self.is_interior;
        let saved_only_inside = self.saved_exterior.is_none() || self.is_interior;
        let nesting_needs_entry = self.previous_entry_door.is_none() || self.current_entry_door.is_some();
        room_implies_interior && saved_only_inside && nesting_needs_entry
    }
}

/// What a door offers from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAction {
    Enter,
    Exit,
}

/// Action a door offers, if any. Doors that cannot be entered only show labels.
pub fn door_action(door: &Door, state: &InteriorState) -> Option<DoorAction> {
    if !door.allow_entering {
        return None;
    }
    if !state.is_interior {
        return door.is_exterior().then_some(DoorAction::Enter);
    }
    if state.current_entry_door == Some(door.id) {
        return Some(DoorAction::Exit);
    }
    let located_here = door.parent_room.is_some() && door.parent_room == state.current_room;
    (located_here && !state.in_secondary()).then_some(DoorAction::Enter)
}

/// State changes applied when the viewpoint arrives.
#[derive(Debug, Clone, PartialEq)]
enum Arrival {
    Enter {
        door: DoorId,
        saved: Pose,
        saved_mode: Mode,
    },
    Exit {
        door: DoorId,
    },
    Floor {
        to: StairId,
    },
}

#[derive(Debug, Clone)]
struct ActiveTransition {
    task: TransitionTask,
    arrival: Arrival,
}

#[derive(Debug)]
pub struct InteriorExteriorManager {
    config: TransitionConfig,
    state: InteriorState,
    active: Option<ActiveTransition>,
}

impl InteriorExteriorManager {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            state: InteriorState::default(),
            active: None,
        }
    }

    pub fn state(&self) -> &InteriorState {
        &self.state
    }

    /// True from the start of the fade-out until the fade-in completes.
    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_transition(&self) -> Option<TransitionKind> {
        self.active.as_ref().map(|a| a.task.kind())
    }

    pub fn current_task(&self) -> Option<&TransitionTask> {
        self.active.as_ref().map(|a| &a.task)
    }

    fn ensure_idle(&self) -> Result<(), NavigationError> {
        if let Some(kind) = self.current_transition() {
            log::warn!("[Transition] request dropped, {kind:?} in flight");
            return Err(NavigationError::TransitionInFlight);
        }
        Ok(())
    }

    fn start(
        &mut self,
        kind: TransitionKind,
        target: Pose,
        arrival: Arrival,
        fade: &mut dyn FadeOverlay,
    ) -> TransitionKind {
        log::info!("[Transition] {kind:?} started");
        let task = TransitionTask::begin(
            kind,
            target,
            self.config.fade_duration,
            self.config.move_duration,
            fade,
        );
        self.active = Some(ActiveTransition { task, arrival });
        kind
    }

    /// Start entering through a door.
    pub fn request_enter(
        &mut self,
        scene: &NavigationScene,
        door_id: DoorId,
        viewpoint: &Viewpoint,
        mode: Mode,
        fade: &mut dyn FadeOverlay,
    ) -> Result<TransitionKind, NavigationError> {
        self.ensure_idle()?;
        let door = scene.door(door_id).ok_or(NavigationError::UnknownDoor(door_id))?;
        if !door.allow_entering {
            return Err(NavigationError::DoorNotEnterable(door_id));
        }
        if self.state.is_interior {
            if self.state.current_entry_door == Some(door_id) {
                return Err(NavigationError::DoorNotReachable(door_id));
            }
            if door.parent_room.is_none() || door.parent_room != self.state.current_room {
                return Err(NavigationError::DoorNotReachable(door_id));
            }
            if self.state.in_secondary() {
                return Err(NavigationError::NestingLimit(door_id));
            }
        } else if !door.is_exterior() {
            return Err(NavigationError::DoorNotReachable(door_id));
        }
        let target = door.entry_pose.ok_or(NavigationError::MissingPose(door_id))?;
        if door.room.is_none() {
            return Err(NavigationError::DoorNotEnterable(door_id));
        }

        let arrival = Arrival::Enter {
            door: door_id,
            saved: viewpoint.pose(),
            saved_mode: mode,
        };
        Ok(self.start(TransitionKind::Enter(door_id), target, arrival, fade))
    }

    /// Start leaving through the door that was used to enter.
    pub fn request_exit(
        &mut self,
        scene: &NavigationScene,
        door_id: DoorId,
        viewpoint: &Viewpoint,
        fade: &mut dyn FadeOverlay,
    ) -> Result<TransitionKind, NavigationError> {
        self.ensure_idle()?;
        if !self.state.is_interior {
            return Err(NavigationError::NotInterior);
        }
        let door = scene.door(door_id).ok_or(NavigationError::UnknownDoor(door_id))?;
        if self.state.current_entry_door != Some(door_id) {
            return Err(NavigationError::NotEntryDoor(door_id));
        }

        let fallback = if self.state.in_secondary() {
            self.state.saved_secondary.or_else(|| {
                door.parent_room
                    .and_then(|room| scene.room(room))
                    .and_then(|room| room.entry_pose)
            })
        } else {
            self.state.saved_exterior.map(|saved| saved.pose)
        };
        let target = match door.exit_pose.or(fallback) {
            Some(pose) => pose,
            None => {
                log::error!("[Transition] no exit pose for {door_id}, staying in place");
                viewpoint.pose()
            }
        };

        Ok(self.start(
            TransitionKind::Exit(door_id),
            target,
            Arrival::Exit { door: door_id },
            fade,
        ))
    }

    /// Start moving one floor up or down from a stair.
    pub fn request_floor_change(
        &mut self,
        scene: &NavigationScene,
        stair_id: StairId,
        direction: FloorDirection,
        fade: &mut dyn FadeOverlay,
    ) -> Result<TransitionKind, NavigationError> {
        self.ensure_idle()?;
        if !self.state.is_interior {
            return Err(NavigationError::NotInterior);
        }
        let stair = scene.stair(stair_id).ok_or(NavigationError::UnknownStair(stair_id))?;
        let (to, target) = stair
            .link(direction)
            .ok_or(NavigationError::StairNotLinked(stair_id, direction))?;
        let kind = TransitionKind::ChangeFloor {
            from: stair_id,
            to,
            direction,
        };
        Ok(self.start(kind, target, Arrival::Floor { to }, fade))
    }

    /// Advance the in-flight transition by one tick.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        delta_time: f32,
        viewpoint: &mut Viewpoint,
        scene: &NavigationScene,
        boundary: &mut BoundaryService,
        modes: &mut ModeStateMachine,
        activation: &mut dyn EntityActivation,
        fade: &mut dyn FadeOverlay,
        events: &mut Vec<NavigationEvent>,
    ) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        match active.task.step(delta_time, viewpoint, fade) {
            TransitionStep::InProgress => {}
            TransitionStep::Covered => {
                modes.disable_all();
            }
            TransitionStep::Arrived => {
                let arrival = active.arrival.clone();
                let mode = self.arrive(arrival, scene, boundary, activation, events);
                let from = modes.current_mode();
                modes.restore_mode(mode, activation);
                if from != mode {
                    events.push(NavigationEvent::ModeChanged { from, to: mode });
                }
                if let Some(active) = self.active.as_mut() {
                    active.task.begin_fade_in(fade);
                }
            }
            TransitionStep::Finished => {
                let kind = active.task.kind();
                self.active = None;
                log::info!("[Transition] {kind:?} finished");
                events.push(NavigationEvent::TransitionFinished(kind));
            }
        }
    }

    /// Apply the state swap for an arrival; returns the mode to enable.
    fn arrive(
        &mut self,
        arrival: Arrival,
        scene: &NavigationScene,
        boundary: &mut BoundaryService,
        activation: &mut dyn EntityActivation,
        events: &mut Vec<NavigationEvent>,
    ) -> Mode {
        let old_room = self.state.current_room;
        match arrival {
            Arrival::Enter {
                door,
                saved,
                saved_mode,
            } => {
                let Some(door_data) = scene.door(door) else {
                    return Mode::Walk;
                };
                if self.state.is_interior {
                    self.state.previous_entry_door = self.state.current_entry_door;
                    self.state.saved_secondary = Some(saved);
                } else {
                    self.state.is_interior = true;
                    self.state.saved_exterior = Some(SavedExterior {
                        pose: saved,
                        mode: saved_mode,
                    });
                }
                self.state.current_entry_door = Some(door);
                let new_room = door_data.room;
                self.swap_room(old_room, new_room, scene, boundary, activation);
                self.state.floor_name = door_data
                    .floor_name
                    .clone()
                    .or_else(|| new_room.and_then(|r| scene.room(r)).map(|r| r.floor_name.clone()));
                if let Some(room) = new_room {
                    events.push(NavigationEvent::EnteredRoom { room, door });
                }
                self.announce_surroundings(scene, activation, events);
                Mode::Walk
            }
            Arrival::Exit { door } => {
                if self.state.in_secondary() {
                    let parent = scene.door(door).and_then(|d| d.parent_room);
                    self.state.current_entry_door = self.state.previous_entry_door.take();
                    self.state.saved_secondary = None;
                    self.swap_room(old_room, parent, scene, boundary, activation);
                    self.state.floor_name = parent.and_then(|r| scene.room(r)).map(|r| r.floor_name.clone());
                    if let Some(room) = parent {
                        events.push(NavigationEvent::EnteredRoom { room, door });
                    }
                    self.announce_surroundings(scene, activation, events);
                    Mode::Walk
                } else {
                    let saved = self.state.saved_exterior.take();
                    self.swap_room(old_room, None, scene, boundary, activation);
                    self.state = InteriorState::default();
                    events.push(NavigationEvent::ReturnedToExterior { door });
                    self.announce_surroundings(scene, activation, events);
                    saved.map_or(self.config.exterior_arrival_mode, |s| s.mode)
                }
            }
            Arrival::Floor { to } => {
                if let Some(stair) = scene.stair(to) {
                    let new_room = stair.room.or(old_room);
                    self.swap_room(old_room, new_room, scene, boundary, activation);
                    self.state.floor_name = Some(stair.floor_name.clone());
                }
                self.announce_surroundings(scene, activation, events);
                Mode::Walk
            }
        }
    }

    /// Old room off, new room on: boundary and interior geometry.
    fn swap_room(
        &mut self,
        old_room: Option<RoomId>,
        new_room: Option<RoomId>,
        scene: &NavigationScene,
        boundary: &mut BoundaryService,
        activation: &mut dyn EntityActivation,
    ) {
        if old_room != new_room {
            if let Some(room) = old_room.and_then(|r| scene.room(r)) {
                boundary.deactivate_room(room.id);
                for &entity in &room.interior_entities {
                    activation.set_active(ActivationTarget::Entity(entity), false);
                }
            }
        }
        if let Some(room) = new_room.and_then(|r| scene.room(r)) {
            if !boundary.activate_room(room.id) {
                log::error!("[Transition] {} has no boundary", room.name);
            }
            for &entity in &room.interior_entities {
                activation.set_active(ActivationTarget::Entity(entity), true);
            }
        }
        self.state.current_room = new_room;
    }

    fn announce_surroundings(
        &self,
        scene: &NavigationScene,
        activation: &mut dyn EntityActivation,
        events: &mut Vec<NavigationEvent>,
    ) {
        let room = self.state.current_room;
        activation.set_active(ActivationTarget::Ui(UiElement::FloorLabel), self.state.is_interior);
        events.push(NavigationEvent::FloorChanged {
            room,
            floor_name: self.state.floor_name.clone(),
        });
        let factor = room
            .and_then(|r| scene.room(r))
            .map_or(1.0, |r| r.lighting_factor);
        events.push(NavigationEvent::LightingChanged { factor });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::EntityId;
    use glam::Vec3;

    fn door(id: u32, parent_room: Option<u32>) -> Door {
        Door {
            id: DoorId(id),
            name: format!("Door {id}"),
            geometry: EntityId(id),
            allow_entering: true,
            entry_pose: Some(Pose::default()),
            exit_pose: None,
            floor_name: None,
            room: Some(RoomId(9)),
            parent_room: parent_room.map(RoomId),
            label_anchor: Vec3::ZERO,
        }
    }

    fn inside(room: u32, entry: u32) -> InteriorState {
        InteriorState {
            is_interior: true,
            current_room: Some(RoomId(room)),
            current_entry_door: Some(DoorId(entry)),
            ..Default::default()
        }
    }

    #[test]
    fn test_exterior_door_enters_from_outside() {
        let state = InteriorState::default();
        assert_eq!(door_action(&door(0, None), &state), Some(DoorAction::Enter));
        assert_eq!(door_action(&door(1, Some(0)), &state), None);
    }

    #[test]
    fn test_entry_door_exits() {
        let state = inside(0, 3);
        assert_eq!(door_action(&door(3, None), &state), Some(DoorAction::Exit));
    }

    #[test]
    fn test_secondary_door_enters_from_primary_only() {
        let mut state = inside(0, 3);
        assert_eq!(door_action(&door(4, Some(0)), &state), Some(DoorAction::Enter));
        state.previous_entry_door = Some(DoorId(2));
        assert_eq!(door_action(&door(4, Some(0)), &state), None);
    }

    #[test]
    fn test_label_only_door_offers_nothing() {
        let mut d = door(0, None);
        d.allow_entering = false;
        assert_eq!(door_action(&d, &InteriorState::default()), None);
    }

    #[test]
    fn test_state_consistency() {
        assert!(InteriorState::default().is_consistent());
        let broken = InteriorState {
            current_room: Some(RoomId(0)),
            ..Default::default()
        };
        assert!(!broken.is_consistent());
    }
}
