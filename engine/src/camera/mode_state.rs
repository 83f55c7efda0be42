//! Mode State Machine
//!
//! Arbitrates which of the four controllers may move the viewpoint.
//!
//! ## Switching
//!
//! A switch always runs in the same order:
//! 1. disable every controller
//! 2. normalize the viewpoint for the target mode
//! 3. enable the target controller
//! 4. re-derive UI visibility and fog from the new mode
//!
//! so there is never a tick in which two controllers could write.
//!
//! ## Entry Normalization
//!
//! | Mode    | First entry                     | Later entries                     |
//! |---------|---------------------------------|-----------------------------------|
//! | TopDown | configured overhead pose        | keep x/z, glide to smooth height  |
//! | Aerial  | fixed pitch, configured height  | same                              |
//! | Walk    | eye height, level (outside)     | same                              |
//! | Fixed3D | configured pose                 | keep position, fixed pitch/yaw    |

use crate::activation::{ActivationTarget, EntityActivation, UiElement};
use crate::camera::controllers::top_down::TOP_DOWN_PITCH;
use crate::camera::controllers::{ControllerSet, ModeController};
use crate::camera::mode::{FogPreset, Mode, UiVisibility};
use crate::camera::viewpoint::{Orientation, Viewpoint};
use crate::config::ModeConfig;
use crate::error::NavigationError;
use crate::input::NavigationInput;
use crate::world::boundary::BoundaryService;

/// Outcome of a successful [`ModeStateMachine::switch_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSwitch {
    /// Already active; only UI and fog were re-applied
    Unchanged(Mode),
    Changed { from: Mode, to: Mode },
}

#[derive(Debug, Clone)]
pub struct ModeStateMachine {
    controllers: ControllerSet,
    current_mode: Mode,
    ground_height: f32,
    /// "Seen before" flags, indexed by [`Mode::index`]
    seen: [bool; 4],
    movement_enabled: bool,
    ui: UiVisibility,
    fog: FogPreset,
}

impl ModeStateMachine {
    /// Create the machine with every controller disabled.
    ///
    /// `initial_mode` is only recorded; nothing may move the viewpoint until
    /// the first [`Self::switch_mode`] or [`Self::restore_mode`].
    pub fn new(config: &ModeConfig, initial_mode: Mode) -> Self {
        Self {
            controllers: ControllerSet::new(config),
            current_mode: initial_mode,
            ground_height: config.ground_height,
            seen: [false; 4],
            movement_enabled: true,
            ui: UiVisibility::for_mode(initial_mode),
            fog: FogPreset::for_mode(initial_mode),
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.current_mode
    }

    pub fn ui_visibility(&self) -> UiVisibility {
        self.ui
    }

    pub fn fog(&self) -> FogPreset {
        self.fog
    }

    pub fn has_seen(&self, mode: Mode) -> bool {
        self.seen[mode.index()]
    }

    pub fn controllers(&self) -> &ControllerSet {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerSet {
        &mut self.controllers
    }

    /// Switch to `target`, normalizing the viewpoint for it.
    ///
    /// Inside buildings only walking is allowed. Switching to the mode that is
    /// already active leaves the viewpoint untouched and only re-applies UI
    /// visibility and fog.
    pub fn switch_mode(
        &mut self,
        target: Mode,
        viewpoint: &mut Viewpoint,
        is_interior: bool,
        boundary: &BoundaryService,
        activation: &mut dyn EntityActivation,
    ) -> Result<ModeSwitch, NavigationError> {
        if is_interior && !target.allowed_inside() {
            log::warn!("[Mode] {target} refused while inside");
            return Err(NavigationError::ModeUnavailableInside(target));
        }

        if target == self.current_mode && self.controllers.get(target).is_enabled() {
            self.apply_presentation(activation);
            return Ok(ModeSwitch::Unchanged(target));
        }

        let from = self.current_mode;
        self.controllers.disable_all();
        self.normalize(target, viewpoint, is_interior, boundary);
        self.controllers.get_mut(target).set_enabled(true);
        self.current_mode = target;
        self.seen[target.index()] = true;
        self.apply_presentation(activation);

        log::info!("[Mode] {from} -> {target}");
        Ok(ModeSwitch::Changed { from, to: target })
    }

    /// Enable `mode` without touching the viewpoint.
    ///
    /// Used after a transition, whose final pose is authoritative.
    pub fn restore_mode(&mut self, mode: Mode, activation: &mut dyn EntityActivation) {
        self.controllers.disable_all();
        self.controllers.get_mut(mode).set_enabled(true);
        if mode != self.current_mode {
            log::info!("[Mode] restored {} -> {mode}", self.current_mode);
        }
        self.current_mode = mode;
        self.seen[mode.index()] = true;
        self.apply_presentation(activation);
    }

    /// Disable every controller; the viewpoint has no controller writer afterwards.
    pub fn disable_all(&mut self) {
        self.controllers.disable_all();
    }

    pub fn active_controller_count(&self) -> usize {
        self.controllers.enabled_modes().len()
    }

    /// Exactly one controller is enabled and it belongs to the current mode.
    pub fn check_single_writer(&self) -> bool {
        self.controllers.enabled_modes() == [self.current_mode]
    }

    /// Block or allow controller updates without changing the enabled controller.
    pub fn set_movement_enabled(&mut self, enabled: bool) {
        if self.movement_enabled != enabled {
            log::debug!("[Mode] movement {}", if enabled { "unlocked" } else { "locked" });
        }
        self.movement_enabled = enabled;
    }

    pub fn movement_enabled(&self) -> bool {
        self.movement_enabled
    }

    /// Run the enabled controller for one tick.
    pub fn update(
        &mut self,
        viewpoint: &mut Viewpoint,
        input: &NavigationInput,
        boundary: &BoundaryService,
        delta_time: f32,
    ) {
        if !self.movement_enabled {
            return;
        }
        let controller = self.controllers.get_mut(self.current_mode);
        if controller.is_enabled() {
            controller.update(viewpoint, input, boundary, delta_time);
        }
    }

    fn normalize(
        &mut self,
        target: Mode,
        viewpoint: &mut Viewpoint,
        is_interior: bool,
        boundary: &BoundaryService,
    ) {
        let first_entry = !self.seen[target.index()];
        match target {
            Mode::TopDown => {
                let top_down = &mut self.controllers.top_down;
                if first_entry {
                    *viewpoint = top_down.initial_viewpoint();
                } else {
                    viewpoint.orientation =
                        Orientation::looking(TOP_DOWN_PITCH, viewpoint.orientation.yaw);
                    let smooth_height = top_down.config().smooth_height;
                    top_down.glide_to_height(smooth_height);
                }
            }
            Mode::Aerial => {
                *viewpoint = self.controllers.aerial.entry_viewpoint(viewpoint);
            }
            Mode::Walk => {
                // Inside, the door or stair pose already placed the viewpoint
                if !is_interior {
                    *viewpoint = self.controllers.walk.entry_viewpoint(viewpoint, self.ground_height);
                }
            }
            Mode::Fixed3D => {
                let fixed3d = &self.controllers.fixed3d;
                if first_entry {
                    viewpoint.set_pose(fixed3d.config().initial_pose);
                } else {
                    viewpoint.orientation = fixed3d.fixed_orientation();
                }
            }
        }
        viewpoint.position = boundary.clamp(viewpoint.position);
    }

    fn apply_presentation(&mut self, activation: &mut dyn EntityActivation) {
        self.ui = UiVisibility::for_mode(self.current_mode);
        self.fog = FogPreset::for_mode(self.current_mode);
        let ui = [
            (UiElement::Joysticks, self.ui.joysticks),
            (UiElement::ZoomButtons, self.ui.zoom_buttons),
            (UiElement::Compass, self.ui.compass),
        ];
        for (element, visible) in ui {
            activation.set_active(ActivationTarget::Ui(element), visible);
        }
    }
}
