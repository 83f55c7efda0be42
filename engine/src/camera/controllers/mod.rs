//! Mode Controllers
//!
//! One controller per [`Mode`]. A controller turns a tick of
//! [`NavigationInput`] into a candidate pose, asks the boundary to clamp the
//! position, and commits the result to the viewpoint.
//!
//! At most one controller is enabled at a time and only the enabled one is
//! ever updated, so the viewpoint has a single writer per tick.

pub mod aerial;
pub mod fixed3d;
pub mod top_down;
pub mod walk;

pub use aerial::AerialController;
pub use fixed3d::Fixed3dController;
pub use top_down::TopDownController;
pub use walk::WalkController;

use crate::camera::mode::Mode;
use crate::camera::viewpoint::Viewpoint;
use crate::config::ModeConfig;
use crate::input::NavigationInput;
use crate::world::boundary::BoundaryService;

/// A movement scheme that may write the viewpoint while enabled.
pub trait ModeController {
    fn mode(&self) -> Mode;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Apply one tick of input to the viewpoint.
    ///
    /// Callers only invoke this on the enabled controller.
    fn update(
        &mut self,
        viewpoint: &mut Viewpoint,
        input: &NavigationInput,
        boundary: &BoundaryService,
        delta_time: f32,
    );
}

/// The four controllers, addressed by mode.
#[derive(Debug, Clone)]
pub struct ControllerSet {
    pub top_down: TopDownController,
    pub aerial: AerialController,
    pub walk: WalkController,
    pub fixed3d: Fixed3dController,
}

impl ControllerSet {
    /// Build every controller from the mode tunables. All start disabled.
    pub fn new(config: &ModeConfig) -> Self {
        Self {
            top_down: TopDownController::new(config.top_down.clone(), config.ground_height),
            aerial: AerialController::new(config.aerial.clone(), config.ground_height),
            walk: WalkController::new(config.walk.clone()),
            fixed3d: Fixed3dController::new(config.fixed3d.clone(), config.ground_height),
        }
    }

    pub fn get(&self, mode: Mode) -> &dyn ModeController {
        match mode {
            Mode::TopDown => &self.top_down,
            Mode::Aerial => &self.aerial,
            Mode::Walk => &self.walk,
            Mode::Fixed3D => &self.fixed3d,
        }
    }

    pub fn get_mut(&mut self, mode: Mode) -> &mut dyn ModeController {
        match mode {
            Mode::TopDown => &mut self.top_down,
            Mode::Aerial => &mut self.aerial,
            Mode::Walk => &mut self.walk,
            Mode::Fixed3D => &mut self.fixed3d,
        }
    }

    pub fn disable_all(&mut self) {
        for mode in Mode::ALL {
            self.get_mut(mode).set_enabled(false);
        }
    }

    /// Modes whose controller is currently enabled.
    pub fn enabled_modes(&self) -> Vec<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|&mode| self.get(mode).is_enabled())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controllers_start_disabled() {
        let set = ControllerSet::new(&ModeConfig::default());
        assert!(set.enabled_modes().is_empty());
    }

    #[test]
    fn test_get_addresses_matching_controller() {
        let set = ControllerSet::new(&ModeConfig::default());
        for mode in Mode::ALL {
            assert_eq!(set.get(mode).mode(), mode);
        }
    }

    #[test]
    fn test_disable_all() {
        let mut set = ControllerSet::new(&ModeConfig::default());
        set.get_mut(Mode::Walk).set_enabled(true);
        set.get_mut(Mode::Aerial).set_enabled(true);
        assert_eq!(set.enabled_modes(), vec![Mode::Aerial, Mode::Walk]);
        set.disable_all();
        assert!(set.enabled_modes().is_empty());
    }
}
