//! Campus Tour Navigation Library
//!
//! The spatial navigation core of an interactive 3D campus tour. It owns the
//! single viewpoint the user looks through, decides which of four camera modes
//! may move it, detects doors and stairs in front of the viewpoint, and runs
//! the fade / glide / fade transitions between the exterior, building
//! interiors and floors.
//!
//! Rendering, UI layout and scene loading live elsewhere. This crate only
//! consumes a scene-geometry query service, an activation toggle and a fade
//! overlay (see [`physics::SceneQuery`], [`activation::EntityActivation`] and
//! [`navigation::FadeOverlay`]). The first two come from one host object
//! ([`activation::SceneServices`]) so hidden geometry leaves the queries.
//!
//! # Modules
//!
//! - [`camera`] - Viewpoint, the four mode controllers and the mode state machine
//! - [`world`] - Scene configuration, doors/stairs/rooms and boundaries
//! - [`physics`] - Ray/box math, boundary volumes and the scene query service
//! - [`navigation`] - Ray probing, door/stair systems, interior transitions
//! - [`input`] - Per-tick movement input (drag, joysticks, pinch, zoom)
//! - [`navigator`] - The façade that ticks everything once per frame
//!
//! # Example
//!
//! ```ignore
//! use campus_tour_engine::{CampusNavigator, Collaborators, SceneGeometry, SceneHost};
//! use campus_tour_engine::world::{NavigationScene, SceneConfig};
//!
//! let config = SceneConfig::from_json_str(&json)?;
//! let scene = NavigationScene::from_config(&config);
//! let mut host = SceneHost::new(SceneGeometry::from_colliders(config.colliders.clone()));
//! let mut navigator = CampusNavigator::new(scene, &config.navigator, &mut host);
//!
//! // Each frame:
//! let mut services = Collaborators::new(&mut host, &mut fade);
//! navigator.tick(delta_time, &input, &mut services);
//! for event in navigator.drain_events() {
//!     // Update labels, lighting, fog...
//! }
//! ```

pub mod activation;
pub mod batch;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod navigation;
pub mod navigator;
pub mod physics;
pub mod world;

pub use activation::{
    ActivationLog, ActivationTarget, EntityActivation, SceneHost, SceneServices, UiElement,
};
pub use camera::{Mode, ModeStateMachine, Orientation, Pose, Viewpoint};
pub use config::NavigatorConfig;
pub use error::{NavigationError, SceneConfigError};
pub use input::NavigationInput;
pub use navigation::{FadeOverlay, NavigationEvent, TimedFade};
pub use navigator::{CampusNavigator, Collaborators};
pub use physics::{EntityId, SceneGeometry, SceneQuery};
