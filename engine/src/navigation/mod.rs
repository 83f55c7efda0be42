//! Navigation Module
//!
//! Everything that moves the viewpoint between places rather than within
//! one: probing for doors and stairs, the fade / glide / fade transition and
//! the interior/exterior state it changes.
//!
//! # Submodules
//!
//! - [`probe`] - Forward ray probing with occlusion
//! - [`doors`] / [`stairs`] - Hover state and affordances per entity kind
//! - [`interior`] - Interior/exterior state and the transition orchestrator
//! - [`transition`] - The resumable fade / glide / fade task
//! - [`fade`] - The fade overlay trait and a timed implementation
//! - [`labels`] - Frame-spread label height scan
//! - [`events`] - Events reported to the host

pub mod doors;
pub mod events;
pub mod fade;
pub mod interior;
pub mod labels;
pub mod probe;
pub mod stairs;
pub mod transition;

pub use doors::{DoorSystem, door_candidates};
pub use events::{LabelPlacement, LabelTarget, NavigationEvent, TransitionKind};
pub use fade::{FadeOverlay, TimedFade};
pub use interior::{DoorAction, InteriorExteriorManager, InteriorState, SavedExterior, door_action};
pub use labels::LabelHeightScan;
pub use probe::{HoverState, ProbeHit, RayProbe};
pub use stairs::{StairSystem, stair_candidates};
pub use transition::{TransitionPhase, TransitionStep, TransitionTask};
