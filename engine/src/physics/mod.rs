//! Physics module
//!
//! Geometry queries for the navigation core. There is no simulated
//! locomotion here: only the math needed to probe the scene with rays and to
//! keep the viewpoint inside legal regions.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, +Y up.
//!
//! # Submodules
//!
//! - [`collision`] - Axis-aligned boxes and ray-AABB intersection (slab method)
//! - [`volume`] - Box and prism volumes used by boundaries
//! - [`scene`] - The [`SceneQuery`] trait and the in-memory [`SceneGeometry`]

pub mod collision;
pub mod scene;
pub mod volume;

pub use collision::{Aabb, aabb_surface_normal, ray_aabb_intersect};
pub use scene::{Collider, EntityId, RayHit, SceneGeometry, SceneQuery};
pub use volume::{Prism, SurfacePoint, Volume};
