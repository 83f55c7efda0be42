//! Viewpoint Module
//!
//! The single position + orientation the user looks through, and the
//! [`Pose`] value type used for door, stair and room configuration.
//!
//! ## Conventions
//!
//! Angles are in degrees.
//!
//! - **pitch**: positive looks down (90 = straight down)
//! - **yaw**: 0 looks along +Z, 90 looks along +X (clockwise seen from above)
//! - **roll**: rotation around the view axis, kept at 0 by every controller

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Wrap an angle in degrees into `[-180, 180)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Interpolate between two angles along the shortest arc.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + wrap_degrees(to - from) * t
}

/// Smoothstep easing for glides (0 and 1 are fixed points).
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Three-axis rotation in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub roll: f32,
}

impl Orientation {
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Orientation with only pitch and yaw set.
    pub const fn looking(pitch: f32, yaw: f32) -> Self {
        Self::new(pitch, yaw, 0.0)
    }

    /// View direction derived from pitch and yaw (roll does not change it).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        let pitch = self.pitch.to_radians();
        let yaw = self.yaw.to_radians();
        Vec3::new(
            yaw.sin() * pitch.cos(),
            -pitch.sin(),
            yaw.cos() * pitch.cos(),
        )
        .normalize()
    }

    /// Forward direction projected onto the ground plane.
    #[inline]
    pub fn flat_forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Right direction on the ground plane.
    #[inline]
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }

    /// Shortest-arc interpolation of every axis.
    pub fn lerp(&self, to: &Orientation, t: f32) -> Orientation {
        Orientation {
            pitch: lerp_angle(self.pitch, to.pitch, t),
            yaw: lerp_angle(self.yaw, to.yaw, t),
            roll: lerp_angle(self.roll, to.roll, t),
        }
    }
}

/// A position and orientation pair.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    #[serde(default)]
    pub orientation: Orientation,
}

impl Pose {
    pub const fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Interpolate position linearly and orientation along the shortest arc.
    pub fn lerp(&self, to: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(to.position, t),
            orientation: self.orientation.lerp(&to.orientation, t),
        }
    }
}

/// The user's single viewpoint into the scene.
///
/// There is exactly one per navigator. It is lent as `&mut` to whichever
/// writer currently owns it: the enabled mode controller, the mode state
/// machine during a switch, or the transition task.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Viewpoint {
    /// World-space position
    pub position: Vec3,
    /// Orientation in degrees
    pub orientation: Orientation,
}

impl Viewpoint {
    pub fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_pose(pose: Pose) -> Self {
        Self::new(pose.position, pose.orientation)
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    #[inline]
    pub fn set_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.orientation = pose.orientation;
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation.forward()
    }

    /// Height of the viewpoint above a ground reference.
    #[inline]
    pub fn height_above(&self, ground_height: f32) -> f32 {
        self.position.y - ground_height
    }
}
