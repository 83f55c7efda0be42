//! Boundary Volumes
//!
//! The solid shapes a boundary is built from. A room may be made of several
//! volumes so that L-shaped halls and corridors do not need a convex hull.
//!
//! # Shapes
//!
//! - [`Volume::Box`] - an axis-aligned box
//! - [`Volume::Prism`] - a vertical prism over an arbitrary (possibly concave)
//!   polygon footprint on the XZ plane, for freeform rooms
//!
//! Every volume answers three questions: does it contain a point, what is the
//! nearest point on its surface (with the outward normal there), and where
//! does a point end up when it is pulled inside with some padding.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Slack used for containment tests so points clamped onto a face still count as inside.
pub const CONTAINMENT_TOLERANCE: f32 = 1e-4;

/// Smallest inward nudge tried before giving up and returning the surface point.
const MIN_NUDGE: f32 = 1e-3;

/// Wall-by-wall pushes tried when pulling a point clear of a footprint corner.
const MAX_WALL_PUSHES: usize = 16;

/// Nearest point on a volume surface and the outward normal there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Vertical prism with a polygon footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prism {
    /// Footprint vertices on the XZ plane (`Vec2(x, z)`), in either winding order
    pub footprint: Vec<Vec2>,
    /// Floor height
    pub y_min: f32,
    /// Ceiling height
    pub y_max: f32,
}

impl Prism {
    pub fn new(footprint: Vec<Vec2>, y_min: f32, y_max: f32) -> Self {
        Self {
            footprint,
            y_min: y_min.min(y_max),
            y_max: y_min.max(y_max),
        }
    }

    /// Signed area of the footprint; positive when counter-clockwise in (x, z).
    fn signed_area(&self) -> f32 {
        let n = self.footprint.len();
        (0..n)
            .map(|i| {
                let a = self.footprint[i];
                let b = self.footprint[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<f32>()
            * 0.5
    }

    /// Fewer than three vertices enclose nothing.
    fn is_degenerate(&self) -> bool {
        self.footprint.len() < 3
    }

    /// Even-odd point in polygon test on the footprint.
    fn footprint_contains(&self, p: Vec2) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let n = self.footprint.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.footprint[i];
            let b = self.footprint[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Nearest point on the footprint outline and the outward edge normal there.
    fn nearest_edge_point(&self, p: Vec2) -> (Vec2, Vec2) {
        let n = self.footprint.len();
        let Some(&first) = self.footprint.first() else {
            return (p, Vec2::ZERO);
        };
        let ccw = self.signed_area() >= 0.0;
        let mut best = (first, Vec2::X);
        let mut best_dist = f32::INFINITY;

        for i in 0..n {
            let a = self.footprint[i];
            let b = self.footprint[(i + 1) % n];
            let edge = b - a;
            let len_sq = edge.length_squared();
            let t = if len_sq > 0.0 {
                ((p - a).dot(edge) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let q = a + edge * t;
            let dist = p.distance_squared(q);
            if dist < best_dist {
                best_dist = dist;
                // Rotate the edge clockwise for CCW polygons to point outward
                let outward = if ccw {
                    Vec2::new(edge.y, -edge.x)
                } else {
                    Vec2::new(-edge.y, edge.x)
                };
                best = (q, outward.normalize_or_zero());
            }
        }
        best
    }

    fn contains(&self, point: Vec3) -> bool {
        if self.is_degenerate() {
            return false;
        }
        if point.y < self.y_min - CONTAINMENT_TOLERANCE || point.y > self.y_max + CONTAINMENT_TOLERANCE {
            return false;
        }
        let p = Vec2::new(point.x, point.z);
        if self.footprint_contains(p) {
            return true;
        }
        let (edge_point, _) = self.nearest_edge_point(p);
        edge_point.distance(p) <= CONTAINMENT_TOLERANCE
    }

    fn nearest_surface_point(&self, point: Vec3) -> SurfacePoint {
        let p = Vec2::new(point.x, point.z);
        let y = point.y.clamp(self.y_min, self.y_max);

        if self.footprint_contains(p) {
            // Inside the footprint: the nearest surface is the floor, the ceiling or a wall
            let (edge_point, outward) = self.nearest_edge_point(p);
            let wall_dist = edge_point.distance(p);
            if point.y < self.y_min || point.y > self.y_max {
                let normal = if point.y < self.y_min { Vec3::NEG_Y } else { Vec3::Y };
                return SurfacePoint {
                    point: Vec3::new(point.x, y, point.z),
                    normal,
                };
            }
            let floor_dist = point.y - self.y_min;
            let ceiling_dist = self.y_max - point.y;
            if wall_dist <= floor_dist && wall_dist <= ceiling_dist {
                return SurfacePoint {
                    point: Vec3::new(edge_point.x, point.y, edge_point.y),
                    normal: Vec3::new(outward.x, 0.0, outward.y),
                };
            }
            return if floor_dist <= ceiling_dist {
                SurfacePoint {
                    point: Vec3::new(point.x, self.y_min, point.z),
                    normal: Vec3::NEG_Y,
                }
            } else {
                SurfacePoint {
                    point: Vec3::new(point.x, self.y_max, point.z),
                    normal: Vec3::Y,
                }
            };
        }

        let (edge_point, outward) = self.nearest_edge_point(p);
        SurfacePoint {
            point: Vec3::new(edge_point.x, y, edge_point.y),
            normal: Vec3::new(outward.x, 0.0, outward.y),
        }
    }

    fn clamp_inside(&self, point: Vec3, padding: f32) -> Vec3 {
        let padding = padding.max(0.0);
        let (lo, hi) = (self.y_min + padding, self.y_max - padding);
        let y = if lo > hi {
            (self.y_min + self.y_max) * 0.5
        } else {
            point.y.clamp(lo, hi)
        };

        let p = Vec2::new(point.x, point.z);
        if self.is_degenerate() || self.footprint_contains(p) {
            return Vec3::new(point.x, y, point.z);
        }

        let (edge_point, outward) = self.nearest_edge_point(p);
        let clearance = padding.max(MIN_NUDGE);
        if let Some(clear) = self.push_clear_of_walls(edge_point, clearance) {
            return Vec3::new(clear.x, y, clear.y);
        }

        // Too narrow for the full padding: nudge inward along the edge normal,
        // backing off until the point is inside.
        let mut nudge = clearance;
        while nudge >= MIN_NUDGE {
            let candidate = edge_point - outward * nudge;
            if self.footprint_contains(candidate) {
                return Vec3::new(candidate.x, y, candidate.y);
            }
            nudge *= 0.5;
        }
        Vec3::new(edge_point.x, y, edge_point.y)
    }

    /// Step a point away from its nearest wall, one wall at a time, until it
    /// is inside with every wall at least `clearance` away. At a convex corner
    /// the second step moves off the neighbouring wall.
    fn push_clear_of_walls(&self, start: Vec2, clearance: f32) -> Option<Vec2> {
        let mut current = start;
        for _ in 0..MAX_WALL_PUSHES {
            let (wall_point, outward) = self.nearest_edge_point(current);
            let gap = wall_point.distance(current);
            if gap >= clearance - CONTAINMENT_TOLERANCE && self.footprint_contains(current) {
                return Some(current);
            }
            current = wall_point - outward * clearance;
        }
        None
    }

    fn bounds(&self) -> Aabb {
        let (mut min, mut max) = (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY));
        for v in &self.footprint {
            min = min.min(*v);
            max = max.max(*v);
        }
        Aabb::new(
            Vec3::new(min.x, self.y_min, min.y),
            Vec3::new(max.x, self.y_max, max.y),
        )
    }
}

/// A solid region used to build boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Volume {
    /// Axis-aligned box
    Box(Aabb),
    /// Vertical prism over a polygon footprint
    Prism(Prism),
}

impl Volume {
    /// A volume is usable when it encloses some space.
    pub fn is_valid(&self) -> bool {
        match self {
            Volume::Box(aabb) => aabb.size().cmpge(Vec3::ZERO).all(),
            Volume::Prism(prism) => prism.footprint.len() >= 3 && prism.signed_area().abs() > 1e-6,
        }
    }

    /// Exact containment of the volume geometry (not its bounding box).
    pub fn contains(&self, point: Vec3) -> bool {
        match self {
            Volume::Box(aabb) => aabb.contains(point, CONTAINMENT_TOLERANCE),
            Volume::Prism(prism) => prism.contains(point),
        }
    }

    /// Nearest point on the volume surface.
    pub fn nearest_surface_point(&self, point: Vec3) -> SurfacePoint {
        match self {
            Volume::Box(aabb) => {
                if aabb.contains(point, 0.0) {
                    // Project onto the closest face
                    let to_min = point - aabb.min;
                    let to_max = aabb.max - point;
                    let mut best = (to_min.x, Vec3::new(aabb.min.x, point.y, point.z), Vec3::NEG_X);
                    let candidates = [
                        (to_max.x, Vec3::new(aabb.max.x, point.y, point.z), Vec3::X),
                        (to_min.y, Vec3::new(point.x, aabb.min.y, point.z), Vec3::NEG_Y),
                        (to_max.y, Vec3::new(point.x, aabb.max.y, point.z), Vec3::Y),
                        (to_min.z, Vec3::new(point.x, point.y, aabb.min.z), Vec3::NEG_Z),
                        (to_max.z, Vec3::new(point.x, point.y, aabb.max.z), Vec3::Z),
                    ];
                    for candidate in candidates {
                        if candidate.0 < best.0 {
                            best = candidate;
                        }
                    }
                    SurfacePoint {
                        point: best.1,
                        normal: best.2,
                    }
                } else {
                    let closest = aabb.closest_point(point);
                    SurfacePoint {
                        point: closest,
                        normal: aabb.surface_normal(closest),
                    }
                }
            }
            Volume::Prism(prism) => prism.nearest_surface_point(point),
        }
    }

    /// Distance from `point` to the volume; 0 when contained.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        if self.contains(point) {
            0.0
        } else {
            self.nearest_surface_point(point).point.distance(point)
        }
    }

    /// Pull `point` inside the volume, keeping `padding` from its faces where possible.
    pub fn clamp_inside(&self, point: Vec3, padding: f32) -> Vec3 {
        match self {
            Volume::Box(aabb) => aabb.clamp_inside(point, padding),
            Volume::Prism(prism) => prism.clamp_inside(point, padding),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Volume::Box(aabb) => *aabb,
            Volume::Prism(prism) => prism.bounds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// L-shaped footprint: 10x10 square with the top-right 5x5 quadrant cut out
    fn l_prism() -> Prism {
        Prism::new(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 5.0),
                Vec2::new(5.0, 5.0),
                Vec2::new(5.0, 10.0),
                Vec2::new(0.0, 10.0),
            ],
            0.0,
            4.0,
        )
    }

    #[test]
    fn test_prism_contains_respects_notch() {
        let volume = Volume::Prism(l_prism());
        assert!(volume.contains(Vec3::new(2.0, 1.0, 8.0)));
        assert!(volume.contains(Vec3::new(8.0, 1.0, 2.0)));
        // Inside the bounding box, but in the cut-out quadrant
        assert!(!volume.contains(Vec3::new(8.0, 1.0, 8.0)));
        assert!(volume.bounds().contains(Vec3::new(8.0, 1.0, 8.0), 0.0));
    }

    #[test]
    fn test_prism_clamp_from_notch_lands_inside() {
        let volume = Volume::Prism(l_prism());
        let clamped = volume.clamp_inside(Vec3::new(8.0, 1.0, 6.0), 0.5);
        assert!(volume.contains(clamped));
        // Nearest wall is the notch edge at z = 5, nudged inward by the padding
        assert!((clamped.z - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_prism_winding_does_not_matter() {
        let mut reversed = l_prism();
        reversed.footprint.reverse();
        let volume = Volume::Prism(reversed);
        let clamped = volume.clamp_inside(Vec3::new(-3.0, 2.0, 2.0), 0.25);
        assert!(volume.contains(clamped));
        assert!((clamped.x - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_prism_narrow_corridor_reduces_nudge() {
        let corridor = Volume::Prism(Prism::new(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(20.0, 0.0),
                Vec2::new(20.0, 0.4),
                Vec2::new(0.0, 0.4),
            ],
            0.0,
            3.0,
        ));
        let clamped = corridor.clamp_inside(Vec3::new(10.0, 1.5, 5.0), 1.0);
        assert!(corridor.contains(clamped));
    }

    #[test]
    fn test_prism_vertical_clamp() {
        let volume = Volume::Prism(l_prism());
        let clamped = volume.clamp_inside(Vec3::new(2.0, 10.0, 2.0), 0.5);
        assert!((clamped.y - 3.5).abs() < 1e-5);
        let surface = volume.nearest_surface_point(Vec3::new(2.0, 10.0, 2.0));
        assert_eq!(surface.normal, Vec3::Y);
    }

    #[test]
    fn test_box_nearest_surface_from_inside() {
        let volume = Volume::Box(Aabb::new(Vec3::ZERO, Vec3::new(10.0, 4.0, 10.0)));
        let surface = volume.nearest_surface_point(Vec3::new(9.5, 2.0, 5.0));
        assert_eq!(surface.point, Vec3::new(10.0, 2.0, 5.0));
        assert_eq!(surface.normal, Vec3::X);
    }

    #[test]
    fn test_prism_corner_clamp_clears_both_walls() {
        let volume = Volume::Prism(l_prism());
        for (outside, expected) in [
            (Vec3::new(-3.0, 1.5, -3.0), Vec2::new(0.25, 0.25)),
            (Vec3::new(13.0, 1.5, -2.0), Vec2::new(9.75, 0.25)),
            (Vec3::new(-1.0, 1.5, 12.0), Vec2::new(0.25, 9.75)),
        ] {
            let clamped = volume.clamp_inside(outside, 0.25);
            assert!(volume.contains(clamped), "{outside} -> {clamped}");
            assert!((clamped.x - expected.x).abs() < 1e-4, "{outside} -> {clamped}");
            assert!((clamped.z - expected.y).abs() < 1e-4, "{outside} -> {clamped}");
        }
    }

    #[test]
    fn test_degenerate_prism_is_invalid() {
        let line = Volume::Prism(Prism::new(vec![Vec2::ZERO, Vec2::X], 0.0, 1.0));
        assert!(!line.is_valid());
    }

    #[test]
    fn test_empty_footprint_contains_nothing() {
        let empty = Volume::Prism(Prism::new(Vec::new(), 0.0, 3.0));
        let point = Vec3::new(4.0, 1.0, -2.0);
        assert!(!empty.contains(point));
        assert_eq!(empty.clamp_inside(point, 0.25), point);
        assert_eq!(empty.nearest_surface_point(point).point, point);
    }
}
