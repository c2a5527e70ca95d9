//! Axis-aligned box geometry and overlap resolution
//!
//! Tiles, boundaries and the trash target are all boxes. Rotation is a
//! presentation detail and never enters the overlap test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from a centre and half extents (engine convention)
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Box from a top-left origin and a size (presentation convention)
    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Strict overlap; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Result of a box overlap check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the boxes overlap
    pub hit: bool,
    /// Separation axis, pointing from `b` toward `a`
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between two boxes
///
/// Picks the axis of least penetration, so pushing `a` along `normal` by
/// `penetration` separates the pair.
pub fn aabb_collision(a: &Aabb, b: &Aabb) -> CollisionResult {
    if !a.overlaps(b) {
        return CollisionResult::miss();
    }

    let delta = a.center() - b.center();
    let overlap = a.half_extents() + b.half_extents() - delta.abs();

    if overlap.x < overlap.y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(sign, 0.0),
            penetration: overlap.x,
        }
    } else {
        // Ties resolve vertically so stacked tiles settle instead of sliding
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, sign),
            penetration: overlap.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::from_origin(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_origin(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        assert!(!aabb_collision(&a, &b).hit);
    }

    #[test]
    fn test_resting_on_floor_pushes_up() {
        // Screen space: y grows downward, so "up" is -y
        let tile = Aabb::from_center(Vec2::new(100.0, 95.0), Vec2::splat(10.0));
        let floor = Aabb::from_center(Vec2::new(100.0, 110.0), Vec2::new(200.0, 10.0));
        let result = aabb_collision(&tile, &floor);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_side_contact_pushes_sideways() {
        let a = Aabb::from_center(Vec2::new(18.0, 0.0), Vec2::splat(10.0));
        let b = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let result = aabb_collision(&a, &b);
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));
        assert!((result.penetration - 2.0).abs() < 1e-5);
    }
}
