//! Rigid-body engine seam
//!
//! The playground never integrates motion itself. It drives an engine
//! through this trait and copies results back for simulation-owned tiles.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to an engine body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Which static boundary a body represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    Ground,
    Wall,
    /// The platform the sentence is built on
    SentenceArea,
}

/// What a body stands for, used to tag contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyLabel {
    Tile,
    Boundary(BoundaryKind),
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    Rect { half_extents: Vec2 },
}

/// Material and initial placement for a new body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProps {
    pub label: BodyLabel,
    pub position: Vec2,
    pub is_static: bool,
    pub restitution: f32,
    pub friction: f32,
    pub air_friction: f32,
}

/// Snapshot of a body after the latest step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub is_static: bool,
}

/// Tag distinguishing the two kinds of contact the playground cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    TileTile,
    TileBoundary(BoundaryKind),
}

/// A pair of bodies that started touching during the last step
///
/// For `TileBoundary` contacts `body_a` is always the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub kind: ContactKind,
}

/// Operations the playground needs from a rigid-body engine
pub trait SimulationEngine {
    fn create_body(&mut self, shape: BodyShape, props: BodyProps) -> BodyHandle;
    /// Returns false if the handle was already gone
    fn remove_body(&mut self, handle: BodyHandle) -> bool;
    fn set_static(&mut self, handle: BodyHandle, is_static: bool);
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2);
    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32);
    fn set_position(&mut self, handle: BodyHandle, position: Vec2);
    fn set_gravity(&mut self, gravity: Vec2);
    fn step(&mut self, dt: f32);
    fn body(&self, handle: BodyHandle) -> Option<BodyState>;
    /// Collision-start events since the previous drain
    fn drain_collisions(&mut self) -> Vec<CollisionEvent>;
    fn body_count(&self) -> usize;
}
