//! Built-in box engine
//!
//! A small rigid-body integrator over axis-aligned boxes. Velocities are in
//! pixels per fixed step and gravity in pixels per step², so `step(SIM_DT)`
//! advances exactly one step. Screen space: +y points down.

use std::collections::HashSet;

use glam::Vec2;

use super::collision::{Aabb, CollisionResult, aabb_collision};
use super::engine::{
    BodyHandle, BodyLabel, BodyProps, BodyShape, BodyState, CollisionEvent, ContactKind,
    SimulationEngine,
};
use crate::consts::SIM_DT;

/// Below this approach speed contacts stop bouncing and just rest
const REST_SPEED: f32 = 2.0;
/// Angular damping per step
const ANGULAR_DAMPING: f32 = 0.02;
/// How much tangential slip turns into spin
const SPIN_FROM_SLIP: f32 = 0.005;

#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    label: BodyLabel,
    half_extents: Vec2,
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    angular_velocity: f32,
    is_static: bool,
    restitution: f32,
    friction: f32,
    air_friction: f32,
}

impl Body {
    fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.half_extents)
    }

    fn state(&self) -> BodyState {
        BodyState {
            position: self.position,
            angle: self.angle,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
            is_static: self.is_static,
        }
    }

    fn integrate(&mut self, gravity: Vec2, k: f32) {
        self.velocity += gravity * k;
        self.velocity *= (1.0 - self.air_friction * k).max(0.0);
        self.position += self.velocity * k;
        self.angle += self.angular_velocity * k;
        self.angular_velocity *= (1.0 - ANGULAR_DAMPING * k).max(0.0);
    }
}

/// Box world with collision-start reporting
#[derive(Debug, Default)]
pub struct BoxWorld {
    /// Sorted by handle for deterministic iteration
    bodies: Vec<Body>,
    gravity: Vec2,
    next_handle: u32,
    /// Pairs touching after the previous step (lower handle first)
    contacts: HashSet<(BodyHandle, BodyHandle)>,
    events: Vec<CollisionEvent>,
}

impl BoxWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn find_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.handle == handle)
    }

    fn contact_kind(a: BodyLabel, b: BodyLabel) -> Option<(ContactKind, bool)> {
        // Second element: whether a and b must be swapped so the tile comes first
        match (a, b) {
            (BodyLabel::Tile, BodyLabel::Tile) => Some((ContactKind::TileTile, false)),
            (BodyLabel::Tile, BodyLabel::Boundary(kind)) => {
                Some((ContactKind::TileBoundary(kind), false))
            }
            (BodyLabel::Boundary(kind), BodyLabel::Tile) => {
                Some((ContactKind::TileBoundary(kind), true))
            }
            (BodyLabel::Boundary(_), BodyLabel::Boundary(_)) => None,
        }
    }
}

/// Separate an overlapping pair and exchange a normal impulse
fn resolve_pair(a: &mut Body, b: &mut Body, hit: &CollisionResult) {
    let (share_a, share_b) = match (a.is_static, b.is_static) {
        (false, true) => (1.0, 0.0),
        (true, false) => (0.0, 1.0),
        _ => (0.5, 0.5),
    };
    let n = hit.normal;

    a.position += n * hit.penetration * share_a;
    b.position -= n * hit.penetration * share_b;

    let relative = a.velocity - b.velocity;
    let vn = relative.dot(n);
    if vn >= 0.0 {
        // Already separating
        return;
    }

    let restitution = if -vn < REST_SPEED {
        0.0
    } else {
        a.restitution.max(b.restitution)
    };
    let friction = a.friction.min(b.friction);
    let impulse = n * (-(1.0 + restitution) * vn);
    let slip = relative - n * vn;
    let spin = slip.perp_dot(n) * SPIN_FROM_SLIP;

    if !a.is_static {
        a.velocity += impulse * share_a - slip * friction * share_a;
        a.angular_velocity += spin;
    }
    if !b.is_static {
        b.velocity -= impulse * share_b - slip * friction * share_b;
        b.angular_velocity -= spin;
    }
}

impl SimulationEngine for BoxWorld {
    fn create_body(&mut self, shape: BodyShape, props: BodyProps) -> BodyHandle {
        self.next_handle += 1;
        let handle = BodyHandle(self.next_handle);
        let BodyShape::Rect { half_extents } = shape;
        self.bodies.push(Body {
            handle,
            label: props.label,
            half_extents,
            position: props.position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            is_static: props.is_static,
            restitution: props.restitution,
            friction: props.friction,
            air_friction: props.air_friction,
        });
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.handle != handle);
        self.contacts.retain(|&(a, b)| a != handle && b != handle);
        self.bodies.len() != before
    }

    fn set_static(&mut self, handle: BodyHandle, is_static: bool) {
        if let Some(body) = self.find_mut(handle) {
            body.is_static = is_static;
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.find_mut(handle) {
            body.velocity = velocity;
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32) {
        if let Some(body) = self.find_mut(handle) {
            body.angular_velocity = angular_velocity;
        }
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.find_mut(handle) {
            body.position = position;
        }
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn step(&mut self, dt: f32) {
        let k = (dt / SIM_DT).max(0.0);
        let gravity = self.gravity;

        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            body.integrate(gravity, k);
        }

        let mut touching = HashSet::new();
        for i in 0..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if a.is_static && b.is_static {
                    continue;
                }
                let hit = aabb_collision(&a.aabb(), &b.aabb());
                if !hit.hit {
                    continue;
                }
                resolve_pair(a, b, &hit);

                let key = (a.handle.min(b.handle), a.handle.max(b.handle));
                touching.insert(key);
                if self.contacts.contains(&key) {
                    continue;
                }
                if let Some((kind, swap)) = Self::contact_kind(a.label, b.label) {
                    let (body_a, body_b) = if swap {
                        (b.handle, a.handle)
                    } else {
                        (a.handle, b.handle)
                    };
                    self.events.push(CollisionEvent { body_a, body_b, kind });
                }
            }
        }
        self.contacts = touching;
    }

    fn body(&self, handle: BodyHandle) -> Option<BodyState> {
        self.bodies.iter().find(|b| b.handle == handle).map(Body::state)
    }

    fn drain_collisions(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
