//! Normalized pointer events

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::state::PointerTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// One pointer event, whatever device produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
    /// What was under the pointer on `Down`; ignored otherwise
    pub target: Option<PointerTarget>,
}

impl PointerEvent {
    pub fn down(position: Vec2, target: Option<PointerTarget>) -> Self {
        Self {
            kind: PointerKind::Down,
            position,
            target,
        }
    }

    pub fn moved(position: Vec2) -> Self {
        Self {
            kind: PointerKind::Move,
            position,
            target: None,
        }
    }

    pub fn up(position: Vec2) -> Self {
        Self {
            kind: PointerKind::Up,
            position,
            target: None,
        }
    }
}
