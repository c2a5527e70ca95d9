//! Platform abstraction layer
//!
//! Device input arrives here already normalized; touch and mouse look the
//! same to the core.

pub mod input;

pub use input::{PointerEvent, PointerKind};
