//! Playground core
//!
//! Position authority, drag sessions and sentence reconstruction. This
//! module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order)
//! - No rendering or platform dependencies beyond the `Presenter` seam

pub mod authority;
pub mod bridge;
pub mod collision;
pub mod drag;
pub mod engine;
pub mod registry;
pub mod sentence;
pub mod state;
pub mod tick;
pub mod timers;
pub mod world;

pub use collision::{Aabb, CollisionResult, aabb_collision};
pub use drag::{DragOutcome, DragSession};
pub use engine::{
    BodyHandle, BodyLabel, BodyProps, BodyShape, BodyState, BoundaryKind, CollisionEvent,
    ContactKind, SimulationEngine,
};
pub use registry::TileRegistry;
pub use sentence::SentenceSnapshot;
pub use state::{Authority, Palette, PaletteEntry, PlaygroundState, PointerTarget, Tile, TileId};
pub use tick::{PlaygroundEvent, TickInput, dispatch, tick};
pub use world::BoxWorld;

#[cfg(test)]
pub(crate) fn test_rig() -> (
    PlaygroundState,
    BoxWorld,
    crate::presentation::HeadlessPresenter,
) {
    let settings = crate::Settings::default();
    let mut engine = BoxWorld::new();
    let presenter = crate::presentation::HeadlessPresenter::new(&settings);
    let state = PlaygroundState::new(settings, &mut engine);
    (state, engine, presenter)
}
