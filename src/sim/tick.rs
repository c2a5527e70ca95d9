//! Event dispatch and the per-frame tick
//!
//! Everything that changes the playground goes through `dispatch`. A tick
//! applies all input queued for the frame before the engine steps, so no
//! tile is read by the bridge while it is halfway through a release.

use glam::Vec2;

use super::state::PlaygroundState;
use super::timers::Deferred;
use super::{authority, bridge, drag, sentence};
use crate::error::PlaygroundError;
use crate::platform::{PointerEvent, PointerKind};
use crate::presentation::Presenter;
use crate::sim::engine::SimulationEngine;

/// Things that can happen to the playground
#[derive(Debug, Clone, PartialEq)]
pub enum PlaygroundEvent {
    Pointer(PointerEvent),
    ToggleSimulation,
    SetSimulation(bool),
    AddRandomWord,
    Reset,
    Resize(Vec2),
}

impl From<PointerEvent> for PlaygroundEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

/// Events queued for a single tick, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<PlaygroundEvent>,
}

impl TickInput {
    pub fn push(&mut self, event: impl Into<PlaygroundEvent>) {
        self.events.push(event.into());
    }
}

/// Apply one event
///
/// Guard failures (unknown tiles, duplicate drags, stray moves) are expected
/// under real input and are dropped here.
pub fn dispatch(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    presenter: &mut dyn Presenter,
    event: &PlaygroundEvent,
) {
    match event {
        PlaygroundEvent::Pointer(pointer) => {
            if let Err(err) = dispatch_pointer(state, engine, presenter, pointer) {
                match &err {
                    PlaygroundError::NoActiveSession => log::trace!("{err}"),
                    _ => log::debug!("Ignored {:?}: {err}", pointer.kind),
                }
            }
        }
        PlaygroundEvent::ToggleSimulation => {
            let enabled = !state.simulation_enabled;
            authority::set_global_simulation(state, engine, enabled);
            sentence::refresh(state, presenter);
        }
        PlaygroundEvent::SetSimulation(enabled) => {
            authority::set_global_simulation(state, engine, *enabled);
            sentence::refresh(state, presenter);
        }
        PlaygroundEvent::AddRandomWord => {
            if let Some(id) = state.add_random_word(engine, presenter) {
                log::debug!("Added random tile {id}");
            }
            sentence::refresh(state, presenter);
        }
        PlaygroundEvent::Reset => {
            state.reset(engine, presenter);
            sentence::refresh(state, presenter);
        }
        PlaygroundEvent::Resize(viewport) => {
            state.resize(engine, *viewport);
            sentence::refresh(state, presenter);
        }
    }
}

fn dispatch_pointer(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    presenter: &mut dyn Presenter,
    pointer: &PointerEvent,
) -> Result<(), PlaygroundError> {
    match pointer.kind {
        PointerKind::Down => {
            let Some(target) = pointer.target else {
                return Ok(());
            };
            drag::begin(state, engine, presenter, pointer.position, target)?;
        }
        PointerKind::Move => drag::update(state, engine, presenter, pointer.position)?,
        PointerKind::Up => {
            drag::end(state, engine, presenter, pointer.position)?;
        }
    }
    Ok(())
}

/// Advance the playground by one step
pub fn tick(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    presenter: &mut dyn Presenter,
    input: &TickInput,
    dt: f32,
) {
    for event in &input.events {
        dispatch(state, engine, presenter, event);
    }

    state.time_ticks += 1;
    bridge::tick(state, engine, presenter, dt);

    let mut recompute = state.simulation_enabled;
    for task in state.timers.take_due(state.time_ticks) {
        match task {
            Deferred::RecomputeSentence => recompute = true,
            Deferred::ClearCollisionFlash(id) => {
                if state.registry.get(id).is_some() {
                    presenter.set_collision_flash(id, false);
                }
            }
            Deferred::ClearTrashFlash => presenter.set_trash_flash(false),
        }
    }

    if recompute {
        sentence::refresh(state, presenter);
    }
}
