//! Drag session manager
//!
//! Owns the lifecycle of the single in-progress manual manipulation. A live
//! session is the only thing that holds `Authority::Manual`.

use glam::Vec2;
use serde::Serialize;

use super::authority;
use super::bridge;
use super::engine::SimulationEngine;
use super::sentence;
use super::state::{Authority, PlaygroundState, PointerTarget, TileId};
use super::timers::Deferred;
use crate::center_to_origin;
use crate::error::PlaygroundError;
use crate::presentation::Presenter;

/// The live drag
#[derive(Debug, Clone, Serialize)]
pub struct DragSession {
    pub target: TileId,
    /// Pointer position minus tile origin at grab time
    pub pointer_offset: Vec2,
    pub source_was_palette: bool,
    /// Hover state behind the trash highlight. `end` tests the drop
    /// position itself, since the pointer may move after the last update.
    pub is_over_trash: bool,
}

/// How a drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Dropped in the playground with the given authority
    Released(TileId, Authority),
    /// Dropped on the trash and destroyed
    Trashed(TileId),
}

/// Start dragging a tile, or stamp a palette word and drag the copy
pub fn begin(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    presenter: &mut dyn Presenter,
    pointer: Vec2,
    hit: PointerTarget,
) -> Result<TileId, PlaygroundError> {
    if state.drag.is_some() {
        return Err(PlaygroundError::SessionAlreadyActive);
    }

    let (target, source_was_palette) = match hit {
        PointerTarget::Tile(id) => {
            authority::claim_manual(state, engine, id)?;
            (id, false)
        }
        PointerTarget::Palette(index) => {
            let text = state.palette.entry(index)?.text.clone();
            let origin = center_to_origin(pointer, state.tile_size());
            let settings = &state.settings;
            let id = state.registry.create_tile(engine, settings, text, origin);
            if let Err(err) = authority::claim_manual(state, engine, id) {
                // Do not leave an orphan stamp behind
                if let Err(cleanup) = state.registry.destroy_tile(engine, id) {
                    log::debug!("Stamp {id} cleanup failed: {cleanup}");
                }
                return Err(err);
            }
            (id, true)
        }
    };

    let tile = state
        .registry
        .get(target)
        .ok_or(PlaygroundError::UnknownTile(target))?;
    presenter.render_tile(target, tile.position, tile.angle);

    state.drag = Some(DragSession {
        target,
        pointer_offset: pointer - tile.position,
        source_was_palette,
        is_over_trash: false,
    });
    log::debug!(
        "Drag started on {target}{}",
        if source_was_palette { " (from palette)" } else { "" }
    );
    Ok(target)
}

/// Follow the pointer
pub fn update(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    presenter: &mut dyn Presenter,
    pointer: Vec2,
) -> Result<(), PlaygroundError> {
    let session = state.drag.as_ref().ok_or(PlaygroundError::NoActiveSession)?;
    let target = session.target;
    let origin = pointer - session.pointer_offset;

    let is_over_trash = move_target(state, engine, presenter, target, origin)?;
    if let Some(session) = state.drag.as_mut() {
        session.is_over_trash = is_over_trash;
    }
    presenter.set_trash_highlight(is_over_trash);

    sentence::refresh(state, presenter);
    Ok(())
}

/// Drop the tile: trash it or release it to the current authority
pub fn end(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    presenter: &mut dyn Presenter,
    pointer: Vec2,
) -> Result<DragOutcome, PlaygroundError> {
    let session = state.drag.take().ok_or(PlaygroundError::NoActiveSession)?;
    let target = session.target;
    let origin = pointer - session.pointer_offset;
    presenter.set_trash_highlight(false);

    let outcome = match move_target(state, engine, presenter, target, origin) {
        Ok(true) => {
            state.destroy_tile(engine, presenter, target)?;
            presenter.set_trash_flash(true);
            state.timers.schedule(
                state.time_ticks + state.settings.timing.trash_flash_ticks,
                Deferred::ClearTrashFlash,
            );
            log::debug!("Tile {target} dropped on the trash");
            Ok(DragOutcome::Trashed(target))
        }
        Ok(false) => authority::release_manual(state, engine, target, origin)
            .map(|authority| DragOutcome::Released(target, authority)),
        Err(err) => Err(err),
    };

    sentence::refresh(state, presenter);
    outcome
}

/// Write a manual tile's origin, keep its pinned body in step, and report
/// whether it now overlaps the trash target
fn move_target(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    presenter: &mut dyn Presenter,
    target: TileId,
    origin: Vec2,
) -> Result<bool, PlaygroundError> {
    let tile_size = state.tile_size();
    let tile = state.registry.get_mut(target)?;
    tile.position = origin;
    bridge::teleport(engine, tile, tile_size);
    presenter.render_tile(target, tile.position, tile.angle);
    Ok(tile.bounds(tile_size).overlaps(&presenter.trash_bounds()))
}
