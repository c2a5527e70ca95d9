//! Simulation bridge
//!
//! Translates registry and authority changes into engine calls, and engine
//! results back into tile positions. The copy back is one-way and only ever
//! touches `Simulation` tiles.

use glam::Vec2;

use super::engine::{
    BodyHandle, BodyLabel, BodyProps, BodyShape, BoundaryKind, CollisionEvent, ContactKind,
    SimulationEngine,
};
use super::state::{Authority, PlaygroundState, Tile};
use super::timers::Deferred;
use crate::consts::BOUNDARY_THICKNESS;
use crate::presentation::Presenter;
use crate::settings::Settings;
use crate::{center_to_origin, origin_to_center, tile_half_extents};

/// Create the pinned body paired with a new tile
pub fn spawn_tile_body(
    engine: &mut dyn SimulationEngine,
    settings: &Settings,
    origin: Vec2,
) -> BodyHandle {
    let physics = &settings.physics;
    engine.create_body(
        BodyShape::Rect {
            half_extents: tile_half_extents(settings.tile_size),
        },
        BodyProps {
            label: BodyLabel::Tile,
            position: origin_to_center(origin, settings.tile_size),
            is_static: true,
            restitution: physics.tile_restitution,
            friction: physics.tile_friction,
            air_friction: physics.tile_air_friction,
        },
    )
}

/// Pin a body and clear its motion
pub fn freeze(engine: &mut dyn SimulationEngine, body: BodyHandle) {
    engine.set_static(body, true);
    engine.set_velocity(body, Vec2::ZERO);
    engine.set_angular_velocity(body, 0.0);
}

/// Unpin a body from rest
pub fn unfreeze(engine: &mut dyn SimulationEngine, body: BodyHandle) {
    engine.set_static(body, false);
    engine.set_velocity(body, Vec2::ZERO);
    engine.set_angular_velocity(body, 0.0);
}

/// Move a body to match its tile's presentation position
pub fn teleport(engine: &mut dyn SimulationEngine, tile: &Tile, tile_size: f32) {
    engine.set_position(tile.body, origin_to_center(tile.position, tile_size));
}

/// (Re)build ground, side walls and the sentence platform for the viewport
pub fn install_boundaries(state: &mut PlaygroundState, engine: &mut dyn SimulationEngine) {
    for handle in state.boundaries.drain(..) {
        engine.remove_body(handle);
    }

    let Vec2 { x: width, y: height } = state.viewport;
    let half = BOUNDARY_THICKNESS / 2.0;
    let sentence = &state.settings.sentence;
    let physics = &state.settings.physics;

    let layout = [
        (
            BoundaryKind::Ground,
            Vec2::new(width / 2.0, height + half),
            Vec2::new(width / 2.0, half),
            0.0,
            0.1,
        ),
        (
            BoundaryKind::Wall,
            Vec2::new(-half, height / 2.0),
            Vec2::new(half, height / 2.0),
            0.0,
            0.1,
        ),
        (
            BoundaryKind::Wall,
            Vec2::new(width + half, height / 2.0),
            Vec2::new(half, height / 2.0),
            0.0,
            0.1,
        ),
        (
            BoundaryKind::SentenceArea,
            Vec2::new(width / 2.0, height - sentence.anchor_from_bottom),
            Vec2::new(sentence.platform_width / 2.0, sentence.platform_thickness / 2.0),
            physics.platform_restitution,
            physics.platform_friction,
        ),
    ];

    state.boundaries = layout
        .into_iter()
        .map(|(kind, position, half_extents, restitution, friction)| {
            engine.create_body(
                BodyShape::Rect { half_extents },
                BodyProps {
                    label: BodyLabel::Boundary(kind),
                    position,
                    is_static: true,
                    restitution,
                    friction,
                    air_friction: 0.0,
                },
            )
        })
        .collect();
}

/// Step the engine and copy results back onto simulation-owned tiles
pub fn tick(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    presenter: &mut dyn Presenter,
    dt: f32,
) {
    engine.step(dt);

    let tile_size = state.tile_size();
    for tile in state.registry.tiles_mut() {
        if tile.authority != Authority::Simulation {
            continue;
        }
        let Some(body) = engine.body(tile.body) else {
            continue;
        };
        tile.position = center_to_origin(body.position, tile_size);
        tile.angle = body.angle;
        presenter.render_tile(tile.id, tile.position, tile.angle);
    }

    for event in engine.drain_collisions() {
        handle_collision(state, presenter, event);
    }
}

/// React to a collision-start event
///
/// Contacts are advisory: they flash tiles and, for the sentence platform,
/// re-arm the debounced sentence pass. Positions are never touched here.
pub fn handle_collision(
    state: &mut PlaygroundState,
    presenter: &mut dyn Presenter,
    event: CollisionEvent,
) {
    let now = state.time_ticks;
    let timing = &state.settings.timing;

    match event.kind {
        ContactKind::TileTile => {
            for body in [event.body_a, event.body_b] {
                if let Some(id) = state.registry.tile_for_body(body) {
                    presenter.set_collision_flash(id, true);
                    state.timers.schedule(
                        now + timing.collision_flash_ticks,
                        Deferred::ClearCollisionFlash(id),
                    );
                }
            }
        }
        ContactKind::TileBoundary(BoundaryKind::SentenceArea) => {
            if state.registry.tile_for_body(event.body_a).is_some() {
                state.timers.debounce(
                    now + timing.sentence_debounce_ticks,
                    Deferred::RecomputeSentence,
                );
            }
        }
        ContactKind::TileBoundary(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::authority;
    use crate::sim::state::TileId;
    use crate::sim::test_rig;

    fn spawn(state: &mut PlaygroundState, engine: &mut dyn SimulationEngine, origin: Vec2) -> TileId {
        let settings = state.settings.clone();
        state.registry.create_tile(engine, &settings, "人".into(), origin)
    }

    #[test]
    fn test_boundaries_follow_viewport() {
        let (mut state, mut engine, _) = test_rig();
        assert_eq!(state.boundaries.len(), 4);
        let before = engine.body_count();

        state.resize(&mut engine, Vec2::new(800.0, 600.0));
        assert_eq!(engine.body_count(), before);

        let platform = *state.boundaries.last().unwrap();
        let body = engine.body(platform).unwrap();
        assert_eq!(body.position, Vec2::new(400.0, 480.0));
    }

    #[test]
    fn test_only_simulation_tiles_are_copied_back() {
        let (mut state, mut engine, mut presenter) = test_rig();
        authority::set_global_simulation(&mut state, &mut engine, true);

        let falling = spawn(&mut state, &mut engine, Vec2::new(100.0, 100.0));
        authority::unfreeze(&mut state, &mut engine, falling).unwrap();
        let held = spawn(&mut state, &mut engine, Vec2::new(400.0, 100.0));
        authority::claim_manual(&mut state, &mut engine, held).unwrap();
        let frozen = spawn(&mut state, &mut engine, Vec2::new(700.0, 100.0));

        // Engine-side drift on pinned bodies must not leak into the tiles
        let held_body = state.registry.get(held).unwrap().body;
        engine.set_position(held_body, Vec2::new(0.0, 0.0));
        let frozen_body = state.registry.get(frozen).unwrap().body;
        engine.set_position(frozen_body, Vec2::new(0.0, 0.0));

        for _ in 0..5 {
            tick(&mut state, &mut engine, &mut presenter, crate::consts::SIM_DT);
        }

        assert!(state.registry.get(falling).unwrap().position.y > 100.0);
        assert_eq!(state.registry.get(held).unwrap().position, Vec2::new(400.0, 100.0));
        assert_eq!(state.registry.get(frozen).unwrap().position, Vec2::new(700.0, 100.0));
        assert!(presenter.tile(falling).is_some());
        assert!(presenter.tile(frozen).is_none());
    }

    #[test]
    fn test_platform_contact_debounces_sentence_pass() {
        let (mut state, mut engine, mut presenter) = test_rig();
        let id = spawn(&mut state, &mut engine, Vec2::ZERO);
        let body = state.registry.get(id).unwrap().body;
        let platform = *state.boundaries.last().unwrap();
        let contact = CollisionEvent {
            body_a: body,
            body_b: platform,
            kind: ContactKind::TileBoundary(BoundaryKind::SentenceArea),
        };

        handle_collision(&mut state, &mut presenter, contact);
        state.time_ticks += 3;
        handle_collision(&mut state, &mut presenter, contact);

        let debounce = state.settings.timing.sentence_debounce_ticks;
        assert!(state.timers.take_due(2 + debounce).is_empty());
        assert_eq!(state.timers.take_due(3 + debounce), vec![Deferred::RecomputeSentence]);
    }

    #[test]
    fn test_tile_contact_flashes_both() {
        let (mut state, mut engine, mut presenter) = test_rig();
        let a = spawn(&mut state, &mut engine, Vec2::ZERO);
        let b = spawn(&mut state, &mut engine, Vec2::new(90.0, 0.0));
        let contact = CollisionEvent {
            body_a: state.registry.get(a).unwrap().body,
            body_b: state.registry.get(b).unwrap().body,
            kind: ContactKind::TileTile,
        };

        handle_collision(&mut state, &mut presenter, contact);
        assert!(presenter.is_flashing(a));
        assert!(presenter.is_flashing(b));
        let due = state.timers.take_due(state.settings.timing.collision_flash_ticks);
        assert_eq!(
            due,
            vec![Deferred::ClearCollisionFlash(a), Deferred::ClearCollisionFlash(b)]
        );
    }
}
