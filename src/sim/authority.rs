//! Position authority controller
//!
//! Every tile is `Frozen`, `Simulation` or `Manual`, and only the owner may
//! write its position. At most one tile is `Manual` at a time. Releasing a
//! manual tile looks at the global simulation flag *at release time*; the
//! authority it had before the claim is discarded.

use glam::Vec2;
use rand::Rng;

use super::bridge;
use super::engine::SimulationEngine;
use super::state::{Authority, PlaygroundState, TileId};
use crate::error::PlaygroundError;

/// Hand a tile to the drag session
///
/// Pins the body and zeroes its motion so no tick can write the tile while
/// it is held.
pub fn claim_manual(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    id: TileId,
) -> Result<(), PlaygroundError> {
    let tile = state
        .registry
        .get(id)
        .ok_or(PlaygroundError::UnknownTile(id))?;

    if state.registry.manual_tile().is_some() {
        return Err(PlaygroundError::InvalidAuthorityTransition {
            id,
            from: tile.authority,
            to: Authority::Manual,
        });
    }

    let body = tile.body;
    bridge::freeze(engine, body);
    state.registry.get_mut(id)?.authority = Authority::Manual;
    Ok(())
}

/// Return a manual tile to the engine or freeze it in place
///
/// Returns the authority the tile ended up with.
pub fn release_manual(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    id: TileId,
    final_position: Vec2,
) -> Result<Authority, PlaygroundError> {
    let tile_size = state.tile_size();
    let enabled = state.simulation_enabled;
    let impulse_bound = state.settings.physics.release_impulse;

    let tile = state.registry.get_mut(id)?;
    if tile.authority != Authority::Manual {
        return Err(PlaygroundError::InvalidAuthorityTransition {
            id,
            from: tile.authority,
            to: if enabled {
                Authority::Simulation
            } else {
                Authority::Frozen
            },
        });
    }

    tile.position = final_position;
    bridge::teleport(engine, tile, tile_size);
    let body = tile.body;

    if enabled {
        tile.authority = Authority::Simulation;
        bridge::unfreeze(engine, body);
        let push = state.rng_mut().random_range(-1.0..1.0f32) * impulse_bound;
        engine.set_velocity(body, Vec2::new(push, 0.0));
        Ok(Authority::Simulation)
    } else {
        tile.authority = Authority::Frozen;
        bridge::freeze(engine, body);
        Ok(Authority::Frozen)
    }
}

/// Hand a frozen tile to the engine (no impulse)
pub fn unfreeze(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    id: TileId,
) -> Result<(), PlaygroundError> {
    let tile = state.registry.get_mut(id)?;
    if tile.authority != Authority::Frozen {
        return Err(PlaygroundError::InvalidAuthorityTransition {
            id,
            from: tile.authority,
            to: Authority::Simulation,
        });
    }
    tile.authority = Authority::Simulation;
    bridge::unfreeze(engine, tile.body);
    Ok(())
}

/// Flip the global simulation flag
///
/// Every non-manual tile moves to `Simulation` (enabled) or `Frozen`
/// (disabled) and loses all velocity, whichever way the toggle goes. The
/// manual tile, if any, keeps its claim and picks up the new flag on release.
pub fn set_global_simulation(
    state: &mut PlaygroundState,
    engine: &mut dyn SimulationEngine,
    enabled: bool,
) {
    state.simulation_enabled = enabled;
    let gravity = if enabled {
        Vec2::new(0.0, state.settings.physics.gravity)
    } else {
        Vec2::ZERO
    };
    engine.set_gravity(gravity);

    let mut moved = 0;
    for tile in state.registry.tiles_mut() {
        if tile.authority == Authority::Manual {
            continue;
        }
        if enabled {
            tile.authority = Authority::Simulation;
            bridge::unfreeze(engine, tile.body);
        } else {
            tile.authority = Authority::Frozen;
            bridge::freeze(engine, tile.body);
        }
        moved += 1;
    }

    log::info!(
        "Simulation {} ({moved} tiles)",
        if enabled { "enabled" } else { "disabled" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_rig;

    fn spawn(state: &mut PlaygroundState, engine: &mut dyn SimulationEngine, x: f32) -> TileId {
        let settings = state.settings.clone();
        state
            .registry
            .create_tile(engine, &settings, "字".into(), Vec2::new(x, 100.0))
    }

    fn authorities(state: &PlaygroundState) -> Vec<Authority> {
        state.registry.list_tiles().iter().map(|t| t.authority).collect()
    }

    #[test]
    fn test_single_manual_claim() {
        let (mut state, mut engine, _) = test_rig();
        let a = spawn(&mut state, &mut engine, 0.0);
        let b = spawn(&mut state, &mut engine, 200.0);

        claim_manual(&mut state, &mut engine, a).unwrap();
        let err = claim_manual(&mut state, &mut engine, b).unwrap_err();
        assert!(matches!(err, PlaygroundError::InvalidAuthorityTransition { .. }));
        // Reclaiming the held tile is rejected too
        assert!(claim_manual(&mut state, &mut engine, a).is_err());

        assert_eq!(authorities(&state), vec![Authority::Manual, Authority::Frozen]);
    }

    #[test]
    fn test_claim_unknown_tile() {
        let (mut state, mut engine, _) = test_rig();
        let err = claim_manual(&mut state, &mut engine, TileId(99)).unwrap_err();
        assert!(matches!(err, PlaygroundError::UnknownTile(TileId(99))));
    }

    #[test]
    fn test_claim_stops_motion() {
        let (mut state, mut engine, _) = test_rig();
        set_global_simulation(&mut state, &mut engine, true);
        let a = spawn(&mut state, &mut engine, 0.0);
        unfreeze(&mut state, &mut engine, a).unwrap();
        let body = state.registry.get(a).unwrap().body;
        engine.set_velocity(body, Vec2::new(3.0, 4.0));
        engine.set_angular_velocity(body, 0.5);

        claim_manual(&mut state, &mut engine, a).unwrap();
        let body = engine.body(body).unwrap();
        assert!(body.is_static);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn test_release_follows_flag_at_release_time() {
        let (mut state, mut engine, _) = test_rig();
        let a = spawn(&mut state, &mut engine, 0.0);
        claim_manual(&mut state, &mut engine, a).unwrap();

        // Flag flips while the tile is held; the held tile is left alone
        set_global_simulation(&mut state, &mut engine, true);
        assert_eq!(authorities(&state), vec![Authority::Manual]);

        let end = Vec2::new(300.0, 400.0);
        let authority = release_manual(&mut state, &mut engine, a, end).unwrap();
        assert_eq!(authority, Authority::Simulation);

        let tile = state.registry.get(a).unwrap();
        assert_eq!(tile.position, end);
        let body = engine.body(tile.body).unwrap();
        assert!(!body.is_static);
        assert_eq!(body.position, Vec2::new(340.0, 440.0));
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.velocity.x.abs() <= state.settings.physics.release_impulse);
    }

    #[test]
    fn test_release_while_disabled_freezes() {
        let (mut state, mut engine, _) = test_rig();
        let a = spawn(&mut state, &mut engine, 0.0);
        claim_manual(&mut state, &mut engine, a).unwrap();

        let authority = release_manual(&mut state, &mut engine, a, Vec2::new(5.0, 6.0)).unwrap();
        assert_eq!(authority, Authority::Frozen);
        let body = engine.body(state.registry.get(a).unwrap().body).unwrap();
        assert!(body.is_static);
        assert_eq!(body.velocity, Vec2::ZERO);

        // Not manual any more
        assert!(release_manual(&mut state, &mut engine, a, Vec2::ZERO).is_err());
    }

    #[test]
    fn test_toggle_twice_resets_motion() {
        let (mut state, mut engine, _) = test_rig();
        let ids: Vec<TileId> = (0..3)
            .map(|i| spawn(&mut state, &mut engine, i as f32 * 150.0))
            .collect();

        set_global_simulation(&mut state, &mut engine, true);
        for _ in 0..20 {
            engine.step(crate::consts::SIM_DT);
        }
        let falling = engine.body(state.registry.get(ids[0]).unwrap().body).unwrap();
        assert!(falling.velocity.y > 0.0);

        set_global_simulation(&mut state, &mut engine, true);
        set_global_simulation(&mut state, &mut engine, false);
        assert_eq!(engine.gravity(), Vec2::ZERO);

        for id in ids {
            let tile = state.registry.get(id).unwrap();
            assert_eq!(tile.authority, Authority::Frozen);
            let body = engine.body(tile.body).unwrap();
            assert!(body.is_static);
            assert_eq!(body.velocity, Vec2::ZERO);
            assert_eq!(body.angular_velocity, 0.0);
        }
    }
}
