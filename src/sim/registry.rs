//! Tile registry
//!
//! Owns every active tile and its paired engine body. Palette templates are
//! never registered here.

use std::collections::HashMap;

use glam::Vec2;

use super::bridge;
use super::engine::{BodyHandle, SimulationEngine};
use super::state::{Authority, Tile, TileId};
use crate::error::PlaygroundError;
use crate::settings::Settings;

#[derive(Debug, Default)]
pub struct TileRegistry {
    /// Insertion order; sentence ties and hit testing rely on it
    tiles: Vec<Tile>,
    /// Reverse lookup for collision events
    by_body: HashMap<BodyHandle, TileId>,
    next_id: u32,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tile at `origin` with a pinned body
    ///
    /// New tiles start `Frozen`; callers release them to `Simulation` or claim
    /// them for a drag.
    pub fn create_tile(
        &mut self,
        engine: &mut dyn SimulationEngine,
        settings: &Settings,
        text: String,
        origin: Vec2,
    ) -> TileId {
        self.next_id += 1;
        let id = TileId(self.next_id);
        let body = bridge::spawn_tile_body(engine, settings, origin);

        self.by_body.insert(body, id);
        self.tiles.push(Tile {
            id,
            text,
            position: origin,
            angle: 0.0,
            authority: Authority::Frozen,
            in_sentence: false,
            body,
        });
        id
    }

    /// Remove a tile and its body
    pub fn destroy_tile(
        &mut self,
        engine: &mut dyn SimulationEngine,
        id: TileId,
    ) -> Result<Tile, PlaygroundError> {
        let index = self
            .tiles
            .iter()
            .position(|t| t.id == id)
            .ok_or(PlaygroundError::UnknownTile(id))?;
        let tile = self.tiles.remove(index);
        self.by_body.remove(&tile.body);
        engine.remove_body(tile.body);
        Ok(tile)
    }

    /// Stable-ordered view (creation order)
    pub fn list_tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TileId) -> Result<&mut Tile, PlaygroundError> {
        self.tiles
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PlaygroundError::UnknownTile(id))
    }

    pub fn tile_for_body(&self, body: BodyHandle) -> Option<TileId> {
        self.by_body.get(&body).copied()
    }

    /// The single tile under manual authority, if any
    pub fn manual_tile(&self) -> Option<TileId> {
        self.tiles
            .iter()
            .find(|t| t.authority == Authority::Manual)
            .map(|t| t.id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::BoxWorld;

    #[test]
    fn test_create_pins_body_and_freezes() {
        let mut engine = BoxWorld::new();
        let settings = Settings::default();
        let mut registry = TileRegistry::new();

        let id = registry.create_tile(&mut engine, &settings, "山".into(), Vec2::new(10.0, 20.0));
        let tile = registry.get(id).unwrap();
        assert_eq!(tile.authority, Authority::Frozen);
        assert_eq!(registry.tile_for_body(tile.body), Some(id));

        let body = engine.body(tile.body).unwrap();
        assert!(body.is_static);
        assert_eq!(body.position, Vec2::new(50.0, 60.0));
    }

    #[test]
    fn test_ids_are_unique_and_order_is_stable() {
        let mut engine = BoxWorld::new();
        let settings = Settings::default();
        let mut registry = TileRegistry::new();

        let a = registry.create_tile(&mut engine, &settings, "a".into(), Vec2::ZERO);
        let b = registry.create_tile(&mut engine, &settings, "b".into(), Vec2::ZERO);
        registry.destroy_tile(&mut engine, a).unwrap();
        let c = registry.create_tile(&mut engine, &settings, "c".into(), Vec2::ZERO);

        assert_ne!(a, c);
        let order: Vec<TileId> = registry.list_tiles().iter().map(|t| t.id).collect();
        assert_eq!(order, vec![b, c]);
    }

    #[test]
    fn test_destroy_unknown_is_reported() {
        let mut engine = BoxWorld::new();
        let settings = Settings::default();
        let mut registry = TileRegistry::new();

        let id = registry.create_tile(&mut engine, &settings, "水".into(), Vec2::ZERO);
        registry.destroy_tile(&mut engine, id).unwrap();
        assert_eq!(engine.body_count(), 0);

        let err = registry.destroy_tile(&mut engine, id).unwrap_err();
        assert!(matches!(err, PlaygroundError::UnknownTile(missing) if missing == id));
        assert!(registry.is_empty());
    }
}
