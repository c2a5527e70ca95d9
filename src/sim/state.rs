//! Playground state and core data types
//!
//! `PlaygroundState` is the one explicit owner of everything the core
//! mutates. It is created at session start and dropped at session end.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bridge;
use super::collision::Aabb;
use super::drag::DragSession;
use super::engine::{BodyHandle, SimulationEngine};
use super::registry::TileRegistry;
use super::timers::Scheduler;
use crate::error::PlaygroundError;
use crate::presentation::Presenter;
use crate::settings::Settings;
use crate::{origin_to_center, tile_half_extents};

/// Stable tile identifier, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who may write a tile's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Authority {
    /// The live drag session
    Manual,
    /// The engine, copied back every tick
    Simulation,
    /// Nobody; fixed until explicitly released
    Frozen,
}

/// One placed word
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub text: String,
    /// Top-left origin in presentation space
    pub position: Vec2,
    /// Rotation copied from the engine (presentation only)
    pub angle: f32,
    pub authority: Authority,
    /// Recomputed on every sentence pass, never authoritative
    pub in_sentence: bool,
    pub body: BodyHandle,
}

impl Tile {
    /// Body centre (simulation space)
    pub fn center(&self, tile_size: f32) -> Vec2 {
        origin_to_center(self.position, tile_size)
    }

    pub fn bounds(&self, tile_size: f32) -> Aabb {
        Aabb::from_origin(self.position, tile_half_extents(tile_size) * 2.0)
    }
}

/// A palette template; stamping it never depletes it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub index: usize,
    pub text: String,
    pub origin: Vec2,
}

/// The word palette
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Palette {
    pub entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Lay the vocabulary out in a grid
    pub fn from_settings(settings: &Settings) -> Self {
        let layout = &settings.palette;
        let columns = layout.columns.max(1);
        let entries = settings
            .vocabulary
            .iter()
            .enumerate()
            .map(|(index, text)| PaletteEntry {
                index,
                text: text.clone(),
                origin: Vec2::new(
                    layout.origin.0 + (index % columns) as f32 * layout.pitch,
                    layout.origin.1 + (index / columns) as f32 * layout.pitch,
                ),
            })
            .collect();
        Self { entries }
    }

    pub fn entry(&self, index: usize) -> Result<&PaletteEntry, PlaygroundError> {
        self.entries
            .get(index)
            .ok_or(PlaygroundError::UnknownPaletteEntry(index))
    }
}

/// What a pointer landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    Tile(TileId),
    Palette(usize),
}

/// Complete playground state
#[derive(Debug)]
pub struct PlaygroundState {
    pub settings: Settings,
    pub viewport: Vec2,
    pub registry: TileRegistry,
    pub palette: Palette,
    /// Global simulation toggle (off at start)
    pub simulation_enabled: bool,
    /// At most one live drag
    pub drag: Option<DragSession>,
    pub timers: Scheduler,
    /// Ground, walls and sentence platform
    pub boundaries: Vec<BodyHandle>,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
}

impl PlaygroundState {
    /// Create a new session and install its boundaries in `engine`
    pub fn new(settings: Settings, engine: &mut dyn SimulationEngine) -> Self {
        let mut state = Self {
            viewport: settings.viewport(),
            registry: TileRegistry::new(),
            palette: Palette::from_settings(&settings),
            simulation_enabled: false,
            drag: None,
            timers: Scheduler::default(),
            boundaries: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
        };

        engine.set_gravity(Vec2::ZERO);
        bridge::install_boundaries(&mut state, engine);
        state
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.settings.tile_size
    }

    /// y of the sentence anchor line
    pub fn sentence_anchor_y(&self) -> f32 {
        self.viewport.y - self.settings.sentence.anchor_from_bottom
    }

    /// Tile currently held by the drag session, if any
    pub fn drag_target(&self) -> Option<TileId> {
        self.drag.as_ref().map(|session| session.target)
    }

    /// Topmost tile under the point, otherwise the palette entry under it
    pub fn hit_test(&self, point: Vec2) -> Option<PointerTarget> {
        let tile_size = self.tile_size();
        let size = tile_half_extents(tile_size) * 2.0;

        self.registry
            .list_tiles()
            .iter()
            .rev()
            .find(|tile| tile.bounds(tile_size).contains_point(point))
            .map(|tile| PointerTarget::Tile(tile.id))
            .or_else(|| {
                self.palette
                    .entries
                    .iter()
                    .find(|entry| Aabb::from_origin(entry.origin, size).contains_point(point))
                    .map(|entry| PointerTarget::Palette(entry.index))
            })
    }

    /// Remove a tile and its body, ending the drag session if it held it
    pub fn destroy_tile(
        &mut self,
        engine: &mut dyn SimulationEngine,
        presenter: &mut dyn Presenter,
        id: TileId,
    ) -> Result<(), PlaygroundError> {
        self.registry.destroy_tile(engine, id)?;
        presenter.remove_tile(id);
        if self.drag_target() == Some(id) {
            self.drag = None;
            presenter.set_trash_highlight(false);
        }
        Ok(())
    }

    /// Remove every tile, keeping the palette
    pub fn reset(&mut self, engine: &mut dyn SimulationEngine, presenter: &mut dyn Presenter) {
        let ids: Vec<TileId> = self.registry.list_tiles().iter().map(|t| t.id).collect();
        for id in &ids {
            if let Err(err) = self.destroy_tile(engine, presenter, *id) {
                log::debug!("Reset skipped {id}: {err}");
            }
        }
        self.drag = None;
        log::info!("Playground reset ({} tiles removed)", ids.len());
    }

    /// Spawn a random vocabulary word somewhere in the upper playground
    pub fn add_random_word(
        &mut self,
        engine: &mut dyn SimulationEngine,
        presenter: &mut dyn Presenter,
    ) -> Option<TileId> {
        if self.settings.vocabulary.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..self.settings.vocabulary.len());
        let text = self.settings.vocabulary[index].clone();
        let max_x = (self.viewport.x - 100.0).max(101.0);
        let origin = Vec2::new(
            self.rng.random_range(100.0..max_x),
            self.rng.random_range(100.0..300.0),
        );

        let id = self.registry.create_tile(engine, &self.settings, text, origin);
        if self.simulation_enabled {
            if let Err(err) = super::authority::unfreeze(self, engine, id) {
                log::debug!("New tile {id} stays frozen: {err}");
            }
        }
        if let Some(tile) = self.registry.get(id) {
            presenter.render_tile(id, tile.position, tile.angle);
        }
        Some(id)
    }

    /// Follow a new viewport size; boundaries are rebuilt to match
    pub fn resize(&mut self, engine: &mut dyn SimulationEngine, viewport: Vec2) {
        self.viewport = viewport;
        bridge::install_boundaries(self, engine);
        log::info!("Viewport resized to {}x{}", viewport.x, viewport.y);
    }
}
