//! Presentation seam
//!
//! The core tells a renderer what to show through `Presenter`. The renderer
//! never decides whether a tile exists; the registry does.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::collision::Aabb;
use crate::sim::state::TileId;

pub trait Presenter {
    fn render_tile(&mut self, id: TileId, position: Vec2, angle: f32);
    fn remove_tile(&mut self, id: TileId);
    fn set_membership_highlight(&mut self, id: TileId, in_sentence: bool);
    fn set_sentence_text(&mut self, text: &str);
    /// Current bounds of the trash target
    fn trash_bounds(&self) -> Aabb;

    // Transient effects; renderers without them can ignore these
    fn set_trash_highlight(&mut self, _active: bool) {}
    fn set_trash_flash(&mut self, _active: bool) {}
    fn set_collision_flash(&mut self, _id: TileId, _active: bool) {}
}

/// What a headless presenter last drew for a tile
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedTile {
    pub position: Vec2,
    pub angle: f32,
    pub highlighted: bool,
    pub flashing: bool,
}

/// Records presentation calls instead of drawing
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessPresenter {
    pub tiles: BTreeMap<TileId, RenderedTile>,
    pub sentence_text: String,
    pub trash: Aabb,
    pub trash_highlight: bool,
    pub trash_flash: bool,
}

impl HeadlessPresenter {
    /// Trash target in the bottom-right corner of the viewport
    pub fn new(settings: &Settings) -> Self {
        let size = Vec2::splat(settings.tile_size);
        let origin = settings.viewport() - size - Vec2::splat(20.0);
        Self {
            tiles: BTreeMap::new(),
            sentence_text: String::new(),
            trash: Aabb::from_origin(origin, size),
            trash_highlight: false,
            trash_flash: false,
        }
    }

    pub fn tile(&self, id: TileId) -> Option<&RenderedTile> {
        self.tiles.get(&id)
    }

    pub fn is_highlighted(&self, id: TileId) -> bool {
        self.tiles.get(&id).is_some_and(|t| t.highlighted)
    }

    pub fn is_flashing(&self, id: TileId) -> bool {
        self.tiles.get(&id).is_some_and(|t| t.flashing)
    }
}

impl Presenter for HeadlessPresenter {
    fn render_tile(&mut self, id: TileId, position: Vec2, angle: f32) {
        let tile = self.tiles.entry(id).or_default();
        tile.position = position;
        tile.angle = angle;
    }

    fn remove_tile(&mut self, id: TileId) {
        self.tiles.remove(&id);
    }

    fn set_membership_highlight(&mut self, id: TileId, in_sentence: bool) {
        self.tiles.entry(id).or_default().highlighted = in_sentence;
    }

    fn set_sentence_text(&mut self, text: &str) {
        if self.sentence_text != text {
            log::debug!("Sentence: {text}");
            self.sentence_text = text.to_string();
        }
    }

    fn trash_bounds(&self) -> Aabb {
        self.trash
    }

    fn set_trash_highlight(&mut self, active: bool) {
        self.trash_highlight = active;
    }

    fn set_trash_flash(&mut self, active: bool) {
        self.trash_flash = active;
    }

    fn set_collision_flash(&mut self, id: TileId, active: bool) {
        self.tiles.entry(id).or_default().flashing = active;
    }
}
