//! Word Playground - draggable word tiles, a toggled physics simulation and a
//! sentence that is re-derived from tile positions every frame
//!
//! Core modules:
//! - `sim`: Tile registry, position authority, drag sessions, sentence reconstruction
//! - `presentation`: What the core asks a renderer to draw
//! - `platform`: Normalized pointer input
//! - `settings`: Data-driven layout, physics and timing

pub mod error;
pub mod platform;
pub mod playground;
pub mod presentation;
pub mod settings;
pub mod sim;

pub use error::PlaygroundError;
pub use playground::Playground;
pub use settings::Settings;

use glam::Vec2;

/// Playground configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one engine step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default viewport
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Tiles are square; the body centre sits half a tile from the origin
    pub const TILE_SIZE: f32 = 80.0;

    /// Sentence anchor line, measured up from the bottom of the viewport
    pub const SENTENCE_ANCHOR_FROM_BOTTOM: f32 = 120.0;
    /// Band around the anchor for body centres (simulation space)
    pub const SIMULATION_BAND_ABOVE: f32 = 80.0;
    pub const SIMULATION_BAND_BELOW: f32 = 60.0;
    /// Band around the anchor for tile origins (presentation space). Tuned to
    /// the simulation band shifted up by half a tile, so a toggle never
    /// changes membership.
    pub const PRESENTATION_BAND_ABOVE: f32 = 120.0;
    pub const PRESENTATION_BAND_BELOW: f32 = 20.0;

    /// Sentence platform geometry
    pub const PLATFORM_WIDTH: f32 = 400.0;
    pub const PLATFORM_THICKNESS: f32 = 20.0;
    /// Ground and side walls, placed just outside the viewport
    pub const BOUNDARY_THICKNESS: f32 = 100.0;

    /// Horizontal release velocity bound (engine units per step)
    pub const RELEASE_IMPULSE_MAX: f32 = 1.0;

    /// Deferred work, in ticks at 60 Hz
    pub const SENTENCE_DEBOUNCE_TICKS: u64 = 6; // ~100 ms
    pub const COLLISION_FLASH_TICKS: u64 = 30; // ~500 ms
    pub const TRASH_FLASH_TICKS: u64 = 18; // ~300 ms
}

/// Half extents of a square tile
#[inline]
pub fn tile_half_extents(tile_size: f32) -> Vec2 {
    Vec2::splat(tile_size / 2.0)
}

/// Convert a tile origin (top-left) into its body centre
#[inline]
pub fn origin_to_center(origin: Vec2, tile_size: f32) -> Vec2 {
    origin + tile_half_extents(tile_size)
}

/// Convert a body centre back into a tile origin (top-left)
#[inline]
pub fn center_to_origin(center: Vec2, tile_size: f32) -> Vec2 {
    center - tile_half_extents(tile_size)
}
