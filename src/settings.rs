//! Playground settings
//!
//! Layout, physics and timing knobs. Everything has a default so a partial
//! JSON file only needs to name what it changes.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::PlaygroundError;

/// Vertical band around the sentence anchor line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Distance above the anchor line still counted as in the sentence
    pub above: f32,
    /// Distance below the anchor line still counted as in the sentence
    pub below: f32,
}

impl Band {
    pub fn new(above: f32, below: f32) -> Self {
        Self { above, below }
    }

    /// Inclusive band test for a y coordinate
    pub fn contains(&self, anchor_y: f32, y: f32) -> bool {
        y >= anchor_y - self.above && y <= anchor_y + self.below
    }
}

/// Sentence area layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentenceSettings {
    /// Anchor line distance from the bottom of the viewport
    pub anchor_from_bottom: f32,
    /// Band applied to body centres while simulation is on
    pub simulation_band: Band,
    /// Band applied to tile origins while simulation is off
    pub presentation_band: Band,
    /// Shown when no tile is in the sentence
    pub placeholder: String,
    pub platform_width: f32,
    pub platform_thickness: f32,
}

impl Default for SentenceSettings {
    fn default() -> Self {
        Self {
            anchor_from_bottom: SENTENCE_ANCHOR_FROM_BOTTOM,
            simulation_band: Band::new(SIMULATION_BAND_ABOVE, SIMULATION_BAND_BELOW),
            presentation_band: Band::new(PRESENTATION_BAND_ABOVE, PRESENTATION_BAND_BELOW),
            placeholder: "将汉字拖到下方创建句子...".to_string(),
            platform_width: PLATFORM_WIDTH,
            platform_thickness: PLATFORM_THICKNESS,
        }
    }
}

/// Body and world parameters handed to the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward gravity while simulation is on (px/step²)
    pub gravity: f32,
    pub tile_restitution: f32,
    pub tile_friction: f32,
    pub tile_air_friction: f32,
    pub platform_restitution: f32,
    pub platform_friction: f32,
    /// Bound on the random horizontal velocity given on release
    pub release_impulse: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            tile_restitution: 0.6,
            tile_friction: 0.1,
            tile_air_friction: 0.01,
            platform_restitution: 0.3,
            platform_friction: 0.8,
            release_impulse: RELEASE_IMPULSE_MAX,
        }
    }
}

/// Deferred work delays, in ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub sentence_debounce_ticks: u64,
    pub collision_flash_ticks: u64,
    pub trash_flash_ticks: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            sentence_debounce_ticks: SENTENCE_DEBOUNCE_TICKS,
            collision_flash_ticks: COLLISION_FLASH_TICKS,
            trash_flash_ticks: TRASH_FLASH_TICKS,
        }
    }
}

/// Palette grid layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    pub columns: usize,
    pub pitch: f32,
    pub origin: (f32, f32),
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            columns: 2,
            pitch: 90.0,
            origin: (20.0, 50.0),
        }
    }
}

/// Playground settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewport: (f32, f32),
    pub tile_size: f32,
    /// Seed for release impulses and random words
    pub seed: u64,
    pub sentence: SentenceSettings,
    pub physics: PhysicsSettings,
    pub timing: TimingSettings,
    pub palette: PaletteSettings,
    /// Words offered by the palette and by "add random word"
    pub vocabulary: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: (VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            tile_size: TILE_SIZE,
            seed: 0x5EED,
            sentence: SentenceSettings::default(),
            physics: PhysicsSettings::default(),
            timing: TimingSettings::default(),
            palette: PaletteSettings::default(),
            vocabulary: default_vocabulary(),
        }
    }
}

impl Settings {
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport.0, self.viewport.1)
    }

    /// Parse settings from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, PlaygroundError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Could not read {}: {err}, using default settings", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{err}, using default settings");
                Self::default()
            }
        }
    }
}

fn default_vocabulary() -> Vec<String> {
    [
        "我", "你", "他", "她", "它", "愛", "看", "聽", "吃", "可", "喝", "以", "說", "走", "跑",
        "大", "小", "好", "壞", "美", "書", "水", "火", "山", "數", "天", "地", "人", "家",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
