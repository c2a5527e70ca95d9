//! Sentence reconstruction
//!
//! The sentence is never cached. Every pass re-reads the registry, decides
//! which tiles sit in the band around the sentence anchor line and orders
//! them left to right.
//!
//! While simulation is on, body centres are tested against the simulation
//! band; while it is off, tile origins are tested against the presentation
//! band. The two bands are configured independently.

use serde::Serialize;

use super::state::{PlaygroundState, TileId};
use crate::presentation::Presenter;

/// Ordered sentence members and their concatenated text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceSnapshot {
    pub tiles: Vec<TileId>,
    pub text: String,
}

impl SentenceSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Derive the sentence and refresh every tile's membership flag
///
/// Safe to call every frame; the flags are the only thing it writes.
pub fn reconstruct(state: &mut PlaygroundState) -> SentenceSnapshot {
    let anchor_y = state.sentence_anchor_y();
    let tile_size = state.tile_size();
    let simulation_space = state.simulation_enabled;
    let sentence = &state.settings.sentence;
    let band = if simulation_space {
        sentence.simulation_band
    } else {
        sentence.presentation_band
    };

    // (x, index into registry) for members, in registry order
    let mut members: Vec<(f32, usize)> = Vec::new();
    for (index, tile) in state.registry.tiles_mut().iter_mut().enumerate() {
        let point = if simulation_space {
            tile.center(tile_size)
        } else {
            tile.position
        };
        tile.in_sentence = band.contains(anchor_y, point.y);
        if tile.in_sentence {
            members.push((point.x, index));
        }
    }

    // Stable: equal x keeps creation order
    members.sort_by(|a, b| a.0.total_cmp(&b.0));

    let tiles = state.registry.list_tiles();
    let text: String = members
        .iter()
        .map(|&(_, index)| tiles[index].text.as_str())
        .collect();

    SentenceSnapshot {
        tiles: members.iter().map(|&(_, index)| tiles[index].id).collect(),
        text: if text.is_empty() {
            state.settings.sentence.placeholder.clone()
        } else {
            text
        },
    }
}

/// Reconstruct and push highlights plus text to the presenter
pub fn refresh(state: &mut PlaygroundState, presenter: &mut dyn Presenter) -> SentenceSnapshot {
    let snapshot = reconstruct(state);
    for tile in state.registry.list_tiles() {
        presenter.set_membership_highlight(tile.id, tile.in_sentence);
    }
    presenter.set_sentence_text(&snapshot.text);
    snapshot
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::settings::Band;
    use crate::sim::engine::SimulationEngine;
    use crate::sim::test_rig;

    fn place(
        state: &mut PlaygroundState,
        engine: &mut dyn SimulationEngine,
        text: &str,
        origin: Vec2,
    ) -> TileId {
        let settings = state.settings.clone();
        state
            .registry
            .create_tile(engine, &settings, text.into(), origin)
    }

    #[test]
    fn test_orders_left_to_right() {
        let (mut state, mut engine, _) = test_rig();
        // Anchor is 720 - 120 = 600; presentation band is [480, 620]
        let y = 580.0;
        let ten = place(&mut state, &mut engine, "十", Vec2::new(10.0, y));
        let five = place(&mut state, &mut engine, "五", Vec2::new(5.0, y));
        let eight = place(&mut state, &mut engine, "八", Vec2::new(8.0, y));

        let snapshot = reconstruct(&mut state);
        assert_eq!(snapshot.tiles, vec![five, eight, ten]);
        assert_eq!(snapshot.text, "五八十");
    }

    #[test]
    fn test_empty_sentence_uses_placeholder() {
        let (mut state, mut engine, _) = test_rig();
        place(&mut state, &mut engine, "天", Vec2::new(100.0, 100.0));

        let snapshot = reconstruct(&mut state);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.text, state.settings.sentence.placeholder);
        assert!(!snapshot.text.is_empty());
        assert!(!state.registry.list_tiles()[0].in_sentence);
    }

    #[test]
    fn test_ties_keep_creation_order() {
        let (mut state, mut engine, _) = test_rig();
        let first = place(&mut state, &mut engine, "大", Vec2::new(300.0, 600.0));
        let second = place(&mut state, &mut engine, "小", Vec2::new(300.0, 590.0));

        assert_eq!(reconstruct(&mut state).tiles, vec![first, second]);
    }

    #[test]
    fn test_idempotent() {
        let (mut state, mut engine, _) = test_rig();
        place(&mut state, &mut engine, "我", Vec2::new(300.0, 600.0));
        place(&mut state, &mut engine, "家", Vec2::new(200.0, 100.0));
        place(&mut state, &mut engine, "愛", Vec2::new(400.0, 560.0));

        let first = reconstruct(&mut state);
        let flags: Vec<bool> = state.registry.list_tiles().iter().map(|t| t.in_sentence).collect();
        let second = reconstruct(&mut state);
        let again: Vec<bool> = state.registry.list_tiles().iter().map(|t| t.in_sentence).collect();

        assert_eq!(first, second);
        assert_eq!(flags, again);
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_band_depends_on_mode() {
        let (mut state, mut engine, _) = test_rig();
        // Origin y 520, centre y 560. Narrow the presentation band so only
        // the centre test can pass.
        state.settings.sentence.presentation_band = Band::new(10.0, 10.0);
        place(&mut state, &mut engine, "火", Vec2::new(300.0, 520.0));

        assert!(reconstruct(&mut state).is_empty());
        state.simulation_enabled = true;
        assert_eq!(reconstruct(&mut state).text, "火");
    }

    #[test]
    fn test_default_bands_agree_across_modes() {
        let (mut state, mut engine, _) = test_rig();
        // Edges of the simulation band [520, 660] on body centres, plus a
        // step past each edge
        for origin_y in [440.0, 479.0, 480.0, 510.0, 620.0, 621.0] {
            place(&mut state, &mut engine, "水", Vec2::new(300.0, origin_y));
        }

        state.simulation_enabled = true;
        let simulated: Vec<bool> = {
            reconstruct(&mut state);
            state.registry.list_tiles().iter().map(|t| t.in_sentence).collect()
        };
        state.simulation_enabled = false;
        reconstruct(&mut state);
        let presented: Vec<bool> = state.registry.list_tiles().iter().map(|t| t.in_sentence).collect();

        assert_eq!(simulated, presented);
        assert_eq!(presented, vec![false, false, true, true, true, false]);
    }

    #[test]
    fn test_refresh_pushes_to_presenter() {
        let (mut state, mut engine, mut presenter) = test_rig();
        let inside = place(&mut state, &mut engine, "好", Vec2::new(300.0, 600.0));
        let outside = place(&mut state, &mut engine, "壞", Vec2::new(300.0, 100.0));

        refresh(&mut state, &mut presenter);
        assert_eq!(presenter.sentence_text, "好");
        assert!(presenter.is_highlighted(inside));
        assert!(!presenter.is_highlighted(outside));
    }
}
