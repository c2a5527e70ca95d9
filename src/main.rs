//! Word Playground entry point
//!
//! Runs a scripted headless session: stamps a few palette words onto the
//! sentence line, turns gravity on, lets everything settle and prints the
//! resulting sentence. Pass a settings JSON path as the first argument to
//! override defaults.

use std::path::Path;

use glam::Vec2;

use word_playground::Playground;
use word_playground::Settings;
use word_playground::consts::SIM_DT;
use word_playground::presentation::HeadlessPresenter;
use word_playground::sim::{BoxWorld, PlaygroundEvent};

fn main() {
    env_logger::init();
    log::info!("Word Playground (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    let presenter = HeadlessPresenter::new(&settings);
    let mut playground = Playground::new(settings, BoxWorld::new(), presenter);

    let viewport = playground.state.viewport;
    let line_y = viewport.y - playground.state.settings.sentence.anchor_from_bottom;
    let grabs: Vec<Vec2> = playground
        .state
        .palette
        .entries
        .iter()
        .take(4)
        .map(|entry| entry.origin + Vec2::splat(playground.state.tile_size() / 2.0))
        .collect();

    // Drop words a little above the platform, scattered across it
    for (i, grab) in grabs.into_iter().enumerate() {
        let drop = Vec2::new(viewport.x / 2.0 - 150.0 + i as f32 * 100.0, line_y - 150.0);
        playground.pointer_down(grab);
        playground.pointer_move((grab + drop) / 2.0);
        playground.pointer_move(drop);
        playground.pointer_up(drop);
        playground.step();
    }
    println!("Before gravity: {}", playground.presenter.sentence_text);

    playground.push(PlaygroundEvent::ToggleSimulation);
    playground.push(PlaygroundEvent::AddRandomWord);
    for _ in 0..240 {
        playground.advance(SIM_DT);
    }
    println!("After settling: {}", playground.presenter.sentence_text);

    let snapshot = playground.sentence();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Could not serialize sentence: {err}"),
    }
}
