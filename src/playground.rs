//! Playground session
//!
//! Bundles the core state with an engine and a presenter and runs the
//! fixed-timestep loop. Input is queued between frames and applied at the
//! start of the next tick.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{
    PlaygroundEvent, PlaygroundState, PointerTarget, SentenceSnapshot, SimulationEngine,
    TickInput, sentence, tick,
};
use crate::presentation::Presenter;
use crate::platform::PointerEvent;

pub struct Playground<E: SimulationEngine, P: Presenter> {
    pub state: PlaygroundState,
    pub engine: E,
    pub presenter: P,
    input: TickInput,
    accumulator: f32,
}

impl<E: SimulationEngine, P: Presenter> Playground<E, P> {
    pub fn new(settings: Settings, mut engine: E, mut presenter: P) -> Self {
        let mut state = PlaygroundState::new(settings, &mut engine);
        sentence::refresh(&mut state, &mut presenter);
        log::info!(
            "Playground ready: {} palette words, viewport {}x{}",
            state.palette.entries.len(),
            state.viewport.x,
            state.viewport.y
        );
        Self {
            state,
            engine,
            presenter,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    /// Queue an event for the next tick
    pub fn push(&mut self, event: impl Into<PlaygroundEvent>) {
        self.input.push(event);
    }

    /// Queue a pointer-down, resolving what lies under it
    pub fn pointer_down(&mut self, position: Vec2) -> Option<PointerTarget> {
        let target = self.state.hit_test(position);
        self.push(PointerEvent::down(position, target));
        target
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        self.push(PointerEvent::moved(position));
    }

    pub fn pointer_up(&mut self, position: Vec2) {
        self.push(PointerEvent::up(position));
    }

    /// Run one tick with everything queued so far
    pub fn step(&mut self) {
        let input = std::mem::take(&mut self.input);
        tick(
            &mut self.state,
            &mut self.engine,
            &mut self.presenter,
            &input,
            SIM_DT,
        );
    }

    /// Feed real frame time; runs as many fixed ticks as fit
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Current sentence, derived fresh
    pub fn sentence(&mut self) -> SentenceSnapshot {
        sentence::reconstruct(&mut self.state)
    }
}
