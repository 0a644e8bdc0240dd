//! Session lifecycle boundary
//!
//! The one place the simulation meets its collaborators: frames drive
//! the deterministic tick, sound events drain to the audio sink, and a
//! finished run compares-and-writes the high score through storage.
//! Once a run ends - game over or an external stop - no further tick
//! executes until the next `start`.

use crate::audio::AudioSink;
use crate::highscores::HighScore;
use crate::persistence::Storage;
use crate::settings::Settings;
use crate::sim::{self, GamePhase, GameState, TickInput};

/// An owned run of the game, from `start` to game over
pub struct Session<A: AudioSink, S: Storage> {
    state: GameState,
    audio: A,
    storage: S,
    settings: Settings,
    running: bool,
}

impl<A: AudioSink, S: Storage> Session<A, S> {
    /// Build the session shell; nothing ticks until `start`
    pub fn new(audio: A, storage: S) -> Self {
        // A 3-card offer needs 3 distinct entries; fail at startup, not
        // mid-run
        assert!(
            sim::CATALOG.len() >= 3,
            "upgrade catalog must hold at least 3 entries"
        );
        let settings = Settings::load(&storage);
        let mut audio = audio;
        audio.set_volume(settings.volume);
        Self {
            state: GameState::new(0),
            audio,
            storage,
            settings,
            running: false,
        }
    }

    /// Re-initialize all pools and state to defaults and begin ticking
    pub fn start(&mut self, seed: u64) {
        let view = self.state.view;
        self.state = GameState::new(seed);
        self.state.view = view;
        self.running = true;
        log::info!("session started (seed {seed})");
    }

    /// Advance one frame, if a run is active
    pub fn frame(&mut self, input: &TickInput, dt_ms: f32) {
        if !self.running {
            return;
        }
        sim::tick(&mut self.state, input, dt_ms);
        self.forward_events();
        if self.state.phase == GamePhase::GameOver {
            self.finish();
        }
    }

    /// Host callback: the player picked card `index` from the pending
    /// offer. Returns whether the pick was accepted.
    pub fn choose_upgrade(&mut self, index: usize) -> bool {
        if !self.running {
            return false;
        }
        let accepted = sim::choose_upgrade(&mut self.state, index);
        self.forward_events();
        accepted
    }

    /// External stop; also triggers the persistence write
    pub fn end(&mut self) {
        if self.running {
            self.finish();
        }
    }

    /// Read-only snapshot for the renderer and HUD
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.state.set_viewport(width, height);
    }

    pub fn volume(&self) -> f32 {
        self.settings.volume
    }

    /// Update the volume preference: clamped, persisted, applied to the
    /// sink
    pub fn set_volume(&mut self, volume: f32) {
        self.settings.set_volume(volume);
        self.settings.save(&mut self.storage);
        self.audio.set_volume(self.settings.volume);
    }

    /// Current persisted record
    pub fn high_score(&self) -> u64 {
        HighScore::load(&self.storage).best
    }

    /// Stop the clock and write the high score if this run beat it
    fn finish(&mut self) {
        self.running = false;
        let score = self.state.score.floor() as u64;
        let mut record = HighScore::load(&self.storage);
        if record.record(score) {
            record.save(&mut self.storage);
            log::info!("new high score: {score}");
        }
    }

    /// Route this tick's sound events to the sink, fire-and-forget
    fn forward_events(&mut self) {
        for event in self.state.drain_events() {
            self.audio.play(event.into());
        }
    }
}
