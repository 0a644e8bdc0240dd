//! Neon Surge entry point
//!
//! Headless demo driver: auto-plays one session and logs the outcome.
//! A real host plugs its renderer and audio backend into the same
//! `Session` surface and feeds it live input instead.

use std::cmp::Ordering;

use neon_surge::persistence::FileStorage;
use neon_surge::sim::{GamePhase, TickInput};
use neon_surge::{NullAudio, Session};

/// 60 Hz frame delta
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Demo cap: five minutes of game time
const MAX_FRAMES: u32 = 60 * 60 * 5;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let storage = FileStorage::new(std::env::temp_dir().join("neon-surge.json"));
    let mut session = Session::new(NullAudio, storage);
    session.start(rand::random());

    let mut frames = 0;
    while session.is_running() && frames < MAX_FRAMES {
        frames += 1;
        let state = session.state();

        if state.phase == GamePhase::UpgradeSelection {
            session.choose_upgrade(0);
            continue;
        }

        // Track the nearest enemy and hold fire on it
        let aim = state
            .enemies
            .iter()
            .min_by(|a, b| {
                let da = a.pos.distance_squared(state.player.pos);
                let db = b.pos.distance_squared(state.player.pos);
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            })
            .map(|e| e.pos);

        let input = TickInput {
            fire_held: true,
            aim,
            ..Default::default()
        };
        session.frame(&input, FRAME_MS);
    }
    session.end();

    let state = session.state();
    log::info!(
        "run over after {frames} frames: wave {}, level {}, {} kills + {} boss kills, score {}, high score {}",
        state.wave.current,
        state.player.level,
        state.kill_count,
        state.boss_kill_count,
        state.score as u64,
        session.high_score(),
    );
}
