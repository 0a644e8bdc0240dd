//! Audio event boundary
//!
//! The core never plays anything itself: it queues `GameEvent`s during a
//! tick and the session forwards them here as fire-and-forget effects.
//! Hosts plug in whatever backend they like; `NullAudio` is the silent
//! default for headless runs and tests.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired a bullet
    PlayerShoot,
    /// An upgrade card was picked
    CardSelect,
    /// Bullet damaged an enemy that survived
    EnemyHit,
    /// An enemy reached the player
    PlayerHit,
    /// Final death (no revive left)
    PlayerDeath,
    /// An enemy was destroyed
    EnemyDeath,
}

impl From<GameEvent> for SoundEffect {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::PlayerShoot => SoundEffect::PlayerShoot,
            GameEvent::CardSelect => SoundEffect::CardSelect,
            GameEvent::EnemyHit => SoundEffect::EnemyHit,
            GameEvent::PlayerHit => SoundEffect::PlayerHit,
            GameEvent::PlayerDeath => SoundEffect::PlayerDeath,
            GameEvent::EnemyDeath => SoundEffect::EnemyDeath,
        }
    }
}

/// Playback sink the session drives
///
/// `play` must not block; the core never waits on playback completion.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Volume in [0.0, 1.0]; backends without a mixer can ignore it
    fn set_volume(&mut self, _volume: f32) {}
}

/// Silent sink for tests and headless runs
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_game_event_maps_to_an_effect() {
        let events = [
            GameEvent::PlayerShoot,
            GameEvent::CardSelect,
            GameEvent::EnemyHit,
            GameEvent::PlayerHit,
            GameEvent::PlayerDeath,
            GameEvent::EnemyDeath,
        ];
        let mut sink = NullAudio;
        for event in events {
            // Conversion is total and playing never panics
            sink.play(SoundEffect::from(event));
        }
    }
}
