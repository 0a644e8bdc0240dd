//! Neon Surge - a top-down neon survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, waves, progression)
//! - `session`: Lifecycle boundary driving the simulation and its collaborators
//! - `audio`: Fire-and-forget sound event sink
//! - `persistence`: Key/value storage backing settings and high score
//! - `settings`: Player preferences (volume)
//! - `highscores`: Best-score-across-runs record

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, NullAudio, SoundEffect};
pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Arena half-extent; the player is clamped to ±this on both axes
    pub const ARENA_HALF_EXTENT: f32 = 1000.0;

    /// Default viewport dimensions when the host never reports a size
    pub const DEFAULT_VIEW_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEW_HEIGHT: f32 = 720.0;
    /// Enemies spawn this far beyond the half-viewport ring (just off-screen)
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_HEALTH: f32 = 100.0;
    pub const PLAYER_DAMAGE: f32 = 10.0;
    /// Shot cooldown in milliseconds
    pub const FIRE_RATE_MS: f32 = 500.0;
    /// Fire-rate upgrades never push the cooldown below this
    pub const FIRE_RATE_FLOOR_MS: f32 = 200.0;
    /// Initial shield arc coverage (~72 degrees)
    pub const SHIELD_ARC: f32 = 1.2566;
    /// Revive restores this much health
    pub const REVIVE_HEALTH: f32 = 50.0;

    /// Dash tuning
    pub const DASH_COOLDOWN_MS: f32 = 1000.0;
    pub const DASH_COOLDOWN_FLOOR_MS: f32 = 500.0;
    pub const DASH_DISTANCE: f32 = 150.0;
    /// Dash position interpolates over this duration
    pub const DASH_DURATION_MS: f32 = 200.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 5.0;

    /// Enemy base stats, scaled per wave
    pub const ENEMY_RADIUS: f32 = 15.0;
    pub const ENEMY_BASE_HEALTH: f32 = 20.0;
    pub const ENEMY_HEALTH_PER_WAVE: f32 = 5.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.5;
    pub const ENEMY_SPEED_PER_WAVE: f32 = 0.1;
    /// Contact with the player costs a fixed amount, shield first
    pub const CONTACT_DAMAGE: f32 = 10.0;

    /// Boss stats
    pub const BOSS_RADIUS: f32 = 40.0;
    pub const BOSS_BASE_HEALTH: f32 = 200.0;
    pub const BOSS_HEALTH_PER_WAVE: f32 = 20.0;
    pub const BOSS_BASE_SPEED: f32 = 1.0;
    pub const BOSS_SPEED_PER_WAVE: f32 = 0.05;

    /// Wave pacing
    pub const WAVE_QUOTA_STEP: u32 = 6;
    pub const SPAWN_INTERVAL_BASE_MS: f32 = 2000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f32 = 150.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f32 = 300.0;

    /// Scoring
    pub const BOSS_KILL_BONUS: u32 = 10;

    /// XP threshold step per level (`level * 100`)
    pub const XP_LEVEL_STEP: u32 = 100;

    /// Hit flash duration in milliseconds
    pub const HIT_FLASH_MS: f32 = 200.0;

    /// Death effect particle counts
    pub const ENEMY_DEATH_PARTICLES: usize = 15;
    pub const PLAYER_DEATH_PARTICLES: usize = 50;

    /// Default sound volume
    pub const DEFAULT_VOLUME: f32 = 0.1;
}
