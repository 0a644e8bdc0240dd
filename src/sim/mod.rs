//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Seeded RNG only, owned by the state aggregate
//! - One tick runs to completion; the only pause is `UpgradeSelection`
//! - No rendering, audio, or storage dependencies - the core emits
//!   events and the session routes them to collaborators

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrade;

pub use collision::{apply_player_damage, circles_overlap};
pub use spawn::{spawn_boss, spawn_normal_enemy};
pub use state::{
    Bullet, ColorTag, DashState, Enemy, EnemyVariant, GameEvent, GamePhase, GameState, Particle,
    Player, WaveState,
};
pub use tick::{TickInput, tick};
pub use upgrade::{CATALOG, Rarity, UpgradeKind, award_xp, choose_upgrade, offer_upgrades};
