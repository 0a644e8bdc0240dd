//! Enemy and boss spawning, plus the wave controller
//!
//! Enemies appear at a uniform-random angle on a ring just outside the
//! viewport, so they always walk in from off-screen. Waves carry a
//! normal-enemy quota; one designated wave per cycle gets a boss.

use glam::Vec2;
use rand::Rng;

use super::state::{ColorTag, Enemy, EnemyVariant, GameState};
use super::upgrade;

/// Uniform-random point on the spawn ring around the player
fn spawn_position(state: &mut GameState) -> Vec2 {
    let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
    state.player.pos + Vec2::new(angle.cos(), angle.sin()) * state.spawn_distance()
}

/// Append a random-variant enemy scaled to the current wave
pub fn spawn_normal_enemy(state: &mut GameState) {
    let variant = EnemyVariant::random(&mut state.rng);
    let color = ColorTag::random_enemy(&mut state.rng);
    let pos = spawn_position(state);
    state
        .enemies
        .push(Enemy::new(pos, variant, state.wave.current, color));
}

/// Append the cycle's boss
pub fn spawn_boss(state: &mut GameState) {
    let pos = spawn_position(state);
    log::info!("boss incoming on wave {}", state.wave.current);
    state.enemies.push(Enemy::boss(pos, state.wave.current));
}

/// Per-tick spawn decision
///
/// The designated boss wave spawns its single boss with priority; normal
/// spawning otherwise requires an unmet quota and an elapsed interval.
pub fn run_spawner(state: &mut GameState) {
    if state.wave.current == state.wave.boss_wave && !state.wave.boss_spawned {
        spawn_boss(state);
        state.wave.boss_spawned = true;
    } else if state.wave.spawned < state.wave.total
        && state.time_ms - state.wave.last_spawn_ms > state.wave.spawn_interval_ms as f64
    {
        spawn_normal_enemy(state);
        state.wave.spawned += 1;
        state.wave.last_spawn_ms = state.time_ms;
    }
}

/// End-of-tick completion check; a finished wave advances the counters
/// and presents the between-wave upgrade cards
pub fn check_wave_completion(state: &mut GameState) {
    if state.wave.is_complete(state.enemies.len()) {
        state.wave.advance(&mut state.rng);
        log::info!(
            "wave {} begins: quota {}, interval {}ms",
            state.wave.current,
            state.wave.total,
            state.wave.spawn_interval_ms
        );
        upgrade::offer_upgrades(state);
    }
}
