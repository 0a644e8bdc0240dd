//! Top-level per-frame update
//!
//! Orchestrates one tick: movement/dash, firing, entity advancement,
//! spawning, combat resolution, wave completion, scoring, death. The
//! whole tick is gated on the `Running` phase; `UpgradeSelection` and
//! `GameOver` freeze every timer and position.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::spawn;
use super::state::{Bullet, GameEvent, GamePhase, GameState, Particle};
use crate::consts::*;

/// Input snapshot for a single tick
///
/// Queryable current state only - no key-repeat or chording logic lives
/// in the core. Simultaneous directions combine additively.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire is held; shots are rate-limited by the player's fire rate
    pub fire_held: bool,
    /// Dash activation is held/pressed
    pub dash: bool,
    /// Current aim point in world coordinates, if the host has one
    pub aim: Option<Vec2>,
}

impl TickInput {
    /// Additive combination of the held directions
    fn move_delta(&self) -> Vec2 {
        let mut delta = Vec2::ZERO;
        if self.up {
            delta.y -= 1.0;
        }
        if self.down {
            delta.y += 1.0;
        }
        if self.left {
            delta.x -= 1.0;
        }
        if self.right {
            delta.x += 1.0;
        }
        delta
    }
}

/// Advance the simulation by one frame's elapsed milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    // A defective frame delta (NaN or negative) is zero elapsed time:
    // skip the tick instead of corrupting cooldowns and positions
    if !dt_ms.is_finite() || dt_ms <= 0.0 {
        return;
    }
    state.time_ms += dt_ms as f64;
    let now = state.time_ms;

    // 1. Dash interpolation wins over direct movement
    if state.dash.active {
        state.dash.elapsed_ms += dt_ms;
        let mut t = state.dash.elapsed_ms / DASH_DURATION_MS;
        if t >= 1.0 {
            t = 1.0;
            state.dash.active = false;
        }
        state.player.pos = state.dash.start.lerp(state.dash.target, t);
    } else {
        state.player.pos += input.move_delta() * state.player.speed;
    }

    // 2. Dash activation; the cooldown re-arms at initiation, not at
    // animation end
    if input.dash
        && !state.dash.active
        && cooldown_ready(state.player.last_dash_ms, state.player.dash_cooldown_ms, now)
    {
        start_dash(state, input);
        state.player.last_dash_ms = Some(now);
    }

    // 3. Keep the player inside the arena
    let half = Vec2::splat(ARENA_HALF_EXTENT);
    state.player.pos = state.player.pos.clamp(-half, half);

    // 4. Continuous fire while held
    if input.fire_held {
        try_fire(state, input);
    }

    // 5. Advance pools, spawn, resolve combat
    advance_bullets(state);
    advance_enemies(state);
    spawn::run_spawner(state);
    collision::resolve_enemy_player(state);
    collision::resolve_bullet_enemy(state);
    collision::cull_distant_bullets(state);
    advance_particles(state);

    // 6. Wave completion
    spawn::check_wave_completion(state);

    // 7. Score
    state.recompute_score();

    // 8. Hit flash decay
    state.player.hit_timer_ms = (state.player.hit_timer_ms - dt_ms).max(0.0);

    // 9. Death, with one possible revive
    if state.player.health <= 0.0 {
        if state.player.revive {
            state.player.revive = false;
            state.player.health = REVIVE_HEALTH;
        } else {
            player_explosion(state);
            state.phase = GamePhase::GameOver;
            log::info!(
                "game over: wave {}, score {}",
                state.wave.current,
                state.score as u64
            );
        }
    }
}

fn cooldown_ready(last: Option<f64>, cooldown_ms: f32, now: f64) -> bool {
    last.is_none_or(|t| now - t >= cooldown_ms as f64)
}

/// Unit vector from `from` toward the aim point; a missing aim (or an
/// aim sitting on the player) falls through to angle 0
fn aim_direction(from: Vec2, aim: Option<Vec2>) -> Vec2 {
    let dir = aim
        .map(|a| (a - from).normalize_or_zero())
        .unwrap_or(Vec2::ZERO);
    if dir == Vec2::ZERO { Vec2::X } else { dir }
}

fn start_dash(state: &mut GameState, input: &TickInput) {
    let dir = aim_direction(state.player.pos, input.aim);
    state.dash.start = state.player.pos;
    state.dash.target = state.player.pos + dir * state.player.dash_distance;
    state.dash.elapsed_ms = 0.0;
    state.dash.active = true;
}

/// Fire one bullet toward the aim point, rate-limited
///
/// Crits are rolled here, at fire time: the doubled damage is frozen
/// into the bullet and later upgrades never touch it.
fn try_fire(state: &mut GameState, input: &TickInput) {
    let now = state.time_ms;
    if !cooldown_ready(state.player.last_shot_ms, state.player.fire_rate_ms, now) {
        return;
    }
    state.player.last_shot_ms = Some(now);

    let dir = aim_direction(state.player.pos, input.aim);
    let mut damage = state.player.damage;
    if state.rng.random::<f32>() < state.player.crit_chance {
        damage *= 2.0;
    }
    let bullet = Bullet::new(state.player.pos, dir * state.player.bullet_speed, damage);
    state.bullets.push(bullet);
    state.push_event(GameEvent::PlayerShoot);
}

fn advance_bullets(state: &mut GameState) {
    for bullet in state.bullets.iter_mut() {
        bullet.pos += bullet.vel;
    }
}

/// Pursuit: every enemy steps straight toward the player's current
/// position at its own speed
fn advance_enemies(state: &mut GameState) {
    let target = state.player.pos;
    for enemy in state.enemies.iter_mut() {
        let dir = (target - enemy.pos).normalize_or_zero();
        enemy.pos += dir * enemy.speed;
    }
}

fn advance_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= 1.0;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Final-death burst at the player's position
fn player_explosion(state: &mut GameState) {
    let pos = state.player.pos;
    for _ in 0..PLAYER_DEATH_PARTICLES {
        let spark = Particle::burst(&mut state.rng, pos, super::state::ColorTag::Blue);
        state.particles.push(spark);
    }
    state.push_event(GameEvent::PlayerDeath);
}
