//! Collision detection and combat resolution
//!
//! Three pairwise passes per tick, every one a plain circle-circle
//! overlap. Passes mark entities dead and a compact step sweeps after
//! each pass, so removal can never skip or double-process a neighbour.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, Particle, Player};
use super::upgrade;
use crate::consts::*;

/// Overlap test shared by every pass
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Shield-first damage: the absorption pool soaks what it can, health
/// takes the remainder. Both stay clamped non-negative.
pub fn apply_player_damage(player: &mut Player, damage: f32) {
    let absorbed = player.shield.min(damage);
    player.shield = (player.shield - absorbed).max(0.0);
    player.health = (player.health - (damage - absorbed)).max(0.0);
}

/// Pass 1: enemies touching the player
///
/// Each colliding enemy deals a fixed contact hit and is consumed by it.
pub fn resolve_enemy_player(state: &mut GameState) {
    for i in 0..state.enemies.len() {
        if !state.enemies[i].alive {
            continue;
        }
        let (enemy_pos, enemy_radius) = (state.enemies[i].pos, state.enemies[i].radius);
        if circles_overlap(
            enemy_pos,
            enemy_radius,
            state.player.pos,
            state.player.radius,
        ) {
            apply_player_damage(&mut state.player, CONTACT_DAMAGE);
            state.player.hit_timer_ms = HIT_FLASH_MS;
            state.enemies[i].alive = false;
            state.push_event(GameEvent::PlayerHit);
        }
    }
    state.enemies.retain(|e| e.alive);
}

/// XP for a kill: a random base scaled by wave, then the player's
/// multiplier, floored at each step
fn xp_reward(state: &mut GameState, is_boss: bool) -> u32 {
    let wave_scale = 1.0 + (state.wave.current - 1) as f32 * 0.1;
    let base = if is_boss {
        state.rng.random_range(20.0..30.0f32)
    } else {
        state.rng.random_range(5.0..10.0f32)
    };
    let reward = (base * wave_scale).floor();
    (reward * state.player.xp_multiplier).floor() as u32
}

/// Pass 2: bullets against enemies
///
/// A bullet is consumed by its first overlap and never registers against
/// a second enemy in the same pass. Kills award XP (which may queue an
/// upgrade offer), bump the kill counters, and burst death particles.
pub fn resolve_bullet_enemy(state: &mut GameState) {
    for bi in 0..state.bullets.len() {
        if !state.bullets[bi].alive {
            continue;
        }
        let (bullet_pos, bullet_radius, bullet_damage) = {
            let b = &state.bullets[bi];
            (b.pos, b.radius, b.damage)
        };
        for ei in 0..state.enemies.len() {
            if !state.enemies[ei].alive {
                continue;
            }
            if !circles_overlap(
                bullet_pos,
                bullet_radius,
                state.enemies[ei].pos,
                state.enemies[ei].radius,
            ) {
                continue;
            }

            state.bullets[bi].alive = false;
            state.enemies[ei].health -= bullet_damage;

            if state.enemies[ei].health > 0.0 {
                state.push_event(GameEvent::EnemyHit);
            } else {
                state.enemies[ei].health = 0.0;
                state.enemies[ei].alive = false;
                let pos = state.enemies[ei].pos;
                let color = state.enemies[ei].color;
                let is_boss = state.enemies[ei].is_boss;

                let xp = xp_reward(state, is_boss);
                upgrade::award_xp(state, xp);
                if is_boss {
                    state.boss_kill_count += 1;
                } else {
                    state.kill_count += 1;
                }
                state.push_event(GameEvent::EnemyDeath);
                for _ in 0..ENEMY_DEATH_PARTICLES {
                    let spark = Particle::burst(&mut state.rng, pos, color);
                    state.particles.push(spark);
                }
            }
            break;
        }
    }
    state.bullets.retain(|b| b.alive);
    state.enemies.retain(|e| e.alive);
}

/// Pass 3: bullets farther from the player than one viewport width have
/// left the visible world
pub fn cull_distant_bullets(state: &mut GameState) {
    let origin = state.player.pos;
    let range = state.view.x;
    for bullet in state.bullets.iter_mut() {
        if bullet.pos.distance(origin) > range {
            bullet.alive = false;
        }
    }
    state.bullets.retain(|b| b.alive);
}
