//! Game state and core simulation types
//!
//! Everything the renderer reads and the tick mutates lives here. The
//! aggregate owns its RNG so a run is reproducible from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::upgrade::UpgradeKind;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Simulation frozen while the player picks an upgrade card
    UpgradeSelection,
    /// Run ended; no further ticks execute
    GameOver,
}

/// Sound-worthy events emitted during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerShoot,
    CardSelect,
    EnemyHit,
    PlayerHit,
    PlayerDeath,
    EnemyDeath,
}

/// Render color tag; the actual palette lives in the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    /// Reserved for the player
    Blue,
    /// Reserved for bosses
    Red,
    Magenta,
    Cyan,
    Yellow,
    Orange,
    Pink,
    Lime,
}

impl ColorTag {
    /// Uniform pick from the neon enemy palette (never the player's blue)
    pub fn random_enemy(rng: &mut Pcg32) -> Self {
        const PALETTE: [ColorTag; 6] = [
            ColorTag::Magenta,
            ColorTag::Cyan,
            ColorTag::Yellow,
            ColorTag::Orange,
            ColorTag::Pink,
            ColorTag::Lime,
        ];
        PALETTE[rng.random_range(0..PALETTE.len())]
    }
}

/// The player avatar
///
/// A singleton per session; combat, movement and upgrades all mutate it.
/// Timestamps are simulation-clock milliseconds; `None` means "never", so
/// the first shot and the first dash are available immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub damage: f32,
    /// Shot cooldown in milliseconds
    pub fire_rate_ms: f32,
    pub last_shot_ms: Option<f64>,
    /// Damage absorption pool, consumed before health
    pub shield: f32,
    /// Shield coverage in radians (display hint)
    pub shield_arc: f32,
    /// One free return from death
    pub revive: bool,
    /// Probability that a shot leaves with doubled damage
    pub crit_chance: f32,
    pub life_steal: f32,
    pub score_multiplier: f32,
    pub dash_cooldown_ms: f32,
    pub last_dash_ms: Option<f64>,
    pub dash_distance: f32,
    /// Muzzle velocity snapshotted into each bullet
    pub bullet_speed: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_level: u32,
    pub xp_multiplier: f32,
    /// Milliseconds of "recently damaged" flash remaining
    pub hit_timer_ms: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            health: PLAYER_HEALTH,
            damage: PLAYER_DAMAGE,
            fire_rate_ms: FIRE_RATE_MS,
            last_shot_ms: None,
            shield: 0.0,
            shield_arc: SHIELD_ARC,
            revive: false,
            crit_chance: 0.0,
            life_steal: 0.0,
            score_multiplier: 1.0,
            dash_cooldown_ms: DASH_COOLDOWN_MS,
            last_dash_ms: None,
            dash_distance: DASH_DISTANCE,
            bullet_speed: BULLET_SPEED,
            level: 1,
            xp: 0,
            xp_to_level: XP_LEVEL_STEP,
            xp_multiplier: 1.0,
            hit_timer_ms: 0.0,
        }
    }
}

/// In-flight dash animation; position interpolates start -> target over
/// a fixed duration, independent of normal movement
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DashState {
    pub active: bool,
    pub start: Vec2,
    pub target: Vec2,
    pub elapsed_ms: f32,
}

/// Enemy stat presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    Normal,
    Fast,
    Small,
    Slow,
    Tank,
}

impl EnemyVariant {
    pub const ALL: [EnemyVariant; 5] = [
        EnemyVariant::Normal,
        EnemyVariant::Fast,
        EnemyVariant::Small,
        EnemyVariant::Slow,
        EnemyVariant::Tank,
    ];

    /// Uniform-random variant pick
    pub fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A hostile entity pursuing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub variant: EnemyVariant,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub color: ColorTag,
    /// Rendered as a square, worth bonus score
    pub is_boss: bool,
    /// Liveness flag; combat passes mark, a compact step sweeps
    pub alive: bool,
}

impl Enemy {
    /// Build a normal enemy for the given wave, then apply variant modifiers
    pub fn new(pos: Vec2, variant: EnemyVariant, wave: u32, color: ColorTag) -> Self {
        let wave_bonus = (wave - 1) as f32;
        let mut radius = ENEMY_RADIUS;
        let mut health = ENEMY_BASE_HEALTH + wave_bonus * ENEMY_HEALTH_PER_WAVE;
        let mut speed = ENEMY_BASE_SPEED + wave_bonus * ENEMY_SPEED_PER_WAVE;
        match variant {
            EnemyVariant::Normal => {}
            EnemyVariant::Fast => {
                speed *= 1.5;
                health *= 0.8;
            }
            EnemyVariant::Small => {
                radius = 10.0;
                health *= 0.7;
            }
            EnemyVariant::Slow => {
                speed *= 0.7;
            }
            EnemyVariant::Tank => {
                radius = 20.0;
                health *= 2.0;
                speed *= 0.8;
            }
        }
        Self {
            pos,
            radius,
            variant,
            health,
            max_health: health,
            speed,
            color,
            is_boss: false,
            alive: true,
        }
    }

    /// Build a boss for the given wave
    pub fn boss(pos: Vec2, wave: u32) -> Self {
        let wave_bonus = (wave - 1) as f32;
        let health = BOSS_BASE_HEALTH + wave_bonus * BOSS_HEALTH_PER_WAVE;
        Self {
            pos,
            radius: BOSS_RADIUS,
            variant: EnemyVariant::Normal,
            health,
            max_health: health,
            speed: BOSS_BASE_SPEED + wave_bonus * BOSS_SPEED_PER_WAVE,
            color: ColorTag::Red,
            is_boss: true,
            alive: true,
        }
    }
}

/// A projectile; damage is frozen at fire time and never re-reads the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub alive: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, damage: f32) -> Self {
        Self {
            pos,
            vel,
            radius: BULLET_RADIUS,
            damage,
            alive: true,
        }
    }
}

/// A cosmetic death spark; never collides with anything
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Remaining life in ticks
    pub life: f32,
    pub color: ColorTag,
}

impl Particle {
    /// A single randomized burst spark at `pos`
    pub fn burst(rng: &mut Pcg32, pos: Vec2, color: ColorTag) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(1.0..3.0);
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            radius: rng.random_range(2.0..4.0),
            life: rng.random_range(50.0..100.0),
            color,
        }
    }
}

/// Wave progression bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave number, starts at 1
    pub current: u32,
    /// Normal-enemy quota for this wave
    pub total: u32,
    /// Normal enemies spawned so far this wave
    pub spawned: u32,
    pub spawn_interval_ms: f32,
    pub last_spawn_ms: f64,
    /// Designated wave on which a single boss appears
    pub boss_wave: u32,
    /// Set once the boss for the current cycle has spawned
    pub boss_spawned: bool,
}

impl WaveState {
    pub fn new(rng: &mut Pcg32) -> Self {
        Self {
            current: 1,
            total: WAVE_QUOTA_STEP,
            spawned: 0,
            spawn_interval_ms: Self::interval_for(1),
            last_spawn_ms: 0.0,
            boss_wave: 1 + rng.random_range(3..=5),
            boss_spawned: false,
        }
    }

    /// Per-enemy spawn interval for a wave, floored so late waves stay sane
    pub fn interval_for(wave: u32) -> f32 {
        (SPAWN_INTERVAL_BASE_MS - (wave - 1) as f32 * SPAWN_INTERVAL_STEP_MS)
            .max(SPAWN_INTERVAL_FLOOR_MS)
    }

    /// A wave is complete only when the quota was fully spawned AND the
    /// enemy pool has been emptied
    pub fn is_complete(&self, enemies_remaining: usize) -> bool {
        self.spawned >= self.total && enemies_remaining == 0
    }

    /// Advance to the next wave; reschedules the boss window if a boss
    /// spawned during the completed cycle
    pub fn advance(&mut self, rng: &mut Pcg32) {
        self.current += 1;
        self.total = self.current * WAVE_QUOTA_STEP;
        self.spawned = 0;
        self.spawn_interval_ms = Self::interval_for(self.current);
        if self.boss_spawned {
            self.boss_wave = self.current + rng.random_range(3..=5);
            self.boss_spawned = false;
        }
    }
}

/// Complete session state
///
/// One owned aggregate instead of free globals: every component function
/// takes this by reference, which keeps teardown trivial and lets multiple
/// sessions coexist.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Simulation clock in milliseconds, advanced by each tick's delta
    pub time_ms: f64,
    /// Viewport dimensions; drives the spawn ring and bullet range
    pub view: Vec2,
    pub player: Player,
    pub dash: DashState,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub wave: WaveState,
    pub kill_count: u32,
    pub boss_kill_count: u32,
    /// Recomputed every tick from kill counters and the score multiplier
    pub score: f64,
    /// The 3 cards on offer while in `UpgradeSelection`
    pub pending_offer: Vec<UpgradeKind>,
    /// Per-tick sound events, drained by the session
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh session state from a seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let wave = WaveState::new(&mut rng);
        Self {
            seed,
            phase: GamePhase::Running,
            time_ms: 0.0,
            view: Vec2::new(DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT),
            player: Player::default(),
            dash: DashState::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            wave,
            kill_count: 0,
            boss_kill_count: 0,
            score: 0.0,
            pending_offer: Vec::new(),
            events: Vec::new(),
            rng,
        }
    }

    /// Report the host viewport size (spawn ring and bullet range follow it)
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.view = Vec2::new(width, height);
    }

    /// Radial distance at which enemies appear, just off-screen
    pub fn spawn_distance(&self) -> f32 {
        self.view.max_element() / 2.0 + SPAWN_MARGIN
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this tick's sound events (session forwards them to the sink)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Score formula: boss kills carry a flat bonus, then the multiplier
    pub fn recompute_score(&mut self) {
        let kills = self.kill_count + self.boss_kill_count * BOSS_KILL_BONUS;
        self.score = kills as f64 * self.player.score_multiplier as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults() {
        let p = Player::default();
        assert_eq!(p.health, PLAYER_HEALTH);
        assert_eq!(p.fire_rate_ms, FIRE_RATE_MS);
        assert_eq!(p.xp_to_level, XP_LEVEL_STEP);
        assert_eq!(p.level, 1);
        assert!(p.last_shot_ms.is_none());
        assert!(p.last_dash_ms.is_none());
        assert!(!p.revive);
    }

    #[test]
    fn test_enemy_color_never_player_blue() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let color = ColorTag::random_enemy(&mut rng);
            assert_ne!(color, ColorTag::Blue);
            assert_ne!(color, ColorTag::Red);
        }
    }

    #[test]
    fn test_initial_boss_window() {
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let wave = WaveState::new(&mut rng);
            assert!((4..=6).contains(&wave.boss_wave), "boss wave {}", wave.boss_wave);
        }
    }

    #[test]
    fn test_spawn_interval_floor() {
        assert_eq!(WaveState::interval_for(1), 2000.0);
        assert_eq!(WaveState::interval_for(2), 1850.0);
        // 2000 - 11*150 = 350, 2000 - 12*150 = 200 -> floored
        assert_eq!(WaveState::interval_for(12), 350.0);
        assert_eq!(WaveState::interval_for(13), 300.0);
        assert_eq!(WaveState::interval_for(100), 300.0);
    }

    #[test]
    fn test_wave_completion_gating() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut wave = WaveState::new(&mut rng);
        wave.spawned = wave.total - 1;
        assert!(!wave.is_complete(0), "quota unmet must not complete");
        wave.spawned = wave.total;
        assert!(!wave.is_complete(3), "live enemies must not complete");
        assert!(wave.is_complete(0));
    }

    #[test]
    fn test_wave_advance_recomputes_quota_and_interval() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut wave = WaveState::new(&mut rng);
        wave.spawned = wave.total;
        wave.advance(&mut rng);
        assert_eq!(wave.current, 2);
        assert_eq!(wave.total, 12);
        assert_eq!(wave.spawned, 0);
        assert_eq!(wave.spawn_interval_ms, 1850.0);
    }

    #[test]
    fn test_boss_reschedule_only_after_boss_cycle() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut wave = WaveState::new(&mut rng);
        let original_boss_wave = wave.boss_wave;

        // No boss spawned: the designated wave stays put
        wave.advance(&mut rng);
        assert_eq!(wave.boss_wave, original_boss_wave);

        // Boss spawned this cycle: window moves 3..=5 waves ahead
        wave.boss_spawned = true;
        wave.advance(&mut rng);
        let next = wave.boss_wave;
        assert!(!wave.boss_spawned);
        assert!((wave.current + 3..=wave.current + 5).contains(&next));
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(42);
        state.push_event(GameEvent::PlayerShoot);
        state.push_event(GameEvent::EnemyHit);
        let drained = state.drain_events();
        assert_eq!(drained.len(), 2);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_spawn_distance_tracks_larger_dimension() {
        let mut state = GameState::new(42);
        state.set_viewport(800.0, 600.0);
        assert_eq!(state.spawn_distance(), 450.0);
        state.set_viewport(600.0, 1000.0);
        assert_eq!(state.spawn_distance(), 550.0);
    }
}
