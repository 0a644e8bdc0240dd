//! Upgrade catalog and progression state machine
//!
//! Level-ups and wave completions both funnel into the same 3-card offer.
//! The simulation freezes in `UpgradeSelection` until the host reports a
//! choice; applying a card is a plain match dispatch over a closed enum,
//! so every effect is a pure player mutation.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::consts::*;

/// Rarity tier; the tier alone determines selection weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn weight(self) -> u32 {
        match self {
            Rarity::Common => 50,
            Rarity::Uncommon => 30,
            Rarity::Rare => 15,
            Rarity::Epic => 5,
            Rarity::Legendary => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// The full set of upgrade cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Damage,
    FireRate,
    BulletSpeed,
    MoveSpeed,
    ShieldCoverage,
    DashDistance,
    Health,
    PlayerSize,
    DashCooldown,
    ScoreMultiplier,
    ShieldBoost,
    LifeSteal,
    XpBoost,
    CriticalStrike,
    Revive,
}

/// Static catalog, immutable at runtime; order is the weighted-draw
/// tie-break
pub const CATALOG: [UpgradeKind; 15] = [
    UpgradeKind::Damage,
    UpgradeKind::FireRate,
    UpgradeKind::BulletSpeed,
    UpgradeKind::MoveSpeed,
    UpgradeKind::ShieldCoverage,
    UpgradeKind::DashDistance,
    UpgradeKind::Health,
    UpgradeKind::PlayerSize,
    UpgradeKind::DashCooldown,
    UpgradeKind::ScoreMultiplier,
    UpgradeKind::ShieldBoost,
    UpgradeKind::LifeSteal,
    UpgradeKind::XpBoost,
    UpgradeKind::CriticalStrike,
    UpgradeKind::Revive,
];

impl UpgradeKind {
    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Increase Damage",
            UpgradeKind::FireRate => "Increase Fire Rate",
            UpgradeKind::BulletSpeed => "Increase Bullet Speed",
            UpgradeKind::MoveSpeed => "Increase Speed",
            UpgradeKind::ShieldCoverage => "Increase Shield Coverage",
            UpgradeKind::DashDistance => "Increase Dash Distance",
            UpgradeKind::Health => "Increase Health",
            UpgradeKind::PlayerSize => "Increase Player Size",
            UpgradeKind::DashCooldown => "Reduce Dash Cooldown",
            UpgradeKind::ScoreMultiplier => "Score Multiplier",
            UpgradeKind::ShieldBoost => "Shield Boost",
            UpgradeKind::LifeSteal => "Life Steal",
            UpgradeKind::XpBoost => "XP Boost",
            UpgradeKind::CriticalStrike => "Critical Strike",
            UpgradeKind::Revive => "Revive",
        }
    }

    pub fn rarity(self) -> Rarity {
        match self {
            UpgradeKind::Damage
            | UpgradeKind::FireRate
            | UpgradeKind::BulletSpeed
            | UpgradeKind::MoveSpeed => Rarity::Common,
            UpgradeKind::ShieldCoverage | UpgradeKind::DashDistance => Rarity::Uncommon,
            UpgradeKind::Health
            | UpgradeKind::PlayerSize
            | UpgradeKind::DashCooldown
            | UpgradeKind::ScoreMultiplier => Rarity::Rare,
            UpgradeKind::ShieldBoost | UpgradeKind::LifeSteal | UpgradeKind::XpBoost => {
                Rarity::Epic
            }
            UpgradeKind::CriticalStrike | UpgradeKind::Revive => Rarity::Legendary,
        }
    }

    pub fn weight(self) -> u32 {
        self.rarity().weight()
    }

    /// Apply this card's effect to the player, exactly once per selection
    pub fn apply(self, player: &mut Player) {
        match self {
            UpgradeKind::Damage => player.damage += 5.0,
            UpgradeKind::FireRate => {
                player.fire_rate_ms = (player.fire_rate_ms - 100.0).max(FIRE_RATE_FLOOR_MS);
            }
            UpgradeKind::BulletSpeed => player.bullet_speed += 1.0,
            UpgradeKind::MoveSpeed => player.speed += 1.0,
            UpgradeKind::ShieldCoverage => {
                // +10% of a full circle, capped at a quarter circle
                let grown = player.shield_arc + 0.1 * std::f32::consts::TAU;
                player.shield_arc = grown.min(std::f32::consts::FRAC_PI_2);
            }
            UpgradeKind::DashDistance => player.dash_distance += 50.0,
            UpgradeKind::Health => player.health += 20.0,
            UpgradeKind::PlayerSize => player.radius += 2.0,
            UpgradeKind::DashCooldown => {
                player.dash_cooldown_ms =
                    (player.dash_cooldown_ms - 200.0).max(DASH_COOLDOWN_FLOOR_MS);
            }
            UpgradeKind::ScoreMultiplier => player.score_multiplier += 0.5,
            UpgradeKind::ShieldBoost => player.shield += 30.0,
            UpgradeKind::LifeSteal => player.life_steal += 0.05,
            UpgradeKind::XpBoost => player.xp_multiplier += 0.5,
            UpgradeKind::CriticalStrike => player.crit_chance += 0.1,
            UpgradeKind::Revive => player.revive = true,
        }
    }
}

/// Classic cumulative-weight selection: draw in [0, total), walk the
/// catalog subtracting weights, select where the running total goes
/// non-positive. Catalog order breaks boundary ties; the final entry is
/// the fallthrough.
pub fn weighted_draw(rng: &mut Pcg32) -> UpgradeKind {
    let total: u32 = CATALOG.iter().map(|u| u.weight()).sum();
    let mut roll = rng.random_range(0.0..total as f32);
    for upgrade in CATALOG {
        roll -= upgrade.weight() as f32;
        if roll <= 0.0 {
            return upgrade;
        }
    }
    CATALOG[CATALOG.len() - 1]
}

/// Present 3 distinct cards and freeze the simulation
///
/// Distinctness via rejection: redraw from the full weighted distribution
/// whenever a duplicate comes up.
pub fn offer_upgrades(state: &mut GameState) {
    let mut options = Vec::with_capacity(3);
    while options.len() < 3 {
        let pick = weighted_draw(&mut state.rng);
        if !options.contains(&pick) {
            options.push(pick);
        }
    }
    state.pending_offer = options;
    state.phase = GamePhase::UpgradeSelection;
}

/// Host callback: the player picked card `index` from the pending offer
///
/// Out-of-range picks (or picks outside `UpgradeSelection`) are ignored
/// and leave the session paused. Returns whether the pick was accepted.
pub fn choose_upgrade(state: &mut GameState, index: usize) -> bool {
    if state.phase != GamePhase::UpgradeSelection {
        return false;
    }
    let Some(kind) = state.pending_offer.get(index).copied() else {
        return false;
    };
    kind.apply(&mut state.player);
    state.pending_offer.clear();
    state.phase = GamePhase::Running;
    state.push_event(GameEvent::CardSelect);
    log::debug!("upgrade chosen: {}", kind.name());
    true
}

/// Add XP and run the threshold check
pub fn award_xp(state: &mut GameState, amount: u32) {
    state.player.xp += amount;
    check_level_up(state);
}

/// One level per threshold crossing; remainder carries forward and the
/// next threshold becomes `level * 100`
fn check_level_up(state: &mut GameState) {
    if state.player.xp >= state.player.xp_to_level {
        state.player.level += 1;
        state.player.xp -= state.player.xp_to_level;
        state.player.xp_to_level = state.player.level * XP_LEVEL_STEP;
        log::info!("level up -> {}", state.player.level);
        offer_upgrades(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_shape() {
        assert!(CATALOG.len() >= 3);
        assert_eq!(CATALOG.len(), 15);
        let total: u32 = CATALOG.iter().map(|u| u.weight()).sum();
        // 4 common + 2 uncommon + 4 rare + 3 epic + 2 legendary
        assert_eq!(total, 4 * 50 + 2 * 30 + 4 * 15 + 3 * 5 + 2 * 2);
    }

    #[test]
    fn test_weighted_draw_converges_to_weights() {
        let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
        let total: u32 = CATALOG.iter().map(|u| u.weight()).sum();
        let draws = 200_000;

        let mut counts = std::collections::HashMap::new();
        for _ in 0..draws {
            *counts.entry(weighted_draw(&mut rng)).or_insert(0u32) += 1;
        }

        for upgrade in CATALOG {
            let expected = upgrade.weight() as f64 / total as f64;
            let observed = *counts.get(&upgrade).unwrap_or(&0) as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "{}: observed {observed:.4}, expected {expected:.4}",
                upgrade.name()
            );
        }
    }

    #[test]
    fn test_offer_is_three_distinct_and_pauses() {
        let mut state = GameState::new(99);
        offer_upgrades(&mut state);
        assert_eq!(state.phase, GamePhase::UpgradeSelection);
        assert_eq!(state.pending_offer.len(), 3);
        let offer = state.pending_offer.clone();
        assert_ne!(offer[0], offer[1]);
        assert_ne!(offer[0], offer[2]);
        assert_ne!(offer[1], offer[2]);
    }

    #[test]
    fn test_choose_applies_once_and_resumes() {
        let mut state = GameState::new(99);
        state.pending_offer = vec![UpgradeKind::Damage, UpgradeKind::Health, UpgradeKind::Revive];
        state.phase = GamePhase::UpgradeSelection;

        let before = state.player.damage;
        assert!(choose_upgrade(&mut state, 0));
        assert_eq!(state.player.damage, before + 5.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.pending_offer.is_empty());
        assert!(state.events.contains(&GameEvent::CardSelect));
    }

    #[test]
    fn test_choose_out_of_range_keeps_pause() {
        let mut state = GameState::new(99);
        state.pending_offer = vec![UpgradeKind::Damage, UpgradeKind::Health, UpgradeKind::Revive];
        state.phase = GamePhase::UpgradeSelection;

        assert!(!choose_upgrade(&mut state, 7));
        assert_eq!(state.phase, GamePhase::UpgradeSelection);
        assert_eq!(state.pending_offer.len(), 3);

        // And choosing while running is a no-op too
        state.phase = GamePhase::Running;
        state.pending_offer.clear();
        assert!(!choose_upgrade(&mut state, 0));
    }

    #[test]
    fn test_effect_caps() {
        let mut player = Player::default();
        for _ in 0..10 {
            UpgradeKind::FireRate.apply(&mut player);
        }
        assert_eq!(player.fire_rate_ms, FIRE_RATE_FLOOR_MS);

        for _ in 0..10 {
            UpgradeKind::DashCooldown.apply(&mut player);
        }
        assert_eq!(player.dash_cooldown_ms, DASH_COOLDOWN_FLOOR_MS);

        for _ in 0..10 {
            UpgradeKind::ShieldCoverage.apply(&mut player);
        }
        assert!(player.shield_arc <= std::f32::consts::FRAC_PI_2 + 1e-6);
    }

    #[test]
    fn test_revive_and_stat_effects() {
        let mut player = Player::default();
        UpgradeKind::Revive.apply(&mut player);
        assert!(player.revive);
        UpgradeKind::ShieldBoost.apply(&mut player);
        assert_eq!(player.shield, 30.0);
        UpgradeKind::CriticalStrike.apply(&mut player);
        assert!((player.crit_chance - 0.1).abs() < 1e-6);
        UpgradeKind::BulletSpeed.apply(&mut player);
        assert_eq!(player.bullet_speed, 6.0);
    }

    #[test]
    fn test_xp_threshold_crossing_exactness() {
        let mut state = GameState::new(5);

        // Exactly the threshold: one level, zero remainder, next threshold 200
        award_xp(&mut state, 100);
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.xp, 0);
        assert_eq!(state.player.xp_to_level, 200);
        assert_eq!(state.phase, GamePhase::UpgradeSelection);
        choose_upgrade(&mut state, 0);

        // Overshoot carries the remainder forward
        award_xp(&mut state, 250);
        assert_eq!(state.player.level, 3);
        assert_eq!(state.player.xp, 50);
        assert_eq!(state.player.xp_to_level, 300);
    }

    #[test]
    fn test_single_level_per_award() {
        let mut state = GameState::new(5);
        // A huge award still only crosses one threshold per check
        award_xp(&mut state, 1000);
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.xp, 900);
    }

    proptest! {
        #[test]
        fn prop_offer_never_duplicates(seed in any::<u64>()) {
            let mut state = GameState::new(seed);
            offer_upgrades(&mut state);
            let offer = &state.pending_offer;
            prop_assert_eq!(offer.len(), 3);
            prop_assert!(offer[0] != offer[1] && offer[0] != offer[2] && offer[1] != offer[2]);
        }

        #[test]
        fn prop_weighted_draw_in_catalog(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let pick = weighted_draw(&mut rng);
            prop_assert!(CATALOG.contains(&pick));
        }
    }
}
