//! Battles against generated mobs and player-versus-player duels.

use chrono::Utc;
use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::game::catalog::Catalog;
use crate::game::engine::Game;
use crate::game::errors::GameError;
use crate::game::inventory::{self, effective_stats, EffectiveStats};
use crate::game::progression::grant_experience;
use crate::game::storage::StoreBatch;
use crate::game::types::{Currency, InventoryItem, Mob, MobReward, PlayerRecord, Rarity};

const MOB_NAMES: &[&str] = &[
    "Slime",
    "Goblin",
    "Skeleton",
    "Cave Rat",
    "Wolf",
    "Bandit",
    "Giant Spider",
    "Zombie",
    "Orc Raider",
];

const BOSS_NAMES: &[&str] = &[
    "Dragon Lord",
    "Lich King",
    "Troll Chieftain",
    "Demon Knight",
    "Ancient Hydra",
];

fn choose<'a, R: Rng + ?Sized>(rng: &mut R, opts: &[&'a str]) -> &'a str {
    let i = rng.gen_range(0..opts.len());
    opts[i]
}

/// Damage dealt by one strike. Always at least 1.
pub fn damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense).max(1)
}

/// Roll an opponent within one level of the player.
pub fn generate_mob<R: Rng + ?Sized>(player_level: u32, rng: &mut R, config: &GameConfig) -> Mob {
    let low = player_level.saturating_sub(1).max(1);
    let high = player_level.saturating_add(1).max(low);
    let level = rng.gen_range(low..=high);
    let is_boss = rng.gen_bool(config.boss_chance);

    let mut max_health = 40 + 15 * level;
    let mut attack = 4 + 3 * level;
    let defense = 1 + 2 * level;
    let mut reward = MobReward {
        experience: 15 + 10 * level as u64,
        coins: 8 + 6 * level as u64,
        gems: 0,
    };

    let name = if is_boss {
        max_health *= 2;
        attack = attack * 3 / 2;
        reward.experience *= 3;
        reward.coins *= 3;
        reward.gems = level as u64;
        choose(rng, BOSS_NAMES).to_string()
    } else {
        choose(rng, MOB_NAMES).to_string()
    };

    Mob {
        name,
        level,
        is_boss,
        health: max_health,
        max_health,
        attack,
        defense,
        reward,
    }
}

// ============================================================================
// Battle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Ongoing,
    Victory,
    Defeat,
}

/// What happened in one exchange of blows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub player_damage: u32,
    /// `None` when the mob died first or a boss skipped its counter.
    pub mob_damage: Option<u32>,
    pub outcome: BattleOutcome,
}

/// An in-progress fight. Lives only in the session; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Battle {
    pub mob: Mob,
    pub rounds: u32,
}

impl Battle {
    pub fn new(mob: Mob) -> Self {
        Self { mob, rounds: 0 }
    }

    /// Player strikes, then the mob counters if it survived.
    pub fn attack<R: Rng + ?Sized>(
        &mut self,
        player: &mut PlayerRecord,
        rng: &mut R,
        config: &GameConfig,
    ) -> RoundReport {
        let stats = effective_stats(player);
        self.rounds += 1;

        let player_damage = damage(stats.attack, self.mob.defense);
        self.mob.health = self.mob.health.saturating_sub(player_damage);
        if !self.mob.is_alive() {
            return RoundReport {
                player_damage,
                mob_damage: None,
                outcome: BattleOutcome::Victory,
            };
        }

        let skipped = self.mob.is_boss && rng.gen_bool(config.boss_counter_skip_chance);
        let mob_damage = if skipped {
            None
        } else {
            let hit = damage(self.mob.attack, stats.defense);
            player.health = player.health.saturating_sub(hit);
            Some(hit)
        };

        let outcome = if player.health == 0 {
            BattleOutcome::Defeat
        } else {
            BattleOutcome::Ongoing
        };
        RoundReport {
            player_damage,
            mob_damage,
            outcome,
        }
    }

    /// Abandon the fight. No rewards, no penalty.
    pub fn flee(self) -> Mob {
        self.mob
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VictoryReport {
    pub experience: u64,
    pub coins: u64,
    pub gems: u64,
    pub levels_gained: u32,
    pub drop: Option<String>,
}

/// Pay out a defeated mob's reward.
pub fn apply_victory<R: Rng + ?Sized>(
    player: &mut PlayerRecord,
    mob: &Mob,
    catalog: &Catalog,
    rng: &mut R,
    config: &GameConfig,
) -> VictoryReport {
    let mut coins = mob.reward.coins;
    if player.is_vip(Utc::now()) {
        coins = coins.saturating_mul(config.vip_coin_multiplier);
    }
    player.wallet.credit(Currency::Coins, coins);
    player.wallet.credit(Currency::Gems, mob.reward.gems);
    let levels_gained = grant_experience(player, mob.reward.experience);

    let score = if mob.is_boss {
        mob.level as u64 * 3
    } else {
        mob.level as u64
    };
    player.weekly_score = player.weekly_score.saturating_add(score);

    let mut drop = None;
    if mob.is_boss && rng.gen_bool(config.boss_drop_chance) {
        let pool = catalog.at_least(Rarity::Epic);
        if !pool.is_empty() {
            let item = pool[rng.gen_range(0..pool.len())];
            inventory::add_item(player, InventoryItem::from_shop_item(item, 1));
            drop = Some(item.name.clone());
        }
    }

    VictoryReport {
        experience: mob.reward.experience,
        coins,
        gems: mob.reward.gems,
        levels_gained,
        drop,
    }
}

/// Restore health and take the flat coin penalty. Returns the coins actually lost.
pub fn apply_defeat(player: &mut PlayerRecord, config: &GameConfig) -> u64 {
    player.health = effective_stats(player).max_health;
    player.wallet.deduct_coins_saturating(config.defeat_penalty)
}

// ============================================================================
// Duels
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelSide {
    Challenger,
    Defender,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelResult {
    pub winner: DuelSide,
    pub rounds: u32,
    pub challenger_health: u32,
    pub defender_health: u32,
}

/// Simulate a duel on copies of both fighters' effective stats. Both start at full health;
/// the challenger strikes first. Stored records are untouched.
pub fn resolve_duel(challenger: &EffectiveStats, defender: &EffectiveStats, max_rounds: u32) -> DuelResult {
    let mut c_hp = challenger.max_health;
    let mut d_hp = defender.max_health;
    let mut rounds = 0;

    while rounds < max_rounds {
        rounds += 1;
        d_hp = d_hp.saturating_sub(damage(challenger.attack, defender.defense));
        if d_hp == 0 {
            return DuelResult {
                winner: DuelSide::Challenger,
                rounds,
                challenger_health: c_hp,
                defender_health: 0,
            };
        }
        c_hp = c_hp.saturating_sub(damage(defender.attack, challenger.defense));
        if c_hp == 0 {
            return DuelResult {
                winner: DuelSide::Defender,
                rounds,
                challenger_health: 0,
                defender_health: d_hp,
            };
        }
    }

    // round cap: higher remaining health fraction wins, ties go to the defender
    let c_frac = c_hp as u64 * defender.max_health.max(1) as u64;
    let d_frac = d_hp as u64 * challenger.max_health.max(1) as u64;
    let winner = if c_frac > d_frac {
        DuelSide::Challenger
    } else {
        DuelSide::Defender
    };
    DuelResult {
        winner,
        rounds,
        challenger_health: c_hp,
        defender_health: d_hp,
    }
}

/// Update PvP counters and weekly score after a duel.
pub fn apply_duel_result(winner: &mut PlayerRecord, loser: &mut PlayerRecord, config: &GameConfig) {
    winner.pvp_wins = winner.pvp_wins.saturating_add(1);
    winner.weekly_score = winner.weekly_score.saturating_add(config.duel_score);
    loser.pvp_losses = loser.pvp_losses.saturating_add(1);
}

// ============================================================================
// Game integration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackOutcome {
    Ongoing,
    Victory(VictoryReport),
    Defeat { coins_lost: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub round: RoundReport,
    pub outcome: AttackOutcome,
    pub mob_health: u32,
    pub player_health: u32,
}

impl<R: Rng> Game<R> {
    /// Generate a mob for the player's level. The caller keeps the returned battle.
    pub fn start_battle(&mut self, username: &str) -> Result<Battle, GameError> {
        let player = self.store.get_player(username)?;
        let mob = generate_mob(player.level, &mut self.rng, &self.config.game);
        debug!(
            "{} encounters {} (L{}{})",
            player.username,
            mob.name,
            mob.level,
            if mob.is_boss { ", boss" } else { "" }
        );
        Ok(Battle::new(mob))
    }

    /// Resolve one round and persist the player's health (and rewards or penalty).
    pub fn attack(&mut self, username: &str, battle: &mut Battle) -> Result<AttackReport, GameError> {
        let mut player = self.store.get_player(username)?;
        let round = battle.attack(&mut player, &mut self.rng, &self.config.game);

        let outcome = match round.outcome {
            BattleOutcome::Ongoing => AttackOutcome::Ongoing,
            BattleOutcome::Victory => {
                let report = apply_victory(
                    &mut player,
                    &battle.mob,
                    &self.catalog,
                    &mut self.rng,
                    &self.config.game,
                );
                info!(
                    "{} defeated {} (+{} xp, +{} coins, +{} gems)",
                    player.username, battle.mob.name, report.experience, report.coins, report.gems
                );
                self.audit(&format!(
                    "victory {} {} coins={} gems={} drop={}",
                    player.username,
                    battle.mob.name,
                    report.coins,
                    report.gems,
                    report.drop.as_deref().unwrap_or("-")
                ));
                AttackOutcome::Victory(report)
            }
            BattleOutcome::Defeat => {
                let coins_lost = apply_defeat(&mut player, &self.config.game);
                info!(
                    "{} was defeated by {} (-{} coins)",
                    player.username, battle.mob.name, coins_lost
                );
                self.audit(&format!("defeat {} coins_lost={}", player.username, coins_lost));
                AttackOutcome::Defeat { coins_lost }
            }
        };

        let player_health = player.health;
        self.store.put_player(player)?;
        Ok(AttackReport {
            round,
            outcome,
            mob_health: battle.mob.health,
            player_health,
        })
    }

    /// Challenge another player. Both records get their PvP counters updated in one batch.
    pub fn duel(&mut self, challenger: &str, target: &str) -> Result<(DuelResult, String), GameError> {
        let mut attacker = self.store.get_player(challenger)?;
        if attacker.username.eq_ignore_ascii_case(target.trim()) {
            return Err(GameError::InvalidCommand("You cannot duel yourself".to_string()));
        }
        let mut defender = self
            .store
            .get_player(target)
            .map_err(|_| GameError::NotFound(format!("player '{}'", target.trim())))?;

        let result = resolve_duel(
            &effective_stats(&attacker),
            &effective_stats(&defender),
            self.config.game.max_duel_rounds,
        );
        let (winner_name, loser_name) = match result.winner {
            DuelSide::Challenger => {
                apply_duel_result(&mut attacker, &mut defender, &self.config.game);
                (attacker.display_name.clone(), defender.display_name.clone())
            }
            DuelSide::Defender => {
                apply_duel_result(&mut defender, &mut attacker, &self.config.game);
                (defender.display_name.clone(), attacker.display_name.clone())
            }
        };

        let mut batch = StoreBatch::new();
        batch.put_player(attacker)?;
        batch.put_player(defender)?;
        self.store.apply(batch)?;

        info!(
            "duel: {} beat {} in {} rounds",
            winner_name, loser_name, result.rounds
        );
        self.audit(&format!("duel winner={} loser={}", winner_name, loser_name));
        let summary = format!(
            "⚔️ {} defeated {} in a duel ({} rounds)",
            winner_name, loser_name, result.rounds
        );
        Ok((result, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Race, Wallet};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    fn player() -> PlayerRecord {
        PlayerRecord::new("hero", "", Race::Human, Wallet::new(100, 10, 0))
    }

    fn mob(level: u32, is_boss: bool) -> Mob {
        Mob {
            name: "Test Mob".to_string(),
            level,
            is_boss,
            health: 30,
            max_health: 30,
            attack: 12,
            defense: 3,
            reward: MobReward {
                experience: 40,
                coins: 20,
                gems: if is_boss { level as u64 } else { 0 },
            },
        }
    }

    #[test]
    fn damage_has_floor_of_one() {
        assert_eq!(damage(10, 3), 7);
        assert_eq!(damage(3, 10), 1);
        assert_eq!(damage(5, 5), 1);
    }

    #[test]
    fn mob_level_stays_within_one_of_player() {
        let mut rng = StdRng::seed_from_u64(7);
        let cfg = config();
        for _ in 0..200 {
            let m = generate_mob(5, &mut rng, &cfg);
            assert!((4..=6).contains(&m.level));
            assert_eq!(m.health, m.max_health);
        }
        for _ in 0..50 {
            assert!(generate_mob(1, &mut rng, &cfg).level <= 2);
            assert!(generate_mob(1, &mut rng, &cfg).level >= 1);
        }
    }

    #[test]
    fn boss_scaling() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cfg = config();
        cfg.boss_chance = 1.0;
        let m = generate_mob(3, &mut rng, &cfg);
        assert!(m.is_boss);
        let l = m.level;
        assert_eq!(m.max_health, (40 + 15 * l) * 2);
        assert_eq!(m.attack, (4 + 3 * l) * 3 / 2);
        assert_eq!(m.defense, 1 + 2 * l);
        assert_eq!(m.reward.experience, (15 + 10 * l as u64) * 3);
        assert_eq!(m.reward.coins, (8 + 6 * l as u64) * 3);
        assert_eq!(m.reward.gems, l as u64);
        assert!(BOSS_NAMES.contains(&m.name.as_str()));

        cfg.boss_chance = 0.0;
        let m = generate_mob(3, &mut rng, &cfg);
        assert!(!m.is_boss);
        assert_eq!(m.reward.gems, 0);
    }

    #[test]
    fn attack_reduces_mob_health_by_exact_damage() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = config();
        let mut p = player();
        let mut battle = Battle::new(mob(1, false));

        let report = battle.attack(&mut p, &mut rng, &cfg);
        assert_eq!(report.player_damage, damage(p.attack, 3));
        assert_eq!(battle.mob.health, 30 - report.player_damage);
        assert_eq!(report.mob_damage, Some(damage(12, p.defense)));
        assert_eq!(p.health, p.max_health - damage(12, p.defense));
        assert_eq!(report.outcome, BattleOutcome::Ongoing);
    }

    #[test]
    fn battle_ends_when_mob_dies_without_counter() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = config();
        let mut p = player();
        let mut m = mob(1, false);
        m.health = 2;
        let mut battle = Battle::new(m);
        let report = battle.attack(&mut p, &mut rng, &cfg);
        assert_eq!(report.outcome, BattleOutcome::Victory);
        assert_eq!(report.mob_damage, None);
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn defeat_detected_when_player_health_hits_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = config();
        let mut p = player();
        p.health = 1;
        let mut battle = Battle::new(mob(1, false));
        let report = battle.attack(&mut p, &mut rng, &cfg);
        assert_eq!(report.outcome, BattleOutcome::Defeat);
        assert_eq!(p.health, 0);

        let lost = apply_defeat(&mut p, &cfg);
        assert_eq!(lost, 50);
        assert_eq!(p.wallet.coins, 50);
        assert_eq!(p.health, p.max_health);

        p.wallet.coins = 20;
        assert_eq!(apply_defeat(&mut p, &cfg), 20);
        assert_eq!(p.wallet.coins, 0);
    }

    #[test]
    fn boss_counter_can_always_be_skipped() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut cfg = config();
        cfg.boss_counter_skip_chance = 1.0;
        let mut p = player();
        let mut battle = Battle::new(mob(2, true));
        let report = battle.attack(&mut p, &mut rng, &cfg);
        assert_eq!(report.mob_damage, None);
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn victory_pays_rewards_and_score() {
        let mut rng = StdRng::seed_from_u64(11);
        let cfg = config();
        let catalog = Catalog::load_embedded().unwrap();
        let mut p = player();

        let report = apply_victory(&mut p, &mob(2, false), &catalog, &mut rng, &cfg);
        assert_eq!(report.coins, 20);
        assert_eq!(p.wallet.coins, 120);
        assert_eq!(p.experience, 40);
        assert_eq!(p.weekly_score, 2);
        assert!(report.drop.is_none());
    }

    #[test]
    fn vip_multiplies_coins_and_boss_triples_score() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut cfg = config();
        cfg.boss_drop_chance = 1.0;
        let catalog = Catalog::load_embedded().unwrap();
        let mut p = player();
        p.extend_vip(30, Utc::now());

        let report = apply_victory(&mut p, &mob(4, true), &catalog, &mut rng, &cfg);
        assert_eq!(report.coins, 40);
        assert_eq!(p.wallet.gems, 14);
        assert_eq!(p.weekly_score, 12);
        let dropped = report.drop.expect("boss drop");
        let entry = p.inventory.iter().find(|i| i.name == dropped).unwrap();
        assert!(entry.rarity >= Rarity::Epic);
    }

    #[test]
    fn stronger_duelist_wins() {
        let strong = EffectiveStats {
            attack: 30,
            defense: 10,
            max_health: 150,
        };
        let weak = EffectiveStats {
            attack: 10,
            defense: 5,
            max_health: 100,
        };
        let result = resolve_duel(&strong, &weak, 200);
        assert_eq!(result.winner, DuelSide::Challenger);
        assert_eq!(result.defender_health, 0);

        let result = resolve_duel(&weak, &strong, 200);
        assert_eq!(result.winner, DuelSide::Defender);
    }

    #[test]
    fn round_cap_ties_go_to_defender() {
        // both sides deal 1 damage per round
        let tank = EffectiveStats {
            attack: 1,
            defense: 50,
            max_health: 1000,
        };
        let result = resolve_duel(&tank, &tank, 10);
        assert_eq!(result.rounds, 10);
        assert_eq!(result.challenger_health, 990);
        assert_eq!(result.defender_health, 990);
        assert_eq!(result.winner, DuelSide::Defender);
    }

    #[test]
    fn duel_counters() {
        let cfg = config();
        let mut a = player();
        let mut b = PlayerRecord::new("rival", "", Race::Orc, Wallet::default());
        apply_duel_result(&mut a, &mut b, &cfg);
        assert_eq!((a.pvp_wins, a.pvp_losses, a.weekly_score), (1, 0, 10));
        assert_eq!((b.pvp_wins, b.pvp_losses, b.weekly_score), (0, 1, 0));
    }
}
