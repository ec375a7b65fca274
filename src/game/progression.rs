//! Experience and level-up rules.

use log::info;

use super::inventory::effective_stats;
use super::types::PlayerRecord;

/// Stat growth applied on each level gained.
pub const LEVEL_HEALTH_GROWTH: u32 = 10;
pub const LEVEL_ATTACK_GROWTH: u32 = 2;
pub const LEVEL_DEFENSE_GROWTH: u32 = 1;

/// Experience needed to leave `level`.
pub fn level_threshold(level: u32) -> u64 {
    level as u64 * 100
}

pub fn xp_to_next_level(player: &PlayerRecord) -> u64 {
    level_threshold(player.level).saturating_sub(player.experience)
}

/// Add experience and apply every level-up it pays for. Leftover xp carries into the next
/// level. Returns the number of levels gained.
pub fn grant_experience(player: &mut PlayerRecord, amount: u64) -> u32 {
    player.experience = player.experience.saturating_add(amount);

    let mut gained = 0;
    while player.experience >= level_threshold(player.level) {
        player.experience -= level_threshold(player.level);
        player.level += 1;
        player.max_health += LEVEL_HEALTH_GROWTH;
        player.attack += LEVEL_ATTACK_GROWTH;
        player.defense += LEVEL_DEFENSE_GROWTH;
        gained += 1;
    }

    if gained > 0 {
        player.health = effective_stats(player).max_health;
        info!(
            "{} reached level {} (+{})",
            player.username, player.level, gained
        );
    }
    gained
}
