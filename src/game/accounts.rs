//! Local accounts: registration, login and the seeded rival players.

use argon2::{Algorithm, Argon2, Params, Version};
use log::{info, warn};
use password_hash::{PasswordHasher, PasswordVerifier};
use rand::Rng;

use crate::config::Argon2Config;
use crate::game::engine::Game;
use crate::game::errors::GameError;
use crate::game::progression::{LEVEL_ATTACK_GROWTH, LEVEL_DEFENSE_GROWTH, LEVEL_HEALTH_GROWTH};
use crate::game::types::{PlayerRecord, Race, Wallet};
use crate::logutil::escape_log;
use crate::validation::{validate_password, validate_username};

/// Build an Argon2id hasher, overriding only the params present in config.
pub fn build_argon2(config: Option<&Argon2Config>) -> Argon2<'static> {
    let Some(a) = config else {
        return Argon2::default();
    };
    let builder = Params::DEFAULT;
    let mem = a.memory_kib.unwrap_or(builder.m_cost());
    let time = a.time_cost.unwrap_or(builder.t_cost());
    let para = a.parallelism.unwrap_or(builder.p_cost());
    match Params::new(mem, time, para, None) {
        Ok(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        Err(e) => {
            warn!("Invalid argon2 params ({}), using defaults", e);
            Argon2::default()
        }
    }
}

pub fn hash_password(argon2: &Argon2<'static>, password: &str) -> Result<String, GameError> {
    let salt = password_hash::SaltString::generate(&mut rand::thread_rng());
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| GameError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. Empty hashes never match.
pub fn verify_password(
    argon2: &Argon2<'static>,
    stored: &str,
    password: &str,
) -> Result<bool, GameError> {
    if stored.is_empty() {
        return Ok(false);
    }
    let parsed = password_hash::PasswordHash::new(stored)
        .map_err(|e| GameError::PasswordHash(format!("corrupt password hash: {}", e)))?;
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

// ============================================================================
// Demo players
// ============================================================================

fn demo_player(
    name: &str,
    race: Race,
    level: u32,
    pvp_wins: u32,
    pvp_losses: u32,
    weekly_score: u64,
) -> PlayerRecord {
    let mut player = PlayerRecord::new(name, "", race, Wallet::new(500, 20, 0));
    let gained = level.saturating_sub(1);
    player.level = level.max(1);
    player.max_health += gained * LEVEL_HEALTH_GROWTH;
    player.attack += gained * LEVEL_ATTACK_GROWTH;
    player.defense += gained * LEVEL_DEFENSE_GROWTH;
    player.health = player.max_health;
    player.experience = (level as u64 * 37) % (level as u64 * 100);
    player.pvp_wins = pvp_wins;
    player.pvp_losses = pvp_losses;
    player.weekly_score = weekly_score;
    player
}

/// Static rivals inserted into an empty store so the leaderboard, duels and chat have
/// someone to interact with. They have no password and cannot log in.
pub fn demo_players() -> Vec<PlayerRecord> {
    vec![
        demo_player("DragonSlayer", Race::Human, 12, 34, 8, 180),
        demo_player("PixelQueen", Race::Elf, 9, 21, 11, 140),
        demo_player("ShadowNinja", Race::Elf, 15, 52, 14, 260),
        demo_player("IronBeard", Race::Dwarf, 7, 9, 12, 75),
        demo_player("Grommash", Race::Orc, 10, 27, 9, 155),
    ]
}

// ============================================================================
// Game integration
// ============================================================================

impl<R: Rng> Game<R> {
    /// Create an account with race-based starting stats and the configured wallet.
    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        race: Race,
    ) -> Result<PlayerRecord, GameError> {
        let name = validate_username(username)
            .map_err(|e| GameError::InvalidUsername(e.to_string()))?;
        validate_password(password).map_err(|e| GameError::InvalidPassword(e.to_string()))?;

        if self.store.player_exists(&name)? {
            warn!("Registration rejected, name taken: {}", escape_log(&name));
            return Err(GameError::DuplicateUsername(name));
        }

        let game = &self.config.game;
        let wallet = Wallet::new(game.starting_coins, game.starting_gems, game.starting_premium);
        let hash = hash_password(&self.argon2, password)?;
        let player = PlayerRecord::new(&name, &hash, race, wallet);
        self.store.put_player(player.clone())?;

        info!("Registered {} ({})", escape_log(&name), race);
        self.audit(&format!("register {} race={}", player.username, race));
        Ok(player)
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<PlayerRecord, GameError> {
        let player = match self.store.get_player(username.trim()) {
            Ok(player) => player,
            Err(GameError::NotFound(_)) => {
                warn!("Login failed for unknown user {}", escape_log(username));
                return Err(GameError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };
        if !verify_password(&self.argon2, &player.password_hash, password)? {
            warn!("Login failed for {}", escape_log(&player.username));
            return Err(GameError::InvalidCredentials);
        }
        info!("{} logged in", player.username);
        Ok(player)
    }
}
