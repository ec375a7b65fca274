//! # Configuration
//!
//! `config.toml` is the single place operators tune the economy and the storage location.
//!
//! ```toml
//! [game]
//! starting_coins = 100
//! starting_gems = 10
//! boss_chance = 0.1
//! defeat_penalty = 50
//!
//! [storage]
//! data_dir = "./data/pixelshop"
//!
//! [logging]
//! level = "info"
//!
//! [donation]
//! chat_url = "https://t.me/LyriumMine"
//!
//! [[promos]]
//! code = "WELCOME"
//! coins = 500
//! ```
//!
//! Every section except `[storage]` and `[logging]` may be omitted; missing keys fall back to
//! the defaults shown by `pixelshop init`.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Economy and combat tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_starting_coins")]
    pub starting_coins: u64,
    #[serde(default = "default_starting_gems")]
    pub starting_gems: u64,
    #[serde(default)]
    pub starting_premium: u64,
    /// Probability that a generated mob is a boss.
    #[serde(default = "default_boss_chance")]
    pub boss_chance: f64,
    /// Probability that a boss skips its counter-attack in a round.
    #[serde(default = "default_boss_counter_skip_chance")]
    pub boss_counter_skip_chance: f64,
    /// Probability that a defeated boss drops an epic-or-better catalog item.
    #[serde(default = "default_boss_drop_chance")]
    pub boss_drop_chance: f64,
    /// Flat coin loss on defeat; balances saturate at zero.
    #[serde(default = "default_defeat_penalty")]
    pub defeat_penalty: u64,
    #[serde(default = "default_vip_coin_multiplier")]
    pub vip_coin_multiplier: u64,
    #[serde(default = "default_max_duel_rounds")]
    pub max_duel_rounds: u32,
    /// Weekly score awarded to a duel winner.
    #[serde(default = "default_duel_score")]
    pub duel_score: u64,
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    #[serde(default = "default_chat_history_limit")]
    pub chat_history_limit: usize,
    /// Insert a handful of static rival players into an empty store.
    #[serde(default = "default_seed_demo_players")]
    pub seed_demo_players: bool,
}

fn default_starting_coins() -> u64 {
    100
}

fn default_starting_gems() -> u64 {
    10
}

fn default_boss_chance() -> f64 {
    0.1
}

fn default_boss_counter_skip_chance() -> f64 {
    0.3
}

fn default_boss_drop_chance() -> f64 {
    0.10
}

fn default_defeat_penalty() -> u64 {
    50
}

fn default_vip_coin_multiplier() -> u64 {
    2
}

fn default_max_duel_rounds() -> u32 {
    200
}

fn default_duel_score() -> u64 {
    10
}

fn default_max_message_length() -> usize {
    200
}

fn default_chat_history_limit() -> usize {
    100
}

fn default_seed_demo_players() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_coins: default_starting_coins(),
            starting_gems: default_starting_gems(),
            starting_premium: 0,
            boss_chance: default_boss_chance(),
            boss_counter_skip_chance: default_boss_counter_skip_chance(),
            boss_drop_chance: default_boss_drop_chance(),
            defeat_penalty: default_defeat_penalty(),
            vip_coin_multiplier: default_vip_coin_multiplier(),
            max_duel_rounds: default_max_duel_rounds(),
            duel_score: default_duel_score(),
            max_message_length: default_max_message_length(),
            chat_history_limit: default_chat_history_limit(),
            seed_demo_players: default_seed_demo_players(),
        }
    }
}

impl GameConfig {
    /// Reject probabilities outside 0..=1 and limits that would make the game unplayable.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("boss_chance", self.boss_chance),
            ("boss_counter_skip_chance", self.boss_counter_skip_chance),
            ("boss_drop_chance", self.boss_drop_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("game.{} must be between 0 and 1, got {}", name, value));
            }
        }
        if self.max_duel_rounds == 0 {
            return Err(anyhow!("game.max_duel_rounds must be at least 1"));
        }
        if self.max_message_length == 0 || self.chat_history_limit == 0 {
            return Err(anyhow!(
                "game.max_message_length and game.chat_history_limit must be positive"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Replacement for the built-in catalog seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Argon2Config {
    #[serde(default)]
    pub memory_kib: Option<u32>,
    #[serde(default)]
    pub time_cost: Option<u32>,
    #[serde(default)]
    pub parallelism: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecurityConfig {
    #[serde(default)]
    pub argon2: Option<Argon2Config>,
}

/// Where players are sent to pay for donation packs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationConfig {
    pub chat_url: String,
}

impl Default for DonationConfig {
    fn default() -> Self {
        Self {
            chat_url: "https://t.me/LyriumMine".to_string(),
        }
    }
}

/// A redeemable code; matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromoConfig {
    pub code: String,
    #[serde(default)]
    pub coins: u64,
    #[serde(default)]
    pub gems: u64,
    #[serde(default)]
    pub premium: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: Option<SecurityConfig>,
    #[serde(default)]
    pub donation: DonationConfig,
    #[serde(default)]
    pub promos: Vec<PromoConfig>,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config = Self::from_toml_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.game.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Look up a promo code, ignoring case and surrounding whitespace.
    pub fn find_promo(&self, code: &str) -> Option<&PromoConfig> {
        let code = code.trim();
        self.promos
            .iter()
            .find(|promo| promo.code.eq_ignore_ascii_case(code))
    }

    pub fn argon2(&self) -> Option<&Argon2Config> {
        self.security.as_ref().and_then(|s| s.argon2.as_ref())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            game: GameConfig::default(),
            storage: StorageConfig {
                data_dir: "./data/pixelshop".to_string(),
                catalog_path: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("pixelshop.log".to_string()),
            },
            security: Some(SecurityConfig::default()),
            donation: DonationConfig::default(),
            promos: vec![
                PromoConfig {
                    code: "WELCOME".to_string(),
                    coins: 500,
                    gems: 0,
                    premium: 0,
                },
                PromoConfig {
                    code: "GEMS50".to_string(),
                    coins: 0,
                    gems: 50,
                    premium: 0,
                },
                PromoConfig {
                    code: "PIXEL2024".to_string(),
                    coins: 1000,
                    gems: 25,
                    premium: 5,
                },
            ],
        }
    }
}
