use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::game::errors::GameError;

pub const PLAYER_SCHEMA_VERSION: u8 = 1;
pub const CHAT_SCHEMA_VERSION: u8 = 1;
pub const MARKET_SCHEMA_VERSION: u8 = 1;

// ============================================================================
// Currency
// ============================================================================

/// The three balance types a player holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Coins,
    Gems,
    /// Donation-only currency; granted by fulfilment or promo codes, never bought in-game.
    Premium,
}

impl Currency {
    pub fn icon(&self) -> &'static str {
        match self {
            Currency::Coins => "💰",
            Currency::Gems => "💎",
            Currency::Premium => "👑",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Coins => write!(f, "coins"),
            Currency::Gems => write!(f, "gems"),
            Currency::Premium => write!(f, "premium"),
        }
    }
}

/// A price tag: one currency, one amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Price {
    pub currency: Currency,
    pub amount: u64,
}

impl Price {
    pub fn coins(amount: u64) -> Self {
        Self {
            currency: Currency::Coins,
            amount,
        }
    }

    pub fn gems(amount: u64) -> Self {
        Self {
            currency: Currency::Gems,
            amount,
        }
    }

    pub fn premium(amount: u64) -> Self {
        Self {
            currency: Currency::Premium,
            amount,
        }
    }

    /// Price for `quantity` units, saturating on overflow.
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            currency: self.currency,
            amount: self.amount.saturating_mul(quantity as u64),
        }
    }
}

/// Player balances. Unsigned so a balance can never go negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Wallet {
    pub coins: u64,
    pub gems: u64,
    pub premium: u64,
}

impl Wallet {
    pub fn new(coins: u64, gems: u64, premium: u64) -> Self {
        Self {
            coins,
            gems,
            premium,
        }
    }

    pub fn balance(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Coins => self.coins,
            Currency::Gems => self.gems,
            Currency::Premium => self.premium,
        }
    }

    fn slot_mut(&mut self, currency: Currency) -> &mut u64 {
        match currency {
            Currency::Coins => &mut self.coins,
            Currency::Gems => &mut self.gems,
            Currency::Premium => &mut self.premium,
        }
    }

    pub fn can_afford(&self, price: &Price) -> bool {
        self.balance(price.currency) >= price.amount
    }

    /// Remove `price` from the matching balance. Leaves the wallet untouched on failure.
    pub fn debit(&mut self, price: &Price) -> Result<u64, GameError> {
        let available = self.balance(price.currency);
        if available < price.amount {
            return Err(GameError::InsufficientFunds {
                currency: price.currency,
                needed: price.amount,
                available,
            });
        }
        let slot = self.slot_mut(price.currency);
        *slot -= price.amount;
        Ok(*slot)
    }

    pub fn credit(&mut self, currency: Currency, amount: u64) -> u64 {
        let slot = self.slot_mut(currency);
        *slot = slot.saturating_add(amount);
        *slot
    }

    /// Remove up to `amount` coins, stopping at zero. Returns what was actually removed.
    pub fn deduct_coins_saturating(&mut self, amount: u64) -> u64 {
        let removed = amount.min(self.coins);
        self.coins -= removed;
        removed
    }
}

// ============================================================================
// Character
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Orc,
}

impl Race {
    pub const ALL: [Race; 4] = [Race::Human, Race::Elf, Race::Dwarf, Race::Orc];

    /// Starting stat modifiers applied on top of the base character.
    pub fn modifiers(&self) -> StatBonus {
        match self {
            Race::Human => StatBonus::default(),
            Race::Elf => StatBonus::new(3, 0, 0),
            Race::Dwarf => StatBonus::new(0, 3, 0),
            Race::Orc => StatBonus::new(0, 0, 20),
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Race::Human => "Human",
            Race::Elf => "Elf",
            Race::Dwarf => "Dwarf",
            Race::Orc => "Orc",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Race {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Race::Human),
            "elf" => Ok(Race::Elf),
            "dwarf" => Ok(Race::Dwarf),
            "orc" => Ok(Race::Orc),
            other => Err(GameError::InvalidCommand(format!(
                "Unknown race '{}'. Choose human, elf, dwarf or orc.",
                other
            ))),
        }
    }
}

/// Additive stat bonus carried by items and races.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StatBonus {
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub health: u32,
}

impl StatBonus {
    pub fn new(attack: u32, defense: u32, health: u32) -> Self {
        Self {
            attack,
            defense,
            health,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.attack == 0 && self.defense == 0 && self.health == 0
    }

    pub fn plus(&self, other: &StatBonus) -> Self {
        Self {
            attack: self.attack.saturating_add(other.attack),
            defense: self.defense.saturating_add(other.defense),
            health: self.health.saturating_add(other.health),
        }
    }
}

impl fmt::Display for StatBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.attack > 0 {
            parts.push(format!("+{} ATK", self.attack));
        }
        if self.defense > 0 {
            parts.push(format!("+{} DEF", self.defense));
        }
        if self.health > 0 {
            parts.push(format!("+{} HP", self.health));
        }
        if parts.is_empty() {
            write!(f, "no bonus")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Weapon,
    Armor,
    Shield,
    Helmet,
    Gloves,
    Boots,
    Cloak,
    Ring,
    Amulet,
    Magic,
    Rune,
    Pet,
    Potion,
    Food,
    /// Single-use spells.
    Scroll,
    Tool,
    Decoration,
    Skin,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 18] = [
        ItemCategory::Weapon,
        ItemCategory::Armor,
        ItemCategory::Shield,
        ItemCategory::Helmet,
        ItemCategory::Gloves,
        ItemCategory::Boots,
        ItemCategory::Cloak,
        ItemCategory::Ring,
        ItemCategory::Amulet,
        ItemCategory::Magic,
        ItemCategory::Rune,
        ItemCategory::Pet,
        ItemCategory::Potion,
        ItemCategory::Food,
        ItemCategory::Scroll,
        ItemCategory::Tool,
        ItemCategory::Decoration,
        ItemCategory::Skin,
    ];

    /// Consumables are used up rather than equipped.
    pub fn is_consumable(&self) -> bool {
        matches!(self, ItemCategory::Potion | ItemCategory::Food | ItemCategory::Scroll)
    }

    pub fn is_equippable(&self) -> bool {
        !self.is_consumable()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
            ItemCategory::Shield => "shield",
            ItemCategory::Helmet => "helmet",
            ItemCategory::Gloves => "gloves",
            ItemCategory::Boots => "boots",
            ItemCategory::Cloak => "cloak",
            ItemCategory::Ring => "ring",
            ItemCategory::Amulet => "amulet",
            ItemCategory::Magic => "magic",
            ItemCategory::Rune => "rune",
            ItemCategory::Pet => "pet",
            ItemCategory::Potion => "potion",
            ItemCategory::Food => "food",
            ItemCategory::Scroll => "scroll",
            ItemCategory::Tool => "tool",
            ItemCategory::Decoration => "decoration",
            ItemCategory::Skin => "skin",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_lowercase()))
            .map_err(|_| GameError::InvalidCommand(format!("Unknown category '{}'", s.trim())))
    }
}

/// Tier label. Ordering runs common < rare < epic < legendary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        };
        write!(f, "{}", name)
    }
}

/// A catalog entry. The catalog is static and never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    pub price: Price,
    pub bonus: StatBonus,
    /// Stackable items may be bought several at a time.
    pub stackable: bool,
    pub tradeable: bool,
}

/// One inventory stack owned by a player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub item_id: String,
    pub name: String,
    pub icon: String,
    pub category: ItemCategory,
    pub rarity: Rarity,
    pub bonus: StatBonus,
    pub quantity: u32,
    pub equipped: bool,
    pub tradeable: bool,
}

impl InventoryItem {
    pub fn from_shop_item(item: &ShopItem, quantity: u32) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            icon: item.icon.clone(),
            category: item.category,
            rarity: item.rarity,
            bonus: item.bonus,
            quantity,
            equipped: false,
            tradeable: item.tradeable,
        }
    }

    /// Copy of this stack with a different quantity and no equip flag.
    pub fn split(&self, quantity: u32) -> Self {
        Self {
            quantity,
            equipped: false,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryResult {
    Added { quantity: u32, stacked: bool },
    Removed { quantity: u32 },
}

// ============================================================================
// Player
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    pub username: String,
    pub display_name: String,
    /// Argon2 PHC string. Empty for seeded rows that cannot log in.
    pub password_hash: String,
    pub race: Race,
    pub wallet: Wallet,
    pub level: u32,
    pub experience: u64,
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub pvp_wins: u32,
    #[serde(default)]
    pub pvp_losses: u32,
    #[serde(default)]
    pub weekly_score: u64,
    /// VIP status expiry; `None` means no VIP.
    #[serde(default)]
    pub vip_until: Option<DateTime<Utc>>,
    /// Promo codes already redeemed, uppercased.
    #[serde(default)]
    pub redeemed_promos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

pub const BASE_HEALTH: u32 = 100;
pub const BASE_ATTACK: u32 = 10;
pub const BASE_DEFENSE: u32 = 5;

impl PlayerRecord {
    pub fn new(username: &str, password_hash: &str, race: Race, wallet: Wallet) -> Self {
        let now = Utc::now();
        let mods = race.modifiers();
        let max_health = BASE_HEALTH + mods.health;
        Self {
            username: username.to_ascii_lowercase(),
            display_name: username.to_string(),
            password_hash: password_hash.to_string(),
            race,
            wallet,
            level: 1,
            experience: 0,
            health: max_health,
            max_health,
            attack: BASE_ATTACK + mods.attack,
            defense: BASE_DEFENSE + mods.defense,
            inventory: Vec::new(),
            pvp_wins: 0,
            pvp_losses: 0,
            weekly_score: 0,
            vip_until: None,
            redeemed_promos: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_vip(&self, now: DateTime<Utc>) -> bool {
        self.vip_until.is_some_and(|until| until > now)
    }

    /// Extend VIP by `days`, starting from the later of now and the current expiry.
    pub fn extend_vip(&mut self, days: u32, now: DateTime<Utc>) {
        let start = match self.vip_until {
            Some(until) if until > now => until,
            _ => now,
        };
        self.vip_until = Some(start + chrono::Duration::days(days as i64));
    }
}

// ============================================================================
// Combat
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MobReward {
    pub experience: u64,
    pub coins: u64,
    pub gems: u64,
}

/// A generated, disposable combat opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct Mob {
    pub name: String,
    pub level: u32,
    pub is_boss: bool,
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub reward: MobReward,
}

impl Mob {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

// ============================================================================
// Chat & market
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Player,
    /// Announcement generated by a successful command (transfer, duel, trade).
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    pub level: u32,
    pub text: String,
    pub kind: ChatKind,
    pub timestamp: DateTime<Utc>,
    pub schema_version: u8,
}

impl ChatMessage {
    pub fn new(username: &str, level: u32, text: &str, kind: ChatKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            level,
            text: text.to_string(),
            kind,
            timestamp: Utc::now(),
            schema_version: CHAT_SCHEMA_VERSION,
        }
    }

    pub fn system(text: &str) -> Self {
        Self::new("system", 0, text, ChatKind::System)
    }

    /// Single display line, e.g. `[12:04] alice (L3): hello`.
    pub fn display_line(&self) -> String {
        let time = self.timestamp.format("%H:%M");
        match self.kind {
            ChatKind::Player => format!("[{}] {} (L{}): {}", time, self.username, self.level, self.text),
            ChatKind::System => format!("[{}] * {}", time, self.text),
        }
    }
}

/// One unit of an inventory item offered for coins by its seller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketListing {
    pub id: String,
    pub seller: String,
    pub item: InventoryItem,
    pub price: u64,
    pub listed_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl MarketListing {
    pub fn new(seller: &str, item: InventoryItem, price: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            seller: seller.to_ascii_lowercase(),
            item,
            price,
            listed_at: Utc::now(),
            schema_version: MARKET_SCHEMA_VERSION,
        }
    }

    /// Short id shown to players (first 8 hex chars).
    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(8)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_debit_rejects_overspend_without_mutation() {
        let mut wallet = Wallet::new(50, 5, 0);
        let err = wallet.debit(&Price::coins(60)).unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientFunds {
                currency: Currency::Coins,
                needed: 60,
                available: 50
            }
        ));
        assert_eq!(wallet, Wallet::new(50, 5, 0));

        assert_eq!(wallet.debit(&Price::gems(5)).unwrap(), 0);
        assert_eq!(wallet.gems, 0);
    }

    #[test]
    fn saturating_coin_deduction_stops_at_zero() {
        let mut wallet = Wallet::new(30, 0, 0);
        assert_eq!(wallet.deduct_coins_saturating(50), 30);
        assert_eq!(wallet.coins, 0);
    }

    #[test]
    fn race_modifiers_shape_starting_stats() {
        let orc = PlayerRecord::new("Grom", "", Race::Orc, Wallet::default());
        assert_eq!(orc.username, "grom");
        assert_eq!(orc.display_name, "Grom");
        assert_eq!(orc.max_health, BASE_HEALTH + 20);
        assert_eq!(orc.health, orc.max_health);

        let elf = PlayerRecord::new("lira", "", Race::Elf, Wallet::default());
        assert_eq!(elf.attack, BASE_ATTACK + 3);
        assert_eq!(elf.defense, BASE_DEFENSE);
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Weapon".parse::<ItemCategory>().unwrap(), ItemCategory::Weapon);
        assert!("spaceship".parse::<ItemCategory>().is_err());
        for category in ItemCategory::ALL {
            assert_eq!(category.as_str().parse::<ItemCategory>().unwrap(), category);
        }
        assert!(ItemCategory::Scroll.is_consumable());
    }

    #[test]
    fn vip_extension_stacks_on_active_status() {
        let now = Utc::now();
        let mut player = PlayerRecord::new("vip", "", Race::Human, Wallet::default());
        assert!(!player.is_vip(now));
        player.extend_vip(30, now);
        player.extend_vip(30, now);
        let until = player.vip_until.unwrap();
        assert_eq!((until - now).num_days(), 60);
        assert!(player.is_vip(now));
    }

    #[test]
    fn rarity_orders_by_tier() {
        assert!(Rarity::Common < Rarity::Rare);
        assert!(Rarity::Epic < Rarity::Legendary);
    }
}
