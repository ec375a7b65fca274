//! Static shop catalog loaded from `data/seeds/catalog.json`.
//!
//! The seed file is embedded at compile time; `storage.catalog_path` in the config can point at
//! a replacement file so operators can rebalance prices without rebuilding.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::game::errors::GameError;
use crate::game::types::{Currency, ItemCategory, Price, Rarity, ShopItem, StatBonus};

const EMBEDDED_CATALOG: &str = include_str!("../../data/seeds/catalog.json");

#[derive(Debug, Deserialize)]
struct ItemSeed {
    id: String,
    name: String,
    icon: String,
    #[serde(default)]
    description: String,
    category: ItemCategory,
    rarity: Rarity,
    #[serde(default)]
    price_coins: Option<u64>,
    #[serde(default)]
    price_gems: Option<u64>,
    #[serde(default)]
    price_premium: Option<u64>,
    #[serde(default)]
    attack_bonus: u32,
    #[serde(default)]
    defense_bonus: u32,
    #[serde(default)]
    health_bonus: u32,
    #[serde(default)]
    stackable: bool,
    #[serde(default = "default_tradeable")]
    tradeable: bool,
}

fn default_tradeable() -> bool {
    true
}

impl ItemSeed {
    fn into_item(self) -> Result<ShopItem, GameError> {
        let price = match (self.price_coins, self.price_gems, self.price_premium) {
            (Some(amount), None, None) => Price::coins(amount),
            (None, Some(amount), None) => Price::gems(amount),
            (None, None, Some(amount)) => Price::premium(amount),
            _ => {
                return Err(GameError::InvalidData(format!(
                    "item '{}' must have exactly one price",
                    self.id
                )))
            }
        };
        if price.amount == 0 {
            return Err(GameError::InvalidData(format!(
                "item '{}' has a zero price",
                self.id
            )));
        }
        Ok(ShopItem {
            id: self.id,
            name: self.name,
            icon: self.icon,
            description: self.description,
            category: self.category,
            rarity: self.rarity,
            price,
            bonus: StatBonus::new(self.attack_bonus, self.defense_bonus, self.health_bonus),
            stackable: self.stackable,
            tradeable: self.tradeable,
        })
    }
}

/// Read-only list of everything the shop sells, kept in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ShopItem>,
}

impl Catalog {
    /// Catalog compiled into the binary.
    pub fn load_embedded() -> Result<Self, GameError> {
        Self::from_json_str(EMBEDDED_CATALOG, "embedded catalog")
    }

    /// Load a catalog override file.
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents, &path.display().to_string())
    }

    pub fn from_json_str(contents: &str, source: &str) -> Result<Self, GameError> {
        let seeds: Vec<ItemSeed> = serde_json::from_str(contents)
            .map_err(|e| GameError::InvalidData(format!("Failed to parse {}: {}", source, e)))?;
        let items = seeds
            .into_iter()
            .map(ItemSeed::into_item)
            .collect::<Result<Vec<_>, GameError>>()?;
        Self::from_items(items)
    }

    /// Build from already-constructed items, rejecting duplicate ids.
    pub fn from_items(mut items: Vec<ShopItem>) -> Result<Self, GameError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(GameError::InvalidData(format!(
                    "duplicate catalog id '{}'",
                    item.id
                )));
            }
        }
        // rarity tier, then coin price, then gem price; premium-priced items go last in a tier
        items.sort_by_key(|item| {
            let (coins, gems, premium) = match item.price.currency {
                Currency::Coins => (item.price.amount, 0, 0),
                Currency::Gems => (0, item.price.amount, 0),
                Currency::Premium => (0, 0, item.price.amount),
            };
            (item.rarity, premium > 0, coins, gems, premium)
        });
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ShopItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&ShopItem> {
        let needle = item_id.trim();
        self.items
            .iter()
            .find(|item| item.id.eq_ignore_ascii_case(needle))
    }

    pub fn require(&self, item_id: &str) -> Result<&ShopItem, GameError> {
        self.get(item_id)
            .ok_or_else(|| GameError::UnknownItem(item_id.trim().to_string()))
    }

    pub fn by_category(&self, category: ItemCategory) -> Vec<&ShopItem> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }

    /// Items at or above `rarity`; boss drops pick from this pool.
    pub fn at_least(&self, rarity: Rarity) -> Vec<&ShopItem> {
        self.items.iter().filter(|item| item.rarity >= rarity).collect()
    }

    /// Categories present in the catalog, in first-seen display order.
    pub fn categories(&self) -> Vec<ItemCategory> {
        let mut categories = Vec::new();
        for item in &self.items {
            if !categories.contains(&item.category) {
                categories.push(item.category);
            }
        }
        categories
    }
}
