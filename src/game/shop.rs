//! Catalog purchases paid in coins, gems or premium currency.

use log::{info, warn};
use rand::Rng;

use crate::game::catalog::Catalog;
use crate::game::currency::format_price;
use crate::game::engine::Game;
use crate::game::errors::GameError;
use crate::game::inventory;
use crate::game::types::{InventoryItem, InventoryResult, ItemCategory, PlayerRecord, Price, ShopItem};

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    pub total: Price,
    /// Balance left in `total.currency` after the debit.
    pub new_balance: u64,
    pub stacked: bool,
}

/// Debit the player and add the items. Nothing changes when any check fails.
pub fn purchase(player: &mut PlayerRecord, item: &ShopItem, quantity: u32) -> Result<Receipt, GameError> {
    if quantity == 0 {
        return Err(GameError::InvalidCommand(
            "Quantity must be at least 1".to_string(),
        ));
    }
    if !item.stackable && quantity > 1 {
        return Err(GameError::InvalidCommand(format!(
            "{} can only be bought one at a time",
            item.name
        )));
    }

    let total = item.price.times(quantity);
    let new_balance = player.wallet.debit(&total)?;
    let stacked = match inventory::add_item(player, InventoryItem::from_shop_item(item, quantity)) {
        InventoryResult::Added { stacked, .. } => stacked,
        InventoryResult::Removed { .. } => false,
    };

    Ok(Receipt {
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        quantity,
        total,
        new_balance,
        stacked,
    })
}

/// One catalog line, e.g. `⚔️ Iron Sword [common] +12 ATK - 💰 120 coins <iron_sword>`
pub fn format_shop_item(item: &ShopItem) -> String {
    let bonus = if item.bonus.is_zero() {
        String::new()
    } else {
        format!(" {}", item.bonus)
    };
    let stack = if item.stackable { " (stackable)" } else { "" };
    format!(
        "{} {} [{}]{}{} - {} <{}>",
        item.icon,
        item.name,
        item.rarity,
        bonus,
        stack,
        format_price(&item.price),
        item.id
    )
}

/// Catalog listing, optionally limited to one category.
pub fn format_shop_listing(catalog: &Catalog, category: Option<ItemCategory>) -> Vec<String> {
    let items: Vec<&ShopItem> = match category {
        Some(category) => catalog.by_category(category),
        None => catalog.items().iter().collect(),
    };

    let mut lines = Vec::new();
    match category {
        Some(category) => lines.push(format!("=== Shop: {} ===", category)),
        None => lines.push("=== Shop ===".to_string()),
    }
    if items.is_empty() {
        lines.push("No items for sale.".to_string());
        return lines;
    }
    for item in items {
        lines.push(format_shop_item(item));
    }
    lines
}

impl<R: Rng> Game<R> {
    pub fn buy(&mut self, username: &str, item_id: &str, quantity: u32) -> Result<Receipt, GameError> {
        let item = self.catalog.require(item_id)?;
        let mut player = self.store.get_player(username)?;

        let receipt = match purchase(&mut player, item, quantity) {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("{} could not buy {}: {}", player.username, item.id, e);
                return Err(e);
            }
        };
        self.store.put_player(player)?;

        info!(
            "{} bought {} x{} for {}",
            username, receipt.item_id, receipt.quantity, receipt.total.amount
        );
        self.audit(&format!(
            "buy {} {} x{} {} {}",
            username.to_ascii_lowercase(),
            receipt.item_id,
            receipt.quantity,
            receipt.total.amount,
            receipt.total.currency
        ));
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Currency, Race, Rarity, StatBonus, Wallet};

    fn item(id: &str, price: Price, stackable: bool) -> ShopItem {
        ShopItem {
            id: id.to_string(),
            name: id.to_string(),
            icon: "?".to_string(),
            description: String::new(),
            category: if stackable {
                ItemCategory::Potion
            } else {
                ItemCategory::Weapon
            },
            rarity: Rarity::Common,
            price,
            bonus: StatBonus::new(3, 0, 0),
            stackable,
            tradeable: true,
        }
    }

    fn player(coins: u64, gems: u64) -> PlayerRecord {
        PlayerRecord::new("buyer", "", Race::Human, Wallet::new(coins, gems, 0))
    }

    #[test]
    fn purchase_debits_exact_price() {
        let mut p = player(100, 10);
        let receipt = purchase(&mut p, &item("sword", Price::coins(60), false), 1).unwrap();
        assert_eq!(receipt.new_balance, 40);
        assert_eq!(p.wallet.coins, 40);
        assert_eq!(p.wallet.gems, 10);
        assert_eq!(inventory::get_item_quantity(&p, "sword"), 1);
    }

    #[test]
    fn purchase_rejects_insufficient_balance_without_mutation() {
        let mut p = player(100, 10);
        let err = purchase(&mut p, &item("gem_blade", Price::gems(11), false), 1).unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientFunds {
                currency: Currency::Gems,
                needed: 11,
                available: 10
            }
        ));
        assert_eq!(p.wallet, Wallet::new(100, 10, 0));
        assert!(p.inventory.is_empty());
    }

    #[test]
    fn stackable_quantity_multiplies_price() {
        let mut p = player(100, 0);
        let potion = item("potion", Price::coins(20), true);
        let first = purchase(&mut p, &potion, 3).unwrap();
        assert_eq!(first.total, Price::coins(60));
        assert!(!first.stacked);
        let second = purchase(&mut p, &potion, 2).unwrap();
        assert!(second.stacked);
        assert_eq!(p.wallet.coins, 0);
        assert_eq!(inventory::get_item_quantity(&p, "potion"), 5);
        assert!(purchase(&mut p, &potion, 1).is_err());
    }

    #[test]
    fn non_stackable_limited_to_one() {
        let mut p = player(1000, 0);
        assert!(purchase(&mut p, &item("sword", Price::coins(10), false), 2).is_err());
        assert!(purchase(&mut p, &item("sword", Price::coins(10), false), 0).is_err());
        assert_eq!(p.wallet.coins, 1000);
    }

    #[test]
    fn listing_filters_by_category() {
        let catalog = Catalog::load_embedded().unwrap();
        let lines = format_shop_listing(&catalog, Some(ItemCategory::Pet));
        assert_eq!(lines[0], "=== Shop: pet ===");
        assert!(lines.iter().skip(1).all(|l| l.contains("pet_")));
        assert_eq!(lines.len(), catalog.by_category(ItemCategory::Pet).len() + 1);
    }
}
