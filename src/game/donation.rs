//! Donation storefront.
//!
//! Packs are paid for outside the game: the player copies an order code, opens the support
//! chat and an admin later runs `pixelshop fulfil <user> <id>` to deliver the grant.

use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use std::process::Command;

use crate::config::DonationConfig;
use crate::game::engine::Game;
use crate::game::errors::GameError;
use crate::game::inventory;
use crate::game::types::{Currency, InventoryItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationCategory {
    Premium,
    Currency,
    Cosmetic,
}

impl std::fmt::Display for DonationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DonationCategory::Premium => "premium",
            DonationCategory::Currency => "currency",
            DonationCategory::Cosmetic => "cosmetic",
        };
        write!(f, "{}", name)
    }
}

/// What an admin hands over once a pack is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationGrant {
    pub coins: u64,
    pub gems: u64,
    pub premium: u64,
    pub vip_days: u32,
    /// Catalog item delivered with the pack.
    pub item: Option<&'static str>,
}

impl DonationGrant {
    const fn new(coins: u64, gems: u64, premium: u64, vip_days: u32) -> Self {
        Self {
            coins,
            gems,
            premium,
            vip_days,
            item: None,
        }
    }

    const fn item(item_id: &'static str) -> Self {
        Self {
            coins: 0,
            gems: 0,
            premium: 0,
            vip_days: 0,
            item: Some(item_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationItem {
    pub id: u32,
    pub name: &'static str,
    pub price_rub: u32,
    pub icon: &'static str,
    pub description: &'static str,
    pub category: DonationCategory,
    pub grant: DonationGrant,
}

pub const DONATION_ITEMS: [DonationItem; 10] = [
    DonationItem {
        id: 1,
        name: "Premium Pack",
        price_rub: 299,
        icon: "👑",
        description: "VIP status for a month",
        category: DonationCategory::Premium,
        grant: DonationGrant::new(0, 0, 100, 30),
    },
    DonationItem {
        id: 2,
        name: "Mega Coins",
        price_rub: 499,
        icon: "💰",
        description: "10000 game coins",
        category: DonationCategory::Currency,
        grant: DonationGrant::new(10_000, 0, 0, 0),
    },
    DonationItem {
        id: 3,
        name: "Epic Skin",
        price_rub: 199,
        icon: "🎨",
        description: "Exclusive skin",
        category: DonationCategory::Cosmetic,
        grant: DonationGrant::item("skin_assassin"),
    },
    DonationItem {
        id: 4,
        name: "Super Pack",
        price_rub: 799,
        icon: "⭐",
        description: "All the perks",
        category: DonationCategory::Premium,
        grant: DonationGrant::new(15_000, 200, 300, 30),
    },
    DonationItem {
        id: 5,
        name: "Gold Rush",
        price_rub: 999,
        icon: "🏆",
        description: "25000 coins plus bonuses",
        category: DonationCategory::Currency,
        grant: DonationGrant::new(25_000, 100, 0, 0),
    },
    DonationItem {
        id: 6,
        name: "Legendary Skin",
        price_rub: 399,
        icon: "🔥",
        description: "Legendary skin",
        category: DonationCategory::Cosmetic,
        grant: DonationGrant::item("skin_demon"),
    },
    DonationItem {
        id: 7,
        name: "Starter Pack",
        price_rub: 99,
        icon: "🎮",
        description: "Starter kit",
        category: DonationCategory::Premium,
        grant: DonationGrant::new(2_000, 50, 20, 0),
    },
    DonationItem {
        id: 8,
        name: "Coin Boost",
        price_rub: 149,
        icon: "💎",
        description: "5000 coins",
        category: DonationCategory::Currency,
        grant: DonationGrant::new(5_000, 0, 0, 0),
    },
    DonationItem {
        id: 9,
        name: "Rare Skin",
        price_rub: 249,
        icon: "✨",
        description: "Rare skin",
        category: DonationCategory::Cosmetic,
        grant: DonationGrant::item("skin_knight"),
    },
    DonationItem {
        id: 10,
        name: "Ultimate Pack",
        price_rub: 1499,
        icon: "🚀",
        description: "Everything, maxed out",
        category: DonationCategory::Premium,
        grant: DonationGrant::new(50_000, 500, 1_000, 90),
    },
];

pub fn find_donation(id: u32) -> Result<&'static DonationItem, GameError> {
    DONATION_ITEMS
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| GameError::NotFound(format!("donation pack #{}", id)))
}

/// Order code the player quotes to the admin, e.g. `#4-1718000000000`.
pub fn order_code(item: &DonationItem, now: DateTime<Utc>) -> String {
    format!("#{}-{}", item.id, now.timestamp_millis())
}

/// Support chat link with the order code prefilled as the `text` parameter.
pub fn deep_link(config: &DonationConfig, code: &str) -> String {
    let separator = if config.chat_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}text={}",
        config.chat_url,
        separator,
        urlencoding::encode(code)
    )
}

/// Hand the URL to the platform opener.
pub fn open_link(url: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };
    let status = command.status()?;
    if !status.success() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("URL opener exited with {}", status),
        ));
    }
    Ok(())
}

pub fn format_donation_item(item: &DonationItem) -> String {
    format!(
        "#{} {} {} [{}] - {} ₽ - {}",
        item.id, item.icon, item.name, item.category, item.price_rub, item.description
    )
}

/// Summary of a fulfilled pack; the item name is set when the pack carried one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fulfilment {
    pub username: String,
    pub pack: &'static str,
    pub grant: DonationGrant,
    pub item_name: Option<String>,
    pub vip_until: Option<DateTime<Utc>>,
}

impl<R: Rng> Game<R> {
    /// Admin action: deliver a paid donation pack.
    pub fn fulfil(&mut self, username: &str, donation_id: u32) -> Result<Fulfilment, GameError> {
        let pack = find_donation(donation_id)?;
        let mut player = self.store.get_player(username)?;
        let grant = pack.grant;

        player.wallet.credit(Currency::Coins, grant.coins);
        player.wallet.credit(Currency::Gems, grant.gems);
        player.wallet.credit(Currency::Premium, grant.premium);
        if grant.vip_days > 0 {
            player.extend_vip(grant.vip_days, Utc::now());
        }
        let item_name = match grant.item {
            Some(item_id) => {
                let item = self.catalog.require(item_id)?;
                inventory::add_item(&mut player, InventoryItem::from_shop_item(item, 1));
                Some(item.name.clone())
            }
            None => None,
        };

        let fulfilment = Fulfilment {
            username: player.username.clone(),
            pack: pack.name,
            grant,
            item_name,
            vip_until: player.vip_until,
        };
        self.store.put_player(player)?;

        info!("fulfilled donation #{} for {}", pack.id, fulfilment.username);
        self.audit(&format!(
            "fulfil {} #{} coins={} gems={} premium={} vip_days={}",
            fulfilment.username, pack.id, grant.coins, grant.gems, grant.premium, grant.vip_days
        ));
        Ok(fulfilment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn ten_packs_with_unique_ids() {
        let mut ids: Vec<u32> = DONATION_ITEMS.iter().map(|i| i.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(find_donation(7).unwrap().name, "Starter Pack");
        assert!(find_donation(11).is_err());
    }

    #[test]
    fn order_code_uses_unix_millis() {
        let now = Utc.timestamp_millis_opt(1_718_000_000_123).unwrap();
        let item = find_donation(4).unwrap();
        assert_eq!(order_code(item, now), "#4-1718000000123");
    }

    #[test]
    fn deep_link_encodes_order_code() {
        let config = DonationConfig::default();
        assert_eq!(
            deep_link(&config, "#4-1718000000123"),
            "https://t.me/LyriumMine?text=%234-1718000000123"
        );

        let config = DonationConfig {
            chat_url: "https://example.org/chat?room=shop".to_string(),
        };
        assert_eq!(
            deep_link(&config, "#1-5"),
            "https://example.org/chat?room=shop&text=%231-5"
        );
    }

    #[test]
    fn skin_grants_point_at_catalog_items() {
        let catalog = crate::game::catalog::Catalog::load_embedded().unwrap();
        for item in DONATION_ITEMS.iter() {
            if let Some(id) = item.grant.item {
                assert!(catalog.get(id).is_some(), "missing catalog item {}", id);
            }
        }
    }
}
