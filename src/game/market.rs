//! Player-to-player market. Listings are single units priced in coins.

use log::{info, warn};
use rand::Rng;

use crate::game::currency::format_amount;
use crate::game::engine::Game;
use crate::game::errors::GameError;
use crate::game::inventory;
use crate::game::storage::StoreBatch;
use crate::game::types::{Currency, MarketListing, Price};

pub fn format_listing(listing: &MarketListing) -> String {
    format!(
        "[{}] {} {} - {} (seller: {})",
        listing.short_id(),
        listing.item.icon,
        listing.item.name,
        format_amount(listing.price, Currency::Coins),
        listing.seller
    )
}

impl<R: Rng> Game<R> {
    /// Move one unit of `item_id` from the seller's inventory onto the market.
    pub fn list_item(&mut self, seller: &str, item_id: &str, price: u64) -> Result<MarketListing, GameError> {
        if price == 0 {
            return Err(GameError::InvalidCommand(
                "Price must be greater than zero".to_string(),
            ));
        }
        let mut player = self.store.get_player(seller)?;
        let stack = player
            .inventory
            .iter()
            .find(|s| s.item_id.eq_ignore_ascii_case(item_id.trim()))
            .ok_or_else(|| GameError::UnknownItem(item_id.trim().to_string()))?;
        if !stack.tradeable {
            return Err(GameError::NotTradeable(stack.name.clone()));
        }
        let stack_id = stack.item_id.clone();

        let (unit, _) = inventory::remove_item(&mut player, &stack_id, 1)?;
        let listing = MarketListing::new(&player.username, unit, price);

        let mut batch = StoreBatch::new();
        batch.put_player(player)?;
        batch.put_listing(listing.clone())?;
        self.store.apply(batch)?;

        info!(
            "{} listed {} for {} coins ({})",
            listing.seller,
            listing.item.item_id,
            price,
            listing.short_id()
        );
        self.audit(&format!(
            "list {} {} {} {}",
            listing.seller, listing.id, listing.item.item_id, price
        ));
        Ok(listing)
    }

    /// Pay the seller and take the item. The listing id may be the short prefix.
    pub fn buy_listing(&mut self, buyer: &str, listing_id: &str) -> Result<MarketListing, GameError> {
        let listing = self.store.find_listing(listing_id)?;
        let mut purchaser = self.store.get_player(buyer)?;
        if purchaser.username == listing.seller {
            return Err(GameError::InvalidCommand(
                "You cannot buy your own listing".to_string(),
            ));
        }

        let price = Price::coins(listing.price);
        if !purchaser.wallet.can_afford(&price) {
            warn!("{} cannot afford listing {}", purchaser.username, listing.short_id());
        }
        purchaser.wallet.debit(&price)?;
        inventory::add_item(&mut purchaser, listing.item.clone());

        let mut batch = StoreBatch::new();
        // the seller may have been deleted; the coins are then simply gone
        match self.store.get_player(&listing.seller) {
            Ok(mut seller) => {
                seller.wallet.credit(Currency::Coins, listing.price);
                batch.put_player(seller)?;
            }
            Err(GameError::NotFound(_)) => {
                warn!("seller {} of listing {} no longer exists", listing.seller, listing.id);
            }
            Err(e) => return Err(e),
        }
        let buyer_name = purchaser.username.clone();
        batch.put_player(purchaser)?;
        batch.remove_listing(&listing.id);
        self.store.apply(batch)?;

        info!(
            "{} bought {} from {} for {} coins",
            buyer_name, listing.item.item_id, listing.seller, listing.price
        );
        self.audit(&format!(
            "market_buy {} {} {} {}",
            buyer_name, listing.seller, listing.id, listing.price
        ));
        Ok(listing)
    }

    /// Withdraw a listing; only its seller may do this.
    pub fn delist(&mut self, seller: &str, listing_id: &str) -> Result<MarketListing, GameError> {
        let listing = self.store.find_listing(listing_id)?;
        let mut player = self.store.get_player(seller)?;
        if player.username != listing.seller {
            return Err(GameError::InvalidCommand(
                "Only the seller can remove this listing".to_string(),
            ));
        }

        inventory::add_item(&mut player, listing.item.clone());
        let mut batch = StoreBatch::new();
        batch.put_player(player)?;
        batch.remove_listing(&listing.id);
        self.store.apply(batch)?;

        info!("{} delisted {}", listing.seller, listing.short_id());
        self.audit(&format!("delist {} {}", listing.seller, listing.id));
        Ok(listing)
    }

    /// All listings, oldest first.
    pub fn list_listings(&self) -> Result<Vec<MarketListing>, GameError> {
        self.store.list_listings()
    }
}
