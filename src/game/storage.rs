use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;
use sled::IVec;

use crate::game::accounts::demo_players;
use crate::game::errors::GameError;
use crate::game::types::{
    ChatMessage, MarketListing, PlayerRecord, CHAT_SCHEMA_VERSION, MARKET_SCHEMA_VERSION,
    PLAYER_SCHEMA_VERSION,
};

const TREE_PRIMARY: &str = "pixelshop";
const TREE_CHAT: &str = "pixelshop_chat";
const TREE_LOGS: &str = "pixelshop_logs";

const PLAYER_PREFIX: &str = "players:";
const LISTING_PREFIX: &str = "market:";

/// Audit lines kept in the logs tree; older lines are dropped on append.
pub const AUDIT_LOG_LIMIT: usize = 10_000;

fn next_timestamp_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000)
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct GameStoreBuilder {
    path: PathBuf,
    seed_demo_players: bool,
}

impl GameStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed_demo_players: false,
        }
    }

    /// Insert the static "other players" rows when the store has no players yet.
    pub fn with_demo_players(mut self) -> Self {
        self.seed_demo_players = true;
        self
    }

    pub fn open(self) -> Result<GameStore, GameError> {
        GameStore::open_with_options(self.path, self.seed_demo_players)
    }
}

/// Multi-record write applied atomically to the primary tree.
///
/// Transfers touch two players and sometimes a listing; all of them land in one batch.
#[derive(Default)]
pub struct StoreBatch {
    batch: sled::Batch,
    staged: usize,
}

impl StoreBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_player(&mut self, mut player: PlayerRecord) -> Result<(), GameError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        player.touch();
        let bytes = GameStore::serialize(&player)?;
        self.batch.insert(GameStore::player_key(&player.username), bytes);
        self.staged += 1;
        Ok(())
    }

    pub fn put_listing(&mut self, mut listing: MarketListing) -> Result<(), GameError> {
        listing.schema_version = MARKET_SCHEMA_VERSION;
        let bytes = GameStore::serialize(&listing)?;
        self.batch.insert(GameStore::listing_key(&listing.id), bytes);
        self.staged += 1;
        Ok(())
    }

    pub fn remove_listing(&mut self, listing_id: &str) {
        self.batch.remove(GameStore::listing_key(listing_id));
        self.staged += 1;
    }

    pub fn len(&self) -> usize {
        self.staged
    }

    pub fn is_empty(&self) -> bool {
        self.staged == 0
    }
}

/// Sled-backed persistence for players, chat, market listings and the audit log.
pub struct GameStore {
    _db: sled::Db,
    primary: sled::Tree,
    chat: sled::Tree,
    logs: sled::Tree,
}

impl GameStore {
    /// Open (or create) the store rooted at `path` without seeding.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        Self::open_with_options(path, false)
    }

    fn open_with_options<P: AsRef<Path>>(path: P, seed_players: bool) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        let chat = db.open_tree(TREE_CHAT)?;
        let logs = db.open_tree(TREE_LOGS)?;
        let store = Self {
            _db: db,
            primary,
            chat,
            logs,
        };

        if seed_players {
            let inserted = store.seed_demo_players_if_needed()?;
            if inserted > 0 {
                debug!("Seeded {} demo players at {}", inserted, path_ref.display());
            }
        }

        Ok(store)
    }

    fn player_key(username: &str) -> Vec<u8> {
        format!("{}{}", PLAYER_PREFIX, username.to_ascii_lowercase()).into_bytes()
    }

    fn listing_key(listing_id: &str) -> Vec<u8> {
        format!("{}{}", LISTING_PREFIX, listing_id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, GameError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    fn check_player(record: PlayerRecord) -> Result<PlayerRecord, GameError> {
        if record.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    // ------------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------------

    /// Insert or update a player record (last write wins).
    pub fn put_player(&self, mut player: PlayerRecord) -> Result<(), GameError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        player.touch();
        let key = Self::player_key(&player.username);
        let bytes = Self::serialize(&player)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    /// Fetch a player record by username (case-insensitive).
    pub fn get_player(&self, username: &str) -> Result<PlayerRecord, GameError> {
        let key = Self::player_key(username);
        let Some(bytes) = self.primary.get(&key)? else {
            return Err(GameError::NotFound(format!("player: {}", username)));
        };
        Self::check_player(Self::deserialize(bytes)?)
    }

    pub fn player_exists(&self, username: &str) -> Result<bool, GameError> {
        Ok(self.primary.contains_key(Self::player_key(username))?)
    }

    /// List all stored usernames in key order.
    pub fn list_player_ids(&self) -> Result<Vec<String>, GameError> {
        let mut ids = Vec::new();
        for entry in self.primary.scan_prefix(PLAYER_PREFIX.as_bytes()) {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(username) = text.strip_prefix(PLAYER_PREFIX) {
                ids.push(username.to_string());
            }
        }
        Ok(ids)
    }

    pub fn list_players(&self) -> Result<Vec<PlayerRecord>, GameError> {
        self.primary
            .scan_prefix(PLAYER_PREFIX.as_bytes())
            .map(|entry| -> Result<PlayerRecord, GameError> {
                let (_, value) = entry?;
                Self::check_player(Self::deserialize(value)?)
            })
            .collect()
    }

    pub fn seed_demo_players_if_needed(&self) -> Result<usize, GameError> {
        if self
            .primary
            .scan_prefix(PLAYER_PREFIX.as_bytes())
            .next()
            .is_some()
        {
            return Ok(0);
        }
        let mut batch = StoreBatch::new();
        for player in demo_players() {
            batch.put_player(player)?;
        }
        let inserted = batch.len();
        self.apply(batch)?;
        Ok(inserted)
    }

    // ------------------------------------------------------------------------
    // Market
    // ------------------------------------------------------------------------

    /// Resolve a full id or a unique id prefix (players type the short form).
    pub fn find_listing(&self, id_or_prefix: &str) -> Result<MarketListing, GameError> {
        let needle = id_or_prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(GameError::NotFound("listing: (empty)".to_string()));
        }
        let mut matches = self
            .list_listings()?
            .into_iter()
            .filter(|listing| listing.id.starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(listing), None) => Ok(listing),
            (Some(_), Some(_)) => Err(GameError::InvalidCommand(format!(
                "Listing id '{}' is ambiguous",
                id_or_prefix
            ))),
            (None, _) => Err(GameError::NotFound(format!("listing: {}", id_or_prefix))),
        }
    }

    /// All listings, oldest first.
    pub fn list_listings(&self) -> Result<Vec<MarketListing>, GameError> {
        let mut listings: Vec<MarketListing> = self
            .primary
            .scan_prefix(LISTING_PREFIX.as_bytes())
            .map(|entry| -> Result<MarketListing, GameError> {
                let (_, value) = entry?;
                Self::deserialize(value)
            })
            .collect::<Result<_, GameError>>()?;
        listings.sort_by(|a, b| a.listed_at.cmp(&b.listed_at).then_with(|| a.id.cmp(&b.id)));
        Ok(listings)
    }

    /// Apply a staged batch atomically and flush.
    pub fn apply(&self, batch: StoreBatch) -> Result<(), GameError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.primary.apply_batch(batch.batch)?;
        self.primary.flush()?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------------

    /// Append a chat message; keys sort by arrival time.
    pub fn append_chat(&self, mut message: ChatMessage) -> Result<(), GameError> {
        message.schema_version = CHAT_SCHEMA_VERSION;
        let key = format!("chat:{:020}:{}", next_timestamp_nanos(), message.id).into_bytes();
        let bytes = Self::serialize(&message)?;
        self.chat.insert(key, bytes)?;
        self.chat.flush()?;
        Ok(())
    }

    /// The most recent `limit` messages, oldest first.
    pub fn recent_chat(&self, limit: usize) -> Result<Vec<ChatMessage>, GameError> {
        let mut messages: Vec<ChatMessage> = self
            .chat
            .iter()
            .rev()
            .take(limit)
            .map(|entry| -> Result<ChatMessage, GameError> {
                let (_, value) = entry?;
                Self::deserialize(value)
            })
            .collect::<Result<_, GameError>>()?;
        messages.reverse();
        Ok(messages)
    }

    /// Drop the oldest messages beyond `max_messages`.
    pub fn trim_chat(&self, max_messages: usize) -> Result<usize, GameError> {
        Self::trim_oldest(&self.chat, max_messages)
    }

    /// Keys sort by time, so the oldest entries come first in iteration order.
    fn trim_oldest(tree: &sled::Tree, keep: usize) -> Result<usize, GameError> {
        let total = tree.len();
        if total <= keep {
            return Ok(0);
        }
        let keys: Vec<IVec> = tree
            .iter()
            .keys()
            .take(total - keep)
            .collect::<Result<_, sled::Error>>()?;
        for key in &keys {
            tree.remove(key)?;
        }
        tree.flush()?;
        Ok(keys.len())
    }

    // ------------------------------------------------------------------------
    // Audit log
    // ------------------------------------------------------------------------

    /// Append a line to the transaction audit log, keeping the newest `AUDIT_LOG_LIMIT` lines.
    pub fn append_log(&self, message: &str) -> Result<(), GameError> {
        self.append_log_capped(message, AUDIT_LOG_LIMIT)
    }

    pub fn append_log_capped(&self, message: &str, keep: usize) -> Result<(), GameError> {
        let key = format!("logs:{:020}:{}", next_timestamp_nanos(), uuid::Uuid::new_v4()).into_bytes();
        self.logs.insert(key, message.as_bytes())?;
        Self::trim_oldest(&self.logs, keep)?;
        self.logs.flush()?;
        Ok(())
    }

    /// The most recent `limit` audit lines, oldest first.
    pub fn recent_logs(&self, limit: usize) -> Result<Vec<String>, GameError> {
        let mut lines: Vec<String> = self
            .logs
            .iter()
            .values()
            .rev()
            .take(limit)
            .map(|value| -> Result<String, GameError> {
                let value = value?;
                Ok(std::str::from_utf8(&value)
                    .map_err(|e| GameError::InvalidData(e.to_string()))?
                    .to_string())
            })
            .collect::<Result<_, GameError>>()?;
        lines.reverse();
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{
        ChatKind, InventoryItem, ItemCategory, Race, Rarity, StatBonus, Wallet,
    };
    use tempfile::TempDir;

    fn sample_item() -> InventoryItem {
        InventoryItem {
            item_id: "iron_sword".to_string(),
            name: "Iron Sword".to_string(),
            icon: "⚔️".to_string(),
            category: ItemCategory::Weapon,
            rarity: Rarity::Common,
            bonus: StatBonus::new(12, 0, 0),
            quantity: 1,
            equipped: false,
            tradeable: true,
        }
    }

    #[test]
    fn store_round_trip_player() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        let mut player = PlayerRecord::new("Alice", "hash", Race::Elf, Wallet::new(100, 10, 0));
        player.weekly_score = 42;
        store.put_player(player.clone()).expect("put");
        let fetched = store.get_player("ALICE").expect("get");
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.weekly_score, 42);
        assert_eq!(fetched.schema_version, PLAYER_SCHEMA_VERSION);
        assert!(store.player_exists("alice").unwrap());
        assert!(matches!(store.get_player("bob"), Err(GameError::NotFound(_))));
    }

    #[test]
    fn demo_players_seed_only_once() {
        let dir = TempDir::new().expect("tempdir");
        {
            let store = GameStoreBuilder::new(dir.path())
                .with_demo_players()
                .open()
                .expect("store");
            let ids = store.list_player_ids().expect("list players");
            assert_eq!(ids.len(), demo_players().len());
        }
        let store = GameStoreBuilder::new(dir.path()).open().expect("reopen");
        assert_eq!(store.seed_demo_players_if_needed().unwrap(), 0);
    }

    #[test]
    fn batch_writes_players_and_listings_together() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStore::open(dir.path()).expect("store");
        let listing = MarketListing::new("alice", sample_item(), 80);
        let listing_id = listing.id.clone();

        let mut batch = StoreBatch::new();
        batch
            .put_player(PlayerRecord::new("alice", "", Race::Human, Wallet::default()))
            .unwrap();
        batch.put_listing(listing).unwrap();
        assert_eq!(batch.len(), 2);
        store.apply(batch).unwrap();

        assert!(store.player_exists("alice").unwrap());
        let found = store.find_listing(&listing_id[..8]).unwrap();
        assert_eq!(found.price, 80);
        // listings share the primary tree but never show up as players
        assert_eq!(store.list_player_ids().unwrap(), vec!["alice".to_string()]);

        let mut batch = StoreBatch::new();
        batch.remove_listing(&listing_id);
        store.apply(batch).unwrap();
        assert!(store.list_listings().unwrap().is_empty());
    }

    #[test]
    fn chat_history_is_trimmed_oldest_first() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStore::open(dir.path()).expect("store");
        for i in 0..5 {
            store
                .append_chat(ChatMessage::new("alice", 1, &format!("msg {}", i), ChatKind::Player))
                .unwrap();
        }
        assert_eq!(store.trim_chat(3).unwrap(), 2);
        let recent = store.recent_chat(10).unwrap();
        let texts: Vec<&str> = recent.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["msg 2", "msg 3", "msg 4"]);
        assert_eq!(store.recent_chat(1).unwrap()[0].text, "msg 4");
    }

    #[test]
    fn audit_log_keeps_order() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStore::open(dir.path()).expect("store");
        store.append_log("first").unwrap();
        store.append_log("second").unwrap();
        assert_eq!(store.recent_logs(5).unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn audit_log_is_capped_and_keeps_every_line() {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStore::open(dir.path()).expect("store");
        for i in 0..50 {
            store.append_log_capped(&format!("line {}", i), 20).unwrap();
        }
        let lines = store.recent_logs(100).unwrap();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.starts_with("line ")));
        assert!(lines.contains(&"line 49".to_string()));
        assert!(!lines.contains(&"line 0".to_string()));
    }
}
