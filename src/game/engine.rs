//! The `Game` facade: a store, the catalog, tuning and a random source.
//!
//! Each module contributes its own `impl<R: Rng> Game<R>` block (shop, market, chat, combat,
//! accounts, leaderboard, donation), so this file only holds shared plumbing.

use argon2::Argon2;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::game::accounts::build_argon2;
use crate::game::catalog::Catalog;
use crate::game::errors::GameError;
use crate::game::storage::GameStore;
use crate::game::types::{PlayerRecord, Wallet};

pub struct Game<R: Rng = StdRng> {
    pub(crate) store: GameStore,
    pub(crate) catalog: Catalog,
    pub(crate) config: Config,
    pub(crate) rng: R,
    pub(crate) argon2: Argon2<'static>,
}

impl Game<StdRng> {
    pub fn new(store: GameStore, catalog: Catalog, config: &Config) -> Result<Self, GameError> {
        Self::with_rng(store, catalog, config, StdRng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    /// Build with an explicit random source; tests pass a seeded `StdRng`.
    /// Rejects tuning that the combat rolls cannot use (probabilities outside 0..=1).
    pub fn with_rng(store: GameStore, catalog: Catalog, config: &Config, rng: R) -> Result<Self, GameError> {
        config
            .game
            .validate()
            .map_err(|e| GameError::Config(e.to_string()))?;
        Ok(Self {
            store,
            catalog,
            argon2: build_argon2(config.argon2()),
            config: config.clone(),
            rng,
        })
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn player(&self, username: &str) -> Result<PlayerRecord, GameError> {
        self.store.get_player(username)
    }

    pub fn balance(&self, username: &str) -> Result<Wallet, GameError> {
        Ok(self.store.get_player(username)?.wallet)
    }

    /// Record a transaction line. A failed audit write never undoes the action it describes.
    pub(crate) fn audit(&self, line: &str) {
        if let Err(e) = self.store.append_log(line) {
            warn!("audit log write failed: {}", e);
        }
    }
}
