//! Test utilities & fixtures.
//! Every test gets its own sled database inside a temp dir and cheap Argon2 parameters.
#![allow(dead_code)] // each test binary uses a different subset

use pixelshop::config::{Argon2Config, Config, SecurityConfig};
use pixelshop::game::{Catalog, Game, GameStoreBuilder, PlayerRecord, Race};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

pub const PASSWORD: &str = "hunter22";

/// Default config with Argon2 turned down so registration stays fast.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.security = Some(SecurityConfig {
        argon2: Some(Argon2Config {
            memory_kib: Some(256),
            time_cost: Some(1),
            parallelism: Some(1),
        }),
    });
    config
}

pub fn game_with(tmp: &TempDir, config: &Config) -> Game<StdRng> {
    let store = GameStoreBuilder::new(tmp.path().join("db"))
        .open()
        .expect("open store");
    let catalog = Catalog::load_embedded().expect("catalog");
    Game::with_rng(store, catalog, config, StdRng::seed_from_u64(7)).expect("game")
}

pub fn new_game(tmp: &TempDir) -> Game<StdRng> {
    game_with(tmp, &fast_config())
}

pub fn register(game: &mut Game<StdRng>, name: &str) -> PlayerRecord {
    game.register(name, PASSWORD, Race::Human).expect("register")
}
