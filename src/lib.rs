//! # Pixelshop - a pixel-art donation shop with a small RPG attached
//!
//! Players register a hero, buy gear from a fixed catalog with coins, gems or premium
//! currency, hunt generated monsters for experience and loot, duel each other, trade on a
//! player market and talk in a global chat that doubles as a command line
//! (`/send`, `/promo`, `/duel`, `/trade`).
//!
//! Everything is stored locally in a sled database. Donation packs are paid outside the
//! game and delivered by an admin with `pixelshop fulfil`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixelshop::config::Config;
//! use pixelshop::game::{Catalog, CommandProcessor, Game, GameStoreBuilder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = GameStoreBuilder::new(&config.storage.data_dir).open()?;
//!     let catalog = Catalog::load_embedded()?;
//!     let mut processor = CommandProcessor::new(Game::new(store, catalog, &config)?);
//!     println!("{}", processor.banner());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - engine, storage and the interactive command processor
//! - [`config`] - TOML configuration with defaults for every tunable
//! - [`validation`] - username, password and chat text checks
//! - [`logutil`] - helpers that keep user text on one log line

pub mod config;
pub mod game;
pub mod logutil;
pub mod validation;
