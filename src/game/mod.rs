//! Pixel shop game engine: player records, the item catalog, combat, chat commands and
//! the sled-backed store that persists them.

pub mod accounts;
pub mod catalog;
pub mod chat;
pub mod combat;
pub mod commands;
pub mod currency;
pub mod donation;
pub mod engine;
pub mod errors;
pub mod inventory;
pub mod leaderboard;
pub mod market;
pub mod progression;
pub mod session;
pub mod shop;
pub mod storage;
pub mod types;

pub use accounts::{build_argon2, demo_players, hash_password, verify_password};
pub use catalog::Catalog;
pub use chat::{parse_chat_input, ChatCommand, ChatOutcome};
pub use combat::{
    resolve_duel, AttackOutcome, AttackReport, Battle, BattleOutcome, DuelResult, DuelSide,
    VictoryReport,
};
pub use commands::{parse_command, AuthRequest, CommandProcessor, GameCommand, Reply};
pub use currency::{format_amount, format_price, format_wallet, parse_amount};
pub use donation::{find_donation, DonationItem, Fulfilment, DONATION_ITEMS};
pub use engine::Game;
pub use errors::GameError;
pub use inventory::{effective_stats, EffectiveStats};
pub use leaderboard::{format_board, Board};
pub use progression::{grant_experience, level_threshold};
pub use session::Session;
pub use shop::{format_shop_listing, Receipt};
pub use storage::{GameStore, GameStoreBuilder, StoreBatch};
pub use types::*;
