use thiserror::Error;

use crate::game::types::Currency;

/// Errors raised by the game engine and its storage layer.
///
/// Apart from the storage wrappers, variants are user-facing: their `Display` text is what
/// the player sees when an action is rejected.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed or config JSON could not be parsed.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Returned when fetching a record that is not present.
    #[error("not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Balance does not cover the requested spend.
    #[error("not enough {currency}: need {needed}, have {available}")]
    InsufficientFunds {
        currency: Currency,
        needed: u64,
        available: u64,
    },

    /// Malformed chat command or invalid argument.
    #[error("{0}")]
    InvalidCommand(String),

    /// Catalog or inventory item id does not exist.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("wrong username or password")]
    InvalidCredentials,

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("{0} cannot be traded")]
    NotTradeable(String),

    #[error("{0} cannot be equipped")]
    NotEquippable(String),

    #[error("{0} cannot be used")]
    NotUsable(String),

    #[error("promo code already redeemed")]
    PromoAlreadyRedeemed,

    #[error("unknown promo code: {0}")]
    UnknownPromo(String),

    #[error("log in first")]
    NotLoggedIn,

    #[error("no active battle")]
    NoActiveBattle,

    #[error("finish the current battle first")]
    BattleInProgress,

    /// Argon2 hashing or PHC string parsing failure.
    #[error("password hash failure: {0}")]
    PasswordHash(String),

    #[error("config error: {0}")]
    Config(String),
}

impl GameError {
    /// True when the error describes a rejected player action rather than an engine fault.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            GameError::Sled(_)
                | GameError::Bincode(_)
                | GameError::Io(_)
                | GameError::InvalidData(_)
                | GameError::SchemaMismatch { .. }
                | GameError::PasswordHash(_)
                | GameError::Config(_)
        )
    }
}
