//! Input validation for account names, passwords and chat text

use std::collections::HashSet;

pub const USERNAME_MIN: usize = 2;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 4;
pub const PASSWORD_MAX: usize = 128;

/// Username validation errors with helpful messages
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("Username is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Username contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("Username is a reserved name")]
    Reserved,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("Password is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("Password is too long (maximum {max} characters)")]
    TooLong { max: usize },
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChatTextError {
    #[error("Message is empty")]
    Empty,
}

/// Names that would read as system output in chat or clash with commands
fn reserved_names() -> HashSet<&'static str> {
    [
        // System/admin terms
        "admin", "administrator", "root", "system", "sysop", "moderator", "server",
        "guest", "anonymous",
        // Shop and command words
        "shop", "market", "send", "promo", "duel", "trade", "help", "login", "logout",
        "register", "quit", "exit",
    ]
    .iter()
    .copied()
    .collect()
}

/// Validate a username: ASCII letters, digits, `_` and `-` only.
/// Returns the trimmed name with its original casing.
pub fn validate_username(username: &str) -> Result<String, UsernameError> {
    let trimmed = username.trim();
    let len = trimmed.chars().count();

    if len < USERNAME_MIN {
        return Err(UsernameError::TooShort { min: USERNAME_MIN });
    }
    if len > USERNAME_MAX {
        return Err(UsernameError::TooLong { max: USERNAME_MAX });
    }

    let mut invalid: Vec<char> = trimmed
        .chars()
        .filter(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        .collect();
    if !invalid.is_empty() {
        invalid.sort_unstable();
        invalid.dedup();
        let chars = invalid
            .into_iter()
            .map(|c| {
                if c.is_control() {
                    format!("\\u{{{:04x}}}", c as u32)
                } else {
                    c.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("");
        return Err(UsernameError::InvalidCharacters { chars });
    }

    if reserved_names().contains(trimmed.to_ascii_lowercase().as_str()) {
        return Err(UsernameError::Reserved);
    }

    Ok(trimmed.to_string())
}

pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN {
        return Err(PasswordError::TooShort { min: PASSWORD_MIN });
    }
    if len > PASSWORD_MAX {
        return Err(PasswordError::TooLong { max: PASSWORD_MAX });
    }
    Ok(())
}

/// Strip control characters, trim, and cut to `max_chars` characters.
pub fn sanitize_chat_text(text: &str, max_chars: usize) -> Result<String, ChatTextError> {
    let cleaned: String = text.chars().filter(|c| !c.is_control()).collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return Err(ChatTextError::Empty);
    }
    Ok(trimmed.chars().take(max_chars).collect())
}
