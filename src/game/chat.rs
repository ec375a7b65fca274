//! Global chat and the slash-command interpreter (`/send`, `/promo`, `/duel`, `/trade`).

use log::{debug, info, warn};
use rand::Rng;

use crate::game::combat::DuelResult;
use crate::game::currency::parse_amount;
use crate::game::engine::Game;
use crate::game::errors::GameError;
use crate::game::inventory;
use crate::game::storage::StoreBatch;
use crate::game::types::{ChatKind, ChatMessage, Currency, Price};
use crate::logutil::escape_log;
use crate::validation::sanitize_chat_text;

/// A parsed line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Send { target: String, amount: u64 },
    Promo { code: String },
    Duel { target: String },
    Trade { target: String, item_id: String, quantity: u32 },
    Say(String),
    /// Malformed or unknown command; carries the message shown to the player.
    Invalid(String),
}

/// Parse chat input. Slash commands are matched case-insensitively; anything that does not
/// start with `/` is plain chat.
pub fn parse_chat_input(text: &str) -> ChatCommand {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ChatCommand::Invalid("Message is empty".to_string());
    }
    if !trimmed.starts_with('/') {
        return ChatCommand::Say(trimmed.to_string());
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let cmd = parts[0].to_uppercase();
    let args = &parts[1..];

    match cmd.as_str() {
        "/SEND" => match args {
            [target, amount] => match parse_amount(amount) {
                Ok(amount) => ChatCommand::Send {
                    target: target.to_string(),
                    amount,
                },
                Err(e) => ChatCommand::Invalid(format!("Invalid amount: {}", e)),
            },
            _ => ChatCommand::Invalid("Usage: /send <player> <amount>".to_string()),
        },
        "/PROMO" => match args {
            [code] => ChatCommand::Promo {
                code: code.to_uppercase(),
            },
            _ => ChatCommand::Invalid("Usage: /promo <code>".to_string()),
        },
        "/DUEL" => match args {
            [target] => ChatCommand::Duel {
                target: target.to_string(),
            },
            _ => ChatCommand::Invalid("Usage: /duel <player>".to_string()),
        },
        "/TRADE" => {
            let quantity = match args.get(2) {
                None => Ok(1),
                Some(raw) => raw
                    .parse::<u32>()
                    .ok()
                    .filter(|q| *q > 0 && raw.chars().all(|c| c.is_ascii_digit()))
                    .ok_or_else(|| format!("Invalid quantity: '{}'", raw)),
            };
            match (args, quantity) {
                ([target, item_id] | [target, item_id, _], Ok(quantity)) => ChatCommand::Trade {
                    target: target.to_string(),
                    item_id: item_id.to_string(),
                    quantity,
                },
                ([_, _] | [_, _, _], Err(e)) => ChatCommand::Invalid(e),
                _ => ChatCommand::Invalid(
                    "Usage: /trade <player> <item_id> [quantity]".to_string(),
                ),
            }
        }
        _ => ChatCommand::Invalid(format!(
            "Unknown command {}. Try /send, /promo, /duel or /trade.",
            parts[0]
        )),
    }
}

/// What a chat line did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Posted(ChatMessage),
    Sent {
        target: String,
        amount: u64,
        balance: u64,
    },
    PromoRedeemed {
        code: String,
        coins: u64,
        gems: u64,
        premium: u64,
    },
    Duel {
        result: DuelResult,
        summary: String,
    },
    Traded {
        target: String,
        item_name: String,
        quantity: u32,
    },
}

impl<R: Rng> Game<R> {
    /// Interpret one line of chat input from `username`.
    pub fn chat(&mut self, username: &str, text: &str) -> Result<ChatOutcome, GameError> {
        let command = parse_chat_input(text);
        debug!("chat from {}: {:?}", username, command);
        match command {
            ChatCommand::Say(text) => self.post_message(username, &text).map(ChatOutcome::Posted),
            ChatCommand::Send { target, amount } => {
                let balance = self.send_coins(username, &target, amount)?;
                Ok(ChatOutcome::Sent {
                    target,
                    amount,
                    balance,
                })
            }
            ChatCommand::Promo { code } => self.redeem_promo(username, &code),
            ChatCommand::Duel { target } => {
                let (result, summary) = self.duel(username, &target)?;
                self.announce(&summary)?;
                Ok(ChatOutcome::Duel { result, summary })
            }
            ChatCommand::Trade {
                target,
                item_id,
                quantity,
            } => {
                let item_name = self.trade(username, &target, &item_id, quantity)?;
                Ok(ChatOutcome::Traded {
                    target,
                    item_name,
                    quantity,
                })
            }
            ChatCommand::Invalid(reason) => {
                warn!("rejected chat command from {}: {}", username, reason);
                Err(GameError::InvalidCommand(reason))
            }
        }
    }

    /// Store a plain chat message with the sender's current level.
    pub fn post_message(&mut self, username: &str, text: &str) -> Result<ChatMessage, GameError> {
        let player = self.store.get_player(username)?;
        let text = sanitize_chat_text(text, self.config.game.max_message_length)
            .map_err(|e| GameError::InvalidCommand(e.to_string()))?;
        let message = ChatMessage::new(&player.display_name, player.level, &text, ChatKind::Player);
        self.store.append_chat(message.clone())?;
        self.store.trim_chat(self.config.game.chat_history_limit)?;
        debug!("{}: {}", player.username, escape_log(&text));
        Ok(message)
    }

    /// Most recent chat lines, oldest first.
    pub fn recent_chat(&self, limit: usize) -> Result<Vec<ChatMessage>, GameError> {
        self.store.recent_chat(limit)
    }

    pub(crate) fn announce(&mut self, text: &str) -> Result<(), GameError> {
        self.store.append_chat(ChatMessage::system(text))?;
        self.store.trim_chat(self.config.game.chat_history_limit)?;
        Ok(())
    }

    /// Transfer coins between players. Returns the sender's remaining coins.
    pub fn send_coins(&mut self, from: &str, to: &str, amount: u64) -> Result<u64, GameError> {
        if amount == 0 {
            return Err(GameError::InvalidCommand(
                "Amount must be greater than zero".to_string(),
            ));
        }
        let mut sender = self.store.get_player(from)?;
        if sender.username.eq_ignore_ascii_case(to.trim()) {
            return Err(GameError::InvalidCommand(
                "You cannot send coins to yourself".to_string(),
            ));
        }
        let mut receiver = self
            .store
            .get_player(to)
            .map_err(|_| GameError::NotFound(format!("player '{}'", to.trim())))?;

        let balance = sender.wallet.debit(&Price::coins(amount))?;
        receiver.wallet.credit(Currency::Coins, amount);

        let summary = format!(
            "💸 {} sent {} coins to {}",
            sender.display_name, amount, receiver.display_name
        );
        let (from_name, to_name) = (sender.username.clone(), receiver.username.clone());
        let mut batch = StoreBatch::new();
        batch.put_player(sender)?;
        batch.put_player(receiver)?;
        self.store.apply(batch)?;

        info!("{} sent {} coins to {}", from_name, amount, to_name);
        self.audit(&format!("send {} {} {}", from_name, to_name, amount));
        self.announce(&summary)?;
        Ok(balance)
    }

    /// Redeem a configured promo code once per player.
    pub fn redeem_promo(&mut self, username: &str, code: &str) -> Result<ChatOutcome, GameError> {
        let promo = self
            .config
            .find_promo(code)
            .cloned()
            .ok_or_else(|| GameError::UnknownPromo(code.trim().to_uppercase()))?;
        let code = promo.code.to_uppercase();

        let mut player = self.store.get_player(username)?;
        if player.redeemed_promos.iter().any(|c| c == &code) {
            return Err(GameError::PromoAlreadyRedeemed);
        }
        player.wallet.credit(Currency::Coins, promo.coins);
        player.wallet.credit(Currency::Gems, promo.gems);
        player.wallet.credit(Currency::Premium, promo.premium);
        player.redeemed_promos.push(code.clone());
        let name = player.username.clone();
        self.store.put_player(player)?;

        info!("{} redeemed promo {}", name, code);
        self.audit(&format!(
            "promo {} {} coins={} gems={} premium={}",
            name, code, promo.coins, promo.gems, promo.premium
        ));
        Ok(ChatOutcome::PromoRedeemed {
            code,
            coins: promo.coins,
            gems: promo.gems,
            premium: promo.premium,
        })
    }

    /// Give `quantity` of an inventory item to another player. Returns the item name.
    pub fn trade(
        &mut self,
        from: &str,
        to: &str,
        item_id: &str,
        quantity: u32,
    ) -> Result<String, GameError> {
        let mut sender = self.store.get_player(from)?;
        if sender.username.eq_ignore_ascii_case(to.trim()) {
            return Err(GameError::InvalidCommand(
                "You cannot trade with yourself".to_string(),
            ));
        }
        let mut receiver = self
            .store
            .get_player(to)
            .map_err(|_| GameError::NotFound(format!("player '{}'", to.trim())))?;

        let stack = sender
            .inventory
            .iter()
            .find(|s| s.item_id.eq_ignore_ascii_case(item_id.trim()))
            .ok_or_else(|| GameError::UnknownItem(item_id.trim().to_string()))?;
        if !stack.tradeable {
            return Err(GameError::NotTradeable(stack.name.clone()));
        }
        let stack_id = stack.item_id.clone();

        let (moved, _) = inventory::remove_item(&mut sender, &stack_id, quantity)?;
        let item_name = moved.name.clone();
        inventory::add_item(&mut receiver, moved);

        let summary = format!(
            "🤝 {} gave {} x{} to {}",
            sender.display_name, item_name, quantity, receiver.display_name
        );
        let (from_name, to_name) = (sender.username.clone(), receiver.username.clone());
        let mut batch = StoreBatch::new();
        batch.put_player(sender)?;
        batch.put_player(receiver)?;
        self.store.apply(batch)?;

        info!("{} traded {} x{} to {}", from_name, stack_id, quantity, to_name);
        self.audit(&format!("trade {} {} {} {}", from_name, to_name, stack_id, quantity));
        self.announce(&summary)?;
        Ok(item_name)
    }
}
