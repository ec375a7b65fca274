//! Command parsing and the interactive processor behind `pixelshop play`.
//!
//! Two screens share one processor: the auth screen (REGISTER, LOGIN) and the game screen.
//! Passwords never travel through a command line; LOGIN and REGISTER return a
//! [`Reply::PasswordPrompt`] and the caller finishes with [`CommandProcessor::complete_auth`].

use chrono::Utc;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

use crate::game::chat::ChatOutcome;
use crate::game::combat::AttackOutcome;
use crate::game::currency::{format_amount, format_price, format_wallet, parse_amount};
use crate::game::donation::{self, DONATION_ITEMS};
use crate::game::engine::Game;
use crate::game::errors::GameError;
use crate::game::inventory::{effective_stats, format_inventory};
use crate::game::leaderboard::{format_board, Board};
use crate::game::market::format_listing;
use crate::game::progression::level_threshold;
use crate::game::session::Session;
use crate::game::shop::format_shop_listing;
use crate::game::types::{Currency, ItemCategory, Race};
use crate::logutil::escape_log;

const LEADERBOARD_SIZE: usize = 10;
const DEFAULT_HISTORY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    // Auth screen
    Register { username: String, race: String }, // REGISTER name race
    Login(String),                               // LOGIN name

    // Shop and inventory
    Shop(Option<String>),                        // SHOP, SHOP weapon
    Buy { item_id: String, quantity: u32 },      // BUY iron_sword [2]
    Inventory,                                   // I, INV
    Equip(String),
    Unequip(String),
    Use(String),
    Stats,

    // Combat
    Fight,
    Attack, // A
    Flee,

    // Market
    Sell { item_id: String, price: u64 }, // SELL item price
    Market,
    Purchase(String), // PURCHASE listing-id
    Delist(String),

    // Social
    Chat(String), // SAY text, or any line starting with '/'
    History(usize),
    Top(Option<String>),
    Donate(Option<u32>),

    // System
    Help,
    Logout,
    Quit,

    /// Wrong arguments for a known verb; carries the usage line.
    Usage(&'static str),
    Unknown(String),
}

/// Parse one input line. Only the verb is case-insensitive; arguments keep their case.
pub fn parse_command(input: &str) -> GameCommand {
    let input = input.trim();
    if input.starts_with('/') {
        return GameCommand::Chat(input.to_string());
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(first) = parts.first() else {
        return GameCommand::Unknown(String::new());
    };
    let verb = first.to_uppercase();
    let args = &parts[1..];

    match verb.as_str() {
        "REGISTER" | "REG" => match args {
            [username, race] => GameCommand::Register {
                username: username.to_string(),
                race: race.to_string(),
            },
            _ => GameCommand::Usage("Usage: REGISTER <name> <human|elf|dwarf|orc>"),
        },
        "LOGIN" => match args {
            [username] => GameCommand::Login(username.to_string()),
            _ => GameCommand::Usage("Usage: LOGIN <name>"),
        },
        "SHOP" => match args {
            [] => GameCommand::Shop(None),
            [category] => GameCommand::Shop(Some(category.to_string())),
            _ => GameCommand::Usage("Usage: SHOP [category]"),
        },
        "BUY" => match args {
            [item_id] => GameCommand::Buy {
                item_id: item_id.to_string(),
                quantity: 1,
            },
            [item_id, qty] => match qty.parse::<u32>() {
                Ok(quantity) if quantity > 0 => GameCommand::Buy {
                    item_id: item_id.to_string(),
                    quantity,
                },
                _ => GameCommand::Usage("Usage: BUY <item_id> [quantity]"),
            },
            _ => GameCommand::Usage("Usage: BUY <item_id> [quantity]"),
        },
        "I" | "INV" | "INVENTORY" => GameCommand::Inventory,
        "EQUIP" | "WEAR" => match args {
            [item_id] => GameCommand::Equip(item_id.to_string()),
            _ => GameCommand::Usage("Usage: EQUIP <item_id>"),
        },
        "UNEQUIP" | "REMOVE" => match args {
            [item_id] => GameCommand::Unequip(item_id.to_string()),
            _ => GameCommand::Usage("Usage: UNEQUIP <item_id>"),
        },
        "USE" | "DRINK" | "EAT" => match args {
            [item_id] => GameCommand::Use(item_id.to_string()),
            _ => GameCommand::Usage("Usage: USE <item_id>"),
        },
        "STATS" | "SCORE" => GameCommand::Stats,
        "FIGHT" | "HUNT" => GameCommand::Fight,
        "A" | "ATTACK" => GameCommand::Attack,
        "FLEE" | "RUN" => GameCommand::Flee,
        "SELL" => match args {
            [item_id, price] => match parse_amount(price) {
                Ok(price) => GameCommand::Sell {
                    item_id: item_id.to_string(),
                    price,
                },
                Err(_) => GameCommand::Usage("Usage: SELL <item_id> <price in coins>"),
            },
            _ => GameCommand::Usage("Usage: SELL <item_id> <price in coins>"),
        },
        "MARKET" | "M" => GameCommand::Market,
        "PURCHASE" => match args {
            [id] => GameCommand::Purchase(id.to_string()),
            _ => GameCommand::Usage("Usage: PURCHASE <listing_id>"),
        },
        "DELIST" => match args {
            [id] => GameCommand::Delist(id.to_string()),
            _ => GameCommand::Usage("Usage: DELIST <listing_id>"),
        },
        "SAY" | "'" => {
            // Keep the original spacing of the message body.
            let body = input[first.len()..].trim();
            if body.is_empty() {
                GameCommand::Usage("Usage: SAY <message>")
            } else {
                GameCommand::Chat(body.to_string())
            }
        }
        "HISTORY" | "CHAT" => match args {
            [] => GameCommand::History(DEFAULT_HISTORY),
            [n] => match n.parse::<usize>() {
                Ok(n) if n > 0 => GameCommand::History(n),
                _ => GameCommand::Usage("Usage: HISTORY [count]"),
            },
            _ => GameCommand::Usage("Usage: HISTORY [count]"),
        },
        "TOP" | "LEADERBOARD" => match args {
            [] => GameCommand::Top(None),
            [board] => GameCommand::Top(Some(board.to_string())),
            _ => GameCommand::Usage("Usage: TOP [level|weekly|pvp]"),
        },
        "DONATE" => match args {
            [] => GameCommand::Donate(None),
            [id] => match id.trim_start_matches('#').parse::<u32>() {
                Ok(id) => GameCommand::Donate(Some(id)),
                Err(_) => GameCommand::Usage("Usage: DONATE [pack number]"),
            },
            _ => GameCommand::Usage("Usage: DONATE [pack number]"),
        },
        "H" | "HELP" | "?" => GameCommand::Help,
        "LOGOUT" => GameCommand::Logout,
        "Q" | "QUIT" | "EXIT" => GameCommand::Quit,
        _ => GameCommand::Unknown(first.to_string()),
    }
}

/// Credentials still missing a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    Register { username: String, race: Race },
    Login { username: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    PasswordPrompt(AuthRequest),
    /// Print the text and leave the loop.
    Quit(String),
}

/// One player's interactive session over a shared [`Game`].
pub struct CommandProcessor<R: Rng = StdRng> {
    game: Game<R>,
    session: Session,
}

impl<R: Rng> CommandProcessor<R> {
    pub fn new(game: Game<R>) -> Self {
        Self {
            game,
            session: Session::new(),
        }
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn banner(&self) -> String {
        "*** Welcome to the Pixel Shop! ***\n\
         REGISTER <name> <race> to create a hero, LOGIN <name> to continue.\n\
         Type HELP for commands."
            .to_string()
    }

    pub fn prompt(&self) -> String {
        match self.session.username() {
            Ok(name) if self.session.in_battle() => format!("{} ⚔️> ", name),
            Ok(name) => format!("{}> ", name),
            Err(_) => "> ".to_string(),
        }
    }

    /// Handle one line. Rejected player actions come back as text; engine faults as `Err`.
    pub fn process(&mut self, input: &str) -> Result<Reply, GameError> {
        let command = parse_command(input);
        debug!("command parsed: input={} command={:?}", escape_log(input), command);

        match self.dispatch(command) {
            Ok(reply) => Ok(reply),
            Err(e) if e.is_user_error() => Ok(Reply::Text(format!("❌ {}", e))),
            Err(e) => Err(e),
        }
    }

    /// Finish a REGISTER or LOGIN once the password has been read.
    pub fn complete_auth(&mut self, request: AuthRequest, password: &str) -> Result<String, GameError> {
        let result = match request {
            AuthRequest::Register { username, race } => self
                .game
                .register(&username, password, race)
                .map(|player| {
                    format!(
                        "🎉 Welcome, {} the {}! You start with {}.\nType HELP to see what you can do.",
                        player.display_name,
                        player.race,
                        format_wallet(&player.wallet)
                    )
                })
                .map(|text| (text, username)),
            AuthRequest::Login { username } => self
                .game
                .login(&username, password)
                .map(|player| {
                    format!(
                        "👋 Welcome back, {} (level {}). {}",
                        player.display_name,
                        player.level,
                        format_wallet(&player.wallet)
                    )
                })
                .map(|text| (text, username)),
        };

        match result {
            Ok((text, username)) => {
                self.session.login(username.trim());
                Ok(text)
            }
            Err(e) if e.is_user_error() => Ok(format!("❌ {}", e)),
            Err(e) => Err(e),
        }
    }

    fn dispatch(&mut self, command: GameCommand) -> Result<Reply, GameError> {
        let text = match command {
            GameCommand::Register { username, race } => return self.handle_register(username, &race),
            GameCommand::Login(username) => return self.handle_login(username),
            GameCommand::Quit => return Ok(Reply::Quit(self.handle_quit())),
            GameCommand::Help => self.handle_help(),
            GameCommand::Usage(usage) => usage.to_string(),
            GameCommand::Unknown(cmd) if cmd.is_empty() => String::new(),
            GameCommand::Unknown(cmd) => format!(
                "Unknown command: '{}'\nType HELP for available commands.",
                cmd
            ),
            GameCommand::Shop(category) => self.handle_shop(category)?,
            GameCommand::Buy { item_id, quantity } => self.handle_buy(&item_id, quantity)?,
            GameCommand::Inventory => self.handle_inventory()?,
            GameCommand::Equip(item_id) => self.handle_equip(&item_id)?,
            GameCommand::Unequip(item_id) => self.handle_unequip(&item_id)?,
            GameCommand::Use(item_id) => self.handle_use(&item_id)?,
            GameCommand::Stats => self.handle_stats()?,
            GameCommand::Fight => self.handle_fight()?,
            GameCommand::Attack => self.handle_attack()?,
            GameCommand::Flee => self.handle_flee()?,
            GameCommand::Sell { item_id, price } => self.handle_sell(&item_id, price)?,
            GameCommand::Market => self.handle_market()?,
            GameCommand::Purchase(id) => self.handle_purchase(&id)?,
            GameCommand::Delist(id) => self.handle_delist(&id)?,
            GameCommand::Chat(text) => self.handle_chat(&text)?,
            GameCommand::History(limit) => self.handle_history(limit)?,
            GameCommand::Top(board) => self.handle_top(board)?,
            GameCommand::Donate(id) => self.handle_donate(id)?,
            GameCommand::Logout => self.handle_logout()?,
        };
        Ok(Reply::Text(text))
    }

    fn require_logged_out(&self) -> Result<(), GameError> {
        if self.session.is_playing() {
            return Err(GameError::InvalidCommand("LOGOUT first".to_string()));
        }
        Ok(())
    }

    fn handle_register(&mut self, username: String, race: &str) -> Result<Reply, GameError> {
        self.require_logged_out()?;
        let race: Race = race.parse()?;
        Ok(Reply::PasswordPrompt(AuthRequest::Register { username, race }))
    }

    fn handle_login(&mut self, username: String) -> Result<Reply, GameError> {
        self.require_logged_out()?;
        Ok(Reply::PasswordPrompt(AuthRequest::Login { username }))
    }

    fn handle_quit(&mut self) -> String {
        if let Some(username) = self.session.logout() {
            info!("{} left the game", username);
        }
        "Goodbye! Thanks for visiting the Pixel Shop.".to_string()
    }

    fn handle_logout(&mut self) -> Result<String, GameError> {
        let username = self.session.logout().ok_or(GameError::NotLoggedIn)?;
        info!("{} logged out", username);
        Ok(format!("👋 See you soon, {}.", username))
    }

    fn handle_help(&self) -> String {
        if !self.session.is_playing() {
            return "=== Pixel Shop ===\n\
                    REGISTER <name> <race>  create a hero (human, elf, dwarf, orc)\n\
                    LOGIN <name>            sign in\n\
                    TOP [board]             leaderboards (level, weekly, pvp)\n\
                    DONATE [n]              support packs\n\
                    QUIT                    leave"
                .to_string();
        }
        "=== Commands ===\n\
         SHOP [category]     browse the catalog\n\
         BUY <id> [qty]      buy from the shop\n\
         I / STATS           inventory and character sheet\n\
         EQUIP/UNEQUIP <id>  manage gear\n\
         USE <id>            drink a potion or eat food\n\
         FIGHT, A, FLEE      hunt monsters\n\
         SELL <id> <price>   list an item on the market\n\
         MARKET, PURCHASE <id>, DELIST <id>\n\
         SAY <text>          talk in global chat\n\
         /send <player> <amount>, /promo <code>, /duel <player>, /trade <player> <id> [qty]\n\
         HISTORY [n]         recent chat\n\
         TOP [board]         leaderboards\n\
         DONATE [n]          support packs\n\
         LOGOUT, QUIT"
            .to_string()
    }

    fn handle_shop(&self, category: Option<String>) -> Result<String, GameError> {
        let category = category.map(|c| c.parse::<ItemCategory>()).transpose()?;
        let mut lines = format_shop_listing(self.game.catalog(), category);
        if category.is_none() {
            let names: Vec<&str> = self
                .game
                .catalog()
                .categories()
                .iter()
                .map(|c| c.as_str())
                .collect();
            lines.push(format!("Categories: {} (SHOP <category> to filter)", names.join(", ")));
        }
        Ok(lines.join("\n"))
    }

    fn handle_buy(&mut self, item_id: &str, quantity: u32) -> Result<String, GameError> {
        let username = self.session.username()?;
        let receipt = self.game.buy(username, item_id, quantity)?;
        let what = if receipt.quantity > 1 {
            format!("{} x {}", receipt.quantity, receipt.item_name)
        } else {
            receipt.item_name.clone()
        };
        Ok(format!(
            "✅ Bought {} for {}. Remaining: {}",
            what,
            format_price(&receipt.total),
            format_amount(receipt.new_balance, receipt.total.currency)
        ))
    }

    fn handle_inventory(&self) -> Result<String, GameError> {
        let player = self.game.player(self.session.username()?)?;
        let mut lines = vec!["=== Inventory ===".to_string()];
        lines.extend(format_inventory(&player));
        lines.push(format_wallet(&player.wallet));
        Ok(lines.join("\n"))
    }

    fn item_name(&self, item_id: &str) -> String {
        self.game
            .catalog()
            .get(item_id)
            .map(|item| item.name.clone())
            .unwrap_or_else(|| item_id.to_string())
    }

    fn handle_equip(&mut self, item_id: &str) -> Result<String, GameError> {
        let username = self.session.username()?;
        let replaced = self.game.equip_item(username, item_id)?;
        let name = self.item_name(item_id);
        Ok(match replaced {
            Some(old) => format!("🛡️ Equipped {} (replaced {}).", name, old),
            None => format!("🛡️ Equipped {}.", name),
        })
    }

    fn handle_unequip(&mut self, item_id: &str) -> Result<String, GameError> {
        let username = self.session.username()?;
        self.game.unequip_item(username, item_id)?;
        Ok(format!("Unequipped {}.", self.item_name(item_id)))
    }

    fn handle_use(&mut self, item_id: &str) -> Result<String, GameError> {
        let username = self.session.username()?;
        let healed = self.game.consume_item(username, item_id)?;
        let player = self.game.player(username)?;
        let max = effective_stats(&player).max_health;
        Ok(format!(
            "🧪 Used {}: +{} HP ({}/{})",
            self.item_name(item_id),
            healed,
            player.health,
            max
        ))
    }

    fn handle_stats(&self) -> Result<String, GameError> {
        let player = self.game.player(self.session.username()?)?;
        let stats = effective_stats(&player);
        let vip = match player.vip_until {
            Some(until) if player.is_vip(Utc::now()) => {
                format!("VIP until {}", until.format("%Y-%m-%d"))
            }
            _ => "no VIP".to_string(),
        };
        Ok(format!(
            "=== {} the {} ===\n\
             Level {} ({} / {} xp)\n\
             HP {}/{}  ATK {} (+{})  DEF {} (+{})\n\
             PvP {}W / {}L  Weekly {} pts\n\
             {}\n\
             {}",
            player.display_name,
            player.race,
            player.level,
            player.experience,
            level_threshold(player.level),
            player.health,
            stats.max_health,
            stats.attack,
            stats.attack - player.attack,
            stats.defense,
            stats.defense - player.defense,
            player.pvp_wins,
            player.pvp_losses,
            player.weekly_score,
            format_wallet(&player.wallet),
            vip
        ))
    }

    fn handle_fight(&mut self) -> Result<String, GameError> {
        let username = self.session.username()?.to_string();
        if self.session.in_battle() {
            return Err(GameError::BattleInProgress);
        }
        let battle = self.game.start_battle(&username)?;
        let mob = &battle.mob;
        let text = format!(
            "{} {} (L{}) appears! HP {} ATK {} DEF {}\nA to attack, FLEE to run.",
            if mob.is_boss { "👹 BOSS" } else { "👾" },
            mob.name,
            mob.level,
            mob.health,
            mob.attack,
            mob.defense
        );
        self.session.begin_battle(battle)?;
        Ok(text)
    }

    fn handle_attack(&mut self) -> Result<String, GameError> {
        let (username, battle) = self.session.battle_mut()?;
        let report = self.game.attack(username, battle)?;
        let mob_name = battle.mob.name.clone();

        let mut lines = vec![format!(
            "⚔️ You hit {} for {} ({} HP left).",
            mob_name, report.round.player_damage, report.mob_health
        )];
        if let Some(dmg) = report.round.mob_damage {
            lines.push(format!(
                "💥 {} hits you for {} ({} HP left).",
                mob_name, dmg, report.player_health
            ));
        } else if report.mob_health > 0 {
            lines.push(format!("{} hesitates.", mob_name));
        }

        match report.outcome {
            AttackOutcome::Ongoing => {}
            AttackOutcome::Victory(victory) => {
                self.session.end_battle();
                lines.push(format!(
                    "🏆 {} defeated! +{} xp, {}, {}",
                    mob_name,
                    victory.experience,
                    format_amount(victory.coins, Currency::Coins),
                    format_amount(victory.gems, Currency::Gems)
                ));
                if victory.levels_gained > 0 {
                    lines.push(format!("⭐ Level up! (+{})", victory.levels_gained));
                }
                if let Some(drop) = victory.drop {
                    lines.push(format!("🎁 Loot: {}", drop));
                }
            }
            AttackOutcome::Defeat { coins_lost } => {
                self.session.end_battle();
                lines.push(format!(
                    "☠️ You were defeated by {} and lost {}. Your health is restored.",
                    mob_name,
                    format_amount(coins_lost, Currency::Coins)
                ));
            }
        }
        Ok(lines.join("\n"))
    }

    fn handle_flee(&mut self) -> Result<String, GameError> {
        self.session.username()?;
        let battle = self.session.end_battle().ok_or(GameError::NoActiveBattle)?;
        let mob = battle.flee();
        Ok(format!("🏃 You fled from {}.", mob.name))
    }

    fn handle_sell(&mut self, item_id: &str, price: u64) -> Result<String, GameError> {
        let username = self.session.username()?;
        let listing = self.game.list_item(username, item_id, price)?;
        Ok(format!(
            "📦 Listed {} for {} [{}]",
            listing.item.name,
            format_amount(listing.price, Currency::Coins),
            listing.short_id()
        ))
    }

    fn handle_market(&self) -> Result<String, GameError> {
        let listings = self.game.list_listings()?;
        let mut lines = vec!["=== Market ===".to_string()];
        if listings.is_empty() {
            lines.push("Nothing for sale right now.".to_string());
        }
        lines.extend(listings.iter().map(format_listing));
        Ok(lines.join("\n"))
    }

    fn handle_purchase(&mut self, listing_id: &str) -> Result<String, GameError> {
        let username = self.session.username()?;
        let listing = self.game.buy_listing(username, listing_id)?;
        Ok(format!(
            "✅ Bought {} from {} for {}.",
            listing.item.name,
            listing.seller,
            format_amount(listing.price, Currency::Coins)
        ))
    }

    fn handle_delist(&mut self, listing_id: &str) -> Result<String, GameError> {
        let username = self.session.username()?;
        let listing = self.game.delist(username, listing_id)?;
        Ok(format!("↩️ {} is back in your inventory.", listing.item.name))
    }

    fn handle_chat(&mut self, text: &str) -> Result<String, GameError> {
        let username = self.session.username()?;
        Ok(match self.game.chat(username, text)? {
            ChatOutcome::Posted(message) => message.display_line(),
            ChatOutcome::Sent {
                target,
                amount,
                balance,
            } => format!(
                "💸 Sent {} to {}. Remaining: {}",
                format_amount(amount, Currency::Coins),
                target,
                format_amount(balance, Currency::Coins)
            ),
            ChatOutcome::PromoRedeemed {
                code,
                coins,
                gems,
                premium,
            } => format!(
                "🎁 Promo {} redeemed: +{} coins, +{} gems, +{} premium",
                code, coins, gems, premium
            ),
            ChatOutcome::Duel { summary, .. } => summary,
            ChatOutcome::Traded {
                target,
                item_name,
                quantity,
            } => format!("🤝 Gave {} x {} to {}.", quantity, item_name, target),
        })
    }

    fn handle_history(&self, limit: usize) -> Result<String, GameError> {
        let messages = self.game.recent_chat(limit)?;
        if messages.is_empty() {
            return Ok("The chat is quiet.".to_string());
        }
        Ok(messages
            .iter()
            .map(|m| m.display_line())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn handle_top(&self, board: Option<String>) -> Result<String, GameError> {
        let board = match board {
            Some(name) => name.parse()?,
            None => Board::Level,
        };
        let players = self.game.top(board, LEADERBOARD_SIZE)?;
        Ok(format_board(board, &players).join("\n"))
    }

    fn handle_donate(&self, id: Option<u32>) -> Result<String, GameError> {
        let Some(id) = id else {
            let mut lines = vec!["=== Support the shop ===".to_string()];
            lines.extend(DONATION_ITEMS.iter().map(donation::format_donation_item));
            lines.push("DONATE <n> to get an order link.".to_string());
            return Ok(lines.join("\n"));
        };
        let item = donation::find_donation(id)?;
        let code = donation::order_code(item, Utc::now());
        let link = donation::deep_link(&self.game.config().donation, &code);
        info!("order {} created for pack #{}", code, item.id);
        Ok(format!(
            "{} {} - {} ₽\nOrder code: {}\nSend it to the support chat: {}\nAn admin delivers the pack after payment.",
            item.icon, item.name, item.price_rub, code, link
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_are_case_insensitive_but_args_are_not() {
        assert_eq!(
            parse_command("buy Iron_Sword 2"),
            GameCommand::Buy {
                item_id: "Iron_Sword".to_string(),
                quantity: 2
            }
        );
        assert_eq!(parse_command("i"), GameCommand::Inventory);
        assert_eq!(parse_command("  Say Hello   World "), GameCommand::Chat("Hello   World".to_string()));
    }

    #[test]
    fn slash_lines_go_to_chat() {
        assert_eq!(
            parse_command("/send bob 10"),
            GameCommand::Chat("/send bob 10".to_string())
        );
    }

    #[test]
    fn malformed_arguments_show_usage() {
        assert!(matches!(parse_command("BUY"), GameCommand::Usage(_)));
        assert!(matches!(parse_command("BUY potion 0"), GameCommand::Usage(_)));
        assert!(matches!(parse_command("SELL sword -5"), GameCommand::Usage(_)));
        assert!(matches!(parse_command("REGISTER bob"), GameCommand::Usage(_)));
        assert!(matches!(parse_command("HISTORY zero"), GameCommand::Usage(_)));
    }

    #[test]
    fn sell_accepts_suffixed_prices() {
        assert_eq!(
            parse_command("SELL katana 250c"),
            GameCommand::Sell {
                item_id: "katana".to_string(),
                price: 250
            }
        );
    }

    #[test]
    fn donate_accepts_hash_prefix() {
        assert_eq!(parse_command("DONATE #4"), GameCommand::Donate(Some(4)));
        assert_eq!(parse_command("donate"), GameCommand::Donate(None));
    }

    #[test]
    fn unknown_verbs_are_reported() {
        assert_eq!(parse_command("dance"), GameCommand::Unknown("dance".to_string()));
        assert_eq!(parse_command("   "), GameCommand::Unknown(String::new()));
    }
}
