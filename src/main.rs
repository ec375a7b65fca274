//! Binary entrypoint for the pixelshop CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `play` - interactive shop and game session on the terminal
//! - `catalog [--category <c>]` - print the shop catalog
//! - `leaderboard [--board level|weekly|pvp]` - print a leaderboard
//! - `donate [<id>] [--open]` - show donation packs or create an order link
//! - `fulfil <user> <id>` - admin: deliver a paid donation pack
//! - `reset-weekly` - admin: zero every weekly score
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use pixelshop::config::Config;
use pixelshop::game::commands::{AuthRequest, CommandProcessor, Reply};
use pixelshop::game::currency::format_wallet;
use pixelshop::game::donation::{self, DONATION_ITEMS};
use pixelshop::game::leaderboard::{format_board, Board};
use pixelshop::game::shop::format_shop_listing;
use pixelshop::game::types::ItemCategory;
use pixelshop::game::{Catalog, Game, GameStoreBuilder};
use pixelshop::logutil::{format_log_line, parse_level};

#[derive(Parser)]
#[command(name = "pixelshop")]
#[command(about = "Pixel-art donation shop with a mini RPG")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Start an interactive session
    Play,
    /// Print the shop catalog
    Catalog {
        /// Only show one category (weapon, armor, pet, potion, ...)
        #[arg(long)]
        category: Option<String>,
    },
    /// Print a leaderboard
    Leaderboard {
        #[arg(short, long, default_value = "level")]
        board: String,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// List donation packs, or create an order link for one
    Donate {
        id: Option<u32>,
        /// Open the support chat link in a browser
        #[arg(long)]
        open: bool,
    },
    /// Deliver a paid donation pack to a player
    Fulfil { username: String, id: u32 },
    /// Reset every player's weekly score
    ResetWeekly,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose, true);
        if Path::new(&cli.config).exists() {
            warn!("{} already exists; leaving it untouched", cli.config);
            return Ok(());
        }
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        return Ok(());
    }

    let config = load_config(&cli.config).await?;
    // The interactive screen owns stdout; logs go to the file only.
    let console_logs = !matches!(cli.command, Commands::Play);
    init_logging(&Some(config.clone()), cli.verbose, console_logs);
    info!("Starting pixelshop v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Init => {}
        Commands::Play => {
            let game = open_game(&config)?;
            run_repl(CommandProcessor::new(game)).await?;
        }
        Commands::Catalog { category } => {
            let catalog = load_catalog(&config)?;
            let category = category
                .map(|c| c.parse::<ItemCategory>())
                .transpose()?;
            for line in format_shop_listing(&catalog, category) {
                println!("{}", line);
            }
        }
        Commands::Leaderboard { board, limit } => {
            let board: Board = board.parse()?;
            let game = open_game(&config)?;
            for line in format_board(board, &game.top(board, limit)?) {
                println!("{}", line);
            }
        }
        Commands::Donate { id, open } => match id {
            None => {
                for item in DONATION_ITEMS.iter() {
                    println!("{}", donation::format_donation_item(item));
                }
            }
            Some(id) => {
                let item = donation::find_donation(id)?;
                let code = donation::order_code(item, chrono::Utc::now());
                let link = donation::deep_link(&config.donation, &code);
                println!("{}", donation::format_donation_item(item));
                println!("Order code: {}", code);
                println!("Support chat: {}", link);
                if open {
                    if let Err(e) = donation::open_link(&link) {
                        warn!("Could not open browser: {}", e);
                    }
                }
            }
        },
        Commands::Fulfil { username, id } => {
            let mut game = open_game(&config)?;
            let done = game.fulfil(&username, id)?;
            let wallet = game.balance(&done.username)?;
            println!("Delivered {} to {}.", done.pack, done.username);
            if let Some(item) = done.item_name {
                println!("Item: {}", item);
            }
            if let Some(until) = done.vip_until {
                println!("VIP until {}", until.format("%Y-%m-%d"));
            }
            println!("Wallet: {}", format_wallet(&wallet));
        }
        Commands::ResetWeekly => {
            let mut game = open_game(&config)?;
            let count = game.reset_weekly_scores()?;
            println!("Weekly scores reset for {} players.", count);
        }
    }

    Ok(())
}

/// A missing config file is not fatal; defaults cover every setting.
async fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        return Config::load(path).await;
    }
    eprintln!("{} not found, using defaults (run `pixelshop init` to create it)", path);
    Ok(Config::default())
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    let catalog = match config.storage.catalog_path.as_deref() {
        Some(path) => Catalog::load_from_json(path)
            .with_context(|| format!("loading catalog from {}", path))?,
        None => Catalog::load_embedded()?,
    };
    info!("Catalog loaded with {} items", catalog.len());
    Ok(catalog)
}

fn open_game(config: &Config) -> Result<Game> {
    let mut builder = GameStoreBuilder::new(&config.storage.data_dir);
    if config.game.seed_demo_players {
        builder = builder.with_demo_players();
    }
    let store = builder
        .open()
        .with_context(|| format!("opening store at {}", config.storage.data_dir))?;
    Ok(Game::new(store, load_catalog(config)?, config)?)
}

async fn run_repl(mut processor: CommandProcessor) -> Result<()> {
    println!("{}", processor.banner());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", processor.prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let reply = match processor.process(&line) {
            Ok(reply) => reply,
            Err(e) => {
                error!("command failed: {}", e);
                println!("Something went wrong: {}", e);
                continue;
            }
        };
        match reply {
            Reply::Text(text) if text.is_empty() => {}
            Reply::Text(text) => println!("{}", text),
            Reply::PasswordPrompt(request) => {
                let Some(password) = read_password(&request).await? else {
                    continue;
                };
                match processor.complete_auth(request, &password) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        error!("authentication failed: {}", e);
                        println!("Something went wrong: {}", e);
                    }
                }
            }
            Reply::Quit(text) => {
                println!("{}", text);
                break;
            }
        }
    }
    Ok(())
}

/// Prompt without echo. Registration asks twice; `None` means the entries differed.
async fn read_password(request: &AuthRequest) -> Result<Option<String>> {
    let confirm = matches!(request, AuthRequest::Register { .. });
    tokio::task::spawn_blocking(move || -> Result<Option<String>> {
        let first = rpassword::prompt_password("Password: ")?;
        if confirm {
            let second = rpassword::prompt_password("Confirm password: ")?;
            if first != second {
                println!("❌ Passwords do not match.");
                return Ok(None);
            }
        }
        Ok(Some(first))
    })
    .await?
}

fn init_logging(config: &Option<Config>, verbosity: u8, console: bool) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let level = match (verbosity, config) {
        (0, Some(cfg)) => parse_level(&cfg.logging.level),
        (0, None) => log::LevelFilter::Info,
        (1, _) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);

    let file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    match file {
        Some(f) => {
            let file = std::sync::Arc::new(std::sync::Mutex::new(f));
            let echo = console && atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let line = format_log_line(chrono::Utc::now(), record.level(), record.args());
                if let Ok(mut guard) = file.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if echo {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None if console => {
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{}",
                    format_log_line(chrono::Utc::now(), record.level(), record.args())
                )
            });
        }
        None => {
            // No file and no console: keep warnings and errors only.
            builder.filter_level(log::LevelFilter::Warn);
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{}",
                    format_log_line(chrono::Utc::now(), record.level(), record.args())
                )
            });
        }
    }
    let _ = builder.try_init();
}
