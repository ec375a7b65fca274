//! End-to-end sessions through the command processor.

mod common;

use common::{new_game, PASSWORD};
use pixelshop::game::{AuthRequest, CommandProcessor, Race, Reply};
use tempfile::tempdir;

fn text(reply: Reply) -> String {
    match reply {
        Reply::Text(text) => text,
        other => panic!("expected text, got {:?}", other),
    }
}

fn login_new<R: rand::Rng>(processor: &mut CommandProcessor<R>, name: &str) {
    let reply = processor.process(&format!("REGISTER {} human", name)).unwrap();
    let Reply::PasswordPrompt(request) = reply else {
        panic!("expected a password prompt");
    };
    assert_eq!(
        request,
        AuthRequest::Register {
            username: name.to_string(),
            race: Race::Human
        }
    );
    let welcome = processor.complete_auth(request, PASSWORD).unwrap();
    assert!(welcome.contains(name), "{}", welcome);
}

#[test]
fn auth_screen_gates_game_commands() {
    let tmp = tempdir().unwrap();
    let mut processor = CommandProcessor::new(new_game(&tmp));

    assert!(text(processor.process("INV").unwrap()).contains("log in first"));
    assert!(text(processor.process("SHOP potion").unwrap()).contains("Small Health Potion"));
    let full = text(processor.process("SHOP").unwrap());
    assert!(full.contains("Categories: "));
    assert!(full.contains("scroll"));
    assert!(text(processor.process("REGISTER bob wizard").unwrap()).contains("Unknown race"));
    assert!(text(processor.process("dance").unwrap()).contains("Unknown command"));
    assert!(!processor.session().is_playing());
}

#[test]
fn wrong_password_stays_logged_out() {
    let tmp = tempdir().unwrap();
    let mut processor = CommandProcessor::new(new_game(&tmp));
    login_new(&mut processor, "alice");
    text(processor.process("LOGOUT").unwrap());

    let Reply::PasswordPrompt(request) = processor.process("login alice").unwrap() else {
        panic!("expected a password prompt");
    };
    let reply = processor.complete_auth(request.clone(), "nope-nope").unwrap();
    assert!(reply.starts_with("❌"));
    assert!(!processor.session().is_playing());

    processor.complete_auth(request, PASSWORD).unwrap();
    assert_eq!(processor.session().username().unwrap(), "alice");
}

#[test]
fn shop_inventory_and_battle_flow() {
    let tmp = tempdir().unwrap();
    let mut processor = CommandProcessor::new(new_game(&tmp));
    login_new(&mut processor, "alice");

    assert!(text(processor.process("buy small_potion 2").unwrap()).contains("Bought 2 x Small Health Potion"));
    assert!(text(processor.process("BUY steel_sword").unwrap()).starts_with("❌"));
    let inv = text(processor.process("I").unwrap());
    assert!(inv.contains("Small Health Potion"));
    assert!(inv.contains("💰 60"));

    assert!(text(processor.process("ATTACK").unwrap()).contains("no active battle"));
    let encounter = text(processor.process("FIGHT").unwrap());
    assert!(encounter.contains("appears"));
    assert!(processor.prompt().contains("⚔️"));
    assert!(text(processor.process("FIGHT").unwrap()).contains("finish the current battle"));
    // a 10 ATK hero cannot finish a level 1-2 mob in one round, and no mob can one-shot 100 HP
    assert!(text(processor.process("A").unwrap()).contains("You hit"));
    assert!(processor.session().in_battle());
    let mob = processor.session().battle().unwrap().mob.name.clone();
    assert_eq!(text(processor.process("FLEE").unwrap()), format!("🏃 You fled from {}.", mob));
    assert!(!processor.session().in_battle());
    assert!(text(processor.process("FLEE").unwrap()).contains("no active battle"));

    assert!(text(processor.process("STATS").unwrap()).contains("alice the Human"));
}

#[test]
fn chat_and_market_through_commands() {
    let tmp = tempdir().unwrap();
    let mut processor = CommandProcessor::new(new_game(&tmp));
    login_new(&mut processor, "bob");
    text(processor.process("LOGOUT").unwrap());
    login_new(&mut processor, "alice");

    assert!(text(processor.process("/promo welcome").unwrap()).contains("Promo WELCOME redeemed"));
    assert!(text(processor.process("/send bob").unwrap()).contains("Usage: /send"));
    assert!(text(processor.process("/send bob 25").unwrap()).contains("Sent 💰 25 coins to bob"));
    assert!(text(processor.process("SAY hello   there").unwrap()).ends_with("alice (L1): hello   there"));

    processor.process("BUY dagger").unwrap();
    let listed = text(processor.process("SELL dagger 40").unwrap());
    assert!(listed.starts_with("📦 Listed Dagger"));
    assert!(text(processor.process("MARKET").unwrap()).contains("Dagger"));

    let listing_id = processor.game().list_listings().unwrap()[0].short_id().to_string();
    assert!(text(processor.process(&format!("PURCHASE {}", listing_id)).unwrap()).contains("own listing"));
    assert!(text(processor.process(&format!("DELIST {}", listing_id)).unwrap()).contains("back in your inventory"));

    let history = text(processor.process("HISTORY").unwrap());
    assert!(history.contains("sent 25 coins"));
    assert!(history.contains("hello"));

    assert!(text(processor.process("TOP weekly").unwrap()).contains("Weekly top"));
    assert!(text(processor.process("DONATE 7").unwrap()).contains("Order code: #7-"));
    assert!(matches!(processor.process("QUIT").unwrap(), Reply::Quit(_)));
    assert!(!processor.session().is_playing());
}
