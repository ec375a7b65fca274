//! Registration and login against a real store.

mod common;

use common::{fast_config, new_game, register, PASSWORD};
use pixelshop::game::{Catalog, Game, GameError, GameStoreBuilder, Race, BASE_ATTACK, BASE_DEFENSE, BASE_HEALTH};
use tempfile::tempdir;

#[test]
fn registration_uses_configured_wallet_and_race_stats() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);

    let human = register(&mut game, "Alice");
    assert_eq!(human.username, "alice");
    assert_eq!(human.display_name, "Alice");
    assert_eq!((human.wallet.coins, human.wallet.gems, human.wallet.premium), (100, 10, 0));
    assert_eq!(human.level, 1);
    assert_eq!(human.health, BASE_HEALTH);
    assert_eq!(human.attack, BASE_ATTACK);
    assert_eq!(human.defense, BASE_DEFENSE);
    assert!(human.password_hash.starts_with("$argon2id$"));

    let orc = game.register("grok", PASSWORD, Race::Orc).unwrap();
    assert!(orc.max_health > BASE_HEALTH);

    let stored = game.player("ALICE").unwrap();
    assert_eq!(stored.display_name, "Alice");
}

#[test]
fn duplicate_names_are_rejected_case_insensitively() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);
    register(&mut game, "Alice");

    let err = game.register("alice", PASSWORD, Race::Elf).unwrap_err();
    assert!(matches!(err, GameError::DuplicateUsername(_)));
}

#[test]
fn invalid_names_and_passwords_are_rejected() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);

    assert!(matches!(
        game.register("a", PASSWORD, Race::Human),
        Err(GameError::InvalidUsername(_))
    ));
    assert!(matches!(
        game.register("bad name", PASSWORD, Race::Human),
        Err(GameError::InvalidUsername(_))
    ));
    assert!(matches!(
        game.register("validname", "abc", Race::Human),
        Err(GameError::InvalidPassword(_))
    ));
    assert!(game.store().list_player_ids().unwrap().is_empty());
}

#[test]
fn login_checks_password() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);
    register(&mut game, "Alice");

    let player = game.login("alice", PASSWORD).unwrap();
    assert_eq!(player.username, "alice");
    assert!(matches!(game.login("alice", "wrong-pass"), Err(GameError::InvalidCredentials)));
    assert!(matches!(game.login("nobody", PASSWORD), Err(GameError::InvalidCredentials)));
}

#[test]
fn demo_rivals_are_seeded_but_cannot_log_in() {
    let tmp = tempdir().unwrap();
    let store = GameStoreBuilder::new(tmp.path().join("db"))
        .with_demo_players()
        .open()
        .unwrap();
    let mut game = Game::new(store, Catalog::load_embedded().unwrap(), &fast_config()).unwrap();

    assert_eq!(game.store().list_players().unwrap().len(), 5);
    assert!(matches!(
        game.login("dragonslayer", ""),
        Err(GameError::InvalidCredentials)
    ));
    assert!(matches!(
        game.login("dragonslayer", PASSWORD),
        Err(GameError::InvalidCredentials)
    ));
}

#[test]
fn demo_seeding_happens_once() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("db");
    {
        let store = GameStoreBuilder::new(&path).with_demo_players().open().unwrap();
        let mut rival = store.get_player("pixelqueen").unwrap();
        rival.wallet.coins = 1;
        store.put_player(rival).unwrap();
    }
    let store = GameStoreBuilder::new(&path).with_demo_players().open().unwrap();
    assert_eq!(store.get_player("pixelqueen").unwrap().wallet.coins, 1);
}
