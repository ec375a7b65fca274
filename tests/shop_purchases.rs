//! Shop purchases through the game facade.

mod common;

use common::{new_game, register};
use pixelshop::game::inventory::get_item_quantity;
use pixelshop::game::{Currency, GameError};
use tempfile::tempdir;

#[test]
fn stackable_purchase_debits_total_and_stacks() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);
    register(&mut game, "alice");

    let receipt = game.buy("alice", "small_potion", 3).unwrap();
    assert_eq!(receipt.total.amount, 60);
    assert_eq!(receipt.total.currency, Currency::Coins);
    assert_eq!(receipt.new_balance, 40);
    assert!(!receipt.stacked);

    let again = game.buy("alice", "SMALL_POTION", 1).unwrap();
    assert!(again.stacked);

    let player = game.player("alice").unwrap();
    assert_eq!(player.wallet.coins, 20);
    assert_eq!(get_item_quantity(&player, "small_potion"), 4);
    assert_eq!(player.inventory.len(), 1);
}

#[test]
fn gem_items_spend_gems_only() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);
    register(&mut game, "alice");
    let mut player = game.player("alice").unwrap();
    player.wallet.gems = 100;
    game.store().put_player(player).unwrap();

    let receipt = game.buy("alice", "katana", 1).unwrap();
    assert_eq!(receipt.total.currency, Currency::Gems);
    let wallet = game.balance("alice").unwrap();
    assert_eq!((wallet.coins, wallet.gems), (100, 20));
}

#[test]
fn insufficient_funds_change_nothing() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);
    register(&mut game, "alice");

    let err = game.buy("alice", "steel_sword", 1).unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientFunds {
            currency: Currency::Coins,
            needed: 250,
            available: 100
        }
    ));
    assert!(matches!(
        game.buy("alice", "skin_angel", 1),
        Err(GameError::InsufficientFunds { currency: Currency::Premium, .. })
    ));

    let player = game.player("alice").unwrap();
    assert_eq!(player.wallet.coins, 100);
    assert!(player.inventory.is_empty());
}

#[test]
fn bad_quantities_and_unknown_items() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);
    register(&mut game, "alice");

    assert!(matches!(game.buy("alice", "bread", 0), Err(GameError::InvalidCommand(_))));
    assert!(matches!(game.buy("alice", "dagger", 2), Err(GameError::InvalidCommand(_))));
    assert!(matches!(game.buy("alice", "laser_pony", 1), Err(GameError::UnknownItem(_))));
    assert!(matches!(game.buy("ghost", "bread", 1), Err(GameError::NotFound(_))));
    assert_eq!(game.balance("alice").unwrap().coins, 100);
}

#[test]
fn equipment_bonuses_apply_after_equip() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);
    register(&mut game, "alice");
    game.buy("alice", "wooden_sword", 1).unwrap();
    game.buy("alice", "wooden_shield", 1).unwrap();

    assert_eq!(game.equip_item("alice", "wooden_sword").unwrap(), None);
    assert!(game.toggle_equipment("alice", "wooden_shield").unwrap());
    let player = game.player("alice").unwrap();
    let stats = pixelshop::game::effective_stats(&player);
    assert_eq!(stats.attack, player.attack + 5);
    assert_eq!(stats.defense, player.defense + 3);

    game.unequip_item("alice", "wooden_sword").unwrap();
    let stats = pixelshop::game::effective_stats(&game.player("alice").unwrap());
    assert_eq!(stats.attack, player.attack);
}

#[test]
fn potions_heal_up_to_the_cap() {
    let tmp = tempdir().unwrap();
    let mut game = new_game(&tmp);
    register(&mut game, "alice");
    game.buy("alice", "small_potion", 2).unwrap();

    let mut player = game.player("alice").unwrap();
    player.health = 90;
    game.store().put_player(player).unwrap();

    assert_eq!(game.consume_item("alice", "small_potion").unwrap(), 10);
    let player = game.player("alice").unwrap();
    assert_eq!(player.health, 100);
    assert_eq!(get_item_quantity(&player, "small_potion"), 1);

    game.buy("alice", "torch", 1).unwrap();
    assert!(matches!(game.consume_item("alice", "torch"), Err(GameError::NotUsable(_))));
}
