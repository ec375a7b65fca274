/// Inventory and equipment management
use log::info;
use rand::Rng;

use super::engine::Game;
use super::errors::GameError;
use super::types::{InventoryItem, InventoryResult, PlayerRecord, StatBonus};

// ============================================================================
// Stacks
// ============================================================================

fn find_stack<'a>(player: &'a PlayerRecord, item_id: &str) -> Option<&'a InventoryItem> {
    player
        .inventory
        .iter()
        .find(|s| s.item_id.eq_ignore_ascii_case(item_id.trim()))
}

fn find_stack_mut<'a>(player: &'a mut PlayerRecord, item_id: &str) -> Option<&'a mut InventoryItem> {
    player
        .inventory
        .iter_mut()
        .find(|s| s.item_id.eq_ignore_ascii_case(item_id.trim()))
}

/// Add items to the player's inventory, merging into an existing stack with the same id
pub fn add_item(player: &mut PlayerRecord, item: InventoryItem) -> InventoryResult {
    let quantity = item.quantity;
    if let Some(stack) = find_stack_mut(player, &item.item_id) {
        stack.quantity = stack.quantity.saturating_add(quantity);
        return InventoryResult::Added {
            quantity,
            stacked: true,
        };
    }

    player.inventory.push(item.split(quantity));
    InventoryResult::Added {
        quantity,
        stacked: false,
    }
}

/// Take `quantity` units out of a stack. The stack disappears when it reaches zero.
///
/// Returns the removed portion (never equipped) so callers can hand it to someone else.
pub fn remove_item(
    player: &mut PlayerRecord,
    item_id: &str,
    quantity: u32,
) -> Result<(InventoryItem, InventoryResult), GameError> {
    if quantity == 0 {
        return Err(GameError::InvalidCommand(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let index = player
        .inventory
        .iter()
        .position(|s| s.item_id.eq_ignore_ascii_case(item_id.trim()))
        .ok_or_else(|| GameError::UnknownItem(item_id.trim().to_string()))?;

    let stack = &mut player.inventory[index];
    if stack.quantity < quantity {
        return Err(GameError::InvalidCommand(format!(
            "You only have {} x {}",
            stack.quantity, stack.name
        )));
    }

    let removed = stack.split(quantity);
    stack.quantity -= quantity;
    if stack.quantity == 0 {
        player.inventory.remove(index);
    }
    clamp_health(player);

    Ok((removed, InventoryResult::Removed { quantity }))
}

pub fn has_item(player: &PlayerRecord, item_id: &str, quantity: u32) -> bool {
    get_item_quantity(player, item_id) >= quantity
}

pub fn get_item_quantity(player: &PlayerRecord, item_id: &str) -> u32 {
    find_stack(player, item_id).map(|s| s.quantity).unwrap_or(0)
}

// ============================================================================
// Equipment
// ============================================================================

/// Flag a stack as equipped. Any other equipped item of the same category is unequipped
/// and its name returned.
pub fn equip(player: &mut PlayerRecord, item_id: &str) -> Result<Option<String>, GameError> {
    let stack = find_stack(player, item_id)
        .ok_or_else(|| GameError::UnknownItem(item_id.trim().to_string()))?;
    if !stack.category.is_equippable() {
        return Err(GameError::NotEquippable(stack.name.clone()));
    }
    let category = stack.category;
    let target_id = stack.item_id.clone();

    let mut replaced = None;
    for other in player.inventory.iter_mut() {
        if other.item_id == target_id {
            other.equipped = true;
        } else if other.category == category && other.equipped {
            other.equipped = false;
            replaced = Some(other.name.clone());
        }
    }
    clamp_health(player);
    Ok(replaced)
}

pub fn unequip(player: &mut PlayerRecord, item_id: &str) -> Result<(), GameError> {
    let stack = find_stack_mut(player, item_id)
        .ok_or_else(|| GameError::UnknownItem(item_id.trim().to_string()))?;
    if !stack.equipped {
        return Err(GameError::InvalidCommand(format!(
            "{} is not equipped",
            stack.name
        )));
    }
    stack.equipped = false;
    clamp_health(player);
    Ok(())
}

/// Flip the equipped flag; returns the new state.
pub fn toggle_equip(player: &mut PlayerRecord, item_id: &str) -> Result<bool, GameError> {
    let equipped = find_stack(player, item_id)
        .ok_or_else(|| GameError::UnknownItem(item_id.trim().to_string()))?
        .equipped;
    if equipped {
        unequip(player, item_id)?;
        Ok(false)
    } else {
        equip(player, item_id)?;
        Ok(true)
    }
}

/// Sum of bonuses over equipped stacks only.
pub fn equipped_bonus(player: &PlayerRecord) -> StatBonus {
    player
        .inventory
        .iter()
        .filter(|s| s.equipped)
        .fold(StatBonus::default(), |acc, s| acc.plus(&s.bonus))
}

/// Base stats plus equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveStats {
    pub attack: u32,
    pub defense: u32,
    pub max_health: u32,
}

pub fn effective_stats(player: &PlayerRecord) -> EffectiveStats {
    let bonus = equipped_bonus(player);
    EffectiveStats {
        attack: player.attack.saturating_add(bonus.attack),
        defense: player.defense.saturating_add(bonus.defense),
        max_health: player.max_health.saturating_add(bonus.health),
    }
}

/// Keep current health within the effective maximum after equipment changes.
pub fn clamp_health(player: &mut PlayerRecord) {
    let max = effective_stats(player).max_health;
    if player.health > max {
        player.health = max;
    }
}

// ============================================================================
// Consumables
// ============================================================================

/// Consume one unit of a potion or food item. Returns the health actually restored.
pub fn use_item(player: &mut PlayerRecord, item_id: &str) -> Result<u32, GameError> {
    let stack = find_stack(player, item_id)
        .ok_or_else(|| GameError::UnknownItem(item_id.trim().to_string()))?;
    if !stack.category.is_consumable() {
        return Err(GameError::NotUsable(stack.name.clone()));
    }
    let heal = stack.bonus.health;
    let id = stack.item_id.clone();

    remove_item(player, &id, 1)?;
    let max = effective_stats(player).max_health;
    let before = player.health;
    player.health = player.health.saturating_add(heal).min(max);
    Ok(player.health - before)
}

// ============================================================================
// Display
// ============================================================================

pub fn format_inventory(player: &PlayerRecord) -> Vec<String> {
    if player.inventory.is_empty() {
        return vec!["Your inventory is empty.".to_string()];
    }

    let mut lines = Vec::new();
    for (idx, stack) in player.inventory.iter().enumerate() {
        let qty_str = if stack.quantity > 1 {
            format!(" x{}", stack.quantity)
        } else {
            String::new()
        };
        let equipped_str = if stack.equipped { " [E]" } else { "" };
        let bonus_str = if stack.bonus.is_zero() {
            String::new()
        } else {
            format!(" ({})", stack.bonus)
        };
        lines.push(format!(
            "{}. {} {}{}{}{} <{}>",
            idx + 1,
            stack.icon,
            stack.name,
            qty_str,
            bonus_str,
            equipped_str,
            stack.item_id
        ));
    }

    let stats = effective_stats(player);
    lines.push(format!(
        "Equipped total: ATK {} DEF {} HP {}/{}",
        stats.attack, stats.defense, player.health, stats.max_health
    ));
    lines
}

// ============================================================================
// Game integration
// ============================================================================

impl<R: Rng> Game<R> {
    /// Toggle equipment on a stored player. Returns the new equipped state.
    pub fn toggle_equipment(&mut self, username: &str, item_id: &str) -> Result<bool, GameError> {
        let mut player = self.store.get_player(username)?;
        let equipped = toggle_equip(&mut player, item_id)?;
        self.store.put_player(player)?;
        Ok(equipped)
    }

    /// Equip an item, returning the name of whatever it replaced.
    pub fn equip_item(&mut self, username: &str, item_id: &str) -> Result<Option<String>, GameError> {
        let mut player = self.store.get_player(username)?;
        let replaced = equip(&mut player, item_id)?;
        self.store.put_player(player)?;
        Ok(replaced)
    }

    pub fn unequip_item(&mut self, username: &str, item_id: &str) -> Result<(), GameError> {
        let mut player = self.store.get_player(username)?;
        unequip(&mut player, item_id)?;
        self.store.put_player(player)
    }

    /// Consume a potion or food item. Returns the health restored.
    pub fn consume_item(&mut self, username: &str, item_id: &str) -> Result<u32, GameError> {
        let mut player = self.store.get_player(username)?;
        let healed = use_item(&mut player, item_id)?;
        info!("{} used {} (+{} hp)", player.username, item_id.trim(), healed);
        self.store.put_player(player)?;
        Ok(healed)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
