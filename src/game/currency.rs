/// Currency formatting and parsing for player-facing text
use super::types::{Currency, Price, Wallet};

// ============================================================================
// Display Formatting
// ============================================================================

/// Format an amount with its icon and unit name, e.g. "💰 120 coins"
pub fn format_amount(amount: u64, currency: Currency) -> String {
    let name = match (currency, amount) {
        (Currency::Coins, 1) => "coin",
        (Currency::Gems, 1) => "gem",
        (Currency::Coins, _) => "coins",
        (Currency::Gems, _) => "gems",
        (Currency::Premium, _) => "premium",
    };
    format!("{} {} {}", currency.icon(), amount, name)
}

pub fn format_price(price: &Price) -> String {
    format_amount(price.amount, price.currency)
}

/// One-line balance summary, e.g. "💰 100 | 💎 10 | 👑 0"
pub fn format_wallet(wallet: &Wallet) -> String {
    format!(
        "{} {} | {} {} | {} {}",
        Currency::Coins.icon(),
        wallet.coins,
        Currency::Gems.icon(),
        wallet.gems,
        Currency::Premium.icon(),
        wallet.premium
    )
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a positive whole amount from user input.
/// Accepts "250", "250c", "250 coins"; anything else is rejected.
pub fn parse_amount(input: &str) -> Result<u64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty amount".to_string());
    }

    let lowered = input.to_ascii_lowercase();
    let digits = lowered
        .strip_suffix("coins")
        .or_else(|| lowered.strip_suffix("coin"))
        .or_else(|| lowered.strip_suffix('c'))
        .unwrap_or(&lowered)
        .trim();

    // u64::from_str accepts a leading '+', players shouldn't need it
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("'{}' is not a whole number", input));
    }
    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("'{}' is too large", input))?;
    if amount == 0 {
        return Err("Amount must be greater than zero".to_string());
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(120, Currency::Coins), "💰 120 coins");
        assert_eq!(format_amount(1, Currency::Gems), "💎 1 gem");
        assert_eq!(format_price(&Price::premium(150)), "👑 150 premium");
    }

    #[test]
    fn test_format_wallet() {
        let wallet = Wallet::new(100, 10, 0);
        assert_eq!(format_wallet(&wallet), "💰 100 | 💎 10 | 👑 0");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("250").unwrap(), 250);
        assert_eq!(parse_amount("250c").unwrap(), 250);
        assert_eq!(parse_amount(" 40 coins ").unwrap(), 40);

        assert!(parse_amount("").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("+5").is_err());
        assert!(parse_amount("12.5").is_err());
        assert!(parse_amount("lots").is_err());
        assert!(parse_amount("99999999999999999999999").is_err());
    }
}
