//! Conversion between profit units and money.

use core_types::CashDetails;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static NO_LIMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)NL(\d+)").expect("valid no-limit stakes pattern"));
static POT_LIMIT_OMAHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)PLO(\d+)").expect("valid PLO stakes pattern"));

/// Returns the money value of one profit unit for a stakes label.
///
/// `NL50` and `PLO50` both mean a unit worth 0.50. Labels that match neither
/// pattern (or are missing) fall back to 1, so units and money coincide.
pub fn unit_value(stakes: Option<&str>) -> Decimal {
    let Some(stakes) = stakes else {
        return Decimal::ONE;
    };

    [&*NO_LIMIT, &*POT_LIMIT_OMAHA]
        .iter()
        .find_map(|pattern| pattern.captures(stakes))
        .and_then(|captures| Decimal::from_str(&captures[1]).ok())
        .map(|amount| amount / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ONE)
}

/// Money profit for a unit profit at the given stakes. Saturates at the
/// `Decimal` bounds.
pub fn money_from_units(units: Decimal, stakes: Option<&str>) -> Decimal {
    units.saturating_mul(unit_value(stakes))
}

/// Recomputes the stored money profit of a cash session from its units.
/// Called on the write path only; the engine trusts the stored figure.
pub fn apply_unit_value(cash: &mut CashDetails) {
    cash.profit_money = money_from_units(cash.profit_units, cash.stakes.as_deref());
}
