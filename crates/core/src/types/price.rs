//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places used for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// A price with currency information.
///
/// Amounts are kept as exact decimals; rounding only happens through
/// [`Price::rounded`] or when formatting for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// A zero amount in the default currency.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_amount(Decimal::ZERO)
    }

    /// Round to two decimal places, half away from zero.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            amount: round_money(self.amount),
            ..self
        }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = round_money(self.amount);
        amount.rescale(MONEY_SCALE);
        if amount.is_sign_negative() && !amount.is_zero() {
            write!(f, "-{}{}", self.currency_code.symbol(), amount.abs())
        } else {
            write!(f, "{}{}", self.currency_code.symbol(), amount.abs())
        }
    }
}

/// Round a monetary amount to two decimal places using half-up rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// ISO 4217 currency codes the store prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(Price::from_amount(Decimal::new(25, 0)).display(), "$25.00");
        assert_eq!(Price::from_amount(Decimal::new(499, 2)).display(), "$4.99");
        assert_eq!(Price::zero().display(), "$0.00");
    }

    #[test]
    fn test_display_rounds_half_up() {
        assert_eq!(Price::from_amount(Decimal::new(12345, 3)).display(), "$12.35");
    }

    #[test]
    fn test_display_negative_amount() {
        let price = Price::new(Decimal::new(-1050, 2), CurrencyCode::USD);
        assert_eq!(price.display(), "-$10.50");
    }

    #[test]
    fn test_round_money_midpoint() {
        assert_eq!(round_money(Decimal::new(2505, 3)), Decimal::new(251, 2));
        assert_eq!(round_money(Decimal::new(2504, 3)), Decimal::new(250, 2));
    }
}
