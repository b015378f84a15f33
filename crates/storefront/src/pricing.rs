//! Cart totals: subtotal, flat shipping, tax, and grand total.
//!
//! Everything here is pure decimal arithmetic. Totals are derived on every
//! read and never stored on the cart.

use corner_shop_core::Price;
use corner_shop_core::price::round_money;
use rust_decimal::Decimal;

use crate::cart::CartLineItem;

/// Shipping and tax settings applied to every cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Flat fee charged when the subtotal is above zero.
    pub shipping_fee: Decimal,
    /// Tax rate as a fraction of the subtotal (0.10 = 10%).
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            shipping_fee: Decimal::new(499, 2),
            tax_rate: Decimal::new(10, 2),
        }
    }
}

impl PricingPolicy {
    /// Compute totals for a set of line items.
    ///
    /// - subtotal = sum of price x quantity
    /// - shipping = flat fee if subtotal > 0, else 0
    /// - tax = subtotal x rate, rounded to cents (half up)
    /// - total = subtotal + shipping + tax, rounded to cents
    #[must_use]
    pub fn compute_totals(&self, items: &[CartLineItem]) -> Totals {
        let subtotal = items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);

        let shipping = if subtotal > Decimal::ZERO {
            self.shipping_fee
        } else {
            Decimal::ZERO
        };
        let tax = round_money(subtotal.saturating_mul(self.tax_rate));
        let total = round_money(subtotal.saturating_add(shipping).saturating_add(tax));

        Totals {
            subtotal,
            shipping,
            tax,
            total,
        }
    }
}

/// Derived pricing breakdown for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Totals of an empty cart.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subtotal_price(&self) -> Price {
        Price::from_amount(self.subtotal).rounded()
    }

    #[must_use]
    pub fn shipping_price(&self) -> Price {
        Price::from_amount(self.shipping)
    }

    #[must_use]
    pub fn tax_price(&self) -> Price {
        Price::from_amount(self.tax)
    }

    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::from_amount(self.total)
    }
}
