//! Cart line quantities.
//!
//! Form input arrives as loosely-typed strings. It is parsed and clamped here
//! so that a [`Quantity`] held by a cart line is always at least one.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A positive item quantity.
///
/// ## Constraints
///
/// - Always `>= 1`; zero is unrepresentable.
/// - Arithmetic saturates at `u32::MAX` instead of overflowing.
///
/// ## Examples
///
/// ```
/// use corner_shop_core::Quantity;
///
/// assert_eq!(Quantity::for_add(Some("3")).get(), 3);
/// assert_eq!(Quantity::for_add(Some("0")).get(), 1);
/// assert_eq!(Quantity::for_add(Some("lots")).get(), 1);
/// assert_eq!(Quantity::for_update(Some("0")), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add another quantity, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.get()))
    }

    /// Quantity for an add-to-cart request.
    ///
    /// A missing field, unparsable input, or anything below one becomes one.
    #[must_use]
    pub fn for_add(raw: Option<&str>) -> Self {
        raw.and_then(parse_leading_int)
            .map_or(Self::ONE, |n| Self::clamp_from(n).unwrap_or(Self::ONE))
    }

    /// Quantity for an update request.
    ///
    /// A missing or empty field means one. Unparsable input (including
    /// whitespace only) and anything below one mean zero, which is returned
    /// as `None` (remove the line).
    #[must_use]
    pub fn for_update(raw: Option<&str>) -> Option<Self> {
        match raw.filter(|value| !value.is_empty()) {
            None => Some(Self::ONE),
            Some(value) => parse_leading_int(value).and_then(Self::clamp_from),
        }
    }

    /// Convert a signed count, saturating large values and rejecting `< 1`.
    fn clamp_from(value: i64) -> Option<Self> {
        if value < 1 {
            return None;
        }
        Self::new(u32::try_from(value).unwrap_or(u32::MAX))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.get()
    }
}

/// Parse the leading integer of a string.
///
/// Leading whitespace and an optional sign are accepted, then the run of
/// ASCII digits; anything after the digits is ignored. Returns `None` when
/// no digits are present. Magnitudes beyond `i64` saturate.
///
/// ```
/// use corner_shop_core::parse_leading_int;
///
/// assert_eq!(parse_leading_int(" 12 boxes"), Some(12));
/// assert_eq!(parse_leading_int("-4"), Some(-4));
/// assert_eq!(parse_leading_int("abc"), None);
/// assert_eq!(parse_leading_int(""), None);
/// ```
#[must_use]
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..)?),
        Some(b'+') => (false, trimmed.get(1..)?),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut value: i64 = 0;
    let mut seen = false;
    for digit in digits {
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_for_add_defaults_to_one() {
        assert_eq!(Quantity::for_add(None), Quantity::ONE);
        assert_eq!(Quantity::for_add(Some("")), Quantity::ONE);
        assert_eq!(Quantity::for_add(Some("abc")), Quantity::ONE);
        assert_eq!(Quantity::for_add(Some("0")), Quantity::ONE);
        assert_eq!(Quantity::for_add(Some("-7")), Quantity::ONE);
    }

    #[test]
    fn test_for_add_reads_leading_digits() {
        assert_eq!(Quantity::for_add(Some("4")).get(), 4);
        assert_eq!(Quantity::for_add(Some("  2 please")).get(), 2);
        assert_eq!(Quantity::for_add(Some("+5")).get(), 5);
    }

    #[test]
    fn test_for_add_saturates_large_values() {
        assert_eq!(Quantity::for_add(Some("99999999999999")).get(), u32::MAX);
        assert_eq!(
            Quantity::for_add(Some("999999999999999999999999999")).get(),
            u32::MAX
        );
    }

    #[test]
    fn test_for_update_clamps_to_zero() {
        assert_eq!(Quantity::for_update(Some("0")), None);
        assert_eq!(Quantity::for_update(Some("-3")), None);
        assert_eq!(Quantity::for_update(Some("junk")), None);
        assert_eq!(Quantity::for_update(Some("  ")), None);
        assert_eq!(Quantity::for_update(Some(" \t")), None);
        assert_eq!(Quantity::for_update(Some("6")), Quantity::new(6));
    }

    #[test]
    fn test_for_update_missing_means_one() {
        assert_eq!(Quantity::for_update(None), Some(Quantity::ONE));
        assert_eq!(Quantity::for_update(Some("")), Some(Quantity::ONE));
    }

    #[test]
    fn test_saturating_add() {
        let max = Quantity::new(u32::MAX).unwrap();
        assert_eq!(max.saturating_add(Quantity::ONE), max);
        assert_eq!(
            Quantity::new(2).unwrap().saturating_add(Quantity::new(3).unwrap()),
            Quantity::new(5).unwrap()
        );
    }

    #[test]
    fn test_parse_leading_int_sign_only() {
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("+x"), None);
    }

    #[test]
    fn test_quantity_rejects_zero_when_deserialized() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("3").unwrap().get(), 3);
    }
}
