//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are held as [`Decimal`] in the currency's standard unit (hryvnias,
/// not kopiyky), so catalog prices like `10.5` survive arithmetic exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
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

    /// A price of zero hryvnias.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(Decimal::ZERO, CurrencyCode::UAH)
    }

    /// Create a hryvnia price.
    #[must_use]
    pub const fn uah(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::UAH)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency_code)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        // Single-currency catalog: the sum stays in the left operand's currency.
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self::new(self.amount * Decimal::from(rhs), self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// ISO 4217 currency codes.
///
/// The pharmacy catalog quotes everything in hryvnias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    UAH,
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UAH => write!(f, "UAH"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_arithmetic() {
        let a = Price::uah(Decimal::new(105, 1)); // 10.5
        let b = Price::uah(Decimal::from(5));

        assert_eq!((a + b).amount, Decimal::new(155, 1));
        assert_eq!((b * 3).amount, Decimal::from(15));
    }

    #[test]
    fn test_price_sum_of_empty_iterator_is_zero() {
        let total: Price = core::iter::empty().sum();
        assert_eq!(total, Price::zero());
    }

    #[test]
    fn test_price_display() {
        let price = Price::uah(Decimal::new(105, 1));
        assert_eq!(price.to_string(), "10.5 UAH");
    }
}
