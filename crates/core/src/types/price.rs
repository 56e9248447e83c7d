//! Type-safe rental price using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// The amount serializes as a JSON number because the fleet API stores
/// daily rates as floating point columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not cents).
    #[serde(with = "rust_decimal::serde::float")]
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

    /// Whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency_code.code(), self.amount)
    }
}

/// ISO 4217 currency codes accepted by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    LKR,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::LKR => "LKR",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_serializes_amount_as_number() {
        let price = Price::new(Decimal::new(850_000, 2), CurrencyCode::LKR);
        let json = serde_json::to_value(price).unwrap();
        assert_eq!(json["amount"], serde_json::json!(8500.0));
        assert_eq!(json["currencyCode"], "LKR");
    }

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(4550, 2), CurrencyCode::USD);
        assert_eq!(price.to_string(), "USD 45.50");
    }

    #[test]
    fn test_is_positive() {
        assert!(!Price::new(Decimal::ZERO, CurrencyCode::LKR).is_positive());
        assert!(Price::new(Decimal::ONE, CurrencyCode::LKR).is_positive());
    }
}
