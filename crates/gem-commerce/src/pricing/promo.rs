//! Promo codes.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// What a promo code takes off the subtotal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PromoValue {
    /// Whole-number percentage off.
    Percentage(u32),
    /// Fixed amount off.
    Fixed(Money),
}

impl PromoValue {
    /// Calculate the discount amount for a given subtotal.
    pub fn calculate(&self, subtotal: &Money) -> Money {
        match self {
            PromoValue::Percentage(percent) => subtotal.percentage((*percent).min(100)),
            PromoValue::Fixed(amount) => {
                // Don't exceed subtotal
                if amount.currency != subtotal.currency {
                    Money::zero(subtotal.currency)
                } else if amount.amount_cents > subtotal.amount_cents {
                    *subtotal
                } else {
                    *amount
                }
            }
        }
    }
}

/// A redeemable code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Promotion {
    /// Canonical code (e.g., "DISCOUNT20").
    pub code: String,
    /// Display name.
    pub name: String,
    pub value: PromoValue,
}

impl Promotion {
    /// Create a percentage-off promotion.
    pub fn percentage(code: impl Into<String>, name: impl Into<String>, percent: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            value: PromoValue::Percentage(percent),
        }
    }

    /// Create a fixed-amount promotion.
    pub fn fixed_amount(code: impl Into<String>, name: impl Into<String>, amount: Money) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            value: PromoValue::Fixed(amount),
        }
    }
}

/// Lookup table of known codes.
///
/// Codes match case-insensitively and ignore surrounding whitespace. An
/// unknown code is not an error; it simply discounts nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromoCatalog {
    promotions: Vec<Promotion>,
}

impl Default for PromoCatalog {
    fn default() -> Self {
        Self::new().with(Promotion::percentage("DISCOUNT20", "20% off your order", 20))
    }
}

impl PromoCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self {
            promotions: Vec::new(),
        }
    }

    /// Add (or replace) a promotion.
    pub fn with(mut self, promotion: Promotion) -> Self {
        self.promotions
            .retain(|p| !p.code.eq_ignore_ascii_case(&promotion.code));
        self.promotions.push(promotion);
        self
    }

    pub fn lookup(&self, code: &str) -> Option<&Promotion> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        self.promotions
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
    }

    /// Discount `code` gives on `subtotal`; zero for unknown or absent codes.
    pub fn discount_for(&self, code: Option<&str>, subtotal: &Money) -> Money {
        code.and_then(|c| self.lookup(c))
            .map(|p| p.value.calculate(subtotal))
            .unwrap_or_else(|| Money::zero(subtotal.currency))
    }

    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount20_any_case() {
        let catalog = PromoCatalog::default();
        let subtotal = Money::usd(20_000);
        for code in ["DISCOUNT20", "discount20", "Discount20", "  discount20 "] {
            assert_eq!(catalog.discount_for(Some(code), &subtotal), Money::usd(4_000));
        }
    }

    #[test]
    fn test_unknown_code_is_zero() {
        let catalog = PromoCatalog::default();
        let subtotal = Money::usd(20_000);
        assert_eq!(catalog.discount_for(Some("SAVE10"), &subtotal), Money::usd(0));
        assert_eq!(catalog.discount_for(Some(""), &subtotal), Money::usd(0));
        assert_eq!(catalog.discount_for(None, &subtotal), Money::usd(0));
    }

    #[test]
    fn test_fixed_amount_capped_at_subtotal() {
        let catalog = PromoCatalog::new().with(Promotion::fixed_amount(
            "GIFT50",
            "$50 off",
            Money::usd(5_000),
        ));
        assert_eq!(
            catalog.discount_for(Some("gift50"), &Money::usd(3_000)),
            Money::usd(3_000)
        );
        assert_eq!(
            catalog.discount_for(Some("gift50"), &Money::usd(8_000)),
            Money::usd(5_000)
        );
    }

    #[test]
    fn test_with_replaces_same_code() {
        let catalog = PromoCatalog::default().with(Promotion::percentage("discount20", "Better", 25));
        assert_eq!(catalog.promotions().len(), 1);
        assert_eq!(
            catalog.discount_for(Some("DISCOUNT20"), &Money::usd(10_000)),
            Money::usd(2_500)
        );
    }
}
