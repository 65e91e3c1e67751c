//! Packaging and insurance option lists and the per-checkout selection.

use crate::error::CommerceError;
use crate::ids::{InsuranceId, PackagingId};
use crate::money::{self, Currency, Money};
use serde::{Deserialize, Serialize};

/// A gift packaging choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingOption {
    #[serde(alias = "_id")]
    pub id: PackagingId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
}

/// An insurance plan for the shipment and the piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceOption {
    #[serde(alias = "_id")]
    pub id: InsuranceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    /// Coverage term in months, when the plan states one.
    #[serde(default)]
    pub coverage_months: Option<u32>,
}

/// Premium choices made during one checkout. All optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumSelections {
    pub packaging: Option<PackagingOption>,
    pub insurance: Option<InsuranceOption>,
    pub gift_message: Option<String>,
}

impl PremiumSelections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_packaging(mut self, option: PackagingOption) -> Self {
        self.packaging = Some(option);
        self
    }

    pub fn with_insurance(mut self, option: InsuranceOption) -> Self {
        self.insurance = Some(option);
        self
    }

    /// Set the gift message; blank messages are dropped.
    pub fn with_gift_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.gift_message = (!message.trim().is_empty()).then_some(message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.packaging.is_none() && self.insurance.is_none() && self.gift_message.is_none()
    }

    /// Packaging price plus insurance price; absent choices cost nothing.
    pub fn premium_cost(&self, currency: Currency) -> Result<Money, CommerceError> {
        let prices = [
            self.packaging.as_ref().map(|p| p.price),
            self.insurance.as_ref().map(|i| i.price),
        ];
        prices
            .iter()
            .flatten()
            .try_fold(Money::zero(currency), |acc, price| {
                if price.currency != currency {
                    return Err(CommerceError::CurrencyMismatch {
                        expected: currency.to_string(),
                        got: price.currency.to_string(),
                    });
                }
                acc.try_add(price).ok_or(CommerceError::Overflow)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn velvet_box() -> PackagingOption {
        PackagingOption {
            id: PackagingId::new("pkg-velvet"),
            name: "Velvet box".to_string(),
            description: String::new(),
            price: Money::usd(1_500),
        }
    }

    fn full_cover() -> InsuranceOption {
        InsuranceOption {
            id: InsuranceId::new("ins-full"),
            name: "Full coverage".to_string(),
            description: String::new(),
            price: Money::usd(4_999),
            coverage_months: Some(12),
        }
    }

    #[test]
    fn test_premium_cost_sums_choices() {
        let none = PremiumSelections::new();
        assert_eq!(none.premium_cost(Currency::USD).unwrap(), Money::usd(0));

        let both = PremiumSelections::new()
            .with_packaging(velvet_box())
            .with_insurance(full_cover());
        assert_eq!(both.premium_cost(Currency::USD).unwrap(), Money::usd(6_499));
    }

    #[test]
    fn test_gift_message_only_costs_nothing() {
        let selections = PremiumSelections::new().with_gift_message("Happy anniversary");
        assert!(!selections.is_empty());
        assert_eq!(selections.premium_cost(Currency::USD).unwrap(), Money::usd(0));
    }

    #[test]
    fn test_blank_gift_message_is_dropped() {
        assert!(PremiumSelections::new().with_gift_message("   ").is_empty());
    }

    #[test]
    fn test_option_from_backend_json() {
        let option: PackagingOption = serde_json::from_str(
            r#"{"_id": "pkg-1", "name": "Signature box", "description": "Lacquered", "price": 25}"#,
        )
        .unwrap();
        assert_eq!(option.price, Money::usd(2_500));
    }
}
