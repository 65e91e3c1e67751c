//! Order totals.

use crate::cart::CartStore;
use crate::error::CommerceError;
use crate::money::{self, Currency, Money};
use crate::premium::PremiumSelections;
use crate::pricing::PromoCatalog;
use serde::{Deserialize, Serialize};

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingSpeed {
    #[default]
    Standard,
    Express,
}

impl ShippingSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingSpeed::Standard => "standard",
            ShippingSpeed::Express => "express",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShippingSpeed::Standard => "Standard (5-7 business days)",
            ShippingSpeed::Express => "Express (1-2 business days)",
        }
    }
}

/// Rates and thresholds the calculator applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Sales tax, whole percent of the subtotal.
    pub tax_percent: u32,
    /// Standard shipping is free when the subtotal is strictly above this.
    pub free_shipping_threshold: Money,
    pub standard_shipping: Money,
    /// Flat express fee; applies regardless of subtotal.
    pub express_shipping: Money,
    pub promos: PromoCatalog,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_percent: 10,
            free_shipping_threshold: Money::usd(10_000),
            standard_shipping: Money::usd(999),
            express_shipping: Money::usd(1_999),
            promos: PromoCatalog::default(),
        }
    }
}

impl PricingPolicy {
    pub fn currency(&self) -> Currency {
        self.free_shipping_threshold.currency
    }

    pub fn tax(&self, subtotal: &Money) -> Money {
        subtotal.percentage(self.tax_percent)
    }

    pub fn shipping(&self, subtotal: &Money, speed: ShippingSpeed) -> Money {
        match speed {
            ShippingSpeed::Express => self.express_shipping,
            ShippingSpeed::Standard if subtotal > &self.free_shipping_threshold => {
                Money::zero(subtotal.currency)
            }
            ShippingSpeed::Standard => self.standard_shipping,
        }
    }

    /// How much more subtotal unlocks free standard shipping.
    pub fn free_shipping_remaining(&self, subtotal: &Money) -> Money {
        if subtotal > &self.free_shipping_threshold {
            return Money::zero(subtotal.currency);
        }
        // Strictly above the threshold, so one minor unit past it.
        Money::new(
            self.free_shipping_threshold.amount_cents - subtotal.amount_cents + 1,
            subtotal.currency,
        )
    }

    /// Totals for the current cart and checkout choices.
    pub fn totals(
        &self,
        cart: &CartStore,
        speed: ShippingSpeed,
        promo_code: Option<&str>,
        premium: &PremiumSelections,
    ) -> Result<Totals, CommerceError> {
        let subtotal = cart.total_price()?;
        let premium = premium.premium_cost(subtotal.currency)?;
        self.totals_for_subtotal(subtotal, speed, promo_code, premium)
    }

    /// Totals from an already-known subtotal and premium cost.
    pub fn totals_for_subtotal(
        &self,
        subtotal: Money,
        speed: ShippingSpeed,
        promo_code: Option<&str>,
        premium: Money,
    ) -> Result<Totals, CommerceError> {
        if subtotal.currency != self.currency() {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency().code().to_string(),
                got: subtotal.currency.code().to_string(),
            });
        }

        let tax = self.tax(&subtotal);
        let shipping = self.shipping(&subtotal, speed);
        let discount = self.promos.discount_for(promo_code, &subtotal);

        let total = subtotal
            .try_add(&tax)
            .and_then(|m| m.try_add(&shipping))
            .and_then(|m| m.try_subtract(&discount))
            .and_then(|m| m.try_add(&premium))
            .ok_or(CommerceError::Overflow)?;

        Ok(Totals {
            subtotal,
            tax,
            shipping,
            discount,
            premium,
            total,
            free_shipping_remaining: self.free_shipping_remaining(&subtotal),
        })
    }
}

/// Derived pricing breakdown. Never stored; recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[serde(with = "money::decimal")]
    pub subtotal: Money,
    #[serde(with = "money::decimal")]
    pub tax: Money,
    #[serde(with = "money::decimal")]
    pub shipping: Money,
    #[serde(with = "money::decimal")]
    pub discount: Money,
    #[serde(with = "money::decimal")]
    pub premium: Money,
    #[serde(with = "money::decimal")]
    pub total: Money,
    #[serde(skip)]
    pub free_shipping_remaining: Money,
}

impl Totals {
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }
}
