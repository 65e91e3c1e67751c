//! Pricing: promo codes, shipping speed and the order totals calculator.
//!
//! Everything here is a pure function of the cart and the checkout choices.

mod promo;
mod totals;

pub use promo::{PromoCatalog, PromoValue, Promotion};
pub use totals::{PricingPolicy, ShippingSpeed, Totals};
