//! The order request assembled at submission time.

use crate::cart::{CartStore, Customizations, LineItem};
use crate::checkout::{PaymentSummary, ShippingAddress};
use crate::ids::{InsuranceId, PackagingId, ProductId};
use crate::money::{self, Money};
use crate::premium::PremiumSelections;
use crate::pricing::{ShippingSpeed, Totals};
use serde::{Deserialize, Serialize};

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Unit price paid.
    #[serde(with = "money::decimal")]
    pub price: Money,
    #[serde(default, skip_serializing_if = "Customizations::is_empty")]
    pub customizations: Customizations,
}

impl From<&LineItem> for OrderLine {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price,
            customizations: line.customizations.clone(),
        }
    }
}

/// Premium choices as the backend wants them: by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_id: Option<PackagingId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_id: Option<InsuranceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_message: Option<String>,
}

impl From<&PremiumSelections> for PremiumRequest {
    fn from(selections: &PremiumSelections) -> Self {
        Self {
            packaging_id: selections.packaging.as_ref().map(|p| p.id.clone()),
            insurance_id: selections.insurance.as_ref().map(|i| i.id.clone()),
            gift_message: selections.gift_message.clone(),
        }
    }
}

/// Body of `POST /orders`. Only exists for the one submission call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    /// Mirrors the shipping address.
    pub billing_address: ShippingAddress,
    pub payment: PaymentSummary,
    pub premium_services: PremiumRequest,
    pub shipping_speed: ShippingSpeed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub totals: Totals,
    /// Same as `totals.total`; older backends read this field.
    #[serde(with = "money::decimal")]
    pub total_amount: Money,
}

impl OrderDraft {
    pub fn new(
        cart: &CartStore,
        shipping: &ShippingAddress,
        payment: PaymentSummary,
        premium: &PremiumSelections,
        shipping_speed: ShippingSpeed,
        promo_code: Option<&str>,
        totals: Totals,
    ) -> Self {
        Self {
            items: cart.items().iter().map(OrderLine::from).collect(),
            shipping_address: shipping.clone(),
            billing_address: shipping.clone(),
            payment,
            premium_services: PremiumRequest::from(premium),
            shipping_speed,
            promo_code: promo_code
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            total_amount: totals.total,
            totals,
        }
    }
}
