//! Product types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{self, Money};
use serde::{Deserialize, Serialize};

/// A piece of jewelry in the catalog.
///
/// Prices are decimal numbers on the wire and cents in memory. A malformed
/// record may omit `price`; such a product cannot be added to a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    #[serde(alias = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Regular unit price.
    #[serde(with = "money::decimal::option", default)]
    pub price: Option<Money>,
    /// Sale price, preferred over `price` when present.
    #[serde(with = "money::decimal::option", default)]
    pub discount_price: Option<Money>,
    /// Storefront category (e.g. "rings").
    #[serde(default)]
    pub category: Option<String>,
    /// Jewelry type within the category (e.g. "engagement").
    #[serde(default, alias = "type")]
    pub jewelry_type: Option<String>,
    /// Metal (e.g. "platinum").
    #[serde(default)]
    pub metal: Option<String>,
    /// Primary gemstone, if any.
    #[serde(default)]
    pub gemstone: Option<String>,
    /// Image references.
    #[serde(default)]
    pub images: Vec<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the product can be ordered.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Create a product with a regular price and no attributes.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: Some(price),
            discount_price: None,
            category: None,
            jewelry_type: None,
            metal: None,
            gemstone: None,
            images: Vec::new(),
            description: None,
            in_stock: true,
        }
    }

    /// Set a sale price.
    pub fn with_discount_price(mut self, price: Money) -> Self {
        self.discount_price = Some(price);
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the metal.
    pub fn with_metal(mut self, metal: impl Into<String>) -> Self {
        self.metal = Some(metal.into());
        self
    }

    /// Set the gemstone.
    pub fn with_gemstone(mut self, gemstone: impl Into<String>) -> Self {
        self.gemstone = Some(gemstone.into());
        self
    }

    /// The price a customer pays per unit: the sale price if set, else the
    /// regular price. A negative amount is rejected.
    pub fn effective_price(&self) -> Result<Money, CommerceError> {
        let price = self
            .discount_price
            .or(self.price)
            .ok_or_else(|| CommerceError::MissingPrice(self.id.to_string()))?;
        if price.amount_cents < 0 {
            return Err(CommerceError::InvalidPrice(self.id.to_string(), price));
        }
        Ok(price)
    }

    /// Check if the product is on sale.
    pub fn is_on_sale(&self) -> bool {
        match (self.discount_price, self.price) {
            (Some(sale), Some(regular)) => sale < regular,
            _ => false,
        }
    }

    /// First image reference, used as a thumbnail.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_prefers_discount() {
        let ring = Product::new("ring-1", "Solitaire", Money::usd(120_000))
            .with_discount_price(Money::usd(99_900));
        assert_eq!(ring.effective_price().unwrap(), Money::usd(99_900));
        assert!(ring.is_on_sale());
    }

    #[test]
    fn test_missing_price_is_an_error() {
        let mut ring = Product::new("ring-2", "Band", Money::usd(100));
        ring.price = None;
        assert!(matches!(
            ring.effective_price(),
            Err(CommerceError::MissingPrice(id)) if id == "ring-2"
        ));
    }

    #[test]
    fn test_negative_price_is_an_error() {
        let pendant: Product =
            serde_json::from_str(r#"{"_id": "bad", "name": "Pendant", "price": -50}"#).unwrap();
        assert!(matches!(
            pendant.effective_price(),
            Err(CommerceError::InvalidPrice(id, price)) if id == "bad" && price == Money::usd(-5_000)
        ));

        let sale = Product::new("ring-3", "Band", Money::usd(10_000))
            .with_discount_price(Money::usd(-1));
        assert!(sale.effective_price().is_err());
    }

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "_id": "665f",
            "name": "Sapphire Pendant",
            "price": 349.5,
            "discountPrice": null,
            "category": "necklaces",
            "type": "pendant",
            "metal": "white gold",
            "gemstone": "sapphire",
            "images": ["/img/665f-1.jpg"],
            "inStock": false
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "665f");
        assert_eq!(product.price, Some(Money::usd(34_950)));
        assert_eq!(product.discount_price, None);
        assert_eq!(product.jewelry_type.as_deref(), Some("pendant"));
        assert_eq!(product.primary_image(), Some("/img/665f-1.jpg"));
        assert!(!product.in_stock);
    }

    #[test]
    fn test_deserialize_record_without_price() {
        let product: Product = serde_json::from_str(r#"{"id": "x", "name": "Loose"}"#).unwrap();
        assert_eq!(product.price, None);
        assert!(product.in_stock);
        assert!(product.effective_price().is_err());
    }
}
