//! Cart store and line item types.

use std::collections::BTreeMap;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// Customization choices for a line (e.g. `engraving` -> `"A & J"`).
///
/// Ordered so two lines with the same choices compare equal regardless of
/// the order the choices were made in.
pub type Customizations = BTreeMap<String, String>;

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price captured when the line was created.
    pub unit_price: Money,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Customization choices; part of the line's identity.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub customizations: Customizations,
    /// Thumbnail reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Total price (unit_price * quantity).
    pub total_price: Money,
}

impl LineItem {
    /// Create a line for `product`, priced at its effective price.
    pub fn new(
        product: &Product,
        quantity: u32,
        customizations: Customizations,
    ) -> Result<Self, CommerceError> {
        let unit_price = product.effective_price()?;
        let total_price = unit_price
            .try_multiply(i64::from(quantity))
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price,
            quantity,
            customizations,
            image: product.primary_image().map(str::to_string),
            total_price,
        })
    }

    /// Update the total price based on quantity.
    pub fn update_total(&mut self) -> Result<(), CommerceError> {
        self.total_price = self
            .unit_price
            .try_multiply(i64::from(self.quantity))
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }

    /// Whether this line is the same product with the same choices.
    pub fn same_line(&self, product_id: &ProductId, customizations: &Customizations) -> bool {
        &self.product_id == product_id && &self.customizations == customizations
    }
}

/// In-memory cart: ordered line items plus the drawer flag.
///
/// Lines are unique by (product, customizations). The store is an ordinary
/// value; whoever needs the cart gets a reference to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartStore {
    items: Vec<LineItem>,
    #[serde(default)]
    currency: Currency,
    /// UI-only; never persisted.
    #[serde(skip)]
    is_open: bool,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Currency::USD)
    }
}

impl CartStore {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            is_open: false,
        }
    }

    /// Add `quantity` of `product` with the given customizations.
    ///
    /// An existing line with the same product and customizations has its
    /// quantity increased; otherwise a new line is appended.
    ///
    /// Returns an error if:
    /// - Quantity is zero
    /// - The product has no price
    /// - The price is in a different currency than the cart
    /// - The line would exceed MAX_QUANTITY_PER_ITEM
    /// - Arithmetic overflow would occur
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        customizations: Customizations,
    ) -> Result<&LineItem, CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let unit_price = product.effective_price()?;
        if unit_price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: unit_price.currency.code().to_string(),
            });
        }

        let existing = self
            .items
            .iter()
            .position(|i| i.same_line(&product.id, &customizations));

        let index = match existing {
            Some(index) => {
                let line = &mut self.items[index];
                let new_quantity = line.quantity.saturating_add(quantity);
                if new_quantity > MAX_QUANTITY_PER_ITEM {
                    return Err(CommerceError::QuantityExceedsLimit(
                        u64::from(line.quantity) + u64::from(quantity),
                        MAX_QUANTITY_PER_ITEM,
                    ));
                }
                let previous = line.quantity;
                line.quantity = new_quantity;
                if let Err(e) = line.update_total() {
                    line.quantity = previous;
                    return Err(e);
                }
                tracing::debug!(product_id = %product.id, quantity = new_quantity, "increased cart line");
                index
            }
            None => {
                if quantity > MAX_QUANTITY_PER_ITEM {
                    return Err(CommerceError::QuantityExceedsLimit(
                        u64::from(quantity),
                        MAX_QUANTITY_PER_ITEM,
                    ));
                }
                let line = LineItem::new(product, quantity, customizations)?;
                self.items.push(line);
                tracing::debug!(product_id = %product.id, quantity, "added cart line");
                self.items.len() - 1
            }
        };

        Ok(&self.items[index])
    }

    /// Remove every line for `product_id`. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            tracing::debug!(%product_id, "removed cart lines");
        }
        removed
    }

    /// Set the quantity of every line for `product_id`.
    ///
    /// A quantity of 0 removes the lines. Returns whether any line changed.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, CommerceError> {
        if quantity == 0 {
            return Ok(self.remove_item(product_id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                u64::from(quantity),
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        // Price every matching line first so a failure leaves the cart untouched.
        let mut updates = Vec::new();
        for (index, line) in self.items.iter().enumerate() {
            if &line.product_id == product_id {
                let total = line
                    .unit_price
                    .try_multiply(i64::from(quantity))
                    .ok_or(CommerceError::Overflow)?;
                updates.push((index, total));
            }
        }

        for &(index, total) in &updates {
            let line = &mut self.items[index];
            line.quantity = quantity;
            line.total_price = total;
        }
        if !updates.is_empty() {
            tracing::debug!(%product_id, quantity, "updated cart quantity");
        }
        Ok(!updates.is_empty())
    }

    /// Remove all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        tracing::debug!("cleared cart");
    }

    /// Total item count (sum of quantities).
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of line totals.
    pub fn total_price(&self) -> Result<Money, CommerceError> {
        Money::try_sum(self.items.iter().map(|i| &i.total_price), self.currency)
            .ok_or(CommerceError::Overflow)
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// First line for `product_id`.
    pub fn find(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open_drawer(&mut self) {
        self.is_open = true;
    }

    pub fn close_drawer(&mut self) {
        self.is_open = false;
    }

    pub fn toggle_drawer(&mut self) {
        self.is_open = !self.is_open;
    }
}
