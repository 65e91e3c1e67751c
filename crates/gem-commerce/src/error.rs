//! Commerce error types.

use thiserror::Error;

use crate::money::Money;

/// Errors that can occur in cart and pricing operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Quantity was zero where a positive amount is required.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// The product record has no usable price.
    #[error("Product {0} has no price")]
    MissingPrice(String),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u64, u32),

    /// The product record carries a negative price.
    #[error("Product {0} has an invalid price: {1}")]
    InvalidPrice(String, Money),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Persistence error.
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<gem_cache::CacheError> for CommerceError {
    fn from(e: gem_cache::CacheError) -> Self {
        CommerceError::CacheError(e.to_string())
    }
}
