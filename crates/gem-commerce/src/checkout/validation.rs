//! Per-field form validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A checkout form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Email,
    Phone,
    Address,
    City,
    State,
    Zip,
    CardName,
    CardNumber,
    Expiry,
    Cvv,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::City => "city",
            Field::State => "state",
            Field::Zip => "zip",
            Field::CardName => "cardName",
            Field::CardNumber => "cardNumber",
            Field::Expiry => "expiry",
            Field::Cvv => "cvv",
        }
    }

    /// Human label, as shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Field::FullName => "Full name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Address => "Address",
            Field::City => "City",
            Field::State => "State",
            Field::Zip => "ZIP code",
            Field::CardName => "Name on card",
            Field::CardNumber => "Card number",
            Field::Expiry => "Expiry date",
            Field::Cvv => "CVV",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every field that failed, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("please fix: {}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `field` as missing when `value` is empty or whitespace.
    pub fn require(&mut self, field: Field, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", field.label()));
        }
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_treats_whitespace_as_empty() {
        let mut errors = ValidationErrors::new();
        errors.require(Field::Email, "   ");
        errors.require(Field::City, "Austin");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert!(!errors.contains(Field::City));
    }

    #[test]
    fn test_display_lists_every_failure() {
        let mut errors = ValidationErrors::new();
        errors.require(Field::Email, "");
        errors.require(Field::Zip, "");
        assert_eq!(
            errors.to_string(),
            "please fix: Email is required; ZIP code is required"
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let mut errors = ValidationErrors::new();
        errors.add(Field::Cvv, "CVV is required");
        assert!(errors.into_result().is_err());
    }
}
