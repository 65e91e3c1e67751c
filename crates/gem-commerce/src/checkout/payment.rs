//! Payment form.
//!
//! Card fields are only checked for presence. The full number and CVV stay
//! in memory for the length of the checkout; nothing but the last four
//! digits is ever serialized.

use crate::checkout::{Field, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
        }
    }
}

/// Raw payment form input.
#[derive(Clone, Default, PartialEq)]
pub struct PaymentForm {
    pub card_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentForm")
            .field("card_name", &self.card_name)
            .field("card_number", &"<redacted>")
            .field("expiry", &self.expiry)
            .field("cvv", &"<redacted>")
            .finish()
    }
}

impl PaymentForm {
    pub fn validate(&self) -> Result<PaymentDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(Field::CardName, &self.card_name);
        errors.require(Field::CardNumber, &self.card_number);
        errors.require(Field::Expiry, &self.expiry);
        errors.require(Field::Cvv, &self.cvv);
        errors.into_result()?;

        Ok(PaymentDetails {
            method: PaymentMethod::CreditCard,
            card_name: self.card_name.trim().to_string(),
            card_number: self.card_number.trim().to_string(),
            expiry: self.expiry.trim().to_string(),
            cvv: self.cvv.trim().to_string(),
        })
    }
}

/// Payment data that passed the presence checks.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    method: PaymentMethod,
    card_name: String,
    card_number: String,
    expiry: String,
    cvv: String,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("method", &self.method)
            .field("card_name", &self.card_name)
            .field("last_four", &self.last_four())
            .finish_non_exhaustive()
    }
}

impl PaymentDetails {
    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn card_name(&self) -> &str {
        &self.card_name
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    /// Last four digits of the card number, ignoring spaces and dashes.
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }

    /// Masked number for display, e.g. `**** 4242`.
    pub fn masked(&self) -> String {
        format!("**** {}", self.last_four())
    }

    /// Form prefilled with everything but the CVV.
    pub fn to_form(&self) -> PaymentForm {
        PaymentForm {
            card_name: self.card_name.clone(),
            card_number: self.card_number.clone(),
            expiry: self.expiry.clone(),
            cvv: String::new(),
        }
    }

    /// The part of the payment that goes to the backend.
    pub fn summary(&self) -> PaymentSummary {
        PaymentSummary {
            method: self.method,
            card_name: self.card_name.clone(),
            last_four: self.last_four(),
        }
    }
}

/// Payment as sent with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub method: PaymentMethod,
    pub card_name: String,
    pub last_four: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> PaymentForm {
        PaymentForm {
            card_name: "Grace Hopper".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry: "12/29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_presence_only() {
        // Not a Luhn-valid number; still accepted.
        let form = PaymentForm {
            card_number: "1234".to_string(),
            ..card()
        };
        assert_eq!(form.validate().unwrap().last_four(), "1234");
    }

    #[test]
    fn test_missing_fields_reported() {
        let errors = PaymentForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(Field::Cvv));
    }

    #[test]
    fn test_last_four_ignores_separators() {
        let details = card().validate().unwrap();
        assert_eq!(details.last_four(), "4242");
        assert_eq!(details.masked(), "**** 4242");
    }

    #[test]
    fn test_summary_carries_no_card_number() {
        let details = card().validate().unwrap();
        let json = serde_json::to_string(&details.summary()).unwrap();
        assert!(!json.contains("4242 4242"));
        assert!(!json.contains("123"));
        assert!(json.contains(r#""lastFour":"4242""#));
        assert!(json.contains(r#""method":"credit_card""#));
    }

    #[test]
    fn test_debug_redacts() {
        let rendered = format!("{:?} {:?}", card(), card().validate().unwrap());
        assert!(!rendered.contains("4242 4242"));
        assert!(!rendered.contains("123"));
    }
}
