//! Shipping address form and the validated address.

use crate::checkout::{Field, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Raw shipping form input. Any field may be blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Defaults to "US" when blank.
    #[serde(default)]
    pub country: String,
}

impl ShippingForm {
    /// Check every required field, reporting all failures at once.
    pub fn validate(&self) -> Result<ShippingAddress, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(Field::FullName, &self.full_name);
        errors.require(Field::Email, &self.email);
        errors.require(Field::Phone, &self.phone);
        errors.require(Field::Address, &self.address);
        errors.require(Field::City, &self.city);
        errors.require(Field::State, &self.state);
        errors.require(Field::Zip, &self.zip);
        errors.into_result()?;

        let country = self.country.trim();
        Ok(ShippingAddress {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip.trim().to_string(),
            country: if country.is_empty() {
                "US".to_string()
            } else {
                country.to_string()
            },
        })
    }
}

impl From<&ShippingAddress> for ShippingForm {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            full_name: address.full_name.clone(),
            email: address.email.clone(),
            phone: address.phone.clone(),
            address: address.address.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip: address.zip_code.clone(),
            country: address.country.clone(),
        }
    }
}

/// A shipping address that passed validation. Also used as the billing
/// address, which mirrors shipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(alias = "zip")]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

impl ShippingAddress {
    /// Format as single line.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.address, self.city, self.state, self.zip_code, self.country
        )
    }

    /// Format as multi-line.
    pub fn multi_line(&self) -> String {
        [
            self.full_name.clone(),
            self.address.clone(),
            format!("{}, {} {}", self.city, self.state, self.zip_code),
            self.country.clone(),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ShippingForm {
        ShippingForm {
            full_name: " Grace Hopper ".to_string(),
            email: "grace@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Navy Way".to_string(),
            city: "Arlington".to_string(),
            state: "VA".to_string(),
            zip: "22202".to_string(),
            country: String::new(),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let address = filled().validate().unwrap();
        assert_eq!(address.full_name, "Grace Hopper");
        assert_eq!(address.country, "US");
        assert_eq!(address.one_line(), "1 Navy Way, Arlington, VA 22202, US");
    }

    #[test]
    fn test_every_missing_field_reported() {
        let form = ShippingForm {
            email: " ".to_string(),
            zip: String::new(),
            ..filled()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(Field::Email));
        assert!(errors.contains(Field::Zip));
    }

    #[test]
    fn test_empty_form_reports_seven_fields() {
        assert_eq!(ShippingForm::default().validate().unwrap_err().len(), 7);
    }

    #[test]
    fn test_form_round_trip_for_prefill() {
        let address = filled().validate().unwrap();
        let form = ShippingForm::from(&address);
        assert_eq!(form.validate().unwrap(), address);
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(filled().validate().unwrap()).unwrap();
        assert_eq!(value["fullName"], "Grace Hopper");
        assert_eq!(value["zipCode"], "22202");
    }
}
