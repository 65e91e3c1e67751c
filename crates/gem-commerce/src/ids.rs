//! Newtype IDs for type-safe identifiers.
//!
//! Identifiers are minted by the backend; the client only carries them
//! around, so there is no local generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Catalog product identifier.
    ProductId
);
define_id!(
    /// Placed order identifier.
    OrderId
);
define_id!(
    /// Gift packaging option identifier.
    PackagingId
);
define_id!(
    /// Insurance plan identifier.
    InsuranceId
);
define_id!(
    /// Booked consultation identifier.
    ConsultationId
);
define_id!(
    /// Certification request identifier.
    CertificationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("ring-123");
        assert_eq!(id.as_str(), "ring-123");
    }

    #[test]
    fn test_id_from_string() {
        let id: OrderId = "ord-456".into();
        assert_eq!(id.as_str(), "ord-456");
        assert_eq!(id.into_inner(), "ord-456");
    }

    #[test]
    fn test_id_display() {
        let id = ProductId::new("ring-789");
        assert_eq!(format!("{}", id), "ring-789");
    }

    #[test]
    fn test_id_is_a_bare_string_on_the_wire() {
        let id = PackagingId::new("pkg-velvet");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""pkg-velvet""#);
        let back: PackagingId = serde_json::from_str(r#""pkg-velvet""#).unwrap();
        assert_eq!(back, id);
    }
}
