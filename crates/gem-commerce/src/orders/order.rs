//! Placed orders as returned by the backend.

use crate::checkout::{PaymentSummary, ShippingAddress};
use crate::ids::OrderId;
use crate::money::{self, Money};
use crate::orders::{OrderLine, PremiumRequest};
use crate::pricing::ShippingSpeed;
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
    /// Order refunded.
    Refunded,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
            OrderStatus::Unknown => "Unknown",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Refunded
        )
    }
}

/// Payment status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Unknown => "unknown",
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    #[serde(alias = "_id")]
    pub id: OrderId,
    /// Human-readable order number, when the backend assigns one.
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment: Option<PaymentSummary>,
    #[serde(default)]
    pub premium_services: Option<PremiumRequest>,
    #[serde(default)]
    pub shipping_speed: ShippingSpeed,
    #[serde(default)]
    pub promo_code: Option<String>,
    /// Grand total charged.
    #[serde(with = "money::decimal", alias = "totalAmount")]
    pub total: Money,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Order {
    /// Order number if assigned, else the id.
    pub fn reference(&self) -> &str {
        self.order_number.as_deref().unwrap_or(self.id.as_str())
    }

    /// Get total item count.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Check if order is paid.
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_from_backend_json() {
        let json = r#"{
            "_id": "ord-1",
            "orderNumber": "GS-1001",
            "status": "shipped",
            "paymentStatus": "paid",
            "items": [
                {"productId": "ring-1", "name": "Solitaire", "quantity": 2, "price": 50}
            ],
            "totalAmount": 119.99,
            "createdAt": "2026-10-01T12:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.reference(), "GS-1001");
        assert_eq!(order.status, OrderStatus::Shipped);
        assert!(order.is_paid());
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total, Money::usd(11_999));
        assert_eq!(order.items[0].price, Money::usd(5_000));
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let order: Order =
            serde_json::from_str(r#"{"id": "o", "status": "on-hold", "total": 1}"#).unwrap();
        assert_eq!(order.status, OrderStatus::Unknown);
        assert_eq!(order.reference(), "o");
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }
}
