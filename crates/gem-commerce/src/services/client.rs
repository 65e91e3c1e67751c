//! HTTP implementation of the service traits.

use async_trait::async_trait;
use gem_data::FetchClient;
use serde::Deserialize;

use crate::catalog::{Product, ProductQuery};
use crate::ids::{OrderId, ProductId};
use crate::orders::{Order, OrderDraft};
use crate::premium::{
    CertificationRequest, CertificationTicket, Consultation, ConsultationRequest, InsuranceOption,
    PackagingOption,
};
use crate::services::{CatalogApi, OrderApi, PremiumApi, ServiceError};

/// List endpoints answer either with a bare array or with the array under a
/// named field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "products", alias = "orders", alias = "options")]
        data: Vec<T>,
    },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { data: items } => items,
        }
    }
}

/// Pass-through client for the storefront backend. No caching, no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: FetchClient,
}

impl ApiClient {
    /// Wrap a configured [`FetchClient`] (base URL, auth header, transport).
    pub fn new(http: FetchClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &FetchClient {
        &self.http
    }
}

#[async_trait]
impl OrderApi for ApiClient {
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, ServiceError> {
        let order: Order = self.http.post("/orders").json(draft).fetch_json().await?;
        tracing::info!(order_id = %order.id, total = %order.total, "order created");
        Ok(order)
    }

    async fn my_orders(&self) -> Result<Vec<Order>, ServiceError> {
        let listing: Listing<Order> = self.http.get("/orders/my-orders").fetch_json().await?;
        Ok(listing.into_vec())
    }

    async fn order(&self, id: &OrderId) -> Result<Order, ServiceError> {
        Ok(self.http.get(format!("/orders/{}", id)).fetch_json().await?)
    }

    async fn packaging_options(&self) -> Result<Vec<PackagingOption>, ServiceError> {
        let listing: Listing<PackagingOption> =
            self.http.get("/premium/packaging").fetch_json().await?;
        Ok(listing.into_vec())
    }

    async fn insurance_options(&self) -> Result<Vec<InsuranceOption>, ServiceError> {
        let listing: Listing<InsuranceOption> =
            self.http.get("/premium/insurance").fetch_json().await?;
        Ok(listing.into_vec())
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ServiceError> {
        let listing: Listing<Product> = self
            .http
            .get("/products")
            .query(query.to_params())
            .fetch_json()
            .await?;
        Ok(listing.into_vec())
    }

    async fn product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        Ok(self.http.get(format!("/products/{}", id)).fetch_json().await?)
    }
}

#[async_trait]
impl PremiumApi for ApiClient {
    async fn book_consultation(
        &self,
        request: &ConsultationRequest,
    ) -> Result<Consultation, ServiceError> {
        Ok(self
            .http
            .post("/premium/consultations")
            .json(request)
            .fetch_json()
            .await?)
    }

    async fn request_certification(
        &self,
        request: &CertificationRequest,
    ) -> Result<CertificationTicket, ServiceError> {
        Ok(self
            .http
            .post("/premium/certifications")
            .json(request)
            .fetch_json()
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use gem_data::{FetchError, Method, MockTransport};
    use serde_json::json;

    fn client(transport: &MockTransport) -> ApiClient {
        ApiClient::new(FetchClient::with_transport(transport.clone()).with_base_url("http://api.test"))
    }

    #[tokio::test]
    async fn test_my_orders_bare_array() {
        let transport = MockTransport::new();
        transport.reply_json(200, json!([{"_id": "o1", "total": 10.5}]));

        let orders = client(&transport).my_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total, Money::usd(1_050));
        assert_eq!(transport.requests()[0].url(), "http://api.test/orders/my-orders");
    }

    #[tokio::test]
    async fn test_wrapped_listing() {
        let transport = MockTransport::new();
        transport.reply_json(
            200,
            json!({"options": [{"_id": "velvet", "name": "Velvet box", "price": 15}]}),
        );

        let options = client(&transport).packaging_options().await.unwrap();
        assert_eq!(options[0].price, Money::usd(1_500));
        assert_eq!(transport.requests()[0].url(), "http://api.test/premium/packaging");
    }

    #[tokio::test]
    async fn test_order_by_id_path() {
        let transport = MockTransport::new();
        transport.reply_json(200, json!({"_id": "abc", "totalAmount": 1}));

        let order = client(&transport).order(&OrderId::new("abc")).await.unwrap();
        assert_eq!(order.id.as_str(), "abc");
        assert_eq!(transport.requests()[0].url(), "http://api.test/orders/abc");
    }

    #[tokio::test]
    async fn test_products_query_string() {
        let transport = MockTransport::new();
        transport.reply_json(200, json!({"products": []}));

        let query = ProductQuery::new().with_category("rings").with_metal("rose gold");
        let products = client(&transport).products(&query).await.unwrap();
        assert!(products.is_empty());
        assert_eq!(
            transport.requests()[0].url(),
            "http://api.test/products?category=rings&metal=rose+gold"
        );
    }

    #[tokio::test]
    async fn test_insurance_options_uses_its_own_path() {
        let transport = MockTransport::new();
        transport.reply_json(200, json!([]));
        client(&transport).insurance_options().await.unwrap();
        assert_eq!(transport.requests()[0].url(), "http://api.test/premium/insurance");
    }

    #[tokio::test]
    async fn test_backend_error_message_surfaces() {
        let transport = MockTransport::new();
        transport.reply_json(400, json!({"message": "Insufficient stock for Solitaire"}));

        let err = client(&transport)
            .product(&ProductId::new("ring-1"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Insufficient stock for Solitaire");
        assert_eq!(err.status, Some(400));
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_service_error() {
        let transport = MockTransport::new();
        transport.fail(FetchError::RequestError("connection refused".to_string()));

        let err = client(&transport).my_orders().await.unwrap_err();
        assert!(err.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_book_consultation_posts_json() {
        use crate::premium::ConsultationKind;

        let transport = MockTransport::new();
        transport.reply_json(
            201,
            json!({"_id": "c1", "kind": "appraisal", "preferredDate": "2026-11-02", "status": "booked"}),
        );

        let request = ConsultationRequest {
            kind: ConsultationKind::Appraisal,
            preferred_date: "2026-11-02".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            notes: None,
        };
        let booked = client(&transport).book_consultation(&request).await.unwrap();
        assert_eq!(booked.status, "booked");

        let sent = &transport.requests()[0];
        assert_eq!(sent.method(), Method::Post);
        assert_eq!(sent.url(), "http://api.test/premium/consultations");
    }
}
