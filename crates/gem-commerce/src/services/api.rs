//! Service traits.

use async_trait::async_trait;

use crate::catalog::{Product, ProductQuery};
use crate::ids::{OrderId, ProductId};
use crate::orders::{Order, OrderDraft};
use crate::premium::{
    CertificationRequest, CertificationTicket, Consultation, ConsultationRequest, InsuranceOption,
    PackagingOption,
};
use crate::services::ServiceError;

/// Order endpoints plus the premium option lists the checkout needs.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// `POST /orders`
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, ServiceError>;

    /// `GET /orders/my-orders`
    async fn my_orders(&self) -> Result<Vec<Order>, ServiceError>;

    /// `GET /orders/{id}`
    async fn order(&self, id: &OrderId) -> Result<Order, ServiceError>;

    /// `GET /premium/packaging`
    async fn packaging_options(&self) -> Result<Vec<PackagingOption>, ServiceError>;

    /// `GET /premium/insurance`
    async fn insurance_options(&self) -> Result<Vec<InsuranceOption>, ServiceError>;
}

/// Product catalog endpoints.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /products?...`
    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ServiceError>;

    /// `GET /products/{id}`
    async fn product(&self, id: &ProductId) -> Result<Product, ServiceError>;
}

/// Premium service bookings.
#[async_trait]
pub trait PremiumApi: Send + Sync {
    /// `POST /premium/consultations`
    async fn book_consultation(
        &self,
        request: &ConsultationRequest,
    ) -> Result<Consultation, ServiceError>;

    /// `POST /premium/certifications`
    async fn request_certification(
        &self,
        request: &CertificationRequest,
    ) -> Result<CertificationTicket, ServiceError>;
}
