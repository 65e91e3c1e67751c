//! Cart, pricing and checkout domain for the gemstore jewelry storefront.
//!
//! - **Catalog**: products and catalog queries
//! - **Premium**: packaging, insurance, consultations, certifications
//! - **Cart**: line items, drawer flag, versioned persistence
//! - **Pricing**: tax, shipping threshold, promo codes, totals
//! - **Checkout**: validated forms, step state machine, order submission
//! - **Services**: async backend clients behind traits
//!
//! # Example
//!
//! ```rust
//! use gem_commerce::prelude::*;
//!
//! let pendant = Product::new("pendant-1", "Pearl Pendant", Money::usd(5_000));
//!
//! let mut cart = CartStore::default();
//! cart.add_item(&pendant, 2, Customizations::new()).unwrap();
//!
//! let totals = PricingPolicy::default()
//!     .totals(&cart, ShippingSpeed::Standard, None, &PremiumSelections::new())
//!     .unwrap();
//! assert_eq!(totals.total.display(), "$119.99");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod premium;
pub mod pricing;
pub mod services;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Product, ProductQuery, SortOption};

    // Premium
    pub use crate::premium::{
        CertificationLab, CertificationRequest, ConsultationKind, ConsultationRequest,
        InsuranceOption, PackagingOption, PremiumSelections,
    };

    // Cart
    pub use crate::cart::{CartStore, ConflictNotice, Customizations, LineItem, PersistentCart};

    // Pricing
    pub use crate::pricing::{PricingPolicy, PromoCatalog, Promotion, ShippingSpeed, Totals};

    // Checkout
    pub use crate::checkout::{
        CheckoutError, CheckoutSession, CheckoutState, CheckoutStep, PaymentForm,
        ShippingAddress, ShippingForm, StepInput, ValidationErrors,
    };

    // Orders
    pub use crate::orders::{Order, OrderDraft, OrderStatus};

    // Services
    pub use crate::services::{ApiClient, CatalogApi, OrderApi, PremiumApi, ServiceError};
}
