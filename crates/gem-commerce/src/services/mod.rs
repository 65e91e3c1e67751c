//! Backend service clients.
//!
//! The traits are the seams the checkout session and the CLI depend on;
//! [`ApiClient`] implements all of them over `gem-data`.

mod api;
mod client;
mod error;

pub use api::{CatalogApi, OrderApi, PremiumApi};
pub use client::ApiClient;
pub use error::ServiceError;
