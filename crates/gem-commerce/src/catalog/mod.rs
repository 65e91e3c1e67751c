//! Product catalog module.
//!
//! Products are fetched from the backend and never mutated locally.

mod product;
mod query;

pub use product::Product;
pub use query::{ProductQuery, SortOption};
