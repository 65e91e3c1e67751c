//! Shopping cart module.
//!
//! [`CartStore`] holds the line items and the drawer flag in memory;
//! [`PersistentCart`] mirrors every mutation into a versioned cache key.

mod persist;
mod store;

pub use persist::{ConflictNotice, PersistentCart, CART_KEY};
pub use store::{CartStore, Customizations, LineItem, MAX_QUANTITY_PER_ITEM};
