//! Cart persistence over a versioned cache key.

use gem_cache::{Cache, CacheError, VersionedStore, WriteOutcome};

use crate::cart::{CartStore, Customizations, LineItem};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Currency;

/// Fixed cache key the cart lives under.
pub const CART_KEY: &str = "gem-cart";

/// Another handle wrote the cart since this one last read it. The write
/// went through anyway; the caller decides whether to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictNotice {
    /// Version this handle expected to find.
    pub expected: u64,
    /// Version that was actually stored.
    pub found: u64,
    /// Version written.
    pub written: u64,
}

/// A [`CartStore`] whose every mutation is saved to the cache.
///
/// Mutators return `Ok(Some(notice))` when the save overwrote a newer cart.
#[derive(Debug)]
pub struct PersistentCart {
    cart: CartStore,
    store: VersionedStore<CartStore>,
}

impl PersistentCart {
    /// Load the saved cart, or start empty.
    ///
    /// A saved payload that no longer parses is logged and replaced with an
    /// empty cart on the next write.
    pub fn restore(cache: Cache) -> Result<Self, CommerceError> {
        Self::restore_with_currency(cache, Currency::USD)
    }

    pub fn restore_with_currency(cache: Cache, currency: Currency) -> Result<Self, CommerceError> {
        let mut store = VersionedStore::new(cache, CART_KEY);
        let cart = match store.load() {
            Ok(Some(cart)) => {
                tracing::debug!(version = store.seen_version(), "restored cart");
                cart
            }
            Ok(None) => CartStore::new(currency),
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(error = %e, key = CART_KEY, "discarding unreadable saved cart");
                CartStore::new(currency)
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { cart, store })
    }

    /// Read-only view of the cart.
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Version this handle last read or wrote.
    pub fn version(&self) -> u64 {
        self.store.seen_version()
    }

    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        customizations: Customizations,
    ) -> Result<(LineItem, Option<ConflictNotice>), CommerceError> {
        let line = self.cart.add_item(product, quantity, customizations)?.clone();
        let notice = self.persist()?;
        Ok((line, notice))
    }

    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
    ) -> Result<(bool, Option<ConflictNotice>), CommerceError> {
        let removed = self.cart.remove_item(product_id);
        let notice = if removed { self.persist()? } else { None };
        Ok((removed, notice))
    }

    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(bool, Option<ConflictNotice>), CommerceError> {
        let changed = self.cart.update_quantity(product_id, quantity)?;
        let notice = if changed { self.persist()? } else { None };
        Ok((changed, notice))
    }

    pub fn clear(&mut self) -> Result<Option<ConflictNotice>, CommerceError> {
        self.cart.clear();
        self.persist()
    }

    /// Re-read the saved cart, dropping local state.
    pub fn reload(&mut self) -> Result<(), CommerceError> {
        let currency = self.cart.currency();
        self.cart = match self.store.load() {
            Ok(Some(cart)) => cart,
            Ok(None) => CartStore::new(currency),
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(error = %e, key = CART_KEY, "discarding unreadable saved cart");
                CartStore::new(currency)
            }
            Err(e) => return Err(e.into()),
        };
        Ok(())
    }

    pub fn open_drawer(&mut self) {
        self.cart.open_drawer();
    }

    pub fn close_drawer(&mut self) {
        self.cart.close_drawer();
    }

    pub fn toggle_drawer(&mut self) {
        self.cart.toggle_drawer();
    }

    fn persist(&mut self) -> Result<Option<ConflictNotice>, CommerceError> {
        match self.store.save(&self.cart)? {
            WriteOutcome::Written { .. } => Ok(None),
            WriteOutcome::Overwrote {
                version,
                expected,
                found,
            } => Ok(Some(ConflictNotice {
                expected,
                found,
                written: version,
            })),
        }
    }

    /// Hand out the in-memory cart for a checkout submission, persisting
    /// whatever the submission did to it.
    pub fn with_cart<R>(
        &mut self,
        f: impl FnOnce(&mut CartStore) -> R,
    ) -> Result<(R, Option<ConflictNotice>), CommerceError> {
        let before = self.cart.clone();
        let result = f(&mut self.cart);
        let notice = if self.cart != before {
            self.persist()?
        } else {
            None
        };
        Ok((result, notice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use gem_cache::MemoryBackend;

    fn ring() -> Product {
        Product::new("ring-1", "Solitaire Ring", Money::usd(5_000))
    }

    fn shared_cache() -> (Cache, Cache) {
        let backend = MemoryBackend::new();
        (Cache::new(backend.clone()), Cache::new(backend))
    }

    #[test]
    fn test_restore_empty() {
        let cart = PersistentCart::restore(Cache::memory()).unwrap();
        assert!(cart.cart().is_empty());
        assert_eq!(cart.version(), 0);
    }

    #[test]
    fn test_mutations_survive_restore() {
        let (a, b) = shared_cache();
        let mut cart = PersistentCart::restore(a).unwrap();
        cart.add_item(&ring(), 2, Customizations::new()).unwrap();
        cart.update_quantity(&ProductId::new("ring-1"), 3).unwrap();

        let restored = PersistentCart::restore(b).unwrap();
        assert_eq!(restored.cart().total_items(), 3);
        assert_eq!(restored.version(), 2);
    }

    #[test]
    fn test_failed_mutation_does_not_write() {
        let mut cart = PersistentCart::restore(Cache::memory()).unwrap();
        assert!(cart.add_item(&ring(), 0, Customizations::new()).is_err());
        assert_eq!(cart.version(), 0);
        let (removed, notice) = cart.remove_item(&ProductId::new("ring-1")).unwrap();
        assert!(!removed);
        assert!(notice.is_none());
        assert_eq!(cart.version(), 0);
    }

    #[test]
    fn test_concurrent_writer_produces_notice() {
        let (a, b) = shared_cache();
        let mut tab_one = PersistentCart::restore(a).unwrap();
        let mut tab_two = PersistentCart::restore(b).unwrap();

        let (_, notice) = tab_one.add_item(&ring(), 1, Customizations::new()).unwrap();
        assert!(notice.is_none());

        // tab_two never saw tab_one's write; last write wins, with a notice.
        let necklace = Product::new("n-1", "Necklace", Money::usd(900));
        let (_, notice) = tab_two.add_item(&necklace, 1, Customizations::new()).unwrap();
        assert_eq!(
            notice,
            Some(ConflictNotice {
                expected: 0,
                found: 1,
                written: 2
            })
        );

        tab_one.reload().unwrap();
        assert_eq!(tab_one.cart().line_count(), 1);
        assert!(tab_one.cart().find(&ProductId::new("n-1")).is_some());
    }

    #[test]
    fn test_corrupt_payload_replaced_with_empty_cart() {
        let (a, b) = shared_cache();
        a.set(
            CART_KEY,
            &serde_json::json!({"version": 4, "updated_at": 1, "data": "garbage"}),
        )
        .unwrap();

        let mut cart = PersistentCart::restore(b).unwrap();
        assert!(cart.cart().is_empty());
        assert_eq!(cart.version(), 4);

        let (_, notice) = cart.add_item(&ring(), 1, Customizations::new()).unwrap();
        assert!(notice.is_none());
        assert_eq!(cart.version(), 5);
    }

    #[test]
    fn test_with_cart_persists_changes() {
        let (a, b) = shared_cache();
        let mut cart = PersistentCart::restore(a).unwrap();
        cart.add_item(&ring(), 1, Customizations::new()).unwrap();

        let (_, notice) = cart.with_cart(|c| c.clear()).unwrap();
        assert!(notice.is_none());

        let restored = PersistentCart::restore(b).unwrap();
        assert!(restored.cart().is_empty());
    }
}
