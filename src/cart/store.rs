//! Cart Store
//!
//! Callers that need to keep a cart between requests inject a store rather
//! than reaching for a global. The store holds whole carts keyed by session;
//! pricing never touches it.

use rustc_hash::FxHashMap;

use crate::cart::Cart;

/// Keyed cart persistence.
pub trait CartStore<'a> {
    /// Load the cart saved under `key`, if any.
    fn load(&self, key: &str) -> Option<Cart<'a>>;

    /// Save a snapshot of `cart` under `key`, replacing any previous snapshot.
    fn save(&mut self, key: &str, cart: &Cart<'a>);

    /// Drop the cart saved under `key`.
    fn clear(&mut self, key: &str);
}

/// In-memory cart store.
#[derive(Debug, Default)]
pub struct MemoryCartStore<'a> {
    carts: FxHashMap<String, Cart<'a>>,
}

impl MemoryCartStore<'_> {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> CartStore<'a> for MemoryCartStore<'a> {
    fn load(&self, key: &str) -> Option<Cart<'a>> {
        self.carts.get(key).cloned()
    }

    fn save(&mut self, key: &str, cart: &Cart<'a>) {
        self.carts.insert(key.to_string(), cart.clone());
    }

    fn clear(&mut self, key: &str) {
        self.carts.remove(key);
    }
}
