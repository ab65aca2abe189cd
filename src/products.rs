//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

use crate::cart::{CartError, CartLine};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// A menu product.
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Portion weight in grams, where the menu declares one
    pub weight_grams: Option<u32>,

    /// Energy content in kilocalories, where the menu declares one
    pub kcal: Option<u32>,
}

impl<'a> Product<'a> {
    /// Build a cart line for `quantity` units of this product.
    ///
    /// The line copies the product's current price and nutrition facts;
    /// later menu edits do not reach lines already in a cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn line(&self, key: ProductKey, quantity: u32) -> Result<CartLine<'a>, CartError> {
        CartLine::with_facts(key, self.price, quantity, self.weight_grams, self.kcal)
    }
}
