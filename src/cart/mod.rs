//! Cart

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::products::ProductKey;

pub mod store;

/// Errors related to cart construction or mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line was created or mutated down to a quantity of zero.
    #[error("line quantity must be at least 1")]
    ZeroQuantity,

    /// A line's currency differs from the cart currency (index, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// No line exists for the requested product.
    #[error("no line for product {0:?}")]
    LineNotFound(ProductKey),
}

/// One priced line of a cart: a product, its unit price at add time, and a quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine<'a> {
    product: ProductKey,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    weight_grams: Option<u32>,
    kcal: Option<u32>,
}

impl<'a> CartLine<'a> {
    /// Create a new line with no nutrition facts.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn new(
        product: ProductKey,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Self, CartError> {
        Self::with_facts(product, unit_price, quantity, None, None)
    }

    /// Create a new line carrying the product's nutrition facts.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn with_facts(
        product: ProductKey,
        unit_price: Money<'a, Currency>,
        quantity: u32,
        weight_grams: Option<u32>,
        kcal: Option<u32>,
    ) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        Ok(Self {
            product,
            unit_price,
            quantity,
            weight_grams,
            kcal,
        })
    }

    /// Returns the product of the line.
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the unit price of the line.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the quantity of the line. Always at least 1.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the portion weight in grams, if the menu declared one.
    pub fn weight_grams(&self) -> Option<u32> {
        self.weight_grams
    }

    /// Returns the energy content in kilocalories, if the menu declared one.
    pub fn kcal(&self) -> Option<u32> {
        self.kcal
    }

    /// Line total (unit price × quantity) in minor units.
    #[must_use]
    pub fn total_minor(&self) -> i64 {
        self.unit_price.to_minor_units() * i64::from(self.quantity)
    }
}

/// An active cart: priced lines in a single currency.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: SmallVec<[CartLine<'a>; 8]>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: SmallVec::new(),
            currency,
        }
    }

    /// Create a cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if any line's currency differs
    /// from the cart currency.
    pub fn with_lines(
        lines: impl IntoIterator<Item = CartLine<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut cart = Cart::new(currency);

        for line in lines {
            cart.add(line)?;
        }

        Ok(cart)
    }

    /// Add a line to the cart.
    ///
    /// A line for a product already in the cart merges into the existing line,
    /// keeping the existing unit price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the line's currency differs
    /// from the cart currency.
    pub fn add(&mut self, line: CartLine<'a>) -> Result<(), CartError> {
        let line_currency = line.unit_price.currency();

        if line_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                self.lines.len(),
                line_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|existing| existing.product == line.product)
        {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }

        Ok(())
    }

    /// Add one more unit of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the product has no line.
    pub fn increment(&mut self, product: ProductKey) -> Result<(), CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.product == product)
            .ok_or(CartError::LineNotFound(product))?;

        line.quantity += 1;

        Ok(())
    }

    /// Remove one unit of a product. Removing the last unit removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the product has no line.
    pub fn decrement(&mut self, product: ProductKey) -> Result<(), CartError> {
        let position = self
            .lines
            .iter()
            .position(|line| line.product == product)
            .ok_or(CartError::LineNotFound(product))?;

        let Some(line) = self.lines.get_mut(position) else {
            return Err(CartError::LineNotFound(product));
        };

        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.lines.remove(position);
        }

        Ok(())
    }

    /// Remove a product's line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the product has no line.
    pub fn remove(&mut self, product: ProductKey) -> Result<CartLine<'a>, CartError> {
        let position = self
            .lines
            .iter()
            .position(|line| line.product == product)
            .ok_or(CartError::LineNotFound(product))?;

        Ok(self.lines.remove(position))
    }

    /// Calculate the cart subtotal.
    ///
    /// Summed in minor units; an empty cart has a zero subtotal in the
    /// cart currency.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        let minor = self.lines.iter().map(CartLine::total_minor).sum();

        Money::from_minor(minor, self.currency)
    }

    /// Get the line for a product, if present.
    pub fn get(&self, product: ProductKey) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.product == product)
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Number of lines in the cart (not total units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
