//! Order Summary

use rusty_money::{Money, iso::Currency};

/// The priced breakdown of a checkout: subtotal, discount, each fee, and the
/// final payable total.
///
/// Produced by [`crate::pricing::price`]; never persisted as mutable state.
/// `total = subtotal − discount + delivery_fee + payment_fee + gift_wrap_fee`,
/// clamped to zero if fee misconfiguration would drive it negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary<'a> {
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    delivery_fee: Money<'a, Currency>,
    payment_fee: Money<'a, Currency>,
    gift_wrap_fee: Money<'a, Currency>,
    total: Money<'a, Currency>,
    clamped: bool,
}

impl<'a> OrderSummary<'a> {
    /// Create a new summary with the given components.
    #[must_use]
    pub fn new(
        subtotal: Money<'a, Currency>,
        discount: Money<'a, Currency>,
        delivery_fee: Money<'a, Currency>,
        payment_fee: Money<'a, Currency>,
        gift_wrap_fee: Money<'a, Currency>,
        total: Money<'a, Currency>,
        clamped: bool,
    ) -> Self {
        Self {
            subtotal,
            discount,
            delivery_fee,
            payment_fee,
            gift_wrap_fee,
            total,
            clamped,
        }
    }

    /// Sum of line prices before any discount or fee.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount taken off by the applied promo. Never exceeds the subtotal.
    #[must_use]
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Delivery fee after any waiver.
    #[must_use]
    pub fn delivery_fee(&self) -> Money<'a, Currency> {
        self.delivery_fee
    }

    /// Flat payment method surcharge.
    #[must_use]
    pub fn payment_fee(&self) -> Money<'a, Currency> {
        self.payment_fee
    }

    /// Flat gift wrap fee, zero unless requested.
    #[must_use]
    pub fn gift_wrap_fee(&self) -> Money<'a, Currency> {
        self.gift_wrap_fee
    }

    /// Final payable amount. Never negative.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Amount the customer saved against the undiscounted subtotal.
    #[must_use]
    pub fn savings(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Whether the total had to be clamped up to zero because the configured
    /// fees drove it negative. Clamping is logged where it happens; this flag
    /// lets callers surface the misconfiguration.
    #[must_use]
    pub fn clamped(&self) -> bool {
        self.clamped
    }
}
