//! Payment Methods

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors related to payment method selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The cart subtotal is under the method's order minimum.
    #[error("payment method {method} requires a minimum order of {required_minor}, subtotal was {subtotal_minor}")]
    BelowMinimum {
        /// Payment method id.
        method: String,

        /// Method minimum in minor units.
        required_minor: i64,

        /// Cart subtotal in minor units.
        subtotal_minor: i64,
    },

    /// Method money and cart money are in different currencies.
    #[error("payment method is configured in {found}, but the cart is in {expected}")]
    CurrencyMismatch {
        /// Cart currency code.
        expected: &'static str,

        /// Method currency code.
        found: &'static str,
    },
}

/// A way to pay, with a flat surcharge and an optional order minimum
/// (e.g. installment plans that only open above a spend floor).
///
/// Every observed method today has a zero fee; the surcharge stays
/// configurable rather than assumed away.
#[derive(Debug, Clone)]
pub struct PaymentMethod<'a> {
    id: String,
    fee: Money<'a, Currency>,
    min_order: Option<Money<'a, Currency>>,
}

impl<'a> PaymentMethod<'a> {
    /// Create a new payment method.
    pub fn new(id: impl Into<String>, fee: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            fee,
            min_order: None,
        }
    }

    /// Create a payment method that only opens at and above `min_order`.
    pub fn with_min_order(
        id: impl Into<String>,
        fee: Money<'a, Currency>,
        min_order: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            fee,
            min_order: Some(min_order),
        }
    }

    /// Returns the method id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the flat surcharge.
    pub fn fee(&self) -> &Money<'a, Currency> {
        &self.fee
    }

    /// Returns the order minimum, if any.
    pub fn min_order(&self) -> Option<&Money<'a, Currency>> {
        self.min_order.as_ref()
    }

    /// Returns the currency this method is configured in.
    #[must_use]
    pub fn currency(&self) -> &'a Currency {
        self.fee.currency()
    }

    /// Check that this method may be used for a cart with the given subtotal.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::BelowMinimum`]: subtotal is under the method minimum.
    /// - [`PaymentError::CurrencyMismatch`]: the minimum and the subtotal are
    ///   in different currencies.
    pub fn check(&self, subtotal: &Money<'_, Currency>) -> Result<(), PaymentError> {
        let Some(min_order) = &self.min_order else {
            return Ok(());
        };

        if min_order.currency() != subtotal.currency() {
            return Err(PaymentError::CurrencyMismatch {
                expected: subtotal.currency().iso_alpha_code,
                found: min_order.currency().iso_alpha_code,
            });
        }

        if subtotal.to_minor_units() < min_order.to_minor_units() {
            return Err(PaymentError::BelowMinimum {
                method: self.id.clone(),
                required_minor: min_order.to_minor_units(),
                subtotal_minor: subtotal.to_minor_units(),
            });
        }

        Ok(())
    }
}
