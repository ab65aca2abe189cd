//! Fulfilment
//!
//! How an order reaches the customer: courier delivery with a base fee that
//! is waived above a spend threshold, or free in-store pickup.

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to fulfilment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FulfilmentError {
    /// A pickup option was configured with a non-zero fee.
    #[error("pickup cannot carry a delivery fee")]
    NonZeroPickupFee,

    /// An ETA window's minimum exceeds its maximum.
    #[error("eta window minimum {min} exceeds maximum {max}")]
    InvertedEta {
        /// Window minimum in minutes.
        min: u16,

        /// Window maximum in minutes.
        max: u16,
    },
}

/// How the order is handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfilmentMethod {
    /// Courier delivery to the customer's address.
    Delivery,

    /// Collection at the store counter.
    Pickup,
}

/// An estimated handover window in minutes from order confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtaWindow {
    min_minutes: u16,
    max_minutes: u16,
}

impl EtaWindow {
    /// Create a new window.
    ///
    /// # Errors
    ///
    /// Returns [`FulfilmentError::InvertedEta`] if `min_minutes` exceeds
    /// `max_minutes`.
    pub fn new(min_minutes: u16, max_minutes: u16) -> Result<Self, FulfilmentError> {
        if min_minutes > max_minutes {
            return Err(FulfilmentError::InvertedEta {
                min: min_minutes,
                max: max_minutes,
            });
        }

        Ok(Self {
            min_minutes,
            max_minutes,
        })
    }

    /// Window minimum in minutes.
    #[must_use]
    pub fn min_minutes(&self) -> u16 {
        self.min_minutes
    }

    /// Window maximum in minutes.
    #[must_use]
    pub fn max_minutes(&self) -> u16 {
        self.max_minutes
    }
}

/// A fulfilment option offered at checkout.
#[derive(Debug, Clone)]
pub struct DeliveryOption<'a> {
    method: FulfilmentMethod,
    base_fee: Money<'a, Currency>,
    free_above: Money<'a, Currency>,
    eta: EtaWindow,
}

impl<'a> DeliveryOption<'a> {
    /// Create a fulfilment option.
    ///
    /// # Errors
    ///
    /// Returns [`FulfilmentError::NonZeroPickupFee`] if `method` is pickup
    /// and `base_fee` is non-zero.
    pub fn new(
        method: FulfilmentMethod,
        base_fee: Money<'a, Currency>,
        free_above: Money<'a, Currency>,
        eta: EtaWindow,
    ) -> Result<Self, FulfilmentError> {
        if method == FulfilmentMethod::Pickup && base_fee.to_minor_units() != 0 {
            return Err(FulfilmentError::NonZeroPickupFee);
        }

        Ok(Self {
            method,
            base_fee,
            free_above,
            eta,
        })
    }

    /// Create a pickup option. Pickup is always free.
    #[must_use]
    pub fn pickup(currency: &'static Currency, eta: EtaWindow) -> Self {
        Self {
            method: FulfilmentMethod::Pickup,
            base_fee: Money::from_minor(0, currency),
            free_above: Money::from_minor(0, currency),
            eta,
        }
    }

    /// Create a delivery option with a fee waived at and above `free_above`.
    #[must_use]
    pub fn delivery(
        base_fee: Money<'a, Currency>,
        free_above: Money<'a, Currency>,
        eta: EtaWindow,
    ) -> Self {
        Self {
            method: FulfilmentMethod::Delivery,
            base_fee,
            free_above,
            eta,
        }
    }

    /// Returns the handover method.
    #[must_use]
    pub fn method(&self) -> FulfilmentMethod {
        self.method
    }

    /// Returns the base delivery fee. Always zero for pickup.
    pub fn base_fee(&self) -> &Money<'a, Currency> {
        &self.base_fee
    }

    /// Returns the waiver threshold.
    pub fn free_above(&self) -> &Money<'a, Currency> {
        &self.free_above
    }

    /// Returns the estimated handover window.
    #[must_use]
    pub fn eta(&self) -> EtaWindow {
        self.eta
    }

    /// Returns the currency this option is configured in.
    #[must_use]
    pub fn currency(&self) -> &'a Currency {
        self.base_fee.currency()
    }

    /// The fee charged for a cart with the given subtotal, in the subtotal's
    /// currency.
    ///
    /// Pickup is free; delivery is free once the subtotal reaches the
    /// waiver threshold.
    pub fn fee_for<'s>(&self, subtotal: &Money<'s, Currency>) -> Money<'s, Currency> {
        match self.method {
            FulfilmentMethod::Pickup => Money::from_minor(0, subtotal.currency()),
            FulfilmentMethod::Delivery => {
                if subtotal.to_minor_units() >= self.free_above.to_minor_units() {
                    Money::from_minor(0, subtotal.currency())
                } else {
                    Money::from_minor(self.base_fee.to_minor_units(), subtotal.currency())
                }
            }
        }
    }
}
