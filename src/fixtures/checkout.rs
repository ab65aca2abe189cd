//! Checkout Fixtures
//!
//! Delivery options and payment methods for one configuration set.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    fulfilment::{DeliveryOption, EtaWindow},
    payment::PaymentMethod,
};

/// Wrapper for checkout options in YAML
#[derive(Debug, Deserialize)]
pub struct CheckoutFixture {
    /// Map of option id -> delivery fixture
    pub delivery: FxHashMap<String, DeliveryFixture>,

    /// Map of method id -> payment fixture
    pub payment: FxHashMap<String, PaymentFixture>,
}

/// Delivery option fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DeliveryFixture {
    /// Courier delivery with a fee waived above a threshold
    Delivery {
        /// Base fee as `"<amount> <ISO>"`
        base_fee: String,

        /// Waiver threshold as `"<amount> <ISO>"`
        free_above: String,

        /// `[min, max]` handover window in minutes
        eta_minutes: [u16; 2],
    },

    /// Free in-store pickup
    Pickup {
        /// `[min, max]` handover window in minutes
        eta_minutes: [u16; 2],
    },
}

impl DeliveryFixture {
    /// Whether this fixture describes a pickup option.
    #[must_use]
    pub fn is_pickup(&self) -> bool {
        matches!(self, DeliveryFixture::Pickup { .. })
    }

    /// Convert to a [`DeliveryOption`].
    ///
    /// Pickup carries no money of its own, so it takes the set currency;
    /// loading a pickup option before any price has been seen is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a money string is malformed, the ETA window is
    /// inverted, or no currency is available for a pickup option.
    pub fn try_into_option(
        self,
        set_currency: Option<&'static Currency>,
    ) -> Result<DeliveryOption<'static>, FixtureError> {
        match self {
            DeliveryFixture::Delivery {
                base_fee,
                free_above,
                eta_minutes: [min, max],
            } => {
                let base_fee = super::parse_price(&base_fee)?;
                let free_above = super::parse_price(&free_above)?;
                let eta = EtaWindow::new(min, max)?;

                Ok(DeliveryOption::delivery(base_fee, free_above, eta))
            }
            DeliveryFixture::Pickup {
                eta_minutes: [min, max],
            } => {
                let currency = set_currency.ok_or(FixtureError::NoCurrency)?;
                let eta = EtaWindow::new(min, max)?;

                Ok(DeliveryOption::pickup(currency, eta))
            }
        }
    }
}

/// Payment method fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PaymentFixture {
    /// Flat surcharge as `"<amount> <ISO>"`
    pub fee: String,

    /// Order minimum as `"<amount> <ISO>"`
    #[serde(default)]
    pub min_order: Option<String>,
}

impl PaymentFixture {
    /// Convert to a [`PaymentMethod`] with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if a money string is malformed.
    pub fn try_into_method(self, id: &str) -> Result<PaymentMethod<'static>, FixtureError> {
        let fee = super::parse_price(&self.fee)?;

        match self.min_order {
            Some(min_order) => {
                let min_order = super::parse_price(&min_order)?;

                Ok(PaymentMethod::with_min_order(id, fee, min_order))
            }
            None => Ok(PaymentMethod::new(id, fee)),
        }
    }
}
