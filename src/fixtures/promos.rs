//! Promo Fixtures

use decimal_percentage::Percentage;
use jiff::civil::Date;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    promos::{PromoCode, PromoDiscount},
};

/// Wrapper for the promo table in YAML
#[derive(Debug, Deserialize)]
pub struct PromosFixture {
    /// Promo table entries
    pub promos: Vec<PromoFixture>,
}

/// Discount configuration from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromoDiscountFixture {
    /// Fraction of the subtotal (e.g. `0.20` for 20% off)
    Percentage {
        /// Discount fraction in `0.0 ..= 1.0`
        value: f64,
    },

    /// Fixed amount off as `"<amount> <ISO>"`
    FixedAmount {
        /// Amount string (e.g. `"2.00 GBP"`)
        value: String,
    },
}

/// Promo fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromoFixture {
    /// Promo code (matched case-insensitively)
    pub code: String,

    /// Discount configuration
    pub discount: PromoDiscountFixture,

    /// Order-size floor as `"<amount> <ISO>"`
    pub min_order: String,

    /// Discount cap as `"<amount> <ISO>"` (percentage promos only)
    #[serde(default)]
    pub max_discount: Option<String>,

    /// Last day the promo is valid
    pub valid_until: Date,
}

impl PromoFixture {
    /// Convert to a [`PromoCode`].
    ///
    /// # Errors
    ///
    /// Returns an error if a money string is malformed, the percentage is
    /// outside `0.0 ..= 1.0`, or a cap is configured on a fixed-amount promo.
    pub fn try_into_promo(self) -> Result<PromoCode<'static>, FixtureError> {
        let discount = match self.discount {
            PromoDiscountFixture::Percentage { value } => {
                if !(0.0..=1.0).contains(&value) {
                    return Err(FixtureError::InvalidPercentage(value.to_string()));
                }

                PromoDiscount::Percentage(Percentage::from(value))
            }
            PromoDiscountFixture::FixedAmount { value } => {
                PromoDiscount::FixedAmount(super::parse_price(&value)?)
            }
        };

        let min_order = super::parse_price(&self.min_order)?;

        let max_discount = self
            .max_discount
            .as_deref()
            .map(super::parse_price)
            .transpose()?;

        Ok(PromoCode::new(
            &self.code,
            discount,
            min_order,
            max_discount,
            self.valid_until,
        )?)
    }
}
