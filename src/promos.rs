//! Promo Codes
//!
//! A promo code is a named discount over a whole cart: a percentage of the
//! subtotal or a fixed amount off, gated by an order-size floor and an expiry
//! date. Percentage promos may carry a cap on the discounted amount.

use decimal_percentage::Percentage;
use jiff::civil::Date;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to promo validation and discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromoError {
    /// The cart subtotal is under the promo's order-size floor.
    #[error("subtotal {subtotal_minor} is below the promo minimum of {required_minor}")]
    BelowMinimum {
        /// Promo floor in minor units.
        required_minor: i64,

        /// Cart subtotal in minor units.
        subtotal_minor: i64,
    },

    /// The promo's validity window has passed.
    #[error("promo expired on {valid_until}")]
    Expired {
        /// Last day the promo was valid.
        valid_until: Date,
    },

    /// A discount cap was configured on a fixed-amount promo.
    #[error("a discount cap only applies to percentage promos")]
    CapOnFixedAmount,

    /// Promo money and cart money are in different currencies.
    #[error("promo is configured in {found}, but the cart is in {expected}")]
    CurrencyMismatch {
        /// Cart currency code.
        expected: &'static str,

        /// Promo currency code.
        found: &'static str,
    },

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// The discount a promo applies to the cart subtotal.
#[derive(Debug, Clone, Copy)]
pub enum PromoDiscount<'a> {
    /// A fraction of the subtotal (e.g. 0.20 for "20% off").
    Percentage(Percentage),

    /// A fixed amount off the subtotal (e.g. "£2.00 off").
    FixedAmount(Money<'a, Currency>),
}

/// A promo code: a cart-wide discount rule with a floor, an optional cap,
/// and an expiry date.
#[derive(Debug, Clone)]
pub struct PromoCode<'a> {
    code: String,
    discount: PromoDiscount<'a>,
    min_order: Money<'a, Currency>,
    max_discount: Option<Money<'a, Currency>>,
    valid_until: Date,
}

impl<'a> PromoCode<'a> {
    /// Create a new promo code.
    ///
    /// The code is canonicalized to uppercase, so lookups and display are
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::CapOnFixedAmount`] if `max_discount` is set on a
    /// fixed-amount discount.
    pub fn new(
        code: &str,
        discount: PromoDiscount<'a>,
        min_order: Money<'a, Currency>,
        max_discount: Option<Money<'a, Currency>>,
        valid_until: Date,
    ) -> Result<Self, PromoError> {
        if max_discount.is_some() && matches!(discount, PromoDiscount::FixedAmount(_)) {
            return Err(PromoError::CapOnFixedAmount);
        }

        Ok(Self {
            code: code.trim().to_uppercase(),
            discount,
            min_order,
            max_discount,
            valid_until,
        })
    }

    /// Returns the canonical (uppercase) code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the discount rule.
    pub fn discount(&self) -> &PromoDiscount<'a> {
        &self.discount
    }

    /// Returns the order-size floor.
    pub fn min_order(&self) -> &Money<'a, Currency> {
        &self.min_order
    }

    /// Returns the discount cap, if any.
    pub fn max_discount(&self) -> Option<&Money<'a, Currency>> {
        self.max_discount.as_ref()
    }

    /// Returns the last day the promo is valid.
    #[must_use]
    pub fn valid_until(&self) -> Date {
        self.valid_until
    }

    /// Whether `code` names this promo, ignoring case and surrounding space.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.code == code.trim().to_uppercase()
    }

    /// Check that this promo may be applied to a cart with the given
    /// subtotal on the given date.
    ///
    /// This runs when the customer applies the code, before any pricing:
    /// an inapplicable promo is rejected with a reason, never silently
    /// zeroed.
    ///
    /// # Errors
    ///
    /// - [`PromoError::Expired`]: `on` is past the promo's validity window.
    /// - [`PromoError::BelowMinimum`]: subtotal is under the promo floor.
    /// - [`PromoError::CurrencyMismatch`]: the floor and the subtotal are in
    ///   different currencies.
    pub fn check(&self, subtotal: &Money<'_, Currency>, on: Date) -> Result<(), PromoError> {
        if on > self.valid_until {
            return Err(PromoError::Expired {
                valid_until: self.valid_until,
            });
        }

        ensure_same_currency(subtotal, &self.min_order)?;

        if subtotal.to_minor_units() < self.min_order.to_minor_units() {
            return Err(PromoError::BelowMinimum {
                required_minor: self.min_order.to_minor_units(),
                subtotal_minor: subtotal.to_minor_units(),
            });
        }

        Ok(())
    }

    /// Calculate the discount this promo takes off the given subtotal.
    ///
    /// Applicability is assumed to have been checked via [`PromoCode::check`];
    /// the result is still defensively clamped to `0 ..= subtotal` so a
    /// discount can never exceed what it discounts.
    ///
    /// # Errors
    ///
    /// - [`PromoError::PercentConversion`]: percentage arithmetic overflowed
    ///   or was not finite.
    /// - [`PromoError::CurrencyMismatch`]: a fixed amount or cap is in a
    ///   different currency than the subtotal.
    pub fn discount_for<'s>(
        &self,
        subtotal: &Money<'s, Currency>,
    ) -> Result<Money<'s, Currency>, PromoError> {
        let subtotal_minor = subtotal.to_minor_units();

        let raw_minor = match &self.discount {
            PromoDiscount::Percentage(percent) => {
                let raw = percent_of_minor(percent, subtotal_minor)?;

                match &self.max_discount {
                    Some(cap) => {
                        ensure_same_currency(subtotal, cap)?;

                        raw.min(cap.to_minor_units())
                    }
                    None => raw,
                }
            }
            PromoDiscount::FixedAmount(amount) => {
                ensure_same_currency(subtotal, amount)?;

                amount.to_minor_units()
            }
        };

        Ok(Money::from_minor(
            raw_minor.clamp(0, subtotal_minor.max(0)),
            subtotal.currency(),
        ))
    }
}

fn ensure_same_currency(
    expected: &Money<'_, Currency>,
    found: &Money<'_, Currency>,
) -> Result<(), PromoError> {
    if expected.currency() == found.currency() {
        Ok(())
    } else {
        Err(PromoError::CurrencyMismatch {
            expected: expected.currency().iso_alpha_code,
            found: found.currency().iso_alpha_code,
        })
    }
}

/// Calculate a percentage of a minor unit amount, rounding midpoint away
/// from zero.
fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PromoError> {
    let minor_dec = Decimal::from_i64(minor).ok_or(PromoError::PercentConversion)?;
    let applied = *percent * minor_dec;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PromoError::PercentConversion)
}
