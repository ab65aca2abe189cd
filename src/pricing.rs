//! Pricing
//!
//! Turns a cart plus the customer's checkout selections into a priced
//! [`OrderSummary`]. The computation is pure and runs in a fixed order:
//! subtotal, promo discount, delivery fee, payment fee, gift wrap fee,
//! total. Each step reads only the steps before it, so the order is not
//! negotiable.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::warn;

use crate::{
    cart::Cart,
    fulfilment::DeliveryOption,
    payment::PaymentMethod,
    promos::{PromoCode, PromoError},
    summary::OrderSummary,
};

/// Flat gift wrap fee in minor units (50.00 in the cart currency).
pub const GIFT_WRAP_FEE_MINOR: i64 = 5000;

/// Errors that can occur while pricing a checkout.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A configured fee is in a different currency than the cart.
    #[error("{fee} fee is in {found}, but the cart is in {expected}")]
    CurrencyMismatch {
        /// Which fee was misconfigured.
        fee: &'static str,

        /// Cart currency code.
        expected: &'static str,

        /// Fee currency code.
        found: &'static str,
    },

    /// Promo discount calculation failed.
    #[error(transparent)]
    Promo(#[from] PromoError),
}

/// The choices accompanying a cart into pricing.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutSelection<'a> {
    /// Applied promo code, already validated via [`PromoCode::check`].
    pub promo: Option<&'a PromoCode<'a>>,

    /// Selected fulfilment option.
    pub delivery: &'a DeliveryOption<'a>,

    /// Selected payment method.
    pub payment: &'a PaymentMethod<'a>,

    /// Whether the customer asked for gift wrapping.
    pub gift_wrap: bool,
}

/// Price a cart under the given checkout selections.
///
/// An empty cart prices to an all-zero summary. The promo is assumed to have
/// passed [`PromoCode::check`] when it was applied; its discount is still
/// clamped so it can never exceed the subtotal. If misconfigured fees drive
/// the total negative it is clamped to zero, flagged on the summary, and
/// logged; customers never see a negative total.
///
/// # Errors
///
/// - [`PricingError::CurrencyMismatch`]: the delivery option or payment
///   method is configured in a different currency than the cart.
/// - [`PricingError::Promo`]: promo discount arithmetic failed.
pub fn price<'a>(
    cart: &Cart<'a>,
    selection: &CheckoutSelection<'_>,
) -> Result<OrderSummary<'a>, PricingError> {
    let currency = cart.currency();

    ensure_fee_currency("delivery", currency, selection.delivery.currency())?;
    ensure_fee_currency("payment", currency, selection.payment.currency())?;

    let subtotal = cart.subtotal();

    let discount = match selection.promo {
        Some(promo) => promo.discount_for(&subtotal)?,
        None => Money::from_minor(0, currency),
    };

    let delivery_fee = selection.delivery.fee_for(&subtotal);
    let payment_fee = Money::from_minor(selection.payment.fee().to_minor_units(), currency);

    let gift_wrap_fee = if selection.gift_wrap {
        Money::from_minor(GIFT_WRAP_FEE_MINOR, currency)
    } else {
        Money::from_minor(0, currency)
    };

    let raw_total = subtotal.to_minor_units() - discount.to_minor_units()
        + delivery_fee.to_minor_units()
        + payment_fee.to_minor_units()
        + gift_wrap_fee.to_minor_units();

    // The discount clamp keeps `subtotal - discount` non-negative, so only a
    // negatively configured fee can land here.
    let clamped = raw_total < 0;

    if clamped {
        warn!(
            raw_total_minor = raw_total,
            payment_method = selection.payment.id(),
            "computed total was negative; clamping to zero (fee configuration error)"
        );
    }

    let total = Money::from_minor(raw_total.max(0), currency);

    Ok(OrderSummary::new(
        subtotal,
        discount,
        delivery_fee,
        payment_fee,
        gift_wrap_fee,
        total,
        clamped,
    ))
}

fn ensure_fee_currency(
    fee: &'static str,
    expected: &Currency,
    found: &Currency,
) -> Result<(), PricingError> {
    if expected == found {
        Ok(())
    } else {
        Err(PricingError::CurrencyMismatch {
            fee,
            expected: expected.iso_alpha_code,
            found: found.iso_alpha_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use jiff::civil::date;
    use rusty_money::iso::{GBP, USD};
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::{
        cart::CartLine, fulfilment::EtaWindow, products::ProductKey, promos::PromoDiscount,
    };

    use super::*;

    fn cart_of_minor<'a>(amounts: &[i64]) -> Result<Cart<'a>, crate::cart::CartError> {
        let mut keys = SlotMap::<ProductKey, ()>::with_key();
        let mut cart = Cart::new(GBP);

        for amount in amounts {
            cart.add(CartLine::new(
                keys.insert(()),
                Money::from_minor(*amount, GBP),
                1,
            )?)?;
        }

        Ok(cart)
    }

    fn pickup<'a>() -> DeliveryOption<'a> {
        DeliveryOption::pickup(GBP, EtaWindow::new(15, 20).expect("valid window"))
    }

    fn free_method<'a>() -> PaymentMethod<'a> {
        PaymentMethod::new("cash", Money::from_minor(0, GBP))
    }

    #[test]
    fn bare_checkout_total_equals_subtotal() -> TestResult {
        let cart = cart_of_minor(&[1250, 350, 250])?;
        let delivery = pickup();
        let payment = free_method();

        let summary = price(
            &cart,
            &CheckoutSelection {
                promo: None,
                delivery: &delivery,
                payment: &payment,
                gift_wrap: false,
            },
        )?;

        assert_eq!(summary.subtotal(), Money::from_minor(1850, GBP));
        assert_eq!(summary.total(), summary.subtotal());
        assert_eq!(summary.discount(), Money::from_minor(0, GBP));
        assert!(!summary.clamped());

        Ok(())
    }

    #[test]
    fn empty_cart_prices_to_all_zeros() -> TestResult {
        let cart = Cart::new(GBP);
        let delivery = pickup();
        let payment = free_method();

        let summary = price(
            &cart,
            &CheckoutSelection {
                promo: None,
                delivery: &delivery,
                payment: &payment,
                gift_wrap: false,
            },
        )?;

        assert_eq!(summary.subtotal(), Money::from_minor(0, GBP));
        assert_eq!(summary.total(), Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn promo_discount_is_taken_off_the_total() -> TestResult {
        let cart = cart_of_minor(&[1850])?;
        let delivery = pickup();
        let payment = free_method();

        let promo = PromoCode::new(
            "WELCOME20",
            PromoDiscount::Percentage(Percentage::from(0.20)),
            Money::from_minor(800, GBP),
            None,
            date(2099, 12, 31),
        )?;

        let summary = price(
            &cart,
            &CheckoutSelection {
                promo: Some(&promo),
                delivery: &delivery,
                payment: &payment,
                gift_wrap: false,
            },
        )?;

        assert_eq!(summary.discount(), Money::from_minor(370, GBP));
        assert_eq!(summary.total(), Money::from_minor(1480, GBP));

        Ok(())
    }

    #[test]
    fn gift_wrap_adds_exactly_the_flat_fee() -> TestResult {
        let cart = cart_of_minor(&[600])?;
        let delivery = pickup();
        let payment = free_method();

        let base = CheckoutSelection {
            promo: None,
            delivery: &delivery,
            payment: &payment,
            gift_wrap: false,
        };

        let without = price(&cart, &base)?;
        let with = price(
            &cart,
            &CheckoutSelection {
                gift_wrap: true,
                ..base
            },
        )?;

        assert_eq!(
            with.gift_wrap_fee(),
            Money::from_minor(GIFT_WRAP_FEE_MINOR, GBP)
        );
        assert_eq!(
            with.total().to_minor_units() - without.total().to_minor_units(),
            GIFT_WRAP_FEE_MINOR
        );

        // No other component moves.
        assert_eq!(with.subtotal(), without.subtotal());
        assert_eq!(with.discount(), without.discount());
        assert_eq!(with.delivery_fee(), without.delivery_fee());
        assert_eq!(with.payment_fee(), without.payment_fee());

        Ok(())
    }

    #[test]
    fn payment_surcharge_is_added_flat() -> TestResult {
        let cart = cart_of_minor(&[2000])?;
        let delivery = pickup();
        let payment = PaymentMethod::new("installments", Money::from_minor(50, GBP));

        let summary = price(
            &cart,
            &CheckoutSelection {
                promo: None,
                delivery: &delivery,
                payment: &payment,
                gift_wrap: false,
            },
        )?;

        assert_eq!(summary.payment_fee(), Money::from_minor(50, GBP));
        assert_eq!(summary.total(), Money::from_minor(2050, GBP));

        Ok(())
    }

    #[test]
    fn negative_fee_configuration_clamps_total_to_zero() -> TestResult {
        let cart = cart_of_minor(&[100])?;
        let delivery = pickup();

        // A refund-sized negative surcharge is a configuration error, not a
        // reason to show a negative total.
        let payment = PaymentMethod::new("broken", Money::from_minor(-500, GBP));

        let summary = price(
            &cart,
            &CheckoutSelection {
                promo: None,
                delivery: &delivery,
                payment: &payment,
                gift_wrap: false,
            },
        )?;

        assert_eq!(summary.total(), Money::from_minor(0, GBP));
        assert!(summary.clamped());

        Ok(())
    }

    #[test]
    fn pricing_is_idempotent() -> TestResult {
        let cart = cart_of_minor(&[1250, 350])?;
        let delivery = pickup();
        let payment = free_method();

        let selection = CheckoutSelection {
            promo: None,
            delivery: &delivery,
            payment: &payment,
            gift_wrap: true,
        };

        assert_eq!(price(&cart, &selection)?, price(&cart, &selection)?);

        Ok(())
    }

    #[test]
    fn mismatched_delivery_currency_errors() -> TestResult {
        let cart = cart_of_minor(&[600])?;
        let delivery = DeliveryOption::delivery(
            Money::from_minor(200, USD),
            Money::from_minor(1000, USD),
            EtaWindow::new(30, 45)?,
        );
        let payment = free_method();

        let result = price(
            &cart,
            &CheckoutSelection {
                promo: None,
                delivery: &delivery,
                payment: &payment,
                gift_wrap: false,
            },
        );

        assert!(matches!(
            result,
            Err(PricingError::CurrencyMismatch {
                fee: "delivery",
                ..
            })
        ));

        Ok(())
    }
}
