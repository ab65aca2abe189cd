//! Fixtures
//!
//! YAML-backed configuration sets. A set is three files under the base path,
//! one per category: `menu/<set>.yml` (products), `promos/<set>.yml` (the
//! promo table), and `checkout/<set>.yml` (delivery options and payment
//! methods). These files are the single source of truth for the tables that
//! would otherwise end up duplicated across every caller.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    fulfilment::{DeliveryOption, FulfilmentError},
    payment::PaymentMethod,
    products::{Product, ProductKey},
    promos::{PromoCode, PromoError},
};

pub mod checkout;
pub mod menu;
pub mod promos;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage value
    #[error("Invalid percentage value: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Promo code not found
    #[error("Promo code not found: {0}")]
    PromoNotFound(String),

    /// Delivery option not found
    #[error("Delivery option not found: {0}")]
    DeliveryNotFound(String),

    /// Payment method not found
    #[error("Payment method not found: {0}")]
    PaymentNotFound(String),

    /// Currency mismatch within a fixture set
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No money value loaded yet, so the set currency is unknown
    #[error("No prices loaded yet; currency unknown")]
    NoCurrency,

    /// Invalid promo configuration
    #[error(transparent)]
    Promo(#[from] PromoError),

    /// Invalid fulfilment configuration
    #[error(transparent)]
    Fulfilment(#[from] FulfilmentError),

    /// Cart construction error
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Parse a `"<amount> <ISO code>"` money string (e.g. `"2.50 GBP"`).
pub(crate) fn parse_price(input: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let mut parts = input.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(input.to_string()));
    };

    let currency = iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    Money::from_str(amount, currency).map_err(|_err| FixtureError::InvalidPrice(input.to_string()))
}

/// A loaded configuration set.
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Product metadata with generated keys
    product_meta: SlotMap<ProductKey, Product<'a>>,

    /// String key -> `SlotMap` key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,

    /// Promo table
    promos: Vec<PromoCode<'a>>,

    /// Delivery options keyed by id
    deliveries: FxHashMap<String, DeliveryOption<'a>>,

    /// Payment methods keyed by id
    payments: FxHashMap<String, PaymentMethod<'a>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            product_meta: SlotMap::with_key(),
            product_keys: FxHashMap::default(),
            promos: Vec::new(),
            deliveries: FxHashMap::default(),
            payments: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load a complete fixture set (menu, promos, and checkout options with
    /// the same name).
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_menu(name)?
            .load_promos(name)?
            .load_checkout(name)?;

        Ok(fixture)
    }

    /// Load products from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a price
    /// does not match the set currency.
    pub fn load_menu(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("menu").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: menu::MenuFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.try_into_product()?;

            self.ensure_set_currency(product.price.currency())?;

            let product_key = self.product_meta.insert(product);

            self.product_keys.insert(key, product_key);
        }

        Ok(self)
    }

    /// Load the promo table from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a promo
    /// is misconfigured (bad money or percentage, cap on a fixed amount,
    /// currency mismatch).
    pub fn load_promos(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("promos").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: promos::PromosFixture = serde_norway::from_str(&contents)?;

        for promo_fixture in fixture.promos {
            let promo = promo_fixture.try_into_promo()?;

            self.ensure_set_currency(promo.min_order().currency())?;

            self.promos.push(promo);
        }

        Ok(self)
    }

    /// Load delivery options and payment methods from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if an option is
    /// misconfigured, or if a pickup option is loaded before any price has
    /// established the set currency.
    pub fn load_checkout(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("checkout").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: checkout::CheckoutFixture = serde_norway::from_str(&contents)?;

        // Fee-carrying options first: they can establish the set currency
        // that currency-less pickup options then inherit.
        let (pickups, deliveries): (Vec<_>, Vec<_>) = fixture
            .delivery
            .into_iter()
            .partition(|(_id, option)| option.is_pickup());

        for (id, option_fixture) in deliveries {
            let option = option_fixture.try_into_option(self.currency)?;

            self.ensure_set_currency(option.currency())?;

            self.deliveries.insert(id, option);
        }

        for (id, option_fixture) in pickups {
            let option = option_fixture.try_into_option(self.currency)?;

            self.deliveries.insert(id, option);
        }

        for (id, method_fixture) in fixture.payment {
            let method = method_fixture.try_into_method(&id)?;

            self.ensure_set_currency(method.currency())?;

            self.payments.insert(id, method);
        }

        Ok(self)
    }

    /// Get a product by its string key.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'a>, FixtureError> {
        let product_key = self.product_key(key)?;

        self.product_meta
            .get(product_key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a product key by its string key.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Look up a promo by code, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if no promo has the code.
    pub fn promo(&self, code: &str) -> Result<&PromoCode<'a>, FixtureError> {
        self.promos
            .iter()
            .find(|promo| promo.matches(code))
            .ok_or_else(|| FixtureError::PromoNotFound(code.to_string()))
    }

    /// Get all loaded promos.
    pub fn promos(&self) -> &[PromoCode<'a>] {
        &self.promos
    }

    /// Get a delivery option by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is not found.
    pub fn delivery(&self, id: &str) -> Result<&DeliveryOption<'a>, FixtureError> {
        self.deliveries
            .get(id)
            .ok_or_else(|| FixtureError::DeliveryNotFound(id.to_string()))
    }

    /// Get a payment method by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the method is not found.
    pub fn payment(&self, id: &str) -> Result<&PaymentMethod<'a>, FixtureError> {
        self.payments
            .get(id)
            .ok_or_else(|| FixtureError::PaymentNotFound(id.to_string()))
    }

    /// Get the set currency.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing with a price has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a cart from `(product key, quantity)` picks.
    ///
    /// # Errors
    ///
    /// Returns an error if a product is unknown, a quantity is zero, or
    /// nothing with a price has been loaded yet.
    pub fn cart(&self, picks: &[(&str, u32)]) -> Result<Cart<'a>, FixtureError> {
        let currency = self.currency()?;
        let mut cart = Cart::new(currency);

        for (key, quantity) in picks {
            let product_key = self.product_key(key)?;

            let product = self
                .product_meta
                .get(product_key)
                .ok_or_else(|| FixtureError::ProductNotFound((*key).to_string()))?;

            cart.add(product.line(product_key, *quantity)?)?;
        }

        Ok(cart)
    }

    /// Record the set currency on first use and reject later mismatches.
    fn ensure_set_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::fulfilment::FulfilmentMethod;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        let price = parse_price("2.50 GBP")?;

        assert_eq!(price.to_minor_units(), 250);
        assert_eq!(price.currency(), GBP);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_malformed_input() {
        assert!(matches!(
            parse_price("2.50"),
            Err(FixtureError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("2.50 GBP extra"),
            Err(FixtureError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("two fifty GBP"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        assert!(matches!(
            parse_price("2.50 ZZZ"),
            Err(FixtureError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn fixture_loads_the_classic_set() -> TestResult {
        let fixture = Fixture::from_set("classic")?;

        assert_eq!(fixture.currency()?, GBP);

        let soup = fixture.product("tomato_soup")?;

        assert_eq!(soup.name, "Tomato Soup");
        assert_eq!(soup.price.to_minor_units(), 600);

        let welcome = fixture.promo("welcome20")?;

        assert_eq!(welcome.code(), "WELCOME20");

        let courier = fixture.delivery("courier")?;

        assert_eq!(courier.method(), FulfilmentMethod::Delivery);
        assert_eq!(courier.base_fee().to_minor_units(), 200);

        let counter = fixture.delivery("counter")?;

        assert_eq!(counter.method(), FulfilmentMethod::Pickup);
        assert_eq!(counter.base_fee().to_minor_units(), 0);

        let cash = fixture.payment("cash")?;

        assert_eq!(cash.fee().to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn fixture_cart_merges_picks_and_prices_from_the_menu() -> TestResult {
        let fixture = Fixture::from_set("classic")?;

        let cart = fixture.cart(&[("tomato_soup", 2), ("cola", 1)])?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), Money::from_minor(1450, GBP));

        Ok(())
    }

    #[test]
    fn fixture_unknown_lookups_return_errors() -> TestResult {
        let fixture = Fixture::from_set("classic")?;

        assert!(matches!(
            fixture.product("nonexistent"),
            Err(FixtureError::ProductNotFound(_))
        ));
        assert!(matches!(
            fixture.promo("NOSUCHCODE"),
            Err(FixtureError::PromoNotFound(_))
        ));
        assert!(matches!(
            fixture.delivery("drone"),
            Err(FixtureError::DeliveryNotFound(_))
        ));
        assert!(matches!(
            fixture.payment("barter"),
            Err(FixtureError::PaymentNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_promo_lookup_ignores_case() -> TestResult {
        let fixture = Fixture::from_set("classic")?;

        assert_eq!(fixture.promo("Welcome20")?.code(), "WELCOME20");
        assert_eq!(fixture.promo("WELCOME20")?.code(), "WELCOME20");

        Ok(())
    }

    #[test]
    fn fixture_no_currency_before_loading() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
    }

    #[test]
    fn load_menu_rejects_currency_mismatch_across_files() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "menu",
            "usd_set",
            "products:\n  bagel:\n    name: Bagel\n    price: \"1.00 USD\"\n",
        )?;

        write_fixture(
            dir.path(),
            "menu",
            "gbp_set",
            "products:\n  scone:\n    name: Scone\n    price: \"1.00 GBP\"\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_menu("usd_set")?;

        let result = fixture.load_menu("gbp_set");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn load_checkout_alone_with_only_pickup_has_no_currency() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "checkout",
            "bare",
            "delivery:\n  counter:\n    method: pickup\n    eta_minutes: [10, 15]\npayment: {}\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        let result = fixture.load_checkout("bare");

        assert!(matches!(result, Err(FixtureError::NoCurrency)));

        Ok(())
    }

    #[test]
    fn load_checkout_pickup_inherits_currency_from_delivery() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "checkout",
            "mixed",
            concat!(
                "delivery:\n",
                "  counter:\n",
                "    method: pickup\n",
                "    eta_minutes: [10, 15]\n",
                "  courier:\n",
                "    method: delivery\n",
                "    base_fee: \"2.00 GBP\"\n",
                "    free_above: \"10.00 GBP\"\n",
                "    eta_minutes: [30, 45]\n",
                "payment: {}\n",
            ),
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_checkout("mixed")?;

        assert_eq!(fixture.currency()?, GBP);
        assert_eq!(fixture.delivery("counter")?.currency(), GBP);

        Ok(())
    }

    #[test]
    fn missing_fixture_file_is_an_io_error() {
        let mut fixture = Fixture::with_base_path("/nonexistent-base");

        let result = fixture.load_menu("classic");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
