//! Menu Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Unit price as `"<amount> <ISO>"` (e.g. `"6.00 GBP"`)
    pub price: String,

    /// Portion weight in grams
    #[serde(default)]
    pub weight_grams: Option<u32>,

    /// Energy content in kilocalories
    #[serde(default)]
    pub kcal: Option<u32>,
}

impl ProductFixture {
    /// Convert to a [`Product`].
    ///
    /// # Errors
    ///
    /// Returns an error if the price string is malformed or names an unknown
    /// currency.
    pub fn try_into_product(self) -> Result<Product<'static>, FixtureError> {
        let price = super::parse_price(&self.price)?;

        Ok(Product {
            name: self.name,
            price,
            weight_grams: self.weight_grams,
            kcal: self.kcal,
        })
    }
}
