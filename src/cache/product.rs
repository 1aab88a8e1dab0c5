//! A product with its increments loaded.

use crate::cache::CachedClient;
use crate::error::CoinbaseError;
use crate::increment::Increment;
use crate::rest::BrokerageClient;
use crate::rest::types::Product;
use crate::types::{NumericString, ProductId};

/// Symbol used when none is given.
pub const DEFAULT_PRODUCT: &str = "btc";
/// Quote currency appended to bare symbols.
pub const DEFAULT_QUOTE_CURRENCY: &str = "USD";

/// Substitute [`DEFAULT_PRODUCT`] for an empty symbol.
pub fn ensure_product(symbol: &str) -> &str {
    if symbol.is_empty() {
        tracing::warn!("Defaulting to {DEFAULT_PRODUCT}");
        DEFAULT_PRODUCT
    } else {
        symbol
    }
}

/// Product metadata with quantization helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductHandle {
    product_id: ProductId,
    info: Product,
}

impl ProductHandle {
    /// Resolve `symbol` (`"btc"`, `"eth-usd"`, or empty for the default) and
    /// load its metadata through the cache.
    pub async fn load<C: BrokerageClient>(
        cached: &CachedClient<C>,
        symbol: &str,
        force_update: bool,
    ) -> Result<Self, CoinbaseError> {
        let product_id = ProductId::from_symbol(ensure_product(symbol), DEFAULT_QUOTE_CURRENCY)?;
        let info = cached.product_info(product_id.as_str(), force_update).await?;
        Self::from_info(info)
    }

    /// Wrap already loaded metadata.
    pub fn from_info(info: Product) -> Result<Self, CoinbaseError> {
        let product_id = info.product_id.parse::<ProductId>()?;
        Ok(Self { product_id, info })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn info(&self) -> &Product {
        &self.info
    }

    /// Last traded price.
    pub fn price(&self) -> &NumericString {
        &self.info.price
    }

    pub fn base_increment(&self) -> Result<Increment, CoinbaseError> {
        Increment::parse(self.info.base_increment.as_str())
    }

    pub fn price_increment(&self) -> Result<Increment, CoinbaseError> {
        Increment::parse(self.info.price_increment.as_str())
    }

    /// Floor an order size to the base increment.
    pub fn quantize_size(&self, size: f64) -> Result<NumericString, CoinbaseError> {
        self.base_increment()?.floor(size)?.parse::<NumericString>()
    }

    /// Floor a price to the price increment.
    pub fn quantize_price(&self, price: f64) -> Result<NumericString, CoinbaseError> {
        self.price_increment()?.floor(price)?.parse::<NumericString>()
    }
}
