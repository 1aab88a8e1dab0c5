//! Product, price and fee endpoints.

use crate::error::CoinbaseError;
use crate::rest::CoinbaseRestClient;
use crate::rest::endpoints::{self, BEST_BID_ASK, TRANSACTION_SUMMARY};
use crate::rest::request::RequestDescriptor;
use crate::rest::types::{BestBidAskResponse, PriceBook, Product, TickerResponse, TransactionSummary};
use crate::types::ProductType;

impl CoinbaseRestClient {
    /// Get product metadata, including size and price increments.
    pub async fn get_product(&self, product_id: &str) -> Result<Product, CoinbaseError> {
        self.execute(&RequestDescriptor::get(endpoints::product(product_id)))
            .await
    }

    /// Get the best bid and ask of one product.
    pub async fn get_best_bid_ask(&self, product_id: &str) -> Result<PriceBook, CoinbaseError> {
        let request =
            RequestDescriptor::get(BEST_BID_ASK).with_query(format!("?product_ids={product_id}"));
        let response: BestBidAskResponse = self.execute(&request).await?;
        response.pricebooks.into_iter().next().ok_or_else(|| {
            CoinbaseError::NotFound(format!("No pricebooks found for product_id={product_id}"))
        })
    }

    /// Get the latest `limit` trades of a product with its best bid and ask.
    pub async fn get_market_trades(
        &self,
        product_id: &str,
        limit: u32,
    ) -> Result<TickerResponse, CoinbaseError> {
        let request = RequestDescriptor::get(endpoints::product_ticker(product_id))
            .with_params(&[("limit", limit)])?;
        self.execute(&request).await
    }

    /// Get the fee tier and trading volume summary.
    pub async fn get_transaction_summary(
        &self,
        product_type: ProductType,
    ) -> Result<TransactionSummary, CoinbaseError> {
        let request = RequestDescriptor::get(TRANSACTION_SUMMARY)
            .with_params(&[("product_type", product_type.as_str())])?;
        self.execute(&request).await
    }
}
