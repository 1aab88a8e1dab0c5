//! Trait definition for the Coinbase brokerage REST client.
//!
//! The [`BrokerageClient`] trait abstracts the REST operations so that the
//! cache and the order service can run against mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinbase_brokerage_client::rest::BrokerageClient;
//!
//! async fn usd_total<C: BrokerageClient>(client: &C) -> Result<String, coinbase_brokerage_client::CoinbaseError> {
//!     Ok(client.get_currency_account("USD", "0.01").await?.total)
//! }
//! ```

use std::future::Future;

use uuid::Uuid;

use crate::error::CoinbaseError;
use crate::rest::types::{
    Account, CurrencyBalance, HistoricalOrdersQuery, PriceBook, Product, TickerResponse,
    TransactionSummary,
};
use crate::types::{Order, OrderRequest, ProductType};

/// Trait defining the Coinbase brokerage operations.
///
/// All methods are async and return `Result<T, CoinbaseError>`.
pub trait BrokerageClient: Send + Sync {
    // ========== Accounts ==========

    /// List brokerage accounts.
    fn get_accounts(&self) -> impl Future<Output = Result<Vec<Account>, CoinbaseError>> + Send;

    /// Balance of one currency, with the total floored to `increment`.
    fn get_currency_account(
        &self,
        currency: &str,
        increment: &str,
    ) -> impl Future<Output = Result<CurrencyBalance, CoinbaseError>> + Send;

    // ========== Orders ==========

    /// Submit an order and return its id.
    fn create_order(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<Uuid, CoinbaseError>> + Send;

    /// Cancel one order.
    fn cancel_order(&self, order_id: Uuid)
    -> impl Future<Output = Result<(), CoinbaseError>> + Send;

    /// All historical orders matching `query`.
    fn get_historical_orders(
        &self,
        query: &HistoricalOrdersQuery,
    ) -> impl Future<Output = Result<Vec<Order>, CoinbaseError>> + Send;

    /// Open Advanced Trade orders.
    fn get_open_orders(
        &self,
        product_id: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Order>, CoinbaseError>> + Send;

    /// One order by id.
    fn get_order(&self, order_id: Uuid)
    -> impl Future<Output = Result<Order, CoinbaseError>> + Send;

    // ========== Market data ==========

    /// Product metadata.
    fn get_product(
        &self,
        product_id: &str,
    ) -> impl Future<Output = Result<Product, CoinbaseError>> + Send;

    /// Best bid and ask.
    fn get_best_bid_ask(
        &self,
        product_id: &str,
    ) -> impl Future<Output = Result<PriceBook, CoinbaseError>> + Send;

    /// Recent trades.
    fn get_market_trades(
        &self,
        product_id: &str,
        limit: u32,
    ) -> impl Future<Output = Result<TickerResponse, CoinbaseError>> + Send;

    /// Fee tier and volume summary.
    fn get_transaction_summary(
        &self,
        product_type: ProductType,
    ) -> impl Future<Output = Result<TransactionSummary, CoinbaseError>> + Send;
}
