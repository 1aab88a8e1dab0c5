//! Coinbase brokerage REST endpoint constants.

/// Base URL for the Coinbase REST API.
pub const COINBASE_BASE_URL: &str = "https://api.coinbase.com";

/// List accounts.
pub const ACCOUNTS: &str = "/api/v3/brokerage/accounts";
/// Create an order.
pub const ORDERS: &str = "/api/v3/brokerage/orders";
/// Cancel orders by id.
pub const BATCH_CANCEL: &str = "/api/v3/brokerage/orders/batch_cancel";
/// List historical orders.
pub const HISTORICAL_BATCH: &str = "/api/v3/brokerage/orders/historical/batch";
/// Best bid and ask per product.
pub const BEST_BID_ASK: &str = "/api/v3/brokerage/best_bid_ask";
/// Fee tier and trading volume.
pub const TRANSACTION_SUMMARY: &str = "/api/v3/brokerage/transaction_summary";

/// Maximum number of accounts requested in one page.
pub const ACCOUNTS_LIMIT: u32 = 250;

/// Get one historical order.
pub fn historical_order(order_id: &str) -> String {
    format!("/api/v3/brokerage/orders/historical/{order_id}")
}

/// Get one product.
pub fn product(product_id: &str) -> String {
    format!("/api/v3/brokerage/products/{product_id}")
}

/// Recent trades of one product.
pub fn product_ticker(product_id: &str) -> String {
    format!("/api/v3/brokerage/products/{product_id}/ticker")
}
