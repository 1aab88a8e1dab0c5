//! Request and response types for the brokerage REST endpoints.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::error::CoinbaseError;
use crate::types::{AccountType, NumericString, Order, OrderPlacementSource, OrderStatus, ProductType};

/// A monetary amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub value: NumericString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// A brokerage account (one per currency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub uuid: Uuid,
    pub currency: String,
    pub available_balance: Money,
    pub hold: Money,
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

/// Response from `GET /accounts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
}

/// Balance summary for one currency.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyBalance {
    /// Available balance, as reported.
    pub available: NumericString,
    /// Amount on hold, as reported.
    pub hold: NumericString,
    /// `available + hold`, floored to the requested increment.
    pub total: String,
}

/// A price level or trade price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub price: NumericString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<NumericString>,
}

/// Best bids and asks for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub bids: Vec<Price>,
    pub asks: Vec<Price>,
}

impl PriceBook {
    /// Highest bid, if any.
    pub fn best_bid(&self) -> Option<&NumericString> {
        self.bids.first().map(|p| &p.price)
    }

    /// Lowest ask, if any.
    pub fn best_ask(&self) -> Option<&NumericString> {
        self.asks.first().map(|p| &p.price)
    }
}

/// Response from `GET /best_bid_ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct BestBidAskResponse {
    pub pricebooks: Vec<PriceBook>,
}

/// Trading product metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    /// Last traded price.
    pub price: NumericString,
    /// Size step in base currency.
    pub base_increment: NumericString,
    /// Price step in quote currency.
    pub price_increment: NumericString,
    pub product_type: ProductType,
}

/// Response from `GET /products/{id}/ticker`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerResponse {
    pub trades: Vec<Price>,
    pub best_bid: NumericString,
    pub best_ask: NumericString,
}

/// Fee tier of the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTier {
    pub pricing_tier: String,
    pub taker_fee_rate: NumericString,
    pub maker_fee_rate: NumericString,
}

/// Response from `GET /transaction_summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub fee_tier: FeeTier,
    pub total_balance: NumericString,
    pub total_fees: f64,
    pub total_volume: f64,
}

/// Successful order creation.
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessResponse {
    pub order_id: Uuid,
}

/// Rejected order creation.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub preview_failure_reason: String,
}

/// Response from `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(default)]
    pub success_response: Option<SuccessResponse>,
    #[serde(default)]
    pub error_response: Option<ErrorResponse>,
}

/// Response from `GET /orders/historical/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
}

/// One page of `GET /orders/historical/batch`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalOrdersPage {
    pub orders: Vec<Order>,
    /// Opaque token for the next page.
    #[serde(default)]
    pub cursor: Option<String>,
    /// Whether another page follows.
    #[serde(default)]
    pub has_next: bool,
}

/// Request body for `POST /orders/batch_cancel`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchCancelRequest {
    pub order_ids: Vec<Uuid>,
}

/// Outcome of cancelling one order.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCancelResult {
    pub success: bool,
    pub failure_reason: String,
    pub order_id: Uuid,
}

/// Response from `POST /orders/batch_cancel`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCancelResponse {
    pub results: Vec<BatchCancelResult>,
}

/// Filters for the historical orders query.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalOrdersQuery {
    pub order_status: OrderStatus,
    pub placement_source: Option<OrderPlacementSource>,
    pub product_id: Option<String>,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
}

impl HistoricalOrdersQuery {
    /// Query orders with the given status placed through Advanced Trade.
    pub fn new(order_status: OrderStatus) -> Self {
        Self {
            order_status,
            placement_source: Some(OrderPlacementSource::Advanced),
            product_id: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Restrict to orders placed from `source` (`None` for any source).
    pub fn placement_source(mut self, source: Option<OrderPlacementSource>) -> Self {
        self.placement_source = source;
        self
    }

    /// Restrict to one product.
    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Restrict to orders created at or after `start`.
    pub fn start_date(mut self, start: OffsetDateTime) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Restrict to orders created before `end`.
    pub fn end_date(mut self, end: OffsetDateTime) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Build the positional query string, including the leading `?`.
    ///
    /// Values are appended as-is; the cursor is passed through unmodified.
    pub fn to_query_string(&self, cursor: Option<&str>) -> Result<String, CoinbaseError> {
        let mut query = format!("?order_status={}", self.order_status);
        if let Some(source) = self.placement_source {
            query.push_str(&format!("&order_placement_source={source}"));
        }
        if let Some(product_id) = &self.product_id {
            query.push_str(&format!("&product_ids={product_id}"));
        }
        if let Some(start) = self.start_date {
            query.push_str(&format!("&start_date={}", format_date(start)?));
        }
        if let Some(end) = self.end_date {
            query.push_str(&format!("&end_date={}", format_date(end)?));
        }
        if let Some(cursor) = cursor {
            query.push_str(&format!("&cursor={cursor}"));
        }
        Ok(query)
    }
}

fn format_date(date: OffsetDateTime) -> Result<String, CoinbaseError> {
    date.format(&Rfc3339)
        .map_err(|e| CoinbaseError::InvalidValue(format!("cannot format date: {e}")))
}
