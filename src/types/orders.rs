//! Order configuration shapes and the order record returned by Coinbase.
//!
//! Coinbase nests each order's parameters under a key naming its
//! configuration (`limit_limit_gtc`, `market_market_ioc`, ...). Orders returned
//! by the historical endpoints carry an `order_type` discriminator which
//! selects the configuration shape; [`OrderDetails`] models that union.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::types::common::{OrderSide, OrderStatus, OrderType, StopDirection};
use crate::types::primitives::{NumericString, ProductId};

fn default_post_only() -> bool {
    true
}

/// Good-till-cancelled limit order parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitGtc {
    /// Amount of base currency.
    pub base_size: NumericString,
    /// Limit price in quote currency.
    pub limit_price: NumericString,
    /// Only add liquidity (default: true).
    #[serde(default = "default_post_only")]
    pub post_only: bool,
}

/// Immediate-or-cancel market order parameters.
///
/// At least one of `base_size` and `quote_size` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMarketIoc")]
pub struct MarketIoc {
    /// Amount of base currency to trade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_size: Option<NumericString>,
    /// Amount of quote currency to spend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_size: Option<NumericString>,
}

impl MarketIoc {
    /// Market order sized in base currency.
    pub fn base(base_size: NumericString) -> Self {
        Self {
            base_size: Some(base_size),
            quote_size: None,
        }
    }

    /// Market order sized in quote currency.
    pub fn quote(quote_size: NumericString) -> Self {
        Self {
            base_size: None,
            quote_size: Some(quote_size),
        }
    }
}

#[derive(Deserialize)]
struct RawMarketIoc {
    #[serde(default)]
    base_size: Option<NumericString>,
    #[serde(default)]
    quote_size: Option<NumericString>,
}

impl TryFrom<RawMarketIoc> for MarketIoc {
    type Error = String;

    fn try_from(raw: RawMarketIoc) -> Result<Self, Self::Error> {
        if raw.base_size.is_none() && raw.quote_size.is_none() {
            return Err("market_market_ioc requires base_size or quote_size".to_string());
        }
        Ok(Self {
            base_size: raw.base_size,
            quote_size: raw.quote_size,
        })
    }
}

/// Bracket order parameters: a limit exit plus a stop trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerBracketGtc {
    pub base_size: NumericString,
    pub limit_price: NumericString,
    pub stop_trigger_price: NumericString,
}

/// Stop-limit order parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLimitGtc {
    pub base_size: NumericString,
    pub limit_price: NumericString,
    pub stop_direction: StopDirection,
    pub stop_price: NumericString,
}

/// Take-profit / stop-loss bracket attached to a limit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedBracketGtc {
    /// Take-profit price.
    pub limit_price: NumericString,
    /// Stop-loss trigger price.
    pub stop_trigger_price: NumericString,
}

/// Order configuration as submitted when creating an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderConfiguration {
    #[serde(rename = "limit_limit_gtc")]
    LimitGtc(LimitGtc),
    #[serde(rename = "market_market_ioc")]
    MarketIoc(MarketIoc),
    #[serde(rename = "trigger_bracket_gtc")]
    TriggerBracketGtc(TriggerBracketGtc),
    #[serde(rename = "stop_limit_stop_limit_gtc")]
    StopLimitGtc(StopLimitGtc),
}

/// Configuration attached to a limit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedOrderConfiguration {
    pub trigger_bracket_gtc: AttachedBracketGtc,
}

/// `order_configuration` of a returned limit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitOrderConfiguration {
    pub limit_limit_gtc: LimitGtc,
}

/// `order_configuration` of a returned market order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOrderConfiguration {
    pub market_market_ioc: MarketIoc,
}

/// `order_configuration` of a returned bracket order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketOrderConfiguration {
    pub trigger_bracket_gtc: TriggerBracketGtc,
}

/// `order_configuration` of a returned stop-limit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLimitOrderConfiguration {
    pub stop_limit_stop_limit_gtc: StopLimitGtc,
}

/// Type-specific part of an order, discriminated by `order_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "order_type")]
pub enum OrderDetails {
    #[serde(rename = "BRACKET")]
    Bracket {
        order_configuration: BracketOrderConfiguration,
    },
    #[serde(rename = "LIMIT")]
    Limit {
        order_configuration: LimitOrderConfiguration,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attached_order_configuration: Option<AttachedOrderConfiguration>,
    },
    #[serde(rename = "STOP_LIMIT")]
    StopLimit {
        order_configuration: StopLimitOrderConfiguration,
    },
    #[serde(rename = "MARKET")]
    Market {
        order_configuration: MarketOrderConfiguration,
    },
}

/// An order as returned by `/orders/historical/*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Uuid,
    pub product_id: String,
    pub side: OrderSide,
    pub status: OrderStatus,
    pub completion_percentage: String,
    pub filled_size: String,
    pub average_filled_price: String,
    pub filled_value: String,
    pub total_fees: String,
    pub total_value_after_fees: String,
    pub product_type: String,
    /// Time of the most recent fill, if any.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_fill_time: Option<OffsetDateTime>,
    #[serde(flatten)]
    pub details: OrderDetails,
}

impl Order {
    /// The order type discriminator.
    pub fn order_type(&self) -> OrderType {
        match self.details {
            OrderDetails::Bracket { .. } => OrderType::Bracket,
            OrderDetails::Limit { .. } => OrderType::Limit,
            OrderDetails::StopLimit { .. } => OrderType::StopLimit,
            OrderDetails::Market { .. } => OrderType::Market,
        }
    }

    /// Key under which this order's configuration is nested.
    pub fn configuration_key(&self) -> &'static str {
        match self.details {
            OrderDetails::Bracket { .. } => "trigger_bracket_gtc",
            OrderDetails::Limit { .. } => "limit_limit_gtc",
            OrderDetails::StopLimit { .. } => "stop_limit_stop_limit_gtc",
            OrderDetails::Market { .. } => "market_market_ioc",
        }
    }

    /// Ordered base size, when expressed in base currency.
    pub fn base_size(&self) -> Option<&NumericString> {
        match &self.details {
            OrderDetails::Bracket { order_configuration } => {
                Some(&order_configuration.trigger_bracket_gtc.base_size)
            }
            OrderDetails::Limit { order_configuration, .. } => {
                Some(&order_configuration.limit_limit_gtc.base_size)
            }
            OrderDetails::StopLimit { order_configuration } => {
                Some(&order_configuration.stop_limit_stop_limit_gtc.base_size)
            }
            OrderDetails::Market { order_configuration } => {
                order_configuration.market_market_ioc.base_size.as_ref()
            }
        }
    }
}

/// Request body for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderRequest {
    /// Client-generated idempotency key.
    pub client_order_id: Uuid,
    pub product_id: ProductId,
    pub side: OrderSide,
    pub order_configuration: OrderConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_order_configuration: Option<AttachedOrderConfiguration>,
}

impl OrderRequest {
    /// Create a request with a fresh v4 client order id.
    pub fn new(product_id: ProductId, side: OrderSide, order_configuration: OrderConfiguration) -> Self {
        Self {
            client_order_id: Uuid::new_v4(),
            product_id,
            side,
            order_configuration,
            attached_order_configuration: None,
        }
    }

    /// Attach a take-profit / stop-loss bracket.
    pub fn with_attached_bracket(mut self, bracket: AttachedBracketGtc) -> Self {
        self.attached_order_configuration = Some(AttachedOrderConfiguration {
            trigger_bracket_gtc: bracket,
        });
        self
    }
}
