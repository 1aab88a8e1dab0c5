//! Common domain enums for the Coinbase brokerage API.

use serde::{Deserialize, Serialize};

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Open,
    Filled,
    Cancelled,
    Expired,
    Failed,
    Queued,
    CancelQueued,
    /// Also used for statuses this client does not know about
    #[serde(other)]
    UnknownOrderStatus,
}

impl OrderStatus {
    /// Whether the order can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Expired | OrderStatus::Failed
        )
    }

    /// The wire representation, as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Open => "OPEN",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Expired => "EXPIRED",
            OrderStatus::Failed => "FAILED",
            OrderStatus::UnknownOrderStatus => "UNKNOWN_ORDER_STATUS",
            OrderStatus::Queued => "QUEUED",
            OrderStatus::CancelQueued => "CANCEL_QUEUED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type as reported by the historical orders endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    UnknownOrderType,
    Market,
    Limit,
    Stop,
    StopLimit,
    Bracket,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::UnknownOrderType => "UNKNOWN_ORDER_TYPE",
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
            OrderType::StopLimit => "STOP_LIMIT",
            OrderType::Bracket => "BRACKET",
        };
        write!(f, "{}", s)
    }
}

/// Where an order was placed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderPlacementSource {
    #[serde(rename = "UNKNOWN_PLACEMENT_SOURCE")]
    Unknown,
    #[serde(rename = "RETAIL_SIMPLE")]
    Simple,
    /// Advanced Trade (default for API orders)
    #[default]
    #[serde(rename = "RETAIL_ADVANCED")]
    Advanced,
}

impl OrderPlacementSource {
    /// The wire representation, as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPlacementSource::Unknown => "UNKNOWN_PLACEMENT_SOURCE",
            OrderPlacementSource::Simple => "RETAIL_SIMPLE",
            OrderPlacementSource::Advanced => "RETAIL_ADVANCED",
        }
    }
}

impl std::fmt::Display for OrderPlacementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "ACCOUNT_TYPE_CRYPTO")]
    Crypto,
    #[serde(rename = "ACCOUNT_TYPE_FIAT")]
    Fiat,
}

/// Product type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductType {
    /// Spot market
    #[default]
    Spot,
}

impl ProductType {
    /// The wire representation, as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Spot => "SPOT",
        }
    }
}

/// Trigger direction of a stop-limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopDirection {
    /// Trigger when the price rises to the stop price
    #[serde(rename = "STOP_DIRECTION_STOP_UP")]
    StopUp,
    /// Trigger when the price falls to the stop price
    #[serde(rename = "STOP_DIRECTION_STOP_DOWN")]
    StopDown,
}

impl StopDirection {
    /// Stop direction for protecting an order on the given side.
    pub fn for_side(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => StopDirection::StopUp,
            OrderSide::Sell => StopDirection::StopDown,
        }
    }
}
