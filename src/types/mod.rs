//! Domain types shared by the REST client, the cache and the order service.

pub mod common;
pub mod orders;
pub mod primitives;

pub use common::*;
pub use orders::{
    AttachedBracketGtc, AttachedOrderConfiguration, BracketOrderConfiguration, LimitGtc,
    LimitOrderConfiguration, MarketIoc, MarketOrderConfiguration, Order, OrderConfiguration,
    OrderDetails, OrderRequest, StopLimitGtc, StopLimitOrderConfiguration, TriggerBracketGtc,
};
pub use primitives::{NumericString, Percent, PositiveNumericString, ProductId};
