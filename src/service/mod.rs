//! Order placement helpers built on [`BrokerageClient`](crate::rest::BrokerageClient).

mod order;

pub use order::{
    create_bracket_order, create_limit_order, create_limit_tp_sl_order, create_market_order,
    create_stop_limit_order, log_order,
};
