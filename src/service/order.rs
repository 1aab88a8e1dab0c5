//! Order builders.
//!
//! Each helper builds an [`OrderRequest`] with a fresh client order id,
//! submits it and returns the exchange order id. Sizes and prices must already
//! be quantized (see [`ProductHandle`](crate::cache::ProductHandle)).

use uuid::Uuid;

use crate::error::CoinbaseError;
use crate::rest::BrokerageClient;
use crate::types::{
    AttachedBracketGtc, LimitGtc, MarketIoc, NumericString, Order, OrderConfiguration,
    OrderDetails, OrderRequest, OrderSide, ProductId, StopDirection, StopLimitGtc,
    TriggerBracketGtc,
};

async fn submit<C: BrokerageClient>(
    client: &C,
    request: OrderRequest,
) -> Result<Uuid, CoinbaseError> {
    tracing::debug!("client_order_id: {}", request.client_order_id);
    let order_id = client.create_order(&request).await?;
    tracing::info!("Order created: {order_id}");
    Ok(order_id)
}

/// Market order sized in base currency.
pub async fn create_market_order<C: BrokerageClient>(
    client: &C,
    product_id: ProductId,
    side: OrderSide,
    base_size: NumericString,
) -> Result<Uuid, CoinbaseError> {
    tracing::info!("Creating market {side} order for {base_size} {product_id}");
    let request = OrderRequest::new(
        product_id,
        side,
        OrderConfiguration::MarketIoc(MarketIoc::base(base_size)),
    );
    submit(client, request).await
}

/// Post-only good-till-cancelled limit order.
pub async fn create_limit_order<C: BrokerageClient>(
    client: &C,
    product_id: ProductId,
    side: OrderSide,
    base_size: NumericString,
    limit_price: NumericString,
) -> Result<Uuid, CoinbaseError> {
    tracing::info!("Creating limit {side} order for {base_size} {product_id} @ {limit_price}");
    let request = OrderRequest::new(
        product_id,
        side,
        OrderConfiguration::LimitGtc(LimitGtc {
            base_size,
            limit_price,
            post_only: true,
        }),
    );
    submit(client, request).await
}

/// Limit buy with an attached take-profit / stop-loss bracket.
///
/// Once the buy fills, Coinbase places a sell that fills at
/// `take_profit_price` or triggers at `stop_price`.
pub async fn create_limit_tp_sl_order<C: BrokerageClient>(
    client: &C,
    product_id: ProductId,
    base_size: NumericString,
    limit_price: NumericString,
    stop_price: NumericString,
    take_profit_price: NumericString,
) -> Result<Uuid, CoinbaseError> {
    tracing::info!(
        "Creating limit BUY order for {base_size} {product_id} @ {limit_price} \
         with take profit {take_profit_price} and stop {stop_price}"
    );
    let request = OrderRequest::new(
        product_id,
        OrderSide::Buy,
        OrderConfiguration::LimitGtc(LimitGtc {
            base_size,
            limit_price,
            post_only: true,
        }),
    )
    .with_attached_bracket(AttachedBracketGtc {
        limit_price: take_profit_price,
        stop_trigger_price: stop_price,
    });
    submit(client, request).await
}

/// Bracket order: exit at `limit_price` or when `stop_price` triggers.
pub async fn create_bracket_order<C: BrokerageClient>(
    client: &C,
    product_id: ProductId,
    side: OrderSide,
    base_size: NumericString,
    limit_price: NumericString,
    stop_price: NumericString,
) -> Result<Uuid, CoinbaseError> {
    tracing::info!(
        "Creating bracket {side} order for {base_size} {product_id} @ {limit_price}, stop {stop_price}"
    );
    let request = OrderRequest::new(
        product_id,
        side,
        OrderConfiguration::TriggerBracketGtc(TriggerBracketGtc {
            base_size,
            limit_price,
            stop_trigger_price: stop_price,
        }),
    );
    submit(client, request).await
}

/// Stop-limit order. Buys trigger on a rise to `stop_price`, sells on a fall.
pub async fn create_stop_limit_order<C: BrokerageClient>(
    client: &C,
    product_id: ProductId,
    side: OrderSide,
    base_size: NumericString,
    limit_price: NumericString,
    stop_price: NumericString,
) -> Result<Uuid, CoinbaseError> {
    tracing::info!(
        "Creating stop-limit {side} order for {base_size} {product_id} @ {limit_price}, stop {stop_price}"
    );
    let request = OrderRequest::new(
        product_id,
        side,
        OrderConfiguration::StopLimitGtc(StopLimitGtc {
            base_size,
            limit_price,
            stop_direction: StopDirection::for_side(side),
            stop_price,
        }),
    );
    submit(client, request).await
}

/// Write an order's fields and configuration to the log.
pub fn log_order(order: &Order) {
    tracing::info!("order_id: {}", order.order_id);
    tracing::info!("product_id: {}", order.product_id);
    tracing::info!("side: {}", order.side);
    tracing::info!("status: {}", order.status.as_str());
    tracing::info!("order_type: {}", order.order_type());
    tracing::info!("completion_percentage: {}", order.completion_percentage);
    tracing::info!("filled_size: {}", order.filled_size);
    tracing::info!("average_filled_price: {}", order.average_filled_price);
    tracing::info!("filled_value: {}", order.filled_value);
    tracing::info!("total_fees: {}", order.total_fees);
    tracing::info!("total_value_after_fees: {}", order.total_value_after_fees);
    tracing::info!("product_type: {}", order.product_type);
    match order.last_fill_time {
        Some(time) => tracing::info!("last_fill_time: {time}"),
        None => tracing::info!("last_fill_time: -"),
    }

    match &order.details {
        OrderDetails::Bracket { order_configuration } => {
            tracing::info!("{}: {:?}", order.configuration_key(), order_configuration.trigger_bracket_gtc);
        }
        OrderDetails::Limit {
            order_configuration,
            attached_order_configuration,
        } => {
            tracing::info!("{}: {:?}", order.configuration_key(), order_configuration.limit_limit_gtc);
            if let Some(attached) = attached_order_configuration {
                tracing::info!("attached trigger_bracket_gtc: {:?}", attached.trigger_bracket_gtc);
            }
        }
        OrderDetails::StopLimit { order_configuration } => {
            tracing::info!(
                "{}: {:?}",
                order.configuration_key(),
                order_configuration.stop_limit_stop_limit_gtc
            );
        }
        OrderDetails::Market { order_configuration } => {
            tracing::info!("{}: {:?}", order.configuration_key(), order_configuration.market_market_ioc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::rest::types::{
        Account, CurrencyBalance, HistoricalOrdersQuery, PriceBook, Product, TickerResponse,
        TransactionSummary,
    };
    use crate::types::ProductType;

    /// Records submitted orders and answers with a fixed id.
    #[derive(Default)]
    struct RecordingClient {
        orders: Mutex<Vec<OrderRequest>>,
    }

    impl RecordingClient {
        fn last(&self) -> OrderRequest {
            self.orders.lock().unwrap().last().cloned().unwrap()
        }
    }

    fn unsupported<T>() -> Result<T, CoinbaseError> {
        Err(CoinbaseError::NotFound("not mocked".to_string()))
    }

    const ORDER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    impl BrokerageClient for RecordingClient {
        async fn get_accounts(&self) -> Result<Vec<Account>, CoinbaseError> {
            unsupported()
        }

        async fn get_currency_account(
            &self,
            _currency: &str,
            _increment: &str,
        ) -> Result<CurrencyBalance, CoinbaseError> {
            unsupported()
        }

        async fn create_order(&self, order: &OrderRequest) -> Result<Uuid, CoinbaseError> {
            self.orders.lock().unwrap().push(order.clone());
            Ok(ORDER_ID.parse().unwrap())
        }

        async fn cancel_order(&self, _order_id: Uuid) -> Result<(), CoinbaseError> {
            unsupported()
        }

        async fn get_historical_orders(
            &self,
            _query: &HistoricalOrdersQuery,
        ) -> Result<Vec<Order>, CoinbaseError> {
            unsupported()
        }

        async fn get_open_orders(&self, _product_id: Option<&str>) -> Result<Vec<Order>, CoinbaseError> {
            unsupported()
        }

        async fn get_order(&self, _order_id: Uuid) -> Result<Order, CoinbaseError> {
            unsupported()
        }

        async fn get_product(&self, _product_id: &str) -> Result<Product, CoinbaseError> {
            unsupported()
        }

        async fn get_best_bid_ask(&self, _product_id: &str) -> Result<PriceBook, CoinbaseError> {
            unsupported()
        }

        async fn get_market_trades(
            &self,
            _product_id: &str,
            _limit: u32,
        ) -> Result<TickerResponse, CoinbaseError> {
            unsupported()
        }

        async fn get_transaction_summary(
            &self,
            _product_type: ProductType,
        ) -> Result<TransactionSummary, CoinbaseError> {
            unsupported()
        }
    }

    fn num(value: &str) -> NumericString {
        value.parse().unwrap()
    }

    fn btc() -> ProductId {
        "BTC-USD".parse().unwrap()
    }

    #[tokio::test]
    async fn test_market_order_request() {
        let client = RecordingClient::default();
        let id = create_market_order(&client, btc(), OrderSide::Sell, num("0.001"))
            .await
            .unwrap();
        assert_eq!(id.to_string(), ORDER_ID);

        let request = client.last();
        assert_eq!(request.side, OrderSide::Sell);
        assert_eq!(request.client_order_id.get_version_num(), 4);
        assert_eq!(
            request.order_configuration,
            OrderConfiguration::MarketIoc(MarketIoc::base(num("0.001")))
        );
        assert!(request.attached_order_configuration.is_none());
    }

    #[tokio::test]
    async fn test_limit_order_is_post_only() {
        let client = RecordingClient::default();
        create_limit_order(&client, btc(), OrderSide::Buy, num("0.5"), num("30000.00"))
            .await
            .unwrap();

        let body = serde_json::to_value(client.last()).unwrap();
        assert_eq!(
            body["order_configuration"],
            serde_json::json!({
                "limit_limit_gtc": { "base_size": "0.5", "limit_price": "30000.00", "post_only": true }
            })
        );
    }

    #[tokio::test]
    async fn test_limit_tp_sl_attaches_bracket() {
        let client = RecordingClient::default();
        create_limit_tp_sl_order(&client, btc(), num("0.1"), num("100"), num("90"), num("120"))
            .await
            .unwrap();

        let request = client.last();
        assert_eq!(request.side, OrderSide::Buy);
        let attached = request.attached_order_configuration.unwrap();
        assert_eq!(attached.trigger_bracket_gtc.limit_price, "120");
        assert_eq!(attached.trigger_bracket_gtc.stop_trigger_price, "90");
    }

    #[tokio::test]
    async fn test_bracket_order_uses_given_side() {
        let client = RecordingClient::default();
        create_bracket_order(&client, btc(), OrderSide::Buy, num("0.1"), num("80"), num("90"))
            .await
            .unwrap();
        assert_eq!(client.last().side, OrderSide::Buy);

        create_bracket_order(&client, btc(), OrderSide::Sell, num("0.1"), num("120"), num("90"))
            .await
            .unwrap();

        let request = client.last();
        assert_eq!(request.side, OrderSide::Sell);
        assert_eq!(
            request.order_configuration,
            OrderConfiguration::TriggerBracketGtc(TriggerBracketGtc {
                base_size: num("0.1"),
                limit_price: num("120"),
                stop_trigger_price: num("90"),
            })
        );
    }

    #[tokio::test]
    async fn test_stop_limit_direction_follows_side() {
        let client = RecordingClient::default();
        for (side, direction) in [
            (OrderSide::Buy, StopDirection::StopUp),
            (OrderSide::Sell, StopDirection::StopDown),
        ] {
            create_stop_limit_order(&client, btc(), side, num("1"), num("10"), num("9"))
                .await
                .unwrap();
            match client.last().order_configuration {
                OrderConfiguration::StopLimitGtc(config) => {
                    assert_eq!(config.stop_direction, direction)
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_client_order_ids_are_unique() {
        let client = RecordingClient::default();
        create_market_order(&client, btc(), OrderSide::Buy, num("1")).await.unwrap();
        create_market_order(&client, btc(), OrderSide::Buy, num("1")).await.unwrap();
        let orders = client.orders.lock().unwrap();
        assert_ne!(orders[0].client_order_id, orders[1].client_order_id);
    }
}
