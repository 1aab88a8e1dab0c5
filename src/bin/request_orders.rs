//! Log every filled order since the account was opened.
//!
//! Run with: cargo run --bin request-orders

use std::process::ExitCode;

use coinbase_brokerage_client::config::EnvConfig;
use coinbase_brokerage_client::rest::{CoinbaseRestClient, HistoricalOrdersQuery};
use coinbase_brokerage_client::service::log_order;
use coinbase_brokerage_client::types::{OrderPlacementSource, OrderStatus};
use coinbase_brokerage_client::{CoinbaseError, logging};
use time::OffsetDateTime;
use time::macros::datetime;

/// Start of the first year with account activity.
const COINBASE_EPOCH: OffsetDateTime = datetime!(2024-01-01 0:00 UTC);

async fn run() -> Result<(), CoinbaseError> {
    let config = EnvConfig::load(None)?;
    logging::init(config.log_level)?;

    let client = CoinbaseRestClient::from_env_config(&config);
    let query = HistoricalOrdersQuery::new(OrderStatus::Filled)
        .placement_source(Some(OrderPlacementSource::Unknown))
        .start_date(COINBASE_EPOCH)
        .end_date(OffsetDateTime::now_utc());

    let orders = client.get_historical_orders(&query).await?;
    tracing::info!("{} filled orders", orders.len());
    for order in &orders {
        log_order(order);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
