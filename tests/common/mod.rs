#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::fmt::MakeWriter;
use wiremock::MockServer;

use coinbase_brokerage_client::auth::StaticCredentials;
use coinbase_brokerage_client::rest::CoinbaseRestClient;

pub const KEY_NAME: &str = "organizations/test-org/apiKeys/test-key";
pub const SEC1_PEM: &str = include_str!("../fixtures/ec_sec1.pem");
pub const PUBLIC_PEM: &str = include_str!("../fixtures/ec_public.pem");
pub const ORDER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

pub fn build_client(server: &MockServer) -> CoinbaseRestClient {
    let credentials = Arc::new(StaticCredentials::new(KEY_NAME, SEC1_PEM));
    CoinbaseRestClient::builder()
        .base_url(server.uri())
        .credentials(credentials)
        .retry_base_delay(Duration::from_millis(5))
        .build()
}

pub fn order_json(order_id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "order_id": order_id,
        "product_id": "BTC-USD",
        "side": "BUY",
        "status": status,
        "completion_percentage": "100",
        "filled_size": "0.001",
        "average_filled_price": "50000.00",
        "filled_value": "50.00",
        "total_fees": "0.30",
        "total_value_after_fees": "50.30",
        "product_type": "SPOT",
        "last_fill_time": "2024-03-01T12:00:00Z",
        "order_type": "LIMIT",
        "order_configuration": {
            "limit_limit_gtc": {
                "base_size": "0.001",
                "limit_price": "50000.00",
                "post_only": true
            }
        }
    })
}

pub fn product_json() -> serde_json::Value {
    serde_json::json!({
        "product_id": "BTC-USD",
        "price": "50123.45",
        "base_increment": "0.00000001",
        "price_increment": "0.01",
        "product_type": "SPOT"
    })
}

pub fn transaction_summary_json() -> serde_json::Value {
    serde_json::json!({
        "fee_tier": {
            "pricing_tier": "Advanced 1",
            "taker_fee_rate": "0.006",
            "maker_fee_rate": "0.004"
        },
        "total_balance": "1234.56",
        "total_fees": 12.5,
        "total_volume": 2500.0
    })
}

/// Log output collected by a test-local subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route events on this thread into the buffer until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }

    /// Lines containing every one of `needles`.
    pub fn matching(&self, needles: &[&str]) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| needles.iter().all(|needle| line.contains(needle)))
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
