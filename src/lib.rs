//! # Coinbase Brokerage Client
//!
//! An async Rust client library for the Coinbase Advanced Trade brokerage REST API.
//!
//! ## Features
//!
//! - ES256 JWT authentication with SEC1 or PKCS#8 keys
//! - Response validation against typed shapes, with linear-backoff retries
//! - Cursor pagination of historical orders as a `Stream`
//! - Floor-to-increment quantization of order sizes and prices
//! - On-disk cache of products, finished orders and fee tiers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinbase_brokerage_client::rest::CoinbaseRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinbaseRestClient::builder()
//!         .credentials_file("/path/to/cdp_api_key.json")
//!         .build();
//!     let usd = client.get_currency_account("USD", "0.01").await?;
//!     println!("USD available: {}", usd.available);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod increment;
pub mod logging;
pub mod rest;
pub mod service;
pub mod types;

// Re-export commonly used types at crate root
pub use error::CoinbaseError;
pub use types::{OrderSide, OrderStatus, OrderType};

/// Result type alias using CoinbaseError
pub type Result<T> = std::result::Result<T, CoinbaseError>;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
