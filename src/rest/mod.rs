//! Coinbase brokerage REST API client.
//!
//! Requests are described by a [`RequestDescriptor`] and run by
//! [`CoinbaseRestClient::execute`], which signs each attempt, validates the
//! body against the expected type and retries transient failures according
//! to its [`RetryPolicy`].
//!
//! # Trait-based API
//!
//! The [`BrokerageClient`] trait abstracts the REST operations, enabling mock
//! implementations for testing:
//!
//! ```rust,ignore
//! use coinbase_brokerage_client::rest::BrokerageClient;
//!
//! async fn print_bid<C: BrokerageClient>(client: &C) -> Result<(), coinbase_brokerage_client::CoinbaseError> {
//!     let book = client.get_best_bid_ask("BTC-USD").await?;
//!     println!("best bid: {:?}", book.best_bid());
//!     Ok(())
//! }
//! ```

mod account;
mod client;
mod endpoints;
mod market;
mod orders;
pub mod request;
pub mod retry;
mod traits;
pub mod types;

pub use account::currency_balance;
pub use client::{CoinbaseRestClient, CoinbaseRestClientBuilder, DEFAULT_TIMEOUT};
pub use endpoints::*;
pub use request::RequestDescriptor;
pub use retry::{RetryPolicy, Transition};
pub use traits::BrokerageClient;
pub use types::*;
