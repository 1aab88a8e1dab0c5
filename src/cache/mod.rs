//! On-disk cache of semi-static brokerage data.
//!
//! [`CacheStore`] owns the file layout; [`CachedClient`] layers cached
//! lookups over any [`BrokerageClient`](crate::rest::BrokerageClient).

mod client;
mod product;
mod store;

pub use client::{CachedClient, TRANSACTION_SUMMARY};
pub use product::{DEFAULT_PRODUCT, DEFAULT_QUOTE_CURRENCY, ProductHandle, ensure_product};
pub use store::{CacheStore, DEFAULT_MAX_AGE};
