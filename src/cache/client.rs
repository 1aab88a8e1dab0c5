//! Brokerage lookups backed by the on-disk cache.

use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::cache::store::{CacheStore, DEFAULT_MAX_AGE};
use crate::error::CoinbaseError;
use crate::rest::BrokerageClient;
use crate::rest::types::{Product, TransactionSummary};
use crate::types::{Order, ProductType};

/// Cache entry name of the transaction summary.
pub const TRANSACTION_SUMMARY: &str = "transaction_summary";

/// Wraps a [`BrokerageClient`] with cached product, order and fee lookups.
///
/// The transaction summary is additionally memoized for the lifetime of the
/// value.
#[derive(Debug)]
pub struct CachedClient<C> {
    client: C,
    store: CacheStore,
    transaction_summary: OnceCell<TransactionSummary>,
}

impl<C: BrokerageClient> CachedClient<C> {
    pub fn new(client: C, store: CacheStore) -> Self {
        Self {
            client,
            store,
            transaction_summary: OnceCell::new(),
        }
    }

    /// The wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Product metadata, from the cache unless `force_update` is set.
    ///
    /// A missing or unreadable cache entry is fetched and rewritten.
    pub async fn product_info(
        &self,
        product_id: &str,
        force_update: bool,
    ) -> Result<Product, CoinbaseError> {
        if force_update {
            tracing::info!("Force update for {product_id}");
        } else {
            match self.store.load_product(product_id).await {
                Ok(product) => {
                    tracing::debug!("Cache hit for {product_id}");
                    return Ok(product);
                }
                Err(e) if e.is_cache_error() => {
                    tracing::warn!("{e}; fetching {product_id} from Coinbase");
                }
                Err(e) => return Err(e),
            }
        }

        let product = self.client.get_product(product_id).await?;
        self.store.save_product(&product).await?;
        Ok(product)
    }

    /// An order by id.
    ///
    /// Only orders in a terminal state are written to the cache, so a cached
    /// order never changes.
    pub async fn order(&self, order_id: Uuid) -> Result<Order, CoinbaseError> {
        match self.store.load_order(order_id).await {
            Ok(order) => return Ok(order),
            Err(e) if e.is_cache_error() => tracing::debug!("{e}"),
            Err(e) => return Err(e),
        }

        let order = self.client.get_order(order_id).await?;
        if order.status.is_terminal() {
            self.store.save_order(&order).await?;
        }
        Ok(order)
    }

    /// Spot transaction summary: memory, then disk, then the API.
    ///
    /// A fetched summary replaces whatever was on disk.
    pub async fn transaction_summary(&self) -> Result<&TransactionSummary, CoinbaseError> {
        if let Some(summary) = self.transaction_summary.get() {
            tracing::debug!("transaction summary cached in memory");
            return Ok(summary);
        }

        self.transaction_summary
            .get_or_try_init(|| async {
                match self.store.load_named::<TransactionSummary>(TRANSACTION_SUMMARY).await {
                    Ok(summary) => {
                        tracing::debug!("transaction summary cached on disk");
                        return Ok(summary);
                    }
                    Err(CoinbaseError::CacheMiss { .. }) => {
                        tracing::info!("transaction summary not found on disk");
                    }
                    Err(e @ CoinbaseError::CacheCorrupt { .. }) => {
                        tracing::warn!("cached transaction summary invalid, refreshing");
                        tracing::debug!("{e}");
                    }
                    Err(e) => return Err(e),
                }

                let summary = self.client.get_transaction_summary(ProductType::Spot).await?;
                self.store.save_named(TRANSACTION_SUMMARY, &summary).await?;
                Ok(summary)
            })
            .await
    }

    /// Fetch a fresh summary and rewrite the disk copy if it is older than a day.
    ///
    /// Returns the fetched summary and whether the file was written. The
    /// in-memory copy is left untouched.
    pub async fn refresh_transaction_summary(
        &self,
    ) -> Result<(TransactionSummary, bool), CoinbaseError> {
        let summary = self.client.get_transaction_summary(ProductType::Spot).await?;
        let written = self
            .store
            .save_named_if_stale(TRANSACTION_SUMMARY, &summary, DEFAULT_MAX_AGE)
            .await?;
        Ok((summary, written))
    }
}
