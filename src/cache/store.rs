//! JSON files under the per-user cache directory.
//!
//! Layout:
//!
//! ```text
//! <root>/products/<product_id>.json
//! <root>/orders/<order_id>.json
//! <root>/coinbase/<name>.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::CoinbaseError;
use crate::rest::types::Product;
use crate::types::Order;

const APP_DIR: &str = "helper";
const PRODUCTS_DIR: &str = "products";
const ORDERS_DIR: &str = "orders";
const NAMED_DIR: &str = "coinbase";

/// Age after which a named entry is rewritten by [`CacheStore::save_named_if_stale`].
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// On-disk JSON cache rooted at one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Cache rooted at `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache under the platform cache directory (`~/.cache/helper` on Linux).
    pub fn default_location() -> Result<Self, CoinbaseError> {
        dirs::cache_dir()
            .map(|dir| Self::new(dir.join(APP_DIR)))
            .ok_or_else(|| CoinbaseError::Config("cannot determine the user cache directory".to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn product_path(&self, product_id: &str) -> Result<PathBuf, CoinbaseError> {
        Ok(self.root.join(PRODUCTS_DIR).join(file_name(product_id)?))
    }

    pub fn order_path(&self, order_id: Uuid) -> PathBuf {
        self.root.join(ORDERS_DIR).join(format!("{order_id}.json"))
    }

    pub fn named_path(&self, name: &str) -> Result<PathBuf, CoinbaseError> {
        Ok(self.root.join(NAMED_DIR).join(file_name(name)?))
    }

    /// Read and parse a cache file.
    ///
    /// Fails with [`CoinbaseError::CacheMiss`] when the file does not exist
    /// and [`CoinbaseError::CacheCorrupt`] when it cannot be parsed as `T`.
    pub async fn load_json<T>(&self, path: &Path) -> Result<T, CoinbaseError>
    where
        T: DeserializeOwned,
    {
        let contents = match tokio::fs::read(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Cache miss for {}", path.display());
                return Err(CoinbaseError::CacheMiss {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Cache hit for {}", path.display());
        serde_json::from_slice(&contents).map_err(|source| CoinbaseError::CacheCorrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write `data` as pretty-printed JSON, creating parent directories.
    pub async fn save_json<T>(&self, path: &Path, data: &T) -> Result<(), CoinbaseError>
    where
        T: Serialize + ?Sized,
    {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(data)?;
        tokio::fs::write(path, json).await?;
        tracing::debug!("Cache saved for {}", path.display());
        Ok(())
    }

    pub async fn load_product(&self, product_id: &str) -> Result<Product, CoinbaseError> {
        self.load_json(&self.product_path(product_id)?).await
    }

    pub async fn save_product(&self, product: &Product) -> Result<(), CoinbaseError> {
        self.save_json(&self.product_path(&product.product_id)?, product)
            .await
    }

    pub async fn load_order(&self, order_id: Uuid) -> Result<Order, CoinbaseError> {
        self.load_json(&self.order_path(order_id)).await
    }

    pub async fn save_order(&self, order: &Order) -> Result<(), CoinbaseError> {
        self.save_json(&self.order_path(order.order_id), order).await
    }

    pub async fn load_named<T>(&self, name: &str) -> Result<T, CoinbaseError>
    where
        T: DeserializeOwned,
    {
        self.load_json(&self.named_path(name)?).await
    }

    pub async fn save_named<T>(&self, name: &str, data: &T) -> Result<(), CoinbaseError>
    where
        T: Serialize + ?Sized,
    {
        self.save_json(&self.named_path(name)?, data).await
    }

    /// Write a named entry unless the existing file is younger than `max_age`.
    ///
    /// Returns whether the file was written.
    pub async fn save_named_if_stale<T>(
        &self,
        name: &str,
        data: &T,
        max_age: Duration,
    ) -> Result<bool, CoinbaseError>
    where
        T: Serialize + ?Sized,
    {
        let path = self.named_path(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => {
                let age = SystemTime::now()
                    .duration_since(metadata.modified()?)
                    .unwrap_or(Duration::ZERO);
                if age <= max_age {
                    tracing::debug!("{name} cache is fresh; skipping write");
                    return Ok(false);
                }
                tracing::warn!("{name} cache is stale; refreshing");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        self.save_json(&path, data).await?;
        Ok(true)
    }
}

/// `<key>.json`, refusing keys that would escape the cache directory.
fn file_name(key: &str) -> Result<String, CoinbaseError> {
    if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
        return Err(CoinbaseError::InvalidValue(format!(
            "{key:?} cannot be used as a cache key"
        )));
    }
    Ok(format!("{key}.json"))
}
