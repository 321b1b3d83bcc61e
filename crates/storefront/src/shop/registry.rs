//! Per-session shop registry.
//!
//! Each browser session owns one [`Shop`], addressed by a [`ShopKey`] stored
//! in the session. Shops idle for longer than the configured timeout are
//! evicted and torn down.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::notification::RemovalCause;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::Shop;
use crate::catalog::CatalogClient;
use crate::stores::StoreError;

/// Upper bound on live shops.
const MAX_SHOPS: u64 = 10_000;

/// Identifier of a shop, kept in the visitor's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopKey(Uuid);

impl ShopKey {
    /// Generate a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ShopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live shops keyed by session.
///
/// Cheaply cloneable; clones share the same shops.
#[derive(Clone)]
pub struct ShopRegistry {
    shops: Cache<ShopKey, Arc<Shop>>,
    client: CatalogClient,
}

impl ShopRegistry {
    /// Create an empty registry whose shops fetch from `client`.
    #[must_use]
    pub fn new(client: CatalogClient, idle_timeout: Duration) -> Self {
        let shops = Cache::builder()
            .max_capacity(MAX_SHOPS)
            .time_to_idle(idle_timeout)
            .eviction_listener(|key: Arc<ShopKey>, shop: Arc<Shop>, cause: RemovalCause| {
                info!(shop = %key, ?cause, "Shop removed from registry");
                shop.teardown();
            })
            .build();

        Self { shops, client }
    }

    /// The shop for `key`, mounting a new one if none is live.
    ///
    /// # Errors
    ///
    /// Returns an error if mounting the shop fails.
    #[instrument(skip(self), fields(shop = %key))]
    pub async fn get_or_mount(&self, key: ShopKey) -> Result<Arc<Shop>, StoreError> {
        let client = self.client.clone();
        let shop = self
            .shops
            .try_get_with(key, async move { Shop::mount(client).map(Arc::new) })
            .await
            .map_err(|e| (*e).clone())?;

        if shop.is_live() {
            return Ok(shop);
        }

        // Torn down between lookup and use; replace it
        self.shops.invalidate(&key).await;
        let client = self.client.clone();
        self.shops
            .try_get_with(key, async move { Shop::mount(client).map(Arc::new) })
            .await
            .map_err(|e| (*e).clone())
    }

    /// The live shop for `key`, if any.
    pub async fn get(&self, key: &ShopKey) -> Option<Arc<Shop>> {
        self.shops.get(key).await.filter(|shop| shop.is_live())
    }

    /// Tear down and forget the shop for `key`.
    pub async fn end(&self, key: &ShopKey) {
        if let Some(shop) = self.shops.remove(key).await {
            shop.teardown();
        }
    }

    /// Approximate number of live shops.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.shops.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run pending evictions now.
    pub async fn run_pending_tasks(&self) {
        self.shops.run_pending_tasks().await;
    }
}
