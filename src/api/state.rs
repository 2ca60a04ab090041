use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::adapters::SqliteStore;
use crate::config::ExchangeConfig;
use crate::error::Result;
use crate::exchange::{build_gateway, Credentials, FuturesGateway};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Local history + settings store
    pub store: Arc<SqliteStore>,

    /// Current exchange gateway handle. Swapped wholesale on settings
    /// updates; in-flight requests keep the handle they cloned.
    gateway: Arc<RwLock<Arc<dyn FuturesGateway>>>,

    /// Exchange connection parameters, needed to rebuild the gateway
    pub exchange_config: ExchangeConfig,

    /// Whether gateways are built in dry-run mode
    pub dry_run: bool,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        store: Arc<SqliteStore>,
        gateway: Arc<dyn FuturesGateway>,
        exchange_config: ExchangeConfig,
        dry_run: bool,
    ) -> Self {
        Self {
            store,
            gateway: Arc::new(RwLock::new(gateway)),
            exchange_config,
            dry_run,
            start_time: Utc::now(),
        }
    }

    /// Clone the current gateway handle. The lock is held only for the clone.
    pub async fn gateway(&self) -> Arc<dyn FuturesGateway> {
        self.gateway.read().await.clone()
    }

    /// Build a fresh gateway from the given credentials and swap it in.
    /// This is the only way the serving gateway ever changes.
    pub async fn reconfigure_gateway(&self, credentials: Credentials) -> Result<()> {
        let fresh = build_gateway(&self.exchange_config, Some(credentials), self.dry_run)?;
        *self.gateway.write().await = fresh;
        Ok(())
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
