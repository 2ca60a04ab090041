use std::sync::Arc;

use crate::adapters::{BinanceFuturesClient, SqliteStore};
use crate::config::ExchangeConfig;
use crate::error::Result;

use super::FuturesGateway;

/// Settings-store keys for API credentials. The same names are honored as
/// environment variables when the store has nothing.
pub const API_KEY_SETTING: &str = "BINANCE_API_KEY";
pub const API_SECRET_SETTING: &str = "BINANCE_API_SECRET";

/// Exchange API credentials.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(API_KEY_SETTING).ok()?;
        let api_secret = std::env::var(API_SECRET_SETTING).ok()?;
        if api_key.trim().is_empty() || api_secret.trim().is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            api_secret,
        })
    }

    /// Resolve credentials the way the settings flow stores them: the local
    /// settings table first, environment as fallback.
    pub async fn resolve(store: &SqliteStore) -> Result<Option<Self>> {
        let api_key = store.get_setting(API_KEY_SETTING).await?;
        let api_secret = store.get_setting(API_SECRET_SETTING).await?;

        match (api_key, api_secret) {
            (Some(key), Some(secret)) if !key.trim().is_empty() && !secret.trim().is_empty() => {
                Ok(Some(Self {
                    api_key: key,
                    api_secret: secret,
                }))
            }
            _ => Ok(Self::from_env()),
        }
    }
}

// Debug by hand so the secret can never end up in a log line.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

/// Construct the runtime gateway from config and explicit credentials.
///
/// There is no lazily-built global client: callers construct a gateway, hold
/// the handle, and on a settings change construct a replacement explicitly.
/// In-flight requests keep whatever handle they started with.
///
/// A gateway built without credentials still answers unsigned endpoints
/// (ping); signed operations fail with a clear [`DeskError::Auth`] pointing
/// at `orderdesk setup`.
pub fn build_gateway(
    config: &ExchangeConfig,
    credentials: Option<Credentials>,
    dry_run: bool,
) -> Result<Arc<dyn FuturesGateway>> {
    if dry_run {
        let client = BinanceFuturesClient::dry_run(&config.base_url)?;
        return Ok(Arc::new(client));
    }

    let client = BinanceFuturesClient::new(&config.base_url, credentials, config.recv_window_ms)?;
    Ok(Arc::new(client))
}
