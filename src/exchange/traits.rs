use async_trait::async_trait;

use crate::domain::{OrderAck, OrderRequest};
use crate::error::Result;

/// Gateway to a futures venue.
///
/// The gateway receives a fully validated [`OrderRequest`] and either returns
/// the venue's acknowledgment or a typed error. It performs no validation of
/// its own beyond serialization and never retries; retry policy, if any,
/// belongs to the caller.
#[async_trait]
pub trait FuturesGateway: Send + Sync {
    /// Human-readable venue name for logs and status displays.
    fn venue(&self) -> &str;

    /// Whether this gateway simulates acknowledgments instead of submitting.
    fn is_dry_run(&self) -> bool;

    /// Submit an order and return the venue's acknowledgment.
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderAck>;

    /// Connectivity check against the venue.
    async fn ping(&self) -> Result<()>;
}
