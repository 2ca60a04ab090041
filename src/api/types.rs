use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{OrderRecord, OrderSide, OrderType};

// ============================================================================
// Order Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderResponse {
    pub order_id: i64,
    pub client_order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: String,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    pub avg_price: Option<Decimal>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdersListResponse {
    pub orders: Vec<OrderRecord>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub limit: Option<i64>,
}

// ============================================================================
// Settings Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub api_key: String,
    /// The secret itself is never returned, only whether one is stored.
    pub has_secret: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub api_key: String,
    pub api_secret: String,
}

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub status: String,
    pub venue: String,
    pub dry_run: bool,
    pub testnet: bool,
    pub db: String,
    pub uptime_secs: i64,
}

// ============================================================================
// Error body
// ============================================================================

/// JSON error payload; `field` is set for validation failures so the form can
/// point at the offending input.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_code: Option<i64>,
}

impl ApiErrorBody {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
            exchange_code: None,
        }
    }
}
