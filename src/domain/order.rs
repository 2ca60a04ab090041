use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            _ => Err("invalid side; expected BUY|SELL"),
        }
    }
}

/// Order type
///
/// `Stop` is a stop-limit (becomes a limit order at the trigger price),
/// `StopMarket` a stop-triggered market order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopMarket,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
            OrderType::StopMarket => "STOP_MARKET",
        }
    }

    /// Whether this type carries a limit price (and therefore a time in force).
    pub fn requires_price(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::Stop)
    }

    /// Whether this type carries a stop (trigger) price.
    pub fn requires_stop_price(&self) -> bool {
        matches!(self, OrderType::Stop | OrderType::StopMarket)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = &'static str;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            "STOP" => Ok(OrderType::Stop),
            "STOP_MARKET" => Ok(OrderType::StopMarket),
            _ => Err("invalid order type; expected MARKET|LIMIT|STOP|STOP_MARKET"),
        }
    }
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good Till Cancelled
    GTC,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::GTC => "GTC",
        }
    }
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order acknowledgment returned by the exchange after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: i64,
    pub client_order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub status: String,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    pub avg_price: Option<Decimal>,
}

/// One row of the local order history: the submitted request summary plus the
/// outcome. The history records outcomes, never live request objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub status: String,
    pub exchange_order_id: Option<String>,
    /// Raw exchange response (or error text), kept for display/debugging.
    pub response: Option<String>,
}

impl OrderRecord {
    /// Build a history row from a request and the ack it produced.
    pub fn from_ack(request: &super::OrderRequest, ack: &OrderAck, raw: Option<String>) -> Self {
        Self {
            id: None,
            created_at: Utc::now(),
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            quantity: request.quantity,
            price: request.price,
            stop_price: request.stop_price,
            status: ack.status.clone(),
            exchange_order_id: Some(ack.order_id.to_string()),
            response: raw,
        }
    }

    /// Build a history row for a request the exchange rejected.
    pub fn from_rejection(request: &super::OrderRequest, error: &str) -> Self {
        Self {
            id: None,
            created_at: Utc::now(),
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            quantity: request.quantity,
            price: request.price,
            stop_price: request.stop_price,
            status: "REJECTED".to_string(),
            exchange_order_id: None,
            response: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_side_parses_case_insensitively() {
        assert_eq!(OrderSide::from_str("buy").unwrap(), OrderSide::Buy);
        assert_eq!(OrderSide::from_str(" Sell ").unwrap(), OrderSide::Sell);
        assert!(OrderSide::from_str("hold").is_err());
    }

    #[test]
    fn order_type_field_requirements() {
        assert!(!OrderType::Market.requires_price());
        assert!(!OrderType::Market.requires_stop_price());
        assert!(OrderType::Limit.requires_price());
        assert!(!OrderType::Limit.requires_stop_price());
        assert!(!OrderType::StopMarket.requires_price());
        assert!(OrderType::StopMarket.requires_stop_price());
        assert!(OrderType::Stop.requires_price());
        assert!(OrderType::Stop.requires_stop_price());
    }

    #[test]
    fn serde_uses_exchange_spelling() {
        assert_eq!(
            serde_json::to_string(&OrderType::StopMarket).unwrap(),
            "\"STOP_MARKET\""
        );
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), "\"BUY\"");
    }
}
