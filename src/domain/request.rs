//! Order request construction and validation.
//!
//! This is the decision table that decides, per order type, which optional
//! fields are mandatory and which are dropped before the request reaches the
//! network boundary. It is pure: no I/O, no logging, no shared state, safe to
//! call from any number of concurrent handlers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderSide, OrderType, TimeInForce};
use crate::validation::{
    parse_order_type, parse_side, validate_price, validate_quantity, validate_stop_price,
    validate_symbol, ValidationError,
};

/// Raw order input as collected by a CLI prompt or web form, before any
/// normalization. Strings arrive as the user typed them.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: String,
    #[serde(alias = "type")]
    pub order_type: String,
    pub quantity: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
}

impl OrderIntent {
    pub fn new(symbol: &str, side: &str, order_type: &str, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: side.to_string(),
            order_type: order_type.to_string(),
            quantity,
            price: None,
            stop_price: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }
}

/// A validated, exchange-ready order request.
///
/// Serialization uses the exchange's field names, and optional fields that do
/// not apply to the order type are absent rather than null, so the serialized
/// set is exactly what the gateway forwards. Numeric fields stay [`Decimal`];
/// string encoding for the wire happens in the gateway adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(rename = "stopPrice", skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(rename = "timeInForce", skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
}

impl OrderRequest {
    /// Validate raw order input and assemble the minimal field set for its
    /// order type.
    ///
    /// Scalar fields are checked first (first failure wins), then the type
    /// decides which of `price`/`stop_price` are mandatory:
    ///
    /// | type        | price    | stop_price | time_in_force |
    /// |-------------|----------|------------|---------------|
    /// | MARKET      | dropped  | dropped    | -             |
    /// | LIMIT       | required | dropped    | GTC           |
    /// | STOP_MARKET | dropped  | required   | -             |
    /// | STOP        | required | required   | GTC           |
    ///
    /// Fields a type does not use are silently dropped even when supplied, so
    /// the exchange never receives contradictory parameters.
    pub fn build(intent: &OrderIntent) -> Result<Self, ValidationError> {
        let symbol = validate_symbol(&intent.symbol)?;
        let side = parse_side(&intent.side)?;
        let order_type = parse_order_type(&intent.order_type)?;
        let quantity = validate_quantity(intent.quantity)?;
        let price = validate_price(intent.price)?;
        let stop_price = validate_stop_price(intent.stop_price)?;

        let price = if order_type.requires_price() {
            Some(price.ok_or(ValidationError::MissingRequiredField {
                field: "price",
                order_type,
            })?)
        } else {
            None
        };

        let stop_price = if order_type.requires_stop_price() {
            Some(stop_price.ok_or(ValidationError::MissingRequiredField {
                field: "stop_price",
                order_type,
            })?)
        } else {
            None
        };

        // GTC rides along with a limit price, never without one.
        let time_in_force = price.is_some().then_some(TimeInForce::GTC);

        Ok(Self {
            symbol,
            side,
            order_type,
            quantity,
            price,
            stop_price,
            time_in_force,
        })
    }
}
