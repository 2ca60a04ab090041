//! Scalar field validation for order input.
//!
//! Every function here is pure and names the offending field on failure, so
//! both the CLI and the web form can surface the exact problem to the user.
//! The per-type decision table lives in [`crate::domain::OrderRequest::build`];
//! this module only judges individual fields.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::{OrderSide, OrderType};

/// A rejected order input, detected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid symbol {0:?}: must be non-empty and alphanumeric")]
    InvalidSymbol(String),

    #[error("invalid side {0:?}: expected BUY or SELL")]
    InvalidSide(String),

    #[error("invalid order type {0:?}: expected MARKET, LIMIT, STOP or STOP_MARKET")]
    InvalidOrderType(String),

    #[error("invalid quantity {0}: must be greater than zero")]
    InvalidQuantity(Decimal),

    #[error("invalid price {0}: must be greater than zero")]
    InvalidPrice(Decimal),

    #[error("invalid stop price {0}: must be greater than zero")]
    InvalidStopPrice(Decimal),

    #[error("{field} is required for {order_type} orders")]
    MissingRequiredField {
        field: &'static str,
        order_type: OrderType,
    },
}

impl ValidationError {
    /// Name of the offending input field, for form-level error display.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidSymbol(_) => "symbol",
            ValidationError::InvalidSide(_) => "side",
            ValidationError::InvalidOrderType(_) => "order_type",
            ValidationError::InvalidQuantity(_) => "quantity",
            ValidationError::InvalidPrice(_) => "price",
            ValidationError::InvalidStopPrice(_) => "stop_price",
            ValidationError::MissingRequiredField { field, .. } => field,
        }
    }
}

/// Validate and normalize a trading pair symbol.
///
/// Exchange convention: alphanumeric, no separators, upper case
/// (`btcusdt` -> `BTCUSDT`). Normalization is idempotent.
pub fn validate_symbol(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidSymbol(raw.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Parse an order side, case-insensitively.
pub fn parse_side(raw: &str) -> Result<OrderSide, ValidationError> {
    OrderSide::from_str(raw).map_err(|_| ValidationError::InvalidSide(raw.to_string()))
}

/// Parse an order type, case-insensitively.
pub fn parse_order_type(raw: &str) -> Result<OrderType, ValidationError> {
    OrderType::from_str(raw).map_err(|_| ValidationError::InvalidOrderType(raw.to_string()))
}

/// Validate an order quantity. Minimum lot size is the exchange's concern;
/// here only strict positivity is enforced.
pub fn validate_quantity(quantity: Decimal) -> Result<Decimal, ValidationError> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}

/// Validate an optional limit price. Absence is legal here; whether the price
/// is *required* depends on the order type and is decided by the builder.
pub fn validate_price(price: Option<Decimal>) -> Result<Option<Decimal>, ValidationError> {
    match price {
        Some(p) if p <= Decimal::ZERO => Err(ValidationError::InvalidPrice(p)),
        other => Ok(other),
    }
}

/// Validate an optional stop (trigger) price.
pub fn validate_stop_price(stop_price: Option<Decimal>) -> Result<Option<Decimal>, ValidationError> {
    match stop_price {
        Some(p) if p <= Decimal::ZERO => Err(ValidationError::InvalidStopPrice(p)),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_symbol() {
        assert_eq!(validate_symbol("btcusdt").unwrap(), "BTCUSDT");
        assert_eq!(validate_symbol("BTCUSDT").unwrap(), "BTCUSDT");
        assert_eq!(validate_symbol(" ethusdt ").unwrap(), "ETHUSDT");

        assert!(matches!(
            validate_symbol("BTC-USDT"),
            Err(ValidationError::InvalidSymbol(_))
        ));
        assert!(matches!(
            validate_symbol(""),
            Err(ValidationError::InvalidSymbol(_))
        ));
        assert!(matches!(
            validate_symbol("BTC/USDT"),
            Err(ValidationError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_symbol_normalization_idempotent() {
        let once = validate_symbol("btcusdt").unwrap();
        let twice = validate_symbol(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_side() {
        assert_eq!(parse_side("buy").unwrap(), OrderSide::Buy);
        assert_eq!(parse_side("SELL").unwrap(), OrderSide::Sell);
        assert!(matches!(
            parse_side("HOLD"),
            Err(ValidationError::InvalidSide(_))
        ));
    }

    #[test]
    fn test_parse_order_type() {
        assert_eq!(parse_order_type("market").unwrap(), OrderType::Market);
        assert_eq!(parse_order_type("LIMIT").unwrap(), OrderType::Limit);
        assert_eq!(parse_order_type("stop").unwrap(), OrderType::Stop);
        assert_eq!(
            parse_order_type("stop_market").unwrap(),
            OrderType::StopMarket
        );
        assert!(matches!(
            parse_order_type("STOP_LOSS"),
            Err(ValidationError::InvalidOrderType(_))
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(dec!(10.5)).unwrap(), dec!(10.5));
        assert!(validate_quantity(Decimal::ZERO).is_err());
        assert!(validate_quantity(dec!(-5)).is_err());
    }

    #[test]
    fn test_validate_price_fields() {
        assert_eq!(validate_price(None).unwrap(), None);
        assert_eq!(validate_price(Some(dec!(2000))).unwrap(), Some(dec!(2000)));
        assert!(matches!(
            validate_price(Some(Decimal::ZERO)),
            Err(ValidationError::InvalidPrice(_))
        ));
        assert!(matches!(
            validate_stop_price(Some(dec!(-1))),
            Err(ValidationError::InvalidStopPrice(_))
        ));
    }
}
