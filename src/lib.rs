pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod validation;

pub use adapters::{BinanceFuturesClient, SqliteStore};
pub use config::AppConfig;
pub use domain::{
    OrderAck, OrderIntent, OrderRecord, OrderRequest, OrderSide, OrderType, TimeInForce,
};
pub use error::{DeskError, Result};
pub use exchange::{build_gateway, Credentials, FuturesGateway};
pub use validation::ValidationError;
