pub mod binance_rest;
pub mod sqlite;

pub use binance_rest::BinanceFuturesClient;
pub use sqlite::SqliteStore;
