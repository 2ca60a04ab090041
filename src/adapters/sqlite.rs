use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use crate::domain::{OrderRecord, OrderSide, OrderType};
use crate::error::{DeskError, Result};

/// SQLite storage adapter: an append-only order log plus a flat key/value
/// settings table.
///
/// SQLite has no decimal affinity, so quantity and prices are stored as TEXT
/// and re-parsed on read; no value ever round-trips through a float.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url`.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!(%database_url, "Connected to SQLite");
        Ok(Self { pool })
    }

    /// An in-memory store, for tests and throwaway dry runs. Single
    /// connection: each SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ==================== Orders ====================

    /// Append an order outcome to the history log.
    pub async fn insert_order(&self, record: &OrderRecord) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders
                (created_at, symbol, side, order_type, quantity, price, stop_price,
                 status, exchange_order_id, response)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            RETURNING id
            "#,
        )
        .bind(record.created_at)
        .bind(&record.symbol)
        .bind(record.side.as_str())
        .bind(record.order_type.as_str())
        .bind(record.quantity.to_string())
        .bind(record.price.map(|p| p.to_string()))
        .bind(record.stop_price.map(|p| p.to_string()))
        .bind(&record.status)
        .bind(&record.exchange_order_id)
        .bind(&record.response)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.get("id");
        debug!(id, symbol = %record.symbol, "order recorded");
        Ok(id)
    }

    /// Order history, newest first.
    pub async fn list_orders(&self, limit: i64) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, symbol, side, order_type, quantity, price, stop_price,
                   status, exchange_order_id, response
            FROM orders
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<OrderRecord> {
        let side_raw: String = row.get("side");
        let type_raw: String = row.get("order_type");

        Ok(OrderRecord {
            id: Some(row.get("id")),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
            symbol: row.get("symbol"),
            side: OrderSide::from_str(&side_raw)
                .map_err(|e| DeskError::Internal(format!("corrupt side column: {}", e)))?,
            order_type: OrderType::from_str(&type_raw)
                .map_err(|e| DeskError::Internal(format!("corrupt order_type column: {}", e)))?,
            quantity: parse_decimal_column(row.get("quantity"))?,
            price: parse_optional_decimal_column(row.get("price"))?,
            stop_price: parse_optional_decimal_column(row.get("stop_price"))?,
            status: row.get("status"),
            exchange_order_id: row.get("exchange_order_id"),
            response: row.get("response"),
        })
    }

    // ==================== Settings ====================

    /// Insert or overwrite a setting.
    pub async fn save_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }
}

fn parse_decimal_column(raw: String) -> Result<Decimal> {
    Decimal::from_str(&raw)
        .map_err(|e| DeskError::Internal(format!("corrupt decimal column {:?}: {}", raw, e)))
}

fn parse_optional_decimal_column(raw: Option<String>) -> Result<Option<Decimal>> {
    raw.map(parse_decimal_column).transpose()
}
