//! `orderdesk history`: render the local order log, newest first.

use serde::Serialize;
use tabled::Tabled;

use super::output::{self, OutputMode};
use crate::adapters::SqliteStore;
use crate::domain::OrderRecord;
use crate::error::Result;

#[derive(Tabled, Serialize)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "Type")]
    order_type: &'static str,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stop")]
    stop_price: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Order ID")]
    exchange_order_id: String,
}

impl From<&OrderRecord> for HistoryRow {
    fn from(record: &OrderRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            time: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            symbol: record.symbol.clone(),
            side: record.side.as_str(),
            order_type: record.order_type.as_str(),
            quantity: record.quantity.to_string(),
            price: record
                .price
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            stop_price: record
                .stop_price
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: record.status.clone(),
            exchange_order_id: record.exchange_order_id.clone().unwrap_or_default(),
        }
    }
}

pub async fn run(store: &SqliteStore, limit: i64, mode: OutputMode) -> Result<()> {
    let records = store.list_orders(limit).await?;
    let rows: Vec<HistoryRow> = records.iter().map(HistoryRow::from).collect();
    output::print_items(&rows, mode)?;
    Ok(())
}
