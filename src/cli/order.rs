//! `orderdesk order`: validate, submit and record a single order.

use rust_decimal::Decimal;
use tracing::warn;

use super::output;
use crate::adapters::SqliteStore;
use crate::domain::{OrderAck, OrderIntent, OrderRecord, OrderRequest};
use crate::error::{DeskError, Result};
use crate::exchange::FuturesGateway;

pub struct OrderArgs {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub json: bool,
}

pub async fn run(
    gateway: &dyn FuturesGateway,
    store: &SqliteStore,
    args: OrderArgs,
) -> Result<()> {
    let intent = OrderIntent {
        symbol: args.symbol,
        side: args.side,
        order_type: args.order_type,
        quantity: args.quantity,
        price: args.price,
        stop_price: args.stop_price,
    };

    let request = match OrderRequest::build(&intent) {
        Ok(request) => request,
        Err(e) => {
            output::print_error(&format!("rejected: {e}"));
            return Err(DeskError::Validation(e));
        }
    };

    match gateway.place_order(&request).await {
        Ok(ack) => {
            let raw = serde_json::to_string(&ack).ok();
            if let Err(e) = store
                .insert_order(&OrderRecord::from_ack(&request, &ack, raw))
                .await
            {
                warn!(error = %e, "failed to record order");
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(&ack)?);
            } else {
                print_ack_summary(&ack, gateway.is_dry_run());
            }
            Ok(())
        }
        Err(e) => {
            if let Err(log_err) = store
                .insert_order(&OrderRecord::from_rejection(&request, &e.to_string()))
                .await
            {
                warn!(error = %log_err, "failed to record rejected order");
            }
            output::print_error(&format!("order failed: {e}"));
            Err(e)
        }
    }
}

fn print_ack_summary(ack: &OrderAck, dry_run: bool) {
    if dry_run {
        output::print_warn("dry run: order was not submitted to the venue");
    } else {
        output::print_success("Order placed");
    }
    println!("{}", "-".repeat(30));
    output::print_kv("Order ID:", &ack.order_id.to_string());
    output::print_kv("Symbol:", &ack.symbol);
    output::print_kv("Side:", ack.side.as_str());
    output::print_kv("Type:", ack.order_type.as_str());
    output::print_kv("Status:", &ack.status);
    output::print_kv("Orig Qty:", &ack.orig_qty.to_string());
    output::print_kv("Executed Qty:", &ack.executed_qty.to_string());
    output::print_kv(
        "Avg Price:",
        &ack.avg_price
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string()),
    );
    println!("{}", "-".repeat(30));
}
