use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, warn};

use crate::api::{state::AppState, types::*};
use crate::domain::{OrderIntent, OrderRecord, OrderRequest};
use crate::error::DeskError;

use super::error_response;

const DEFAULT_HISTORY_LIMIT: i64 = 100;

/// POST /api/orders
///
/// Validates the submitted fields, forwards the built request to the exchange
/// and records the outcome. Validation failures never reach the network and
/// come back as 422 with the offending field named.
pub async fn place_order(
    State(state): State<AppState>,
    Json(intent): Json<OrderIntent>,
) -> std::result::Result<Json<PlaceOrderResponse>, (StatusCode, Json<ApiErrorBody>)> {
    let request = OrderRequest::build(&intent)
        .map_err(|e| error_response(DeskError::Validation(e)))?;

    let gateway = state.gateway().await;
    match gateway.place_order(&request).await {
        Ok(ack) => {
            let raw = serde_json::to_string(&ack).ok();
            let record = OrderRecord::from_ack(&request, &ack, raw);
            if let Err(e) = state.store.insert_order(&record).await {
                // The order is live on the venue; failing to log it locally
                // must not turn the submission into an error.
                error!(error = %e, symbol = %request.symbol, "failed to record order");
            }

            Ok(Json(PlaceOrderResponse {
                order_id: ack.order_id,
                client_order_id: ack.client_order_id,
                symbol: ack.symbol,
                side: ack.side,
                order_type: ack.order_type,
                status: ack.status,
                orig_qty: ack.orig_qty,
                executed_qty: ack.executed_qty,
                avg_price: ack.avg_price,
                dry_run: gateway.is_dry_run(),
            }))
        }
        Err(e) => {
            let record = OrderRecord::from_rejection(&request, &e.to_string());
            if let Err(log_err) = state.store.insert_order(&record).await {
                warn!(error = %log_err, "failed to record rejected order");
            }
            Err(error_response(e))
        }
    }
}

/// GET /api/orders?limit=
pub async fn get_orders(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> std::result::Result<Json<OrdersListResponse>, (StatusCode, Json<ApiErrorBody>)> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_HISTORY_LIMIT);

    let orders = state
        .store
        .list_orders(limit)
        .await
        .map_err(error_response)?;

    let total = orders.len();
    Ok(Json(OrdersListResponse { orders, total }))
}
