use axum::{extract::State, http::StatusCode, Json};

use crate::api::{state::AppState, types::*};

/// GET /api/system/status
pub async fn get_system_status(
    State(state): State<AppState>,
) -> std::result::Result<Json<SystemStatus>, (StatusCode, Json<SystemStatus>)> {
    let db = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.store.pool())
        .await
    {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    let gateway = state.gateway().await;
    let ok = db == "connected";
    let status = SystemStatus {
        status: if ok { "ok" } else { "degraded" }.to_string(),
        venue: gateway.venue().to_string(),
        dry_run: gateway.is_dry_run(),
        testnet: state.exchange_config.is_testnet(),
        db,
        uptime_secs: state.uptime_seconds(),
    };

    if ok {
        Ok(Json(status))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(status)))
    }
}
