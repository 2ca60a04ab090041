use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::api::{state::AppState, types::*};
use crate::exchange::{Credentials, API_KEY_SETTING, API_SECRET_SETTING};

use super::error_response;

/// GET /api/settings
///
/// The stored secret is reduced to a presence flag; it never leaves the store.
pub async fn get_settings(
    State(state): State<AppState>,
) -> std::result::Result<Json<SettingsResponse>, (StatusCode, Json<ApiErrorBody>)> {
    let api_key = state
        .store
        .get_setting(API_KEY_SETTING)
        .await
        .map_err(error_response)?
        .unwrap_or_default();

    let has_secret = state
        .store
        .get_setting(API_SECRET_SETTING)
        .await
        .map_err(error_response)?
        .is_some_and(|s| !s.is_empty());

    Ok(Json(SettingsResponse {
        api_key,
        has_secret,
    }))
}

/// PUT /api/settings
///
/// Stores the credentials and swaps in a freshly built gateway. Requests
/// already in flight finish on the gateway they started with.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<UpdateSettingsRequest>,
) -> std::result::Result<StatusCode, (StatusCode, Json<ApiErrorBody>)> {
    if update.api_key.trim().is_empty() || update.api_secret.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiErrorBody::message("api_key and api_secret are required")),
        ));
    }

    state
        .store
        .save_setting(API_KEY_SETTING, update.api_key.trim())
        .await
        .map_err(error_response)?;
    state
        .store
        .save_setting(API_SECRET_SETTING, update.api_secret.trim())
        .await
        .map_err(error_response)?;

    state
        .reconfigure_gateway(Credentials {
            api_key: update.api_key.trim().to_string(),
            api_secret: update.api_secret.trim().to_string(),
        })
        .await
        .map_err(error_response)?;

    info!("API credentials updated, gateway rebuilt");
    Ok(StatusCode::NO_CONTENT)
}
