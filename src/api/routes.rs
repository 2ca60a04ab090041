use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Order endpoints
        .route("/api/orders", post(handlers::place_order))
        .route("/api/orders", get(handlers::get_orders))
        // Settings endpoints
        .route("/api/settings", get(handlers::get_settings))
        .route("/api/settings", put(handlers::update_settings))
        // System endpoints
        .route("/api/system/status", get(handlers::get_system_status))
        // Add state and CORS
        .with_state(state)
        .layer(cors)
}
