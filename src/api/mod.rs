pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

pub use routes::create_router;
pub use state::AppState;

use tracing::info;

use crate::error::Result;

/// Bind and run the web API until the task is cancelled.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = create_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "web API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
