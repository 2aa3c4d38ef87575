// ABOUTME: HTTP server for prdforge, exposing reports, analysis, PRD generation and workflows as JSON.
// ABOUTME: Uses Axum with a shared orchestrator; every response carries a status and generation time.

pub mod api;
pub mod app_state;
pub mod error;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use error::ApiError;
pub use routes::create_router;

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(
    state: SharedState,
    addr: std::net::SocketAddr,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "prdforge API listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
