//! HTTP layer.
//!
//! An axum router exposing the transition engines, discovery helpers and the
//! settings store as a JSON API. Catalog-backed routes answer 401 when the
//! server started without an authenticated catalog client.

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::make_app;
pub use state::AppState;

use tokio::net::TcpListener;

/// Serve the API until Ctrl+C is received.
pub async fn run_server(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, make_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
