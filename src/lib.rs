pub mod api;
pub mod auth;
pub mod cli;
pub mod jwt;
pub mod secret;
pub mod session;

use api::{create_api_router, not_found};
use auth::SessionGuard;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Base path for the application (e.g., "/app")
    pub base: Option<String>,
    /// Session verification and renewal
    pub guard: SessionGuard,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let api_router = create_api_router(config.guard.clone());

    let base_path = config.base.as_deref().unwrap_or("").trim_end_matches('/');
    let api_path = format!("{}/api", base_path);

    Router::new()
        .nest(&api_path, api_router)
        .fallback(not_found)
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app.into_make_service()).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> Result<(tokio::task::JoinHandle<()>, SocketAddr), std::io::Error> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
