use crate::connect::LocalAddr;
use crate::handlers;
use crate::service::AttendeeService;
use axum::{
    Router,
    routing::get,
};
use ers_core::env::EnvSource;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the HTTP handlers.
pub struct ApiState {
    pub attendees: AttendeeService,
    /// Where platform metadata is read from on every request.
    pub env: Arc<dyn EnvSource>,
    /// Unfiltered runtime version reported by `/app-env`.
    pub runtime_version: String,
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health::health_check))
        // Platform
        .route("/bluegreen-check", get(handlers::platform::bluegreen_check))
        .route("/app-env", get(handlers::platform::app_env))
        // Attendees
        .route(
            "/attendees",
            get(handlers::attendees::list_attendees)
                .post(handlers::attendees::add_attendee)
                .delete(handlers::attendees::delete_attendees),
        )
        .route("/attendees/search", get(handlers::attendees::search_attendees))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: Arc<ApiState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Starting HTTP server");

    axum::serve(listener, app.into_make_service_with_connect_info::<LocalAddr>())
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
