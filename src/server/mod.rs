//! HTTP boundary for the portal
//!
//! Thin plumbing over the core modules: routing, the session cookie
//! middleware, and the JSON response envelope. The core never logs or
//! decides status codes; every error becomes an external representation
//! here.

pub mod handlers;
pub mod middleware;

use crate::config::Config;
use crate::session::{self, SessionStore};
use crate::wireguard::WireGuardManager;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state behind every handler.
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionStore>,
    pub wireguard: WireGuardManager,
}

/// Build the portal router.
///
/// Everything except `/login` and `/logout` sits behind the session
/// middleware and answers unauthenticated callers with a redirect to
/// `/login` rather than an error status.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/", get(handlers::index))
        .route("/api/connections", get(handlers::connections))
        .route("/api/connections/toggle", post(handlers::toggle))
        .route("/api/status", get(handlers::status))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    Router::new()
        .merge(protected)
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login),
        )
        .route("/logout", post(handlers::logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the portal until the process is terminated.
pub async fn serve(config: Config) -> Result<(), ServerError> {
    let sessions = Arc::new(SessionStore::new());
    sessions.clone().spawn_sweeper(session::SWEEP_INTERVAL);

    let wireguard = WireGuardManager::new(config.wireguard.config_dir.clone());
    let addr = config.address();
    let state = Arc::new(AppState {
        config,
        sessions,
        wireguard,
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
