//! Axum router wiring for operational endpoints.
//!
//! Currently exposes `/healthz`, backed by the allowlist store's liveness
//! probe. The relay protocol itself is served by the host framework.

use axum::{extract::State, http::StatusCode, routing::get, Router};

use crate::app_state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz(State(app): State<AppState>) -> (StatusCode, String) {
    match app.authority().health_check().await {
        Ok(()) => (StatusCode::OK, "ok".into()),
        Err(e) => {
            tracing::warn!(error = %e, "allowlist store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, e.code().as_str().to_string())
        }
    }
}
