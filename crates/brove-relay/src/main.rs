//! brove relay core process.
//!
//! - Strict YAML config (`brove.yaml`, path overridable by `BROVE_CONFIG`)
//!   with environment overrides for the owner and database
//! - Allowlist store connect + schema init
//! - `/healthz` for operational tooling

use std::net::SocketAddr;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use brove_core::error::{BroveError, Result};
use brove_relay::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "brove-relay failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let path = std::env::var("BROVE_CONFIG").unwrap_or_else(|_| "brove.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .relay
        .listen
        .parse()
        .map_err(|e| BroveError::BadRequest(format!("relay.listen must be a valid SocketAddr: {e}")))?;

    let state = app_state::AppState::new(cfg).await?;
    tracing::info!(
        name = %state.cfg().relay.name,
        owner = %state.authority().owner(),
        "allowlist policy engine ready"
    );
    let app = router::build_router(state);

    tracing::info!(%listen, "brove-relay starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| BroveError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| BroveError::Internal(format!("server failed: {e}")))
}
