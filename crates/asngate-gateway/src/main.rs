//! asnGate gateway
//!
//! - Config: `asngate-gateway [CONFIG]` (YAML or directive block, default `asngate.yaml`)
//! - Every non-ops request is admitted or rejected (403) by client ASN organization
//! - Graceful shutdown on Ctrl-C, then the ASN database is closed

use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use asngate_core::AsnGateError;
use asngate_gateway::{app_state::AppState, config, router};

const CLEANUP_GRACE: Duration = Duration::from_secs(5);

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed; shutting down");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "asngate.yaml".to_string());

    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.gateway.listen.parse().map_err(|e| {
        AsnGateError::BadConfig(format!("gateway.listen must be a valid SocketAddr: {e}"))
    })?;

    let state = AppState::provision(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "asngate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Err(e) = state.cleanup(CLEANUP_GRACE).await {
        tracing::error!(error = %e, "cleanup failed");
        return Err(e.into());
    }
    tracing::info!("asngate-gateway stopped");
    Ok(())
}
