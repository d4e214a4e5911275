//! Axum router wiring.
//!
//! Ops endpoints (`/healthz`, `/metrics`) bypass the admission guard; every
//! other path is gated and then served by a stand-in downstream handler.

use axum::{
    middleware,
    routing::{any, get},
    Router,
};

use crate::{app_state::AppState, ops, transport};

async fn admitted() -> &'static str {
    "admitted"
}

pub fn build_router(state: AppState) -> Router {
    let gated: Router<AppState> = Router::new()
        .route("/", any(admitted))
        .route("/*path", any(admitted))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            transport::admission::admit,
        ));

    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .merge(gated)
        .with_state(state)
}
