//! ASN admission guard (pre-handler).
//!
//! Takes the peer socket address of the connection, asks the matcher, and
//! answers 403 without running the inner handler on deny. A request without
//! connection info formats as an empty address and is denied like any other
//! unparseable client.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

fn peer_address(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default()
}

pub async fn admit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let peer = peer_address(&req);
    let verdict = state.check(&peer);

    if verdict.is_admit() {
        return next.run(req).await;
    }

    tracing::debug!(peer = %peer, reason = verdict.reason(), "request rejected");
    (StatusCode::FORBIDDEN, "forbidden").into_response()
}
