//! Axum router wiring.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::{app_state::AppState, ops, services};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.cfg().gateway.max_body_bytes;
    Router::new()
        .route("/v1/snapshots", post(services::ingest::submit_snapshot))
        .route("/v1/echo", post(services::ingest::echo))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
