//! Ingest handlers.
//!
//! By the time these run, the transport layer has already buffered and
//! decoded the body; handlers see a plain Logical Value regardless of
//! whether the client sent JSON, plain MessagePack, or a compressed
//! envelope.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::transport::body::DecodedBody;

/// Accept one analytics payload (session metadata, engagement metrics).
pub async fn submit_snapshot(
    State(state): State<AppState>,
    DecodedBody(value): DecodedBody,
) -> Json<Value> {
    let fields = value.as_object().map(|m| m.len()).unwrap_or(0);
    state.metrics().snapshots.inc(&[]);
    tracing::info!(fields, "snapshot accepted");
    Json(json!({ "success": true, "fields": fields }))
}

/// Echo the decoded body back as JSON. Debug surface for client teams
/// verifying their encoders against the gateway.
pub async fn echo(DecodedBody(value): DecodedBody) -> Json<Value> {
    Json(value)
}
