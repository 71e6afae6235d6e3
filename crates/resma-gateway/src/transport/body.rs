//! Request body decoding for the custom binary content-types.
//!
//! Two content-types are recognized; everything else falls through to the
//! standard JSON body path:
//! - `application/x-msgpack-zstd` — storage-grade envelope (`"RESM"` tag,
//!   zstd-framed MessagePack).
//! - `application/x-msgpack` — extension-origin framing: its own `"MSGP"`
//!   marker followed by plain MessagePack. This marker is an earlier
//!   generation than the storage tags and is handled as its own case, never
//!   conflated with them.
//!
//! Binary bodies cannot be parsed incrementally (both the zstd frame and the
//! codec frame are whole-buffer operations), so the body is buffered in full
//! before any decode runs. A truncated stream or a malformed buffer becomes a
//! 4xx response with a structured JSON error; a partially decoded body never
//! reaches a handler.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Map, Value};

use resma_core::error::{ResmaError, Result};
use resma_core::format::envelope::{self, TAG_COMPRESSED, TAG_LEN};

use crate::app_state::AppState;

/// Content-type for storage-grade compressed envelopes.
pub const CONTENT_TYPE_MSGPACK_ZSTD: &str = "application/x-msgpack-zstd";
/// Content-type for extension-origin plain MessagePack.
pub const CONTENT_TYPE_MSGPACK: &str = "application/x-msgpack";

/// Extension-generation marker: plain MessagePack follows.
pub const EXTENSION_TAG: [u8; 4] = *b"MSGP";

/// Classified request body format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// `application/x-msgpack-zstd`.
    CompressedEnvelope,
    /// `application/x-msgpack`.
    PlainEnvelope,
    /// Anything else; standard JSON body handling applies.
    PassThrough,
}

impl ContentFormat {
    /// Classify by exact content-type match. Parameterized values
    /// (`; charset=...`) do not match and fall through.
    pub fn classify(headers: &HeaderMap) -> Self {
        let Some(ct) = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        else {
            return Self::PassThrough;
        };
        match ct {
            CONTENT_TYPE_MSGPACK_ZSTD => Self::CompressedEnvelope,
            CONTENT_TYPE_MSGPACK => Self::PlainEnvelope,
            _ => Self::PassThrough,
        }
    }

    /// Metrics label.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentFormat::CompressedEnvelope => "zstd",
            ContentFormat::PlainEnvelope => "msgpack",
            ContentFormat::PassThrough => "json",
        }
    }
}

/// Decode a fully buffered custom-type body into a Logical Value.
///
/// A zero-length body and a bare 4-byte tag both decode to an empty mapping;
/// clients that flush empty payloads are not an error condition.
pub fn decode_body(buf: &[u8]) -> Result<Value> {
    if buf.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    if buf.len() < TAG_LEN {
        return Err(ResmaError::Format("body shorter than 4-byte marker".into()));
    }
    let (tag, payload) = buf.split_at(TAG_LEN);

    if tag == TAG_COMPRESSED.as_slice() {
        if payload.is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        return envelope::decode(buf);
    }
    if tag == EXTENSION_TAG.as_slice() {
        if payload.is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        return rmp_serde::from_slice(payload)
            .map_err(|e| ResmaError::Decode(format!("msgpack decode failed: {e}")));
    }
    Err(ResmaError::Format("missing magic bytes".into()))
}

/// Decoded request body, installed where the JSON-parsed body would go so
/// downstream handlers are format-agnostic.
#[derive(Debug)]
pub struct DecodedBody(pub Value);

/// Structured error response for body failures.
#[derive(Debug)]
pub struct BodyRejection(pub ResmaError);

impl From<ResmaError> for BodyRejection {
    fn from(e: ResmaError) -> Self {
        Self(e)
    }
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ResmaError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ResmaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        tracing::debug!(code = self.0.client_code().as_str(), error = %self.0, "rejected request body");
        (
            status,
            Json(json!({ "success": false, "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[async_trait]
impl FromRequest<AppState> for DecodedBody {
    type Rejection = BodyRejection;

    async fn from_request(
        req: Request,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let format = ContentFormat::classify(req.headers());
        let metrics = state.metrics();

        match format {
            ContentFormat::PassThrough => {
                let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|e| {
                    let err = ResmaError::Format(format!("invalid json body: {}", e.body_text()));
                    metrics.decode_errors.inc(&[("code", err.client_code().as_str())]);
                    BodyRejection(err)
                })?;
                metrics.decoded_bodies.inc(&[("format", format.as_str())]);
                Ok(DecodedBody(value))
            }
            ContentFormat::CompressedEnvelope | ContentFormat::PlainEnvelope => {
                // Stream failures (client disconnect, over-limit body) surface
                // here, before any decode work happens.
                let buf = Bytes::from_request(req, state).await.map_err(|e| {
                    let err = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        ResmaError::PayloadTooLarge
                    } else {
                        ResmaError::Format(format!("request stream error: {}", e.body_text()))
                    };
                    metrics.decode_errors.inc(&[("code", err.client_code().as_str())]);
                    BodyRejection(err)
                })?;
                metrics
                    .body_bytes_in
                    .add(&[("format", format.as_str())], buf.len() as u64);

                match decode_body(&buf) {
                    Ok(value) => {
                        metrics.decoded_bodies.inc(&[("format", format.as_str())]);
                        tracing::debug!(
                            format = format.as_str(),
                            bytes = buf.len(),
                            "decoded binary request body"
                        );
                        Ok(DecodedBody(value))
                    }
                    Err(e) => {
                        metrics.decode_errors.inc(&[("code", e.client_code().as_str())]);
                        Err(BodyRejection(e))
                    }
                }
            }
        }
    }
}
