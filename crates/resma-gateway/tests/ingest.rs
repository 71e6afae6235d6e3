//! End-to-end tests for the body-decoding transport.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use resma_core::format::envelope;
use resma_gateway::transport::body::{
    decode_body, ContentFormat, CONTENT_TYPE_MSGPACK, CONTENT_TYPE_MSGPACK_ZSTD,
};
use resma_gateway::{app_state::AppState, config, router};

fn test_router() -> Router {
    let cfg = config::load_from_str("version: 1\n").unwrap();
    router::build_router(AppState::new(cfg))
}

async fn post(uri: &str, content_type: Option<&str>, body: Vec<u8>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let req = builder.body(Body::from(body)).unwrap();

    let res = test_router().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

// --------------------
// Classification
// --------------------

fn headers_with_ct(ct: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
    h
}

#[test]
fn classification_is_exact_match() {
    assert_eq!(
        ContentFormat::classify(&headers_with_ct(CONTENT_TYPE_MSGPACK_ZSTD)),
        ContentFormat::CompressedEnvelope
    );
    assert_eq!(
        ContentFormat::classify(&headers_with_ct(CONTENT_TYPE_MSGPACK)),
        ContentFormat::PlainEnvelope
    );
    assert_eq!(
        ContentFormat::classify(&headers_with_ct("application/json")),
        ContentFormat::PassThrough
    );
    // parameterized content types fall through
    assert_eq!(
        ContentFormat::classify(&headers_with_ct("application/x-msgpack; charset=utf-8")),
        ContentFormat::PassThrough
    );
    assert_eq!(
        ContentFormat::classify(&HeaderMap::new()),
        ContentFormat::PassThrough
    );
}

// --------------------
// decode_body unit coverage
// --------------------

#[test]
fn bare_tags_and_empty_bodies_decode_to_empty_mapping() {
    assert_eq!(decode_body(b"").unwrap(), json!({}));
    assert_eq!(decode_body(b"RESM").unwrap(), json!({}));
    assert_eq!(decode_body(b"MSGP").unwrap(), json!({}));
}

#[test]
fn extension_marker_wraps_plain_msgpack() {
    let payload = rmp_serde::to_vec_named(&json!({"a": 1})).unwrap();
    let mut buf = b"MSGP".to_vec();
    buf.extend_from_slice(&payload);
    assert_eq!(decode_body(&buf).unwrap(), json!({"a": 1}));
}

#[test]
fn unknown_marker_is_format_error() {
    let e = decode_body(&[0x13, 0x37, 0x00, 0xff]).unwrap_err();
    assert_eq!(e.client_code().as_str(), "FORMAT_ERROR");
}

// --------------------
// HTTP round trips
// --------------------

#[tokio::test]
async fn compressed_envelope_round_trips_through_echo() {
    let v = json!({
        "likes": 1200,
        "comments": 45,
        "analytics": { "duration": 60, "interaction": { "liked": true } }
    });
    let encoded = envelope::encode(&v, true).unwrap();

    let (status, body) = post(
        "/v1/echo",
        Some(CONTENT_TYPE_MSGPACK_ZSTD),
        encoded.buf.to_vec(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, v);
}

#[tokio::test]
async fn extension_msgpack_round_trips_through_echo() {
    let payload = rmp_serde::to_vec_named(&json!({"session": {"duration": 60}})).unwrap();
    let mut buf = b"MSGP".to_vec();
    buf.extend_from_slice(&payload);

    let (status, body) = post("/v1/echo", Some(CONTENT_TYPE_MSGPACK), buf).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"session": {"duration": 60}}));
}

#[tokio::test]
async fn bare_compressed_tag_yields_empty_object() {
    let (status, body) = post("/v1/echo", Some(CONTENT_TYPE_MSGPACK_ZSTD), b"RESM".to_vec()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn zero_length_body_yields_empty_object() {
    for ct in [CONTENT_TYPE_MSGPACK_ZSTD, CONTENT_TYPE_MSGPACK] {
        let (status, body) = post("/v1/echo", Some(ct), Vec::new()).await;
        assert_eq!(status, StatusCode::OK, "ct={ct}");
        assert_eq!(body, json!({}), "ct={ct}");
    }
}

#[tokio::test]
async fn bad_magic_bytes_are_rejected_with_400() {
    let (status, body) = post(
        "/v1/echo",
        Some(CONTENT_TYPE_MSGPACK_ZSTD),
        vec![0x13, 0x37, 0x00, 0xff],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("magic"));
}

#[tokio::test]
async fn corrupt_compressed_payload_is_rejected_with_400() {
    let mut buf = b"RESM".to_vec();
    buf.extend_from_slice(b"\xde\xad\xbe\xef");

    let (status, body) = post("/v1/echo", Some(CONTENT_TYPE_MSGPACK_ZSTD), buf).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn json_passes_through_untouched() {
    let (status, body) = post(
        "/v1/echo",
        Some("application/json"),
        br#"{"a": 1}"#.to_vec(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"a": 1}));
}

#[tokio::test]
async fn missing_content_type_with_junk_body_is_400() {
    let (status, body) = post("/v1/echo", None, vec![0x01, 0x02]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn snapshots_reports_field_count() {
    let v = json!({"likes": 1, "comments": 2, "shares": 3});
    let encoded = envelope::encode(&v, true).unwrap();

    let (status, body) = post(
        "/v1/snapshots",
        Some(CONTENT_TYPE_MSGPACK_ZSTD),
        encoded.buf.to_vec(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "fields": 3}));
}

#[tokio::test]
async fn oversized_body_is_rejected_without_decoding() {
    let cfg = config::load_from_str("version: 1\ngateway:\n  max_body_bytes: 1024\n").unwrap();
    let app = router::build_router(AppState::new(cfg));

    let mut buf = b"RESM".to_vec();
    buf.extend_from_slice(&vec![0u8; 4096]);
    let req = Request::builder()
        .method("POST")
        .uri("/v1/echo")
        .header(header::CONTENT_TYPE, CONTENT_TYPE_MSGPACK_ZSTD)
        .body(Body::from(buf))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn health_and_metrics_respond() {
    let app = test_router();

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("resma_draining 0"));
}
