//! HTTP services behind the body-decoding transport.

pub mod ingest;
