//! RESMA gateway library entry.
//!
//! Wires config, the body-decoding transport layer, ingest services, and ops
//! endpoints into the HTTP stack. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
pub mod transport;
