//! RESMA core: storage envelope framing, stored-value sniffing, and legacy
//! migration helpers shared by the gateway and batch tooling.
//!
//! This crate defines the persisted wire format and the error surface around
//! it. It intentionally carries no transport or runtime dependencies so it
//! can be reused by the HTTP gateway, migration jobs, and offline tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `ResmaError`/`Result` so attacker-
//! supplied bytes can never crash a consuming process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod format;
pub mod migrate;

/// Shared result type.
pub use error::{ResmaError, Result};
