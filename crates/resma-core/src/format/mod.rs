//! Wire formats for persisted analytics payloads.
//!
//! - Envelope: 4-byte magic tag plus MessagePack payload, zstd-framed for
//!   storage-grade writes.
//! - Sniffer: routes stored column values of mixed generations (parsed JSON,
//!   legacy JSON text, envelope bytes) to the matching decode path.
//!
//! All parsers are panic-free: malformed input is reported as `ResmaError`
//! instead of panicking or indexing raw buffers, keeping ingest and
//! migration resilient to hostile or corrupt bytes.

pub mod envelope;
pub mod sniff;
