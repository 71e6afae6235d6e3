//! Legacy-row migration helpers.
//!
//! Historical rows hold JSON (text or raw bytes); current rows hold
//! compressed envelopes. These helpers upgrade one row at a time and keep
//! running totals for the batch. A corrupt row is counted as failed and
//! skipped; a batch never aborts on a single bad record.

use bytes::Bytes;
use serde::Serialize;

use crate::error::Result;
use crate::format::envelope::{self, Encoded};
use crate::format::sniff::{self, Stored};

/// Convert an already-parsed legacy value into a storage-grade compressed
/// envelope buffer, ready to be written back to the column.
pub fn upgrade_legacy<T: Serialize>(value: &T) -> Result<Bytes> {
    Ok(envelope::encode(value, true)?.buf)
}

/// Re-encode a stored value of any generation as a compressed envelope.
pub fn upgrade_row(stored: Stored) -> Result<Encoded> {
    let value: serde_json::Value = sniff::deserialize(stored)?;
    envelope::encode(&value, true)
}

/// Running totals for one migration batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationReport {
    pub processed: u64,
    pub failed: u64,
    pub codec_bytes: u64,
    pub envelope_bytes: u64,
}

impl MigrationReport {
    /// Fold one row result into the totals.
    pub fn observe(&mut self, res: &Result<Encoded>) {
        match res {
            Ok(encoded) => {
                self.processed += 1;
                self.codec_bytes += encoded.stats.codec_bytes as u64;
                self.envelope_bytes += encoded.stats.envelope_bytes as u64;
            }
            Err(e) => {
                self.failed += 1;
                tracing::warn!(error = %e, "row migration failed, skipping");
            }
        }
    }

    /// Percentage saved across the batch relative to the raw codec size.
    pub fn savings_percent(&self) -> f64 {
        if self.codec_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.envelope_bytes as f64 / self.codec_bytes as f64) * 100.0
    }
}
