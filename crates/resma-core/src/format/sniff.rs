//! Stored-value sniffing.
//!
//! Column values reach us in three provenances: the store may have JSON-
//! decoded the column itself, legacy rows hold JSON text, and migrated rows
//! hold envelope bytes. The oldest rows hold raw JSON bytes with no header
//! at all, so the decision order is load-bearing: the self-describing
//! envelope tag must be checked before the JSON-bytes fallback.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ResmaError, Result};
use crate::format::envelope;

/// One persisted column value of unknown generation.
#[derive(Debug, Clone)]
pub enum Stored {
    /// The store already JSON-decoded the column.
    Parsed(Value),
    /// Legacy JSON text. Pre-migration rows only; never written anymore.
    Text(String),
    /// Raw byte column: envelope bytes, or oldest-generation JSON bytes.
    Raw(Vec<u8>),
}

/// Decode a stored value regardless of generation.
///
/// Decision order for `Raw` bytes: a registered envelope tag wins; anything
/// else is attempted as UTF-8 JSON text; if that fails too the buffer is
/// malformed and the row is rejected with a `Format` error.
pub fn deserialize<T: DeserializeOwned>(stored: Stored) -> Result<T> {
    match stored {
        Stored::Parsed(value) => serde_json::from_value(value)
            .map_err(|e| ResmaError::Decode(format!("parsed value shape mismatch: {e}"))),
        Stored::Text(text) => serde_json::from_str(&text)
            .map_err(|e| ResmaError::Format(format!("legacy json parse failed: {e}"))),
        Stored::Raw(buf) => {
            if envelope::has_envelope_tag(&buf) {
                return envelope::decode(&buf);
            }
            serde_json::from_slice(&buf).map_err(|_| {
                ResmaError::Format("buffer is neither an envelope nor legacy json".into())
            })
        }
    }
}
