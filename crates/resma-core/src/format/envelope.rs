//! Storage envelope framing (panic-free).
//!
//! Wire format:
//! - bytes 0..4 : ASCII magic, `"RESM"` (zstd-compressed) or `"MSGP"` (plain)
//! - bytes 4..  : MessagePack payload, zstd-framed under `"RESM"`
//!
//! An envelope is immutable once produced and carries no identity beyond its
//! byte content; it exists only while a value crosses a boundary (HTTP body,
//! database column) and is discarded the moment it is decoded.

use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ResmaError, Result};

/// Length of the magic tag prefix.
pub const TAG_LEN: usize = 4;

/// Magic tag: payload is zstd-compressed MessagePack.
pub const TAG_COMPRESSED: [u8; 4] = *b"RESM";

/// Magic tag: payload is plain MessagePack.
pub const TAG_PLAIN: [u8; 4] = *b"MSGP";

/// Pinned zstd level (1-22 scale). Kept low: storage writes sit on the
/// request path, so throughput wins over ratio.
pub const ZSTD_LEVEL: i32 = 3;

/// Size accounting for one encode call. Logged, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct EncodeStats {
    /// MessagePack size before framing/compression.
    pub codec_bytes: usize,
    /// Final envelope size including the tag.
    pub envelope_bytes: usize,
}

impl EncodeStats {
    /// Envelope-to-codec size ratio; below 1.0 means compression paid off.
    pub fn ratio(&self) -> f64 {
        if self.codec_bytes == 0 {
            return 1.0;
        }
        self.envelope_bytes as f64 / self.codec_bytes as f64
    }
}

/// Envelope bytes plus their size accounting.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub buf: Bytes,
    pub stats: EncodeStats,
}

/// Frame a value as an envelope.
///
/// `compress` selects the storage-grade `"RESM"` variant; `false` produces a
/// plain `"MSGP"` envelope. The output always starts with exactly one of the
/// two tags and is at least [`TAG_LEN`] bytes long.
pub fn encode<T: Serialize>(value: &T, compress: bool) -> Result<Encoded> {
    // to_vec_named keeps struct fields as map keys, matching what dynamic
    // JS-side encoders put on the wire.
    let codec = rmp_serde::to_vec_named(value)
        .map_err(|e| ResmaError::Encode(format!("msgpack encode failed: {e}")))?;
    let codec_bytes = codec.len();

    let (tag, payload) = if compress {
        let compressed = zstd::encode_all(codec.as_slice(), ZSTD_LEVEL)
            .map_err(|e| ResmaError::Encode(format!("zstd compress failed: {e}")))?;
        (TAG_COMPRESSED, compressed)
    } else {
        (TAG_PLAIN, codec)
    };

    let mut buf = BytesMut::with_capacity(TAG_LEN + payload.len());
    buf.put_slice(&tag);
    buf.put_slice(&payload);
    let buf = buf.freeze();

    let stats = EncodeStats {
        codec_bytes,
        envelope_bytes: buf.len(),
    };
    tracing::trace!(
        codec_bytes,
        envelope_bytes = stats.envelope_bytes,
        compress,
        "encoded envelope"
    );
    Ok(Encoded { buf, stats })
}

/// Unframe an envelope back into a value.
///
/// Decoding never substitutes defaults: a short buffer or unknown tag is a
/// `Format` error, a corrupt payload under a recognized tag is a `Decode`
/// error, both surfaced to the caller.
pub fn decode<T: DeserializeOwned>(buf: &[u8]) -> Result<T> {
    if buf.len() < TAG_LEN {
        return Err(ResmaError::Format(
            "envelope shorter than 4-byte tag".into(),
        ));
    }
    let (tag, payload) = buf.split_at(TAG_LEN);

    if tag == TAG_COMPRESSED.as_slice() {
        let codec = zstd::decode_all(payload)
            .map_err(|e| ResmaError::Decode(format!("zstd decompress failed: {e}")))?;
        rmp_serde::from_slice(&codec)
            .map_err(|e| ResmaError::Decode(format!("msgpack decode failed: {e}")))
    } else if tag == TAG_PLAIN.as_slice() {
        rmp_serde::from_slice(payload)
            .map_err(|e| ResmaError::Decode(format!("msgpack decode failed: {e}")))
    } else {
        Err(ResmaError::Format("unrecognized envelope tag".into()))
    }
}

/// True iff the buffer starts with a registered storage tag.
pub fn has_envelope_tag(buf: &[u8]) -> bool {
    if buf.len() < TAG_LEN {
        return false;
    }
    buf[..TAG_LEN] == TAG_COMPRESSED || buf[..TAG_LEN] == TAG_PLAIN
}
