//! Byte-level codec applied to records at rest
//!
//! Every record passes through the journal's codec on its way to and
//! from disk. [`PlainCodec`] stores bytes unchanged; the trait is the
//! seam for encrypting or compressing persisted artifacts without
//! touching journal logic.

/// Record codec trait.
///
/// Codecs must be `Send + Sync`: appends happen from request threads
/// and the snapshot scheduler concurrently.
pub trait RecordCodec: Send + Sync {
    /// Encode serialized record bytes for storage.
    fn encode(&self, data: &[u8]) -> Vec<u8>;

    /// Decode stored bytes back to serialized record bytes.
    ///
    /// Returns an error if the data cannot be decoded (wrong codec,
    /// corruption).
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Unique codec identifier, for diagnostics.
    fn codec_id(&self) -> &str;
}

/// Pass-through codec: bytes are stored exactly as serialized. The
/// default.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl RecordCodec for PlainCodec {
    fn encode(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }

    fn codec_id(&self) -> &str {
        "plain"
    }
}

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Decoding failed.
    ///
    /// Carries the codec identity and data length so callers can tell a
    /// wrong-codec error from corruption.
    #[error("decode error (codec={codec_id}, data_len={data_len}): {detail}")]
    Decode {
        /// Human-readable failure detail.
        detail: String,
        /// Codec that attempted the decode.
        codec_id: String,
        /// Length of the data that failed to decode.
        data_len: usize,
    },
}

impl CodecError {
    /// Create a decode error with full diagnostic context.
    pub fn decode(detail: impl Into<String>, codec_id: impl Into<String>, data_len: usize) -> Self {
        CodecError::Decode {
            detail: detail.into(),
            codec_id: codec_id.into(),
            data_len,
        }
    }
}
