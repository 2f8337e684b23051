//! Error taxonomy for envelope encoding and decoding.

use std::collections::TryReserveError;

use crate::cipher::Field;
use crate::text::TextCodecError;

/// Top-level error returned by every fallible envelope operation.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
    #[error("failed to encode cipher: {0}")]
    Encoding(#[from] EncodingError),
    #[error("failed to decode cipher: {0}")]
    Decoding(#[from] DecodingError),
}

impl CipherError {
    /// Whether this error came from malformed or untrusted input text.
    ///
    /// Decoding failures are the routine case when processing data from the
    /// network; the other variants point at resource exhaustion or a bug in
    /// whoever built the envelope.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::Decoding(_))
    }
}

/// Errors while serializing a populated envelope.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("{field} is {len} bytes, larger than a u32 length prefix can describe")]
    FieldTooLarge { field: Field, len: usize },
    #[error("encoded envelope would be {len} characters (maximum {max})")]
    TooLarge { len: usize, max: usize },
    #[error("text length of a {frame_len}-byte frame overflows usize")]
    LengthOverflow { frame_len: usize },
}

/// Errors while parsing envelope text.
#[derive(Debug, thiserror::Error)]
pub enum DecodingError {
    #[error("envelope text is empty")]
    Empty,
    #[error("envelope text is {len} characters (maximum {max})")]
    TooLarge { len: usize, max: usize },
    #[error(transparent)]
    Text(#[from] TextCodecError),
    #[error("missing envelope magic")]
    BadMagic,
    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),
    #[error("envelope truncated inside {field}")]
    Truncated { field: Field },
    #[error("{0} unexpected bytes after the tag field")]
    TrailingBytes(usize),
}
