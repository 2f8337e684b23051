//! Text-safe transform applied to the binary envelope frame.
//!
//! The envelope logic only needs "bytes in, printable text out" and the
//! inverse, so the transform is a trait. [`Base64Codec`] covers the two
//! alphabets we ship: standard base64 with `=` padding (the default wire
//! form) and unpadded base64url for URLs and file names.

use base64::engine::general_purpose::{GeneralPurpose, STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Error returned when text is not valid for the codec's alphabet.
#[derive(Debug, thiserror::Error)]
#[error("invalid {codec} text: {source}")]
pub struct TextCodecError {
    codec: &'static str,
    source: base64::DecodeError,
}

impl TextCodecError {
    /// Name of the codec that rejected the input.
    #[must_use]
    pub const fn codec(&self) -> &'static str {
        self.codec
    }
}

/// A reversible binary-to-text transform.
pub trait TextCodec: Send + Sync {
    /// Short identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Exact text length for `len` input bytes, or `None` on overflow.
    fn encoded_len(&self, len: usize) -> Option<usize>;

    /// Upper bound on decoded bytes for `text_len` characters.
    fn decoded_len_estimate(&self, text_len: usize) -> usize;

    /// Append the encoding of `bytes` to `out`.
    fn encode_into(&self, bytes: &[u8], out: &mut String);

    /// Append the decoding of `text` to `out`.
    ///
    /// # Errors
    /// Returns `TextCodecError` if `text` contains symbols outside the
    /// alphabet, has an impossible length, or carries non-canonical padding.
    fn decode_into(&self, text: &str, out: &mut Vec<u8>) -> Result<(), TextCodecError>;
}

/// Which base64 alphabet and padding rule to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Base64Variant {
    /// RFC 4648 section 4 alphabet, `=` padding required.
    #[default]
    Standard,
    /// RFC 4648 section 5 alphabet (`-` and `_`), no padding.
    UrlSafe,
}

/// [`TextCodec`] backed by the `base64` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64Codec {
    variant: Base64Variant,
}

impl Base64Codec {
    #[must_use]
    pub const fn new(variant: Base64Variant) -> Self {
        Self { variant }
    }

    #[must_use]
    pub const fn standard() -> Self {
        Self::new(Base64Variant::Standard)
    }

    #[must_use]
    pub const fn url_safe() -> Self {
        Self::new(Base64Variant::UrlSafe)
    }

    #[must_use]
    pub const fn variant(&self) -> Base64Variant {
        self.variant
    }

    const fn engine(&self) -> &'static GeneralPurpose {
        match self.variant {
            Base64Variant::Standard => &STANDARD,
            Base64Variant::UrlSafe => &URL_SAFE_NO_PAD,
        }
    }

    const fn padded(&self) -> bool {
        matches!(self.variant, Base64Variant::Standard)
    }
}

impl TextCodec for Base64Codec {
    fn name(&self) -> &'static str {
        match self.variant {
            Base64Variant::Standard => "base64",
            Base64Variant::UrlSafe => "base64url",
        }
    }

    fn encoded_len(&self, len: usize) -> Option<usize> {
        base64::encoded_len(len, self.padded())
    }

    fn decoded_len_estimate(&self, text_len: usize) -> usize {
        text_len.div_ceil(4).saturating_mul(3)
    }

    fn encode_into(&self, bytes: &[u8], out: &mut String) {
        self.engine().encode_string(bytes, out);
    }

    fn decode_into(&self, text: &str, out: &mut Vec<u8>) -> Result<(), TextCodecError> {
        self.engine()
            .decode_vec(text, out)
            .map_err(|source| TextCodecError {
                codec: self.name(),
                source,
            })
    }
}
