//! Envelope codec: binary frame plus text transform plus size limits.

use crate::cipher::Cipher;
use crate::error::{CipherError, DecodingError, EncodingError};
use crate::frame;
use crate::text::{Base64Codec, Base64Variant, TextCodec};

/// Default cap on envelope text length (1 MiB).
pub const DEFAULT_MAX_ENCODED_LEN: usize = 1024 * 1024;
/// Ceiling for any configured cap (64 MiB).
pub const HARD_MAX_ENCODED_LEN: usize = 64 * 1024 * 1024;

/// Encodes and decodes [`Cipher`] values with a chosen [`TextCodec`].
///
/// Decoding checks the text length against `max_encoded_len` before
/// allocating anything, so hostile input cannot force large allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherCodec<C = Base64Codec> {
    text: C,
    max_encoded_len: usize,
}

impl CipherCodec<Base64Codec> {
    #[must_use]
    pub const fn base64(variant: Base64Variant) -> Self {
        Self {
            text: Base64Codec::new(variant),
            max_encoded_len: DEFAULT_MAX_ENCODED_LEN,
        }
    }
}

impl Default for CipherCodec<Base64Codec> {
    fn default() -> Self {
        Self::base64(Base64Variant::Standard)
    }
}

impl<C: TextCodec> CipherCodec<C> {
    pub const fn new(text: C) -> Self {
        Self {
            text,
            max_encoded_len: DEFAULT_MAX_ENCODED_LEN,
        }
    }

    /// Replace the text length cap. Values above [`HARD_MAX_ENCODED_LEN`]
    /// are clamped to it.
    #[must_use]
    pub fn with_max_encoded_len(mut self, max: usize) -> Self {
        self.max_encoded_len = max.min(HARD_MAX_ENCODED_LEN);
        self
    }

    pub const fn text_codec(&self) -> &C {
        &self.text
    }

    pub const fn max_encoded_len(&self) -> usize {
        self.max_encoded_len
    }

    /// Exact length of `encode(cipher)`, or `None` if it cannot be encoded.
    pub fn encoded_len(&self, cipher: &Cipher) -> Option<usize> {
        frame::frame_len(cipher)
            .ok()
            .and_then(|len| self.text.encoded_len(len))
    }

    /// Serialize `cipher` into envelope text.
    ///
    /// # Errors
    /// - `CipherError::Encoding` if a field does not fit a u32 length prefix
    ///   or the text would exceed `max_encoded_len`.
    /// - `CipherError::Allocation` if the output buffers cannot be reserved.
    pub fn encode(&self, cipher: &Cipher) -> Result<String, CipherError> {
        let frame_len = frame::frame_len(cipher)?;
        let text_len = self
            .text
            .encoded_len(frame_len)
            .ok_or(EncodingError::LengthOverflow { frame_len })?;
        if text_len > self.max_encoded_len {
            return Err(EncodingError::TooLarge {
                len: text_len,
                max: self.max_encoded_len,
            }
            .into());
        }

        let mut framed = Vec::new();
        framed.try_reserve_exact(frame_len)?;
        frame::write(cipher, &mut framed)?;

        let mut text = String::new();
        text.try_reserve_exact(text_len)?;
        self.text.encode_into(&framed, &mut text);

        tracing::trace!(
            codec = self.text.name(),
            ciphertext_len = cipher.ciphertext().len(),
            sender = %cipher.sender_fingerprint(),
            encoded_len = text.len(),
            "encoded cipher envelope"
        );
        Ok(text)
    }

    /// Parse envelope text into a new [`Cipher`].
    ///
    /// # Errors
    /// - `CipherError::Decoding` for empty, oversized, non-alphabet,
    ///   truncated or otherwise malformed input.
    /// - `CipherError::Allocation` if buffers cannot be reserved.
    pub fn decode(&self, text: &str) -> Result<Cipher, CipherError> {
        let result = self.decode_unlogged(text);
        match &result {
            Ok(cipher) => tracing::trace!(
                codec = self.text.name(),
                ciphertext_len = cipher.ciphertext().len(),
                sender = %cipher.sender_fingerprint(),
                "decoded cipher envelope"
            ),
            Err(err) => tracing::debug!(
                codec = self.text.name(),
                input_len = text.len(),
                error = %err,
                "rejected cipher envelope"
            ),
        }
        result
    }

    fn decode_unlogged(&self, text: &str) -> Result<Cipher, CipherError> {
        if text.is_empty() {
            return Err(DecodingError::Empty.into());
        }
        if text.len() > self.max_encoded_len {
            return Err(DecodingError::TooLarge {
                len: text.len(),
                max: self.max_encoded_len,
            }
            .into());
        }

        let mut framed = Vec::new();
        framed.try_reserve_exact(self.text.decoded_len_estimate(text.len()))?;
        self.text
            .decode_into(text, &mut framed)
            .map_err(DecodingError::from)?;

        frame::read(&framed)
    }
}
