//! Portable envelope for ECIES-style ciphertexts.
//!
//! A [`Cipher`] carries the four buffers an external encryption routine
//! produces (ciphertext, sender public key, MAC, tag) and turns them into a
//! single text string for storage or transport, and back. This crate does
//! no cryptography of its own: it frames, serializes and validates.
//!
//! The crate is used natively and compiled to WASM for the web client.
//!
//! # Wire format
//!
//! `base64(frame)`, where the frame is `"VXC"`, a version byte, then the
//! four fields each prefixed with a big-endian u32 length. See the `frame`
//! module docs for the offset table.

use wasm_bindgen::prelude::*;

mod cipher;
pub use cipher::{Cipher, CipherParts, Field};

mod codec;
pub use codec::{CipherCodec, DEFAULT_MAX_ENCODED_LEN, HARD_MAX_ENCODED_LEN};

mod error;
pub use error::{CipherError, DecodingError, EncodingError};

mod fingerprint;
pub use fingerprint::{FingerprintError, KeyFingerprint};

mod frame;
pub use frame::VERSION as WIRE_VERSION;

mod text;
pub use text::{Base64Codec, Base64Variant, TextCodec, TextCodecError};

/// Build an envelope from raw buffers and encode it (WASM binding).
///
/// # Errors
/// Returns `JsError` if the envelope cannot be encoded.
#[wasm_bindgen]
pub fn encode_cipher(
    ciphertext: &[u8],
    public_key: &[u8],
    mac: &[u8],
    tag: &[u8],
) -> Result<String, JsError> {
    Cipher::new()
        .with_ciphertext(ciphertext)
        .with_public_key(public_key)
        .with_mac(mac)
        .with_tag(tag)
        .encode()
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Decode envelope text (WASM binding).
///
/// For native Rust code, use [`Cipher::decode`] instead.
///
/// # Errors
/// Returns `JsError` if the text is not a valid envelope.
#[wasm_bindgen]
pub fn decode_cipher(encoded: &str) -> Result<DecodedCipher, JsError> {
    Cipher::decode(encoded)
        .map(|cipher| DecodedCipher { cipher })
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Decoded envelope handed to JavaScript. Getters copy the bytes out as
/// `Uint8Array`s.
#[wasm_bindgen]
pub struct DecodedCipher {
    cipher: Cipher,
}

#[wasm_bindgen]
impl DecodedCipher {
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn ciphertext(&self) -> Vec<u8> {
        self.cipher.ciphertext().to_vec()
    }

    #[wasm_bindgen(getter, js_name = "publicKey")]
    #[must_use]
    pub fn public_key(&self) -> Vec<u8> {
        self.cipher.public_key().to_vec()
    }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn mac(&self) -> Vec<u8> {
        self.cipher.mac().to_vec()
    }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn tag(&self) -> Vec<u8> {
        self.cipher.tag().to_vec()
    }

    #[wasm_bindgen(getter, js_name = "senderFingerprint")]
    #[must_use]
    pub fn sender_fingerprint(&self) -> String {
        self.cipher.sender_fingerprint().to_string()
    }
}
