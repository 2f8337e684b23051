//! Command implementations. Each returns the text to print so the binary
//! stays a thin wrapper.

use std::io::Read;

use anyhow::Context;
use serde::Serialize;
use vx_cipher::{Base64Codec, Cipher, CipherCodec, KeyFingerprint, TextCodec, WIRE_VERSION};

use crate::args::{Command, EnvelopeArgs, FieldArgs};

/// Line ending tolerated after envelope text on stdin (`\r\n`).
const STDIN_SLACK: usize = 2;

/// JSON view of a decoded envelope, fields in standard base64.
#[derive(Debug, Serialize)]
pub struct DecodedView {
    pub ciphertext: String,
    pub public_key: String,
    pub mac: String,
    pub tag: String,
}

/// JSON summary of an envelope. Never includes field bytes.
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub version: u8,
    pub codec: &'static str,
    pub encoded_len: usize,
    pub ciphertext_len: usize,
    pub public_key_len: usize,
    pub mac_len: usize,
    pub tag_len: usize,
    pub sender_fingerprint: KeyFingerprint,
}

/// Run `command`, reading envelope text from `stdin` when it was not given
/// as an argument.
///
/// # Errors
/// Returns an error if input cannot be read or exceeds the codec's length
/// cap, field arguments are not valid base64, the envelope cannot be encoded
/// or decoded, or the sender does not match `--expect-sender`.
pub fn run(command: &Command, codec: &CipherCodec, stdin: impl Read) -> anyhow::Result<String> {
    match command {
        Command::Encode(fields) => encode(codec, fields),
        Command::Decode(input) => {
            let text = envelope_text(input, stdin, codec.max_encoded_len())?;
            let view = decode(codec, &text, input.expect_sender.as_ref())?;
            Ok(serde_json::to_string_pretty(&view)?)
        }
        Command::Inspect(input) => {
            let text = envelope_text(input, stdin, codec.max_encoded_len())?;
            let inspection = inspect(codec, &text, input.expect_sender.as_ref())?;
            Ok(serde_json::to_string_pretty(&inspection)?)
        }
    }
}

/// Build and encode an envelope from base64 field arguments.
///
/// # Errors
/// Returns an error if any field is not valid standard base64 or encoding
/// fails.
pub fn encode(codec: &CipherCodec, fields: &FieldArgs) -> anyhow::Result<String> {
    let cipher = Cipher::new()
        .with_ciphertext(field_bytes("ciphertext", &fields.ciphertext)?)
        .with_public_key(field_bytes("public-key", &fields.public_key)?)
        .with_mac(field_bytes("mac", &fields.mac)?)
        .with_tag(field_bytes("tag", &fields.tag)?);

    let text = codec.encode(&cipher).context("failed to encode envelope")?;
    tracing::info!(
        sender = %cipher.sender_fingerprint(),
        encoded_len = text.len(),
        "envelope encoded"
    );
    Ok(text)
}

/// Decode envelope text into base64 fields.
///
/// # Errors
/// Returns an error if the text is not a valid envelope for `codec`, or its
/// sender is not `expected`.
pub fn decode(
    codec: &CipherCodec,
    text: &str,
    expected: Option<&KeyFingerprint>,
) -> anyhow::Result<DecodedView> {
    let cipher = open(codec, text, expected)?;
    tracing::info!(sender = %cipher.sender_fingerprint(), "envelope decoded");

    let field_codec = Base64Codec::standard();
    let b64 = |bytes: &[u8]| {
        let mut out = String::new();
        field_codec.encode_into(bytes, &mut out);
        out
    };
    Ok(DecodedView {
        ciphertext: b64(cipher.ciphertext()),
        public_key: b64(cipher.public_key()),
        mac: b64(cipher.mac()),
        tag: b64(cipher.tag()),
    })
}

/// Summarise envelope text without exposing field bytes.
///
/// # Errors
/// Returns an error if the text is not a valid envelope for `codec`, or its
/// sender is not `expected`.
pub fn inspect(
    codec: &CipherCodec,
    text: &str,
    expected: Option<&KeyFingerprint>,
) -> anyhow::Result<Inspection> {
    let cipher = open(codec, text, expected)?;
    Ok(Inspection {
        version: WIRE_VERSION,
        codec: codec.text_codec().name(),
        encoded_len: text.len(),
        ciphertext_len: cipher.ciphertext().len(),
        public_key_len: cipher.public_key().len(),
        mac_len: cipher.mac().len(),
        tag_len: cipher.tag().len(),
        sender_fingerprint: cipher.sender_fingerprint(),
    })
}

fn field_bytes(flag: &str, value: &str) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    Base64Codec::standard()
        .decode_into(value, &mut bytes)
        .with_context(|| format!("--{flag} is not valid base64"))?;
    Ok(bytes)
}

fn open(
    codec: &CipherCodec,
    text: &str,
    expected: Option<&KeyFingerprint>,
) -> anyhow::Result<Cipher> {
    let cipher = codec.decode(text).context("failed to decode envelope")?;
    if let Some(expected) = expected {
        anyhow::ensure!(
            expected.matches(cipher.public_key()),
            "envelope sender {} does not match expected {expected}",
            cipher.sender_fingerprint()
        );
    }
    Ok(cipher)
}

/// Envelope text from the argument, or from at most `max_len` characters of
/// stdin plus a line ending.
fn envelope_text(
    input: &EnvelopeArgs,
    stdin: impl Read,
    max_len: usize,
) -> anyhow::Result<String> {
    if let Some(text) = &input.envelope {
        return Ok(text.clone());
    }

    let allowed = max_len.saturating_add(STDIN_SLACK);
    let mut buf = Vec::new();
    stdin
        .take(u64::try_from(allowed).unwrap_or(u64::MAX).saturating_add(1))
        .read_to_end(&mut buf)
        .context("failed to read envelope from stdin")?;
    anyhow::ensure!(
        buf.len() <= allowed,
        "envelope text on stdin is too long (maximum {max_len})"
    );

    let text = String::from_utf8(buf).context("envelope on stdin is not UTF-8")?;
    Ok(text.trim_end().to_string())
}
