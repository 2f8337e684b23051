//! Sender key fingerprint: a short, loggable stand-in for an envelope's
//! public key.
//!
//! The fingerprint is the first 16 bytes of `SHA-256(public_key)`. Its text
//! form is those bytes in unpadded base64url, always 22 characters.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

const DIGEST_LEN: usize = 16;
const TEXT_LEN: usize = 22;

/// Truncated digest of a sender public key.
///
/// Derived from key bytes with [`KeyFingerprint::derive`], or parsed from
/// its text form when a caller pins an expected sender.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyFingerprint([u8; DIGEST_LEN]);

/// Text that is not a fingerprint.
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    #[error("fingerprint must be {TEXT_LEN} characters, got {0}")]
    Length(usize),
    #[error("fingerprint is not base64url: {0}")]
    Alphabet(#[from] base64::DecodeError),
}

impl KeyFingerprint {
    /// Fingerprint `public_key`. An empty key is fingerprinted like any other
    /// input, so every envelope has a sender fingerprint.
    #[must_use]
    pub fn derive(public_key: &[u8]) -> Self {
        let hash = Sha256::digest(public_key);
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&hash[..DIGEST_LEN]);
        Self(digest)
    }

    /// Whether `public_key` hashes to this fingerprint.
    #[must_use]
    pub fn matches(&self, public_key: &[u8]) -> bool {
        *self == Self::derive(public_key)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl FromStr for KeyFingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != TEXT_LEN {
            return Err(FingerprintError::Length(s.len()));
        }
        let decoded = URL_SAFE_NO_PAD.decode(s)?;
        let digest = <[u8; DIGEST_LEN]>::try_from(decoded.as_slice())
            .map_err(|_| FingerprintError::Length(s.len()))?;
        Ok(Self(digest))
    }
}

impl fmt::Display for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl fmt::Debug for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyFingerprint({self})")
    }
}

impl serde::Serialize for KeyFingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_have_stable_fingerprints() {
        // Stored and logged fingerprints depend on these.
        assert_eq!(
            KeyFingerprint::derive(&[1u8; 32]).to_string(),
            "cs1uhCLEB_ttCYaQ8RMLfQ"
        );
        assert_eq!(
            KeyFingerprint::derive(&[0xAA; 32]).to_string(),
            "4Od6UHQSsSD27eYfYilbGg"
        );
    }

    #[test]
    fn digest_is_sha256_prefix() {
        let key = b"sender key";
        let fp = KeyFingerprint::derive(key);
        assert_eq!(fp.as_bytes()[..], Sha256::digest(key)[..DIGEST_LEN]);
    }

    #[test]
    fn empty_key_is_fingerprinted() {
        let fp = KeyFingerprint::derive(&[]);
        assert_ne!(fp, KeyFingerprint::derive(&[0]));
        assert_eq!(fp.to_string().len(), TEXT_LEN);
    }

    #[test]
    fn matches_only_its_own_key() {
        let fp = KeyFingerprint::derive(&[0xAA; 32]);
        assert!(fp.matches(&[0xAA; 32]));
        assert!(!fp.matches(&[0xAB; 32]));
        assert!(!fp.matches(&[]));
    }

    #[test]
    fn parses_its_own_text() {
        let fp = KeyFingerprint::derive(&[7u8; 65]);
        let parsed: KeyFingerprint = fp.to_string().parse().expect("parse");
        assert_eq!(parsed, fp);
    }

    #[test]
    fn parse_rejects_wrong_length_before_decoding() {
        let err = "cs1uhCLEB_ttCYaQ8RMLf".parse::<KeyFingerprint>().unwrap_err();
        assert!(matches!(err, FingerprintError::Length(21)));
        assert!("a".repeat(4096).parse::<KeyFingerprint>().is_err());
    }

    #[test]
    fn parse_rejects_standard_alphabet() {
        let err = "cs1uhCLEB+ttCYaQ8RMLfQ".parse::<KeyFingerprint>().unwrap_err();
        assert!(matches!(err, FingerprintError::Alphabet(_)));
    }

    #[test]
    fn parse_rejects_non_canonical_trailing_bits() {
        // Last symbol carries four unused bits; 'R' sets them.
        assert!("cs1uhCLEB_ttCYaQ8RMLfR".parse::<KeyFingerprint>().is_err());
    }

    #[test]
    fn serializes_as_text() {
        let fp = KeyFingerprint::derive(&[0xAA; 32]);
        let json = serde_json::to_string(&fp).expect("serialize");
        assert_eq!(json, "\"4Od6UHQSsSD27eYfYilbGg\"");
        assert_eq!(format!("{fp:?}"), "KeyFingerprint(4Od6UHQSsSD27eYfYilbGg)");
    }
}
