//! The envelope itself: four owned byte buffers in a fixed order.

use std::fmt;
use std::str::FromStr;

use crate::codec::CipherCodec;
use crate::error::CipherError;
use crate::fingerprint::KeyFingerprint;

/// One of the four envelope fields, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Ciphertext,
    PublicKey,
    Mac,
    Tag,
}

impl Field {
    /// Serialization order. Changing it requires a new frame version.
    pub const ORDER: [Self; 4] = [Self::Ciphertext, Self::PublicKey, Self::Mac, Self::Tag];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ciphertext => "ciphertext",
            Self::PublicKey => "public_key",
            Self::Mac => "mac",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw buffers of an envelope, for bulk construction and for taking the
/// buffers back out with [`Cipher::into_parts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CipherParts {
    pub ciphertext: Vec<u8>,
    pub public_key: Vec<u8>,
    pub mac: Vec<u8>,
    pub tag: Vec<u8>,
}

/// An encrypted message unit: ciphertext, the sender's public key for key
/// agreement, a MAC and an AEAD tag.
///
/// The envelope exclusively owns its four buffers and frees them when
/// dropped. Fields are read-only once constructed; population happens through
/// the consuming `with_*` methods or [`Cipher::from_parts`].
///
/// Those methods take `impl Into<Vec<u8>>`: a `Vec<u8>` is moved in, a
/// `&[u8]` is copied. In both cases later changes to the caller's buffer
/// cannot reach the envelope.
///
/// ```
/// use vx_cipher::Cipher;
///
/// let cipher = Cipher::new()
///     .with_ciphertext(vec![0x01, 0x02])
///     .with_public_key([0xAA; 32].as_slice())
///     .with_mac([0x00; 16].as_slice())
///     .with_tag([0xFF; 16].as_slice());
///
/// let text = cipher.encode().unwrap();
/// let decoded = Cipher::decode(&text).unwrap();
/// assert_eq!(decoded, cipher);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Cipher {
    ciphertext: Vec<u8>,
    public_key: Vec<u8>,
    mac: Vec<u8>,
    tag: Vec<u8>,
}

impl Cipher {
    /// An envelope with all four fields empty. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ciphertext: Vec::new(),
            public_key: Vec::new(),
            mac: Vec::new(),
            tag: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_parts(parts: CipherParts) -> Self {
        let CipherParts {
            ciphertext,
            public_key,
            mac,
            tag,
        } = parts;
        Self {
            ciphertext,
            public_key,
            mac,
            tag,
        }
    }

    #[must_use]
    pub fn with_ciphertext(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.ciphertext = bytes.into();
        self
    }

    #[must_use]
    pub fn with_public_key(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.public_key = bytes.into();
        self
    }

    #[must_use]
    pub fn with_mac(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.mac = bytes.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.tag = bytes.into();
        self
    }

    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    #[must_use]
    pub fn mac(&self) -> &[u8] {
        &self.mac
    }

    #[must_use]
    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    /// Bytes of a single field.
    #[must_use]
    pub fn field(&self, field: Field) -> &[u8] {
        match field {
            Field::Ciphertext => &self.ciphertext,
            Field::PublicKey => &self.public_key,
            Field::Mac => &self.mac,
            Field::Tag => &self.tag,
        }
    }

    /// All fields paired with their names, in wire order.
    #[must_use]
    pub fn fields(&self) -> [(Field, &[u8]); 4] {
        Field::ORDER.map(|field| (field, self.field(field)))
    }

    /// True when every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, bytes)| bytes.is_empty())
    }

    /// Fingerprint of the sender's public key, safe to log.
    #[must_use]
    pub fn sender_fingerprint(&self) -> KeyFingerprint {
        KeyFingerprint::derive(&self.public_key)
    }

    /// Release the envelope, handing its buffers to the caller.
    #[must_use]
    pub fn into_parts(self) -> CipherParts {
        CipherParts {
            ciphertext: self.ciphertext,
            public_key: self.public_key,
            mac: self.mac,
            tag: self.tag,
        }
    }

    /// Encode with the default codec (standard base64, 1 MiB limit).
    ///
    /// # Errors
    /// See [`CipherCodec::encode`].
    pub fn encode(&self) -> Result<String, CipherError> {
        CipherCodec::default().encode(self)
    }

    /// Decode text produced by [`Cipher::encode`].
    ///
    /// # Errors
    /// See [`CipherCodec::decode`].
    pub fn decode(text: &str) -> Result<Self, CipherError> {
        CipherCodec::default().decode(text)
    }
}

impl From<CipherParts> for Cipher {
    fn from(parts: CipherParts) -> Self {
        Self::from_parts(parts)
    }
}

impl From<Cipher> for CipherParts {
    fn from(cipher: Cipher) -> Self {
        cipher.into_parts()
    }
}

impl FromStr for Cipher {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

// Lengths and fingerprint only; field bytes stay out of logs.
impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("public_key_len", &self.public_key.len())
            .field("mac_len", &self.mac.len())
            .field("tag_len", &self.tag.len())
            .field("sender", &format_args!("{}", self.sender_fingerprint()))
            .finish()
    }
}

impl serde::Serialize for Cipher {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> serde::Deserialize<'de> for Cipher {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Cipher {
        Cipher::new()
            .with_ciphertext(vec![0x01, 0x02])
            .with_public_key(vec![0xAA; 32])
            .with_mac(vec![0x00; 16])
            .with_tag(vec![0xFF; 16])
    }

    #[test]
    fn new_is_empty() {
        let cipher = Cipher::new();
        assert!(cipher.is_empty());
        for (_, bytes) in cipher.fields() {
            assert_eq!(bytes.len(), 0);
        }
        assert_eq!(cipher, Cipher::default());
    }

    #[test]
    fn accessors_return_assigned_bytes() {
        let cipher = sample();
        assert_eq!(cipher.ciphertext(), &[0x01, 0x02]);
        assert_eq!(cipher.public_key(), &[0xAA; 32]);
        assert_eq!(cipher.mac(), &[0x00; 16]);
        assert_eq!(cipher.tag(), &[0xFF; 16]);
        assert!(!cipher.is_empty());
    }

    #[test]
    fn fields_follow_wire_order() {
        let names: Vec<&str> = sample()
            .fields()
            .iter()
            .map(|(field, _)| field.name())
            .collect();
        assert_eq!(names, ["ciphertext", "public_key", "mac", "tag"]);
    }

    #[test]
    fn copied_slice_is_independent_of_source() {
        let mut source = vec![1u8, 2, 3];
        let cipher = Cipher::new().with_ciphertext(source.as_slice());
        source[0] = 0xFF;
        source.push(4);
        assert_eq!(cipher.ciphertext(), &[1, 2, 3]);
    }

    #[test]
    fn fields_do_not_alias() {
        let shared = [7u8; 4];
        let cipher = Cipher::new()
            .with_mac(shared.as_slice())
            .with_tag(shared.as_slice());
        assert_ne!(cipher.mac().as_ptr(), cipher.tag().as_ptr());
    }

    #[test]
    fn into_parts_round_trips() {
        let parts = sample().into_parts();
        assert_eq!(parts.public_key.len(), 32);
        assert_eq!(Cipher::from(parts), sample());
    }

    #[test]
    fn one_byte_field_keeps_its_length() {
        let cipher = Cipher::new().with_tag(vec![0x00]);
        assert_eq!(cipher.tag().len(), 1);
        assert!(!cipher.is_empty());
    }

    #[test]
    fn debug_hides_field_bytes() {
        let debug = format!("{:?}", Cipher::new().with_ciphertext(b"secret-bytes".as_slice()));
        assert!(debug.contains("ciphertext_len: 12"));
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("115, 101"));
    }

    #[test]
    fn from_str_decodes() {
        let text = sample().encode().expect("encode");
        let parsed: Cipher = text.parse().expect("decode");
        assert_eq!(parsed, sample());
    }

    #[test]
    fn serde_uses_encoded_string() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        assert!(json.starts_with("\"VlhDAQ"));
        let parsed: Cipher = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, sample());
    }

    #[test]
    fn serde_rejects_garbage_string() {
        let result: Result<Cipher, _> = serde_json::from_str(r#""not an envelope!""#);
        assert!(result.is_err());
    }
}
