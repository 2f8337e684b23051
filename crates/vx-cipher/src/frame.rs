//! Binary frame that sits underneath the text transform.
//!
//! Version 1 layout:
//!
//! | Offset | Size | Field                      |
//! |--------|------|----------------------------|
//! | 0      | 3    | magic (`"VXC"`)            |
//! | 3      | 1    | version (0x01)             |
//! | 4      | 4    | ciphertext length (BE u32) |
//! | 8      | N    | ciphertext                 |
//! | ..     | 4    | public key length          |
//! | ..     | N    | public key                 |
//! | ..     | 4    | mac length                 |
//! | ..     | N    | mac                        |
//! | ..     | 4    | tag length                 |
//! | ..     | N    | tag                        |
//!
//! Nothing may follow the tag.

use crate::cipher::{Cipher, CipherParts, Field};
use crate::error::{CipherError, DecodingError, EncodingError};

/// Frame magic.
pub const MAGIC: &[u8; 3] = b"VXC";
/// Current frame version.
pub const VERSION: u8 = 0x01;
/// Magic plus version byte.
const HEADER_LEN: usize = MAGIC.len() + 1;
/// Each field is prefixed by a big-endian u32.
const LEN_PREFIX: usize = 4;

/// Exact frame size for `cipher`.
pub(crate) fn frame_len(cipher: &Cipher) -> Result<usize, EncodingError> {
    cipher
        .fields()
        .iter()
        .try_fold(HEADER_LEN, |total, &(field, bytes)| {
            let too_large = EncodingError::FieldTooLarge {
                field,
                len: bytes.len(),
            };
            if u32::try_from(bytes.len()).is_err() {
                return Err(too_large);
            }
            total
                .checked_add(LEN_PREFIX)
                .and_then(|t| t.checked_add(bytes.len()))
                .ok_or(too_large)
        })
}

/// Append the frame for `cipher` to `out`.
pub(crate) fn write(cipher: &Cipher, out: &mut Vec<u8>) -> Result<(), EncodingError> {
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    for (field, bytes) in cipher.fields() {
        let len = u32::try_from(bytes.len()).map_err(|_| EncodingError::FieldTooLarge {
            field,
            len: bytes.len(),
        })?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(bytes);
    }
    Ok(())
}

/// Parse a complete frame into freshly allocated buffers.
pub(crate) fn read(frame: &[u8]) -> Result<Cipher, CipherError> {
    let body = frame
        .strip_prefix(MAGIC.as_slice())
        .ok_or(DecodingError::BadMagic)?;
    let (&version, body) = body.split_first().ok_or(DecodingError::BadMagic)?;
    if version != VERSION {
        return Err(DecodingError::UnsupportedVersion(version).into());
    }

    let mut reader = FrameReader { rest: body };
    let parts = CipherParts {
        ciphertext: reader.field(Field::Ciphertext)?,
        public_key: reader.field(Field::PublicKey)?,
        mac: reader.field(Field::Mac)?,
        tag: reader.field(Field::Tag)?,
    };
    reader.finish()?;

    Ok(Cipher::from_parts(parts))
}

struct FrameReader<'a> {
    rest: &'a [u8],
}

impl FrameReader<'_> {
    fn field(&mut self, field: Field) -> Result<Vec<u8>, CipherError> {
        let truncated = || DecodingError::Truncated { field };

        let (prefix, rest) = self
            .rest
            .split_first_chunk::<LEN_PREFIX>()
            .ok_or_else(truncated)?;
        let len = usize::try_from(u32::from_be_bytes(*prefix)).map_err(|_| truncated())?;
        if rest.len() < len {
            return Err(truncated().into());
        }
        let (bytes, rest) = rest.split_at(len);

        let mut owned = Vec::new();
        owned.try_reserve_exact(len)?;
        owned.extend_from_slice(bytes);

        self.rest = rest;
        Ok(owned)
    }

    fn finish(self) -> Result<(), DecodingError> {
        if self.rest.is_empty() {
            Ok(())
        } else {
            Err(DecodingError::TrailingBytes(self.rest.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(cipher: &Cipher) -> Vec<u8> {
        let mut out = Vec::new();
        write(cipher, &mut out).expect("write");
        out
    }

    fn sample() -> Cipher {
        Cipher::new()
            .with_ciphertext(vec![0x01, 0x02])
            .with_public_key(vec![0xAA; 32])
            .with_mac(vec![0x00; 16])
            .with_tag(vec![0xFF; 16])
    }

    #[test]
    fn empty_cipher_frame_layout() {
        let frame = framed(&Cipher::new());
        assert_eq!(&frame[..4], b"VXC\x01");
        assert_eq!(&frame[4..], &[0u8; 16]);
        assert_eq!(frame_len(&Cipher::new()).expect("len"), 20);
    }

    #[test]
    fn frame_len_matches_written_bytes() {
        let cipher = sample();
        let frame = framed(&cipher);
        assert_eq!(frame.len(), 86);
        assert_eq!(frame_len(&cipher).expect("len"), frame.len());
    }

    #[test]
    fn length_prefixes_are_big_endian() {
        let frame = framed(&sample());
        assert_eq!(&frame[4..8], &[0, 0, 0, 2]);
        assert_eq!(&frame[8..10], &[0x01, 0x02]);
        assert_eq!(&frame[10..14], &[0, 0, 0, 32]);
    }

    #[test]
    fn read_inverts_write() {
        let cipher = sample();
        assert_eq!(read(&framed(&cipher)).expect("read"), cipher);
    }

    #[test]
    fn read_keeps_zero_bytes() {
        let cipher = Cipher::new().with_ciphertext(vec![0, 0, 0]).with_tag(vec![0]);
        assert_eq!(read(&framed(&cipher)).expect("read"), cipher);
    }

    #[test]
    fn read_rejects_bad_magic() {
        let mut frame = framed(&sample());
        frame[0] = b'X';
        assert!(matches!(
            read(&frame),
            Err(CipherError::Decoding(DecodingError::BadMagic))
        ));
    }

    #[test]
    fn read_rejects_missing_version() {
        assert!(matches!(
            read(b"VXC"),
            Err(CipherError::Decoding(DecodingError::BadMagic))
        ));
    }

    #[test]
    fn read_rejects_unknown_version() {
        let mut frame = framed(&sample());
        frame[3] = 0x02;
        assert!(matches!(
            read(&frame),
            Err(CipherError::Decoding(DecodingError::UnsupportedVersion(2)))
        ));
    }

    #[test]
    fn read_rejects_missing_tag() {
        let frame = framed(&sample());
        // Drop the tag's length prefix and bytes.
        let without_tag = &frame[..frame.len() - 20];
        assert!(matches!(
            read(without_tag),
            Err(CipherError::Decoding(DecodingError::Truncated {
                field: Field::Tag
            }))
        ));
    }

    #[test]
    fn read_rejects_length_past_end() {
        let mut frame = framed(&sample());
        // Ciphertext claims 0xFFFF_FFFF bytes.
        frame[4..8].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            read(&frame),
            Err(CipherError::Decoding(DecodingError::Truncated {
                field: Field::Ciphertext
            }))
        ));
    }

    #[test]
    fn read_rejects_trailing_bytes() {
        let mut frame = framed(&sample());
        frame.extend_from_slice(&[0xDE, 0xAD]);
        assert!(matches!(
            read(&frame),
            Err(CipherError::Decoding(DecodingError::TrailingBytes(2)))
        ));
    }
}
