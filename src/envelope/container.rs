// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Binary container wire format.
//!
//! The container is the self-describing envelope shared by text, data, file
//! and image encryption, and the byte-exact contract two independent
//! implementations must agree on. All integers are big-endian:
//!
//! ```text
//! [4 bytes ] magic "ENC1"
//! [1 byte  ] format version (currently 1)
//! [1 byte  ] algorithm id (1 = AES-256-CBC, 2 = Fernet-style)
//! [1 byte  ] flags (bit 0 = metadata present)
//! [1 byte  ] salt length, then the salt (always 16)
//! [1 byte  ] IV length, then the IV (always 16)
//! [2 bytes ] metadata length (0 if absent), then the metadata
//! [4 bytes ] ciphertext length, then the ciphertext
//! [1 byte  ] tag length, then the tag (0 for AES mode, 32 for Fernet-style)
//! ```
//!
//! Metadata (file mode only) encodes the original filename and MIME type:
//!
//! ```text
//! [1 byte ] filename length, then the filename (UTF-8)
//! [1 byte ] MIME type length, then the MIME type (UTF-8)
//! ```
//!
//! Parsing validates every length field before touching the corresponding
//! slice and rejects trailing bytes, unknown versions, unknown algorithm ids
//! and unknown flag bits with [`EnvelopeError::Format`].

use crate::envelope::cipher::{IV_LEN, TAG_LEN};
use crate::envelope::error::EnvelopeError;
use crate::envelope::kdf::SALT_LEN;
use crate::envelope::Algorithm;

/// Container magic bytes.
pub const MAGIC: [u8; 4] = *b"ENC1";

/// Container format version.
pub const VERSION: u8 = 1;

/// FLAGS bit 0: metadata (filename + MIME type) present.
pub const FLAG_METADATA: u8 = 0b0000_0001;

/// Optional file metadata carried in the clear part of the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Original filename, as supplied by the caller.
    pub filename: String,
    /// MIME type of the original file.
    pub mime_type: String,
}

/// A parsed or freshly produced encryption container.
///
/// Immutable once produced by `encrypt`; consumed exactly once by `decrypt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub algorithm: Algorithm,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
    pub metadata: Option<Metadata>,
    pub ciphertext: Vec<u8>,
    /// HMAC-SHA256 tag for the Fernet-style mode; empty for AES-256-CBC.
    pub tag: Vec<u8>,
}

impl Container {
    /// Serialize the full container.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = self.encode_prefix();
        debug_assert!(self.tag.len() <= u8::MAX as usize);
        out.push(self.tag.len() as u8);
        out.extend_from_slice(&self.tag);
        out
    }

    /// Serialize everything preceding the tag length field.
    ///
    /// This is the exact byte range the Fernet-style authentication tag is
    /// computed over, so it covers magic, version, algorithm id, flags, salt,
    /// IV, metadata and ciphertext.
    pub fn encode_prefix(&self) -> Vec<u8> {
        let metadata = self.metadata.as_ref().map(encode_metadata).unwrap_or_default();
        debug_assert!(metadata.len() <= u16::MAX as usize);
        debug_assert!(self.ciphertext.len() <= u32::MAX as usize);

        let mut out = Vec::with_capacity(
            MAGIC.len() + 3 + 1 + SALT_LEN + 1 + IV_LEN + 2 + metadata.len() + 4 + self.ciphertext.len(),
        );
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.push(self.algorithm.id());
        out.push(if self.metadata.is_some() { FLAG_METADATA } else { 0 });
        out.push(SALT_LEN as u8);
        out.extend_from_slice(&self.salt);
        out.push(IV_LEN as u8);
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&(metadata.len() as u16).to_be_bytes());
        out.extend_from_slice(&metadata);
        out.extend_from_slice(&(self.ciphertext.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse a serialized container.
    ///
    /// # Errors
    /// [`EnvelopeError::Format`] on bad magic, unknown version/algorithm/flag
    /// bits, any length field that would read past the buffer end, a tag
    /// length that does not match the algorithm, or trailing bytes.
    /// [`EnvelopeError::InvalidUtf8`] if a metadata string is not UTF-8.
    pub fn parse(data: &[u8]) -> Result<Self, EnvelopeError> {
        let mut r = Reader::new(data);

        if r.take(MAGIC.len())? != MAGIC.as_slice() {
            return Err(EnvelopeError::Format("bad magic"));
        }
        if r.u8()? != VERSION {
            return Err(EnvelopeError::Format("unknown container version"));
        }
        let algorithm = Algorithm::from_id(r.u8()?)
            .ok_or(EnvelopeError::Format("unknown algorithm id"))?;
        let flags = r.u8()?;
        if flags & !FLAG_METADATA != 0 {
            return Err(EnvelopeError::Format("unknown flag bits"));
        }

        let salt_len = r.u8()? as usize;
        if salt_len != SALT_LEN {
            return Err(EnvelopeError::Format("unexpected salt length"));
        }
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(r.take(SALT_LEN)?);

        let iv_len = r.u8()? as usize;
        if iv_len != IV_LEN {
            return Err(EnvelopeError::Format("unexpected IV length"));
        }
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(r.take(IV_LEN)?);

        let metadata_len = r.u16()? as usize;
        let metadata = if flags & FLAG_METADATA != 0 {
            if metadata_len == 0 {
                return Err(EnvelopeError::Format("metadata flag set but length is zero"));
            }
            Some(parse_metadata(r.take(metadata_len)?)?)
        } else {
            if metadata_len != 0 {
                return Err(EnvelopeError::Format("metadata present without its flag"));
            }
            None
        };

        let ciphertext_len = r.u32()? as usize;
        let ciphertext = r.take(ciphertext_len)?.to_vec();

        let tag_len = r.u8()? as usize;
        let expected_tag_len = match algorithm {
            Algorithm::Aes256Cbc => 0,
            Algorithm::Fernet => TAG_LEN,
        };
        if tag_len != expected_tag_len {
            return Err(EnvelopeError::Format("tag length does not match algorithm"));
        }
        let tag = r.take(tag_len)?.to_vec();

        if !r.is_empty() {
            return Err(EnvelopeError::Format("trailing bytes after container"));
        }

        Ok(Self {
            algorithm,
            salt,
            iv,
            metadata,
            ciphertext,
            tag,
        })
    }
}

fn encode_metadata(metadata: &Metadata) -> Vec<u8> {
    let name = metadata.filename.as_bytes();
    let mime = metadata.mime_type.as_bytes();
    debug_assert!(name.len() <= u8::MAX as usize);
    debug_assert!(mime.len() <= u8::MAX as usize);

    let mut out = Vec::with_capacity(2 + name.len() + mime.len());
    out.push(name.len() as u8);
    out.extend_from_slice(name);
    out.push(mime.len() as u8);
    out.extend_from_slice(mime);
    out
}

fn parse_metadata(data: &[u8]) -> Result<Metadata, EnvelopeError> {
    let mut r = Reader::new(data);

    let name_len = r.u8()? as usize;
    let filename = std::str::from_utf8(r.take(name_len)?)
        .map_err(|_| EnvelopeError::InvalidUtf8)?
        .to_string();

    let mime_len = r.u8()? as usize;
    let mime_type = std::str::from_utf8(r.take(mime_len)?)
        .map_err(|_| EnvelopeError::InvalidUtf8)?
        .to_string();

    if !r.is_empty() {
        return Err(EnvelopeError::Format("metadata length mismatch"));
    }

    Ok(Metadata { filename, mime_type })
}

/// Bounds-checked cursor over the container bytes. Every read validates the
/// remaining length before slicing.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], EnvelopeError> {
        if n > self.data.len() - self.pos {
            return Err(EnvelopeError::Format("length field reads past buffer end"));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, EnvelopeError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, EnvelopeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, EnvelopeError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }
}
