// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Password-based symmetric envelope encryption.
//!
//! Every payload kind (text, generic data, files, images) goes through the
//! same flow: a fresh random salt, PBKDF2-HMAC-SHA256 key derivation, a fresh
//! random IV, CBC encryption, and a self-describing [`Container`]:
//!
//! - **AES-256-CBC**: 32-byte key, PKCS7 padding, no authentication tag.
//!   A wrong password surfaces as [`EnvelopeError::Padding`].
//! - **Fernet-style**: the 32 derived bytes split into a signing half
//!   (HMAC-SHA256) and an encryption half (AES-128-CBC). The tag covers the
//!   serialized container prefix and is verified, in constant time, before
//!   any decryption. A wrong password surfaces as
//!   [`EnvelopeError::Authentication`].
//!
//! All operations are pure functions of their inputs plus CSPRNG draws; there
//! is no filesystem or network access and no shared state across calls.

pub mod container;
pub mod error;
pub mod kdf;

mod cipher;

use core::fmt;
use std::str::FromStr;

use tracing::debug;
use zeroize::Zeroizing;

pub use container::{Container, Metadata};
pub use error::EnvelopeError;
pub use kdf::{PBKDF2_ITERATIONS, SALT_LEN};

/// Envelope algorithm variants.
///
/// Wire ids are part of the container contract: 1 = AES-256-CBC,
/// 2 = Fernet-style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// AES-256-CBC with PKCS7 padding, unauthenticated.
    Aes256Cbc,
    /// Fernet-style authenticated token: AES-128-CBC + HMAC-SHA256.
    Fernet,
}

impl Algorithm {
    /// Wire id used in the container ALGO_ID field.
    pub const fn id(self) -> u8 {
        match self {
            Self::Aes256Cbc => 1,
            Self::Fernet => 2,
        }
    }

    /// Resolve a wire id back to an algorithm.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Aes256Cbc),
            2 => Some(Self::Fernet),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes256Cbc => "aes-256-cbc",
            Self::Fernet => "fernet",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = EnvelopeError;

    /// Accepts the service-level tags (`"AES"`, `"Fernet"`) as well as the
    /// canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aes" | "aes-256-cbc" => Ok(Self::Aes256Cbc),
            "fernet" => Ok(Self::Fernet),
            _ => Err(EnvelopeError::Format("unknown algorithm name")),
        }
    }
}

/// Encrypt a payload into a [`Container`].
///
/// Generates a fresh salt and IV, derives the key for the chosen algorithm,
/// and (for the Fernet-style mode) computes the authentication tag over the
/// serialized container prefix.
///
/// # Errors
/// - [`EnvelopeError::KeyDerivation`] on an empty password.
/// - [`EnvelopeError::Format`] if the payload exceeds the container's 32-bit
///   ciphertext length field.
pub fn encrypt(
    plaintext: &[u8],
    password: &str,
    algorithm: Algorithm,
) -> Result<Container, EnvelopeError> {
    encrypt_with_metadata(plaintext, password, algorithm, None)
}

/// Encrypt a payload, optionally attaching file metadata to the container.
pub fn encrypt_with_metadata(
    plaintext: &[u8],
    password: &str,
    algorithm: Algorithm,
    metadata: Option<Metadata>,
) -> Result<Container, EnvelopeError> {
    if let Some(ref m) = metadata {
        if m.filename.len() > u8::MAX as usize {
            return Err(EnvelopeError::Format("filename exceeds 255 bytes"));
        }
        if m.mime_type.len() > u8::MAX as usize {
            return Err(EnvelopeError::Format("MIME type exceeds 255 bytes"));
        }
    }
    // PKCS7 adds at most one block; the length field is a u32.
    if plaintext.len() as u64 + cipher::BLOCK_LEN as u64 > u32::MAX as u64 {
        return Err(EnvelopeError::Format("payload exceeds container ciphertext limit"));
    }

    // 1. Fresh salt, derived key, fresh IV.
    let salt = kdf::generate_salt();
    let key = kdf::derive(password.as_bytes(), &salt, PBKDF2_ITERATIONS, kdf::KEY_LEN)?;
    let iv = cipher::generate_iv();

    // 2. Encrypt and assemble.
    let mut out = match algorithm {
        Algorithm::Aes256Cbc => Container {
            algorithm,
            salt,
            iv,
            metadata,
            ciphertext: cipher::aes256_cbc_encrypt(&key, &iv, plaintext),
            tag: Vec::new(),
        },
        Algorithm::Fernet => {
            let (_, encryption_key) = split_fernet_key(&key);
            Container {
                algorithm,
                salt,
                iv,
                metadata,
                ciphertext: cipher::aes128_cbc_encrypt(encryption_key, &iv, plaintext),
                tag: Vec::new(),
            }
        }
    };

    // 3. Tag over the serialized prefix (Fernet-style mode only).
    if algorithm == Algorithm::Fernet {
        let (signing_key, _) = split_fernet_key(&key);
        out.tag = cipher::compute_tag(signing_key, &out.encode_prefix()).to_vec();
    }

    debug!(
        algorithm = %algorithm,
        plaintext_len = plaintext.len(),
        ciphertext_len = out.ciphertext.len(),
        "envelope encrypt"
    );
    Ok(out)
}

/// Decrypt a [`Container`].
///
/// The container carries its own algorithm id, so no algorithm argument is
/// needed (or accepted; a mismatching one could only introduce a failure
/// mode the enum dispatch exists to prevent).
///
/// # Errors
/// - [`EnvelopeError::Authentication`] if the Fernet-style tag does not
///   verify (wrong password or tampering).
/// - [`EnvelopeError::Padding`] if CBC unpadding fails (wrong password on the
///   unauthenticated mode).
///
/// No partial plaintext is ever returned alongside an error.
pub fn decrypt(container: &Container, password: &str) -> Result<Vec<u8>, EnvelopeError> {
    let key = kdf::derive(
        password.as_bytes(),
        &container.salt,
        PBKDF2_ITERATIONS,
        kdf::KEY_LEN,
    )?;

    let plaintext = match container.algorithm {
        Algorithm::Aes256Cbc => {
            cipher::aes256_cbc_decrypt(&key, &container.iv, &container.ciphertext)?
        }
        Algorithm::Fernet => {
            let (signing_key, encryption_key) = split_fernet_key(&key);
            // Verify before any decryption.
            cipher::verify_tag(signing_key, &container.encode_prefix(), &container.tag)?;
            cipher::aes128_cbc_decrypt(encryption_key, &container.iv, &container.ciphertext)?
        }
    };

    debug!(
        algorithm = %container.algorithm,
        plaintext_len = plaintext.len(),
        "envelope decrypt"
    );
    Ok(plaintext)
}

/// Encrypt straight to container wire bytes.
pub fn seal(plaintext: &[u8], password: &str, algorithm: Algorithm) -> Result<Vec<u8>, EnvelopeError> {
    Ok(encrypt(plaintext, password, algorithm)?.encode())
}

/// Parse container wire bytes and decrypt.
pub fn open(data: &[u8], password: &str) -> Result<Vec<u8>, EnvelopeError> {
    decrypt(&Container::parse(data)?, password)
}

/// Encrypt a UTF-8 text message to container wire bytes.
pub fn encrypt_text(text: &str, password: &str, algorithm: Algorithm) -> Result<Vec<u8>, EnvelopeError> {
    seal(text.as_bytes(), password, algorithm)
}

/// Decrypt container wire bytes and decode the payload as UTF-8 text.
///
/// # Errors
/// [`EnvelopeError::InvalidUtf8`] if the decrypted bytes are not UTF-8, on
/// top of the usual decrypt failures.
pub fn decrypt_text(data: &[u8], password: &str) -> Result<String, EnvelopeError> {
    String::from_utf8(open(data, password)?).map_err(|_| EnvelopeError::InvalidUtf8)
}

/// Encrypt a file's bytes, recording its filename and guessed MIME type in
/// the container metadata.
pub fn encrypt_file(
    data: &[u8],
    filename: &str,
    password: &str,
    algorithm: Algorithm,
) -> Result<Vec<u8>, EnvelopeError> {
    let metadata = Metadata {
        filename: filename.to_string(),
        mime_type: guess_mime(filename).to_string(),
    };
    Ok(encrypt_with_metadata(data, password, algorithm, Some(metadata))?.encode())
}

/// Decrypt an encrypted file, returning its bytes and metadata (if the
/// container carries any).
pub fn decrypt_file(
    data: &[u8],
    password: &str,
) -> Result<(Vec<u8>, Option<Metadata>), EnvelopeError> {
    let container = Container::parse(data)?;
    let plaintext = decrypt(&container, password)?;
    Ok((plaintext, container.metadata))
}

/// Guess a MIME type from a filename extension.
///
/// Falls back to `application/octet-stream` for anything unrecognized.
pub fn guess_mime(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Split the 32 derived bytes into the Fernet-style signing and encryption
/// halves (first 16 sign, last 16 encrypt).
fn split_fernet_key(key: &Zeroizing<Vec<u8>>) -> (&[u8], &[u8]) {
    debug_assert_eq!(key.len(), kdf::KEY_LEN);
    key.split_at(kdf::KEY_LEN / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes_roundtrip() {
        let c = encrypt(b"attack at dawn", "correct horse", Algorithm::Aes256Cbc).unwrap();
        assert!(c.tag.is_empty());
        let pt = decrypt(&c, "correct horse").unwrap();
        assert_eq!(pt, b"attack at dawn");
    }

    #[test]
    fn fernet_roundtrip() {
        let c = encrypt(b"attack at dawn", "correct horse", Algorithm::Fernet).unwrap();
        assert_eq!(c.tag.len(), 32);
        let pt = decrypt(&c, "correct horse").unwrap();
        assert_eq!(pt, b"attack at dawn");
    }

    #[test]
    fn empty_payload_roundtrips() {
        for algorithm in [Algorithm::Aes256Cbc, Algorithm::Fernet] {
            let c = encrypt(b"", "pw", algorithm).unwrap();
            assert_eq!(decrypt(&c, "pw").unwrap(), b"");
        }
    }

    #[test]
    fn fernet_wrong_password_is_authentication_error() {
        let c = encrypt(b"payload", "right", Algorithm::Fernet).unwrap();
        assert!(matches!(decrypt(&c, "wrong"), Err(EnvelopeError::Authentication)));
    }

    #[test]
    fn aes_wrong_password_never_yields_the_plaintext() {
        let c = encrypt(b"a fairly long plaintext to make padding survival obvious", "right", Algorithm::Aes256Cbc).unwrap();
        match decrypt(&c, "wrong") {
            Err(EnvelopeError::Padding) => {}
            Err(e) => panic!("unexpected error kind: {e}"),
            Ok(pt) => assert_ne!(pt, b"a fairly long plaintext to make padding survival obvious"),
        }
    }

    #[test]
    fn fernet_tampered_ciphertext_rejected() {
        let mut c = encrypt(b"payload", "pw", Algorithm::Fernet).unwrap();
        c.ciphertext[0] ^= 0x01;
        assert!(matches!(decrypt(&c, "pw"), Err(EnvelopeError::Authentication)));
    }

    #[test]
    fn fernet_tampered_metadata_rejected() {
        // The tag covers the serialized prefix, so metadata is bound too.
        let metadata = Metadata {
            filename: "a.txt".to_string(),
            mime_type: "text/plain".to_string(),
        };
        let mut c =
            encrypt_with_metadata(b"payload", "pw", Algorithm::Fernet, Some(metadata)).unwrap();
        c.metadata.as_mut().unwrap().filename = "b.txt".to_string();
        assert!(matches!(decrypt(&c, "pw"), Err(EnvelopeError::Authentication)));
    }

    #[test]
    fn repeated_encryption_differs() {
        // Fresh salt + IV per call: identical inputs never produce identical
        // containers.
        let a = encrypt(b"same", "pw", Algorithm::Aes256Cbc).unwrap();
        let b = encrypt(b"same", "pw", Algorithm::Aes256Cbc).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn empty_password_rejected() {
        assert!(matches!(
            encrypt(b"data", "", Algorithm::Aes256Cbc),
            Err(EnvelopeError::KeyDerivation(_))
        ));
    }

    #[test]
    fn seal_open_roundtrip() {
        let wire = seal(b"over the wire", "pw", Algorithm::Fernet).unwrap();
        assert_eq!(&wire[..4], b"ENC1");
        assert_eq!(open(&wire, "pw").unwrap(), b"over the wire");
    }

    #[test]
    fn text_roundtrip_and_utf8_enforcement() {
        let wire = encrypt_text("Ünïcödé 🎉", "pw", Algorithm::Fernet).unwrap();
        assert_eq!(decrypt_text(&wire, "pw").unwrap(), "Ünïcödé 🎉");

        // Raw bytes that are not UTF-8 must fail the text API.
        let wire = seal(&[0xFF, 0xFE, 0x00, 0x80], "pw", Algorithm::Aes256Cbc).unwrap();
        assert!(matches!(decrypt_text(&wire, "pw"), Err(EnvelopeError::InvalidUtf8)));
    }

    #[test]
    fn file_roundtrip_preserves_metadata() {
        let wire = encrypt_file(b"\x89PNG...", "shot.png", "pw", Algorithm::Fernet).unwrap();
        let (bytes, metadata) = decrypt_file(&wire, "pw").unwrap();
        assert_eq!(bytes, b"\x89PNG...");
        let metadata = metadata.unwrap();
        assert_eq!(metadata.filename, "shot.png");
        assert_eq!(metadata.mime_type, "image/png");
    }

    #[test]
    fn mime_guessing() {
        assert_eq!(guess_mime("a.PNG"), "image/png");
        assert_eq!(guess_mime("notes.txt"), "text/plain");
        assert_eq!(guess_mime("archive.tar.gz"), "application/octet-stream");
        assert_eq!(guess_mime("no_extension"), "application/octet-stream");
    }

    #[test]
    fn algorithm_string_tags() {
        assert_eq!("AES".parse::<Algorithm>().unwrap(), Algorithm::Aes256Cbc);
        assert_eq!("Fernet".parse::<Algorithm>().unwrap(), Algorithm::Fernet);
        assert_eq!("aes-256-cbc".parse::<Algorithm>().unwrap(), Algorithm::Aes256Cbc);
        assert!("chacha".parse::<Algorithm>().is_err());
    }

    #[test]
    fn algorithm_wire_ids_are_stable() {
        assert_eq!(Algorithm::Aes256Cbc.id(), 1);
        assert_eq!(Algorithm::Fernet.id(), 2);
        assert_eq!(Algorithm::from_id(1), Some(Algorithm::Aes256Cbc));
        assert_eq!(Algorithm::from_id(2), Some(Algorithm::Fernet));
        assert_eq!(Algorithm::from_id(3), None);
    }
}
