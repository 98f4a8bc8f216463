// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Block-cipher and MAC primitives for the envelope modes.
//!
//! Thin free functions over the RustCrypto CBC construction:
//!
//! - AES-256-CBC with PKCS7 padding (the plain, unauthenticated mode).
//! - AES-128-CBC with PKCS7 padding plus HMAC-SHA256 (the Fernet-style
//!   authenticated mode; the MAC is computed over the serialized container
//!   prefix by the caller).
//!
//! Tag verification is constant-time via `Mac::verify_slice` and always
//! happens before any decryption.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::envelope::error::EnvelopeError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Cipher block and IV length in bytes.
pub const BLOCK_LEN: usize = 16;

/// IV length in bytes (one cipher block).
pub const IV_LEN: usize = 16;

/// HMAC-SHA256 tag length in bytes.
pub const TAG_LEN: usize = 32;

/// Generate a fresh random IV.
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}

/// AES-256-CBC encrypt with PKCS7 padding.
pub fn aes256_cbc_encrypt(key: &[u8], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    Aes256CbcEnc::new_from_slices(key, iv)
        .expect("valid AES-256 key and IV length")
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// AES-256-CBC decrypt with PKCS7 unpadding.
///
/// # Errors
/// - [`EnvelopeError::Format`] if the ciphertext length is not a positive
///   multiple of the block size.
/// - [`EnvelopeError::Padding`] if unpadding fails.
pub fn aes256_cbc_decrypt(
    key: &[u8],
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, EnvelopeError> {
    check_ciphertext_len(ciphertext)?;
    Aes256CbcDec::new_from_slices(key, iv)
        .expect("valid AES-256 key and IV length")
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EnvelopeError::Padding)
}

/// AES-128-CBC encrypt with PKCS7 padding (Fernet-style mode).
pub fn aes128_cbc_encrypt(key: &[u8], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    Aes128CbcEnc::new_from_slices(key, iv)
        .expect("valid AES-128 key and IV length")
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// AES-128-CBC decrypt with PKCS7 unpadding (Fernet-style mode).
///
/// # Errors
/// Same as [`aes256_cbc_decrypt`].
pub fn aes128_cbc_decrypt(
    key: &[u8],
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, EnvelopeError> {
    check_ciphertext_len(ciphertext)?;
    Aes128CbcDec::new_from_slices(key, iv)
        .expect("valid AES-128 key and IV length")
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EnvelopeError::Padding)
}

/// Compute the HMAC-SHA256 authentication tag over `data`.
pub fn compute_tag(signing_key: &[u8], data: &[u8]) -> [u8; TAG_LEN] {
    let mut mac = HmacSha256::new_from_slice(signing_key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Verify an HMAC-SHA256 tag in constant time.
///
/// # Errors
/// [`EnvelopeError::Authentication`] on mismatch.
pub fn verify_tag(signing_key: &[u8], data: &[u8], tag: &[u8]) -> Result<(), EnvelopeError> {
    let mut mac = HmacSha256::new_from_slice(signing_key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.verify_slice(tag).map_err(|_| EnvelopeError::Authentication)
}

fn check_ciphertext_len(ciphertext: &[u8]) -> Result<(), EnvelopeError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(EnvelopeError::Format(
            "ciphertext length is not a positive multiple of the cipher block size",
        ));
    }
    Ok(())
}
