// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Password-based key derivation.
//!
//! PBKDF2 with HMAC-SHA256. Derivation is deterministic for identical
//! (password, salt, iterations, length); salts come from the process CSPRNG
//! and are never reused across independent encryptions (every encrypt call
//! draws a fresh one).

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::envelope::error::EnvelopeError;

/// PBKDF2 iteration count used by all envelope modes.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (both modes derive 32 bytes; the Fernet-style
/// mode splits them into signing and encryption halves).
pub const KEY_LEN: usize = 32;

/// Derive `out_len` key bytes from a password and salt.
///
/// # Errors
/// [`EnvelopeError::KeyDerivation`] on an empty password or a zero iteration
/// count. All other inputs derive deterministically.
pub fn derive(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    out_len: usize,
) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
    if password.is_empty() {
        return Err(EnvelopeError::KeyDerivation("password must not be empty"));
    }
    if iterations == 0 {
        return Err(EnvelopeError::KeyDerivation("iteration count must be positive"));
    }

    let mut key = Zeroizing::new(vec![0u8; out_len]);
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
    Ok(key)
}

/// Generate a fresh random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
