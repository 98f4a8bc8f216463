// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Error types for the encryption envelope.
//!
//! [`EnvelopeError`] covers all failure modes from key derivation through
//! container parsing and decryption. No variant ever carries partial
//! plaintext or key material.

use core::fmt;

/// Errors that can occur while producing or consuming an encryption container.
#[derive(Debug)]
pub enum EnvelopeError {
    /// Key derivation was handed invalid inputs.
    KeyDerivation(&'static str),
    /// Authentication tag mismatch (wrong password or tampering).
    Authentication,
    /// PKCS7 unpadding failed (near-certain signal of a wrong password on the
    /// non-authenticated CBC mode).
    Padding,
    /// Malformed container bytes.
    Format(&'static str),
    /// The decrypted payload is not valid UTF-8 (text mode only).
    InvalidUtf8,
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyDerivation(reason) => write!(f, "key derivation failed: {reason}"),
            Self::Authentication => write!(f, "authentication failed (wrong password or tampered data)"),
            Self::Padding => write!(f, "invalid padding (wrong password?)"),
            Self::Format(reason) => write!(f, "malformed container: {reason}"),
            Self::InvalidUtf8 => write!(f, "decrypted text is not valid UTF-8"),
        }
    }
}

impl std::error::Error for EnvelopeError {}
