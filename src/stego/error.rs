// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Error types for the steganography layer.
//!
//! [`StegoError`] covers all failure modes from carrier validation through
//! embedding, extraction and envelope decryption of extracted payloads.

use core::fmt;

use crate::envelope::EnvelopeError;
use crate::pixels::PixelError;

/// Errors that can occur during steganographic embedding or extraction.
#[derive(Debug)]
pub enum StegoError {
    /// The carrier pixel buffer is malformed.
    InvalidCarrier(PixelError),
    /// The embedding parameters are out of range (bits per channel, strength).
    InvalidPlan(&'static str),
    /// The payload does not fit the carrier with the chosen method.
    CapacityExceeded {
        needed_bits: usize,
        available_bits: usize,
    },
    /// The carrier holds no decodable stego header (corrupt or non-stego
    /// image).
    Format(&'static str),
    /// The extracted bits are inconsistent: the recovered length prefix
    /// exceeds what the carrier could possibly hold.
    DecodeMismatch {
        declared_bytes: usize,
        max_bytes: usize,
    },
    /// The extracted payload is an encryption container but no password was
    /// supplied.
    PasswordRequired,
    /// Decrypting the extracted payload failed.
    Envelope(EnvelopeError),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCarrier(e) => write!(f, "invalid carrier: {e}"),
            Self::InvalidPlan(reason) => write!(f, "invalid embedding plan: {reason}"),
            Self::CapacityExceeded { needed_bits, available_bits } => write!(
                f,
                "payload needs {needed_bits} bits but the carrier holds {available_bits}"
            ),
            Self::Format(reason) => write!(f, "no decodable payload: {reason}"),
            Self::DecodeMismatch { declared_bytes, max_bytes } => write!(
                f,
                "recovered length {declared_bytes} exceeds the carrier bound of {max_bytes} bytes"
            ),
            Self::PasswordRequired => write!(f, "extracted payload is encrypted; a password is required"),
            Self::Envelope(e) => write!(f, "envelope error: {e}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCarrier(e) => Some(e),
            Self::Envelope(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PixelError> for StegoError {
    fn from(e: PixelError) -> Self {
        Self::InvalidCarrier(e)
    }
}

impl From<EnvelopeError> for StegoError {
    fn from(e: EnvelopeError) -> Self {
        Self::Envelope(e)
    }
}
