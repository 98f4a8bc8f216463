// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Hide/reveal pipeline.
//!
//! One-call operations combining the optional encryption envelope with either
//! embedding codec:
//!
//! - [`hide`]: optionally seals the payload in an encryption container, then
//!   embeds the bytes with the requested method.
//! - [`reveal`]: extracts the embedded bytes; when they begin with the
//!   container magic they are treated as a container and decrypted with the
//!   supplied password, otherwise they are returned as-is.
//!
//! Each call owns its carrier and payload copies for its duration; there is
//! no shared state across requests and no suspension mid-transform.

use tracing::debug;

use crate::envelope::{self, container::MAGIC, Algorithm};
use crate::pixels::PixelBuffer;
use crate::stego::capacity::EmbeddingPlan;
use crate::stego::dct::{self, DEFAULT_STRENGTH};
use crate::stego::error::StegoError;
use crate::stego::lsb;
use crate::stego::Method;

/// Encrypt-first settings for [`hide`].
#[derive(Debug, Clone)]
pub struct Encryption {
    pub password: String,
    pub algorithm: Algorithm,
}

/// Options for [`hide`].
#[derive(Debug, Clone)]
pub struct HideOptions {
    pub method: Method,
    /// LSB depth (1..=3). Ignored by the DCT method.
    pub bits_per_channel: u8,
    /// DCT quantization step. Ignored by the LSB method.
    pub strength: f64,
    /// When set, the payload is envelope-encrypted before embedding.
    pub encryption: Option<Encryption>,
}

impl Default for HideOptions {
    fn default() -> Self {
        Self {
            method: Method::Lsb,
            bits_per_channel: 1,
            strength: DEFAULT_STRENGTH,
            encryption: None,
        }
    }
}

/// Options for [`reveal`]. Method and parameters must match the hide call.
#[derive(Debug, Clone)]
pub struct RevealOptions {
    pub method: Method,
    pub bits_per_channel: u8,
    pub strength: f64,
    /// Required when the embedded payload is an encryption container.
    pub password: Option<String>,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            method: Method::Lsb,
            bits_per_channel: 1,
            strength: DEFAULT_STRENGTH,
            password: None,
        }
    }
}

/// Hide `payload` in a copy of `carrier`.
///
/// # Errors
/// - [`StegoError::InvalidPlan`] on out-of-range parameters.
/// - [`StegoError::CapacityExceeded`] if the (possibly encrypted) payload
///   does not fit.
/// - [`StegoError::Envelope`] if encryption fails (e.g. empty password).
pub fn hide(
    carrier: &PixelBuffer,
    payload: &[u8],
    options: &HideOptions,
) -> Result<PixelBuffer, StegoError> {
    // 1. Validate the plan before any heavy work.
    let plan = EmbeddingPlan::new(carrier, options.method, options.bits_per_channel, options.strength)?;

    // 2. Optionally seal the payload in an encryption container.
    let embedded: Vec<u8> = match &options.encryption {
        Some(enc) => envelope::seal(payload, &enc.password, enc.algorithm)?,
        None => payload.to_vec(),
    };

    debug!(
        method = ?options.method,
        payload_len = payload.len(),
        embedded_len = embedded.len(),
        capacity_bytes = plan.capacity_bytes,
        encrypted = options.encryption.is_some(),
        "stego hide"
    );

    // 3. Embed with the chosen codec.
    match options.method {
        Method::Lsb => lsb::embed(carrier, &embedded, options.bits_per_channel),
        Method::Dct => dct::embed(carrier, &embedded, options.strength),
    }
}

/// Recover a payload hidden by [`hide`].
///
/// Extracted bytes that begin with the container magic are decrypted first;
/// [`StegoError::PasswordRequired`] is returned if no password was supplied
/// for such a payload. A payload that happens to begin with the magic but was
/// embedded without encryption is indistinguishable from a container and is
/// treated as one.
pub fn reveal(carrier: &PixelBuffer, options: &RevealOptions) -> Result<Vec<u8>, StegoError> {
    // 1. Extract the raw embedded bytes.
    let raw = match options.method {
        Method::Lsb => lsb::extract(carrier, options.bits_per_channel)?,
        Method::Dct => dct::extract(carrier, options.strength)?,
    };

    // 2. Container sniff: decrypt when the envelope magic leads.
    if raw.len() >= MAGIC.len() && raw[..MAGIC.len()] == MAGIC {
        let password = options
            .password
            .as_deref()
            .ok_or(StegoError::PasswordRequired)?;
        debug!(method = ?options.method, raw_len = raw.len(), "stego reveal (encrypted)");
        return Ok(envelope::open(&raw, password)?);
    }

    debug!(method = ?options.method, raw_len = raw.len(), "stego reveal (plain)");
    Ok(raw)
}
