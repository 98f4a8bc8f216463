// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Capacity accounting and embedding plans.
//!
//! Capacity is what a carrier can hold after reserving the 32-bit length
//! prefix:
//!
//! - LSB: `width × height × channels × bits_per_channel − 32` bits.
//! - DCT: `⌊width/8⌋ × ⌊height/8⌋ − 32` bits (one bit per full 8×8 block).
//!
//! Both saturate at zero when the carrier is smaller than the prefix cost.

use crate::pixels::PixelBuffer;
use crate::stego::error::StegoError;
use crate::stego::Method;

/// Bits reserved for the payload length prefix.
pub const LENGTH_PREFIX_BITS: usize = 32;

/// Smallest and largest supported LSB depth.
pub const MIN_BITS_PER_CHANNEL: u8 = 1;
pub const MAX_BITS_PER_CHANNEL: u8 = 3;

pub(crate) fn validate_bits_per_channel(bits_per_channel: u8) -> Result<(), StegoError> {
    if !(MIN_BITS_PER_CHANNEL..=MAX_BITS_PER_CHANNEL).contains(&bits_per_channel) {
        return Err(StegoError::InvalidPlan("bits per channel must be between 1 and 3"));
    }
    Ok(())
}

pub(crate) fn validate_strength(strength: f64) -> Result<(), StegoError> {
    if !strength.is_finite() || strength <= 0.0 {
        return Err(StegoError::InvalidPlan("strength must be a positive finite value"));
    }
    Ok(())
}

/// LSB payload capacity in bits, after the length prefix.
///
/// # Errors
/// [`StegoError::InvalidPlan`] if `bits_per_channel` is not 1..=3.
pub fn lsb_capacity_bits(carrier: &PixelBuffer, bits_per_channel: u8) -> Result<usize, StegoError> {
    validate_bits_per_channel(bits_per_channel)?;
    Ok((carrier.sample_count() * bits_per_channel as usize).saturating_sub(LENGTH_PREFIX_BITS))
}

/// DCT payload capacity in bits, after the length prefix.
pub fn dct_capacity_bits(carrier: &PixelBuffer) -> usize {
    let blocks = (carrier.width() as usize / 8) * (carrier.height() as usize / 8);
    blocks.saturating_sub(LENGTH_PREFIX_BITS)
}

/// A validated embedding plan for one carrier, derived at request time and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingPlan {
    pub method: Method,
    /// LSB depth (1..=3). Ignored by the DCT method.
    pub bits_per_channel: u8,
    /// DCT quantization step. Ignored by the LSB method.
    pub strength: f64,
    /// Maximum payload size in whole bytes.
    pub capacity_bytes: usize,
}

impl EmbeddingPlan {
    /// Derive a plan for `carrier`, validating the parameters.
    ///
    /// # Errors
    /// [`StegoError::InvalidPlan`] on an out-of-range `bits_per_channel` or a
    /// non-positive `strength`.
    pub fn new(
        carrier: &PixelBuffer,
        method: Method,
        bits_per_channel: u8,
        strength: f64,
    ) -> Result<Self, StegoError> {
        let capacity_bits = match method {
            Method::Lsb => lsb_capacity_bits(carrier, bits_per_channel)?,
            Method::Dct => {
                validate_strength(strength)?;
                dct_capacity_bits(carrier)
            }
        };
        Ok(Self {
            method,
            bits_per_channel,
            strength,
            capacity_bytes: capacity_bits / 8,
        })
    }
}
