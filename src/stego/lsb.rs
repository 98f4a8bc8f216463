// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Spatial-domain LSB codec.
//!
//! The embedded stream is a 32-bit big-endian payload length followed by the
//! payload bytes. Stream bits are written MSB-first into the low
//! `bits_per_channel` bits of each sample, walking samples in row-major,
//! channel-interleaved order (R,G,B[,A] per pixel): stream bit `p` lands in
//! bit `bits_per_channel - 1 - (p % bpc)` of sample `p / bpc`. Samples past
//! the end of the stream are untouched, so a trailing partial group leaves
//! the sample's remaining low bits as they were.
//!
//! Extraction is exact and lossless-carrier-only: one flipped low bit in the
//! covered range corrupts the payload.

use crate::pixels::PixelBuffer;
use crate::stego::bits::{BitReader, BitWriter};
use crate::stego::capacity::{validate_bits_per_channel, LENGTH_PREFIX_BITS};
use crate::stego::error::StegoError;

/// Embed `payload` into a copy of `carrier`.
///
/// # Errors
/// - [`StegoError::InvalidPlan`] if `bits_per_channel` is not 1..=3.
/// - [`StegoError::Format`] if the payload length does not fit the 32-bit
///   prefix.
/// - [`StegoError::CapacityExceeded`] if `32 + 8 * payload.len()` bits exceed
///   `sample_count * bits_per_channel`.
pub fn embed(
    carrier: &PixelBuffer,
    payload: &[u8],
    bits_per_channel: u8,
) -> Result<PixelBuffer, StegoError> {
    validate_bits_per_channel(bits_per_channel)?;
    if payload.len() as u64 > u32::MAX as u64 {
        return Err(StegoError::Format("payload length does not fit the 32-bit prefix"));
    }

    let bpc = bits_per_channel as usize;
    let needed_bits = LENGTH_PREFIX_BITS + payload.len() * 8;
    let available_bits = carrier.sample_count() * bpc;
    if needed_bits > available_bits {
        return Err(StegoError::CapacityExceeded { needed_bits, available_bits });
    }

    // lengthPrefix ‖ payload
    let mut stream = Vec::with_capacity(4 + payload.len());
    stream.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    stream.extend_from_slice(payload);

    let mut out = carrier.clone();
    let samples = out.samples_mut();
    let mut reader = BitReader::new(&stream);
    let mut p = 0usize;
    while reader.remaining() > 0 {
        let slot = bpc - 1 - (p % bpc);
        let mask = 1u8 << slot;
        samples[p / bpc] = (samples[p / bpc] & !mask) | (reader.next_bit() << slot);
        p += 1;
    }

    Ok(out)
}

/// Extract a payload embedded by [`embed`].
///
/// Recovers the 32-bit length prefix first, then reads exactly that many
/// payload bits.
///
/// # Errors
/// - [`StegoError::InvalidPlan`] if `bits_per_channel` is not 1..=3.
/// - [`StegoError::Format`] if the carrier cannot even hold the prefix, or
///   if the recovered length exceeds the carrier's theoretical maximum
///   (corrupt or non-stego image).
pub fn extract(carrier: &PixelBuffer, bits_per_channel: u8) -> Result<Vec<u8>, StegoError> {
    validate_bits_per_channel(bits_per_channel)?;

    let bpc = bits_per_channel as usize;
    let samples = carrier.samples();
    let available_bits = samples.len() * bpc;
    if available_bits < LENGTH_PREFIX_BITS {
        return Err(StegoError::Format("carrier too small for the length prefix"));
    }

    let stream_bit = |p: usize| -> u8 {
        let slot = bpc - 1 - (p % bpc);
        (samples[p / bpc] >> slot) & 1
    };

    // 1. Length prefix.
    let mut declared: u32 = 0;
    for p in 0..LENGTH_PREFIX_BITS {
        declared = (declared << 1) | u32::from(stream_bit(p));
    }
    let declared = declared as usize;

    // 2. Validate against the theoretical maximum before reading further.
    let max_bytes = (available_bits - LENGTH_PREFIX_BITS) / 8;
    if declared > max_bytes {
        return Err(StegoError::Format("recovered length exceeds carrier capacity"));
    }

    // 3. Exactly `declared` payload bytes.
    let mut writer = BitWriter::with_capacity(declared);
    for p in LENGTH_PREFIX_BITS..LENGTH_PREFIX_BITS + declared * 8 {
        writer.push_bit(stream_bit(p));
    }
    Ok(writer.into_bytes())
}
