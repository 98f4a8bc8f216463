// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Frequency-domain DCT codec.
//!
//! Partitions one carrier channel into non-overlapping 8×8 blocks in
//! row-major order and embeds one stream bit per block by forcing a fixed
//! mid-frequency coefficient into the quantization bucket whose parity
//! matches the bit: the coefficient is rounded to the nearest multiple of
//! `strength` with the required parity (even multiple = bit 0, odd = bit 1).
//! The stream layout is the same 32-bit length prefix ‖ payload as the LSB
//! codec, MSB-first.
//!
//! Extraction only needs the coefficient's bucket parity, so drift below
//! `strength / 2` per coefficient (mild recompression, small pixel noise) is
//! tolerated. Larger drift flips bits with no corruption signal: there is no
//! cross-block checksum; callers add their own or accept best-effort
//! recovery. Blocks whose samples sit at the 0/255 rails can clamp away part
//! of the adjustment; mid-range carriers round-trip exactly.

use rayon::prelude::*;

use crate::dct2d::{forward_dct8, inverse_dct8};
use crate::pixels::PixelBuffer;
use crate::stego::bits::{BitReader, BitWriter};
use crate::stego::capacity::{validate_strength, LENGTH_PREFIX_BITS};
use crate::stego::error::StegoError;

/// Default quantization step.
pub const DEFAULT_STRENGTH: f64 = 10.0;

/// Monitored coefficient position within each 8×8 block: row 2, column 3.
/// Mid-frequency, away from the DC term and from the high-frequency corner
/// that typical compression destroys.
pub const COEFF_ROW: usize = 2;
pub const COEFF_COL: usize = 3;

const COEFF_INDEX: usize = COEFF_ROW * 8 + COEFF_COL;

/// Carrier channel the codec reads and writes (blue in RGB/RGBA order).
pub const EMBED_CHANNEL: u8 = 2;

/// Embed `payload` into a copy of `carrier`, one bit per 8×8 block.
///
/// # Errors
/// - [`StegoError::InvalidPlan`] if `strength` is not positive and finite.
/// - [`StegoError::Format`] if the payload length does not fit the 32-bit
///   prefix.
/// - [`StegoError::CapacityExceeded`] if `32 + 8 * payload.len()` bits exceed
///   `⌊width/8⌋ × ⌊height/8⌋` blocks.
pub fn embed(
    carrier: &PixelBuffer,
    payload: &[u8],
    strength: f64,
) -> Result<PixelBuffer, StegoError> {
    validate_strength(strength)?;
    if payload.len() as u64 > u32::MAX as u64 {
        return Err(StegoError::Format("payload length does not fit the 32-bit prefix"));
    }

    let blocks_wide = carrier.width() as usize / 8;
    let total_blocks = blocks_wide * (carrier.height() as usize / 8);
    let needed_bits = LENGTH_PREFIX_BITS + payload.len() * 8;
    if needed_bits > total_blocks {
        return Err(StegoError::CapacityExceeded {
            needed_bits,
            available_bits: total_blocks,
        });
    }

    // lengthPrefix ‖ payload, MSB-first.
    let mut stream = Vec::with_capacity(4 + payload.len());
    stream.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    stream.extend_from_slice(payload);
    let mut reader = BitReader::new(&stream);
    let bits: Vec<u8> = (0..needed_bits).map(|_| reader.next_bit()).collect();

    // Transform the carrying blocks in parallel, then write back.
    let updates: Vec<[u8; 64]> = bits
        .par_iter()
        .enumerate()
        .map(|(i, &bit)| {
            let block = load_block(carrier, i % blocks_wide, i / blocks_wide);
            let mut coeffs = forward_dct8(&block);
            coeffs[COEFF_INDEX] = quantize_to_parity(coeffs[COEFF_INDEX], strength, bit);
            let pixels = inverse_dct8(&coeffs);
            let mut rounded = [0u8; 64];
            for (dst, &src) in rounded.iter_mut().zip(pixels.iter()) {
                *dst = src.round().clamp(0.0, 255.0) as u8;
            }
            rounded
        })
        .collect();

    let mut out = carrier.clone();
    for (i, block) in updates.iter().enumerate() {
        store_block(&mut out, i % blocks_wide, i / blocks_wide, block);
    }
    Ok(out)
}

/// Extract a payload embedded by [`embed`]. `strength` must match the value
/// used at embed time.
///
/// # Errors
/// - [`StegoError::InvalidPlan`] if `strength` is not positive and finite.
/// - [`StegoError::Format`] if the carrier has fewer blocks than the length
///   prefix needs.
/// - [`StegoError::DecodeMismatch`] if the recovered length exceeds the
///   carrier's block budget (corrupt or non-stego image).
pub fn extract(carrier: &PixelBuffer, strength: f64) -> Result<Vec<u8>, StegoError> {
    validate_strength(strength)?;

    let blocks_wide = carrier.width() as usize / 8;
    let total_blocks = blocks_wide * (carrier.height() as usize / 8);
    if total_blocks < LENGTH_PREFIX_BITS {
        return Err(StegoError::Format("carrier too small for the length prefix"));
    }

    // 1. Length prefix from the first 32 blocks.
    let mut declared: u32 = 0;
    for i in 0..LENGTH_PREFIX_BITS {
        declared = (declared << 1) | u32::from(block_bit(carrier, blocks_wide, i, strength));
    }
    let declared = declared as usize;

    // 2. Validate against the block budget before reading further.
    let max_bytes = (total_blocks - LENGTH_PREFIX_BITS) / 8;
    if declared > max_bytes {
        return Err(StegoError::DecodeMismatch {
            declared_bytes: declared,
            max_bytes,
        });
    }

    // 3. Exactly `declared` payload bytes, one bit per block.
    let payload_bits: Vec<u8> = (0..declared * 8)
        .into_par_iter()
        .map(|k| block_bit(carrier, blocks_wide, LENGTH_PREFIX_BITS + k, strength))
        .collect();
    let mut writer = BitWriter::with_capacity(declared);
    for bit in payload_bits {
        writer.push_bit(bit);
    }
    Ok(writer.into_bytes())
}

/// Read the bit carried by block `i` (row-major block order).
fn block_bit(carrier: &PixelBuffer, blocks_wide: usize, i: usize, strength: f64) -> u8 {
    let block = load_block(carrier, i % blocks_wide, i / blocks_wide);
    let coeffs = forward_dct8(&block);
    parity((coeffs[COEFF_INDEX] / strength).round())
}

/// Round `coeff` to the nearest multiple of `strength` whose multiple index
/// has the parity of `bit`. Ties between the two neighboring candidates
/// resolve away from zero.
fn quantize_to_parity(coeff: f64, strength: f64, bit: u8) -> f64 {
    let scaled = coeff / strength;
    let nearest = scaled.round();
    let q = if parity(nearest) == bit {
        nearest
    } else {
        let down = nearest - 1.0;
        let up = nearest + 1.0;
        let d_down = (scaled - down).abs();
        let d_up = (up - scaled).abs();
        if d_down < d_up {
            down
        } else if d_up < d_down {
            up
        } else if scaled >= 0.0 {
            up
        } else {
            down
        }
    };
    q * strength
}

fn parity(q: f64) -> u8 {
    (q as i64).rem_euclid(2) as u8
}

/// Load the embedding channel of the 8×8 block at (bx, by) as f64.
fn load_block(carrier: &PixelBuffer, bx: usize, by: usize) -> [f64; 64] {
    let mut block = [0.0f64; 64];
    for row in 0..8 {
        for col in 0..8 {
            let x = (bx * 8 + col) as u32;
            let y = (by * 8 + row) as u32;
            block[row * 8 + col] = f64::from(carrier.sample(x, y, EMBED_CHANNEL));
        }
    }
    block
}

/// Write the embedding channel of the 8×8 block at (bx, by).
fn store_block(carrier: &mut PixelBuffer, bx: usize, by: usize, block: &[u8; 64]) {
    for row in 0..8 {
        for col in 0..8 {
            let x = (bx * 8 + col) as u32;
            let y = (by * 8 + row) as u32;
            carrier.set_sample(x, y, EMBED_CHANNEL, block[row * 8 + col]);
        }
    }
}
