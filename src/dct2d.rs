// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! 8×8 block DCT.
//!
//! Provides the orthonormal 2-D DCT-II ([`forward_dct8`]) and its DCT-III
//! inverse ([`inverse_dct8`]) over `[f64; 64]` blocks in natural (row-major)
//! order. The block size is fixed at 8×8, so the transform pair is built from
//! the closed-form cosine matrices with no external numeric dependency.
//!
//! With the normalization used here the pair is exactly inverse:
//! `inverse_dct8(&forward_dct8(&b)) == b` up to f64 rounding, and energy is
//! preserved (Parseval).

use std::sync::OnceLock;

/// Pre-computed 8×8 cosine table.
/// `COSINE[u][x] = cos((2*x + 1) * u * PI / 16)`
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

/// Normalization constants: C(0) = 1/sqrt(8), C(u>0) = 1/2.
static NORM: OnceLock<[f64; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for u in 0..8 {
            for x in 0..8 {
                table[u][x] = ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

fn norm_table() -> &'static [f64; 8] {
    NORM.get_or_init(|| {
        let mut n = [0.5f64; 8];
        n[0] = 1.0 / (8.0f64).sqrt();
        n
    })
}

/// 2-D forward DCT (DCT-II) of an 8×8 block.
///
/// Input: 64 spatial samples in natural (row-major) order.
/// Output: 64 coefficients, `coeffs[v * 8 + u]` = frequency (v, u), with the
/// DC term at index 0.
pub fn forward_dct8(block: &[f64; 64]) -> [f64; 64] {
    let cos = cosine_table();
    let c = norm_table();

    // Separable transform: rows, then columns.
    let mut temp = [0.0f64; 64];
    for row in 0..8 {
        for u in 0..8 {
            let mut sum = 0.0;
            for x in 0..8 {
                sum += block[row * 8 + x] * cos[u][x];
            }
            temp[row * 8 + u] = c[u] * sum;
        }
    }

    let mut coeffs = [0.0f64; 64];
    for col in 0..8 {
        for v in 0..8 {
            let mut sum = 0.0;
            for y in 0..8 {
                sum += temp[y * 8 + col] * cos[v][y];
            }
            coeffs[v * 8 + col] = c[v] * sum;
        }
    }

    coeffs
}

/// 2-D inverse DCT (DCT-III) of an 8×8 coefficient block.
///
/// Exact inverse of [`forward_dct8`] up to f64 rounding.
pub fn inverse_dct8(coeffs: &[f64; 64]) -> [f64; 64] {
    let cos = cosine_table();
    let c = norm_table();

    // Separable inverse: columns, then rows.
    let mut temp = [0.0f64; 64];
    for col in 0..8 {
        for y in 0..8 {
            let mut sum = 0.0;
            for v in 0..8 {
                sum += c[v] * coeffs[v * 8 + col] * cos[v][y];
            }
            temp[y * 8 + col] = sum;
        }
    }

    let mut block = [0.0f64; 64];
    for row in 0..8 {
        for x in 0..8 {
            let mut sum = 0.0;
            for u in 0..8 {
                sum += c[u] * temp[row * 8 + u] * cos[u][x];
            }
            block[row * 8 + x] = sum;
        }
    }

    block
}
