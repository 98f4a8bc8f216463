// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Statistical detection heuristics.
//!
//! [`detect`] estimates whether a carrier likely holds embedded data and
//! returns a confidence score in `[0, 1]`. The score is an estimator, not a
//! proof, and explicitly not a boolean. Callers apply their own threshold.
//!
//! - **LSB**: the pair-of-values chi-square test. Embedding high-entropy data
//!   equalizes the histogram counts of each value pair (2k, 2k+1), so a small
//!   chi-square statistic (relative to its degrees of freedom) is evidence of
//!   embedding. The score is the chi-square survival probability, computed
//!   with the Wilson–Hilferty cube-root normal approximation.
//! - **DCT**: the monitored coefficient's fractional offset from the nearest
//!   multiple of `strength`. Unmodified images spread the offset roughly
//!   uniformly over `[0, 0.5]` (mean 0.25); quantization embedding collapses
//!   it toward 0. The score is the mean offset's normalized distance below
//!   the uniform baseline.

use rayon::prelude::*;

use crate::dct2d::forward_dct8;
use crate::pixels::PixelBuffer;
use crate::stego::capacity::validate_strength;
use crate::stego::dct::{COEFF_COL, COEFF_ROW, EMBED_CHANNEL};
use crate::stego::error::StegoError;
use crate::stego::Method;

/// Estimate the likelihood that `carrier` holds data embedded with `method`.
///
/// `strength` is only consulted for the DCT method and must match the
/// suspected embedding step.
///
/// # Errors
/// [`StegoError::InvalidPlan`] if `strength` is not positive and finite
/// (DCT only).
pub fn detect(carrier: &PixelBuffer, method: Method, strength: f64) -> Result<f64, StegoError> {
    match method {
        Method::Lsb => Ok(lsb_chi_square_score(carrier)),
        Method::Dct => {
            validate_strength(strength)?;
            Ok(dct_offset_score(carrier, strength))
        }
    }
}

/// Pair-of-values chi-square score over the full sample histogram.
///
/// Returns the survival probability of the chi-square statistic: near 1 when
/// pair counts are as equalized as uniform embedded bits would leave them,
/// near 0 for the skewed histograms of natural images.
pub fn lsb_chi_square_score(carrier: &PixelBuffer) -> f64 {
    let mut hist = [0u64; 256];
    for &s in carrier.samples() {
        hist[s as usize] += 1;
    }

    let mut chi2 = 0.0f64;
    let mut used_pairs = 0usize;
    for k in 0..128 {
        let a = hist[2 * k] as f64;
        let b = hist[2 * k + 1] as f64;
        if a + b > 0.0 {
            // (a - e)^2/e + (b - e)^2/e with e = (a+b)/2 reduces to:
            chi2 += (a - b) * (a - b) / (a + b);
            used_pairs += 1;
        }
    }

    if used_pairs < 2 {
        return 0.0;
    }
    chi_square_survival(chi2, (used_pairs - 1) as f64)
}

/// Mean fractional coefficient offset score.
///
/// Computes `|c/strength - round(c/strength)|` for the monitored coefficient
/// of every full 8×8 block and maps the mean's distance below the
/// uniform-null baseline of 0.25 onto `[0, 1]`.
pub fn dct_offset_score(carrier: &PixelBuffer, strength: f64) -> f64 {
    let blocks_wide = carrier.width() as usize / 8;
    let blocks_tall = carrier.height() as usize / 8;
    let total_blocks = blocks_wide * blocks_tall;
    if total_blocks == 0 {
        return 0.0;
    }

    let offset_sum: f64 = (0..total_blocks)
        .into_par_iter()
        .map(|i| {
            let (bx, by) = (i % blocks_wide, i / blocks_wide);
            let mut block = [0.0f64; 64];
            for row in 0..8 {
                for col in 0..8 {
                    let x = (bx * 8 + col) as u32;
                    let y = (by * 8 + row) as u32;
                    block[row * 8 + col] = f64::from(carrier.sample(x, y, EMBED_CHANNEL));
                }
            }
            let coeffs = forward_dct8(&block);
            let scaled = coeffs[COEFF_ROW * 8 + COEFF_COL] / strength;
            (scaled - scaled.round()).abs()
        })
        .sum();

    let mean = offset_sum / total_blocks as f64;
    (1.0 - mean / 0.25).clamp(0.0, 1.0)
}

// ──────────────────────────────────────────────────────────────────────────
// Chi-square survival via Wilson–Hilferty + Abramowitz–Stegun erf.
// ──────────────────────────────────────────────────────────────────────────

/// Abramowitz & Stegun 7.1.26 erf polynomial coefficients (max error 1.5e-7).
const ERF_P: f64 = 0.3275911;
const ERF_A1: f64 = 0.254829592;
const ERF_A2: f64 = -0.284496736;
const ERF_A3: f64 = 1.421413741;
const ERF_A4: f64 = -1.453152027;
const ERF_A5: f64 = 1.061405429;

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + ERF_P * x);
    let poly = ((((ERF_A5 * t + ERF_A4) * t + ERF_A3) * t + ERF_A2) * t + ERF_A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// P(X > chi2) for a chi-square variable with `df` degrees of freedom.
///
/// Wilson–Hilferty: (X/df)^(1/3) is approximately normal with mean
/// `1 - 2/(9 df)` and variance `2/(9 df)`.
fn chi_square_survival(chi2: f64, df: f64) -> f64 {
    debug_assert!(df >= 1.0);
    let t = (chi2 / df).cbrt();
    let mu = 1.0 - 2.0 / (9.0 * df);
    let sigma = (2.0 / (9.0 * df)).sqrt();
    (1.0 - normal_cdf((t - mu) / sigma)).clamp(0.0, 1.0)
}
