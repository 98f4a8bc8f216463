// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Steganography round-trip suite.
//!
//! LSB exactness, DCT bucket-parity robustness, capacity boundaries, and the
//! full hide/reveal pipeline with encrypt-first payloads.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use veil_core::dct2d::{forward_dct8, inverse_dct8};
use veil_core::stego::dct::{COEFF_COL, COEFF_ROW, EMBED_CHANNEL};
use veil_core::stego::{dct, lsb};
use veil_core::{
    hide, reveal, Algorithm, EmbeddingPlan, Encryption, HideOptions, Method, PixelBuffer,
    RevealOptions, StegoError,
};

/// Deterministic mid-range noisy carrier (no samples near the 0/255 rails).
fn noisy_carrier(width: u32, height: u32, channels: u8, seed: u64) -> PixelBuffer {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let n = width as usize * height as usize * channels as usize;
    let data: Vec<u8> = (0..n).map(|_| 60 + (rng.next_u32() % 120) as u8).collect();
    PixelBuffer::new(width, height, channels, data).unwrap()
}

fn random_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}

// ──────────────────────────────────────────────────────────────────────────
// LSB
// ──────────────────────────────────────────────────────────────────────────

#[test]
fn lsb_exact_roundtrip_random_payloads() {
    for seed in 0..8u64 {
        let carrier = noisy_carrier(128, 96, 3, seed);
        for bpc in 1..=3u8 {
            let capacity =
                EmbeddingPlan::new(&carrier, Method::Lsb, bpc, 10.0).unwrap().capacity_bytes;
            let payload = random_payload(capacity / 2, seed * 10 + bpc as u64);
            let stego = lsb::embed(&carrier, &payload, bpc).unwrap();
            assert_eq!(lsb::extract(&stego, bpc).unwrap(), payload, "seed={seed} bpc={bpc}");
        }
    }
}

#[test]
fn lsb_large_payload_roundtrip() {
    // 640×480 RGB at 1 bpc holds 115 193 bytes; use a 100 000-byte payload.
    let carrier = noisy_carrier(640, 480, 3, 42);
    let payload = random_payload(100_000, 43);
    let stego = lsb::embed(&carrier, &payload, 1).unwrap();
    assert_eq!(lsb::extract(&stego, 1).unwrap(), payload);
}

#[test]
fn lsb_capacity_boundary_64x64_rgb() {
    // 12 288 samples at 1 bpc → 12 256 payload bits → 1532 bytes fit,
    // 1533 do not.
    let carrier = noisy_carrier(64, 64, 3, 1);
    let plan = EmbeddingPlan::new(&carrier, Method::Lsb, 1, 10.0).unwrap();
    assert_eq!(plan.capacity_bytes, 1532);

    let fits = random_payload(1532, 2);
    let stego = lsb::embed(&carrier, &fits, 1).unwrap();
    assert_eq!(lsb::extract(&stego, 1).unwrap(), fits);

    let too_big = random_payload(1533, 3);
    assert!(matches!(
        lsb::embed(&carrier, &too_big, 1),
        Err(StegoError::CapacityExceeded { .. })
    ));
}

#[test]
fn lsb_rgba_alpha_channel_carries_bits_too() {
    let carrier = noisy_carrier(32, 32, 4, 5);
    let payload = random_payload(400, 6);
    let stego = lsb::embed(&carrier, &payload, 1).unwrap();
    assert_eq!(lsb::extract(&stego, 1).unwrap(), payload);
}

// ──────────────────────────────────────────────────────────────────────────
// DCT
// ──────────────────────────────────────────────────────────────────────────

#[test]
fn dct_roundtrip_random_payloads() {
    for seed in 0..4u64 {
        let carrier = noisy_carrier(256, 256, 3, seed); // 1024 blocks, 124 B
        let payload = random_payload(100, seed + 50);
        for strength in [6.0, 10.0, 16.0] {
            let stego = dct::embed(&carrier, &payload, strength).unwrap();
            assert_eq!(
                dct::extract(&stego, strength).unwrap(),
                payload,
                "seed={seed} strength={strength}"
            );
        }
    }
}

#[test]
fn dct_capacity_boundary() {
    let carrier = noisy_carrier(160, 160, 3, 9); // 400 blocks → 46 bytes
    let plan = EmbeddingPlan::new(&carrier, Method::Dct, 1, 10.0).unwrap();
    assert_eq!(plan.capacity_bytes, 46);

    let fits = random_payload(46, 10);
    let stego = dct::embed(&carrier, &fits, 10.0).unwrap();
    assert_eq!(dct::extract(&stego, 10.0).unwrap(), fits);

    assert!(matches!(
        dct::embed(&carrier, &random_payload(47, 11), 10.0),
        Err(StegoError::CapacityExceeded { .. })
    ));
}

/// Shift the monitored coefficient of every full block by `delta`, the way a
/// lossy re-encode would drift it.
fn perturb_monitored_coefficient(carrier: &PixelBuffer, delta: f64) -> PixelBuffer {
    let mut out = carrier.clone();
    let blocks_wide = carrier.width() as usize / 8;
    let blocks_tall = carrier.height() as usize / 8;
    for by in 0..blocks_tall {
        for bx in 0..blocks_wide {
            let mut block = [0.0f64; 64];
            for row in 0..8 {
                for col in 0..8 {
                    let (x, y) = ((bx * 8 + col) as u32, (by * 8 + row) as u32);
                    block[row * 8 + col] = f64::from(carrier.sample(x, y, EMBED_CHANNEL));
                }
            }
            let mut coeffs = forward_dct8(&block);
            coeffs[COEFF_ROW * 8 + COEFF_COL] += delta;
            let pixels = inverse_dct8(&coeffs);
            for row in 0..8 {
                for col in 0..8 {
                    let (x, y) = ((bx * 8 + col) as u32, (by * 8 + row) as u32);
                    let v = pixels[row * 8 + col].round().clamp(0.0, 255.0) as u8;
                    out.set_sample(x, y, EMBED_CHANNEL, v);
                }
            }
        }
    }
    out
}

#[test]
fn dct_survives_sub_half_step_coefficient_drift() {
    let strength = 16.0;
    let carrier = noisy_carrier(160, 160, 3, 12);
    let payload = random_payload(40, 13);
    let stego = dct::embed(&carrier, &payload, strength).unwrap();

    // A quarter-step shift stays well inside the parity decision region even
    // with the integer-rounding noise of two pixel-domain passes.
    let drifted = perturb_monitored_coefficient(&stego, strength * 0.25);
    assert_eq!(dct::extract(&drifted, strength).unwrap(), payload);

    let drifted_down = perturb_monitored_coefficient(&stego, -strength * 0.25);
    assert_eq!(dct::extract(&drifted_down, strength).unwrap(), payload);
}

#[test]
fn dct_drift_beyond_half_step_corrupts() {
    // A 3/4-step shift pushes every coefficient into the neighboring bucket:
    // all bits flip, the recovered length prefix becomes the complement of
    // the real one and exceeds the carrier bound. Documented behavior, not a
    // bug: there is no corruption signal beyond the length check.
    let strength = 16.0;
    let carrier = noisy_carrier(160, 160, 3, 14);
    let payload = random_payload(20, 15);
    let stego = dct::embed(&carrier, &payload, strength).unwrap();

    let drifted = perturb_monitored_coefficient(&stego, strength * 0.75);
    assert!(matches!(
        dct::extract(&drifted, strength),
        Err(StegoError::DecodeMismatch { .. })
    ));
}

#[test]
fn dct_strength_must_match_between_embed_and_extract() {
    let carrier = noisy_carrier(160, 160, 3, 16);
    let payload = random_payload(30, 17);
    let stego = dct::embed(&carrier, &payload, 10.0).unwrap();
    // A mismatched step misreads buckets; whatever comes back, it is not the
    // payload handed to embed.
    match dct::extract(&stego, 7.0) {
        Ok(bytes) => assert_ne!(bytes, payload),
        Err(_) => {}
    }
}

// ──────────────────────────────────────────────────────────────────────────
// Pipeline
// ──────────────────────────────────────────────────────────────────────────

#[test]
fn hide_reveal_encrypted_lsb_both_algorithms() {
    let carrier = noisy_carrier(96, 96, 3, 20);
    for algorithm in [Algorithm::Aes256Cbc, Algorithm::Fernet] {
        let options = HideOptions {
            encryption: Some(Encryption {
                password: "correct horse".to_string(),
                algorithm,
            }),
            ..HideOptions::default()
        };
        let stego = hide(&carrier, b"attack at dawn", &options).unwrap();
        let out = reveal(
            &stego,
            &RevealOptions {
                password: Some("correct horse".to_string()),
                ..RevealOptions::default()
            },
        )
        .unwrap();
        assert_eq!(out, b"attack at dawn", "algorithm={algorithm:?}");
    }
}

#[test]
fn hide_reveal_encrypted_dct() {
    let carrier = noisy_carrier(256, 256, 3, 21); // 1024 blocks, 124 B capacity
    let options = HideOptions {
        method: Method::Dct,
        encryption: Some(Encryption {
            password: "pw".to_string(),
            algorithm: Algorithm::Fernet,
        }),
        ..HideOptions::default()
    };
    let stego = hide(&carrier, b"frequency domain", &options).unwrap();
    let out = reveal(
        &stego,
        &RevealOptions {
            method: Method::Dct,
            password: Some("pw".to_string()),
            ..RevealOptions::default()
        },
    )
    .unwrap();
    assert_eq!(out, b"frequency domain");
}

#[test]
fn modified_carrier_keeps_dimensions_and_unrelated_bytes() {
    let carrier = noisy_carrier(64, 64, 3, 22);
    let stego = hide(&carrier, b"tiny", &HideOptions::default()).unwrap();
    assert_eq!(stego.width(), carrier.width());
    assert_eq!(stego.height(), carrier.height());
    assert_eq!(stego.channels(), carrier.channels());
    // At bpc=1 only the low bit of covered samples may differ.
    for (a, b) in carrier.samples().iter().zip(stego.samples()) {
        assert!(a == b || a ^ b == 1);
    }
}
