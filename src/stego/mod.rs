// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Steganographic embedding and extraction.
//!
//! Two embedding domains over the same stream layout (32-bit big-endian
//! length prefix ‖ payload, MSB-first):
//!
//! - **LSB** ([`lsb`]): spatial substitution into the low 1–3 bits of each
//!   sample, walking samples in row-major, channel-interleaved order. Exact
//!   and lossless-carrier-only.
//! - **DCT** ([`dct`]): one bit per 8×8 block of the embedding channel,
//!   encoded in the bucket parity of a fixed mid-frequency coefficient
//!   quantized to multiples of `strength`. Tolerates coefficient drift below
//!   `strength / 2`.
//!
//! [`capacity`] accounts for what a carrier can hold, the `detect` module
//! estimates whether it already holds something, and the pipeline wires the
//! codecs to the encryption envelope.

pub mod bits;
pub mod capacity;
pub mod dct;
pub mod detect;
pub mod error;
pub mod lsb;

mod pipeline;

pub use capacity::{dct_capacity_bits, lsb_capacity_bits, EmbeddingPlan, LENGTH_PREFIX_BITS};
pub use detect::detect;
pub use error::StegoError;
pub use pipeline::{hide, reveal, Encryption, HideOptions, RevealOptions};

/// Embedding method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Spatial least-significant-bit substitution.
    Lsb,
    /// Frequency-domain DCT coefficient quantization.
    Dct,
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Lsb => f.write_str("lsb"),
            Self::Dct => f.write_str("dct"),
        }
    }
}
