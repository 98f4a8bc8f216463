// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! # veil-core
//!
//! Password-based envelope encryption plus image steganography over raw
//! pixel carriers. Provides two embedding domains:
//!
//! - **LSB** (spatial): substitutes payload bits into the low 1–3 bits of
//!   each sample. Exact round trip on lossless carriers, highest capacity.
//! - **DCT** (frequency): quantizes one mid-frequency coefficient per 8×8
//!   block to the multiple of `strength` whose parity encodes the bit.
//!   Lower capacity, but survives coefficient drift below `strength / 2`.
//!
//! The encryption envelope (`envelope` module) wraps any payload (text,
//! data, files, images) in a self-describing binary container: PBKDF2-
//! HMAC-SHA256 key derivation and either AES-256-CBC or a Fernet-style
//! AES-128-CBC + HMAC-SHA256 authenticated token. The same container can be
//! embedded in a carrier (encrypt-first steganography) or used on its own.
//!
//! Everything is a pure function of its inputs plus CSPRNG draws: no global
//! state, no filesystem or network access, no suspension mid-transform.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use veil_core::{hide, reveal, HideOptions, RevealOptions, PixelBuffer};
//!
//! let carrier = PixelBuffer::new(width, height, 3, rgb_samples)?;
//! let stego = hide(&carrier, b"secret payload", &HideOptions::default())?;
//! let recovered = reveal(&stego, &RevealOptions::default())?;
//! assert_eq!(recovered, b"secret payload");
//! ```

pub mod dct2d;
pub mod envelope;
pub mod pixels;
pub mod stego;

pub use envelope::{
    decrypt, decrypt_file, decrypt_text, encrypt, encrypt_file, encrypt_text, open, seal,
    Algorithm, Container, EnvelopeError, Metadata,
};
pub use pixels::{PixelBuffer, PixelError};
pub use stego::{
    detect, hide, reveal, dct_capacity_bits, lsb_capacity_bits, EmbeddingPlan, Encryption,
    HideOptions, Method, RevealOptions, StegoError,
};
