// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for key generation and the block cipher pipeline.

use core::fmt;

use crate::png::error::PngError;

/// Errors that can occur during key generation or encryption/decryption.
#[derive(Debug)]
pub enum CipherError {
    /// The modulus is too small for the asymmetric block layout (a plaintext
    /// block must be at least one byte wide).
    KeyTooSmall { bits: u64 },
    /// The mode string did not name a supported chaining mode.
    ModeUnsupported(String),
    /// The public exponent is not invertible modulo phi(n); the caller should
    /// re-draw the primes.
    NonInvertibleExponent,
    /// The operation was cancelled via [`crate::cipher::progress::cancel`].
    Cancelled,
    /// A chunk codec or zlib failure while extracting or re-chunking the
    /// image data stream.
    Png(PngError),
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyTooSmall { bits } => {
                write!(f, "key too small for block layout: {bits} modulus bits")
            }
            Self::ModeUnsupported(s) => write!(f, "unsupported cipher mode: {s:?}"),
            Self::NonInvertibleExponent => {
                write!(f, "public exponent not invertible modulo phi(n)")
            }
            Self::Cancelled => write!(f, "operation cancelled by user"),
            Self::Png(e) => write!(f, "image data error: {e}"),
        }
    }
}

impl std::error::Error for CipherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Png(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PngError> for CipherError {
    fn from(e: PngError) -> Self {
        Self::Png(e)
    }
}
