// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! Asymmetric block layout for the RSA transform.
//!
//! A plaintext block is one byte narrower than the modulus byte width, so
//! its big-endian integer value is always strictly below the modulus and the
//! transform can never alias. A ciphertext block is the full modulus width,
//! since the transform output ranges over the whole modulus.
//!
//! Blocks are interpreted as big-endian unsigned integers. A final partial
//! input block is valid: it is zero-extended on the left when interpreted
//! and re-encoded at full width, which is why the original plaintext length
//! is not recoverable byte-exactly without out-of-band tracking.

use num_bigint::BigUint;

use super::error::CipherError;
use super::keygen::MIN_KEY_BITS;

/// Plaintext and ciphertext block widths derived from a key's modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// Plaintext block width in bytes (`cipher - 1`).
    pub plain: usize,
    /// Ciphertext block width in bytes (full modulus width).
    pub cipher: usize,
}

impl BlockLayout {
    /// Derive the layout from a modulus.
    ///
    /// # Errors
    /// [`CipherError::KeyTooSmall`] when the modulus is under 16 bits and
    /// the plaintext width would collapse to zero.
    pub fn for_modulus(n: &BigUint) -> Result<Self, CipherError> {
        let bits = n.bits();
        if bits < MIN_KEY_BITS {
            return Err(CipherError::KeyTooSmall { bits });
        }
        let cipher = ((bits + 7) / 8) as usize;
        Ok(Self {
            plain: cipher - 1,
            cipher,
        })
    }
}

/// Interpret a (possibly partial) block as a big-endian unsigned integer.
pub fn block_to_uint(block: &[u8]) -> BigUint {
    BigUint::from_bytes_be(block)
}

/// Encode an integer as a fixed-width big-endian block, left-padded with
/// zeros. If the value somehow exceeds the width, the low `width` bytes are
/// kept.
pub fn uint_to_block(value: &BigUint, width: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes.len() >= width {
        bytes[bytes.len() - width..].to_vec()
    } else {
        let mut block = vec![0u8; width - bytes.len()];
        block.extend_from_slice(&bytes);
        block
    }
}

/// The CBC feedback value: the integer value of a ciphertext block with its
/// leading byte dropped. The feedback is therefore one byte narrower than
/// the emitted block, matching the plaintext width. This truncation is part
/// of the wire format — changing it breaks compatibility.
pub fn feedback_value(cipher_block: &[u8]) -> BigUint {
    BigUint::from_bytes_be(&cipher_block[1..])
}
