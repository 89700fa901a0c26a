// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! ECB and CBC chaining over the asymmetric block layout.
//!
//! ECB transforms each plaintext block independently. CBC XORs each
//! plaintext block with a running feedback value (seeded by the IV) before
//! the transform; the feedback is the previous ciphertext block *minus its
//! leading byte* (see [`super::block::feedback_value`]), keeping the XOR
//! operand at plaintext width so the sum stays below the modulus.
//!
//! All loops poll [`super::progress::check_cancelled`] once per block.

use std::str::FromStr;

use num_bigint::BigUint;

use super::block::{block_to_uint, feedback_value, uint_to_block, BlockLayout};
use super::error::CipherError;
use super::keygen::{PrivateKey, PublicKey};
use super::progress;

/// Block chaining mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Electronic codebook: each block transformed independently.
    Ecb,
    /// Cipher block chaining with truncated ciphertext feedback.
    Cbc,
}

impl FromStr for Mode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ECB" => Ok(Self::Ecb),
            "CBC" => Ok(Self::Cbc),
            _ => Err(CipherError::ModeUnsupported(s.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ecb => write!(f, "ECB"),
            Self::Cbc => write!(f, "CBC"),
        }
    }
}

/// ECB-encrypt a byte stream.
///
/// Splits `data` into plaintext-width blocks (the final block may be
/// partial), transforms each, and emits ciphertext-width blocks.
pub fn ecb_encrypt(data: &[u8], key: &PublicKey) -> Result<Vec<u8>, CipherError> {
    let layout = BlockLayout::for_modulus(key.modulus())?;
    let blocks = data.len().div_ceil(layout.plain);
    let mut out = Vec::with_capacity(blocks * layout.cipher);
    for block in data.chunks(layout.plain) {
        progress::check_cancelled()?;
        let c = key.raw_encrypt(&block_to_uint(block));
        out.extend_from_slice(&uint_to_block(&c, layout.cipher));
    }
    Ok(out)
}

/// ECB-decrypt a byte stream.
///
/// Splits `data` into ciphertext-width blocks, transforms each, and emits
/// plaintext-width blocks. The recovered final block is zero-extended on the
/// left relative to the original partial input (accepted limitation).
pub fn ecb_decrypt(data: &[u8], key: &PrivateKey) -> Result<Vec<u8>, CipherError> {
    let layout = BlockLayout::for_modulus(key.modulus())?;
    let blocks = data.len().div_ceil(layout.cipher);
    let mut out = Vec::with_capacity(blocks * layout.plain);
    for block in data.chunks(layout.cipher) {
        progress::check_cancelled()?;
        let m = key.raw_decrypt(&block_to_uint(block));
        out.extend_from_slice(&uint_to_block(&m, layout.plain));
    }
    Ok(out)
}

/// CBC-encrypt a byte stream with the given IV.
///
/// For each plaintext block: XOR its integer value with the running
/// feedback, transform, emit the full-width ciphertext block, then set the
/// feedback to that block's value minus its leading byte.
pub fn cbc_encrypt(data: &[u8], key: &PublicKey, iv: &BigUint) -> Result<Vec<u8>, CipherError> {
    let layout = BlockLayout::for_modulus(key.modulus())?;
    let blocks = data.len().div_ceil(layout.plain);
    let mut out = Vec::with_capacity(blocks * layout.cipher);
    let mut prev = iv.clone();
    for block in data.chunks(layout.plain) {
        progress::check_cancelled()?;
        let xored = block_to_uint(block) ^ &prev;
        let c = key.raw_encrypt(&xored);
        let cipher_block = uint_to_block(&c, layout.cipher);
        prev = feedback_value(&cipher_block);
        out.extend_from_slice(&cipher_block);
    }
    Ok(out)
}

/// CBC-decrypt a byte stream with the given IV.
///
/// For each ciphertext block: transform, XOR with the running feedback to
/// recover the plaintext block, then set the feedback from the *current*
/// ciphertext block minus its leading byte (same rule as encryption,
/// independent of whether the recovered plaintext is meaningful).
pub fn cbc_decrypt(data: &[u8], key: &PrivateKey, iv: &BigUint) -> Result<Vec<u8>, CipherError> {
    let layout = BlockLayout::for_modulus(key.modulus())?;
    let blocks = data.len().div_ceil(layout.cipher);
    let mut out = Vec::with_capacity(blocks * layout.plain);
    let mut prev = iv.clone();
    for block in data.chunks(layout.cipher) {
        progress::check_cancelled()?;
        let xored = key.raw_decrypt(&block_to_uint(block));
        let m = xored ^ &prev;
        prev = feedback_value(block);
        out.extend_from_slice(&uint_to_block(&m, layout.plain));
    }
    Ok(out)
}
