// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! Encrypt/decrypt pipeline over a PNG container.
//!
//! Flow: concatenate the IDAT payloads → zlib inflate → block transform →
//! zlib deflate → replace the IDAT chunks with the re-chunked result. The
//! container keeps its header and all other chunks, so the output is still
//! a structurally valid PNG (viewers render the encrypted pixel noise).
//!
//! The IV is an explicit argument — there is no process-wide cipher state.
//! ECB ignores it.

use num_bigint::{BigUint, RandBigInt};
use tracing::debug;

use crate::png::chunk::ChunkType;
use crate::png::error::PngError;
use crate::png::{zlib, PngImage};

use super::error::CipherError;
use super::keygen::{PrivateKey, PublicKey};
use super::modes::{cbc_decrypt, cbc_encrypt, ecb_decrypt, ecb_encrypt, Mode};

/// Maximum payload size per re-chunked IDAT chunk. A self-imposed quota to
/// keep chunks small, not a PNG format limit.
pub const IDAT_CHUNK_SIZE: usize = 8192;

/// Encrypt the container's pixel stream in place.
///
/// # Errors
/// - [`CipherError::Png`] wrapping [`PngError::MissingChunk`] when the
///   container has no IDAT chunk, or [`PngError::Codec`] on zlib failure.
/// - [`CipherError::KeyTooSmall`] / [`CipherError::Cancelled`] from the
///   block transform.
pub fn encrypt_image(
    img: &mut PngImage,
    key: &PublicKey,
    mode: Mode,
    iv: &BigUint,
) -> Result<(), CipherError> {
    let raw = extract_pixel_stream(img)?;
    let transformed = match mode {
        Mode::Ecb => ecb_encrypt(&raw, key)?,
        Mode::Cbc => cbc_encrypt(&raw, key, iv)?,
    };
    replace_pixel_stream(img, &raw, &transformed)
}

/// Decrypt the container's pixel stream in place.
///
/// Uses the same mode and IV as the encryption call. Due to the cipher's
/// final-block zero extension, the recovered stream can carry extra leading
/// zero bytes in its last block when the original length was not a multiple
/// of the plaintext block width.
pub fn decrypt_image(
    img: &mut PngImage,
    key: &PrivateKey,
    mode: Mode,
    iv: &BigUint,
) -> Result<(), CipherError> {
    let raw = extract_pixel_stream(img)?;
    let transformed = match mode {
        Mode::Ecb => ecb_decrypt(&raw, key)?,
        Mode::Cbc => cbc_decrypt(&raw, key, iv)?,
    };
    replace_pixel_stream(img, &raw, &transformed)
}

/// A random IV of `bits - 1` bits, guaranteed below any `bits`-bit modulus.
pub fn random_iv(bits: u64) -> BigUint {
    rand::thread_rng().gen_biguint(bits.saturating_sub(1))
}

fn extract_pixel_stream(img: &PngImage) -> Result<Vec<u8>, CipherError> {
    if img.chunk_by_type(ChunkType::IDAT).is_none() {
        return Err(CipherError::Png(PngError::MissingChunk(ChunkType::IDAT)));
    }
    let compressed = img.concat_payloads(ChunkType::IDAT);
    let raw = zlib::inflate(&compressed)?;
    debug!(
        compressed = compressed.len(),
        raw = raw.len(),
        "extracted pixel stream"
    );
    Ok(raw)
}

fn replace_pixel_stream(
    img: &mut PngImage,
    raw: &[u8],
    transformed: &[u8],
) -> Result<(), CipherError> {
    let recompressed = zlib::deflate(transformed)?;
    img.replace_payload_as_chunks(ChunkType::IDAT, &recompressed, IDAT_CHUNK_SIZE)?;
    debug!(
        input = raw.len(),
        output = transformed.len(),
        recompressed = recompressed.len(),
        "replaced pixel stream"
    );
    Ok(())
}
