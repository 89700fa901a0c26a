// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! zlib inflate/deflate boundary for compressed chunk payloads.
//!
//! PNG image data (the concatenated IDAT stream) is a zlib stream. The
//! cipher pipeline inflates it before transforming and deflates the result
//! before re-chunking.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::error::{PngError, Result};

/// Decompress a zlib stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| PngError::Codec(e.to_string()))?;
    Ok(out)
}

/// Compress bytes into a zlib stream at the default compression level.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PngError::Codec(e.to_string()))?;
    encoder.finish().map_err(|e| PngError::Codec(e.to_string()))
}
