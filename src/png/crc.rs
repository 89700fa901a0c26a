// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! CRC-32 integrity checks for chunk records.
//!
//! PNG uses the standard CRC-32 (ISO 3309 / ITU-T V.42) over the chunk's
//! type tag and payload, stored big-endian in the record's last 4 bytes.

use super::chunk::ChunkType;

/// CRC-32 over an arbitrary byte sequence.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// CRC-32 over tag‖payload, streamed so no concatenation buffer is needed.
pub fn chunk_crc(tag: ChunkType, payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(tag.bytes());
    hasher.update(payload);
    hasher.finalize()
}
