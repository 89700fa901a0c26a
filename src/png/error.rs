// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for PNG parsing and chunk mutation.

use std::fmt;

use super::chunk::ChunkType;

/// Errors that can occur while parsing or mutating a PNG byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PngError {
    /// The buffer does not start with the 8-byte PNG signature.
    BadSignature,
    /// A chunk's declared length would read past the end of the buffer.
    Truncated {
        /// Byte offset of the chunk record that overran the buffer.
        offset: usize,
        /// Number of bytes the record needed from that offset.
        needed: usize,
    },
    /// A chunk's trailing CRC does not match CRC-32 over type‖payload.
    CrcMismatch {
        tag: ChunkType,
        stored: u32,
        computed: u32,
    },
    /// zlib inflate/deflate failure on a compressed payload.
    Codec(String),
    /// A chunk descriptor no longer matches the current index (the container
    /// was mutated since the descriptor was obtained).
    StaleChunk,
    /// An insertion anchor or chunk index does not resolve to a valid position.
    InvalidAnchor(usize),
    /// A required chunk type is absent from the container.
    MissingChunk(ChunkType),
    /// The IHDR payload is malformed.
    InvalidIhdr(&'static str),
    /// A payload exceeds the 2^32 - 1 byte limit of the chunk length field.
    OversizedPayload(usize),
}

impl fmt::Display for PngError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSignature => write!(f, "bad PNG file signature"),
            Self::Truncated { offset, needed } => {
                write!(f, "truncated chunk at offset {offset} (needed {needed} bytes)")
            }
            Self::CrcMismatch { tag, stored, computed } => write!(
                f,
                "CRC mismatch in {tag} chunk: stored {stored:#010X}, computed {computed:#010X}"
            ),
            Self::Codec(msg) => write!(f, "zlib codec error: {msg}"),
            Self::StaleChunk => write!(f, "stale chunk descriptor (container was mutated)"),
            Self::InvalidAnchor(anchor) => write!(f, "invalid chunk anchor index: {anchor}"),
            Self::MissingChunk(tag) => write!(f, "container has no {tag} chunk"),
            Self::InvalidIhdr(msg) => write!(f, "invalid IHDR: {msg}"),
            Self::OversizedPayload(len) => {
                write!(f, "payload of {len} bytes exceeds the chunk length field")
            }
        }
    }
}

impl std::error::Error for PngError {}

pub type Result<T> = std::result::Result<T, PngError>;
