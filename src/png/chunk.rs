// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! Chunk descriptors and type tags.
//!
//! A [`Chunk`] is a lightweight descriptor into the container's byte buffer:
//! it records where the chunk starts, its 4-byte type tag, the declared
//! payload length, and the stored CRC. Payload bytes are never owned by the
//! descriptor — they are borrowed from the container on demand.

use std::fmt;

/// A 4-byte ASCII chunk type tag (e.g. `IHDR`, `IDAT`, `tEXt`).
///
/// Bit 5 of the first byte (the ASCII lowercase bit) is the PNG
/// critical/ancillary bit: a lowercase first letter marks the chunk as
/// ancillary, i.e. safe to strip without breaking decoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType([u8; 4]);

impl ChunkType {
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    pub const PLTE: ChunkType = ChunkType(*b"PLTE");
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    pub const IEND: ChunkType = ChunkType(*b"IEND");
    pub const ICCP: ChunkType = ChunkType(*b"iCCP");
    pub const TRNS: ChunkType = ChunkType(*b"tRNS");
    pub const ITXT: ChunkType = ChunkType(*b"iTXt");

    pub const fn new(tag: [u8; 4]) -> Self {
        Self(tag)
    }

    /// The raw 4 tag bytes.
    pub const fn bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// `true` if the ancillary bit (lowercase bit of the first byte) is set.
    pub const fn is_ancillary(&self) -> bool {
        self.0[0] & 0x20 != 0
    }

    /// `true` for critical chunks (uppercase first byte).
    pub const fn is_critical(&self) -> bool {
        !self.is_ancillary()
    }

    /// Classify the tag into a known chunk kind.
    pub fn kind(&self) -> ChunkKind {
        match &self.0 {
            b"IHDR" => ChunkKind::Ihdr,
            b"PLTE" => ChunkKind::Plte,
            b"IDAT" => ChunkKind::Idat,
            b"IEND" => ChunkKind::Iend,
            b"iCCP" => ChunkKind::Iccp,
            b"tRNS" => ChunkKind::Trns,
            b"iTXt" => ChunkKind::Itxt,
            _ => ChunkKind::Other,
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() { b as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

// Debug prints the ASCII tag, not the raw byte array.
impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(tag: [u8; 4]) -> Self {
        Self(tag)
    }
}

/// Closed classification of the chunk types the inspector knows how to
/// present, with a fallback for everything else. Presentation layers match
/// on this once instead of comparing tag strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Ihdr,
    Plte,
    Idat,
    Iend,
    Iccp,
    Trns,
    Itxt,
    Other,
}

/// Descriptor for one chunk record inside the container buffer.
///
/// Byte layout at `start`:
///
/// ```text
/// [4 bytes] payload length (big-endian u32)
/// [4 bytes] type tag (ASCII)
/// [N bytes] payload
/// [4 bytes] CRC-32 over tag‖payload (big-endian)
/// ```
///
/// Total record size is `8 + length + 4` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset of the length field within the container buffer.
    pub start: usize,
    /// 4-byte type tag.
    pub tag: ChunkType,
    /// Declared payload length in bytes.
    pub length: usize,
    /// Stored CRC-32 from the record's trailing 4 bytes.
    pub crc: u32,
}

impl Chunk {
    /// Total size of the record in the buffer, including length, tag and CRC.
    pub const fn record_len(&self) -> usize {
        8 + self.length + 4
    }

    /// Byte range of the whole record within the container buffer.
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.record_len()
    }

    /// Byte range of the payload within the container buffer.
    pub fn payload_range(&self) -> std::ops::Range<usize> {
        self.start + 8..self.start + 8 + self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancillary_bit_follows_case_of_first_byte() {
        assert!(!ChunkType::IHDR.is_ancillary());
        assert!(!ChunkType::IDAT.is_ancillary());
        assert!(ChunkType::ICCP.is_ancillary());
        assert!(ChunkType::TRNS.is_ancillary());
        assert!(ChunkType::new(*b"tEXt").is_ancillary());
        assert!(ChunkType::new(*b"IEND").is_critical());
    }

    #[test]
    fn kind_classification() {
        assert_eq!(ChunkType::IHDR.kind(), ChunkKind::Ihdr);
        assert_eq!(ChunkType::ITXT.kind(), ChunkKind::Itxt);
        assert_eq!(ChunkType::new(*b"tEXt").kind(), ChunkKind::Other);
    }

    #[test]
    fn display_is_ascii_tag() {
        assert_eq!(ChunkType::IDAT.to_string(), "IDAT");
        assert_eq!(ChunkType::TRNS.to_string(), "tRNS");
    }

    #[test]
    fn record_geometry() {
        let c = Chunk {
            start: 8,
            tag: ChunkType::IDAT,
            length: 100,
            crc: 0,
        };
        assert_eq!(c.record_len(), 112);
        assert_eq!(c.byte_range(), 8..120);
        assert_eq!(c.payload_range(), 16..116);
    }
}
