// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! Byte-exact PNG chunk codec.
//!
//! Parses a PNG byte buffer into an ordered chunk index and supports
//! structural mutation: delete one chunk, delete all chunks of a type, strip
//! ancillary chunks, insert a synthesized chunk at an anchor position, and
//! replace all chunks of a type with a re-chunked payload.
//!
//! Invariants maintained by every operation:
//! - The buffer always begins with the 8-byte PNG signature.
//! - Each chunk record is `[len BE u32][tag][payload][CRC-32 over tag‖payload]`.
//! - The chunk index is rebuilt after every mutation; offsets in the index
//!   are always valid for the current buffer.
//! - Mutations are atomic: on failure the container is left unchanged.
//!
//! [`PngImage::from_bytes`] verifies each chunk's trailing CRC on read.
//! [`PngImage::from_bytes_lenient`] skips that check for files written by
//! tools that never computed correct CRCs.

pub mod chunk;
pub mod crc;
pub mod error;
pub mod ihdr;
pub mod zlib;

use tracing::debug;

use chunk::{Chunk, ChunkType};
use error::{PngError, Result};
use ihdr::IhdrInfo;

/// The fixed 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// A PNG container: the owned byte buffer plus its derived chunk index.
///
/// The buffer is the single source of truth; the index is derived from it
/// and rebuilt after every mutation. Payload access is zero-copy — slices
/// borrow from the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngImage {
    data: Vec<u8>,
    chunks: Vec<Chunk>,
}

impl PngImage {
    /// An empty container: signature only, zero chunks.
    pub fn new() -> Self {
        Self {
            data: PNG_SIGNATURE.to_vec(),
            chunks: Vec::new(),
        }
    }

    /// Parse a PNG byte buffer, verifying the signature and every chunk's
    /// trailing CRC.
    ///
    /// # Errors
    /// - [`PngError::BadSignature`] if the first 8 bytes are not the PNG magic.
    /// - [`PngError::Truncated`] if a declared chunk length runs past the end.
    /// - [`PngError::CrcMismatch`] if a stored CRC disagrees with the computed one.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::parse(data, true)
    }

    /// Parse without CRC verification.
    ///
    /// Accepts files whose chunk CRCs were never written correctly. Structure
    /// (signature, lengths) is still validated.
    pub fn from_bytes_lenient(data: &[u8]) -> Result<Self> {
        Self::parse(data, false)
    }

    fn parse(data: &[u8], verify_crc: bool) -> Result<Self> {
        if data.len() < 8 || data[..8] != PNG_SIGNATURE {
            return Err(PngError::BadSignature);
        }
        let chunks = index_chunks(data, verify_crc)?;
        debug!(chunks = chunks.len(), "indexed chunk table");
        Ok(Self {
            data: data.to_vec(),
            chunks,
        })
    }

    /// The ordered chunk index.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Chunk descriptor at the given index position.
    pub fn chunk_at(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// First chunk of the given type, in index order.
    pub fn chunk_by_type(&self, tag: ChunkType) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.tag == tag)
    }

    /// Zero-copy payload slice for a chunk descriptor.
    ///
    /// # Errors
    /// [`PngError::StaleChunk`] if the descriptor is not part of the current
    /// index (e.g. it was obtained before a mutation).
    pub fn payload(&self, chunk: &Chunk) -> Result<&[u8]> {
        if !self.chunks.contains(chunk) {
            return Err(PngError::StaleChunk);
        }
        Ok(&self.data[chunk.payload_range()])
    }

    /// Concatenated payload bytes of every chunk of the given type, in index
    /// order. The IDAT stream is typically split across several chunks and
    /// must be reassembled this way before decompression.
    pub fn concat_payloads(&self, tag: ChunkType) -> Vec<u8> {
        let total: usize = self
            .chunks
            .iter()
            .filter(|c| c.tag == tag)
            .map(|c| c.length)
            .sum();
        let mut out = Vec::with_capacity(total);
        for c in self.chunks.iter().filter(|c| c.tag == tag) {
            out.extend_from_slice(&self.data[c.payload_range()]);
        }
        out
    }

    /// Remove one chunk record from the buffer and re-index.
    ///
    /// # Errors
    /// [`PngError::StaleChunk`] if the descriptor is not in the current index.
    pub fn delete_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        if !self.chunks.contains(chunk) {
            return Err(PngError::StaleChunk);
        }
        let mut new_data = self.data.clone();
        new_data.drain(chunk.byte_range());
        self.commit(new_data)
    }

    /// Remove the chunk at the given index position.
    ///
    /// # Errors
    /// [`PngError::InvalidAnchor`] if the index is out of range.
    pub fn delete_chunk_at(&mut self, index: usize) -> Result<()> {
        let chunk = *self
            .chunks
            .get(index)
            .ok_or(PngError::InvalidAnchor(index))?;
        self.delete_chunk(&chunk)
    }

    /// Remove every chunk of the given type in a single pass.
    ///
    /// Returns the number of chunks removed.
    pub fn delete_all_of_type(&mut self, tag: ChunkType) -> Result<usize> {
        let removed = self.retain_chunks(|c| c.tag != tag)?;
        debug!(%tag, removed, "deleted chunks by type");
        Ok(removed)
    }

    /// Strip every ancillary chunk (lowercase first tag byte) in a single
    /// pass. Critical chunks (IHDR, PLTE, IDAT, IEND) are untouched.
    ///
    /// Returns the number of chunks removed.
    pub fn delete_ancillary(&mut self) -> Result<usize> {
        let removed = self.retain_chunks(|c| c.tag.is_critical())?;
        debug!(removed, "stripped ancillary chunks");
        Ok(removed)
    }

    /// Synthesize a chunk record (`len ‖ tag ‖ payload ‖ crc32(tag‖payload)`)
    /// and splice it in so it occupies index position `anchor`. An anchor
    /// equal to the chunk count appends at the end of the buffer.
    ///
    /// # Errors
    /// [`PngError::InvalidAnchor`] if `anchor > self.chunks().len()`,
    /// [`PngError::OversizedPayload`] if the payload does not fit the 4-byte
    /// length field.
    pub fn insert_chunk(&mut self, anchor: usize, tag: ChunkType, payload: &[u8]) -> Result<()> {
        if anchor > self.chunks.len() {
            return Err(PngError::InvalidAnchor(anchor));
        }
        let at = if anchor == self.chunks.len() {
            self.data.len()
        } else {
            self.chunks[anchor].start
        };
        let record = build_record(tag, payload)?;
        let mut new_data = Vec::with_capacity(self.data.len() + record.len());
        new_data.extend_from_slice(&self.data[..at]);
        new_data.extend_from_slice(&record);
        new_data.extend_from_slice(&self.data[at..]);
        self.commit(new_data)
    }

    /// Replace all chunks of `tag` with `new_payload` split into chunks of at
    /// most `max_chunk_size` bytes each.
    ///
    /// The new chunks are inserted at the position the old ones occupied, or
    /// appended at the end if none existed; the relative order of all other
    /// chunks is preserved. An empty payload still inserts one zero-length
    /// chunk so the type remains present. `max_chunk_size` is clamped to 1.
    pub fn replace_payload_as_chunks(
        &mut self,
        tag: ChunkType,
        new_payload: &[u8],
        max_chunk_size: usize,
    ) -> Result<()> {
        let max = max_chunk_size.max(1);
        let mut records = Vec::new();
        if new_payload.is_empty() {
            records.extend_from_slice(&build_record(tag, &[])?);
        } else {
            for piece in new_payload.chunks(max) {
                records.extend_from_slice(&build_record(tag, piece)?);
            }
        }

        let mut new_data = Vec::with_capacity(8 + records.len() + self.data.len());
        new_data.extend_from_slice(&self.data[..8]);
        let mut inserted = false;
        for c in &self.chunks {
            if c.tag == tag {
                if !inserted {
                    new_data.extend_from_slice(&records);
                    inserted = true;
                }
            } else {
                new_data.extend_from_slice(&self.data[c.byte_range()]);
            }
        }
        if !inserted {
            new_data.extend_from_slice(&records);
        }
        self.commit(new_data)
    }

    /// Parsed view of the IHDR header.
    ///
    /// # Errors
    /// [`PngError::MissingChunk`] if there is no IHDR chunk,
    /// [`PngError::InvalidIhdr`] if its payload is malformed.
    pub fn ihdr(&self) -> Result<IhdrInfo> {
        let chunk = *self
            .chunk_by_type(ChunkType::IHDR)
            .ok_or(PngError::MissingChunk(ChunkType::IHDR))?;
        IhdrInfo::parse(&self.data[chunk.payload_range()])
    }

    /// The serialized container bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Owned copy of the serialized container bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Swap in a mutated buffer and rebuild the index. The buffer was built
    /// from records of the current index plus freshly synthesized records, so
    /// structural re-indexing succeeds; CRCs are not re-verified because a
    /// lenient-loaded container must stay loadable across mutations.
    fn commit(&mut self, new_data: Vec<u8>) -> Result<()> {
        let chunks = index_chunks(&new_data, false)?;
        self.data = new_data;
        self.chunks = chunks;
        Ok(())
    }

    /// Rebuild the buffer in one pass, keeping only the chunks the predicate
    /// accepts, and swap it in through [`Self::commit`]. Returns the number
    /// of chunks dropped.
    fn retain_chunks<F>(&mut self, keep: F) -> Result<usize>
    where
        F: Fn(&Chunk) -> bool,
    {
        let mut new_data = Vec::with_capacity(self.data.len());
        new_data.extend_from_slice(&self.data[..8]);
        let mut removed = 0usize;
        for c in &self.chunks {
            if keep(c) {
                new_data.extend_from_slice(&self.data[c.byte_range()]);
            } else {
                removed += 1;
            }
        }
        self.commit(new_data)?;
        Ok(removed)
    }
}

impl Default for PngImage {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk the buffer from offset 8 and build the chunk index.
fn index_chunks(data: &[u8], verify_crc: bool) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();
    let mut start = 8usize;
    while start < data.len() {
        if data.len() - start < 8 {
            return Err(PngError::Truncated {
                offset: start,
                needed: 8,
            });
        }
        let length =
            u32::from_be_bytes([data[start], data[start + 1], data[start + 2], data[start + 3]])
                as usize;
        let tag = ChunkType::new([
            data[start + 4],
            data[start + 5],
            data[start + 6],
            data[start + 7],
        ]);
        let record_len = 8 + length + 4;
        if data.len() - start < record_len {
            return Err(PngError::Truncated {
                offset: start,
                needed: record_len,
            });
        }
        let crc_off = start + 8 + length;
        let stored = u32::from_be_bytes([
            data[crc_off],
            data[crc_off + 1],
            data[crc_off + 2],
            data[crc_off + 3],
        ]);
        if verify_crc {
            let computed = crc::crc32(&data[start + 4..crc_off]);
            if stored != computed {
                return Err(PngError::CrcMismatch {
                    tag,
                    stored,
                    computed,
                });
            }
        }
        chunks.push(Chunk {
            start,
            tag,
            length,
            crc: stored,
        });
        start += record_len;
    }
    Ok(chunks)
}

/// Serialize one chunk record: `len BE ‖ tag ‖ payload ‖ crc32(tag‖payload)`.
///
/// # Errors
/// [`PngError::OversizedPayload`] if the payload does not fit the 4-byte
/// length field.
fn build_record(tag: ChunkType, payload: &[u8]) -> Result<Vec<u8>> {
    let mut record = Vec::with_capacity(8 + payload.len() + 4);
    record.extend_from_slice(&encode_length(payload.len())?);
    record.extend_from_slice(tag.bytes());
    record.extend_from_slice(payload);
    record.extend_from_slice(&crc::chunk_crc(tag, payload).to_be_bytes());
    Ok(record)
}

/// Encode a payload length as the big-endian 4-byte length field.
fn encode_length(len: usize) -> Result<[u8; 4]> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| PngError::OversizedPayload(len))
}
