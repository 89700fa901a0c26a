// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for chunk-level editing through the public API.

use pngscalpel_core::{Chunk, ChunkType, PngError, PngImage, PNG_SIGNATURE};

/// Serialize one chunk record the way the format defines it.
fn record(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    let mut crc = crc32fast::Hasher::new();
    crc.update(tag);
    crc.update(payload);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
    out
}

fn make_png(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    for &(tag, payload) in chunks {
        data.extend_from_slice(&record(tag, payload));
    }
    data
}

#[test]
fn parse_reports_chunks_in_file_order() {
    let data = make_png(&[
        (b"IHDR", &[0u8; 13]),
        (b"gAMA", &[0, 1, 134, 160]),
        (b"IDAT", &[1, 2, 3]),
        (b"IDAT", &[4, 5]),
        (b"IEND", &[]),
    ]);
    let img = PngImage::from_bytes(&data).unwrap();
    let tags: Vec<String> = img.chunks().iter().map(|c| c.tag.to_string()).collect();
    assert_eq!(tags, ["IHDR", "gAMA", "IDAT", "IDAT", "IEND"]);
    assert_eq!(img.chunks()[0].start, 8);
}

#[test]
fn roundtrip_through_serialization_is_identity() {
    let data = make_png(&[
        (b"IHDR", &[0u8; 13]),
        (b"tEXt", b"Software\0pngscalpel"),
        (b"IEND", &[]),
    ]);
    let img = PngImage::from_bytes(&data).unwrap();
    assert_eq!(img.to_bytes(), data);
    let again = PngImage::from_bytes(&img.to_bytes()).unwrap();
    assert_eq!(again.chunks(), img.chunks());
}

#[test]
fn delete_by_index_then_reindex() {
    let data = make_png(&[
        (b"IHDR", &[0u8; 13]),
        (b"tEXt", b"note"),
        (b"IEND", &[]),
    ]);
    let mut img = PngImage::from_bytes(&data).unwrap();
    let removed: Chunk = *img.chunk_at(1).unwrap();
    let old_len = img.as_bytes().len();

    img.delete_chunk_at(1).unwrap();

    assert_eq!(img.as_bytes().len(), old_len - (8 + removed.length + 4));
    assert_eq!(img.chunks().len(), 2);
    // The survivor behind the deleted chunk moved up to its offset.
    assert_eq!(img.chunks()[1].tag, ChunkType::IEND);
    assert_eq!(img.chunks()[1].start, removed.start);
}

#[test]
fn editing_a_lenient_loaded_file_keeps_working() {
    // A file with one bad CRC: strict parse refuses, lenient parse loads,
    // and mutations still go through because re-indexing never re-verifies.
    let mut data = make_png(&[
        (b"IHDR", &[0u8; 13]),
        (b"tEXt", b"corrupted later"),
        (b"IEND", &[]),
    ]);
    let text_payload_start = 8 + (8 + 13 + 4) + 8;
    data[text_payload_start] ^= 0x55;

    assert!(matches!(
        PngImage::from_bytes(&data),
        Err(PngError::CrcMismatch { .. })
    ));

    let mut img = PngImage::from_bytes_lenient(&data).unwrap();
    img.delete_ancillary().unwrap();
    assert_eq!(img.chunks().len(), 2);
}

#[test]
fn insert_between_existing_chunks() {
    let data = make_png(&[(b"IHDR", &[0u8; 13]), (b"IEND", &[])]);
    let mut img = PngImage::from_bytes(&data).unwrap();

    img.insert_chunk(1, ChunkType::new(*b"tIME"), &[7, 230, 8, 30, 12, 0, 0])
        .unwrap();

    let tags: Vec<String> = img.chunks().iter().map(|c| c.tag.to_string()).collect();
    assert_eq!(tags, ["IHDR", "tIME", "IEND"]);
    // Strict reparse proves the synthesized CRC is correct.
    PngImage::from_bytes(img.as_bytes()).unwrap();
}

#[test]
fn strip_metadata_workflow() {
    let data = make_png(&[
        (b"IHDR", &[0u8; 13]),
        (b"iCCP", b"ICC profile bytes"),
        (b"PLTE", &[255, 0, 0, 0, 255, 0]),
        (b"tRNS", &[0, 128]),
        (b"IDAT", &[1, 2, 3, 4]),
        (b"iTXt", b"Comment\0\0\0\0\0hello"),
        (b"IEND", &[]),
    ]);
    let mut img = PngImage::from_bytes(&data).unwrap();
    let removed = img.delete_ancillary().unwrap();
    assert_eq!(removed, 3);
    let tags: Vec<String> = img.chunks().iter().map(|c| c.tag.to_string()).collect();
    assert_eq!(tags, ["IHDR", "PLTE", "IDAT", "IEND"]);
}

#[test]
fn mutations_fail_atomically() {
    let data = make_png(&[(b"IHDR", &[0u8; 13]), (b"IEND", &[])]);
    let mut img = PngImage::from_bytes(&data).unwrap();
    let before = img.to_bytes();

    assert!(img.insert_chunk(9, ChunkType::IDAT, &[1]).is_err());
    assert!(img.delete_chunk_at(42).is_err());
    let stale = Chunk {
        start: 999,
        tag: ChunkType::IDAT,
        length: 1,
        crc: 0,
    };
    assert!(matches!(
        img.delete_chunk(&stale),
        Err(PngError::StaleChunk)
    ));

    assert_eq!(img.to_bytes(), before);
}

#[test]
fn replace_preserves_surrounding_order() {
    let data = make_png(&[
        (b"IHDR", &[0u8; 13]),
        (b"IDAT", &[1; 6]),
        (b"tEXt", b"in between stays put"),
        (b"IDAT", &[2; 6]),
        (b"IEND", &[]),
    ]);
    let mut img = PngImage::from_bytes(&data).unwrap();
    img.replace_payload_as_chunks(ChunkType::IDAT, &[9u8; 5], 2)
        .unwrap();
    let tags: Vec<String> = img.chunks().iter().map(|c| c.tag.to_string()).collect();
    // New chunks land at the first old IDAT position; tEXt keeps its
    // relative position after them.
    assert_eq!(tags, ["IHDR", "IDAT", "IDAT", "IDAT", "tEXt", "IEND"]);
    assert_eq!(img.concat_payloads(ChunkType::IDAT), [9u8; 5]);
}
