// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! # pngscalpel-core
//!
//! Chunk-level PNG surgery plus a textbook RSA block cipher over the image
//! data stream. Two halves:
//!
//! - **`png`**: a byte-exact chunk codec. Parses a PNG byte buffer into an
//!   ordered chunk index, supports structural mutation (delete, insert,
//!   strip-ancillary, replace-by-type) with CRC maintenance, and serializes
//!   back to bytes.
//! - **`cipher`**: RSA-style key generation (Fermat probable primes) and an
//!   ECB/CBC block cipher with an asymmetric block width — plaintext blocks
//!   are one byte narrower than ciphertext blocks so their integer value
//!   always stays below the modulus.
//!
//! The cipher is a **demonstration**, not a secure cryptosystem: no padding,
//! no authentication, small key sizes, and a Fermat primality test that a
//! Carmichael number can fool.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use pngscalpel_core::{PngImage, Mode, generate_keypair, random_iv, encrypt_image, decrypt_image};
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let mut img = PngImage::from_bytes(&bytes).unwrap();
//! let (public, private) = generate_keypair(1024).unwrap();
//! let iv = random_iv(1024);
//! encrypt_image(&mut img, &public, Mode::Cbc, &iv).unwrap();
//! std::fs::write("photo-encrypted.png", img.to_bytes()).unwrap();
//! decrypt_image(&mut img, &private, Mode::Cbc, &iv).unwrap();
//! ```

pub mod cipher;
pub mod png;

pub use png::chunk::{Chunk, ChunkKind, ChunkType};
pub use png::error::PngError;
pub use png::ihdr::{ColorType, IhdrInfo};
pub use png::{PngImage, PNG_SIGNATURE};

pub use cipher::error::CipherError;
pub use cipher::keygen::{
    generate_keypair, generate_keypair_with, is_probable_prime, modexp, random_candidate,
    random_probable_prime, PrivateKey, PublicKey,
};
pub use cipher::modes::{cbc_decrypt, cbc_encrypt, ecb_decrypt, ecb_encrypt, Mode};
pub use cipher::pipeline::{decrypt_image, encrypt_image, random_iv, IDAT_CHUNK_SIZE};
pub use cipher::progress;
