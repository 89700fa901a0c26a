// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! RSA-style block cipher over the PNG image data stream.
//!
//! Submodules:
//! - [`keygen`]: probable-prime search (Fermat test), modular inverse, and
//!   keypair construction.
//! - [`block`]: the asymmetric block layout — plaintext blocks one byte
//!   narrower than the modulus, ciphertext blocks the full modulus width.
//! - [`modes`]: ECB and CBC chaining over that layout.
//! - [`pipeline`]: extract → inflate → transform → deflate → re-chunk,
//!   wired into the [`crate::png`] codec.
//! - [`progress`]: cancellation and progress reporting for the unbounded
//!   prime search and the block transform loops.

pub mod block;
pub mod error;
pub mod keygen;
pub mod modes;
pub mod pipeline;
pub mod progress;

pub use block::BlockLayout;
pub use error::CipherError;
pub use keygen::{PrivateKey, PublicKey};
pub use modes::Mode;
