// Copyright (c) 2026 the pngscalpel developers
// SPDX-License-Identifier: GPL-3.0-only

//! RSA-style key generation.
//!
//! Primality is a **Fermat** test: for `rounds` random bases `a` in
//! `[2, n-2]`, check `a^(n-1) ≡ 1 (mod n)`. This is deliberately weaker than
//! Miller–Rabin — a Carmichael number passes for every base coprime to it,
//! so there is a real (if small) false-accept risk. The weaker test is kept
//! on purpose; do not silently upgrade it.
//!
//! Keys are built the textbook way: two probable primes of `bits/2`,
//! modulus `n = p·q`, Euler totient `phi = (p-1)(q-1)`, private exponent
//! `d = e⁻¹ mod phi` with the fixed public exponent 65537. When `e` is not
//! coprime with `phi` both primes are re-drawn — 65537 is prime but not
//! guaranteed coprime with every totient.

use core::fmt;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use super::error::CipherError;
use super::progress;

/// Fixed public exponent (F4).
pub const PUBLIC_EXPONENT: u32 = 65537;

/// Rounds of the Fermat test per candidate.
const FERMAT_ROUNDS: u32 = 100;

/// Smallest accepted keypair size; below this the plaintext block width of
/// `modulus_bytes - 1` collapses to zero.
pub const MIN_KEY_BITS: u64 = 16;

/// RSA public key `(e, n)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    e: BigUint,
    n: BigUint,
}

impl PublicKey {
    pub fn new(e: BigUint, n: BigUint) -> Self {
        Self { e, n }
    }

    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Bit length of the modulus.
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }

    /// The raw transform: `m^e mod n`. No padding, no length framing.
    pub fn raw_encrypt(&self, m: &BigUint) -> BigUint {
        m.modpow(&self.e, &self.n)
    }
}

/// RSA private key `(d, n)`.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    d: BigUint,
    n: BigUint,
}

impl PrivateKey {
    pub fn new(d: BigUint, n: BigUint) -> Self {
        Self { d, n }
    }

    pub fn exponent(&self) -> &BigUint {
        &self.d
    }

    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// Bit length of the modulus.
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }

    /// The raw transform: `c^d mod n`.
    pub fn raw_decrypt(&self, c: &BigUint) -> BigUint {
        c.modpow(&self.d, &self.n)
    }
}

// The private exponent stays out of Debug output.
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("d", &"<redacted>")
            .field("n", &self.n)
            .finish()
    }
}

/// Fast modular exponentiation: `base^exponent mod modulus`.
///
/// This single primitive is both the encryption and the decryption transform.
pub fn modexp(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exponent, modulus)
}

/// Fermat probabilistic primality test with fresh entropy.
///
/// Returns `false` on the first base `a` with `a^(n-1) mod n != 1`, `true`
/// once all `rounds` bases pass. "True" means *probable* prime only.
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> bool {
    is_probable_prime_with(n, rounds, &mut rand::thread_rng())
}

/// [`is_probable_prime`] with an explicit RNG, for reproducible tests.
pub fn is_probable_prime_with<R: Rng + ?Sized>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    if *n == two || *n == BigUint::from(3u32) {
        return true;
    }
    if n.is_even() {
        return false;
    }
    let n_minus_1 = n - 1u32;
    for _ in 0..rounds {
        // Uniform base in [2, n-2]; the range upper bound is exclusive.
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        if a.modpow(&n_minus_1, n) != BigUint::one() {
            return false;
        }
    }
    true
}

/// Random candidate of exactly `bits` bits with the two most significant
/// bits forced to 1, so the product of two candidates has a predictable bit
/// length for modulus sizing. Requires `bits >= 2`.
pub fn random_candidate<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> BigUint {
    debug_assert!(bits >= 2, "candidate needs at least 2 bits");
    let mut n = rng.gen_biguint(bits);
    n |= BigUint::one() << (bits - 1);
    n |= BigUint::one() << (bits - 2);
    n
}

/// Draw candidates until the Fermat test accepts one.
///
/// There is no retry cap: the loop runs until a probable prime is found or
/// [`progress::cancel`] is called, in which case `CipherError::Cancelled`
/// is returned. Each candidate advances the progress counter.
pub fn random_probable_prime(bits: u64) -> Result<BigUint, CipherError> {
    random_probable_prime_with(bits, &mut rand::thread_rng())
}

/// [`random_probable_prime`] with an explicit RNG.
pub fn random_probable_prime_with<R: Rng + ?Sized>(
    bits: u64,
    rng: &mut R,
) -> Result<BigUint, CipherError> {
    loop {
        progress::check_cancelled()?;
        let candidate = random_candidate(bits, rng);
        progress::advance();
        if is_probable_prime_with(&candidate, FERMAT_ROUNDS, rng) {
            return Ok(candidate);
        }
    }
}

/// Modular inverse of `a` mod `m` via the extended Euclidean algorithm.
/// `None` when `gcd(a, m) != 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a = BigInt::from(a.clone());
    let m = BigInt::from(m.clone());
    let ext = a.extended_gcd(&m);
    if !ext.gcd.is_one() {
        return None;
    }
    ext.x.mod_floor(&m).to_biguint()
}

/// Private exponent `d = e⁻¹ mod phi`.
///
/// # Errors
/// [`CipherError::NonInvertibleExponent`] when `gcd(e, phi) != 1`; the
/// keypair loop treats that as "re-draw the primes".
pub fn derive_private_exponent(e: &BigUint, phi: &BigUint) -> Result<BigUint, CipherError> {
    mod_inverse(e, phi).ok_or(CipherError::NonInvertibleExponent)
}

/// Generate a keypair with a `bits`-bit modulus from OS entropy.
///
/// With the `parallel` feature the two primes are searched concurrently.
///
/// # Errors
/// - [`CipherError::KeyTooSmall`] if `bits < 16`.
/// - [`CipherError::Cancelled`] if the prime search was cancelled.
pub fn generate_keypair(bits: u64) -> Result<(PublicKey, PrivateKey), CipherError> {
    if bits < MIN_KEY_BITS {
        return Err(CipherError::KeyTooSmall { bits });
    }
    let half = bits / 2;
    let e = BigUint::from(PUBLIC_EXPONENT);
    loop {
        let (p, q) = draw_prime_pair(half)?;
        match build_keypair(&e, p, q) {
            Ok(pair) => return Ok(pair),
            Err(CipherError::NonInvertibleExponent) => continue,
            Err(err) => return Err(err),
        }
    }
}

/// [`generate_keypair`] with an explicit RNG. With a seeded RNG (e.g.
/// `ChaCha20Rng`) the result is reproducible; this path is always serial.
pub fn generate_keypair_with<R: Rng + ?Sized>(
    bits: u64,
    rng: &mut R,
) -> Result<(PublicKey, PrivateKey), CipherError> {
    if bits < MIN_KEY_BITS {
        return Err(CipherError::KeyTooSmall { bits });
    }
    let half = bits / 2;
    let e = BigUint::from(PUBLIC_EXPONENT);
    loop {
        let p = random_probable_prime_with(half, rng)?;
        let q = random_probable_prime_with(half, rng)?;
        match build_keypair(&e, p, q) {
            Ok(pair) => return Ok(pair),
            Err(CipherError::NonInvertibleExponent) => continue,
            Err(err) => return Err(err),
        }
    }
}

fn build_keypair(
    e: &BigUint,
    p: BigUint,
    q: BigUint,
) -> Result<(PublicKey, PrivateKey), CipherError> {
    let n = &p * &q;
    let phi = (&p - 1u32) * (&q - 1u32);
    let d = derive_private_exponent(e, &phi)?;
    Ok((PublicKey::new(e.clone(), n.clone()), PrivateKey::new(d, n)))
}

#[cfg(feature = "parallel")]
fn draw_prime_pair(bits: u64) -> Result<(BigUint, BigUint), CipherError> {
    let (p, q) = rayon::join(
        || random_probable_prime_with(bits, &mut rand::thread_rng()),
        || random_probable_prime_with(bits, &mut rand::thread_rng()),
    );
    Ok((p?, q?))
}

#[cfg(not(feature = "parallel"))]
fn draw_prime_pair(bits: u64) -> Result<(BigUint, BigUint), CipherError> {
    let mut rng = rand::thread_rng();
    let p = random_probable_prime_with(bits, &mut rng)?;
    let q = random_probable_prime_with(bits, &mut rng)?;
    Ok((p, q))
}
