//! Master-password hashing and verification using the `ring` crate.
//!
//! - **Hashing**: PBKDF2-HMAC-SHA256 with a 256-bit output, salted with 32
//!   random bytes.  Work is linear in the iteration count.
//! - **Verification**: recomputes the hash from the stored salt and iteration
//!   count and compares in constant time (`ring::pbkdf2::verify`).
//! - **Salts**: drawn once from the system CSPRNG when a master record is
//!   created, never regenerated implicitly.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::codec;
use crate::error::{PassgenError, Result};
use crate::model::Master;

/// Length of the master hash in bytes.
pub const HASH_LEN: usize = 32;

/// Length of the salt in bytes.
pub const SALT_LEN: usize = 32;

/// Iteration count used when the caller does not choose one.
pub const DEFAULT_ITERATIONS: NonZeroU32 = NonZeroU32::new(1000).unwrap();

/// PBKDF2 algorithm: HMAC-SHA256.
static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

// ---------------------------------------------------------------------------
// Salt
// ---------------------------------------------------------------------------

/// Generate a fresh salt from the system CSPRNG.
///
/// # Errors
///
/// Returns [`PassgenError::RandomFailed`] if the CSPRNG fails.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    generate_salt_with(&SystemRandom::new())
}

/// Generate a salt from a caller-supplied random source.
pub fn generate_salt_with(rng: &dyn SecureRandom) -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt).map_err(|_| PassgenError::RandomFailed)?;
    Ok(salt)
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Compute the master hash of `password` under `salt` and `iterations`.
pub fn derive_master_hash(password: &str, salt: &[u8], iterations: NonZeroU32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2::derive(PBKDF2_ALG, iterations, salt, password.as_bytes(), &mut out);
    out
}

/// Build a new master record for `password` with a fresh random salt.
pub fn create_master(password: &str, iterations: NonZeroU32) -> Result<Master> {
    create_master_with(password, iterations, &SystemRandom::new())
}

/// [`create_master`] with a caller-supplied random source.
pub fn create_master_with(
    password: &str,
    iterations: NonZeroU32,
    rng: &dyn SecureRandom,
) -> Result<Master> {
    let salt = generate_salt_with(rng)?;
    let hash = derive_master_hash(password, &salt, iterations);
    Ok(Master::from_parts(
        codec::encode(hash),
        codec::encode(salt),
        iterations,
    ))
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Check `password` against a stored master record.
///
/// Returns `Ok(false)` for a wrong password.  The full stored hash is
/// compared; `ring` only checks as many bytes as it is given, so a stored
/// hash that is not exactly [`HASH_LEN`] bytes is rejected up front.
///
/// # Errors
///
/// Returns [`PassgenError::CorruptRecord`] if the stored salt or hash is not
/// valid base64, or if the hash has the wrong length.
pub fn verify(password: &str, master: &Master) -> Result<bool> {
    let salt = codec::decode(&master.salt).map_err(|e| PassgenError::CorruptRecord {
        field: "Salt",
        reason: format!("is not valid base64: {e}"),
    })?;
    let expected = codec::decode(&master.hash).map_err(|e| PassgenError::CorruptRecord {
        field: "Hash",
        reason: format!("is not valid base64: {e}"),
    })?;
    if expected.len() != HASH_LEN {
        return Err(PassgenError::CorruptRecord {
            field: "Hash",
            reason: format!("is {} bytes, expected {HASH_LEN}", expected.len()),
        });
    }

    Ok(pbkdf2::verify(
        PBKDF2_ALG,
        master.iter_count,
        &salt,
        password.as_bytes(),
        &expected,
    )
    .is_ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
