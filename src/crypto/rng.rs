// src/crypto/rng.rs
//! Fresh salts and nonces from the operating system CSPRNG.

use crate::aliases::{Nonce12, Salt32};
use crate::error::GcmcryptError;
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Fill a fixed-size array from `OsRng`.
#[inline]
pub fn random_bytes<const N: usize>() -> Result<[u8; N], GcmcryptError> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| GcmcryptError::Crypto(format!("OS random source failed: {e}")))?;
    Ok(bytes)
}

/// New random 32-byte KDF salt.
#[inline]
pub fn random_salt() -> Result<Salt32, GcmcryptError> {
    random_bytes()
}

/// New random 12-byte GCM nonce.
#[inline]
pub fn random_nonce() -> Result<Nonce12, GcmcryptError> {
    random_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_and_nonces_are_fresh() {
        assert_ne!(random_salt().unwrap(), random_salt().unwrap());
        assert_ne!(random_nonce().unwrap(), random_nonce().unwrap());
    }
}
