//! src/builders/pbkdf2_builder.rs
//! PBKDF2-HMAC-SHA1 builder: fresh salt on encryption, stored salt on decryption

use crate::aliases::{Aes256Key32, PasswordString, Salt32};
use crate::consts::DEFAULT_PBKDF2_ITERATIONS;
use crate::crypto::kdf::pbkdf2::derive_pbkdf2_key;
use crate::crypto::rng::random_salt;
use crate::error::GcmcryptError;

/// PBKDF2-HMAC-SHA1 key derivation builder
///
/// Defaults: 32-byte random salt + [`DEFAULT_PBKDF2_ITERATIONS`] (100,000).
///
/// # Thread Safety
///
/// This type is `Send + Sync`; all operations are pure.
#[derive(Debug, Clone)]
pub struct Pbkdf2Builder {
    iterations: u32,
    salt: Salt32,
}

impl Pbkdf2Builder {
    /// Builder with a fresh random salt from the OS CSPRNG.
    pub fn random() -> Result<Self, GcmcryptError> {
        Ok(Self::from_salt(random_salt()?))
    }

    /// Builder that re-derives from a stored salt.
    #[must_use]
    pub fn from_salt(salt: Salt32) -> Self {
        Self {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
            salt,
        }
    }

    /// Set the iteration count. Zero is rejected at derivation time.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Salt as raw bytes (for writing into the container header).
    #[must_use]
    pub fn salt(&self) -> &Salt32 {
        &self.salt
    }

    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive into a caller-provided secure buffer.
    #[inline]
    pub fn derive_secure(
        &self,
        password: &PasswordString,
        out_key: &mut Aes256Key32,
    ) -> Result<(), GcmcryptError> {
        derive_pbkdf2_key(password, &self.salt, self.iterations, out_key)
    }

    /// Derive and return a fresh secure key.
    #[inline]
    pub fn derive_secure_new(&self, password: &PasswordString) -> Result<Aes256Key32, GcmcryptError> {
        let mut key = Aes256Key32::new([0u8; 32]);
        self.derive_secure(password, &mut key)?;
        Ok(key)
    }
}
