//! src/crypto/kdf/pbkdf2.rs

use crate::aliases::{Aes256Key32, HmacSha1, PasswordString, RevealSecret, RevealSecretMut, Salt32};
use crate::GcmcryptError;

use pbkdf2::pbkdf2;
use zeroize::Zeroizing;

/// Bytes fed to the PRF for `password`.
///
/// Latin-1 (one byte per char) when every char is at most U+00FF, which is how existing
/// containers were keyed. Passwords with any char above U+00FF have no Latin-1 form and
/// fall back to their UTF-8 bytes.
pub fn password_bytes(password: &str) -> Zeroizing<Vec<u8>> {
    let mut latin1 = Zeroizing::new(Vec::with_capacity(password.len()));
    for c in password.chars() {
        match u8::try_from(c) {
            Ok(b) => latin1.push(b),
            Err(_) => return Zeroizing::new(password.as_bytes().to_vec()),
        }
    }
    latin1
}

/// Derive PBKDF2-HMAC-SHA1 directly into an `Aes256Key32` buffer.
///
/// The password is encoded with [`password_bytes`].
///
/// Deterministic: the same password, salt and iteration count always yield the same key,
/// which is how decryption re-derives the key from the stored salt and iterations.
///
/// # Errors
/// - [`GcmcryptError::InvalidInput`] when `iterations` is zero
#[inline]
pub fn derive_pbkdf2_key(
    password: &PasswordString,
    salt: &Salt32,
    iterations: u32,
    out_key: &mut Aes256Key32,
) -> Result<(), GcmcryptError> {
    if iterations == 0 {
        return Err(GcmcryptError::InvalidInput(
            "PBKDF2 iterations must be ≥1".into(),
        ));
    }

    let secret = password_bytes(password.expose_secret());
    pbkdf2::<HmacSha1>(
        &secret,
        salt,
        iterations,
        out_key.expose_secret_mut(),
    )
    .map_err(|e| GcmcryptError::Crypto(format!("PBKDF2 failed: {e}")))?;
    Ok(())
}
