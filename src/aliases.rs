//! # Secure-Gate Type Aliases
//!
//! Secret-bearing buffers are wrapped in [`secure-gate`](https://github.com/Slurp9187/secure-gate)
//! types: they zeroize on drop and require an explicit `.expose_secret()` to read
//! (bring [`RevealSecret`] / [`RevealSecretMut`] into scope for that).
//!
//! - [`PasswordString`] - user password
//! - [`Aes256Key32`] - PBKDF2 output, the AES-256 key
//! - [`HmacSha1`] - PRF used by PBKDF2
//!
//! Salt, nonce and tag are public values stored in the clear in every container,
//! so they travel as plain arrays.

use secure_gate::{Dynamic, Fixed};

use hmac::Hmac;
use sha1::Sha1;

pub type HmacSha1 = Hmac<Sha1>;

pub use secure_gate::{RevealSecret, RevealSecretMut};

pub type PasswordString = Dynamic<String>;

pub type Aes256Key32 = Fixed<[u8; 32]>;

pub type Salt32 = [u8; 32];
pub type Nonce12 = [u8; 12];
pub type Tag16 = [u8; 16];
