//! # Key Derivation Functions (KDF)
//!
//! - [`pbkdf2`] - PBKDF2-HMAC-SHA1 with a 32-byte salt and caller-chosen work factor
//!
//! The high-level [`encrypt_file`](crate::encrypt_file) and
//! [`decrypt_file`](crate::decrypt_file) handle derivation automatically; this is exposed
//! for custom flows and for tooling that needs to check a password against a header.

pub mod pbkdf2;
