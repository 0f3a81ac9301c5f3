// src/crypto/mod.rs

//! Low-level crypto primitives: streaming AES-256-GCM, PBKDF2 and the OS RNG.
//!
//! The container key is always derived through [`kdf::pbkdf2`]; the cipher never sees a
//! password.

pub mod gcm;
pub mod kdf;
pub mod rng;
