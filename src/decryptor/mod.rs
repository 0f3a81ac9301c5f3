// src/decryptor/mod.rs

//! High-level decryption facade.
//!
//! Core API: `decrypt(input, output, &password)?` over any reader/writer.
//! Helpers: `derive_container_key` for custom flows that already hold a parsed header.

pub(crate) mod decrypt;
pub(crate) mod stream;

pub use decrypt::{decrypt, derive_container_key};
pub(crate) use decrypt::decrypt_path;
