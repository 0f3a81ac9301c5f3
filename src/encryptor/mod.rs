// src/encryptor/mod.rs

//! High-level encryption facade.
//!
//! Core API: `encrypt(input, output, &password, iterations, extension)?` over any reader/writer.
//! File-level encryption with output naming and progress lives in
//! [`CryptoOperation`](crate::CryptoOperation).

pub(crate) mod encrypt;
pub(crate) mod stream;

pub use encrypt::encrypt;
pub(crate) use encrypt::encrypt_path;
