//! # Builders
//!
//! - [`pbkdf2_builder`] - PBKDF2-HMAC-SHA1 key derivation with salt handling
//! - [`operation_builder`] - configure a single-file [`CryptoOperation`](crate::CryptoOperation)

pub mod operation_builder;
pub mod pbkdf2_builder;
