// src/lib.rs

pub mod aliases;
#[cfg(feature = "batch-ops")]
pub mod batch_ops;
pub mod builders;
pub mod consts;
pub mod crypto;
pub mod decryptor;
pub mod encryptor;
pub mod error;
pub mod header;
pub mod naming;
pub mod operation;
pub mod progress;
pub mod utils;

// Stream-level API over any reader/writer
pub use decryptor::{decrypt, derive_container_key};
pub use encryptor::encrypt;
pub use error::{GcmcryptError, ValidationError, ValidationProblem};

// File-level API with naming, atomic output and progress
pub use builders::operation_builder::CryptoOperationBuilder;
pub use naming::NamingPolicy;
pub use operation::{decrypt_file, encrypt_file, CryptoOperation, Mode};
pub use progress::{OperationState, Progress};

// Building blocks for custom flows
pub use builders::pbkdf2_builder::Pbkdf2Builder;
pub use crypto::gcm::GcmStream;
pub use crypto::kdf::pbkdf2::derive_pbkdf2_key;
pub use header::{read_header, ContainerHeader, ContainerInfo};

#[cfg(feature = "batch-ops")]
pub use batch_ops::{run_batch, spawn_batch, BatchConfig, BatchHandle, BatchReport, FileOutcome, FileTask};
