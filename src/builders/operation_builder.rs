//! src/builders/operation_builder.rs

use crate::consts::DEFAULT_CHUNK_SIZE;
use crate::naming::NamingPolicy;
use crate::operation::{CryptoOperation, Mode};
use crate::progress::Progress;
use std::path::PathBuf;

/// Builder for a single-file [`CryptoOperation`].
///
/// Defaults: output next to the input, legacy naming, 64 KiB chunks, a fresh progress cell.
#[derive(Debug, Clone)]
pub struct CryptoOperationBuilder {
    input: PathBuf,
    output_dir: Option<PathBuf>,
    naming: NamingPolicy,
    chunk_size: usize,
    progress: Option<Progress>,
}

impl CryptoOperationBuilder {
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: None,
            naming: NamingPolicy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress: None,
        }
    }

    /// Write the output into `dir` instead of next to the input.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Streaming chunk size in bytes (zero is rejected when the operation runs).
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Report into an existing progress cell instead of a fresh one.
    #[must_use]
    pub fn progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn encrypt(self, iterations: u32) -> CryptoOperation {
        self.build(Mode::Encrypt { iterations })
    }

    #[must_use]
    pub fn decrypt(self) -> CryptoOperation {
        self.build(Mode::Decrypt)
    }

    #[must_use]
    pub fn build(self, mode: Mode) -> CryptoOperation {
        CryptoOperation {
            mode,
            input: self.input,
            output_dir: self.output_dir,
            naming: self.naming,
            chunk_size: self.chunk_size,
            progress: self.progress.unwrap_or_default(),
        }
    }
}
