//! # Single-File Operations
//!
//! A [`CryptoOperation`] is one unit of work: one input file, one direction, its own
//! progress cell. It is created when the work is scheduled, mutated only through its
//! [`Progress`] while bytes stream, and dropped afterwards; nothing is persisted.
//!
//! ```no_run
//! use gcmcrypt_rs::aliases::PasswordString;
//! use gcmcrypt_rs::CryptoOperation;
//!
//! let password = PasswordString::new("hunter2".to_string());
//! let op = CryptoOperation::builder("report.pdf")
//!     .output_dir("/tmp/vault")
//!     .encrypt(200_000);
//! let progress = op.progress(); // hand this to a poller
//! let written = op.run(&password)?;
//! assert_eq!(progress.get(), 1.0);
//! # let _ = written;
//! # Ok::<(), gcmcrypt_rs::GcmcryptError>(())
//! ```

use crate::aliases::PasswordString;
use crate::builders::operation_builder::CryptoOperationBuilder;
use crate::decryptor::decrypt_path;
use crate::encryptor::encrypt_path;
use crate::error::GcmcryptError;
use crate::naming::{decrypted_output_path, encrypted_output_path, NamingPolicy};
use crate::progress::Progress;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Direction of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Seal a plain file, deriving the key with `iterations` PBKDF2 rounds.
    Encrypt { iterations: u32 },
    /// Open a container; the iteration count comes from its header.
    Decrypt,
}

impl Mode {
    pub fn is_encrypt(&self) -> bool {
        matches!(self, Mode::Encrypt { .. })
    }
}

/// One file's encryption or decryption.
#[derive(Debug, Clone)]
pub struct CryptoOperation {
    pub(crate) mode: Mode,
    pub(crate) input: PathBuf,
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) naming: NamingPolicy,
    pub(crate) chunk_size: usize,
    pub(crate) progress: Progress,
}

impl CryptoOperation {
    pub fn builder(input: impl Into<PathBuf>) -> CryptoOperationBuilder {
        CryptoOperationBuilder::new(input)
    }

    /// Encrypt `input` next to itself with default settings.
    pub fn encrypt(input: impl Into<PathBuf>, iterations: u32) -> Self {
        Self::builder(input).encrypt(iterations)
    }

    /// Decrypt `input` next to itself with default settings.
    pub fn decrypt(input: impl Into<PathBuf>) -> Self {
        Self::builder(input).decrypt()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Handle for a poller; shares the cell this operation writes.
    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    /// Current fraction in `[0.0, 1.0]`; `1.0` only after verified completion.
    pub fn get_progress(&self) -> f64 {
        self.progress.get()
    }

    /// Run to completion or failure; there is no cancellation once bytes stream.
    ///
    /// Returns the path of the written file.
    pub fn run(&self, password: &PasswordString) -> Result<PathBuf, GcmcryptError> {
        self.progress.start();
        let result = match self.mode {
            Mode::Encrypt { iterations } => self.run_encrypt(password, iterations),
            Mode::Decrypt => self.run_decrypt(password),
        };

        match &result {
            Ok(path) => {
                self.progress.complete();
                debug!(input = %self.input.display(), output = %path.display(), "operation complete");
            }
            Err(e) => {
                self.progress.fail();
                debug!(input = %self.input.display(), error = %e, "operation failed");
            }
        }
        result
    }

    fn run_encrypt(&self, password: &PasswordString, iterations: u32) -> Result<PathBuf, GcmcryptError> {
        let target = encrypted_output_path(&self.input, self.output_dir.as_deref());
        encrypt_path(
            &self.input,
            &target,
            password,
            iterations,
            self.chunk_size,
            Some(&self.progress),
        )?;
        Ok(target)
    }

    fn run_decrypt(&self, password: &PasswordString) -> Result<PathBuf, GcmcryptError> {
        let (target, _) = decrypt_path(
            &self.input,
            password,
            self.chunk_size,
            Some(&self.progress),
            |header| {
                decrypted_output_path(
                    &self.input,
                    &header.extension,
                    self.output_dir.as_deref(),
                    self.naming,
                )
            },
        )?;
        Ok(target)
    }
}

/// Encrypt the file at `input` into `<output_dir or input dir>/<name>.encrypted`.
pub fn encrypt_file(
    input: impl AsRef<Path>,
    password: &PasswordString,
    iterations: u32,
    output_dir: Option<&Path>,
) -> Result<PathBuf, GcmcryptError> {
    let mut builder = CryptoOperation::builder(input.as_ref());
    if let Some(dir) = output_dir {
        builder = builder.output_dir(dir);
    }
    builder.encrypt(iterations).run(password)
}

/// Decrypt the container at `input` using the legacy naming rules.
pub fn decrypt_file(
    input: impl AsRef<Path>,
    password: &PasswordString,
    output_dir: Option<&Path>,
) -> Result<PathBuf, GcmcryptError> {
    let mut builder = CryptoOperation::builder(input.as_ref());
    if let Some(dir) = output_dir {
        builder = builder.output_dir(dir);
    }
    builder.decrypt().run(password)
}
