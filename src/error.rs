//! # Error Types
//!
//! All operations return [`Result<T, GcmcryptError>`](GcmcryptError).
//! Batch-level validation problems are collected into a single [`ValidationError`]
//! so a front end can report every problem at once before any file is touched.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for all container operations.
#[derive(Error, Debug)]
pub enum GcmcryptError {
    /// I/O error while reading the input or writing the output.
    ///
    /// Missing files, permission problems and full disks all land here.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The batch was rejected before any work started.
    #[error("Validation failed:\n{0}")]
    Validation(#[from] ValidationError),

    /// Tag verification failed on decryption.
    ///
    /// Either the password is wrong or the container was corrupted or tampered with.
    /// The two cases cannot be told apart.
    #[error("Authentication failed: wrong password or corrupted container")]
    Authentication,

    /// The container is structurally invalid (too short, bad header fields).
    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    /// A caller-supplied parameter is out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Key derivation or randomness failure.
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl GcmcryptError {
    /// `true` when decryption failed tag verification.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, GcmcryptError::Authentication)
    }
}

/// One reason a batch cannot start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationProblem {
    /// The batch contains no files.
    NoFiles,
    /// The password is empty.
    EmptyPassword,
    /// Files selected for decryption that do not carry the `.encrypted` extension.
    NotEncrypted(Vec<PathBuf>),
    /// Iteration count of zero requested for encryption.
    InvalidIterations(u32),
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationProblem::NoFiles => f.write_str("no files selected"),
            ValidationProblem::EmptyPassword => f.write_str("no password given"),
            ValidationProblem::NotEncrypted(paths) => {
                write!(f, "not all files are encrypted (only \".encrypted\" files can be decrypted):")?;
                for path in paths {
                    write!(f, " {}", path.display())?;
                }
                Ok(())
            }
            ValidationProblem::InvalidIterations(n) => {
                write!(f, "invalid iteration count {n} (must be at least 1)")
            }
        }
    }
}

/// Every problem found while validating a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    problems: Vec<ValidationProblem>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, problem: ValidationProblem) {
        self.problems.push(problem);
    }

    pub fn problems(&self) -> &[ValidationProblem] {
        &self.problems
    }

    pub fn contains(&self, problem: &ValidationProblem) -> bool {
        self.problems.contains(problem)
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// `Ok(())` when no problem was recorded.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {problem}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
