//! # Batch Operations
//!
//! Many files, one password, one direction. Validation is batch-level and happens before
//! any I/O; after that every file is an independent [`CryptoOperation`] on a bounded rayon
//! pool, and one file's failure never stops its siblings.
//!
//! - [`run_batch`] blocks until every file is done.
//! - [`spawn_batch`] returns immediately with a [`FileTask`] per file: a progress cell for
//!   live polling and a completion receiver to await the result.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

use crate::aliases::{PasswordString, RevealSecret};
use crate::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_WORKERS};
use crate::error::{GcmcryptError, ValidationError, ValidationProblem};
use crate::naming::{is_encrypted_name, NamingPolicy};
use crate::operation::{CryptoOperation, Mode};
use crate::progress::Progress;

/// Everything a batch needs, passed explicitly instead of living in front-end state.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub files: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub mode: Mode,
    pub naming: NamingPolicy,
    pub chunk_size: usize,
    /// Upper bound on worker threads; the pool never exceeds the file count or core count.
    pub max_workers: usize,
}

impl BatchConfig {
    pub fn new(mode: Mode, files: Vec<PathBuf>) -> Self {
        Self {
            files,
            output_dir: None,
            mode,
            naming: NamingPolicy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    pub fn encrypt(files: Vec<PathBuf>, iterations: u32) -> Self {
        Self::new(Mode::Encrypt { iterations }, files)
    }

    pub fn decrypt(files: Vec<PathBuf>) -> Self {
        Self::new(Mode::Decrypt, files)
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Collect every reason this batch cannot start. Touches no files.
    pub fn validate(&self, password: &PasswordString) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();
        if self.files.is_empty() {
            err.push(ValidationProblem::NoFiles);
        }
        if password.expose_secret().is_empty() {
            err.push(ValidationProblem::EmptyPassword);
        }
        match self.mode {
            Mode::Encrypt { iterations: 0 } => {
                err.push(ValidationProblem::InvalidIterations(0));
            }
            Mode::Encrypt { .. } => {}
            Mode::Decrypt => {
                let plain: Vec<PathBuf> = self
                    .files
                    .iter()
                    .filter(|p| !is_encrypted_name(p))
                    .cloned()
                    .collect();
                if !plain.is_empty() {
                    err.push(ValidationProblem::NotEncrypted(plain));
                }
            }
        }
        err.into_result()
    }

    /// Worker count: `min(files, available cores, max_workers)`, at least one.
    pub fn worker_count(&self) -> usize {
        let cores = thread::available_parallelism().map_or(4, |n| n.get());
        self.files
            .len()
            .min(cores)
            .min(self.max_workers.max(1))
            .max(1)
    }

    fn operation(&self, input: &Path) -> CryptoOperation {
        let mut builder = CryptoOperation::builder(input)
            .naming(self.naming)
            .chunk_size(self.chunk_size);
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir);
        }
        builder.build(self.mode)
    }

    fn build_pool(&self) -> Result<ThreadPool, GcmcryptError> {
        ThreadPoolBuilder::new()
            .num_threads(self.worker_count())
            .thread_name(|i| format!("gcmcrypt-worker-{i}"))
            .build()
            .map_err(|e| GcmcryptError::Crypto(format!("failed to start worker pool: {e}")))
    }
}

/// Result for one file of a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// Written output path, or why this file failed.
    pub result: Result<PathBuf, GcmcryptError>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes, in the order the files were given.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    fn log_summary(&self) {
        info!(
            succeeded = self.succeeded(),
            failed = self.failed(),
            "batch finished"
        );
        for outcome in self.failures() {
            if let Err(e) = &outcome.result {
                warn!(input = %outcome.input.display(), error = %e, "file failed");
            }
        }
    }
}

/// Validate, then process every file on a bounded pool and wait for all of them.
///
/// # Errors
/// - [`GcmcryptError::Validation`] if the batch is rejected (nothing is touched)
/// - [`GcmcryptError::Crypto`] if the worker pool cannot be started
///
/// Per-file failures are reported in the [`BatchReport`], not as an `Err`.
pub fn run_batch(
    config: &BatchConfig,
    password: &PasswordString,
) -> Result<BatchReport, GcmcryptError> {
    config.validate(password)?;
    let pool = config.build_pool()?;
    info!(
        files = config.files.len(),
        workers = config.worker_count(),
        encrypt = config.mode.is_encrypt(),
        "batch started"
    );

    let outcomes: Vec<FileOutcome> = pool.install(|| {
        config
            .files
            .par_iter()
            .map(|input| FileOutcome {
                input: input.clone(),
                result: config.operation(input).run(password),
            })
            .collect()
    });

    let report = BatchReport { outcomes };
    report.log_summary();
    Ok(report)
}

/// A file scheduled by [`spawn_batch`].
#[derive(Debug)]
pub struct FileTask {
    input: PathBuf,
    progress: Progress,
    done: Receiver<Result<PathBuf, GcmcryptError>>,
}

impl FileTask {
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Live progress for polling.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }

    /// Block until this file is done.
    pub fn wait(self) -> FileOutcome {
        let result = self.done.recv().unwrap_or_else(|_| {
            Err(GcmcryptError::Crypto("worker exited without reporting".into()))
        });
        FileOutcome {
            input: self.input,
            result,
        }
    }
}

/// Handle to a running batch.
#[derive(Debug)]
pub struct BatchHandle {
    tasks: Vec<FileTask>,
    // keeps the workers alive until every task has reported
    _pool: Arc<ThreadPool>,
}

impl BatchHandle {
    pub fn tasks(&self) -> &[FileTask] {
        &self.tasks
    }

    /// `true` once every file has either completed or failed.
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(FileTask::is_finished)
    }

    /// Mean progress over all files.
    pub fn overall_progress(&self) -> f64 {
        if self.tasks.is_empty() {
            return 1.0;
        }
        self.tasks.iter().map(|t| t.progress.get()).sum::<f64>() / self.tasks.len() as f64
    }

    /// Block until every file is done and collect the outcomes.
    pub fn wait_all(self) -> BatchReport {
        let outcomes: Vec<FileOutcome> = self.tasks.into_iter().map(FileTask::wait).collect();
        let report = BatchReport { outcomes };
        report.log_summary();
        report
    }
}

/// Validate, then schedule every file on a bounded pool and return at once.
///
/// # Errors
/// Same batch-level errors as [`run_batch`]; nothing is scheduled if validation fails.
pub fn spawn_batch(
    config: &BatchConfig,
    password: &PasswordString,
) -> Result<BatchHandle, GcmcryptError> {
    config.validate(password)?;
    let pool = Arc::new(config.build_pool()?);
    let password = Arc::new(PasswordString::new(password.expose_secret().to_string()));
    info!(
        files = config.files.len(),
        workers = config.worker_count(),
        encrypt = config.mode.is_encrypt(),
        "batch spawned"
    );

    let tasks = config
        .files
        .iter()
        .map(|input| {
            let operation = config.operation(input);
            let progress = operation.progress();
            let (tx, rx) = mpsc::channel();
            let password = Arc::clone(&password);
            pool.spawn(move || {
                // receiver may already be gone; the result is then simply dropped
                let _ = tx.send(operation.run(&password));
            });
            FileTask {
                input: input.clone(),
                progress,
                done: rx,
            }
        })
        .collect();

    Ok(BatchHandle { tasks, _pool: pool })
}
