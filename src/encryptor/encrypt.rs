//! src/encryptor/encrypt.rs
//! Container encryption: header, streamed ciphertext, tag

use crate::aliases::{PasswordString, RevealSecret};
use crate::builders::pbkdf2_builder::Pbkdf2Builder;
use crate::consts::DEFAULT_CHUNK_SIZE;
use crate::crypto::rng::random_nonce;
use crate::encryptor::stream::encrypt_stream;
use crate::error::GcmcryptError;
use crate::header::ContainerHeader;
use crate::progress::{Progress, ProgressTracker};
use crate::utils::AtomicOutput;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Encrypt everything from `input` into a container written to `output`.
///
/// A fresh salt and nonce are drawn for every call, so encrypting the same
/// input twice never produces the same container.
///
/// # Errors
/// - [`GcmcryptError::InvalidInput`] for an empty password, zero iterations or an
///   extension longer than 255 bytes
/// - [`GcmcryptError::Io`] if reading or writing fails
///
/// # Example
///
/// ```no_run
/// use gcmcrypt_rs::aliases::PasswordString;
/// use gcmcrypt_rs::encrypt;
/// use std::io::Cursor;
///
/// let password = PasswordString::new("hunter2".to_string());
/// let mut container = Vec::new();
/// encrypt(Cursor::new(b"hello"), &mut container, &password, 100_000, ".txt")?;
/// assert_eq!(container.len(), 32 + 12 + 4 + 1 + 4 + 5 + 16);
/// # Ok::<(), gcmcrypt_rs::GcmcryptError>(())
/// ```
pub fn encrypt<R, W>(
    mut input: R,
    mut output: W,
    password: &PasswordString,
    iterations: u32,
    extension: &str,
) -> Result<(), GcmcryptError>
where
    R: Read,
    W: Write,
{
    let mut tracker = ProgressTracker::new(None, 0);
    encrypt_container(
        &mut input,
        &mut output,
        password,
        iterations,
        extension,
        DEFAULT_CHUNK_SIZE,
        &mut tracker,
    )?;
    Ok(())
}

pub(crate) fn encrypt_container<R, W>(
    input: &mut R,
    output: &mut W,
    password: &PasswordString,
    iterations: u32,
    extension: &str,
    chunk_size: usize,
    tracker: &mut ProgressTracker<'_>,
) -> Result<u64, GcmcryptError>
where
    R: Read,
    W: Write,
{
    if password.expose_secret().is_empty() {
        return Err(GcmcryptError::InvalidInput("empty password".into()));
    }
    if chunk_size == 0 {
        return Err(GcmcryptError::InvalidInput("chunk size must be at least 1".into()));
    }

    let kdf = Pbkdf2Builder::random()?.with_iterations(iterations);
    let nonce = random_nonce()?;
    // checks iterations and extension length before the expensive derivation
    let header = ContainerHeader::new(*kdf.salt(), nonce, iterations, extension)?;
    let key = kdf.derive_secure_new(password)?;

    header.write_to(output)?;
    let plaintext_len = encrypt_stream(input, output, &key, &nonce, chunk_size, tracker)?;
    output.flush()?;
    Ok(plaintext_len)
}

/// Encrypt the file at `input` into a container at `target`.
///
/// The container is assembled under a temporary name and renamed into place only
/// once the tag has been written.
pub(crate) fn encrypt_path(
    input: &Path,
    target: &Path,
    password: &PasswordString,
    iterations: u32,
    chunk_size: usize,
    progress: Option<&Progress>,
) -> Result<u64, GcmcryptError> {
    let source = File::open(input)?;
    let meta = source.metadata()?;
    let total = meta.len();
    let extension = crate::naming::original_extension(input);
    debug!(
        input = %input.display(),
        target = %target.display(),
        bytes = total,
        iterations,
        extension = %extension,
        "encrypting"
    );

    let mut reader = BufReader::with_capacity(chunk_size.max(1), source);
    let mut out = AtomicOutput::create(target, meta.permissions())?;
    let plaintext_len = {
        let mut writer = BufWriter::with_capacity(chunk_size.max(1), out.file_mut());
        let mut tracker = ProgressTracker::new(progress, total);
        encrypt_container(
            &mut reader,
            &mut writer,
            password,
            iterations,
            &extension,
            chunk_size,
            &mut tracker,
        )?
    };
    out.commit()?;
    Ok(plaintext_len)
}
