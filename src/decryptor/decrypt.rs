//! src/decryptor/decrypt.rs
//! Container decryption: parse header, re-derive key, stream, verify tag

use crate::aliases::{Aes256Key32, PasswordString};
use crate::builders::pbkdf2_builder::Pbkdf2Builder;
use crate::consts::{DEFAULT_CHUNK_SIZE, MIN_CONTAINER_LEN};
use crate::decryptor::stream::decrypt_stream;
use crate::error::GcmcryptError;
use crate::header::ContainerHeader;
use crate::progress::{Progress, ProgressTracker};
use crate::utils::AtomicOutput;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Decrypt a container from `input`, writing the plaintext to `output`.
///
/// Returns the parsed header (which carries the original extension).
///
/// Plaintext reaches `output` before the tag is checked. If this returns
/// [`GcmcryptError::Authentication`], whatever was written is unauthenticated and must be
/// thrown away; file-level decryption does this automatically.
///
/// # Errors
/// - [`GcmcryptError::Authentication`] for a wrong password or modified ciphertext/tag
/// - [`GcmcryptError::CorruptContainer`] for a truncated or malformed container
/// - [`GcmcryptError::Io`] if reading or writing fails
pub fn decrypt<R, W>(
    mut input: R,
    mut output: W,
    password: &PasswordString,
) -> Result<ContainerHeader, GcmcryptError>
where
    R: Read,
    W: Write,
{
    let header = ContainerHeader::read_from(&mut input)?;
    let key = derive_container_key(&header, password)?;
    let mut tracker = ProgressTracker::new(None, 0);
    decrypt_stream(
        &mut input,
        &mut output,
        &key,
        &header.nonce,
        DEFAULT_CHUNK_SIZE,
        &mut tracker,
    )?;
    output.flush()?;
    Ok(header)
}

/// Re-derive the key a container was sealed with from its stored salt and iterations.
pub fn derive_container_key(
    header: &ContainerHeader,
    password: &PasswordString,
) -> Result<Aes256Key32, GcmcryptError> {
    Pbkdf2Builder::from_salt(header.salt)
        .with_iterations(header.iterations)
        .derive_secure_new(password)
}

/// Decrypt the container at `input` into the path chosen by `target_for`.
///
/// The plaintext is written under a temporary name and only renamed into place after
/// the tag verifies, so a failed decryption leaves no output behind.
pub(crate) fn decrypt_path<F>(
    input: &Path,
    password: &PasswordString,
    chunk_size: usize,
    progress: Option<&Progress>,
    target_for: F,
) -> Result<(PathBuf, u64), GcmcryptError>
where
    F: FnOnce(&ContainerHeader) -> PathBuf,
{
    if chunk_size == 0 {
        return Err(GcmcryptError::InvalidInput("chunk size must be at least 1".into()));
    }

    let source = File::open(input)?;
    let meta = source.metadata()?;
    let container_len = meta.len();
    if container_len < MIN_CONTAINER_LEN as u64 {
        return Err(GcmcryptError::CorruptContainer(format!(
            "{container_len} bytes is below the {MIN_CONTAINER_LEN}-byte minimum"
        )));
    }

    let mut reader = BufReader::with_capacity(chunk_size, source);
    let header = ContainerHeader::read_from(&mut reader)?;
    let ciphertext_len = header.ciphertext_len(container_len)?;
    let target = target_for(&header);
    debug!(
        input = %input.display(),
        target = %target.display(),
        bytes = ciphertext_len,
        iterations = header.iterations,
        extension = %header.extension,
        "decrypting"
    );

    let key = derive_container_key(&header, password)?;
    let mut out = AtomicOutput::create(&target, meta.permissions())?;
    let result = {
        let mut writer = BufWriter::with_capacity(chunk_size, out.file_mut());
        let mut tracker = ProgressTracker::new(progress, ciphertext_len);
        decrypt_stream(
            &mut reader,
            &mut writer,
            &key,
            &header.nonce,
            chunk_size,
            &mut tracker,
        )
        .and_then(|n| writer.flush().map(|_| n).map_err(GcmcryptError::from))
    };

    match result {
        Ok(plaintext_len) => Ok((out.commit()?, plaintext_len)),
        Err(e) => {
            if e.is_authentication_failure() {
                warn!(input = %input.display(), "tag verification failed, discarding output");
            }
            // dropping `out` removes the unverified plaintext
            Err(e)
        }
    }
}
