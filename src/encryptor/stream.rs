//! src/encryptor/stream.rs
//! Streaming AES-256-GCM encryption of the container payload

use crate::aliases::{Aes256Key32, Nonce12};
use crate::crypto::gcm::GcmStream;
use crate::error::GcmcryptError;
use crate::progress::ProgressTracker;
use crate::utils::read_full;
use std::io::{Read, Write};

/// Encrypt `source` chunk by chunk into `destination`, then append the 16-byte tag.
///
/// Each chunk is written as soon as it is produced; memory use is one chunk.
/// Returns the number of plaintext bytes consumed.
pub(crate) fn encrypt_stream<R, W>(
    source: &mut R,
    destination: &mut W,
    key: &Aes256Key32,
    nonce: &Nonce12,
    chunk_size: usize,
    tracker: &mut ProgressTracker<'_>,
) -> Result<u64, GcmcryptError>
where
    R: Read,
    W: Write,
{
    let mut gcm = GcmStream::new(key, nonce);
    let mut chunk = vec![0u8; chunk_size];

    loop {
        let n = read_full(source, &mut chunk)?;
        if n == 0 {
            break;
        }

        gcm.encrypt_in_place(&mut chunk[..n])?;
        destination.write_all(&chunk[..n])?;
        tracker.record(n);

        if n < chunk_size {
            break;
        }
    }

    let plaintext_len = gcm.processed();
    destination.write_all(&gcm.finalize())?;
    Ok(plaintext_len)
}
