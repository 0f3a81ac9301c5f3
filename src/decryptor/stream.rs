//! src/decryptor/stream.rs
//! Streaming AES-256-GCM decryption with trailing-tag hold-back
//!
//! The reader is consumed without seeking: the last 16 bytes seen so far are always
//! held back, so when EOF arrives they are exactly the tag.

use crate::aliases::{Aes256Key32, Nonce12};
use crate::consts::TAG_LEN;
use crate::crypto::gcm::GcmStream;
use crate::error::GcmcryptError;
use crate::progress::ProgressTracker;
use crate::utils::read_full;
use std::io::{Read, Write};

/// Decrypt the ciphertext + tag that follow the header in `source`.
///
/// Plaintext is written to `destination` chunk by chunk *before* the tag can be
/// checked. On `Err(Authentication)` everything written must be discarded.
/// Returns the number of plaintext bytes produced.
pub(crate) fn decrypt_stream<R, W>(
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
    let mut buffer = vec![0u8; chunk_size + TAG_LEN];
    let mut filled = 0usize;

    loop {
        let n = read_full(source, &mut buffer[filled..])?;
        filled += n;
        let at_eof = filled < buffer.len();

        if filled > TAG_LEN {
            let body = filled - TAG_LEN;
            gcm.decrypt_in_place(&mut buffer[..body])?;
            destination.write_all(&buffer[..body])?;
            tracker.record(body);

            buffer.copy_within(body..filled, 0);
            filled = TAG_LEN;
        }

        if at_eof {
            break;
        }
    }

    if filled < TAG_LEN {
        return Err(GcmcryptError::CorruptContainer(
            "container ends before the authentication tag".into(),
        ));
    }

    let plaintext_len = gcm.processed();
    gcm.verify(&buffer[..TAG_LEN])?;
    Ok(plaintext_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryptor::stream::encrypt_stream;
    use std::io::Cursor;

    fn key() -> Aes256Key32 {
        Aes256Key32::new([5u8; 32])
    }

    fn seal(plain: &[u8], chunk_size: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut tracker = ProgressTracker::new(None, 0);
        encrypt_stream(&mut Cursor::new(plain), &mut out, &key(), &[3u8; 12], chunk_size, &mut tracker)
            .unwrap();
        out
    }

    #[test]
    fn hold_back_works_for_any_chunk_size() {
        let plain: Vec<u8> = (0..777u32).map(|i| i as u8).collect();
        let sealed = seal(&plain, 64);
        assert_eq!(sealed.len(), plain.len() + TAG_LEN);

        for chunk_size in [1usize, 15, 16, 17, 776, 777, 4096] {
            let mut out = Vec::new();
            let mut tracker = ProgressTracker::new(None, 0);
            let n = decrypt_stream(
                &mut Cursor::new(&sealed),
                &mut out,
                &key(),
                &[3u8; 12],
                chunk_size,
                &mut tracker,
            )
            .unwrap();
            assert_eq!(n, 777, "chunk {chunk_size}");
            assert_eq!(out, plain, "chunk {chunk_size}");
        }
    }

    #[test]
    fn missing_tag_is_corrupt() {
        let mut out = Vec::new();
        let mut tracker = ProgressTracker::new(None, 0);
        let err = decrypt_stream(
            &mut Cursor::new([0u8; 15]),
            &mut out,
            &key(),
            &[3u8; 12],
            64,
            &mut tracker,
        )
        .unwrap_err();
        assert!(matches!(err, GcmcryptError::CorruptContainer(_)));
    }

    #[test]
    fn empty_payload_is_just_a_tag() {
        let sealed = seal(b"", 64);
        assert_eq!(sealed.len(), TAG_LEN);
        let mut out = Vec::new();
        let mut tracker = ProgressTracker::new(None, 0);
        decrypt_stream(&mut Cursor::new(&sealed), &mut out, &key(), &[3u8; 12], 64, &mut tracker)
            .unwrap();
        assert!(out.is_empty());
    }
}
