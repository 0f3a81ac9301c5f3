//! src/crypto/gcm.rs
//! Incremental AES-256-GCM (96-bit nonce, 128-bit tag, no associated data)
//!
//! One-shot AEAD APIs need the whole message in memory. Here the two halves of GCM are
//! driven separately so a file can be processed chunk by chunk:
//! - CTR keystream, 32-bit big-endian counter starting at `nonce || 00000002`
//! - GHASH over the ciphertext, closed by the lengths block and masked with `E_K(nonce || 00000001)`
//!
//! Output is byte-identical to one-shot AES-256-GCM with empty AAD.

use crate::aliases::{Aes256Key32, Nonce12, RevealSecret, Tag16};
use crate::consts::TAG_LEN;
use crate::error::GcmcryptError;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes256, Block as AesBlock};
use ctr::cipher::{KeyIvInit, StreamCipher};
use ghash::universal_hash::UniversalHash;
use ghash::GHash;
use subtle::ConstantTimeEq;

type Aes256Ctr32 = ctr::Ctr32BE<Aes256>;

const BLOCK_LEN: usize = 16;

/// Streaming GCM state for one message.
///
/// Feed chunks in order with [`encrypt_in_place`](Self::encrypt_in_place) or
/// [`decrypt_in_place`](Self::decrypt_in_place) (never both on one instance), then close
/// with [`finalize`](Self::finalize) or [`verify`](Self::verify).
pub struct GcmStream {
    keystream: Aes256Ctr32,
    ghash: GHash,
    tag_mask: AesBlock,
    // GHASH consumes whole blocks; a chunk boundary may split one.
    pending: [u8; BLOCK_LEN],
    pending_len: usize,
    processed: u64,
}

impl GcmStream {
    pub fn new(key: &Aes256Key32, nonce: &Nonce12) -> Self {
        let cipher = Aes256::new(key.expose_secret().into());

        let mut ghash_key = ghash::Key::default();
        cipher.encrypt_block(&mut ghash_key);
        let ghash = GHash::new(&ghash_key);

        let mut tag_mask = AesBlock::default();
        tag_mask[..nonce.len()].copy_from_slice(nonce);
        tag_mask[BLOCK_LEN - 1] = 1;
        cipher.encrypt_block(&mut tag_mask);

        let mut counter_block = [0u8; BLOCK_LEN];
        counter_block[..nonce.len()].copy_from_slice(nonce);
        counter_block[BLOCK_LEN - 1] = 2;
        let keystream = Aes256Ctr32::new(key.expose_secret().into(), &counter_block.into());

        Self {
            keystream,
            ghash,
            tag_mask,
            pending: [0u8; BLOCK_LEN],
            pending_len: 0,
            processed: 0,
        }
    }

    /// Encrypt `chunk` in place and absorb the resulting ciphertext.
    #[inline]
    pub fn encrypt_in_place(&mut self, chunk: &mut [u8]) -> Result<(), GcmcryptError> {
        self.apply_keystream(chunk)?;
        self.absorb(chunk);
        Ok(())
    }

    /// Absorb ciphertext `chunk`, then decrypt it in place.
    ///
    /// The plaintext is unauthenticated until [`verify`](Self::verify) succeeds.
    #[inline]
    pub fn decrypt_in_place(&mut self, chunk: &mut [u8]) -> Result<(), GcmcryptError> {
        self.absorb(chunk);
        self.apply_keystream(chunk)
    }

    /// Ciphertext bytes processed so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Close the message and return the authentication tag.
    pub fn finalize(mut self) -> Tag16 {
        if self.pending_len > 0 {
            self.ghash.update_padded(&self.pending[..self.pending_len]);
        }

        // len(A) = 0, len(C) in bits
        let mut lengths = ghash::Block::default();
        lengths[8..].copy_from_slice(&(self.processed * 8).to_be_bytes());
        self.ghash.update(&[lengths]);

        let digest = self.ghash.finalize();
        let mut tag = [0u8; TAG_LEN];
        for (i, byte) in tag.iter_mut().enumerate() {
            *byte = digest[i] ^ self.tag_mask[i];
        }
        tag
    }

    /// Close the message and compare against `expected` in constant time.
    ///
    /// # Errors
    /// - [`GcmcryptError::Authentication`] on mismatch
    pub fn verify(self, expected: &[u8]) -> Result<(), GcmcryptError> {
        let computed = self.finalize();
        if bool::from(computed.as_slice().ct_eq(expected)) {
            Ok(())
        } else {
            Err(GcmcryptError::Authentication)
        }
    }

    fn apply_keystream(&mut self, chunk: &mut [u8]) -> Result<(), GcmcryptError> {
        self.keystream.try_apply_keystream(chunk).map_err(|_| {
            GcmcryptError::InvalidInput("payload exceeds the AES-GCM length limit".into())
        })
    }

    fn absorb(&mut self, mut data: &[u8]) {
        self.processed += data.len() as u64;

        if self.pending_len > 0 {
            let take = (BLOCK_LEN - self.pending_len).min(data.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];
            if self.pending_len < BLOCK_LEN {
                return;
            }
            self.ghash.update(&[ghash::Block::from(self.pending)]);
            self.pending_len = 0;
        }

        let whole = data.len() - data.len() % BLOCK_LEN;
        if whole > 0 {
            // exact multiple of the block size: no padding is applied
            self.ghash.update_padded(&data[..whole]);
        }

        let rest = &data[whole..];
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }
}
