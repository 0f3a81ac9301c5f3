//! tests/interop_tests.rs
//! Cross-checks against the one-shot `aes-gcm` AEAD and a hand-built PBKDF2-HMAC-SHA1 key
//!
//! Containers must open with any standard AES-256-GCM implementation and vice versa.

mod common;
use common::{password, sample_bytes, write_file, TEST_ITERATIONS, TEST_PASSWORD};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use gcmcrypt_rs::aliases::{Aes256Key32, PasswordString};
use gcmcrypt_rs::consts::TAG_LEN;
use gcmcrypt_rs::{decrypt_file, encrypt_file, GcmStream};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use std::fs;
use tempfile::tempdir;

fn reference_key(salt: &[u8], iterations: u32) -> [u8; 32] {
    key_from_bytes(TEST_PASSWORD.as_bytes(), salt, iterations)
}

fn key_from_bytes(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha1>(password, salt, iterations, &mut key);
    key
}

fn frame(salt: &[u8; 32], nonce: &[u8; 12], ext: &str, sealed: &[u8]) -> Vec<u8> {
    let mut container = Vec::new();
    container.extend_from_slice(salt);
    container.extend_from_slice(nonce);
    container.extend_from_slice(&TEST_ITERATIONS.to_be_bytes());
    container.push(ext.len() as u8);
    container.extend_from_slice(ext.as_bytes());
    container.extend_from_slice(sealed);
    container
}

#[test]
fn streaming_matches_one_shot_aead() {
    let key = [0x42u8; 32];
    let nonce = [0x24u8; 12];
    let oracle = Aes256Gcm::new_from_slice(&key).unwrap();

    for len in [0usize, 1, 15, 16, 17, 1000, 4099] {
        let plain = sample_bytes(len);
        let expected = oracle
            .encrypt(Nonce::from_slice(&nonce), plain.as_slice())
            .unwrap();

        // uneven chunks exercise the partial-block carry
        let mut gcm = GcmStream::new(&Aes256Key32::new(key), &nonce);
        let mut buf = plain.clone();
        for chunk in buf.chunks_mut(7) {
            gcm.encrypt_in_place(chunk).unwrap();
        }
        let tag = gcm.finalize();

        assert_eq!(&expected[..len], buf.as_slice(), "ciphertext len={len}");
        assert_eq!(&expected[len..], &tag[..], "tag len={len}");
    }
}

#[test]
fn container_sealed_by_reference_opens() {
    let dir = tempdir().unwrap();
    let salt = [0x11u8; 32];
    let nonce = [0x22u8; 12];
    let ext = ".txt";
    let plain = sample_bytes(2048);

    let key = reference_key(&salt, TEST_ITERATIONS);
    let sealed = Aes256Gcm::new_from_slice(&key)
        .unwrap()
        .encrypt(Nonce::from_slice(&nonce), plain.as_slice())
        .unwrap();

    let enc = write_file(dir.path(), "doc.txt.encrypted", &frame(&salt, &nonce, ext, &sealed));

    let dec = decrypt_file(&enc, &password(), None).unwrap();
    assert_eq!(dec, dir.path().join("doc.txt_decrypted.txt"));
    assert_eq!(fs::read(dec).unwrap(), plain);
}

#[test]
fn accented_password_is_keyed_from_latin1_bytes() {
    let dir = tempdir().unwrap();
    let salt = [0x33u8; 32];
    let nonce = [0x44u8; 12];

    // "café" as one byte per character
    let key = key_from_bytes(b"caf\xE9", &salt, TEST_ITERATIONS);
    let sealed = Aes256Gcm::new_from_slice(&key)
        .unwrap()
        .encrypt(Nonce::from_slice(&nonce), b"hello".as_slice())
        .unwrap();
    let enc = write_file(dir.path(), "note.txt.encrypted", &frame(&salt, &nonce, ".txt", &sealed));

    let cafe = PasswordString::new("café".to_string());
    let dec = decrypt_file(&enc, &cafe, None).unwrap();
    assert_eq!(fs::read(dec).unwrap(), b"hello");

    // and our own containers open with the same latin-1 key
    let input = write_file(dir.path(), "menu.txt", b"espresso");
    let ours = fs::read(encrypt_file(&input, &cafe, TEST_ITERATIONS, None).unwrap()).unwrap();
    let key = key_from_bytes(b"caf\xE9", &ours[..32], TEST_ITERATIONS);
    let opened = Aes256Gcm::new_from_slice(&key)
        .unwrap()
        .decrypt(Nonce::from_slice(&ours[32..44]), &ours[53..])
        .unwrap();
    assert_eq!(opened, b"espresso");
}

#[test]
fn container_opens_with_reference() {
    let dir = tempdir().unwrap();
    let plain = sample_bytes(70_000);
    let input = write_file(dir.path(), "data.csv", &plain);
    let enc = encrypt_file(&input, &password(), TEST_ITERATIONS, None).unwrap();

    let bytes = fs::read(enc).unwrap();
    let salt = &bytes[..32];
    let nonce = &bytes[32..44];
    let iterations = u32::from_be_bytes(bytes[44..48].try_into().unwrap());
    let ext_len = bytes[48] as usize;
    assert_eq!(&bytes[49..49 + ext_len], b".csv");
    let body = &bytes[49 + ext_len..];
    assert_eq!(body.len(), plain.len() + TAG_LEN);

    let key = reference_key(salt, iterations);
    let opened = Aes256Gcm::new_from_slice(&key)
        .unwrap()
        .decrypt(Nonce::from_slice(nonce), body)
        .unwrap();
    assert_eq!(opened, plain);
}
