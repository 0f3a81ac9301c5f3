//! tests/common.rs
//! Common constants and helpers shared across test files

use gcmcrypt_rs::aliases::PasswordString;
use std::fs;
use std::path::{Path, PathBuf};

/// Fast iteration count for tests - performance testing is in benches/
pub const TEST_ITERATIONS: u32 = 5;

#[allow(dead_code)] // Used across multiple test files
pub const TEST_PASSWORD: &str = "correct horse battery staple";

#[allow(dead_code)]
pub fn password() -> PasswordString {
    PasswordString::new(TEST_PASSWORD.to_string())
}

/// Deterministic, non-repeating-looking bytes for payloads.
#[allow(dead_code)]
pub fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 7)) as u8).collect()
}

#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Names of every entry in `dir`, sorted.
#[allow(dead_code)]
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Flip one bit of the byte at `offset` (negative offsets count from the end).
#[allow(dead_code)]
pub fn flip_byte(path: &Path, offset: isize) {
    let mut bytes = fs::read(path).unwrap();
    let idx = if offset < 0 {
        bytes.len() - offset.unsigned_abs()
    } else {
        offset as usize
    };
    bytes[idx] ^= 0x01;
    fs::write(path, bytes).unwrap();
}
