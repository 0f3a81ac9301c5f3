//! # Constants
//!
//! Container field sizes, streaming defaults and the iteration presets offered to users.

/// Length of the random PBKDF2 salt stored at the start of every container.
pub const SALT_LEN: usize = 32;

/// Length of the AES-GCM nonce (96 bits).
pub const NONCE_LEN: usize = 12;

/// Length of the big-endian iteration count field.
pub const ITERATIONS_FIELD_LEN: usize = 4;

/// Length of the extension length field.
pub const EXT_LEN_FIELD_LEN: usize = 1;

/// Length of the GCM authentication tag appended after the ciphertext.
pub const TAG_LEN: usize = 16;

/// Derived key length (AES-256).
pub const KEY_LEN: usize = 32;

/// Header bytes that precede the variable-length extension.
pub const FIXED_HEADER_LEN: usize = SALT_LEN + NONCE_LEN + ITERATIONS_FIELD_LEN + EXT_LEN_FIELD_LEN;

/// Smallest possible valid container: fixed header, empty extension, no payload, tag.
pub const MIN_CONTAINER_LEN: usize = FIXED_HEADER_LEN + TAG_LEN;

/// Longest extension the one-byte length field can describe.
pub const MAX_EXTENSION_LEN: usize = u8::MAX as usize;

/// Default streaming chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Iteration counts offered by the front end.
///
/// The engine itself accepts any positive count.
pub const ITERATION_PRESETS: [u32; 5] = [100_000, 200_000, 500_000, 1_000_000, 2_000_000];

/// Default PBKDF2 iteration count (the smallest preset).
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = ITERATION_PRESETS[0];

/// Suffix (without the dot) marking an encrypted container.
pub const ENCRYPTED_EXTENSION: &str = "encrypted";

/// Suffix (with the dot) appended to encrypted file names.
pub const ENCRYPTED_SUFFIX: &str = ".encrypted";

/// Marker inserted into decrypted file names.
pub const DECRYPTED_MARKER: &str = "_decrypted";

/// Upper bound on batch worker threads, regardless of core count.
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Highest fraction reported while bytes are still streaming.
///
/// `1.0` is reserved for a verified, persisted result.
pub const STREAMING_PROGRESS_CEILING: f64 = 0.999;
