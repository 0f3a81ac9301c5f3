//! # Container Header
//!
//! Every container starts with a header, followed by the ciphertext and a 16-byte tag:
//!
//! | field      | size          | meaning                                  |
//! |------------|---------------|------------------------------------------|
//! | salt       | 32            | PBKDF2 salt                              |
//! | nonce      | 12            | AES-GCM nonce                            |
//! | iterations | 4, big-endian | PBKDF2 work factor                       |
//! | ext_len    | 1             | byte length of `ext`                     |
//! | ext        | ext_len       | original extension (UTF-8, leading dot)  |
//!
//! The header is stored in the clear and is not covered by the tag.

use crate::aliases::{Nonce12, Salt32};
use crate::consts::{FIXED_HEADER_LEN, MAX_EXTENSION_LEN, MIN_CONTAINER_LEN, TAG_LEN};
use crate::error::GcmcryptError;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::Path;

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub salt: Salt32,
    pub nonce: Nonce12,
    pub iterations: u32,
    /// Original file extension including the leading dot, or empty.
    pub extension: String,
}

impl ContainerHeader {
    /// Build a header, checking the fields fit the format.
    ///
    /// # Errors
    /// - [`GcmcryptError::InvalidInput`] for zero iterations, an extension over 255 bytes
    ///   or an extension holding `/`, `\` or NUL
    pub fn new(
        salt: Salt32,
        nonce: Nonce12,
        iterations: u32,
        extension: impl Into<String>,
    ) -> Result<Self, GcmcryptError> {
        let extension = extension.into();
        if iterations == 0 {
            return Err(GcmcryptError::InvalidInput(
                "KDF iterations cannot be zero".into(),
            ));
        }
        if extension.len() > MAX_EXTENSION_LEN {
            return Err(GcmcryptError::InvalidInput(format!(
                "extension is {} bytes, the format allows at most {MAX_EXTENSION_LEN}",
                extension.len()
            )));
        }
        if has_path_separator(&extension) {
            return Err(GcmcryptError::InvalidInput(format!(
                "extension {extension:?} contains a path separator"
            )));
        }
        Ok(Self {
            salt,
            nonce,
            iterations,
            extension,
        })
    }

    /// Size of this header on disk.
    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_LEN + self.extension.len()
    }

    /// Total container size for a plaintext of `plaintext_len` bytes.
    pub fn container_len(&self, plaintext_len: u64) -> u64 {
        (self.encoded_len() + TAG_LEN) as u64 + plaintext_len
    }

    /// Ciphertext length implied by a container of `container_len` bytes.
    ///
    /// # Errors
    /// - [`GcmcryptError::CorruptContainer`] when the container cannot hold this header and a tag
    pub fn ciphertext_len(&self, container_len: u64) -> Result<u64, GcmcryptError> {
        container_len
            .checked_sub((self.encoded_len() + TAG_LEN) as u64)
            .ok_or_else(|| {
                GcmcryptError::CorruptContainer(format!(
                    "{container_len} bytes is too short for a {}-byte header and {TAG_LEN}-byte tag",
                    self.encoded_len()
                ))
            })
    }

    /// Serialize the header.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), GcmcryptError> {
        let ext_len = u8::try_from(self.extension.len()).map_err(|_| {
            GcmcryptError::InvalidInput("extension longer than 255 bytes".into())
        })?;
        writer.write_all(&self.salt)?;
        writer.write_all(&self.nonce)?;
        writer.write_all(&self.iterations.to_be_bytes())?;
        writer.write_all(&[ext_len])?;
        writer.write_all(self.extension.as_bytes())?;
        Ok(())
    }

    /// Parse a header from the start of `reader`.
    ///
    /// # Errors
    /// - [`GcmcryptError::CorruptContainer`] on a short read or zero iterations
    /// - [`GcmcryptError::CorruptContainer`] if the extension is not UTF-8 or holds `/`, `\` or NUL
    /// - [`GcmcryptError::Io`] for any other read failure
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, GcmcryptError> {
        let salt: Salt32 = read_exact_span(reader)?;
        let nonce: Nonce12 = read_exact_span(reader)?;
        let iterations = u32::from_be_bytes(read_exact_span(reader)?);
        let [ext_len] = read_exact_span::<_, 1>(reader)?;

        let mut ext = vec![0u8; ext_len as usize];
        reader.read_exact(&mut ext).map_err(map_short_read)?;

        if iterations == 0 {
            return Err(GcmcryptError::CorruptContainer(
                "KDF iterations cannot be zero".into(),
            ));
        }
        let extension = String::from_utf8(ext).map_err(|_| {
            GcmcryptError::CorruptContainer("stored extension is not valid UTF-8".into())
        })?;
        // the extension is joined onto an output path
        if has_path_separator(&extension) {
            return Err(GcmcryptError::CorruptContainer(format!(
                "stored extension {extension:?} contains a path separator"
            )));
        }

        Ok(Self {
            salt,
            nonce,
            iterations,
            extension,
        })
    }
}

/// Header of an existing container plus the payload length it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub header: ContainerHeader,
    pub container_len: u64,
    pub ciphertext_len: u64,
}

/// Read the header of the container at `path` without deriving any key.
///
/// # Errors
/// - [`GcmcryptError::CorruptContainer`] if the file is shorter than the minimal container
///   or shorter than its own header plus tag
/// - [`GcmcryptError::Io`] if the file cannot be opened
pub fn read_header(path: &Path) -> Result<ContainerInfo, GcmcryptError> {
    let file = File::open(path)?;
    let container_len = file.metadata()?.len();
    if container_len < MIN_CONTAINER_LEN as u64 {
        return Err(GcmcryptError::CorruptContainer(format!(
            "{container_len} bytes is below the {MIN_CONTAINER_LEN}-byte minimum"
        )));
    }

    let header = ContainerHeader::read_from(&mut BufReader::new(file))?;
    let ciphertext_len = header.ciphertext_len(container_len)?;
    Ok(ContainerInfo {
        header,
        container_len,
        ciphertext_len,
    })
}

/// Read exactly `N` bytes into a stack array; EOF means the container is truncated.
#[inline(always)]
pub fn read_exact_span<R, const N: usize>(reader: &mut R) -> Result<[u8; N], GcmcryptError>
where
    R: Read,
{
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(map_short_read)?;
    Ok(buf)
}

fn has_path_separator(extension: &str) -> bool {
    extension.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
}

fn map_short_read(e: std::io::Error) -> GcmcryptError {
    if e.kind() == ErrorKind::UnexpectedEof {
        GcmcryptError::CorruptContainer("container header is truncated".into())
    } else {
        GcmcryptError::Io(e)
    }
}
