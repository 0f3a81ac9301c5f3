// ============================================================================
// FILE: src/utils.rs
// ============================================================================

//! Utility functions used across the library.

use crate::error::GcmcryptError;
use std::fs::{File, Permissions};
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read until `buf` is full or the reader is exhausted; returns the bytes read.
///
/// `Read::read` may return short counts mid-stream; chunk boundaries must only
/// fall short at end of input.
#[inline]
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Output file that only appears at its final path once committed.
///
/// Bytes go to a hidden temporary in the target directory; [`commit`](Self::commit)
/// renames it into place with `permissions` applied. Dropping without committing
/// deletes the temporary.
pub(crate) struct AtomicOutput {
    temp: NamedTempFile,
    target: PathBuf,
    permissions: Permissions,
}

impl AtomicOutput {
    pub(crate) fn create(target: &Path, permissions: Permissions) -> Result<Self, GcmcryptError> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".gcmcrypt-")
            .suffix(".part")
            .tempfile_in(dir)?;
        Ok(Self {
            temp,
            target: target.to_path_buf(),
            permissions,
        })
    }

    pub(crate) fn file_mut(&mut self) -> &mut File {
        self.temp.as_file_mut()
    }

    pub(crate) fn commit(self) -> Result<PathBuf, GcmcryptError> {
        // tempfile creates 0600; outputs take the source file's mode instead
        self.temp.as_file().set_permissions(self.permissions)?;
        self.temp
            .persist(&self.target)
            .map_err(|e| GcmcryptError::Io(e.error))?;
        Ok(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn plain_permissions() -> Permissions {
        let scratch = NamedTempFile::new().unwrap();
        scratch.as_file().metadata().unwrap().permissions()
    }

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn read_full_fills_across_short_reads() {
        let data = [7u8; 50];
        let mut reader = Trickle { data: &data, step: 3 };
        let mut buf = [0u8; 20];
        assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 20);
        assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 20);
        assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 10);
        assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 0);
    }

    #[test]
    fn atomic_output_appears_only_on_commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");

        let mut out = AtomicOutput::create(&target, plain_permissions()).unwrap();
        out.file_mut().write_all(b"payload").unwrap();
        assert!(!target.exists());

        let written = out.commit().unwrap();
        assert_eq!(written, target);
        assert_eq!(std::fs::read(&target).unwrap(), b"payload");
    }

    #[test]
    fn atomic_output_dropped_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        {
            let mut out = AtomicOutput::create(&target, plain_permissions()).unwrap();
            out.file_mut().write_all(b"partial").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn committed_output_takes_given_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");

        let mut out = AtomicOutput::create(&target, Permissions::from_mode(0o640)).unwrap();
        out.file_mut().write_all(b"payload").unwrap();
        out.commit().unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
