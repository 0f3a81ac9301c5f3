//! Output path naming for encrypted and decrypted files.
//!
//! Encryption appends `.encrypted` to the input name. Decryption has two policies:
//! [`NamingPolicy::Legacy`] reproduces the historical rules byte for byte, including the
//! branch taken when the container name already ends with its stored extension (which
//! happens for doubly-encrypted files); [`NamingPolicy::Simplified`] always produces
//! `<name without .encrypted>_decrypted<ext>`.

use crate::consts::{DECRYPTED_MARKER, ENCRYPTED_EXTENSION, ENCRYPTED_SUFFIX};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// How decrypted output files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Historical rules, kept for parity with existing tooling.
    #[default]
    Legacy,
    /// Strip the trailing `.encrypted`, then append `_decrypted` and the stored extension.
    Simplified,
}

/// Where `encrypt` writes the container for `input`.
///
/// `output_dir/<file name>.encrypted` when a directory is given, otherwise
/// `<input>.encrypted` next to the input.
pub fn encrypted_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, input.file_name()) {
        (Some(dir), Some(name)) => {
            let mut name = name.to_os_string();
            name.push(ENCRYPTED_SUFFIX);
            dir.join(name)
        }
        _ => {
            let mut full: OsString = input.as_os_str().to_os_string();
            full.push(ENCRYPTED_SUFFIX);
            PathBuf::from(full)
        }
    }
}

/// Where `decrypt` writes the plaintext for container `input` with stored extension `ext`.
pub fn decrypted_output_path(
    input: &Path,
    ext: &str,
    output_dir: Option<&Path>,
    policy: NamingPolicy,
) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let name = match policy {
        NamingPolicy::Simplified => {
            let stem = file_name.strip_suffix(ENCRYPTED_SUFFIX).unwrap_or(&file_name);
            format!("{stem}{DECRYPTED_MARKER}{ext}")
        }
        NamingPolicy::Legacy => legacy_name(input, &file_name, ext, output_dir.is_some()),
    };
    dir.join(name)
}

fn legacy_name(input: &Path, file_name: &str, ext: &str, has_output_dir: bool) -> String {
    let check_ext = if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    };
    let ends_with_ext = input
        .to_string_lossy()
        .to_lowercase()
        .ends_with(&check_ext.to_lowercase());
    let marked = file_name.replace(ENCRYPTED_SUFFIX, DECRYPTED_MARKER);

    match (ends_with_ext, has_output_dir) {
        (false, true) => format!(
            "{}{DECRYPTED_MARKER}{ext}",
            file_name.replace(ENCRYPTED_SUFFIX, "")
        ),
        (false, false) | (true, false) => format!("{marked}{ext}"),
        // the stored extension is already part of the name
        (true, true) => marked,
    }
}

/// Original extension of `path` including the leading dot, or `""` when there is none.
///
/// Leading dots are skipped, so `.bashrc` and `..bashrc` have no extension;
/// `name.` has the extension `"."`.
pub fn original_extension(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.trim_start_matches('.');
    stem.rfind('.')
        .map(|i| stem[i..].to_string())
        .unwrap_or_default()
}

/// `true` if `path` carries the `.encrypted` extension (case-sensitive).
pub fn is_encrypted_name(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == ENCRYPTED_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_rules() {
        assert_eq!(original_extension(Path::new("dir/a.txt")), ".txt");
        assert_eq!(original_extension(Path::new("a.tar.gz")), ".gz");
        assert_eq!(original_extension(Path::new("Makefile")), "");
        assert_eq!(original_extension(Path::new(".bashrc")), "");
        assert_eq!(original_extension(Path::new("..bashrc")), "");
        assert_eq!(original_extension(Path::new("...a.b")), ".b");
        assert_eq!(original_extension(Path::new(".config.toml")), ".toml");
        assert_eq!(original_extension(Path::new("a.")), ".");
        assert_eq!(original_extension(Path::new("photo.été")), ".été");
    }

    #[test]
    fn encrypted_name_detection() {
        assert!(is_encrypted_name(Path::new("a.txt.encrypted")));
        assert!(!is_encrypted_name(Path::new("a.txt")));
        assert!(!is_encrypted_name(Path::new("a.ENCRYPTED")));
        assert!(!is_encrypted_name(Path::new(".encrypted")));
    }

    #[test]
    fn encrypt_paths() {
        assert_eq!(
            encrypted_output_path(Path::new("/in/a.txt"), None),
            PathBuf::from("/in/a.txt.encrypted")
        );
        assert_eq!(
            encrypted_output_path(Path::new("/in/a.txt"), Some(Path::new("/out"))),
            PathBuf::from("/out/a.txt.encrypted")
        );
    }

    #[test]
    fn legacy_common_case() {
        let input = Path::new("/in/a.txt.encrypted");
        assert_eq!(
            decrypted_output_path(input, ".txt", None, NamingPolicy::Legacy),
            PathBuf::from("/in/a.txt_decrypted.txt")
        );
        assert_eq!(
            decrypted_output_path(input, ".txt", Some(Path::new("/out")), NamingPolicy::Legacy),
            PathBuf::from("/out/a.txt_decrypted.txt")
        );
    }

    #[test]
    fn legacy_name_already_ending_with_extension() {
        // x.encrypted encrypted again stores ext ".encrypted"
        let input = Path::new("/in/x.encrypted.encrypted");
        assert_eq!(
            decrypted_output_path(input, ".encrypted", Some(Path::new("/out")), NamingPolicy::Legacy),
            PathBuf::from("/out/x_decrypted_decrypted")
        );
        assert_eq!(
            decrypted_output_path(input, ".encrypted", None, NamingPolicy::Legacy),
            PathBuf::from("/in/x_decrypted_decrypted.encrypted")
        );
    }

    #[test]
    fn legacy_keeps_original_case() {
        let input = Path::new("/in/REPORT.PDF.encrypted");
        assert_eq!(
            decrypted_output_path(input, ".pdf", None, NamingPolicy::Legacy),
            PathBuf::from("/in/REPORT.PDF_decrypted.pdf")
        );
    }

    #[test]
    fn legacy_empty_extension() {
        let input = Path::new("/in/Makefile.encrypted");
        assert_eq!(
            decrypted_output_path(input, "", Some(Path::new("/out")), NamingPolicy::Legacy),
            PathBuf::from("/out/Makefile_decrypted")
        );
    }

    #[test]
    fn simplified_always_strips_suffix() {
        let input = Path::new("/in/x.encrypted.encrypted");
        assert_eq!(
            decrypted_output_path(input, ".encrypted", None, NamingPolicy::Simplified),
            PathBuf::from("/in/x.encrypted_decrypted.encrypted")
        );
        assert_eq!(
            decrypted_output_path(
                Path::new("a.txt.encrypted"),
                ".txt",
                Some(Path::new("out")),
                NamingPolicy::Simplified
            ),
            PathBuf::from("out/a.txt_decrypted.txt")
        );
    }
}
