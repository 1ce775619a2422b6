use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::warn;

/// Writes `bytes` to a fresh, randomly named file in `dir` and keeps it on
/// disk. The caller owns deletion.
pub fn extract_to_temp(dir: &Path, prefix: &str, suffix: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .rand_bytes(16)
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;

    // Closes the handle so other consumers can open the file.
    let path = file.into_temp_path().keep().map_err(|e| e.error)?;

    if let Err(e) = mark_hidden_temporary(&path) {
        warn!("Could not set attributes on {}: {e}", path.display());
    }
    Ok(path)
}

/// Clears restrictive attributes and deletes the file. Returns whether a
/// file was actually removed.
pub fn remove_quietly(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    if let Err(e) = clear_attributes(path) {
        warn!("Could not clear attributes on {}: {e}", path.display());
    }

    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!("Could not delete {}: {e}", path.display());
            false
        }
    }
}

#[cfg(windows)]
fn mark_hidden_temporary(path: &Path) -> io::Result<()> {
    use windows::Win32::Storage::FileSystem::{FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_TEMPORARY};

    set_attributes(path, FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_TEMPORARY)
}

#[cfg(not(windows))]
fn mark_hidden_temporary(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(windows)]
fn clear_attributes(path: &Path) -> io::Result<()> {
    use windows::Win32::Storage::FileSystem::FILE_ATTRIBUTE_NORMAL;

    set_attributes(path, FILE_ATTRIBUTE_NORMAL)
}

#[cfg(not(windows))]
fn clear_attributes(path: &Path) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}

#[cfg(windows)]
fn set_attributes(
    path: &Path,
    attributes: windows::Win32::Storage::FileSystem::FILE_FLAGS_AND_ATTRIBUTES,
) -> io::Result<()> {
    use windows::{core::PCWSTR, Win32::Storage::FileSystem::SetFileAttributesW};

    let wide = crate::paths::to_wstring(path.as_os_str());
    unsafe { SetFileAttributesW(PCWSTR(wide.as_ptr()), attributes) }.map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_file_has_prefix_suffix_and_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = extract_to_temp(dir.path(), "cat-startup-", ".mp3", b"ID3").unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("cat-startup-"));
        assert!(name.ends_with(".mp3"));
        assert_eq!(fs::read(&path).unwrap(), b"ID3");
    }

    #[test]
    fn two_extractions_never_collide() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = extract_to_temp(dir.path(), "cat-startup-", ".mp3", b"a").unwrap();
        let b = extract_to_temp(dir.path(), "cat-startup-", ".mp3", b"b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn remove_clears_read_only_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = extract_to_temp(dir.path(), "x-", ".bin", b"1").unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        assert!(remove_quietly(&path));
        assert!(!path.exists());
    }

    #[test]
    fn removing_a_missing_file_is_a_noop() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(!remove_quietly(&dir.path().join("gone.mp3")));
    }
}
