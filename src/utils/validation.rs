//! Path checks run before any external tool is launched.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Directory that would receive `path` if it were created.
///
/// A bare file name resolves to the current directory.
#[must_use]
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Resolve `path` to an absolute path without requiring it to exist.
///
/// Existing paths are canonicalized. For a missing file the parent directory
/// is canonicalized when possible so that `a.bam` and `./a.bam` compare equal.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Ok(canonical);
    }

    if let (Some(name), Ok(parent)) = (path.file_name(), fs::canonicalize(parent_dir(path))) {
        return Ok(parent.join(name));
    }

    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// True if both paths resolve to the same location
///
/// # Errors
///
/// Returns an error if either path cannot be made absolute.
pub fn same_path(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(absolute_path(a)? == absolute_path(b)?)
}

/// True if `path` is an existing file with at least one byte
#[must_use]
pub fn is_nonempty_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

/// Check whether `path` could be written.
///
/// An existing file is opened for writing (without truncation). For a missing
/// file its parent directory must exist and accept a new file. Returns
/// `Ok(false)` for a permission denial, a missing parent directory, or a path
/// that is a directory.
///
/// # Errors
///
/// Any other I/O error is returned unchanged.
pub fn can_write(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(false),
        Ok(_) => {
            return match OpenOptions::new().write(true).open(path) {
                Ok(_) => Ok(true),
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Ok(false),
                Err(e) => Err(e),
            };
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let dir = parent_dir(path);
    if !dir.is_dir() {
        return Ok(false);
    }

    match tempfile::Builder::new()
        .prefix(".bam2bigwig-probe")
        .tempfile_in(dir)
    {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Ok(false),
        Err(e) => Err(e),
    }
}

/// The path reported when `path` fails [`can_write`]: the file itself when it
/// exists, otherwise the directory that would hold it.
///
/// # Errors
///
/// Returns an error if the path cannot be made absolute.
pub fn denied_path(path: &Path) -> io::Result<PathBuf> {
    if path.exists() {
        absolute_path(path)
    } else {
        absolute_path(parent_dir(path))
    }
}
