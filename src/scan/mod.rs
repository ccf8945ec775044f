//! Recursive candidate discovery.
//!
//! The scanner returns every regular file below a root directory as an
//! absolute path. Traversal order is whatever the filesystem yields; the
//! result is always sorted by the raw path string so that enumeration
//! indices are reproducible between runs.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::CurateError;

/// Lists all regular files under `root`, sorted ascending by absolute path.
///
/// Sorting compares the full path as a string (byte order), not component
/// by component, so `a-b/x.jpg` sorts before `a/x.jpg`.
///
/// # Errors
/// Returns [`CurateError::DirectoryNotFound`] if `root` is not an existing
/// directory. Traversal failures below the root surface as I/O errors.
pub fn scan_files(root: &Path) -> Result<Vec<PathBuf>, CurateError> {
    if !root.is_dir() {
        return Err(CurateError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let root = std::path::absolute(root)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).min_depth(1) {
        let entry = entry.map_err(|source| {
            CurateError::Io(
                source
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory traversal failed")),
            )
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}
