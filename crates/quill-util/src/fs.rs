use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::UtilError;

/// Recursively lists files under `basedir`, as paths relative to it, sorted.
///
/// Unlike a plain walk, a missing `basedir` is an error.
pub fn list_files(basedir: &Path) -> Result<Vec<PathBuf>, UtilError> {
    if !basedir.is_dir() {
        return Err(UtilError::NoSuchDirectory {
            path: basedir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    let mut pending = vec![PathBuf::new()];
    while let Some(relative) = pending.pop() {
        for entry in fs::read_dir(basedir.join(&relative))? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let child = relative.join(entry.file_name());
            if file_type.is_dir() {
                pending.push(child);
            } else if basedir.join(&child).exists() {
                // `exists` follows symlinks, so dangling links are skipped.
                files.push(child);
            }
        }
    }

    files.sort();
    Ok(files)
}

pub fn load_data_file(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
}

/// Restores the previous working directory when dropped.
///
/// The working directory is process-wide state; callers are responsible for not
/// changing it concurrently from several threads.
#[derive(Debug)]
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
pub struct CurrentDirGuard {
    previous: PathBuf,
}

impl CurrentDirGuard {
    pub fn change_to(path: impl AsRef<Path>) -> io::Result<Self> {
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(path)?;
        Ok(Self { previous })
    }
}

impl Drop for CurrentDirGuard {
    fn drop(&mut self) {
        if let Err(err) = std::env::set_current_dir(&self.previous) {
            tracing::debug!(
                target: "quill.util",
                path = %self.previous.display(),
                error = %err,
                "failed to restore working directory"
            );
        }
    }
}

/// Runs `body` with the working directory set to `path`, restoring it afterwards.
pub fn with_current_dir<R>(path: impl AsRef<Path>, body: impl FnOnce() -> R) -> io::Result<R> {
    let _guard = CurrentDirGuard::change_to(path)?;
    Ok(body())
}
