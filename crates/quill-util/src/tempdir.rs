use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::text::dedent;

/// A scratch directory that is removed when dropped.
///
/// Test fixtures use this to lay out small source trees:
///
/// ```
/// let dir = quill_util::Tempdir::new().unwrap();
/// let path = dir
///     .create_file("pkg/mod.pyi", "\n    def f() -> int: ...\n")
///     .unwrap();
/// assert_eq!(std::fs::read_to_string(path).unwrap(), "\ndef f() -> int: ...\n");
/// ```
#[derive(Debug)]
pub struct Tempdir {
    dir: Option<tempfile::TempDir>,
    path: PathBuf,
}

impl Tempdir {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("quill-").tempdir()?;
        let path = dir.path().to_path_buf();
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full path of an entry in this directory.
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Creates a (possibly nested) subdirectory; existing directories are fine.
    pub fn create_directory(&self, name: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.join(name);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Writes a text file, creating parent directories and dedenting `contents`.
    pub fn create_file(&self, name: impl AsRef<Path>, contents: &str) -> io::Result<PathBuf> {
        self.write_file(name.as_ref(), dedent(contents).as_bytes())
    }

    /// Writes `bytes` verbatim, creating parent directories.
    pub fn create_binary_file(
        &self,
        name: impl AsRef<Path>,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        self.write_file(name.as_ref(), bytes)
    }

    pub fn delete_file(&self, name: impl AsRef<Path>) -> io::Result<()> {
        fs::remove_file(self.join(name))
    }

    /// Removes the directory now, reporting any failure.
    pub fn close(mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }

    fn write_file(&self, name: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
        if let Some(parent) = name.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            self.create_directory(parent)?;
        }
        let path = self.join(name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

impl Drop for Tempdir {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        if let Err(err) = dir.close() {
            tracing::debug!(
                target: "quill.util",
                path = %self.path.display(),
                error = %err,
                "failed to remove temporary directory"
            );
        }
    }
}
