use std::path::PathBuf;

/// A top-level usage problem, such as an unsupported target version.
///
/// These are reported to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UsageError {
    message: String,
}

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors produced by the filesystem helpers.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no such directory: {path}")]
    NoSuchDirectory { path: PathBuf },
}
