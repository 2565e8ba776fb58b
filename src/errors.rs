use std::{io, path::PathBuf};

/// Error type shared by the renamer library and the command-line front end.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// File system I/O failure.
    #[error("I/O error while accessing {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    /// The root path is missing or is not a directory.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// An operation was rejected due to argument issues.
    #[error("invalid command input: {0}")]
    InvalidInput(String),

    /// The root is present but cannot be listed or written.
    #[error("pre-condition failed: {0}")]
    PreconditionFailed(String),

    /// The root resolves to a location that must not be bulk-renamed.
    #[error("refusing to rename inside protected location {0} (use --allow-protected to override)")]
    Protected(PathBuf),
}

impl CoreError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }
}

/// Shared result alias for the crate.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_path_and_cause() {
        let err = CoreError::io("/tmp/x", io::Error::from(io::ErrorKind::PermissionDenied));
        let message = err.to_string();
        assert!(message.contains("/tmp/x"), "{message}");
        assert!(message.to_lowercase().contains("permission denied"), "{message}");
    }

    #[test]
    fn protected_error_names_override_flag() {
        let err = CoreError::Protected(PathBuf::from("/usr"));
        assert!(err.to_string().contains("--allow-protected"));
    }
}
