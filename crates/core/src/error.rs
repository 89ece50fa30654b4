//! Error types for the ctxpack domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! The assembly engine itself is total and never returns these; they cover
//! the edges (loading context files, configuration, rendering).

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all ctxpack operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Loading errors ---
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading a context directory.
///
/// Missing individual knowledge files are *not* errors; they load as empty
/// input. Only a missing or unreadable directory is reported.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Context directory not found: {}", dir.display())]
    NotFound { dir: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_displays_path() {
        let err = Error::Load(LoadError::NotFound {
            dir: PathBuf::from("/tmp/project/.context"),
        });
        assert!(err.to_string().contains(".context"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn read_error_displays_reason() {
        let err = LoadError::Read {
            path: PathBuf::from("DECISIONS.md"),
            reason: "permission denied".into(),
        };
        assert!(err.to_string().contains("DECISIONS.md"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = Error::Config {
            message: "task_pct too large".into(),
        };
        assert_eq!(err.to_string(), "Configuration error: task_pct too large");
    }
}
